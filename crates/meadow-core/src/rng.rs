//! Seeded linear congruential random source with sampling helpers.
//!
//! The generator state is `state = (state * 9301 + 49297) mod 233280`. Every helper consumes
//! draws in a fixed order, so a seed plus a call sequence fully determines the output. One
//! `Rng` must not be shared between independent generation streams.

const MULTIPLIER: f64 = 9301.0;
const INCREMENT: f64 = 49297.0;
const MODULUS: f64 = 233_280.0;

#[derive(Debug, Clone)]
pub struct Rng {
    state: f64,
    next_gaussian: Option<f64>,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        // The recurrence only depends on the seed modulo the modulus.
        Self {
            state: (seed % MODULUS as u64) as f64,
            next_gaussian: None,
        }
    }

    /// Seeds from process entropy.
    pub fn from_entropy() -> Self {
        Self::new(rand::random::<u64>())
    }

    fn next(&mut self, min: f64, max: f64) -> f64 {
        self.state = (self.state * MULTIPLIER + INCREMENT) % MODULUS;
        let rnd = self.state / MODULUS;
        min + rnd * (max - min)
    }

    /// Integer in `[min, max)`, computed as `floor(min + u·(max − min))`.
    ///
    /// Bounds may be fractional; callers sample e.g. `next_int(h * 0.04, h * 0.3)`.
    pub fn next_int(&mut self, min: impl Into<f64>, max: impl Into<f64>) -> i32 {
        self.next(min.into(), max.into()).floor() as i32
    }

    /// Uniform in `[0, 1)`.
    pub fn next_double(&mut self) -> f64 {
        self.next(0.0, 1.0)
    }

    /// Uniform in `[a, b)`.
    pub fn range(&mut self, a: f64, b: f64) -> f64 {
        self.next(a, b)
    }

    pub fn chance(&mut self, p: f64) -> bool {
        self.next_double() < p
    }

    /// Uniform pick. Always consumes one draw, even for an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        let i = self.next_int(0, items.len() as u32);
        items.get(i as usize)
    }

    /// Uniform pick from a non-empty array literal.
    pub fn pick_of<T: Copy, const N: usize>(&mut self, items: [T; N]) -> T {
        const { assert!(N > 0, "pick_of needs at least one item") };
        let i = self.next_int(0, N as u32) as usize;
        items[i.min(N - 1)]
    }

    /// Weight-proportional pick from parallel arrays of the same length `N`.
    ///
    /// Consumes the same single draw as [`pick_weighted`](Self::pick_weighted). Rounding that
    /// walks past the last bucket selects the last item.
    pub fn pick_weighted_of<T: Copy, const N: usize>(
        &mut self,
        items: [T; N],
        weights: [f64; N],
    ) -> T {
        const { assert!(N > 0, "pick_weighted_of needs at least one item") };
        match self.pick_weighted(&items, &weights) {
            Some(&item) => item,
            None => items[N - 1],
        }
    }

    /// Weight-proportional pick.
    ///
    /// Returns `None` without consuming a draw when `items` and `weights` differ in length.
    pub fn pick_weighted<'a, T>(&mut self, items: &'a [T], weights: &[f64]) -> Option<&'a T> {
        if items.len() != weights.len() {
            return None;
        }
        let total: f64 = weights.iter().sum();
        let mut ch = self.next_double() * total;
        for (item, &w) in items.iter().zip(weights) {
            if ch < w {
                return Some(item);
            }
            ch -= w;
        }
        None
    }

    /// In-place shuffle: each position swaps with a uniformly drawn position.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        let len = items.len();
        for i in 0..len {
            let j = self.next_int(0, len as u32) as usize;
            items.swap(i, j.min(len - 1));
        }
    }

    /// Standard normal sample (polar Box–Muller); every other call is served from a cache.
    pub fn next_gaussian(&mut self) -> f64 {
        if let Some(v) = self.next_gaussian.take() {
            return v;
        }
        loop {
            let v1 = 2.0 * self.next_double() - 1.0;
            let v2 = 2.0 * self.next_double() - 1.0;
            let s = v1 * v1 + v2 * v2;
            if s >= 1.0 || s == 0.0 {
                continue;
            }
            let multiplier = (-2.0 * s.ln() / s).sqrt();
            self.next_gaussian = Some(v2 * multiplier);
            return v1 * multiplier;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = Rng::new(12345);
        let mut b = Rng::new(12345);
        for _ in 0..100 {
            assert_eq!(a.next_double().to_bits(), b.next_double().to_bits());
        }
    }

    #[test]
    fn seeds_congruent_mod_modulus_are_equivalent() {
        let mut a = Rng::new(7);
        let mut b = Rng::new(7 + 233_280);
        assert_eq!(a.next_int(0, 1000), b.next_int(0, 1000));
    }

    #[test]
    fn next_int_respects_bounds() {
        let mut r = Rng::new(1);
        for _ in 0..2000 {
            let v = r.next_int(-3, 4);
            assert!((-3..4).contains(&v));
            let d = r.next_double();
            assert!((0.0..1.0).contains(&d));
        }
    }

    #[test]
    fn chance_extremes() {
        let mut r = Rng::new(99);
        for _ in 0..100 {
            assert!(!r.chance(0.0));
            assert!(r.chance(1.0));
        }
    }

    #[test]
    fn pick_weighted_rejects_mismatched_lengths() {
        let mut r = Rng::new(3);
        let mut untouched = r.clone();
        assert_eq!(r.pick_weighted(&[1, 2, 3], &[1.0, 1.0]), None);
        // No draw was consumed.
        assert_eq!(r.next_double().to_bits(), untouched.next_double().to_bits());
    }

    #[test]
    fn pick_weighted_of_matches_slice_pick() {
        let mut a = Rng::new(21);
        let mut b = Rng::new(21);
        for _ in 0..200 {
            let x = a.pick_weighted_of(["x", "y", "z"], [4.0, 1.0, 1.0]);
            let y = b.pick_weighted(&["x", "y", "z"], &[4.0, 1.0, 1.0]).copied();
            assert_eq!(Some(x), y);
        }
    }

    #[test]
    fn pick_weighted_never_selects_zero_weight() {
        let mut r = Rng::new(5);
        let items = ["a", "b", "c"];
        let weights = [1.0, 0.0, 3.0];
        assert_eq!(items.len(), weights.len());
        for _ in 0..500 {
            let v = r.pick_weighted(&items, &weights).copied();
            assert!(matches!(v, Some("a") | Some("c")));
        }
    }

    #[test]
    fn pick_handles_empty_slices() {
        let mut r = Rng::new(5);
        let empty: [u8; 0] = [];
        assert_eq!(r.pick(&empty), None);
        assert!(matches!(r.pick(&[1, 2]), Some(1) | Some(2)));
        let s = r.pick_of([-1.0, 1.0]);
        assert!(s == -1.0 || s == 1.0);
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut r = Rng::new(11);
        let mut v: Vec<usize> = (0..20).collect();
        r.shuffle(&mut v);
        let mut sorted = v.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn gaussian_serves_cached_pair() {
        let mut r = Rng::new(42);
        let _first = r.next_gaussian();
        let mut spare = r.clone();
        // The second value comes from the cache, so the underlying stream does not move.
        let _second = r.next_gaussian();
        assert_eq!(r.next_double().to_bits(), spare.next_double().to_bits());
    }

    #[test]
    fn gaussian_is_roughly_standard() {
        let mut r = Rng::new(2024);
        let n = 4000;
        let samples: Vec<f64> = (0..n).map(|_| r.next_gaussian()).collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let var = samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
        assert!(mean.abs() < 0.1, "mean {mean}");
        assert!((var - 1.0).abs() < 0.2, "var {var}");
    }
}
