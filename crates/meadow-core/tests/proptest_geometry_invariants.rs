//! Property-based invariant tests for the geometry kernel.
//!
//! 1. `eval` hits both endpoints exactly
//! 2. `split` halves meet at `eval(t)`, for `t` inside and outside `[0, 1]`
//! 3. `make_shell` always yields a 7-point outline with two cusp turn points
//! 4. the shell tip coincides with the spine tip

use meadow_core::geom::{CubicBezier, HandleType, ShellParams, make_shell, point};
use proptest::prelude::*;

fn coord() -> impl Strategy<Value = f64> {
    -1000.0f64..1000.0
}

fn curve_strategy() -> impl Strategy<Value = CubicBezier> {
    (
        coord(),
        coord(),
        coord(),
        coord(),
        coord(),
        coord(),
        coord(),
        coord(),
    )
        .prop_map(|(a, b, c, d, e, f, g, h)| {
            CubicBezier::new(point(a, b), point(c, d), point(e, f), point(g, h))
        })
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * (1.0 + a.abs().max(b.abs()))
}

proptest! {
    #[test]
    fn eval_endpoints_are_exact(c in curve_strategy()) {
        prop_assert_eq!(c.eval(0.0), c.p0);
        prop_assert_eq!(c.eval(1.0), c.p3);
    }

    #[test]
    fn split_is_continuous(c in curve_strategy(), t in -0.5f64..1.5) {
        let (left, right) = c.split(t);
        prop_assert_eq!(left.p3, right.p0);

        let at = c.eval(t);
        prop_assert!(close(left.p3.x, at.x) && close(left.p3.y, at.y));

        let l1 = left.eval(1.0);
        let r0 = right.eval(0.0);
        prop_assert!(close(l1.x, r0.x) && close(l1.y, r0.y));
    }

    #[test]
    fn shell_outline_shape(
        lengths in prop::array::uniform3(0.0f64..200.0),
        angles in prop::array::uniform3(-3.2f64..3.2),
        widths in prop::array::uniform3(0.0f64..50.0),
        ox in coord(),
        oy in coord(),
        smooth_top in any::<bool>(),
    ) {
        let shell = make_shell(&ShellParams {
            lengths,
            angles,
            origin: point(ox, oy),
            widths,
            smooth_top,
        });
        let pts = shell.outline.points();
        prop_assert_eq!(pts.len(), 1 + 2 * 3);
        prop_assert_eq!(shell.outline.handles(), &[HandleType::Cusp, HandleType::Cusp][..]);
        prop_assert_eq!(pts[3], shell.spine.p3);
        prop_assert_eq!(shell.spine.p0, point(ox, oy));
    }
}
