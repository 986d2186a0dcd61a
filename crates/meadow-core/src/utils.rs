use std::fmt::Write as _;

/// Formats a number the way JS `Number#toString()` does, so attribute values stay stable
/// across platforms. Non-finite values and `-0` collapse to `0`.
pub fn fmt_num(v: f64) -> String {
    let mut out = String::new();
    fmt_num_into(&mut out, v);
    out
}

pub fn fmt_num_into(out: &mut String, mut v: f64) {
    if !v.is_finite() {
        out.push('0');
        return;
    }
    if v == -0.0 {
        v = 0.0;
    }
    let mut buf = ryu_js::Buffer::new();
    out.push_str(buf.format_finite(v));
}

/// Appends `x y` for a point, space separated.
pub fn fmt_pair_into(out: &mut String, x: f64, y: f64) {
    fmt_num_into(out, x);
    let _ = out.write_char(' ');
    fmt_num_into(out, y);
}

#[inline]
pub fn deg_to_rad(deg: f64) -> f64 {
    deg * std::f64::consts::PI / 180.0
}
