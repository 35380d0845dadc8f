//! Hex color conversions and lightness adjustment. Child levels derive their
//! fill from the base color by shifting lightness in HLS space.

/// Parses a `#RRGGBB` string into channels in `[0, 1]`. Returns `None` for
/// anything that is not six hex digits.
pub fn hex_to_rgb(hex: &str) -> Option<(f64, f64, f64)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((
        f64::from(r) / 255.0,
        f64::from(g) / 255.0,
        f64::from(b) / 255.0,
    ))
}

/// Inverse of [`hex_to_rgb`]: clamps each channel to `[0, 1]` and rounds to
/// the nearest byte, producing an uppercase `#RRGGBB` string.
pub fn rgb_to_hex(rgb: (f64, f64, f64)) -> String {
    let byte = |channel: f64| (channel.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("#{:02X}{:02X}{:02X}", byte(rgb.0), byte(rgb.1), byte(rgb.2))
}

/// Shifts the lightness of a hex color by `amount` (positive lightens),
/// clamping to the valid range. Unparsable input is passed through unchanged.
pub fn adjust_color(color: &str, amount: f64) -> String {
    let Some(rgb) = hex_to_rgb(color) else {
        return color.to_string();
    };
    let (h, l, s) = rgb_to_hls(rgb);
    let l = (l + amount).clamp(0.0, 1.0);
    rgb_to_hex(hls_to_rgb(h, l, s))
}

fn rgb_to_hls((r, g, b): (f64, f64, f64)) -> (f64, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (min + max) / 2.0;
    if (max - min).abs() < f64::EPSILON {
        return (0.0, l, 0.0);
    }
    let delta = max - min;
    let s = if l <= 0.5 {
        delta / (max + min)
    } else {
        delta / (2.0 - max - min)
    };
    let rc = (max - r) / delta;
    let gc = (max - g) / delta;
    let bc = (max - b) / delta;
    let h = if r == max {
        bc - gc
    } else if g == max {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    ((h / 6.0).rem_euclid(1.0), l, s)
}

fn hls_to_rgb(h: f64, l: f64, s: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (l, l, l);
    }
    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;
    (
        hue_channel(m1, m2, h + 1.0 / 3.0),
        hue_channel(m1, m2, h),
        hue_channel(m1, m2, h - 1.0 / 3.0),
    )
}

fn hue_channel(m1: f64, m2: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue < 1.0 / 6.0 {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < 2.0 / 3.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
    } else {
        m1
    }
}
