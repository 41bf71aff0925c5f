//! Scalar-to-color mapping for analysis fields.
//!
//! All fields share one fixed hue gradient: red through green to blue,
//! walked in HSV space with constant saturation and value. The gradient
//! tops out at 228° so the high end reads as blue rather than wrapping
//! back toward red.

/// Hue (degrees) assigned to a scalar of 1.0.
const MAX_HUE_DEG: f32 = 228.0;
/// Fixed saturation of the gradient.
const SATURATION: f32 = 1.0;
/// Fixed value (brightness) of the gradient.
const VALUE: f32 = 0.6;

/// Convert an HSV color to RGB. Hue is in degrees, saturation and value in
/// `[0, 1]`.
pub fn hsv_to_rgb(hue_deg: f32, saturation: f32, value: f32) -> [f32; 3] {
    let h = hue_deg.rem_euclid(360.0) / 60.0;
    let c = value * saturation;
    let x = c * (1.0 - (h.rem_euclid(2.0) - 1.0).abs());
    let m = value - c;

    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    [r + m, g + m, b + m]
}

/// Map a normalized scalar in `[0, 1]` onto the field color gradient.
///
/// Values above 1.0 clamp to the top of the gradient; the inputs coming
/// out of the field calculators are already normalized.
pub fn scalar_to_rgb(t: f64) -> [f32; 3] {
    let hue = (t.min(1.0).max(0.0) as f32) * MAX_HUE_DEG;
    hsv_to_rgb(hue, SATURATION, VALUE)
}
