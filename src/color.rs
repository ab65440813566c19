//! Color helpers for particle tinting.
//!
//! Particle colors are derived each tick from an HSL triple. Hue wraps
//! around the unit interval so that gradients across space cycle smoothly
//! instead of saturating at one end.

use glam::Vec3;

/// Pure red, used for every particle while a fist is held.
pub const FIST_RED: Vec3 = Vec3::new(1.0, 0.0, 0.0);

/// Saturation used for the position-linked gradient.
pub const GRADIENT_SATURATION: f32 = 0.7;

/// Lightness used for the position-linked gradient.
pub const GRADIENT_LIGHTNESS: f32 = 0.6;

/// Wrap a value into `[0, 1)`.
///
/// Unlike `%`, this stays non-negative for negative inputs, so a particle on
/// the negative x side (or a negative color speed) still lands on a valid hue.
#[inline]
pub fn wrap_unit(value: f32) -> f32 {
    let wrapped = value.rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}

/// Convert HSL to RGB.
///
/// * `hue` - any value, wrapped into `[0, 1)` (red → yellow → green → cyan → blue → magenta → red)
/// * `saturation` - 0.0 (gray) to 1.0 (vivid), clamped
/// * `lightness` - 0.0 (black) to 1.0 (white), clamped
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> Vec3 {
    let h = wrap_unit(hue);
    let s = saturation.clamp(0.0, 1.0);
    let l = lightness.clamp(0.0, 1.0);

    if s == 0.0 {
        return Vec3::splat(l);
    }

    let p = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let q = 2.0 * l - p;

    Vec3::new(
        hue_to_channel(q, p, h + 1.0 / 3.0),
        hue_to_channel(q, p, h),
        hue_to_channel(q, p, h - 1.0 / 3.0),
    )
}

fn hue_to_channel(q: f32, p: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        q + (p - q) * 6.0 * t
    } else if t < 0.5 {
        p
    } else if t < 2.0 / 3.0 {
        q + (p - q) * 6.0 * (2.0 / 3.0 - t)
    } else {
        q
    }
}

/// Color of a particle at horizontal position `x` for the current hue phase.
#[inline]
pub fn gradient_color(x: f32, hue_phase: f32) -> Vec3 {
    hsl_to_rgb(x * 0.05 + hue_phase, GRADIENT_SATURATION, GRADIENT_LIGHTNESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-4
    }

    #[test]
    fn test_wrap_unit_negative() {
        assert!((wrap_unit(-0.25) - 0.75).abs() < 1e-6);
        assert!((wrap_unit(2.5) - 0.5).abs() < 1e-6);
        assert!(wrap_unit(-1e-9) < 1.0);
    }

    #[test]
    fn test_hsl_red_matches_fist_color() {
        assert!(close(hsl_to_rgb(0.0, 1.0, 0.5), FIST_RED));
    }

    #[test]
    fn test_hsl_primaries() {
        assert!(close(hsl_to_rgb(1.0 / 3.0, 1.0, 0.5), Vec3::new(0.0, 1.0, 0.0)));
        assert!(close(hsl_to_rgb(2.0 / 3.0, 1.0, 0.5), Vec3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_hsl_gray_when_unsaturated() {
        assert!(close(hsl_to_rgb(0.4, 0.0, 0.3), Vec3::splat(0.3)));
    }

    #[test]
    fn test_gradient_wraps_instead_of_clamping() {
        // x = 20 pushes the hue past 1.0; it must come back around, not stick at red
        let wrapped = gradient_color(20.0, 0.25);
        let direct = hsl_to_rgb(0.25, GRADIENT_SATURATION, GRADIENT_LIGHTNESS);
        assert!(close(wrapped, direct));

        let negative = gradient_color(-5.0, 0.0);
        let expected = hsl_to_rgb(0.75, GRADIENT_SATURATION, GRADIENT_LIGHTNESS);
        assert!(close(negative, expected));
    }
}
