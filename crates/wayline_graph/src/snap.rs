//! Grid snapping helpers

use glam::Vec3;

/// Round `value` to the nearest multiple of `size`.
///
/// A non-positive or non-finite `size` returns `value` unchanged.
#[inline]
pub fn round_to(value: f32, size: f32) -> f32 {
    if size > 0.0 && size.is_finite() {
        (value / size).round() * size
    } else {
        value
    }
}

/// Round each component of `v` to the nearest multiple of `size`
#[inline]
pub fn snap_to_grid(v: Vec3, size: f32) -> Vec3 {
    Vec3::new(round_to(v.x, size), round_to(v.y, size), round_to(v.z, size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_unit_grid() {
        assert_eq!(snap_to_grid(Vec3::new(0.4, 1.6, -2.5), 1.0), Vec3::new(0.0, 2.0, -3.0));
    }

    #[test]
    fn test_fractional_grid() {
        assert_relative_eq!(round_to(1.26, 0.25), 1.25);
        assert_relative_eq!(round_to(-0.7, 0.5), -0.5);
    }

    #[test]
    fn test_invalid_size_is_identity() {
        assert_eq!(round_to(3.3, 0.0), 3.3);
        assert_eq!(round_to(3.3, -1.0), 3.3);
        assert_eq!(round_to(3.3, f32::NAN), 3.3);
    }
}
