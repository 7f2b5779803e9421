//! Geometry and color primitives.
//!
//! Pure functions over `glam` vectors and linear/sRGB colors. Nothing here
//! touches the scene.

use glam::{Quat, Vec3};

use crate::constants::{LINEAR_SRGB_THRESHOLD, SRGB_LINEAR_THRESHOLD};
use crate::scene::Rgba;

/// Rotate `v` by `angle` radians around `axis` (right-handed).
///
/// A zero-length axis leaves `v` unchanged.
pub fn rotate_about_axis(v: Vec3, axis: Vec3, angle: f32) -> Vec3 {
    let Some(axis) = axis.try_normalize() else {
        return v;
    };
    Quat::from_axis_angle(axis, angle) * v
}

/// Rotate `v` around `axis` through `pivot`.
pub fn rotate_around_pivot(v: Vec3, pivot: Vec3, axis: Vec3, angle: f32) -> Vec3 {
    pivot + rotate_about_axis(v - pivot, axis, angle)
}

/// Distance between consecutive points, summed from the first point.
///
/// The first entry compares the first point with itself, so it is always 0.
pub fn cumulative_lengths(points: &[Vec3]) -> Vec<f32> {
    let mut total = 0.0;
    let mut previous = match points.first() {
        Some(p) => *p,
        None => return Vec::new(),
    };
    points
        .iter()
        .map(|p| {
            total += p.distance(previous);
            previous = *p;
            total
        })
        .collect()
}

/// Mean of a set of positions, `None` when empty.
pub fn centroid(points: impl IntoIterator<Item = Vec3>) -> Option<Vec3> {
    let (sum, count) = points
        .into_iter()
        .fold((Vec3::ZERO, 0usize), |(sum, n), p| (sum + p, n + 1));
    (count > 0).then(|| sum / count as f32)
}

/// Convert one sRGB encoded channel to linear.
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= SRGB_LINEAR_THRESHOLD {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Convert one linear channel to sRGB encoding.
pub fn linear_to_srgb(c: f32) -> f32 {
    if c <= LINEAR_SRGB_THRESHOLD {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// sRGB → linear on RGB, alpha passes through.
pub fn srgb_to_linear_rgba(c: Rgba) -> Rgba {
    [srgb_to_linear(c[0]), srgb_to_linear(c[1]), srgb_to_linear(c[2]), c[3]]
}

/// Linear → sRGB on RGB, alpha passes through.
pub fn linear_to_srgb_rgba(c: Rgba) -> Rgba {
    [linear_to_srgb(c[0]), linear_to_srgb(c[1]), linear_to_srgb(c[2]), c[3]]
}

/// Euclidean distance in RGBA space.
pub fn color_distance(a: Rgba, b: Rgba) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn assert_vec_eq(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn test_rotate_quarter_turn_about_z() {
        assert_vec_eq(rotate_about_axis(Vec3::X, Vec3::Z, FRAC_PI_2), Vec3::Y);
        assert_vec_eq(rotate_about_axis(Vec3::X, Vec3::Z, -FRAC_PI_2), -Vec3::Y);
    }

    #[test]
    fn test_rotate_zero_axis_is_identity() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(rotate_about_axis(v, Vec3::ZERO, 1.0), v);
    }

    #[test]
    fn test_rotate_around_pivot() {
        let pivot = Vec3::new(1.0, 1.0, 0.0);
        let rotated = rotate_around_pivot(Vec3::new(2.0, 1.0, 0.0), pivot, Vec3::Z, FRAC_PI_2);
        assert_vec_eq(rotated, Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_cumulative_lengths_start_at_zero() {
        let pts = [Vec3::ZERO, Vec3::X, Vec3::new(1.0, 2.0, 0.0)];
        let lengths = cumulative_lengths(&pts);
        assert_eq!(lengths.len(), 3);
        assert_eq!(lengths[0], 0.0);
        assert!((lengths[1] - 1.0).abs() < 1e-6);
        assert!((lengths[2] - 3.0).abs() < 1e-6);
        assert!(cumulative_lengths(&[]).is_empty());
    }

    #[test]
    fn test_centroid() {
        assert_eq!(centroid(Vec::<Vec3>::new()), None);
        let c = centroid([Vec3::ZERO, Vec3::new(2.0, 4.0, 0.0)]).unwrap();
        assert_vec_eq(c, Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_srgb_round_trip() {
        let samples = [
            0.0,
            0.001,
            LINEAR_SRGB_THRESHOLD,
            SRGB_LINEAR_THRESHOLD,
            0.1,
            0.5,
            0.73,
            1.0,
        ];
        for c in samples {
            let back = linear_to_srgb(srgb_to_linear(c));
            assert!((back - c).abs() < 1e-5, "round trip failed for {c}: {back}");
            let back = srgb_to_linear(linear_to_srgb(c));
            assert!((back - c).abs() < 1e-5, "inverse round trip failed for {c}: {back}");
        }
    }

    #[test]
    fn test_srgb_rgba_keeps_alpha() {
        let c = [0.2, 0.4, 0.6, 0.3];
        let linear = srgb_to_linear_rgba(c);
        assert_eq!(linear[3], 0.3);
        let back = linear_to_srgb_rgba(linear);
        for i in 0..4 {
            assert!((back[i] - c[i]).abs() < 1e-5);
        }
    }

    #[test]
    fn test_color_distance() {
        assert_eq!(color_distance([0.0; 4], [0.0; 4]), 0.0);
        assert!((color_distance([0.0; 4], [1.0; 4]) - 2.0).abs() < 1e-6);
        assert!((color_distance([0.0, 0.0, 0.0, 1.0], [0.3, 0.4, 0.0, 1.0]) - 0.5).abs() < 1e-6);
    }
}
