//! Named falloff curves.
//!
//! A [`FalloffCurve`] is a user-editable 1D mapping, nominally [0,1] → [0,1],
//! used as a multiplicative profile along a stroke. Control points are
//! interpolated with a monotone cubic (Fritsch–Carlson), so a two-point
//! curve is exactly linear and edited curves never overshoot between
//! points. Curves live in a [`CurveCache`] owned by the scene, created on
//! first use and kept for the scene's lifetime.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::constants::GEOMETRY_EPSILON;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CurveError {
    #[error("Curve has no control points")]
    Empty,
}

/// A control point of a falloff curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub x: f32,
    pub y: f32,
}

impl CurvePoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Behaviour outside the first and last control point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Extrapolation {
    /// Hold the end values
    Constant,
    /// Continue along the end tangents
    #[default]
    Extrapolated,
}

/// A 1D mapping curve defined by sorted control points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FalloffCurve {
    points: Vec<CurvePoint>,
    pub extrapolation: Extrapolation,
}

impl Default for FalloffCurve {
    fn default() -> Self {
        Self::identity()
    }
}

impl FalloffCurve {
    /// The default curve: a straight line from (0,0) to (1,1)
    pub fn identity() -> Self {
        Self {
            points: vec![CurvePoint::new(0.0, 0.0), CurvePoint::new(1.0, 1.0)],
            extrapolation: Extrapolation::Extrapolated,
        }
    }

    /// Create a curve from control points (sorted by x)
    pub fn new(points: impl IntoIterator<Item = CurvePoint>) -> Self {
        let mut curve = Self {
            points: points.into_iter().collect(),
            extrapolation: Extrapolation::Extrapolated,
        };
        curve.sort();
        curve
    }

    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Insert a control point, keeping x order
    pub fn add_point(&mut self, x: f32, y: f32) {
        self.points.push(CurvePoint::new(x, y));
        self.sort();
    }

    /// Remove the control point at `index`, returning it
    pub fn remove_point(&mut self, index: usize) -> Option<CurvePoint> {
        (index < self.points.len()).then(|| self.points.remove(index))
    }

    /// Replace every control point
    pub fn set_points(&mut self, points: impl IntoIterator<Item = CurvePoint>) {
        self.points = points.into_iter().collect();
        self.sort();
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    fn sort(&mut self) {
        self.points.sort_by(|a, b| a.x.total_cmp(&b.x));
    }

    /// Map `t` through the curve.
    ///
    /// An empty curve is an error; callers abort before mutating anything.
    pub fn evaluate(&self, t: f32) -> Result<f32, CurveError> {
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Err(CurveError::Empty),
        };
        if self.points.len() == 1 {
            return Ok(first.y);
        }

        let tangents = self.tangents();
        if t <= first.x {
            return Ok(match self.extrapolation {
                Extrapolation::Constant => first.y,
                Extrapolation::Extrapolated => first.y + tangents[0] * (t - first.x),
            });
        }
        if t >= last.x {
            return Ok(match self.extrapolation {
                Extrapolation::Constant => last.y,
                Extrapolation::Extrapolated => {
                    last.y + tangents[tangents.len() - 1] * (t - last.x)
                }
            });
        }

        // First segment whose right end lies past t
        let i = self.points.partition_point(|p| p.x <= t).saturating_sub(1);
        let (p0, p1) = (self.points[i], self.points[i + 1]);
        let h = p1.x - p0.x;
        if h <= GEOMETRY_EPSILON {
            return Ok(p1.y);
        }
        let s = (t - p0.x) / h;
        let s2 = s * s;
        let s3 = s2 * s;
        let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h10 = s3 - 2.0 * s2 + s;
        let h01 = -2.0 * s3 + 3.0 * s2;
        let h11 = s3 - s2;
        Ok(h00 * p0.y + h10 * h * tangents[i] + h01 * p1.y + h11 * h * tangents[i + 1])
    }

    /// Fritsch–Carlson tangents, one per control point
    fn tangents(&self) -> Vec<f32> {
        let n = self.points.len();
        let secants: Vec<f32> = self
            .points
            .windows(2)
            .map(|w| {
                let dx = w[1].x - w[0].x;
                if dx <= GEOMETRY_EPSILON {
                    0.0
                } else {
                    (w[1].y - w[0].y) / dx
                }
            })
            .collect();

        let mut m = vec![0.0; n];
        m[0] = secants[0];
        m[n - 1] = secants[n - 2];
        for i in 1..n - 1 {
            let (a, b) = (secants[i - 1], secants[i]);
            m[i] = if a * b <= 0.0 { 0.0 } else { (a + b) / 2.0 };
        }

        // Limit tangents so each segment stays monotone
        for (i, &d) in secants.iter().enumerate() {
            if d.abs() <= GEOMETRY_EPSILON {
                m[i] = 0.0;
                m[i + 1] = 0.0;
                continue;
            }
            let alpha = m[i] / d;
            let beta = m[i + 1] / d;
            let r = alpha * alpha + beta * beta;
            if r > 9.0 {
                let tau = 3.0 / r.sqrt();
                m[i] = tau * alpha * d;
                m[i + 1] = tau * beta * d;
            }
        }
        m
    }
}

/// Named curves owned by a scene
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurveCache {
    curves: HashMap<String, FalloffCurve>,
}

impl CurveCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the curve named `name`, creating the identity curve on first use
    pub fn get_or_create(&mut self, name: &str) -> &mut FalloffCurve {
        if !self.curves.contains_key(name) {
            debug!("CurveCache: creating default curve '{}'", name);
        }
        self.curves.entry(name.to_string()).or_default()
    }

    pub fn get(&self, name: &str) -> Option<&FalloffCurve> {
        self.curves.get(name)
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_identity_curve_is_linear() {
        let curve = FalloffCurve::identity();
        for t in [0.0, 0.25, 0.5, 0.9, 1.0] {
            assert!(approx(curve.evaluate(t).unwrap(), t));
        }
    }

    #[test]
    fn test_identity_extrapolates() {
        let curve = FalloffCurve::identity();
        assert!(approx(curve.evaluate(1.5).unwrap(), 1.5));
        assert!(approx(curve.evaluate(-0.5).unwrap(), -0.5));
    }

    #[test]
    fn test_constant_extrapolation_holds_ends() {
        let mut curve = FalloffCurve::identity();
        curve.extrapolation = Extrapolation::Constant;
        assert!(approx(curve.evaluate(2.0).unwrap(), 1.0));
        assert!(approx(curve.evaluate(-1.0).unwrap(), 0.0));
    }

    #[test]
    fn test_empty_curve_errors() {
        let mut curve = FalloffCurve::identity();
        curve.clear();
        assert!(curve.is_empty());
        assert_eq!(curve.evaluate(0.5), Err(CurveError::Empty));
    }

    #[test]
    fn test_single_point_is_constant() {
        let curve = FalloffCurve::new([CurvePoint::new(0.3, 0.7)]);
        assert!(approx(curve.evaluate(0.0).unwrap(), 0.7));
        assert!(approx(curve.evaluate(1.0).unwrap(), 0.7));
    }

    #[test]
    fn test_curve_passes_through_points_without_overshoot() {
        let curve = FalloffCurve::new([
            CurvePoint::new(1.0, 0.0),
            CurvePoint::new(0.0, 0.0),
            CurvePoint::new(0.5, 1.0),
        ]);
        assert_eq!(curve.points()[1].x, 0.5);
        assert!(approx(curve.evaluate(0.5).unwrap(), 1.0));
        assert!(approx(curve.evaluate(0.0).unwrap(), 0.0));
        assert!(approx(curve.evaluate(1.0).unwrap(), 0.0));
        for i in 0..=100 {
            let y = curve.evaluate(i as f32 / 100.0).unwrap();
            assert!((-1e-5..=1.0 + 1e-5).contains(&y), "overshoot {y}");
        }
    }

    #[test]
    fn test_add_and_remove_points() {
        let mut curve = FalloffCurve::identity();
        curve.add_point(0.5, 0.2);
        assert_eq!(curve.points().len(), 3);
        assert_eq!(curve.points()[1], CurvePoint::new(0.5, 0.2));
        assert_eq!(curve.remove_point(1), Some(CurvePoint::new(0.5, 0.2)));
        assert_eq!(curve.remove_point(9), None);
    }

    #[test]
    fn test_cache_creates_once() {
        let mut cache = CurveCache::new();
        cache.get_or_create("FAT_STROKE").add_point(0.5, 0.9);
        assert_eq!(cache.get_or_create("FAT_STROKE").points().len(), 3);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("ENTRY_AND_EXIT").is_none());
    }
}
