//! Fade stroke edge: arc-length tapering of point pressure and strength.
//!
//! From each requested end, points are walked in order while the
//! accumulated arc length stays within the budget; each visited point has
//! its pressure and/or strength multiplied by `falloff(s / length)`. The
//! end is walked on the reversed point sequence. A point reached from both
//! ends receives both factors.

use gpen_config::ENTRY_AND_EXIT_CURVE;
use gpen_ipc::FadeEdgeParams;
use tracing::{debug, info};

use crate::curve::{CurveError, FalloffCurve};
use crate::error::EditError;
use crate::scene::{Scene, StrokeKey};

/// Multiplicative factors for the points within `length` of one end.
///
/// `order` lists point indices starting from the tapered end. The first
/// point is compared with itself, so it sits at arc length 0.
pub fn taper_factors(
    positions: &[glam::Vec3],
    order: impl Iterator<Item = usize>,
    length: f32,
    curve: &FalloffCurve,
) -> Result<Vec<(usize, f32)>, CurveError> {
    let mut factors = Vec::new();
    let mut travelled = 0.0;
    let mut previous: Option<usize> = None;
    for index in order {
        let from = previous.unwrap_or(index);
        travelled += positions[index].distance(positions[from]);
        if travelled > length {
            break;
        }
        factors.push((index, curve.evaluate(travelled / length)?));
        previous = Some(index);
    }
    Ok(factors)
}

/// Taper the ends of every selected stroke.
///
/// Returns the number of strokes touched.
pub fn fade_stroke_edge(scene: &mut Scene, params: &FadeEdgeParams) -> Result<usize, EditError> {
    if params.length <= 0.0 || !(params.ends.start() || params.ends.end()) {
        debug!("fade_stroke_edge: zero length budget, nothing to do");
        return Ok(0);
    }
    if !params.pressure && !params.strength && params.base.is_none() {
        debug!("fade_stroke_edge: no target field");
        return Ok(0);
    }

    let curve = scene.curves.get_or_create(ENTRY_AND_EXIT_CURVE).clone();
    if curve.is_empty() {
        return Err(EditError::curve(ENTRY_AND_EXIT_CURVE, CurveError::Empty));
    }

    let mut plans: Vec<(StrokeKey, Vec<(usize, f32)>)> = Vec::new();
    for item in scene.query().selected_strokes() {
        let positions: Vec<glam::Vec3> = item.stroke.positions().collect();
        let n = positions.len();
        let mut factors = Vec::new();
        if params.ends.start() {
            factors.extend(
                taper_factors(&positions, 0..n, params.length, &curve)
                    .map_err(|e| EditError::curve(ENTRY_AND_EXIT_CURVE, e))?,
            );
        }
        if params.ends.end() {
            factors.extend(
                taper_factors(&positions, (0..n).rev(), params.length, &curve)
                    .map_err(|e| EditError::curve(ENTRY_AND_EXIT_CURVE, e))?,
            );
        }
        plans.push((item.key, factors));
    }

    let mut touched = 0;
    for (key, factors) in plans {
        let Some(stroke) = scene.stroke_mut(key) else {
            continue;
        };
        if let Some(base) = params.base {
            for point in &mut stroke.points {
                point.pressure = base.pressure;
                point.strength = base.strength;
            }
        }
        for (index, factor) in factors {
            let point = &mut stroke.points[index];
            if params.pressure {
                point.pressure *= factor;
            }
            if params.strength {
                point.strength *= factor;
            }
        }
        touched += 1;
    }

    info!("fade_stroke_edge: tapered {} strokes", touched);
    Ok(touched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::CurvePoint;
    use crate::scene::{Layer, Stroke};
    use glam::Vec3;
    use gpen_ipc::{BaseThickness, TaperEnds};

    fn straight(n: usize) -> Stroke {
        let mut stroke = Stroke::from_positions((0..n).map(|i| Vec3::new(i as f32, 0.0, 0.0)));
        stroke.select = true;
        stroke.select_index = 1;
        stroke
    }

    fn scene_with(stroke: Stroke) -> Scene {
        let mut scene = Scene::new();
        let mut layer = Layer::new("Ink");
        layer.frames[0].strokes.push(stroke);
        scene.layers.push(layer);
        scene
    }

    fn pressures(scene: &Scene) -> Vec<f32> {
        scene.layers[0].frames[0].strokes[0]
            .points
            .iter()
            .map(|p| p.pressure)
            .collect()
    }

    #[test]
    fn test_taper_factors_stop_past_budget() {
        let positions: Vec<Vec3> = (0..5).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();
        let factors =
            taper_factors(&positions, 0..5, 2.0, &FalloffCurve::identity()).unwrap();
        assert_eq!(factors, vec![(0, 0.0), (1, 0.5), (2, 1.0)]);

        let factors =
            taper_factors(&positions, (0..5).rev(), 1.0, &FalloffCurve::identity()).unwrap();
        assert_eq!(factors, vec![(4, 0.0), (3, 1.0)]);
    }

    #[test]
    fn test_zero_length_changes_nothing() {
        let mut scene = scene_with(straight(4));
        let params = FadeEdgeParams {
            length: 0.0,
            strength: true,
            ..Default::default()
        };
        assert_eq!(fade_stroke_edge(&mut scene, &params).unwrap(), 0);
        assert_eq!(pressures(&scene), vec![1.0; 4]);
    }

    #[test]
    fn test_start_only() {
        let mut scene = scene_with(straight(5));
        let params = FadeEdgeParams {
            length: 2.0,
            ends: TaperEnds::Start,
            ..Default::default()
        };
        assert_eq!(fade_stroke_edge(&mut scene, &params).unwrap(), 1);
        assert_eq!(pressures(&scene), vec![0.0, 0.5, 1.0, 1.0, 1.0]);
        let strengths: Vec<f32> = scene.layers[0].frames[0].strokes[0]
            .points
            .iter()
            .map(|p| p.strength)
            .collect();
        assert_eq!(strengths, vec![1.0; 5]);
    }

    #[test]
    fn test_both_ends_multiply_at_overlap() {
        let mut scene = scene_with(straight(5));
        *scene.curves.get_or_create(ENTRY_AND_EXIT_CURVE) = FalloffCurve::new([
            CurvePoint::new(0.0, 0.5),
            CurvePoint::new(1.0, 1.0),
        ]);
        let params = FadeEdgeParams {
            length: 4.0,
            ends: TaperEnds::Both,
            ..Default::default()
        };
        fade_stroke_edge(&mut scene, &params).unwrap();
        let p = pressures(&scene);
        // Midpoint sits at s = 2 from either end: 0.75 × 0.75
        assert!((p[2] - 0.5625).abs() < 1e-5);
        assert!((p[0] - 0.5).abs() < 1e-5);
        assert!((p[4] - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_base_thickness_sets_both_fields() {
        let mut scene = scene_with(straight(3));
        let params = FadeEdgeParams {
            length: 0.5,
            ends: TaperEnds::Start,
            pressure: true,
            strength: false,
            base: Some(BaseThickness {
                pressure: 2.0,
                strength: 0.4,
            }),
        };
        fade_stroke_edge(&mut scene, &params).unwrap();
        let points = &scene.layers[0].frames[0].strokes[0].points;
        assert_eq!(points[0].pressure, 0.0);
        assert_eq!(points[1].pressure, 2.0);
        assert!(points.iter().all(|p| p.strength == 0.4));
    }

    #[test]
    fn test_empty_curve_aborts() {
        let mut scene = scene_with(straight(3));
        scene.curves.get_or_create(ENTRY_AND_EXIT_CURVE).clear();
        let params = FadeEdgeParams {
            base: Some(BaseThickness::default()),
            ..Default::default()
        };
        let before = scene.layers.clone();
        assert!(fade_stroke_edge(&mut scene, &params).is_err());
        assert_eq!(scene.layers, before);
    }

    #[test]
    fn test_unselected_strokes_untouched() {
        let mut stroke = straight(3);
        stroke.select = false;
        let mut scene = scene_with(stroke);
        assert_eq!(fade_stroke_edge(&mut scene, &FadeEdgeParams::default()).unwrap(), 0);
        assert_eq!(pressures(&scene), vec![1.0; 3]);
    }
}
