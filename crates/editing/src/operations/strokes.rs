//! Stroke selection, transfer and color operations.

use glam::Vec3;
use gpen_ipc::ColorTarget;
use tracing::{debug, info};

use crate::error::EditError;
use crate::geometry::{centroid, linear_to_srgb_rgba, rotate_around_pivot};
use crate::scene::{PointKey, Rgba, Scene, StrokeKey};

/// Clear stroke and point selection everywhere, hidden and locked layers included
pub fn deselect_all_strokes(scene: &mut Scene) -> Result<usize, EditError> {
    let mut cleared = 0;
    for stroke in scene
        .layers
        .iter_mut()
        .flat_map(|l| &mut l.frames)
        .flat_map(|f| &mut f.strokes)
    {
        let any_point = stroke.points.iter().any(|p| p.select);
        if !stroke.select && !any_point {
            continue;
        }
        stroke.select = false;
        stroke.select_index = 0;
        for point in &mut stroke.points {
            point.select = false;
        }
        cleared += 1;
    }
    debug!("deselect_all_strokes: {} strokes cleared", cleared);
    Ok(cleared)
}

/// Move selected strokes of other layers into the active layer's active frame.
///
/// Moved strokes keep their selection and attributes.
pub fn move_strokes_to_active_layer(scene: &mut Scene) -> Result<usize, EditError> {
    let active = scene.active_layer_index().ok_or(EditError::NoActiveLayer)?;
    let layer = &scene.layers[active];
    if layer.lock {
        return Err(EditError::LayerLocked(layer.info.clone()));
    }
    let frame = layer.active_frame_index().ok_or(EditError::NoActiveFrame)?;

    let keys: Vec<StrokeKey> = scene
        .query()
        .selected_strokes()
        .filter(|item| item.key.layer != active)
        .map(|item| item.key)
        .collect();
    let moved: Vec<_> = keys
        .iter()
        .filter_map(|key| scene.stroke(*key).cloned())
        .collect();
    scene.remove_strokes(keys);

    let count = moved.len();
    for stroke in moved {
        scene.new_stroke(active, frame, stroke);
    }
    info!(
        "move_strokes_to_active_layer: {} strokes moved to '{}'",
        count, scene.layers[active].info
    );
    Ok(count)
}

/// Write fill color and every point color of the selected strokes (linear RGBA)
pub fn set_tint_color(scene: &mut Scene, fill: Rgba, stroke: Rgba) -> Result<usize, EditError> {
    let keys: Vec<StrokeKey> = scene
        .query()
        .selected_strokes()
        .map(|item| item.key)
        .collect();
    for key in &keys {
        if let Some(target) = scene.stroke_mut(*key) {
            target.vertex_color_fill = fill;
            for point in &mut target.points {
                point.vertex_color = stroke;
            }
        }
    }
    Ok(keys.len())
}

/// Copy a selection color into the brush, converting linear to sRGB.
///
/// `Fill` reads the first selected stroke's fill color; `Stroke` reads the
/// first selected point of the ordered selection.
pub fn pick_brush_color(scene: &mut Scene, target: ColorTarget) -> Result<usize, EditError> {
    let ordered = scene.query().ordered_selected_strokes();
    let picked = match target {
        ColorTarget::Fill => ordered.first().map(|item| item.stroke.vertex_color_fill),
        ColorTarget::Stroke => ordered
            .iter()
            .flat_map(|item| item.stroke.points.iter())
            .find(|p| p.select)
            .map(|p| p.vertex_color),
    };
    let Some(color) = picked else {
        return Ok(0);
    };
    let color = linear_to_srgb_rgba(color);
    match target {
        ColorTarget::Fill => scene.brush.fill_color = color,
        ColorTarget::Stroke => scene.brush.color = color,
    }
    debug!("pick_brush_color: {:?} -> {:?}", target, color);
    Ok(1)
}

/// Rotate selected points about their centroid
pub fn rotate_points(scene: &mut Scene, angle: f32, axis: Vec3) -> Result<usize, EditError> {
    if axis.length_squared() == 0.0 {
        return Ok(0);
    }
    let selected: Vec<(PointKey, Vec3)> = scene
        .query()
        .selected_points()
        .map(|item| (item.key, item.point.position))
        .collect();
    let Some(pivot) = centroid(selected.iter().map(|(_, p)| *p)) else {
        return Ok(0);
    };
    for (key, position) in &selected {
        if let Some(point) = scene.point_mut(*key) {
            point.position = rotate_around_pivot(*position, pivot, axis, angle);
        }
    }
    Ok(selected.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Layer, Stroke};
    use std::f32::consts::PI;

    fn selected_stroke(select_index: u32, positions: &[Vec3]) -> Stroke {
        let mut stroke = Stroke::from_positions(positions.iter().copied());
        stroke.select = true;
        stroke.select_index = select_index;
        for p in &mut stroke.points {
            p.select = true;
        }
        stroke
    }

    fn two_layer_scene() -> Scene {
        let mut scene = Scene::new();
        let mut a = Layer::new("A");
        a.frames[0].strokes = vec![
            selected_stroke(1, &[Vec3::ZERO, Vec3::X]),
            Stroke::from_positions([Vec3::Y, Vec3::ONE]),
        ];
        let mut b = Layer::new("B");
        b.frames[0].strokes = vec![selected_stroke(2, &[Vec3::Z, Vec3::X])];
        scene.layers = vec![a, b];
        scene.active_layer = Some(1);
        scene
    }

    #[test]
    fn test_deselect_all_includes_locked() {
        let mut scene = two_layer_scene();
        scene.layers[0].lock = true;
        scene.layers[0].hide = true;
        assert_eq!(deselect_all_strokes(&mut scene).unwrap(), 2);
        let all = scene
            .layers
            .iter()
            .flat_map(|l| &l.frames)
            .flat_map(|f| &f.strokes);
        for stroke in all {
            assert!(!stroke.select);
            assert_eq!(stroke.select_index, 0);
            assert!(stroke.points.iter().all(|p| !p.select));
        }
    }

    #[test]
    fn test_move_strokes_to_active_layer() {
        let mut scene = two_layer_scene();
        assert_eq!(move_strokes_to_active_layer(&mut scene).unwrap(), 1);
        assert_eq!(scene.layers[0].frames[0].strokes.len(), 1);
        let moved = &scene.layers[1].frames[0].strokes;
        assert_eq!(moved.len(), 2);
        assert_eq!(moved[1].points[0].position, Vec3::ZERO);
        assert!(moved[1].select);
    }

    #[test]
    fn test_move_strokes_locked_target() {
        let mut scene = two_layer_scene();
        scene.layers[1].lock = true;
        assert!(matches!(
            move_strokes_to_active_layer(&mut scene),
            Err(EditError::LayerLocked(_))
        ));
        assert_eq!(scene.layers[0].frames[0].strokes.len(), 2);
    }

    #[test]
    fn test_set_tint_color() {
        let mut scene = two_layer_scene();
        let fill = [0.2, 0.4, 0.6, 1.0];
        let line = [0.9, 0.1, 0.1, 1.0];
        assert_eq!(set_tint_color(&mut scene, fill, line).unwrap(), 2);
        let tinted = &scene.layers[0].frames[0].strokes[0];
        assert_eq!(tinted.vertex_color_fill, fill);
        assert!(tinted.points.iter().all(|p| p.vertex_color == line));
        assert_eq!(scene.layers[0].frames[0].strokes[1].vertex_color_fill, [0.0; 4]);
    }

    #[test]
    fn test_pick_brush_color_converts_to_srgb() {
        let mut scene = two_layer_scene();
        scene.layers[1].frames[0].strokes[0].vertex_color_fill = [1.0, 1.0, 1.0, 1.0];
        scene.layers[0].frames[0].strokes[0].vertex_color_fill = [0.0, 0.0, 0.0, 0.5];
        assert_eq!(pick_brush_color(&mut scene, ColorTarget::Fill).unwrap(), 1);
        assert_eq!(scene.brush.fill_color, [0.0, 0.0, 0.0, 0.5]);

        scene.layers[0].frames[0].strokes[0].points[0].vertex_color = [1.0, 0.0, 0.0, 1.0];
        pick_brush_color(&mut scene, ColorTarget::Stroke).unwrap();
        assert!((scene.brush.color[0] - 1.0).abs() < 1e-5);
        assert_eq!(scene.brush.color[1], 0.0);
    }

    #[test]
    fn test_pick_without_selection_is_noop() {
        let mut scene = two_layer_scene();
        deselect_all_strokes(&mut scene).unwrap();
        let before = scene.brush;
        assert_eq!(pick_brush_color(&mut scene, ColorTarget::Stroke).unwrap(), 0);
        assert_eq!(scene.brush, before);
    }

    #[test]
    fn test_rotate_points_about_centroid() {
        let mut scene = Scene::new();
        let mut layer = Layer::new("A");
        layer.frames[0].strokes = vec![selected_stroke(1, &[Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0)])];
        scene.layers.push(layer);

        assert_eq!(rotate_points(&mut scene, PI, Vec3::Z).unwrap(), 2);
        let points = &scene.layers[0].frames[0].strokes[0].points;
        assert!(points[0].position.abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), 1e-5));
        assert!(points[1].position.abs_diff_eq(Vec3::ZERO, 1e-5));

        assert_eq!(rotate_points(&mut scene, PI, Vec3::ZERO).unwrap(), 0);
    }
}
