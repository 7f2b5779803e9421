//! Host-owned scene graph.
//!
//! The editing engines never own a drawing; the host hands them a
//! `&mut Scene` for the duration of one command. All structural changes
//! (layers, strokes, masks, selection order) go through the mutation
//! interface in `mutation.rs` so invariants such as the active layer index
//! and `select_index` ordering stay consistent.

mod mutation;
mod types;

pub use types::*;

use gpen_config::EditorConfig;
use gpen_ipc::{FadeEdgeParams, FatStrokeParams, NearestColorParams};
use serde::{Deserialize, Serialize};

use crate::curve::CurveCache;
use crate::filters::LayerFilters;

/// A layered, frame-based drawing plus its editing session state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    pub layers: Vec<Layer>,
    pub active_layer: Option<usize>,
    pub materials: Vec<Material>,
    pub brush: Brush,
    /// Named falloff curves, kept for the scene's lifetime
    pub curves: CurveCache,
    pub filters: LayerFilters,
    pub config: EditorConfig,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scene with the given config
    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Fat stroke parameters seeded from this scene's config
    pub fn fat_stroke_params(&self) -> FatStrokeParams {
        FatStrokeParams::from_config(&self.config)
    }

    /// Fade edge parameters seeded from this scene's config
    pub fn fade_edge_params(&self) -> FadeEdgeParams {
        FadeEdgeParams::from_config(&self.config)
    }

    /// Nearest-color parameters seeded from this scene's config
    pub fn nearest_color_params(&self) -> NearestColorParams {
        NearestColorParams::from_config(&self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::CurvePoint;
    use glam::Vec3;
    use gpen_config::FAT_STROKE_CURVE;

    #[test]
    fn test_params_follow_config() {
        let config: EditorConfig =
            serde_json::from_str(r#"{"fat_stroke_width":0.1,"color_threshold":0.2}"#).unwrap();
        let scene = Scene::with_config(config);

        let fat = scene.fat_stroke_params();
        assert_eq!(fat.width, 0.1);
        assert_eq!(fat.position, 0.0);
        assert_eq!(scene.fade_edge_params().length, gpen_config::DEFAULT_FADE_LENGTH);
        assert_eq!(scene.nearest_color_params().threshold, 0.2);
        assert_eq!(scene.config.layer_name, gpen_config::DEFAULT_LAYER_NAME);
    }

    #[test]
    fn test_scene_json_round_trip() {
        let mut scene = Scene::new();
        let mut layer = Layer::new("Ink");
        let mut stroke = Stroke::from_positions([Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0)]);
        stroke.select = true;
        stroke.select_index = 1;
        stroke.points[1].pressure = 0.25;
        layer.frames[0].strokes.push(stroke);
        scene.layers.push(layer);
        scene.layers.push(Layer::new("Shade"));
        scene.add_mask(1, "Ink", true);
        scene.active_layer = Some(1);
        scene.materials.push(Material::new("Black"));
        scene.filters.add("ink", "^Ink");
        scene
            .curves
            .get_or_create(FAT_STROKE_CURVE)
            .set_points([CurvePoint::new(0.0, 0.0), CurvePoint::new(0.5, 1.0), CurvePoint::new(1.0, 0.0)]);

        let json = serde_json::to_string(&scene).unwrap();
        let restored: Scene = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.layers, scene.layers);
        assert_eq!(restored.active_layer, Some(1));
        assert_eq!(restored.materials, scene.materials);
        assert_eq!(restored.filters, scene.filters);
        assert_eq!(restored.config, scene.config);
        assert_eq!(
            restored.curves.get(FAT_STROKE_CURVE),
            scene.curves.get(FAT_STROKE_CURVE)
        );
    }
}
