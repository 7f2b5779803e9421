//! Mutation interface for the scene graph.

use tracing::debug;

use crate::constants::NAME_SUFFIX_DIGITS;
use crate::query::SceneQuery;

use super::{Layer, MaskEntry, Point, PointKey, Scene, Stroke, StrokeKey};

impl Scene {
    /// Read-only traversal over this scene
    pub fn query(&self) -> SceneQuery<'_> {
        SceneQuery::new(&self.layers, &self.materials)
    }

    pub fn active_layer(&self) -> Option<&Layer> {
        self.active_layer.and_then(|i| self.layers.get(i))
    }

    pub fn active_layer_mut(&mut self) -> Option<&mut Layer> {
        self.active_layer.and_then(|i| self.layers.get_mut(i))
    }

    /// Index of the active layer if it exists
    pub fn active_layer_index(&self) -> Option<usize> {
        self.active_layer.filter(|&i| i < self.layers.len())
    }

    /// First layer with the given name
    pub fn layer_by_name(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.info == name)
    }

    /// `base` if unused, otherwise `base.001`, `base.002`, ...
    ///
    /// The layer at `skip` (if any) does not count as a clash.
    pub fn unique_layer_name(&self, base: &str, skip: Option<usize>) -> String {
        let taken = |name: &str| {
            self.layers
                .iter()
                .enumerate()
                .any(|(i, l)| Some(i) != skip && l.info == name)
        };
        if !taken(base) {
            return base.to_string();
        }
        let stem = strip_numeric_suffix(base);
        (1..)
            .map(|n| format!("{stem}.{n:0width$}", width = NAME_SUFFIX_DIGITS))
            .find(|candidate| !taken(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    /// Insert a new layer at `index` (clamped), returning its index.
    ///
    /// The name is made unique. The active layer index is shifted to keep
    /// pointing at the same layer.
    pub fn new_layer(&mut self, name: &str, index: usize) -> usize {
        let index = index.min(self.layers.len());
        let name = self.unique_layer_name(name, None);
        debug!("Scene::new_layer: '{}' at {}", name, index);
        self.layers.insert(index, Layer::new(name));
        if let Some(active) = self.active_layer.as_mut() {
            if *active >= index {
                *active += 1;
            }
        }
        index
    }

    /// Remove the layer at `index`.
    ///
    /// Masks naming it are dropped unless another layer shares the name.
    pub fn remove_layer(&mut self, index: usize) -> Option<Layer> {
        if index >= self.layers.len() {
            return None;
        }
        let layer = self.layers.remove(index);
        if self.layer_by_name(&layer.info).is_none() {
            for other in &mut self.layers {
                other.mask_layers.retain(|m| m.layer != layer.info);
            }
        }
        self.active_layer = match self.active_layer {
            Some(a) if a == index => {
                if self.layers.is_empty() {
                    None
                } else {
                    Some(index.min(self.layers.len() - 1))
                }
            }
            Some(a) if a > index => Some(a - 1),
            other => other,
        };
        Some(layer)
    }

    /// Move the layer at `from` to position `to` (clamped).
    ///
    /// Returns false when nothing moved.
    pub fn move_layer(&mut self, from: usize, to: usize) -> bool {
        if from >= self.layers.len() {
            return false;
        }
        let to = to.min(self.layers.len() - 1);
        if from == to {
            return false;
        }
        let layer = self.layers.remove(from);
        self.layers.insert(to, layer);
        self.active_layer = self.active_layer.map(|a| {
            if a == from {
                to
            } else if from < a && a <= to {
                a - 1
            } else if to <= a && a < from {
                a + 1
            } else {
                a
            }
        });
        true
    }

    /// Rename a layer, keeping names unique and mask references intact.
    ///
    /// Returns the name actually assigned.
    pub fn rename_layer(&mut self, index: usize, name: &str) -> Option<String> {
        if index >= self.layers.len() {
            return None;
        }
        let name = self.unique_layer_name(name, Some(index));
        let old = std::mem::replace(&mut self.layers[index].info, name.clone());
        if old != name {
            for layer in &mut self.layers {
                for mask in &mut layer.mask_layers {
                    if mask.layer == old {
                        mask.layer = name.clone();
                    }
                }
            }
        }
        Some(name)
    }

    pub fn stroke(&self, key: StrokeKey) -> Option<&Stroke> {
        self.layers
            .get(key.layer)?
            .frames
            .get(key.frame)?
            .strokes
            .get(key.stroke)
    }

    pub fn stroke_mut(&mut self, key: StrokeKey) -> Option<&mut Stroke> {
        self.layers
            .get_mut(key.layer)?
            .frames
            .get_mut(key.frame)?
            .strokes
            .get_mut(key.stroke)
    }

    pub fn point_mut(&mut self, key: PointKey) -> Option<&mut Point> {
        self.stroke_mut(key.stroke)?.points.get_mut(key.point)
    }

    /// Append a stroke to a frame, returning its key
    pub fn new_stroke(&mut self, layer: usize, frame: usize, stroke: Stroke) -> Option<StrokeKey> {
        let strokes = &mut self.layers.get_mut(layer)?.frames.get_mut(frame)?.strokes;
        strokes.push(stroke);
        Some(StrokeKey {
            layer,
            frame,
            stroke: strokes.len() - 1,
        })
    }

    pub fn remove_stroke(&mut self, key: StrokeKey) -> Option<Stroke> {
        let strokes = &mut self
            .layers
            .get_mut(key.layer)?
            .frames
            .get_mut(key.frame)?
            .strokes;
        (key.stroke < strokes.len()).then(|| strokes.remove(key.stroke))
    }

    /// Remove many strokes; keys are resolved against the scene before any
    /// removal, so they may be given in any order.
    pub fn remove_strokes(&mut self, keys: impl IntoIterator<Item = StrokeKey>) -> usize {
        let mut keys: Vec<StrokeKey> = keys.into_iter().collect();
        keys.sort_unstable_by(|a, b| b.cmp(a));
        keys.dedup();
        keys.into_iter()
            .filter_map(|key| self.remove_stroke(key))
            .count()
    }

    /// One past the highest `select_index` in the scene
    pub fn next_select_index(&self) -> u32 {
        self.layers
            .iter()
            .flat_map(|l| &l.frames)
            .flat_map(|f| &f.strokes)
            .filter(|s| s.select)
            .map(|s| s.select_index)
            .max()
            .map_or(1, |m| m + 1)
    }

    /// Set a stroke's selection, maintaining selection order.
    ///
    /// Returns true when the flag changed.
    pub fn set_stroke_select(&mut self, key: StrokeKey, select: bool) -> bool {
        let next = self.next_select_index();
        let Some(stroke) = self.stroke_mut(key) else {
            return false;
        };
        if stroke.select == select {
            return false;
        }
        stroke.select = select;
        stroke.select_index = if select { next } else { 0 };
        true
    }

    /// Mask `target` with the layer named `layer`, enabling masking
    pub fn add_mask(&mut self, target: usize, layer: &str, invert: bool) -> bool {
        let Some(target) = self.layers.get_mut(target) else {
            return false;
        };
        target.use_mask_layer = true;
        target.mask_layers.push(MaskEntry {
            layer: layer.to_string(),
            invert,
        });
        true
    }

    /// Remove every mask entry of `target` naming `layer`
    pub fn remove_mask(&mut self, target: usize, layer: &str) -> usize {
        let Some(target) = self.layers.get_mut(target) else {
            return 0;
        };
        let before = target.mask_layers.len();
        target.mask_layers.retain(|m| m.layer != layer);
        before - target.mask_layers.len()
    }
}

/// `Name.001` → `Name`; anything else unchanged
fn strip_numeric_suffix(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, digits))
            if !stem.is_empty()
                && digits.len() == NAME_SUFFIX_DIGITS
                && digits.bytes().all(|b| b.is_ascii_digit()) =>
        {
            stem
        }
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn scene_with_layers(names: &[&str]) -> Scene {
        let mut scene = Scene::new();
        for name in names {
            scene.layers.push(Layer::new(*name));
        }
        scene.active_layer = Some(0);
        scene
    }

    #[test]
    fn test_new_layer_unique_name_and_active_shift() {
        let mut scene = scene_with_layers(&["Ink", "Fill"]);
        scene.active_layer = Some(1);
        let index = scene.new_layer("Ink", 0);
        assert_eq!(index, 0);
        assert_eq!(scene.layers[0].info, "Ink.001");
        assert_eq!(scene.active_layer, Some(2));
        assert_eq!(scene.active_layer().unwrap().info, "Fill");

        scene.new_layer("Ink.001", 99);
        assert_eq!(scene.layers[3].info, "Ink.002");
    }

    #[test]
    fn test_remove_layer_fixes_active_and_masks() {
        let mut scene = scene_with_layers(&["A", "B", "C"]);
        scene.add_mask(2, "A", false);
        scene.active_layer = Some(2);
        let removed = scene.remove_layer(0).unwrap();
        assert_eq!(removed.info, "A");
        assert_eq!(scene.active_layer, Some(1));
        assert!(scene.layers[1].mask_layers.is_empty());

        scene.remove_layer(1);
        assert_eq!(scene.active_layer, Some(0));
        scene.remove_layer(0);
        assert_eq!(scene.active_layer, None);
        assert!(scene.remove_layer(0).is_none());
    }

    #[test]
    fn test_move_layer_tracks_active() {
        let mut scene = scene_with_layers(&["A", "B", "C", "D"]);
        scene.active_layer = Some(1);
        assert!(scene.move_layer(1, 3));
        assert_eq!(scene.active_layer, Some(3));
        assert_eq!(scene.layers[3].info, "B");

        scene.active_layer = Some(2);
        assert!(scene.move_layer(0, 3));
        assert_eq!(scene.active_layer, Some(1));
        assert!(!scene.move_layer(2, 2));
    }

    #[test]
    fn test_rename_updates_mask_references() {
        let mut scene = scene_with_layers(&["A", "B"]);
        scene.add_mask(1, "A", true);
        assert_eq!(scene.rename_layer(0, "Lines").as_deref(), Some("Lines"));
        assert_eq!(scene.layers[1].mask_layers[0].layer, "Lines");
        assert_eq!(scene.rename_layer(1, "Lines").as_deref(), Some("Lines.001"));
    }

    #[test]
    fn test_select_index_ordering() {
        let mut scene = scene_with_layers(&["A"]);
        let a = scene.new_stroke(0, 0, Stroke::from_positions([Vec3::ZERO])).unwrap();
        let b = scene.new_stroke(0, 0, Stroke::from_positions([Vec3::X])).unwrap();
        assert!(scene.set_stroke_select(b, true));
        assert!(scene.set_stroke_select(a, true));
        assert!(!scene.set_stroke_select(a, true));
        assert_eq!(scene.stroke(b).unwrap().select_index, 1);
        assert_eq!(scene.stroke(a).unwrap().select_index, 2);
        assert!(scene.set_stroke_select(b, false));
        assert_eq!(scene.stroke(b).unwrap().select_index, 0);
    }

    #[test]
    fn test_remove_strokes_any_order() {
        let mut scene = scene_with_layers(&["A"]);
        let keys: Vec<_> = (0..4)
            .map(|i| {
                scene
                    .new_stroke(0, 0, Stroke::from_positions([Vec3::splat(i as f32)]))
                    .unwrap()
            })
            .collect();
        assert_eq!(scene.remove_strokes([keys[0], keys[2], keys[0]]), 2);
        let left: Vec<f32> = scene.layers[0].frames[0]
            .strokes
            .iter()
            .map(|s| s.points[0].position.x)
            .collect();
        assert_eq!(left, vec![1.0, 3.0]);
    }

    #[test]
    fn test_remove_mask_removes_duplicates() {
        let mut scene = scene_with_layers(&["A", "B"]);
        scene.add_mask(0, "B", false);
        scene.add_mask(0, "B", true);
        assert!(scene.layers[0].use_mask_layer);
        assert_eq!(scene.remove_mask(0, "B"), 2);
        assert_eq!(scene.remove_mask(0, "B"), 0);
    }

    #[test]
    fn test_strip_numeric_suffix() {
        assert_eq!(strip_numeric_suffix("Ink.004"), "Ink");
        assert_eq!(strip_numeric_suffix("v1.5"), "v1.5");
        assert_eq!(strip_numeric_suffix(".001"), ".001");
    }
}
