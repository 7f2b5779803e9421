//! Scene query layer.
//!
//! Restartable, side-effect-free traversals over the active frame of every
//! layer. Every call rebuilds its iterator chain, so results always reflect
//! the current scene. Order is document order: layer order, then stroke
//! order within the active frame, then point order.
//!
//! Excluded from every traversal:
//! - layers with `lock` set
//! - strokes whose material is locked
//!
//! Consumers that mutate collect keys first and write through the
//! [`Scene`](crate::scene::Scene) mutation interface afterwards.

use regex::Regex;
use tracing::warn;

use crate::scene::{Frame, Layer, Material, Point, PointKey, Stroke, StrokeKey};

/// A stroke as seen by a query
#[derive(Debug, Clone, Copy)]
pub struct StrokeItem<'a> {
    pub key: StrokeKey,
    pub layer: &'a Layer,
    pub frame: &'a Frame,
    pub stroke: &'a Stroke,
}

/// A point as seen by a query
#[derive(Debug, Clone, Copy)]
pub struct PointItem<'a> {
    pub key: PointKey,
    pub layer: &'a Layer,
    pub frame: &'a Frame,
    pub stroke: &'a Stroke,
    pub point: &'a Point,
}

/// True when the material at `index` exists and is locked
pub fn material_locked(materials: &[Material], index: usize) -> bool {
    materials.get(index).is_some_and(|m| m.lock)
}

/// Read-only view over a layer collection and its material table
#[derive(Debug, Clone, Copy)]
pub struct SceneQuery<'a> {
    layers: &'a [Layer],
    materials: &'a [Material],
    honor_locks: bool,
}

impl<'a> SceneQuery<'a> {
    pub fn new(layers: &'a [Layer], materials: &'a [Material]) -> Self {
        Self {
            layers,
            materials,
            honor_locks: true,
        }
    }

    /// Same traversal, but locked layers and materials are included.
    ///
    /// Lock toggles resolve their targets through this so a lock can be
    /// undone.
    pub fn including_locked(self) -> Self {
        Self {
            honor_locks: false,
            ..self
        }
    }

    /// Strokes of every unlocked layer's active frame, minus material-locked ones
    pub fn strokes(self) -> impl Iterator<Item = StrokeItem<'a>> + 'a {
        let materials = self.materials;
        let honor_locks = self.honor_locks;
        self.layers
            .iter()
            .enumerate()
            .filter(move |(_, layer)| !(honor_locks && layer.lock))
            .filter_map(|(li, layer)| {
                let fi = layer.active_frame_index()?;
                Some((li, layer, fi, &layer.frames[fi]))
            })
            .flat_map(|(li, layer, fi, frame)| {
                frame
                    .strokes
                    .iter()
                    .enumerate()
                    .map(move |(si, stroke)| StrokeItem {
                        key: StrokeKey {
                            layer: li,
                            frame: fi,
                            stroke: si,
                        },
                        layer,
                        frame,
                        stroke,
                    })
            })
            .filter(move |item| {
                !(honor_locks && material_locked(materials, item.stroke.material_index))
            })
    }

    /// Every point of [`strokes`](Self::strokes)
    pub fn points(self) -> impl Iterator<Item = PointItem<'a>> + 'a {
        self.strokes().flat_map(expand_points)
    }

    pub fn selected_strokes(self) -> impl Iterator<Item = StrokeItem<'a>> + 'a {
        self.strokes().filter(|item| item.stroke.select)
    }

    /// Selected points of selected strokes
    pub fn selected_points(self) -> impl Iterator<Item = PointItem<'a>> + 'a {
        self.selected_strokes()
            .flat_map(expand_points)
            .filter(|item| item.point.select)
    }

    /// Distinct layers holding at least one selected stroke, in the order
    /// their first selected stroke appears
    pub fn selected_layers(self) -> Vec<(usize, &'a Layer)> {
        let mut seen: Vec<(usize, &'a Layer)> = Vec::new();
        for item in self.selected_strokes() {
            if !seen.iter().any(|(i, _)| *i == item.key.layer) {
                seen.push((item.key.layer, item.layer));
            }
        }
        seen
    }

    /// Selected strokes sorted ascending by `select_index`.
    ///
    /// The sort is stable, so equal indices keep document order.
    pub fn ordered_selected_strokes(self) -> Vec<StrokeItem<'a>> {
        let mut items: Vec<_> = self.selected_strokes().collect();
        items.sort_by_key(|item| item.stroke.select_index);
        items
    }

    /// The first selected stroke in selection order
    pub fn first_selected_stroke(self) -> Option<StrokeItem<'a>> {
        self.selected_strokes()
            .enumerate()
            .min_by_key(|(order, item)| (item.stroke.select_index, *order))
            .map(|(_, item)| item)
    }
}

fn expand_points<'a>(item: StrokeItem<'a>) -> impl Iterator<Item = PointItem<'a>> + 'a {
    item.stroke
        .points
        .iter()
        .enumerate()
        .map(move |(pi, point)| PointItem {
            key: PointKey {
                stroke: item.key,
                point: pi,
            },
            layer: item.layer,
            frame: item.frame,
            stroke: item.stroke,
            point,
        })
}

/// Indices of layers whose name matches `pattern` (unanchored search).
///
/// An invalid pattern fails open: every index is returned.
pub fn filter_layer_indices(layers: &[Layer], pattern: &str) -> Vec<usize> {
    match Regex::new(pattern) {
        Ok(re) => layers
            .iter()
            .enumerate()
            .filter(|(_, l)| re.is_match(&l.info))
            .map(|(i, _)| i)
            .collect(),
        Err(e) => {
            warn!("filter_layers: invalid pattern '{}', not filtering: {}", pattern, e);
            (0..layers.len()).collect()
        }
    }
}

/// Layers whose name matches `pattern`; an invalid pattern returns all of them
pub fn filter_layers<'a>(layers: &'a [Layer], pattern: &str) -> Vec<&'a Layer> {
    filter_layer_indices(layers, pattern)
        .into_iter()
        .map(|i| &layers[i])
        .collect()
}
