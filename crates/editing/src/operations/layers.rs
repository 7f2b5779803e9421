//! Layer operations driven by the current stroke selection.

use gpen_ipc::{LayerFlag, LayerMove, ToggleScope};
use regex::Regex;
use tracing::{debug, info};

use crate::error::EditError;
use crate::scene::{Layer, Scene, StrokeKey};

/// Make the layer of the first selected stroke active
pub fn select_stroke_layer(scene: &mut Scene) -> Result<usize, EditError> {
    let Some(first) = scene.query().first_selected_stroke() else {
        return Ok(0);
    };
    let layer = first.key.layer;
    scene.active_layer = Some(layer);
    debug!("select_stroke_layer: active layer is now {}", layer);
    Ok(1)
}

/// Select every stroke in the active frame of the first selected stroke's layer
pub fn select_same_layer_strokes(scene: &mut Scene) -> Result<usize, EditError> {
    let Some(first) = scene.query().first_selected_stroke() else {
        return Ok(0);
    };
    let layer = first.key.layer;
    let keys: Vec<StrokeKey> = scene
        .query()
        .strokes()
        .filter(|item| item.key.layer == layer)
        .map(|item| item.key)
        .collect();
    let changed = keys
        .into_iter()
        .filter(|key| scene.set_stroke_select(*key, true))
        .count();
    info!("select_same_layer_strokes: {} strokes newly selected", changed);
    // The layer was resolved, so the command did its job even if all were selected
    Ok(changed.max(1))
}

fn layer_flag(layer: &Layer, flag: LayerFlag) -> bool {
    match flag {
        LayerFlag::Hide => layer.hide,
        LayerFlag::Lock => layer.lock,
    }
}

fn layer_flag_mut(layer: &mut Layer, flag: LayerFlag) -> &mut bool {
    match flag {
        LayerFlag::Hide => &mut layer.hide,
        LayerFlag::Lock => &mut layer.lock,
    }
}

/// Indices of the selection's layers, or of every other layer.
///
/// Locked layers still count as selected so a lock toggle can be reversed.
fn scoped_layers(scene: &Scene, scope: ToggleScope) -> Vec<usize> {
    let selected: Vec<usize> = scene
        .query()
        .including_locked()
        .selected_layers()
        .into_iter()
        .map(|(i, _)| i)
        .collect();
    if selected.is_empty() {
        return Vec::new();
    }
    match scope {
        ToggleScope::Selection => selected,
        ToggleScope::Others => (0..scene.layers.len())
            .filter(|i| !selected.contains(i))
            .collect(),
    }
}

/// Toggle hide or lock on the targeted layers.
///
/// If every target already has the flag it is cleared on all of them,
/// otherwise it is set on all of them.
pub fn toggle_layer_flag(
    scene: &mut Scene,
    flag: LayerFlag,
    scope: ToggleScope,
) -> Result<usize, EditError> {
    let targets = scoped_layers(scene, scope);
    if targets.is_empty() {
        return Ok(0);
    }
    let all_set = targets
        .iter()
        .all(|&i| layer_flag(&scene.layers[i], flag));
    for &i in &targets {
        *layer_flag_mut(&mut scene.layers[i], flag) = !all_set;
    }
    info!(
        "toggle_layer_flag: {:?} {} on {} layers",
        flag,
        if all_set { "cleared" } else { "set" },
        targets.len()
    );
    Ok(targets.len())
}

/// Insert a new layer above the active one and make it active.
///
/// The name defaults to the active layer's name, then to the configured
/// default. Returns the new layer's index.
pub fn create_layer(scene: &mut Scene, name: Option<&str>) -> usize {
    let name = name
        .map(str::to_string)
        .or_else(|| scene.active_layer().map(|l| l.info.clone()))
        .unwrap_or_else(|| scene.config.layer_name.clone());
    let index = scene
        .active_layer_index()
        .map_or(scene.layers.len(), |a| a + 1);
    let index = scene.new_layer(&name, index);
    scene.active_layer = Some(index);
    info!("create_layer: '{}' at {}", scene.layers[index].info, index);
    index
}

fn selected_layer_names(scene: &Scene) -> Vec<String> {
    scene
        .query()
        .selected_layers()
        .into_iter()
        .map(|(_, l)| l.info.clone())
        .collect()
}

/// Create a layer above the active one, masked by the selection's layers
pub fn create_mask_layer(scene: &mut Scene, invert: bool) -> Result<usize, EditError> {
    let names = selected_layer_names(scene);
    if names.is_empty() {
        return Ok(0);
    }
    let index = create_layer(scene, None);
    for name in &names {
        scene.add_mask(index, name, invert);
    }
    Ok(1)
}

/// Mask the active layer with every layer of the selection (except itself)
pub fn add_selection_mask(scene: &mut Scene, invert: bool) -> Result<usize, EditError> {
    let active = scene.active_layer_index().ok_or(EditError::NoActiveLayer)?;
    let own = scene.layers[active].info.clone();
    let names: Vec<String> = selected_layer_names(scene)
        .into_iter()
        .filter(|name| *name != own)
        .collect();
    for name in &names {
        scene.add_mask(active, name, invert);
    }
    info!("add_selection_mask: {} masks added to '{}'", names.len(), own);
    Ok(names.len())
}

/// Remove every mask entry of the active layer that names `name`
pub fn remove_mask(scene: &mut Scene, name: &str) -> Result<usize, EditError> {
    let active = scene.active_layer_index().ok_or(EditError::NoActiveLayer)?;
    Ok(scene.remove_mask(active, name))
}

/// Reorder the active layer
pub fn move_layer_order(scene: &mut Scene, direction: LayerMove) -> Result<usize, EditError> {
    let active = scene.active_layer_index().ok_or(EditError::NoActiveLayer)?;
    let last = scene.layers.len() - 1;
    let target = match direction {
        LayerMove::Up => (active + 1).min(last),
        LayerMove::Down => active.saturating_sub(1),
        LayerMove::Top => last,
        LayerMove::Bottom => 0,
    };
    Ok(usize::from(scene.move_layer(active, target)))
}

/// Regex find/replace over every matching layer name.
///
/// Renamed layers keep unique names and mask references follow them.
pub fn rename_layers(
    scene: &mut Scene,
    pattern: &str,
    replacement: &str,
) -> Result<usize, EditError> {
    let re = Regex::new(pattern)?;
    let mut renamed = 0;
    for i in 0..scene.layers.len() {
        let old = &scene.layers[i].info;
        if !re.is_match(old) {
            continue;
        }
        let new = re.replace_all(old, replacement).into_owned();
        if new != *old {
            scene.rename_layer(i, &new);
            renamed += 1;
        }
    }
    info!("rename_layers: {} layers renamed", renamed);
    Ok(renamed)
}

/// Append a layer filter and make it active
pub fn add_filter(scene: &mut Scene, name: &str, pattern: &str) -> Result<usize, EditError> {
    scene.filters.add(name, pattern);
    Ok(1)
}

/// Remove the active layer filter
pub fn remove_filter(scene: &mut Scene) -> Result<usize, EditError> {
    Ok(usize::from(scene.filters.remove_active().is_some()))
}
