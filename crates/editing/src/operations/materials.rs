//! Material visibility and lock toggles.

use gpen_ipc::{MaterialFlag, ToggleScope};
use tracing::info;

use crate::error::EditError;
use crate::scene::{Material, Scene};

fn material_flag(material: &Material, flag: MaterialFlag) -> bool {
    match flag {
        MaterialFlag::Hide => material.hide,
        MaterialFlag::Lock => material.lock,
    }
}

fn material_flag_mut(material: &mut Material, flag: MaterialFlag) -> &mut bool {
    match flag {
        MaterialFlag::Hide => &mut material.hide,
        MaterialFlag::Lock => &mut material.lock,
    }
}

/// Distinct material slots used by the selection, in order of first use.
///
/// Locked materials and layers are included so a lock toggle can be reversed.
pub fn selected_materials(scene: &Scene) -> Vec<usize> {
    let mut slots = Vec::new();
    for item in scene.query().including_locked().selected_strokes() {
        let slot = item.stroke.material_index;
        if slot < scene.materials.len() && !slots.contains(&slot) {
            slots.push(slot);
        }
    }
    slots
}

/// Toggle hide or lock on the targeted materials.
///
/// Same rule as layers: all set clears, anything else sets.
pub fn toggle_material_flag(
    scene: &mut Scene,
    flag: MaterialFlag,
    scope: ToggleScope,
) -> Result<usize, EditError> {
    let selected = selected_materials(scene);
    if selected.is_empty() {
        return Ok(0);
    }
    let targets: Vec<usize> = match scope {
        ToggleScope::Selection => selected,
        ToggleScope::Others => (0..scene.materials.len())
            .filter(|i| !selected.contains(i))
            .collect(),
    };
    if targets.is_empty() {
        return Ok(0);
    }
    let all_set = targets
        .iter()
        .all(|&i| material_flag(&scene.materials[i], flag));
    for &i in &targets {
        *material_flag_mut(&mut scene.materials[i], flag) = !all_set;
    }
    info!(
        "toggle_material_flag: {:?} {} on {} materials",
        flag,
        if all_set { "cleared" } else { "set" },
        targets.len()
    );
    Ok(targets.len())
}
