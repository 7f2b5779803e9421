//! Layer and material command types.

use serde::{Deserialize, Serialize};

/// Layer flag affected by a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayerFlag {
    Hide,
    Lock,
}

/// Material display flag affected by a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaterialFlag {
    Hide,
    Lock,
}

/// Which side of the selection a toggle targets.
///
/// `Selection` targets the layers/materials of the selected strokes,
/// `Others` targets everything else (isolate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToggleScope {
    #[default]
    Selection,
    Others,
}

/// Reordering of the active layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayerMove {
    Up,
    Down,
    Top,
    Bottom,
}
