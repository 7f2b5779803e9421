//! gpen stroke editing core
//!
//! Operates on a host-owned layered drawing ([`scene::Scene`]):
//! - [`query`] - Read-only traversal honoring lock and active-frame rules
//! - [`scene`] - Drawing data model and its mutation interface
//! - [`curve`] - Named falloff curves (fat stroke, entry/exit taper)
//! - [`geometry`] - Rotation, arc length, color conversion
//! - [`fat_stroke`] - Offset outline generation from a least-squares fit
//! - [`fade_edge`] - Pressure/strength taper at stroke ends
//! - [`nearest_color`] - Color-proximity selection
//! - [`filters`] - Regex layer filters
//! - [`selection`] - Snapshot-driven attribute reads and writes
//! - [`operations`] - One operation per host command, plus [`dispatch`]

pub mod constants;
pub mod curve;
pub mod error;
pub mod fade_edge;
pub mod fat_stroke;
pub mod filters;
pub mod geometry;
pub mod nearest_color;
pub mod operations;
pub mod query;
pub mod scene;
pub mod selection;

pub use curve::{CurveCache, CurveError, FalloffCurve};
pub use error::{EditError, FitError};
pub use filters::{LayerFilter, LayerFilters};
pub use operations::dispatch;
pub use query::SceneQuery;
pub use scene::*;
pub use selection::SelectionSnapshot;

pub use gpen_ipc::{EditCommand, EditStatus};
