//! Type definitions shared by commands.

mod attribute;
mod view;

pub use attribute::*;
pub use view::*;

/// Linear RGBA color, each channel nominally 0.0-1.0
pub type Rgba = [f32; 4];
