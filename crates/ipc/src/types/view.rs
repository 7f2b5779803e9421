//! Viewport transform types.

use serde::{Deserialize, Serialize};

const IDENTITY: [[f32; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Transform pair mapping stroke-local positions into view space and back.
///
/// Matrices are column-major (`columns[i]` is the i-th column), matching the
/// layout of `glam::Mat4::to_cols_array_2d`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    /// view × world
    pub view_world: [[f32; 4]; 4],
    /// (view × world)⁻¹
    pub view_world_inverse: [[f32; 4]; 4],
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ViewTransform {
    /// Identity pair: view space equals local space
    pub const fn identity() -> Self {
        Self {
            view_world: IDENTITY,
            view_world_inverse: IDENTITY,
        }
    }

    /// Build from a forward matrix and its inverse
    pub fn new(view_world: [[f32; 4]; 4], view_world_inverse: [[f32; 4]; 4]) -> Self {
        Self {
            view_world,
            view_world_inverse,
        }
    }
}
