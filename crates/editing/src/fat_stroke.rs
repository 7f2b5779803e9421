//! Fat stroke: parallel-offset duplication of selected strokes.
//!
//! For each selected stroke the points are projected into view space, a
//! dominant direction is fitted by least squares, and two offset branches
//! are built by pushing every point sideways (±90° around the view axis)
//! by `width × falloff`. A second `position × falloff` shift uses the +90°
//! direction on both branches so it moves them together instead of apart.
//! Branches are mapped back through the inverse transform and emitted as
//! new strokes.
//!
//! Planning is pure; the scene is only mutated once every selected stroke
//! has been planned, so a failing stroke aborts without partial writes.

use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec2, Vec3};
use gpen_config::FAT_STROKE_CURVE;
use gpen_ipc::{BranchStyle, FatStrokeParams, OffsetMode};
use tracing::{debug, info};

use crate::constants::GEOMETRY_EPSILON;
use crate::curve::{CurveError, FalloffCurve};
use crate::error::{EditError, FitError};
use crate::geometry::{cumulative_lengths, rotate_about_axis};
use crate::scene::{Point, Scene, Stroke, StrokeKey};

/// Which kind of stroke a branch becomes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BranchKind {
    /// Carries the source point attributes
    Line,
    /// Positions only
    Fill,
}

/// New strokes planned for one source stroke
struct StrokePlan {
    source: StrokeKey,
    emitted: Vec<Stroke>,
}

/// Fit the dominant 2D direction of projected points (regress y on x).
///
/// Points with no horizontal spread fall back to the view Y axis. Points
/// that all coincide have no direction and are rejected.
pub fn fit_direction(points: &[Vec3]) -> Result<Vec2, FitError> {
    if points.len() < 2 {
        return Err(FitError::TooFewPoints(points.len()));
    }
    let n = points.len() as f32;
    let mean = points.iter().fold(Vec2::ZERO, |acc, p| acc + p.truncate()) / n;
    let (sxx, sxy, syy) = points.iter().fold((0.0, 0.0, 0.0), |(sxx, sxy, syy), p| {
        let d = p.truncate() - mean;
        (sxx + d.x * d.x, sxy + d.x * d.y, syy + d.y * d.y)
    });

    let spread = sxx + syy;
    if spread <= f32::MIN_POSITIVE {
        return Err(FitError::Coincident);
    }
    if sxx <= GEOMETRY_EPSILON * spread {
        debug!("fit_direction: vertical data, using view Y axis");
        return Ok(Vec2::Y);
    }
    Ok(Vec2::new(1.0, sxy / sxx).normalize())
}

/// Build the two offset branches of a stroke, in local space.
///
/// Branch 0 is offset along +90°, branch 1 along -90°. Each branch has
/// exactly one position per input point.
pub fn offset_branches(
    positions: &[Vec3],
    curve: &FalloffCurve,
    width: f32,
    position: f32,
    view_world: &Mat4,
    view_world_inverse: &Mat4,
) -> Result<[Vec<Vec3>; 2], EditError> {
    let projected: Vec<Vec3> = positions
        .iter()
        .map(|p| view_world.transform_point3(*p))
        .collect();
    let lengths = cumulative_lengths(&projected);
    let total = lengths.last().copied().unwrap_or(0.0);

    let direction = fit_direction(&projected)?;
    let direction = Vec3::new(direction.x, direction.y, 0.0);

    let falloff = lengths
        .iter()
        .map(|length| {
            let t = if total > GEOMETRY_EPSILON { length / total } else { 0.0 };
            curve.evaluate(t)
        })
        .collect::<Result<Vec<f32>, CurveError>>()
        .map_err(|e| EditError::curve(FAT_STROKE_CURVE, e))?;

    let branch = |angle: f32| -> Vec<Vec3> {
        let lateral = rotate_about_axis(direction, Vec3::Z, angle);
        let shift = rotate_about_axis(direction, Vec3::Z, angle.abs());
        projected
            .iter()
            .zip(&falloff)
            .map(|(p, f)| {
                let moved = *p + lateral * (width * f) + shift * (position * f);
                view_world_inverse.transform_point3(moved)
            })
            .collect()
    };

    Ok([branch(FRAC_PI_2), branch(-FRAC_PI_2)])
}

/// Offset-duplicate every selected stroke.
///
/// Returns the number of strokes created.
pub fn fat_stroke(scene: &mut Scene, params: &FatStrokeParams) -> Result<usize, EditError> {
    if params.stroke.is_none() && params.fill.is_none() {
        debug!("fat_stroke: neither stroke nor fill requested");
        return Ok(0);
    }

    let curve = scene.curves.get_or_create(FAT_STROKE_CURVE).clone();
    if curve.is_empty() {
        return Err(EditError::curve(FAT_STROKE_CURVE, CurveError::Empty));
    }
    let view_world = Mat4::from_cols_array_2d(&params.view.view_world);
    let view_world_inverse = Mat4::from_cols_array_2d(&params.view.view_world_inverse);

    let mut plans = Vec::new();
    for item in scene.query().selected_strokes() {
        if item.stroke.points.len() < 2 {
            debug!(
                "fat_stroke: skipping stroke {:?} with {} points",
                item.key,
                item.stroke.points.len()
            );
            continue;
        }
        let positions: Vec<Vec3> = item.stroke.positions().collect();
        let branches = offset_branches(
            &positions,
            &curve,
            params.width,
            params.position,
            &view_world,
            &view_world_inverse,
        )?;

        let mut emitted = Vec::new();
        if let Some(style) = &params.stroke {
            emitted.extend(emit_branches(item.stroke, &branches, BranchKind::Line, style, params.mode));
        }
        if let Some(style) = &params.fill {
            emitted.extend(emit_branches(item.stroke, &branches, BranchKind::Fill, style, params.mode));
        }
        plans.push(StrokePlan {
            source: item.key,
            emitted,
        });
    }

    if plans.is_empty() {
        return Ok(0);
    }

    let mut created = 0;
    for plan in &mut plans {
        for stroke in plan.emitted.drain(..) {
            if scene
                .new_stroke(plan.source.layer, plan.source.frame, stroke)
                .is_some()
            {
                created += 1;
            }
        }
    }
    let removed = if params.keep_source {
        0
    } else {
        scene.remove_strokes(plans.iter().map(|p| p.source))
    };

    info!(
        "fat_stroke: {} sources, {} strokes created, {} removed",
        plans.len(),
        created,
        removed
    );
    Ok(created)
}

/// Turn both branches into strokes: one combined stroke or one per branch
fn emit_branches(
    source: &Stroke,
    branches: &[Vec<Vec3>; 2],
    kind: BranchKind,
    style: &BranchStyle,
    mode: OffsetMode,
) -> Vec<Stroke> {
    match mode {
        OffsetMode::Merge => {
            let merged = branches[0]
                .iter()
                .copied()
                .enumerate()
                .chain(branches[1].iter().copied().enumerate());
            vec![build_stroke(source, merged, kind, style)]
        }
        OffsetMode::Outline => {
            // Second branch runs backwards so the outline closes on itself
            let outline = branches[0]
                .iter()
                .copied()
                .enumerate()
                .chain(branches[1].iter().copied().enumerate().rev());
            vec![build_stroke(source, outline, kind, style)]
        }
        OffsetMode::Split => branches
            .iter()
            .map(|branch| build_stroke(source, branch.iter().copied().enumerate(), kind, style))
            .collect(),
    }
}

/// `points` yields (source point index, new position)
fn build_stroke(
    source: &Stroke,
    points: impl Iterator<Item = (usize, Vec3)>,
    kind: BranchKind,
    style: &BranchStyle,
) -> Stroke {
    let mut stroke = source.empty_like();
    if let Some(material_index) = style.material_index {
        stroke.material_index = material_index;
    }
    match kind {
        BranchKind::Line => {
            stroke.points = points
                .map(|(i, position)| {
                    let src = &source.points[i];
                    Point {
                        position,
                        select: false,
                        pressure: src.pressure,
                        strength: src.strength,
                        vertex_color: style.color.unwrap_or(src.vertex_color),
                    }
                })
                .collect();
        }
        BranchKind::Fill => {
            stroke.points = points.map(|(_, position)| Point::new(position)).collect();
            if let Some(color) = style.color {
                stroke.vertex_color_fill = color;
            }
        }
    }
    stroke
}
