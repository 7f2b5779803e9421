//! Attribute commands over an explicit selection snapshot.
//!
//! A [`SelectionSnapshot`] records which strokes and points were selected
//! when it was captured. Reads return the first element's value (strokes
//! in selection order, points in document order); writes apply a value to
//! every element of the snapshot.

use gpen_ipc::{AttributeField, AttributeValue, PointField, StrokeField};
use tracing::debug;

use crate::error::EditError;
use crate::scene::{Point, PointKey, Rgba, Scene, Stroke, StrokeKey};

/// Keys of the selection at capture time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSnapshot {
    strokes: Vec<StrokeKey>,
    points: Vec<PointKey>,
}

impl SelectionSnapshot {
    pub fn capture(scene: &Scene) -> Self {
        let query = scene.query();
        Self {
            strokes: query
                .ordered_selected_strokes()
                .into_iter()
                .map(|item| item.key)
                .collect(),
            points: query.selected_points().map(|item| item.key).collect(),
        }
    }

    pub fn strokes(&self) -> &[StrokeKey] {
        &self.strokes
    }

    pub fn points(&self) -> &[PointKey] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty() && self.points.is_empty()
    }
}

fn read_stroke(stroke: &Stroke, field: StrokeField) -> AttributeValue {
    match field {
        StrokeField::LineWidth => AttributeValue::Int(i64::from(stroke.line_width)),
        StrokeField::Hardness => AttributeValue::Float(stroke.hardness),
        StrokeField::MaterialIndex => AttributeValue::Int(stroke.material_index as i64),
        StrokeField::FillColor => AttributeValue::Color(stroke.vertex_color_fill),
    }
}

fn read_point(point: &Point, field: PointField) -> AttributeValue {
    match field {
        PointField::Pressure => AttributeValue::Float(point.pressure),
        PointField::Strength => AttributeValue::Float(point.strength),
        PointField::Color => AttributeValue::Color(point.vertex_color),
    }
}

/// Value of `field` on the first element of the snapshot, or `default`
pub fn read_selected_attribute(
    scene: &Scene,
    snapshot: &SelectionSnapshot,
    field: AttributeField,
    default: AttributeValue,
) -> AttributeValue {
    match field {
        AttributeField::Stroke(field) => snapshot
            .strokes
            .iter()
            .find_map(|key| scene.stroke(*key))
            .map_or(default, |stroke| read_stroke(stroke, field)),
        AttributeField::Point(field) => snapshot
            .points
            .iter()
            .find_map(|key| scene.stroke(key.stroke)?.points.get(key.point))
            .map_or(default, |point| read_point(point, field)),
    }
}

/// A value already checked against its field
#[derive(Debug, Clone, Copy)]
enum Checked {
    LineWidth(i32),
    Hardness(f32),
    MaterialIndex(usize),
    FillColor(Rgba),
    Pressure(f32),
    Strength(f32),
    Color(Rgba),
}

fn check(field: AttributeField, value: AttributeValue) -> Result<Checked, EditError> {
    let checked = match field {
        AttributeField::Stroke(StrokeField::LineWidth) => value
            .as_int()
            .and_then(|v| i32::try_from(v).ok())
            .map(|v| Checked::LineWidth(v.max(0))),
        AttributeField::Stroke(StrokeField::Hardness) => {
            value.as_float().map(|v| Checked::Hardness(v.clamp(0.0, 1.0)))
        }
        AttributeField::Stroke(StrokeField::MaterialIndex) => value
            .as_int()
            .and_then(|v| usize::try_from(v).ok())
            .map(Checked::MaterialIndex),
        AttributeField::Stroke(StrokeField::FillColor) => value.as_color().map(Checked::FillColor),
        AttributeField::Point(PointField::Pressure) => {
            value.as_float().map(|v| Checked::Pressure(v.max(0.0)))
        }
        AttributeField::Point(PointField::Strength) => {
            value.as_float().map(|v| Checked::Strength(v.clamp(0.0, 1.0)))
        }
        AttributeField::Point(PointField::Color) => value.as_color().map(Checked::Color),
    };
    checked.ok_or_else(|| EditError::AttributeMismatch {
        field: format!("{field:?}"),
        value: format!("{value:?}"),
    })
}

/// Write `value` to `field` on every element of the snapshot.
///
/// The value is checked before anything is written. Returns the number of
/// strokes or points written.
pub fn write_selected_attribute(
    scene: &mut Scene,
    snapshot: &SelectionSnapshot,
    field: AttributeField,
    value: AttributeValue,
) -> Result<usize, EditError> {
    let checked = check(field, value)?;
    let mut written = 0;
    match field {
        AttributeField::Stroke(_) => {
            for key in &snapshot.strokes {
                let Some(stroke) = scene.stroke_mut(*key) else {
                    continue;
                };
                match checked {
                    Checked::LineWidth(v) => stroke.line_width = v,
                    Checked::Hardness(v) => stroke.hardness = v,
                    Checked::MaterialIndex(v) => stroke.material_index = v,
                    Checked::FillColor(v) => stroke.vertex_color_fill = v,
                    _ => continue,
                }
                written += 1;
            }
        }
        AttributeField::Point(_) => {
            for key in &snapshot.points {
                let Some(point) = scene.point_mut(*key) else {
                    continue;
                };
                match checked {
                    Checked::Pressure(v) => point.pressure = v,
                    Checked::Strength(v) => point.strength = v,
                    Checked::Color(v) => point.vertex_color = v,
                    _ => continue,
                }
                written += 1;
            }
        }
    }
    debug!("write_selected_attribute: {:?} written to {}", field, written);
    Ok(written)
}
