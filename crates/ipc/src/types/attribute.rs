//! Selection attribute fields for the read/write attribute commands.

use serde::{Deserialize, Serialize};

use super::Rgba;

/// A stroke-level attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrokeField {
    LineWidth,
    Hardness,
    MaterialIndex,
    FillColor,
}

/// A point-level attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointField {
    Pressure,
    Strength,
    Color,
}

/// Attribute addressed on the current selection.
///
/// Stroke fields read and write selected strokes, point fields read and
/// write selected points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "field")]
pub enum AttributeField {
    Stroke(StrokeField),
    Point(PointField),
}

/// Value carried by an attribute read or write
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Float(f32),
    Int(i64),
    Color(Rgba),
}

impl AttributeValue {
    pub fn as_float(&self) -> Option<f32> {
        match *self {
            AttributeValue::Float(v) => Some(v),
            AttributeValue::Int(v) => Some(v as f32),
            AttributeValue::Color(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match *self {
            AttributeValue::Int(v) => Some(v),
            AttributeValue::Float(v) => Some(v.round() as i64),
            AttributeValue::Color(_) => None,
        }
    }

    pub fn as_color(&self) -> Option<Rgba> {
        match *self {
            AttributeValue::Color(c) => Some(c),
            _ => None,
        }
    }
}
