//! Error types for editing operations.
//!
//! None of these reach the host: [`dispatch`](crate::dispatch) logs them and
//! reports a no-op.

use thiserror::Error;

use crate::curve::CurveError;

/// Why a least-squares direction fit failed
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FitError {
    #[error("Need at least 2 points to fit a direction, got {0}")]
    TooFewPoints(usize),
    #[error("Projected points coincide; no direction to fit")]
    Coincident,
}

#[derive(Debug, Error)]
pub enum EditError {
    #[error("No active layer")]
    NoActiveLayer,
    #[error("Active layer '{0}' is locked")]
    LayerLocked(String),
    #[error("Active layer has no active frame")]
    NoActiveFrame,
    #[error("Curve '{name}' is unusable: {source}")]
    Curve {
        name: String,
        #[source]
        source: CurveError,
    },
    #[error("Direction fit failed: {0}")]
    Fit(#[from] FitError),
    #[error("Invalid layer name pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    #[error("Attribute value {value} does not fit field {field}")]
    AttributeMismatch { field: String, value: String },
}

impl EditError {
    pub(crate) fn curve(name: &str, source: CurveError) -> Self {
        EditError::Curve {
            name: name.to_string(),
            source,
        }
    }
}
