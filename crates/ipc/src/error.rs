//! Errors raised while decoding commands from the host.

/// Why a command could not cross the host boundary.
#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    #[error("Malformed command JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Empty command")]
    Empty,

    #[error("Invalid {field} for {command}: {reason}")]
    InvalidParameter {
        command: &'static str,
        field: &'static str,
        reason: String,
    },
}
