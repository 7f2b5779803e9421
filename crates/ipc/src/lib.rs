//! Command protocol for gpen
//!
//! Defines every command a drawing host can issue against the stroke editing
//! core, and the status it receives back. Commands cross the boundary as
//! JSON with a `type`/`data` envelope.

pub mod commands;
pub mod error;
pub mod types;

pub use commands::*;
pub use error::IpcError;
pub use types::*;

use serde::{Deserialize, Serialize};

/// Outcome of one command invocation.
///
/// Precondition failures never surface as errors; they resolve to `NoOp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditStatus {
    Finished,
    NoOp,
}

impl EditStatus {
    pub fn is_finished(self) -> bool {
        matches!(self, EditStatus::Finished)
    }
}

/// Decode a command from its JSON form and check its parameters
pub fn decode_command(json: &str) -> Result<EditCommand, IpcError> {
    if json.trim().is_empty() {
        return Err(IpcError::Empty);
    }
    let command: EditCommand = serde_json::from_str(json)?;
    command.validate()?;
    Ok(command)
}

/// Encode a command to its JSON form
pub fn encode_command(command: &EditCommand) -> Result<String, IpcError> {
    Ok(serde_json::to_string(command)?)
}
