//! Dispatcher error taxonomy.
//!
//! Only explicit resolution and command execution surface errors; discovery
//! sweeps swallow load failures and malformed names fall through to the listing.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    /// No namespace provides the requested command.
    #[error("Unknown command \"{name}\", maybe you need to install it?")]
    UnknownCommand { name: String },

    /// The requested command exists but could not be constructed.
    #[error("Failed to load command \"{qualified}\": {source:#}")]
    LoadFailure {
        qualified: String,
        #[source]
        source: anyhow::Error,
    },

    /// The command itself returned an error.
    #[error(transparent)]
    Command(#[from] anyhow::Error),
}

impl DispatchError {
    /// Process exit code the entry point should use.
    pub fn exit_code(&self) -> i32 {
        match self {
            DispatchError::UnknownCommand { .. } | DispatchError::LoadFailure { .. } => 2,
            DispatchError::Command(_) => 1,
        }
    }
}
