//! Hosting application and the per-dispatch context handed to commands.

use std::path::PathBuf;
use std::sync::Arc;

use crate::env::Env;
use crate::options::GlobalOptions;

/// The application embedding the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    /// Executable name, substituted for `APPLICATION` in help text.
    pub name: String,
    pub version: String,
}

impl Application {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Application {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// What a command sees when it is constructed: the owning application plus the
/// options frozen for this dispatch.
#[derive(Debug, Clone)]
pub struct Context {
    pub app: Arc<Application>,
    pub options: GlobalOptions,
    pub env: Arc<Env>,
}

impl Context {
    pub fn mode(&self) -> String {
        self.options.effective_mode(&self.env)
    }

    pub fn home(&self) -> PathBuf {
        self.options.effective_home()
    }
}
