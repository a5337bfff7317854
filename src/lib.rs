//! plugcmd - pluggable command dispatcher.
//!
//! Commands register under ordered namespaces; `Commands` detects the
//! deployment environment, strips the global flags (`-h/--help`, `--home`,
//! `-m/--mode`), then either dispatches to one command or renders a sorted
//! listing of everything registered.
//!
//! ```no_run
//! use plugcmd::{Application, Commands, Env, Outcome};
//!
//! let mut commands = Commands::new(Application::new("myapp", "1.0.0"), Env::from_process());
//! plugcmd::cmd::register_builtins(commands.registry_mut());
//! match commands.start(std::env::args().skip(1).collect()) {
//!     Ok(Outcome::Listing(text)) => print!("{text}"),
//!     Ok(_) => {}
//!     Err(e) => {
//!         eprintln!("{e}");
//!         std::process::exit(e.exit_code());
//!     }
//! }
//! ```

pub mod utils;

pub mod app;
pub mod cmd;
pub mod dispatcher;
pub mod env;
pub mod error;
pub mod help;
pub mod options;
pub mod registry;

pub use app::{Application, Context};
pub use dispatcher::{BUILTIN_NAMESPACE, Commands, Invocation, Outcome};
pub use env::Env;
pub use error::DispatchError;
pub use help::HelpPrinter;
pub use options::{GlobalOptions, OptionPreparser};
pub use registry::{Command, CommandDescriptor, Registry};
