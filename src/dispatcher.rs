/*!
Command dispatcher.

`Commands::run(name, args)` walks a fixed sequence:

  1. library-loader short-circuit (`<PREFIX>_APP_LOADER`)
  2. deployment detection, unless `<PREFIX>_NO_DETECT`
  3. global option pre-parsing, skipped under CGI/PSGI
  4. dispatch-or-list decision (safe name, not a bare `help`)
  5. `help <command>` extraction and help-mode
  6. resolution across namespaces, first match wins
  7. construction and `help` / `run`

Errors are returned to the caller; only the entry point decides how the
process exits.
*/

use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::app::{Application, Context};
use crate::env::{self, Env, EnvVars, HARNESS_MARKER};
use crate::error::DispatchError;
use crate::help::HelpPrinter;
use crate::options::{GlobalOptions, OptionPreparser};
use crate::registry::Registry;
use crate::{log_debug, log_trace};

/// Namespace holding the built-in commands.
pub const BUILTIN_NAMESPACE: &str = "plugcmd::command";

/// What a dispatch produced.
#[derive(Debug)]
pub enum Outcome {
    /// Running as an embedded library; nothing was dispatched.
    Loaded(Arc<Application>),
    /// No command selected; the rendered listing.
    Listing(String),
    /// Listing hidden because a test harness is active.
    Suppressed,
    /// A command ran to completion.
    Ran,
}

/// One resolved request: command name, its arguments and help-mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub name: String,
    pub args: Vec<String>,
    pub help: bool,
}

/// Safe command names: a word character followed by one or more word
/// characters or hyphens.
pub fn is_valid_name(name: &str) -> bool {
    static NAME_RE: OnceLock<Option<Regex>> = OnceLock::new();
    NAME_RE
        .get_or_init(|| Regex::new(r"^\w[\w-]+$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(name))
}

/// Dispatcher owning the registry, namespaces and listing text.
pub struct Commands {
    app: Arc<Application>,
    env: Arc<Env>,
    vars: EnvVars,
    namespaces: Vec<String>,
    registry: Registry,
    printer: HelpPrinter,
    seed: GlobalOptions,
    options: GlobalOptions,
}

impl Commands {
    /// Dispatcher searching only the built-in namespace, with options seeded
    /// from `env` using the default variable prefix.
    pub fn new(app: Application, env: Env) -> Self {
        Self::with_prefix(app, env, crate::env::DEFAULT_PREFIX)
    }

    pub fn with_prefix(app: Application, env: Env, prefix: &str) -> Self {
        let vars = EnvVars::with_prefix(prefix);
        let seed = GlobalOptions::from_env(&env, &vars);
        Commands {
            app: Arc::new(app),
            env: Arc::new(env),
            vars,
            namespaces: vec![BUILTIN_NAMESPACE.to_string()],
            registry: Registry::new(),
            printer: HelpPrinter::default(),
            options: seed.clone(),
            seed,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.printer.message = message.into();
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.printer.hint = hint.into();
        self
    }

    pub fn with_printer(mut self, printer: HelpPrinter) -> Self {
        self.printer = printer;
        self
    }

    /// Replace the option seed (normally derived from the environment).
    pub fn with_options(mut self, options: GlobalOptions) -> Self {
        self.options = options.clone();
        self.seed = options;
        self
    }

    pub fn app(&self) -> &Arc<Application> {
        &self.app
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn vars(&self) -> &EnvVars {
        &self.vars
    }

    pub fn namespaces(&self) -> &[String] {
        &self.namespaces
    }

    /// Namespaces are searched in order; the first match wins.
    pub fn namespaces_mut(&mut self) -> &mut Vec<String> {
        &mut self.namespaces
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Options in effect for the most recent dispatch.
    pub fn options(&self) -> &GlobalOptions {
        &self.options
    }

    fn context(&self) -> Context {
        Context {
            app: Arc::clone(&self.app),
            options: self.options.clone(),
            env: Arc::clone(&self.env),
        }
    }

    fn detected(&self) -> Option<&'static str> {
        if self.env.flag(&self.vars.no_detect) {
            return None;
        }
        env::deployment(&self.env)
    }

    /// Entry point for a whole argument vector (without the program name).
    ///
    /// Global flags are removed first so they may precede the command name.
    pub fn start(&mut self, argv: Vec<String>) -> Result<Outcome, DispatchError> {
        self.options = self.seed.clone();
        let mut argv = self.preparse(argv).into_iter();
        let name = argv.next();
        self.execute(name.as_deref(), argv.collect())
    }

    /// Dispatch `name` with `args`, or render the listing.
    pub fn run(&mut self, name: Option<&str>, args: Vec<String>) -> Result<Outcome, DispatchError> {
        self.options = self.seed.clone();
        self.execute(name, args)
    }

    fn execute(&mut self, name: Option<&str>, args: Vec<String>) -> Result<Outcome, DispatchError> {
        if self.env.contains(&self.vars.app_loader) {
            log_debug!("{} set; skipping dispatch", self.vars.app_loader);
            return Ok(Outcome::Loaded(Arc::clone(&self.app)));
        }

        let name = if self.env.flag(&self.vars.no_detect) {
            name.map(str::to_string)
        } else {
            env::detect(&self.env, name)
        };
        log_trace!("dispatching name {:?}", name);
        let args = self.preparse(args);

        match self.invocation(name, args) {
            Some(invocation) => self.dispatch(invocation),
            None => Ok(self.listing()),
        }
    }

    /// Move global flags from `args` into the current options. Arguments are
    /// meaningless under CGI/PSGI, so nothing is consumed there.
    fn preparse(&mut self, args: Vec<String>) -> Vec<String> {
        if self.detected().is_some() {
            return args;
        }
        let mut pre = OptionPreparser::new(std::mem::take(&mut self.options));
        let rest = pre.parse(args);
        self.options = pre.into_options();
        rest
    }

    /// Decide whether to dispatch and, if so, build the invocation.
    fn invocation(&self, name: Option<String>, mut args: Vec<String>) -> Option<Invocation> {
        let name = name?;
        if !is_valid_name(&name) {
            log_trace!("refusing command name {:?}", name);
            return None;
        }
        if name == "help" && args.first().is_none_or(|a| a.is_empty()) {
            return None;
        }

        let (name, help) = if name == "help" {
            (args.remove(0), true)
        } else {
            (name, false)
        };
        if !is_valid_name(&name) {
            log_trace!("refusing command name {:?}", name);
            return None;
        }

        Some(Invocation {
            name,
            args,
            help: help || self.options.help,
        })
    }

    fn dispatch(&self, invocation: Invocation) -> Result<Outcome, DispatchError> {
        let ctx = self.context();
        let Some(mut resolved) = self
            .registry
            .resolve(&invocation.name, &self.namespaces, &ctx)?
        else {
            return Err(DispatchError::UnknownCommand {
                name: invocation.name,
            });
        };

        log_debug!(
            "dispatching {} (help={})",
            resolved.descriptor.qualified,
            invocation.help
        );
        if invocation.help {
            resolved.command.help(&invocation.args)?;
        } else {
            resolved.command.run(&invocation.args)?;
        }
        Ok(Outcome::Ran)
    }

    fn listing(&self) -> Outcome {
        if self.env.flag(HARNESS_MARKER) {
            return Outcome::Suppressed;
        }
        Outcome::Listing(self.printer.list(&self.registry, &self.namespaces, &self.context()))
    }
}
