/*!
Command registry.

Commands are registered explicitly under a namespace together with a factory.
Namespaces are plain string prefixes (`"myapp::command"`); the qualified name
of a command is `"<namespace>::<name>"`.

Two lookups:
  - `resolve`  : one command by short name, namespaces in order, first match
                 wins. A failing factory is fatal for the caller.
  - `discover` : every command, best effort. Failing factories are skipped and
                 the first successfully constructed command per short name wins.
*/

use anyhow::Result;
use serde::Serialize;

use crate::app::Context;
use crate::error::DispatchError;
use crate::{log_debug, log_trace};

/// A pluggable unit of CLI behavior.
pub trait Command {
    /// One-line summary shown in the command listing.
    fn description(&self) -> &str;

    /// Usage text printed by the default `help`.
    fn usage(&self) -> &str;

    /// Execute with the arguments left after global flags were removed.
    fn run(&mut self, args: &[String]) -> Result<()>;

    fn help(&mut self, _args: &[String]) -> Result<()> {
        print!("{}", self.usage());
        Ok(())
    }
}

/// Constructs a command for one dispatch.
pub type Factory = Box<dyn Fn(&Context) -> Result<Box<dyn Command>>>;

/// Static facts about a registered command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandDescriptor {
    pub qualified: String,
    pub name: String,
    pub description: String,
    pub usage: String,
}

impl CommandDescriptor {
    fn from_command(qualified: String, name: &str, command: &dyn Command) -> Self {
        CommandDescriptor {
            qualified,
            name: name.to_string(),
            description: command.description().to_string(),
            usage: command.usage().to_string(),
        }
    }
}

/// A command resolved for dispatch: its descriptor plus the live instance.
pub struct Resolved {
    pub descriptor: CommandDescriptor,
    pub command: Box<dyn Command>,
}

struct Entry {
    namespace: String,
    name: String,
    factory: Factory,
}

impl Entry {
    fn qualified(&self) -> String {
        qualify(&self.namespace, &self.name)
    }
}

fn qualify(namespace: &str, name: &str) -> String {
    format!("{namespace}::{name}")
}

/// Explicitly populated command registry.
#[derive(Default)]
pub struct Registry {
    entries: Vec<Entry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` under `namespace`. Re-registering the same qualified
    /// name replaces the earlier factory.
    pub fn register<F>(&mut self, namespace: &str, name: &str, factory: F) -> &mut Self
    where
        F: Fn(&Context) -> Result<Box<dyn Command>> + 'static,
    {
        let factory: Factory = Box::new(factory);
        match self
            .entries
            .iter_mut()
            .find(|e| e.namespace == namespace && e.name == name)
        {
            Some(existing) => existing.factory = factory,
            None => self.entries.push(Entry {
                namespace: namespace.to_string(),
                name: name.to_string(),
                factory,
            }),
        }
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn lookup(&self, namespace: &str, name: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|e| e.namespace == namespace && e.name == name)
    }

    /// Find and construct `name`, searching `namespaces` in order.
    ///
    /// Returns `Ok(None)` when no namespace provides it and
    /// `DispatchError::LoadFailure` when the first match fails to construct.
    pub fn resolve(
        &self,
        name: &str,
        namespaces: &[String],
        ctx: &Context,
    ) -> Result<Option<Resolved>, DispatchError> {
        for ns in namespaces {
            let Some(entry) = self.lookup(ns, name) else {
                log_trace!("no {} in namespace {}", name, ns);
                continue;
            };
            let qualified = entry.qualified();
            let command = (entry.factory)(ctx).map_err(|source| DispatchError::LoadFailure {
                qualified: qualified.clone(),
                source,
            })?;
            log_debug!("resolved {} to {}", name, qualified);
            return Ok(Some(Resolved {
                descriptor: CommandDescriptor::from_command(qualified, name, command.as_ref()),
                command,
            }));
        }
        Ok(None)
    }

    /// Describe every constructible command under `namespaces`.
    ///
    /// Output follows namespace order, then registration order.
    pub fn discover(&self, namespaces: &[String], ctx: &Context) -> Vec<CommandDescriptor> {
        let mut found: Vec<CommandDescriptor> = Vec::new();
        for ns in namespaces {
            for entry in self.entries.iter().filter(|e| &e.namespace == ns) {
                if found.iter().any(|d| d.name == entry.name) {
                    continue;
                }
                match (entry.factory)(ctx) {
                    Ok(command) => found.push(CommandDescriptor::from_command(
                        entry.qualified(),
                        &entry.name,
                        command.as_ref(),
                    )),
                    Err(e) => log_debug!("skipping {}: {e:#}", entry.qualified()),
                }
            }
        }
        found
    }
}
