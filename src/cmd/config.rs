/*!
`config.rs`

Implements the built-in `config` command: dumps the global options in effect
for this dispatch, with mode and home resolved, as YAML (default) or JSON.
*/

use anyhow::Result;
use clap::Parser;
use serde::Serialize;

use crate::app::Context;
use crate::registry::Command;

const USAGE: &str = "\
Usage: APPLICATION config [OPTIONS]

  APPLICATION config
  APPLICATION config --json
  APPLICATION config -m production --home /srv/app

Options:
      --json   Print JSON instead of YAML
";

/// CLI arguments for `config`.
#[derive(Parser, Debug)]
#[command(name = "config", disable_help_flag = true)]
pub struct ConfigArgs {
    /// Output JSON instead of YAML
    #[arg(long)]
    pub json: bool,
}

/// Effective configuration as shown to the user.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub application: String,
    pub mode: String,
    pub home: String,
    pub help: bool,
    /// Raw overrides before fallbacks were applied.
    pub overrides: crate::options::GlobalOptions,
}

impl EffectiveConfig {
    pub fn collect(ctx: &Context) -> Self {
        EffectiveConfig {
            application: ctx.app.name.clone(),
            mode: ctx.mode(),
            home: ctx.home().display().to_string(),
            help: ctx.options.help,
            overrides: ctx.options.clone(),
        }
    }
}

pub struct Config {
    ctx: Context,
    usage: String,
}

impl Command for Config {
    fn description(&self) -> &str {
        "Show the effective configuration"
    }

    fn usage(&self) -> &str {
        &self.usage
    }

    fn run(&mut self, args: &[String]) -> Result<()> {
        let args = ConfigArgs::try_parse_from(super::with_bin("config", args))?;
        let effective = EffectiveConfig::collect(&self.ctx);
        if args.json {
            println!("{}", serde_json::to_string_pretty(&effective)?);
        } else {
            print!("{}", serde_yaml::to_string(&effective)?);
        }
        Ok(())
    }
}

pub fn factory(ctx: &Context) -> Result<Box<dyn Command>> {
    Ok(Box::new(Config {
        usage: USAGE.replace("APPLICATION", &ctx.app.name),
        ctx: ctx.clone(),
    }))
}
