/*!
`version.rs`

Implements the built-in `version` command: application name and version,
dispatcher version, operating mode and home directory.

JSON Output Shape (--json):
{
  "application": "myapp",
  "version": "1.2.3",
  "plugcmd": "0.1.0",
  "mode": "development",
  "home": "/srv/myapp"
}
*/

use anyhow::Result;
use clap::Parser;
use serde::Serialize;

use crate::app::Context;
use crate::registry::Command;

const USAGE: &str = "\
Usage: APPLICATION version [OPTIONS]

  APPLICATION version
  APPLICATION version --json

Options:
      --json   Print machine readable output
";

/// CLI arguments for `version`.
#[derive(Parser, Debug)]
#[command(name = "version", disable_help_flag = true)]
pub struct VersionArgs {
    /// Output JSON instead of human-readable text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct VersionReport {
    pub application: String,
    pub version: String,
    pub plugcmd: String,
    pub mode: String,
    pub home: String,
}

impl VersionReport {
    pub fn collect(ctx: &Context) -> Self {
        VersionReport {
            application: ctx.app.name.clone(),
            version: ctx.app.version.clone(),
            plugcmd: env!("CARGO_PKG_VERSION").to_string(),
            mode: ctx.mode(),
            home: ctx.home().display().to_string(),
        }
    }

    pub fn render(&self) -> String {
        format!(
            "{} {}\n  plugcmd  {}\n  mode     {}\n  home     {}\n",
            self.application, self.version, self.plugcmd, self.mode, self.home
        )
    }
}

pub struct Version {
    ctx: Context,
    usage: String,
}

impl Command for Version {
    fn description(&self) -> &str {
        "Show versions of the application and dispatcher"
    }

    fn usage(&self) -> &str {
        &self.usage
    }

    fn run(&mut self, args: &[String]) -> Result<()> {
        let args = VersionArgs::try_parse_from(super::with_bin("version", args))?;
        let report = VersionReport::collect(&self.ctx);
        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print!("{}", report.render());
        }
        Ok(())
    }
}

pub fn factory(ctx: &Context) -> Result<Box<dyn Command>> {
    Ok(Box::new(Version {
        usage: USAGE.replace("APPLICATION", &ctx.app.name),
        ctx: ctx.clone(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::GlobalOptions;
    use crate::registry::tests::ctx;
    use std::path::PathBuf;

    #[test]
    fn clap_parses_json_flag() {
        let a = VersionArgs::try_parse_from(["version", "--json"]).unwrap();
        assert!(a.json);
        assert!(VersionArgs::try_parse_from(["version", "--bogus"]).is_err());
    }

    #[test]
    fn report_uses_context() {
        let mut c = ctx();
        c.options = GlobalOptions {
            mode: Some("production".into()),
            home: Some(PathBuf::from("/srv/app")),
            help: false,
        };
        let r = VersionReport::collect(&c);
        assert_eq!(r.application, "test");
        assert_eq!(r.version, "0.0.0");
        assert_eq!(r.mode, "production");
        assert_eq!(r.home, "/srv/app");
        assert!(r.render().starts_with("test 0.0.0\n"));
    }

    #[test]
    fn usage_names_application() {
        let cmd = factory(&ctx()).unwrap();
        assert!(cmd.usage().starts_with("Usage: test version"));
    }

    #[test]
    fn run_rejects_unknown_options() {
        let mut cmd = factory(&ctx()).unwrap();
        assert!(cmd.run(&["--nope".to_string()]).is_err());
    }
}
