//! Command listing shown when no command was dispatched.

use crate::app::Context;
use crate::registry::Registry;
use crate::utils::format::{Role, StyleOptions, color, tablify, truncate_ellipsis};

/// Default text printed above the command table.
pub const DEFAULT_MESSAGE: &str = "\
Usage: APPLICATION COMMAND [OPTIONS]

  APPLICATION version
  APPLICATION help version

Options (for all commands):
  -h, --help          Get more information on a specific command
      --home <path>   Path to home directory of your application, defaults to
                      the value of PLUGCMD_HOME or the working directory
  -m, --mode <name>   Operating mode for your application, defaults to the
                      value of PLUGCMD_MODE/PLACK_ENV or \"development\"

Commands:
";

/// Default text printed below the command table.
pub const DEFAULT_HINT: &str = "
See 'APPLICATION help COMMAND' for more information on a specific command.
";

/// Renders the sorted command listing framed by a message and a hint.
#[derive(Debug, Clone)]
pub struct HelpPrinter {
    pub message: String,
    pub hint: String,
    pub style: StyleOptions,
}

impl Default for HelpPrinter {
    fn default() -> Self {
        HelpPrinter {
            message: DEFAULT_MESSAGE.to_string(),
            hint: DEFAULT_HINT.to_string(),
            style: StyleOptions::plain(),
        }
    }
}

impl HelpPrinter {
    /// Discover every command under `namespaces` (load failures skipped) and
    /// render them sorted by short name.
    pub fn list(&self, registry: &Registry, namespaces: &[String], ctx: &Context) -> String {
        let mut commands = registry.discover(namespaces, ctx);
        commands.sort_by(|a, b| a.name.cmp(&b.name));

        let name_width = commands
            .iter()
            .map(|d| d.name.chars().count() + 1)
            .max()
            .unwrap_or(0);
        let desc_width = self.style.term_width.saturating_sub(name_width + 2).max(20);

        let rows: Vec<Vec<String>> = commands
            .iter()
            .map(|d| {
                vec![
                    format!(" {}", color(Role::Bold, &d.name, &self.style)),
                    truncate_ellipsis(d.description.trim_end(), desc_width),
                ]
            })
            .collect();

        let app_name = &ctx.app.name;
        let mut out = self.message.replace("APPLICATION", app_name);
        out.push_str(&tablify(&rows));
        out.push_str(&self.hint.replace("APPLICATION", app_name));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::tests::{ctx, stub};

    fn printer() -> HelpPrinter {
        HelpPrinter {
            message: "Commands:\n".into(),
            hint: "\nSee 'APPLICATION help COMMAND'.\n".into(),
            style: StyleOptions::plain(),
        }
    }

    #[test]
    fn listing_is_sorted_by_name() {
        let mut reg = Registry::new();
        reg.register("app", "zeta", stub("Last one"));
        reg.register("app", "alpha", stub("First one"));

        let out = printer().list(&reg, &["app".to_string()], &ctx());
        assert_eq!(
            out,
            "Commands:\n alpha  First one\n zeta   Last one\n\nSee 'test help COMMAND'.\n"
        );
    }

    #[test]
    fn sorting_ignores_namespace_order() {
        let mut reg = Registry::new();
        reg.register("first", "zeta", stub("z"));
        reg.register("second", "alpha", stub("a"));

        let namespaces = vec!["first".to_string(), "second".to_string()];
        let out = printer().list(&reg, &namespaces, &ctx());
        let alpha = out.find(" alpha").unwrap();
        let zeta = out.find(" zeta").unwrap();
        assert!(alpha < zeta);
    }

    #[test]
    fn empty_listing_keeps_frame() {
        let reg = Registry::new();
        let out = printer().list(&reg, &["app".to_string()], &ctx());
        assert_eq!(out, "Commands:\n\nSee 'test help COMMAND'.\n");
    }

    #[test]
    fn default_text_names_application() {
        let reg = Registry::new();
        let out = HelpPrinter::default().list(&reg, &[], &ctx());
        assert!(out.starts_with("Usage: test COMMAND [OPTIONS]"));
        assert!(out.contains("See 'test help COMMAND'"));
        assert!(!out.contains("APPLICATION"));
    }

    #[test]
    fn long_descriptions_are_truncated() {
        let mut reg = Registry::new();
        let long = "x".repeat(300);
        reg.register("app", "big", stub(&long));
        let out = printer().list(&reg, &["app".to_string()], &ctx());
        assert!(out.contains('…'));
        assert!(out.lines().all(|l| l.chars().count() <= 100));
    }
}
