/*!
Built-in commands.

Each command lives in its own file and exposes:
  - an argument struct deriving `clap::Parser`, parsed with `try_parse_from`
    from the arguments left after global flags were removed,
  - a type implementing `registry::Command`,
  - a `factory` usable with `Registry::register`.

`register_builtins` installs all of them under `BUILTIN_NAMESPACE`.
*/

pub mod config;
pub mod version;

use crate::dispatcher::BUILTIN_NAMESPACE;
use crate::registry::Registry;

/// Register every built-in command under the built-in namespace.
pub fn register_builtins(registry: &mut Registry) -> &mut Registry {
    registry
        .register(BUILTIN_NAMESPACE, "config", config::factory)
        .register(BUILTIN_NAMESPACE, "version", version::factory)
}

/// Prepend a program name so clap sees a full argv.
pub(crate) fn with_bin<'a>(bin: &'a str, args: &'a [String]) -> impl Iterator<Item = &'a str> {
    std::iter::once(bin).chain(args.iter().map(String::as_str))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::tests::ctx;

    #[test]
    fn builtins_are_discoverable() {
        let mut reg = Registry::new();
        register_builtins(&mut reg);
        let names: Vec<_> = reg
            .discover(&[BUILTIN_NAMESPACE.to_string()], &ctx())
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, ["config", "version"]);
    }

    #[test]
    fn with_bin_prepends_name() {
        let args = vec!["--json".to_string()];
        let all: Vec<_> = with_bin("version", &args).collect();
        assert_eq!(all, ["version", "--json"]);
    }
}
