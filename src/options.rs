/*!
Global options shared by every command, and the pre-parser that pulls them
out of an argument vector before command-specific parsing.

Recognized anywhere in the vector (consumed):
  -h, --help
  --home <path>   | --home=<path>
  -m <name>       | -m=<name> | --mode <name> | --mode=<name>

Everything else, unknown options included, is forwarded in its original
relative order. `--` stops the scan; it and all following tokens are forwarded.
*/

use std::path::PathBuf;

use serde::Serialize;

use crate::env::{Env, EnvVars, PSGI_MARKER};

/// Mode used when neither a flag nor the environment names one.
pub const DEFAULT_MODE: &str = "development";

/// Options every command can rely on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GlobalOptions {
    pub help: bool,
    pub home: Option<PathBuf>,
    pub mode: Option<String>,
}

impl GlobalOptions {
    /// Seed from `<PREFIX>_HELP`, `<PREFIX>_HOME` and `<PREFIX>_MODE`.
    /// Empty values are treated as unset.
    pub fn from_env(env: &Env, vars: &EnvVars) -> Self {
        let non_empty = |key: &str| env.get(key).filter(|v| !v.is_empty());
        GlobalOptions {
            help: env.flag(&vars.help),
            home: non_empty(&vars.home).map(PathBuf::from),
            mode: non_empty(&vars.mode).map(str::to_string),
        }
    }

    /// Mode override, else the PSGI adapter's environment, else `development`.
    pub fn effective_mode(&self, env: &Env) -> String {
        self.mode
            .clone()
            .or_else(|| {
                env.get(PSGI_MARKER)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| DEFAULT_MODE.to_string())
    }

    /// Home override, else the current working directory.
    pub fn effective_home(&self) -> PathBuf {
        self.home
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Extracts global flags from argument vectors into a `GlobalOptions`.
#[derive(Debug, Clone, Default)]
pub struct OptionPreparser {
    options: GlobalOptions,
}

impl OptionPreparser {
    /// Start from already seeded options (usually `GlobalOptions::from_env`).
    pub fn new(seed: GlobalOptions) -> Self {
        OptionPreparser { options: seed }
    }

    /// Consume recognized flags from `args`, returning the remaining tokens.
    ///
    /// Later flags overwrite earlier values. A value flag at the very end with
    /// nothing after it is forwarded untouched.
    pub fn parse(&mut self, args: Vec<String>) -> Vec<String> {
        let mut rest = Vec::with_capacity(args.len());
        let mut iter = args.into_iter();

        while let Some(arg) = iter.next() {
            if arg == "--" {
                rest.push(arg);
                rest.extend(iter.by_ref());
                break;
            }

            match arg.as_str() {
                "-h" | "--help" => {
                    self.options.help = true;
                    continue;
                }
                "--home" | "-m" | "--mode" => {
                    let Some(value) = iter.next() else {
                        rest.push(arg);
                        break;
                    };
                    self.apply(&arg, value);
                    continue;
                }
                _ => {}
            }

            if let Some((flag, value)) = arg.split_once('=')
                && matches!(flag, "--home" | "-m" | "--mode")
            {
                self.apply(flag, value.to_string());
                continue;
            }

            rest.push(arg);
        }

        rest
    }

    /// An empty value clears the option, matching how empty env values are read.
    fn apply(&mut self, flag: &str, value: String) {
        let value = Some(value).filter(|v| !v.is_empty());
        if flag == "--home" {
            self.options.home = value.map(PathBuf::from);
        } else {
            self.options.mode = value;
        }
    }

    pub fn options(&self) -> &GlobalOptions {
        &self.options
    }

    pub fn into_options(self) -> GlobalOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn extracts_flags_anywhere() {
        let mut p = OptionPreparser::default();
        let rest = p.parse(argv(&["foo", "--home", "/srv/app", "-x", "bar", "-m", "production"]));
        assert_eq!(rest, argv(&["foo", "-x", "bar"]));
        assert_eq!(p.options().home, Some(PathBuf::from("/srv/app")));
        assert_eq!(p.options().mode.as_deref(), Some("production"));
        assert!(!p.options().help);
    }

    #[test]
    fn help_short_and_long() {
        let mut p = OptionPreparser::default();
        assert_eq!(p.parse(argv(&["-h", "a"])), argv(&["a"]));
        assert!(p.options().help);

        let mut p = OptionPreparser::default();
        assert_eq!(p.parse(argv(&["a", "--help"])), argv(&["a"]));
        assert!(p.options().help);
    }

    #[test]
    fn equals_forms() {
        let mut p = OptionPreparser::default();
        let rest = p.parse(argv(&["--mode=test", "--home=/tmp", "-m=staging", "--verbose=2"]));
        assert_eq!(rest, argv(&["--verbose=2"]));
        assert_eq!(p.options().mode.as_deref(), Some("staging"));
        assert_eq!(p.options().home, Some(PathBuf::from("/tmp")));
    }

    #[test]
    fn unknown_options_keep_order() {
        let mut p = OptionPreparser::default();
        let rest = p.parse(argv(&["-v", "--json", "x", "-h", "--long", "y"]));
        assert_eq!(rest, argv(&["-v", "--json", "x", "--long", "y"]));
    }

    #[test]
    fn double_dash_stops_scan() {
        let mut p = OptionPreparser::default();
        let rest = p.parse(argv(&["a", "--", "-h", "--mode", "x"]));
        assert_eq!(rest, argv(&["a", "--", "-h", "--mode", "x"]));
        assert!(!p.options().help);
        assert_eq!(p.options().mode, None);
    }

    #[test]
    fn dangling_value_flag_is_forwarded() {
        let mut p = OptionPreparser::default();
        let rest = p.parse(argv(&["a", "--mode"]));
        assert_eq!(rest, argv(&["a", "--mode"]));
        assert_eq!(p.options().mode, None);
    }

    #[test]
    fn flags_override_env_and_last_wins() {
        let env = Env::from_pairs([("PLUGCMD_MODE", "production"), ("PLUGCMD_HOME", "/env")]);
        let seed = GlobalOptions::from_env(&env, &EnvVars::default());
        assert_eq!(seed.mode.as_deref(), Some("production"));

        let mut p = OptionPreparser::new(seed);
        p.parse(argv(&["-m", "test", "--mode", "staging"]));
        let opts = p.into_options();
        assert_eq!(opts.mode.as_deref(), Some("staging"));
        assert_eq!(opts.home, Some(PathBuf::from("/env")));
    }

    #[test]
    fn empty_values_clear_the_option() {
        let seed = GlobalOptions {
            home: Some(PathBuf::from("/env/home")),
            mode: Some("from-env".into()),
            ..Default::default()
        };
        let mut pre = OptionPreparser::new(seed);
        let rest = pre.parse(argv(&["--mode=", "--home=", "run"]));
        assert_eq!(rest, argv(&["run"]));
        assert_eq!(pre.options().mode, None);
        assert_eq!(pre.options().home, None);

        let mut pre = OptionPreparser::new(GlobalOptions::default());
        pre.parse(argv(&["-m", "", "--home", ""]));
        assert_eq!(pre.options().mode, None);
        assert_eq!(pre.options().home, None);

        let opts = pre.into_options();
        assert_eq!(opts.effective_mode(&Env::default()), "development");
        let env = Env::from_pairs([("PLACK_ENV", "deployment")]);
        assert_eq!(opts.effective_mode(&env), "deployment");
        assert_ne!(opts.effective_home(), PathBuf::new());
    }

    #[test]
    fn from_env_reads_help_flag() {
        let env = Env::from_pairs([("PLUGCMD_HELP", "1"), ("PLUGCMD_MODE", "")]);
        let opts = GlobalOptions::from_env(&env, &EnvVars::default());
        assert!(opts.help);
        assert_eq!(opts.mode, None);
    }

    #[test]
    fn effective_mode_fallbacks() {
        let opts = GlobalOptions::default();
        assert_eq!(opts.effective_mode(&Env::default()), "development");

        let env = Env::from_pairs([("PLACK_ENV", "deployment")]);
        assert_eq!(opts.effective_mode(&env), "deployment");

        let opts = GlobalOptions {
            mode: Some("test".into()),
            ..Default::default()
        };
        assert_eq!(opts.effective_mode(&env), "test");
    }

    #[test]
    fn effective_home_prefers_override() {
        let opts = GlobalOptions {
            home: Some(PathBuf::from("/srv/app")),
            ..Default::default()
        };
        assert_eq!(opts.effective_home(), PathBuf::from("/srv/app"));
    }
}
