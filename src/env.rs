//! Process environment snapshot and deployment detection.
//!
//! `Env` is captured once at startup (or built from pairs in tests) and handed
//! to every component that needs it, so nothing reads `std::env` ad hoc.
//! `detect` infers an implicit command name from deployment markers.

use std::collections::BTreeMap;

/// Marker set by PSGI-style adapters.
pub const PSGI_MARKER: &str = "PLACK_ENV";
/// Markers set by CGI servers (presence only, value ignored).
pub const CGI_MARKERS: &[&str] = &["PATH_INFO", "GATEWAY_INTERFACE"];
/// Set (truthy) by test harnesses; hides the command listing.
pub const HARNESS_MARKER: &str = "HARNESS_ACTIVE";

/// Default prefix for the dispatcher's own variables (`PLUGCMD_MODE`, ...).
pub const DEFAULT_PREFIX: &str = "PLUGCMD";

/// Immutable snapshot of environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Env {
    vars: BTreeMap<String, String>,
}

impl Env {
    /// Capture the current process environment. Non-UTF-8 entries are skipped.
    pub fn from_process() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Env { vars }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Env {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Presence check; an empty value still counts as present.
    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Truthy flag: present, non-empty and not `"0"`.
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.get(key), Some(v) if !v.is_empty() && v != "0")
    }
}

/// Names of the dispatcher-owned variables for a given prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvVars {
    pub no_detect: String,
    pub app_loader: String,
    pub help: String,
    pub home: String,
    pub mode: String,
    pub log: String,
}

impl EnvVars {
    pub fn with_prefix(prefix: &str) -> Self {
        EnvVars {
            no_detect: format!("{prefix}_NO_DETECT"),
            app_loader: format!("{prefix}_APP_LOADER"),
            help: format!("{prefix}_HELP"),
            home: format!("{prefix}_HOME"),
            mode: format!("{prefix}_MODE"),
            log: format!("{prefix}_LOG"),
        }
    }
}

impl Default for EnvVars {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_PREFIX)
    }
}

/// Name of the deployment the process runs under, if any.
///
/// The PSGI marker is checked strictly before the CGI markers.
pub fn deployment(env: &Env) -> Option<&'static str> {
    if env.contains(PSGI_MARKER) {
        return Some("psgi");
    }
    if CGI_MARKERS.iter().any(|m| env.contains(m)) {
        return Some("cgi");
    }
    None
}

/// Replace `explicit` with the detected deployment name, or return it unchanged.
pub fn detect(env: &Env, explicit: Option<&str>) -> Option<String> {
    deployment(env)
        .or(explicit)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_is_identity_without_markers() {
        let env = Env::from_pairs([("HOME", "/root"), ("TERM", "xterm")]);
        assert_eq!(detect(&env, Some("version")), Some("version".into()));
        assert_eq!(detect(&env, None), None);
        assert_eq!(detect(&env, Some("")), Some(String::new()));
    }

    #[test]
    fn psgi_wins_over_explicit_and_cgi() {
        let env = Env::from_pairs([("PLACK_ENV", "production"), ("PATH_INFO", "/")]);
        assert_eq!(detect(&env, Some("version")), Some("psgi".into()));
        assert_eq!(detect(&env, None), Some("psgi".into()));
    }

    #[test]
    fn cgi_markers_are_presence_based() {
        let env = Env::from_pairs([("GATEWAY_INTERFACE", "")]);
        assert_eq!(detect(&env, Some("routes")), Some("cgi".into()));
        let env = Env::from_pairs([("PATH_INFO", "/foo")]);
        assert_eq!(deployment(&env), Some("cgi"));
    }

    #[test]
    fn detect_is_repeatable() {
        let env = Env::from_pairs([("PATH_INFO", "/")]);
        assert_eq!(detect(&env, None), detect(&env, None));
    }

    #[test]
    fn flag_semantics() {
        let env = Env::from_pairs([("A", "1"), ("B", "0"), ("C", "")]);
        assert!(env.flag("A"));
        assert!(!env.flag("B"));
        assert!(!env.flag("C"));
        assert!(!env.flag("D"));
        assert!(env.contains("C"));
    }

    #[test]
    fn env_var_names_follow_prefix() {
        let vars = EnvVars::with_prefix("MYAPP");
        assert_eq!(vars.mode, "MYAPP_MODE");
        assert_eq!(vars.app_loader, "MYAPP_APP_LOADER");
        assert_eq!(EnvVars::default().home, "PLUGCMD_HOME");
    }
}
