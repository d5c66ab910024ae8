use std::collections::BTreeMap;

use serde::Deserialize;

use crate::classify::{LineClassifier, DEFAULT_SEVERITY_PREFIXES};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub target: TargetConfig,

    #[serde(default)]
    pub filter: FilterConfig,

    #[serde(default)]
    pub runner: RunnerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// The child program and the environment it is started with.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    /// Executable to launch. Required before a run can start.
    #[serde(default)]
    pub program: Option<String>,

    /// Arguments placed before the caller's own arguments.
    #[serde(default)]
    pub args: Vec<String>,

    /// Start from a copy of the parent's environment.
    #[serde(default = "default_inherit_env")]
    pub inherit_env: bool,

    /// Extra variables for the child. They are merged over the two logging
    /// overrides, which are always set; see [`TargetConfig::child_env`].
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

pub const LOG_LEVEL_ENV_KEY: &str = "Logging__Console__LogLevel__Default";
pub const MODE_ENV_KEY: &str = "DOTNET_ENVIRONMENT";

fn default_inherit_env() -> bool {
    true
}

fn console_log_overrides() -> BTreeMap<String, String> {
    BTreeMap::from([
        (LOG_LEVEL_ENV_KEY.to_string(), "None".to_string()),
        (MODE_ENV_KEY.to_string(), "Production".to_string()),
    ])
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            program: None,
            args: Vec::new(),
            inherit_env: default_inherit_env(),
            env: BTreeMap::new(),
        }
    }
}

impl TargetConfig {
    /// Variables set on the child: the console-log overrides, then `env` on
    /// top. A user entry for the same key wins.
    pub fn child_env(&self) -> BTreeMap<String, String> {
        let mut merged = console_log_overrides();
        merged.extend(self.env.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    /// When false, child stdout is relayed verbatim.
    #[serde(default = "default_filter_enabled")]
    pub enabled: bool,

    #[serde(default = "default_severity_prefixes")]
    pub severity_prefixes: Vec<String>,
}

fn default_filter_enabled() -> bool {
    true
}

fn default_severity_prefixes() -> Vec<String> {
    DEFAULT_SEVERITY_PREFIXES
        .iter()
        .map(|p| p.to_string())
        .collect()
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            enabled: default_filter_enabled(),
            severity_prefixes: default_severity_prefixes(),
        }
    }
}

impl FilterConfig {
    /// `None` when filtering is switched off.
    pub fn classifier(&self) -> Option<LineClassifier> {
        self.enabled
            .then(|| LineClassifier::new(self.severity_prefixes.iter().cloned()))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunnerConfig {
    /// How long to keep relaying child stdout after the child has exited.
    #[serde(default = "default_drain_timeout_ms")]
    pub drain_timeout_ms: u64,
}

fn default_drain_timeout_ms() -> u64 {
    500
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            drain_timeout_ms: default_drain_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr. Off by default: the wrapper stays silent.
    #[serde(default)]
    pub console: bool,

    /// If true, log to a daily file under `directory` (or OS temp dir if unset).
    #[serde(default = "default_logging_file")]
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "sieve_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Optional directory for log files. If empty or unset, uses OS temp dir.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_file() -> bool {
    true
}

fn default_logging_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: false,
            file: default_logging_file(),
            level: default_logging_level(),
            directory: None,
        }
    }
}
