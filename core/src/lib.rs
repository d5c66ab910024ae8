//! stdio-sieve core: runs a child stdio server and keeps its console logging
//! out of the protocol stream.

pub mod classify;
pub mod config;
pub mod error;
pub mod runner;

pub use classify::{is_protocol_line, LineClassifier, DEFAULT_SEVERITY_PREFIXES};
pub use config::{load_default, AppConfig, FilterConfig, LoggingConfig, RunnerConfig, TargetConfig};
pub use error::{CliError, RunnerError};
