mod load;
mod types;

pub use load::{
    apply_env_overrides, get_sieve_data_dir, load_default, load_from_path, CONFIG_PATH_ENV,
    LOG_LEVEL_ENV, PROGRAM_ENV,
};
pub use types::{
    AppConfig, FilterConfig, LoggingConfig, RunnerConfig, TargetConfig, LOG_LEVEL_ENV_KEY,
    MODE_ENV_KEY,
};
