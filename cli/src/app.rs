//! Turns the loaded config and caller arguments into a supervised child run.
use sieve_core::config::{AppConfig, PROGRAM_ENV};
use sieve_core::error::CliError;
use sieve_core::runner::{self, LaunchSpec};

use crate::commands::cli::Args;

#[tracing::instrument(name = "cli.run_app", skip_all)]
pub async fn run_app(args: Args, cfg: &AppConfig) -> Result<i32, CliError> {
    let spec = launch_spec(args, cfg)?;
    tracing::info!(
        program = %spec.program,
        args = ?spec.args,
        inherit_env = spec.env.inherit,
        filter = cfg.filter.enabled,
        "starting child"
    );

    let outcome = runner::run_stdio(&spec, &cfg.runner, cfg.filter.classifier()).await?;

    if let Some(stats) = outcome.stdout {
        tracing::info!(
            forwarded = stats.lines_forwarded,
            dropped = stats.lines_dropped,
            bytes = stats.bytes_forwarded,
            "stdout relay summary"
        );
    }
    Ok(outcome.exit_code)
}

pub fn launch_spec(args: Args, cfg: &AppConfig) -> Result<LaunchSpec, CliError> {
    LaunchSpec::from_config(&cfg.target, args.child_args).ok_or_else(|| {
        CliError::Config(format!(
            "no target program configured: set [target].program or {PROGRAM_ENV}"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn caller_args_follow_configured_args() {
        let mut cfg = AppConfig::default();
        cfg.target.program = Some("dotnet".into());
        cfg.target.args = vec!["server.dll".into()];
        let args = Args::parse_passthrough(["stdio-sieve", "--stdio"]).unwrap();

        let spec = launch_spec(args, &cfg).unwrap();
        assert_eq!(spec.program, "dotnet");
        assert_eq!(spec.args, vec!["server.dll", "--stdio"]);
        assert!(spec
            .env
            .overrides
            .contains(&("DOTNET_ENVIRONMENT".to_string(), "Production".to_string())));
    }

    #[test]
    fn missing_program_is_a_config_error() {
        let args = Args::parse_passthrough(["stdio-sieve"]).unwrap();
        let err = launch_spec(args, &AppConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }
}
