use sieve_core::config::{self, LoggingConfig};
use sieve_core::error::{CliError, RunnerError};
use stdio_sieve::app;
use stdio_sieve::commands::cli;
use stdio_sieve::logging;

#[tokio::main]
async fn main() {
    // stdout carries the child's protocol and stderr is kept quiet, so a
    // failure only shows up as the exit code (and in the log file).
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "stdio-sieve failed");
            exit_code_for_error(&e)
        }
    };

    // process::exit skips destructors.
    logging::flush();

    // Exiting here also abandons the stdin relay, which may still be parked
    // on a read of our own stdin.
    std::process::exit(exit);
}

async fn real_main() -> Result<i32, CliError> {
    let args = cli::Args::from_env().map_err(|e| CliError::Config(e.to_string()))?;

    let cfg = match config::load_default() {
        Ok(cfg) => cfg,
        Err(e) => {
            init_logging(&LoggingConfig::default());
            return Err(CliError::Config(e.to_string()));
        }
    };
    init_logging(&cfg.logging);

    app::run_app(args, &cfg).await
}

fn init_logging(logging: &LoggingConfig) {
    for note in logging::init(logging) {
        tracing::warn!("{note}");
    }
}

fn exit_code_for_error(e: &CliError) -> i32 {
    // 11: config error
    // 20: runner start / IO error
    // 50: internal/uncategorized
    match e {
        CliError::Config(_) => 11,
        CliError::Runner(re) => match re {
            RunnerError::Spawn(_) => 20,
            RunnerError::StreamIo { .. } => 20,
            RunnerError::Plugin(_) => 50,
        },
    }
}
