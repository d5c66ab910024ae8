pub mod exit;
pub mod io_pump;
mod process;
mod run;
mod traits;
pub mod types;

pub use exit::normalize_exit;
pub use io_pump::{forward_lines, spawn_forwarder};
pub use process::ProcessRunner;
pub use run::{run_stdio, start, supervise};
pub use traits::{RunnerPlugin, RunnerSession};
pub use types::{EnvPlan, ForwardStats, LaunchSpec, SupervisorOutcome};
