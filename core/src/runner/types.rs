use tokio::process::Command;

use crate::config::TargetConfig;

/// Child environment: an optional copy of the parent's, plus overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvPlan {
    pub inherit: bool,
    pub overrides: Vec<(String, String)>,
}

impl EnvPlan {
    pub fn inherited() -> Self {
        Self {
            inherit: true,
            overrides: Vec::new(),
        }
    }

    pub fn with_override(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.push((key.into(), value.into()));
        self
    }

    /// Writes the plan onto `cmd`. Inheriting leaves the parent's variables in
    /// place; otherwise the child starts from an empty environment. Overrides
    /// are applied last and win over inherited values.
    pub fn apply(&self, cmd: &mut Command) {
        if !self.inherit {
            cmd.env_clear();
        }
        cmd.envs(self.overrides.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub program: String,
    pub args: Vec<String>,
    pub env: EnvPlan,
}

impl LaunchSpec {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            env: EnvPlan::inherited(),
        }
    }

    pub fn with_env(mut self, env: EnvPlan) -> Self {
        self.env = env;
        self
    }

    /// Returns `None` when no program is configured.
    pub fn from_config(target: &TargetConfig, caller_args: Vec<String>) -> Option<Self> {
        let program = target
            .program
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())?;

        let mut args = target.args.clone();
        args.extend(caller_args);

        let env = EnvPlan {
            inherit: target.inherit_env,
            overrides: target.child_env().into_iter().collect(),
        };

        Some(Self::new(program, args).with_env(env))
    }
}

/// Per-direction counters reported by a forwarder when its source ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForwardStats {
    pub lines_forwarded: u64,
    pub lines_dropped: u64,
    pub bytes_forwarded: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisorOutcome {
    pub exit_code: i32,
    /// `None` if the output forwarder failed or was still running when the
    /// drain window closed.
    pub stdout: Option<ForwardStats>,
}
