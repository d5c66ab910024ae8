use std::path::{Path, PathBuf};

use super::types::AppConfig;

pub const CONFIG_PATH_ENV: &str = "STDIO_SIEVE_CONFIG";
pub const PROGRAM_ENV: &str = "STDIO_SIEVE_PROGRAM";
pub const LOG_LEVEL_ENV: &str = "STDIO_SIEVE_LOG";

/// Get the default data directory: ~/.stdio-sieve
pub fn get_sieve_data_dir() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(home.join(".stdio-sieve"))
}

pub fn load_default() -> anyhow::Result<AppConfig> {
    // Priority 1: $STDIO_SIEVE_CONFIG (must exist when set)
    let explicit = std::env::var(CONFIG_PATH_ENV)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);

    let mut cfg = match explicit {
        Some(path) => load_from_path(&path)?,
        None => load_from_search_path()?,
    };

    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok());
    Ok(cfg)
}

fn load_from_search_path() -> anyhow::Result<AppConfig> {
    // Priority 2: ~/.stdio-sieve/config.toml
    // Priority 3: ./stdio-sieve.toml (current directory)
    let home_config = get_sieve_data_dir().ok().map(|d| d.join("config.toml"));
    let local_config = Path::new("stdio-sieve.toml");

    match home_config {
        Some(p) if p.exists() => load_from_path(&p),
        _ if local_config.exists() => load_from_path(local_config),
        _ => Ok(AppConfig::default()),
    }
}

pub fn load_from_path(path: &Path) -> anyhow::Result<AppConfig> {
    let s = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("read {} failed: {e}", path.display()))?;
    let cfg = toml::from_str::<AppConfig>(&s)
        .map_err(|e| anyhow::anyhow!("parse {} failed: {e}", path.display()))?;
    Ok(cfg)
}

/// Environment variable overrides (highest priority). Blank values are ignored.
pub fn apply_env_overrides<F>(cfg: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = non_blank(PROGRAM_ENV) {
        cfg.target.program = Some(v);
    }
    if let Some(v) = non_blank(LOG_LEVEL_ENV) {
        cfg.logging.level = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn loads_toml_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            f,
            "[target]\nprogram = \"/opt/server\"\n\n[runner]\ndrain_timeout_ms = 50"
        )
        .unwrap();

        let cfg = load_from_path(f.path()).unwrap();
        assert_eq!(cfg.target.program.as_deref(), Some("/opt/server"));
        assert_eq!(cfg.runner.drain_timeout_ms, 50);
    }

    #[test]
    fn parse_error_names_the_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "[target\nprogram = ").unwrap();

        let err = load_from_path(f.path()).unwrap_err().to_string();
        assert!(err.contains(&f.path().display().to_string()), "{err}");
    }

    #[test]
    fn env_overrides_win_and_blank_values_are_ignored() {
        let vars = HashMap::from([
            (PROGRAM_ENV, "/usr/bin/server".to_string()),
            (LOG_LEVEL_ENV, "  ".to_string()),
        ]);
        let mut cfg = AppConfig::default();
        cfg.target.program = Some("from-file".into());

        apply_env_overrides(&mut cfg, |k| vars.get(k).cloned());

        assert_eq!(cfg.target.program.as_deref(), Some("/usr/bin/server"));
        assert_eq!(cfg.logging.level, "info");
    }
}
