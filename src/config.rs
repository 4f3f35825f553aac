use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

/// File consulted when no `--config` path is given. Missing is fine.
pub const DEFAULT_CONFIG_FILE: &str = "explorer";

#[derive(Debug, Clone, Deserialize)]
pub struct ExplorerConfig {
    pub athletes_csv: PathBuf,
    pub regions_csv: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

/// Defaults, then the config file, then `EXPLORER_*` variables
/// (`EXPLORER_LOG_LEVEL=debug`).
pub fn load_config(path: Option<&Path>) -> Result<ExplorerConfig> {
    let file = match path {
        Some(p) => File::from(p).required(true),
        None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let cfg = Config::builder()
        .set_default("athletes_csv", "data/athlete_events.csv")?
        .set_default("output_dir", "out")?
        .set_default("log_dir", "logs")?
        .set_default("log_level", "info")?
        .add_source(file)
        .add_source(
            Environment::with_prefix("EXPLORER")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;
    Ok(cfg.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "regions_csv = \"data/noc_regions.csv\"\nlog_level = \"debug\"").unwrap();

        let cfg = load_config(Some(file.path())).unwrap();
        assert_eq!(cfg.regions_csv, Some(PathBuf::from("data/noc_regions.csv")));
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        assert!(load_config(Some(Path::new("/nonexistent/explorer.toml"))).is_err());
    }
}
