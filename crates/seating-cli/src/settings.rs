use crate::error::CliError;
use seating_core::{EngineConfig, SeatingRequest};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Default config location, e.g. `~/.config/seating-planner/config.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("seating-planner").join("config.json"))
}

/// Load the engine configuration.
///
/// An explicit path must exist. Otherwise the default location is used when
/// present, and built-in defaults when it is not.
pub fn load_config(explicit: Option<&Path>) -> Result<EngineConfig, CliError> {
    if let Some(path) = explicit {
        return read_json(path);
    }
    match default_config_path() {
        Some(path) if path.is_file() => {
            tracing::debug!(path = %path.display(), "loading engine config");
            read_json(&path)
        }
        _ => Ok(EngineConfig::default()),
    }
}

pub fn read_request(path: &Path) -> Result<SeatingRequest, CliError> {
    read_json(path)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("seating-cli-{}-{}", std::process::id(), name));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let path = scratch("config.json", r#"{"solver": {"max_attempts": 25}}"#);
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.solver.max_attempts, 25);
        assert_eq!(config.scoring, EngineConfig::default().scoring);
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let path = std::env::temp_dir().join("seating-cli-does-not-exist.json");
        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, CliError::Read { .. }));
    }

    #[test]
    fn test_bad_request_reports_path() {
        let path = scratch("bad.json", "{\"guests\": 3}");
        let err = read_request(&path).unwrap_err();
        assert!(matches!(err, CliError::Parse { .. }));
        assert!(err.to_string().contains("bad.json"));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_request_with_only_guests_and_tables() {
        let path = scratch("request.json", r#"{"guests": [{"id": "a", "name": "Ada"}], "tables": [{"id": "t", "capacity": 2}]}"#);
        let request = read_request(&path).unwrap();
        assert_eq!(request.guests.len(), 1);
        assert!(request.constraints.is_empty());
        assert_eq!(request.options.max_plans, 5);
        fs::remove_file(path).unwrap();
    }
}
