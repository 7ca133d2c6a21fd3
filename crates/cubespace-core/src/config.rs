//! Loading machine dimension settings from JSON.

use std::io::Read;
use std::path::Path;

use cubespace_logic::config::{validate_config, ConfigError, MachinesConfig};

#[derive(Debug)]
pub enum ConfigLoadError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Invalid(Vec<ConfigError>),
}

impl From<std::io::Error> for ConfigLoadError {
    fn from(e: std::io::Error) -> Self {
        ConfigLoadError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigLoadError {
    fn from(e: serde_json::Error) -> Self {
        ConfigLoadError::Json(e)
    }
}

impl std::fmt::Display for ConfigLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigLoadError::Io(e) => write!(f, "IO error: {}", e),
            ConfigLoadError::Json(e) => write!(f, "Config parse error: {}", e),
            ConfigLoadError::Invalid(errors) => {
                write!(f, "Invalid config:")?;
                for e in errors {
                    write!(f, " {};", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigLoadError {}

/// Parse and validate settings. Missing fields take their defaults.
pub fn load_config<R: Read>(reader: R) -> Result<MachinesConfig, ConfigLoadError> {
    let config: MachinesConfig = serde_json::from_reader(reader)?;
    let errors = validate_config(&config);
    if !errors.is_empty() {
        return Err(ConfigLoadError::Invalid(errors));
    }
    Ok(config)
}

/// Load settings from `path`, or the defaults if the file does not exist.
pub fn load_config_file(path: &Path) -> Result<MachinesConfig, ConfigLoadError> {
    match std::fs::File::open(path) {
        Ok(file) => load_config(std::io::BufReader::new(file)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::info!("No config at {}, using defaults", path.display());
            Ok(MachinesConfig::default())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = load_config(r#"{ "cube_spacing": 64.0 }"#.as_bytes()).expect("valid");
        assert_eq!(config.cube_spacing, 64.0);
        assert!(config.keep_occupants_inside);
        assert_eq!(config.check_interval, 10);
    }

    #[test]
    fn invalid_values_are_reported() {
        let err = load_config(r#"{ "cube_spacing": 4.0, "check_interval": 0 }"#.as_bytes())
            .unwrap_err();
        match err {
            ConfigLoadError::Invalid(errors) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation errors, got {other}"),
        }
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            load_config("{ not json".as_bytes()),
            Err(ConfigLoadError::Json(_))
        ));
    }

    #[test]
    fn missing_file_uses_defaults() {
        let config = load_config_file(Path::new("/nonexistent/cubespace.json")).expect("defaults");
        assert_eq!(config, MachinesConfig::default());
    }
}
