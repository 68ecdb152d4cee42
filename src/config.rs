//! Configuration module

use std::env;
use std::path::PathBuf;

use crate::constants::DEFAULT_MODEL_DIR;

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory holding the five model artifacts
    pub model_dir: PathBuf,

    /// Hash artifacts at load and compare against the manifest
    pub verify_checksums: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            verify_checksums: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            model_dir: lookup("AQI_MODEL_DIR")
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.model_dir),

            verify_checksums: lookup("AQI_VERIFY_CHECKSUMS")
                .map(|s| s.to_lowercase() != "false" && s != "0")
                .unwrap_or(defaults.verify_checksums),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_match_fixed_paths() {
        let config = config_with(&[]);
        assert_eq!(config.model_dir, PathBuf::from("model"));
        assert!(config.verify_checksums);
    }

    #[test]
    fn test_overrides() {
        let config = config_with(&[("AQI_MODEL_DIR", "/opt/aqi/models"), ("AQI_VERIFY_CHECKSUMS", "0")]);
        assert_eq!(config.model_dir, PathBuf::from("/opt/aqi/models"));
        assert!(!config.verify_checksums);

        let config = config_with(&[("AQI_VERIFY_CHECKSUMS", "FALSE")]);
        assert!(!config.verify_checksums);
    }

    #[test]
    fn test_blank_model_dir_ignored() {
        let config = config_with(&[("AQI_MODEL_DIR", "  ")]);
        assert_eq!(config.model_dir, PathBuf::from("model"));
    }
}
