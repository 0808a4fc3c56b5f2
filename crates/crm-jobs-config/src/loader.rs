//! Configuration loader.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::schema::Config;

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a file if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::NotFound(_)) => Ok(Config::default()),
            other => other,
        }
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let mut config: Config = toml::from_str(&expanded)?;

        config.store.path = Self::expand_path_buf(&config.store.path);
        config.logging.directory = config
            .logging
            .directory
            .as_deref()
            .map(Self::expand_path_buf);

        Ok(config)
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();
        let re = regex::Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name).map_err(|_| {
                ConfigError::EnvVarNotSet(var_name.to_string())
            })?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.crm-jobs`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }

    fn expand_path_buf(path: &Path) -> PathBuf {
        match path.to_str() {
            Some(s) => PathBuf::from(Self::expand_path(s)),
            None => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_empty_config() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config.store.backend, "sqlite");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_full_config() {
        let content = r#"
            [store]
            backend = "memory"
            path = "/tmp/jobs.db"

            [logging]
            level = "debug"
            directory = "/tmp/crm-jobs-logs"
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.store.backend, "memory");
        assert_eq!(config.store.path, PathBuf::from("/tmp/jobs.db"));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(
            config.logging.directory,
            Some(PathBuf::from("/tmp/crm-jobs-logs"))
        );
    }

    #[test]
    fn test_load_expands_tilde_paths() {
        let content = r#"
            [store]
            path = "~/jobs.db"

            [logging]
            directory = "~/logs"
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert!(!config.store.path.starts_with("~"));
        assert!(config.store.path.ends_with("jobs.db"));
        assert!(!config.logging.directory.unwrap().starts_with("~"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[store]").unwrap();
        writeln!(file, "backend = \"memory\"").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.store.backend, "memory");
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/path/jobs.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_or_default_nonexistent_file() {
        let config =
            ConfigLoader::load_or_default(Path::new("/nonexistent/path/jobs.toml")).unwrap();
        assert_eq!(config.store.backend, "sqlite");
    }

    #[test]
    fn test_load_or_default_keeps_parse_errors() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[store").unwrap();

        let result = ConfigLoader::load_or_default(file.path());
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_load_invalid_toml() {
        let content = "invalid = [unclosed";
        let result = ConfigLoader::load_str(content);
        assert!(result.is_err());
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: This test runs in isolation and sets a unique test-only env var
        unsafe {
            std::env::set_var("CRM_JOBS_TEST_DB_PATH", "/srv/jobs.db");
        }
        let content = "[store]\npath = \"${CRM_JOBS_TEST_DB_PATH}\"";
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.store.path, PathBuf::from("/srv/jobs.db"));
        unsafe {
            std::env::remove_var("CRM_JOBS_TEST_DB_PATH");
        }
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let content = "value = \"${NONEXISTENT_TEST_VAR_12345}\"";
        let result = ConfigLoader::expand_env_vars(content);
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(name)) if name == "NONEXISTENT_TEST_VAR_12345"));
    }

    #[test]
    fn test_expand_env_vars_no_vars() {
        let content = "value = \"no variables here\"";
        let expanded = ConfigLoader::expand_env_vars(content).unwrap();
        assert_eq!(expanded, content);
    }

    #[test]
    fn test_expand_path_no_tilde() {
        let path = "/usr/local/bin";
        assert_eq!(ConfigLoader::expand_path(path), path);
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = ConfigLoader::expand_path("~/test");
        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("/test"));
    }
}
