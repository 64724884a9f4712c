use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "booknook";
const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Session settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    /// Token returned by the last login or registration
    pub token: Option<String>,
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Base URL of the booknook API
    pub api_url: ConfigValue<String>,
    /// Directory holding local state (the profile store)
    pub data_dir: ConfigValue<PathBuf>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
    #[serde(skip_serializing)]
    pub auth: AuthConfig,
    /// Where the file is, or would be written
    #[serde(skip_serializing)]
    path: PathBuf,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    api_url: Option<String>,
    data_dir: Option<PathBuf>,
    auth: Option<AuthConfig>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut api_url = ConfigValue::new(DEFAULT_API_URL.to_string(), ConfigSource::Default);
        let mut data_dir = ConfigValue::new(Self::default_data_dir(), ConfigSource::Default);
        let mut config_file = None;
        let mut auth = AuthConfig::default();

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(url) = file_config.api_url {
                api_url = ConfigValue::new(url, ConfigSource::File);
            }
            if let Some(dir) = file_config.data_dir {
                // Relative paths are relative to the config file
                let resolved = if dir.is_relative() {
                    path.parent().map(|p| p.join(&dir)).unwrap_or(dir)
                } else {
                    dir
                };
                data_dir = ConfigValue::new(resolved, ConfigSource::File);
            }
            if let Some(auth_config) = file_config.auth {
                auth = auth_config;
            }
        }

        if let Ok(url) = std::env::var("NOOK_API_URL") {
            api_url = ConfigValue::new(url, ConfigSource::Environment);
        }
        if let Ok(dir) = std::env::var("NOOK_DATA_DIR") {
            data_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Ok(token) = std::env::var("NOOK_TOKEN") {
            auth.token = Some(token);
        }

        Ok(Self {
            api_url,
            data_dir,
            config_file,
            auth,
            path,
        })
    }

    /// Path the config is read from and written back to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/booknook/
    /// - macOS: ~/Library/Application Support/booknook/
    /// - Windows: %APPDATA%/booknook/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/booknook/
    /// - macOS: ~/Library/Application Support/booknook/
    /// - Windows: %APPDATA%/booknook/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

/// Commented starting point written by `nook config init`.
pub fn default_file_contents() -> String {
    format!(
        "# booknook configuration\n\
         \n\
         # Base URL of the booknook API (env: NOOK_API_URL)\n\
         api_url: {}\n\
         \n\
         # Local state directory; relative paths resolve against this file\n\
         # (env: NOOK_DATA_DIR)\n\
         # data_dir: data\n",
        DEFAULT_API_URL
    )
}

/// Stores `token` under `auth.token`, keeping every other key in the file.
pub fn save_token(config_path: &Path, token: &str) -> Result<(), ConfigError> {
    let mut yaml = read_mapping(config_path)?;
    let mapping = yaml
        .as_mapping_mut()
        .ok_or_else(|| ConfigError::InvalidFormat(config_path.to_path_buf()))?;

    let auth_key = serde_yaml::Value::String("auth".to_string());
    let auth = mapping
        .entry(auth_key)
        .or_insert_with(|| serde_yaml::Value::Mapping(serde_yaml::Mapping::new()));
    let auth_mapping = auth
        .as_mapping_mut()
        .ok_or_else(|| ConfigError::InvalidFormat(config_path.to_path_buf()))?;
    auth_mapping.insert(
        serde_yaml::Value::String("token".to_string()),
        serde_yaml::Value::String(token.to_string()),
    );

    write_mapping(config_path, &yaml)
}

/// Removes `auth.token`. Returns false when there was nothing to remove.
pub fn clear_token(config_path: &Path) -> Result<bool, ConfigError> {
    if !config_path.exists() {
        return Ok(false);
    }

    let mut yaml = read_mapping(config_path)?;
    let removed = yaml
        .as_mapping_mut()
        .and_then(|m| m.get_mut("auth"))
        .and_then(|auth| auth.as_mapping_mut())
        .and_then(|auth| auth.remove("token"))
        .is_some();

    if removed {
        write_mapping(config_path, &yaml)?;
    }
    Ok(removed)
}

fn read_mapping(config_path: &Path) -> Result<serde_yaml::Value, ConfigError> {
    if !config_path.exists() {
        return Ok(serde_yaml::Value::Mapping(serde_yaml::Mapping::new()));
    }
    let contents = std::fs::read_to_string(config_path)
        .map_err(|e| ConfigError::ReadError(config_path.to_path_buf(), e))?;
    let yaml: serde_yaml::Value = serde_yaml::from_str(&contents)
        .map_err(|e| ConfigError::ParseError(config_path.to_path_buf(), e))?;
    // An empty file parses as null
    Ok(match yaml {
        serde_yaml::Value::Null => serde_yaml::Value::Mapping(serde_yaml::Mapping::new()),
        other => other,
    })
}

fn write_mapping(config_path: &Path, yaml: &serde_yaml::Value) -> Result<(), ConfigError> {
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| ConfigError::WriteError(config_path.to_path_buf(), e))?;
    }
    let contents = serde_yaml::to_string(yaml)
        .map_err(|e| ConfigError::ParseError(config_path.to_path_buf(), e))?;
    std::fs::write(config_path, contents)
        .map_err(|e| ConfigError::WriteError(config_path.to_path_buf(), e))
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    WriteError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidFormat(PathBuf),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::WriteError(path, e) => {
                write!(f, "Failed to write config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::InvalidFormat(path) => {
                write!(f, "Config file '{}' is not a YAML mapping", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nonexistent.yaml");

        let config = Config::load(Some(config_path.clone())).unwrap();
        assert_eq!(config.api_url.value, "http://localhost:3000");
        assert_eq!(config.api_url.source, ConfigSource::Default);
        assert!(config.data_dir.value.ends_with("booknook"));
        assert_eq!(config.data_dir.source, ConfigSource::Default);
        assert_eq!(config.path(), config_path.as_path());
        assert_eq!(config.config_file, None);
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "api_url: https://books.example.com/api").unwrap();
        writeln!(file, "data_dir: /var/lib/nook").unwrap();
        writeln!(file, "auth:").unwrap();
        writeln!(file, "  token: abc123").unwrap();

        let config = Config::load(Some(config_path.clone())).unwrap();
        assert_eq!(config.api_url.value, "https://books.example.com/api");
        assert_eq!(config.api_url.source, ConfigSource::File);
        assert_eq!(config.data_dir.value, PathBuf::from("/var/lib/nook"));
        assert_eq!(config.auth.token.as_deref(), Some("abc123"));
        assert_eq!(config.config_file, Some(config_path));
    }

    #[test]
    fn test_relative_data_dir_resolves_against_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        std::fs::write(&config_path, "data_dir: state\n").unwrap();

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.data_dir.value, temp_dir.path().join("state"));
    }

    #[test]
    #[ignore] // Run with --ignored; env vars can pollute parallel tests
    fn test_env_var_overrides_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        std::fs::write(
            &config_path,
            "api_url: http://fromfile\ndata_dir: /from/file\nauth:\n  token: file-token\n",
        )
        .unwrap();

        std::env::set_var("NOOK_API_URL", "http://fromenv");
        std::env::set_var("NOOK_DATA_DIR", "/from/env");
        std::env::set_var("NOOK_TOKEN", "env-token");

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.api_url.value, "http://fromenv");
        assert_eq!(config.api_url.source, ConfigSource::Environment);
        assert_eq!(config.data_dir.value, PathBuf::from("/from/env"));
        assert_eq!(config.data_dir.source, ConfigSource::Environment);
        assert_eq!(config.auth.token.as_deref(), Some("env-token"));

        // Clean up
        std::env::remove_var("NOOK_API_URL");
        std::env::remove_var("NOOK_DATA_DIR");
        std::env::remove_var("NOOK_TOKEN");
    }

    #[test]
    fn test_invalid_yaml_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        std::fs::write(&config_path, "invalid: yaml: content: [\n").unwrap();

        let err = Config::load(Some(config_path)).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_save_token_keeps_other_keys() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        std::fs::write(&config_path, "api_url: http://books.local\n").unwrap();

        save_token(&config_path, "tok-1").unwrap();

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.api_url.value, "http://books.local");
        assert_eq!(config.auth.token.as_deref(), Some("tok-1"));
    }

    #[test]
    fn test_save_token_creates_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.yaml");

        save_token(&config_path, "tok-2").unwrap();

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.auth.token.as_deref(), Some("tok-2"));
    }

    #[test]
    fn test_clear_token() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        assert!(!clear_token(&config_path).unwrap());

        save_token(&config_path, "tok-3").unwrap();
        assert!(clear_token(&config_path).unwrap());
        assert!(!clear_token(&config_path).unwrap());

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.auth.token, None);
    }

    #[test]
    fn test_default_file_contents_parse() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        std::fs::write(&config_path, default_file_contents()).unwrap();

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.api_url.source, ConfigSource::File);
        assert_eq!(config.data_dir.source, ConfigSource::Default);
    }
}
