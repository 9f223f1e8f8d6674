//! Configuration management for nw.
//!
//! Loads `nw.toml` from the working directory or any parent, expands
//! `${VAR}` references in secrets and URLs, and validates the result.

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::expand::{expand_env, expand_opt};

/// Configuration filename.
const CONFIG_FILENAME: &str = "nw.toml";

/// Default recursion limit for block tree fetching.
const DEFAULT_MAX_DEPTH: usize = 64;

/// Default syntax highlighting theme.
const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default maximum image download size (20 MiB).
const DEFAULT_MAX_IMAGE_BYTES: u64 = 20 * 1024 * 1024;

/// CLI settings that override configuration values.
#[derive(Debug, Default, Clone)]
pub struct CliSettings {
    pub max_depth: Option<usize>,
    pub parallel_fetch: Option<bool>,
    pub theme: Option<String>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub notion: Option<NotionConfig>,
    pub webflow: Option<WebflowConfig>,
    pub convert: ConvertConfig,
    /// Path of the loaded file, if any.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// `[notion]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NotionConfig {
    pub api_key: String,
    /// API base URL. Client default when unset.
    pub base_url: Option<String>,
    /// `Notion-Version` header. Client default when unset.
    pub version: Option<String>,
    /// Children page size. Client default when unset.
    pub page_size: Option<u32>,
}

/// `[webflow]` section. Required for publish mode.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WebflowConfig {
    pub api_key: String,
    pub site_id: String,
    pub base_url: Option<String>,
}

/// `[convert]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    pub max_depth: usize,
    pub parallel_fetch: bool,
    pub theme: String,
    pub timeout_secs: u64,
    pub max_image_bytes: u64,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            parallel_fetch: false,
            theme: DEFAULT_THEME.to_owned(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Validation(String),

    #[error("Environment variable error in {field}: {message}")]
    EnvVar { field: String, message: String },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

fn require_http_url(value: &str, field: &str) -> Result<(), ConfigError> {
    if !value.starts_with("http://") && !value.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must be an http:// or https:// URL, got '{value}'"
        )));
    }
    Ok(())
}

impl NotionConfig {
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.api_key = expand_env(&self.api_key, "notion.api_key")?;
        expand_opt(&mut self.base_url, "notion.base_url")?;
        expand_opt(&mut self.version, "notion.version")?;
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.api_key, "notion.api_key")?;
        if let Some(url) = &self.base_url {
            require_http_url(url, "notion.base_url")?;
        }
        if let Some(size) = self.page_size
            && !(1..=100).contains(&size)
        {
            return Err(ConfigError::Validation(format!(
                "notion.page_size must be between 1 and 100, got {size}"
            )));
        }
        Ok(())
    }
}

impl WebflowConfig {
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.api_key = expand_env(&self.api_key, "webflow.api_key")?;
        self.site_id = expand_env(&self.site_id, "webflow.site_id")?;
        expand_opt(&mut self.base_url, "webflow.base_url")?;
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.api_key, "webflow.api_key")?;
        require_non_empty(&self.site_id, "webflow.site_id")?;
        if let Some(url) = &self.base_url {
            require_http_url(url, "webflow.base_url")?;
        }
        Ok(())
    }
}

impl ConvertConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::Validation(
                "convert.max_depth must be greater than 0".to_owned(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "convert.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        require_non_empty(&self.theme, "convert.theme")
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit `config_path` must exist. Without one, `nw.toml` is
    /// searched for from the current directory upwards, falling back to
    /// defaults when nothing is found. CLI settings are applied last.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed, expanded or
    /// validated.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Self::load_from_file(path)?
            }
            None => match std::env::current_dir()
                .ok()
                .and_then(|cwd| Self::discover_config(&cwd))
            {
                Some(path) => Self::load_from_file(&path)?,
                None => Self::default(),
            },
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.convert.validate()?;
        }

        Ok(config)
    }

    /// Find `nw.toml` in `start` or its nearest ancestor.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILENAME))
            .find(|candidate| candidate.is_file())
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.expand_env_vars()?;
        config.validate()?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(notion) = &mut self.notion {
            notion.expand_env_vars()?;
        }
        if let Some(webflow) = &mut self.webflow {
            webflow.expand_env_vars()?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(notion) = &self.notion {
            notion.validate()?;
        }
        if let Some(webflow) = &self.webflow {
            webflow.validate()?;
        }
        self.convert.validate()
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(max_depth) = settings.max_depth {
            self.convert.max_depth = max_depth;
        }
        if let Some(parallel) = settings.parallel_fetch {
            self.convert.parallel_fetch = parallel;
        }
        if let Some(theme) = &settings.theme {
            self.convert.theme.clone_from(theme);
        }
    }

    /// Notion settings, required for every conversion.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if `[notion]` is missing.
    pub fn require_notion(&self) -> Result<&NotionConfig, ConfigError> {
        self.notion.as_ref().ok_or_else(|| {
            ConfigError::Validation(format!(
                "[notion] section with api_key is required in {CONFIG_FILENAME}"
            ))
        })
    }

    /// Webflow settings, required for publish mode.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if `[webflow]` is missing.
    pub fn require_webflow(&self) -> Result<&WebflowConfig, ConfigError> {
        self.webflow.as_ref().ok_or_else(|| {
            ConfigError::Validation(format!(
                "[webflow] section with api_key and site_id is required for publishing in {CONFIG_FILENAME}"
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join(CONFIG_FILENAME);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.notion.is_none());
        assert!(config.webflow.is_none());
        assert_eq!(config.convert.max_depth, 64);
        assert!(!config.convert.parallel_fetch);
        assert_eq!(config.convert.theme, "base16-ocean.dark");
        assert_eq!(config.convert.timeout_secs, 30);
        assert_eq!(config.convert.max_image_bytes, 20 * 1024 * 1024);
    }

    #[test]
    fn test_load_full_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            dir.path(),
            r#"
[notion]
api_key = "secret_1"
base_url = "http://localhost:9000/v1"
version = "2022-06-28"
page_size = 50

[webflow]
api_key = "wf_key"
site_id = "site123"

[convert]
max_depth = 8
parallel_fetch = true
theme = "InspiredGitHub"
"#,
        );

        let config = Config::load(Some(&path), None).unwrap();
        let notion = config.require_notion().unwrap();
        assert_eq!(notion.api_key, "secret_1");
        assert_eq!(notion.base_url.as_deref(), Some("http://localhost:9000/v1"));
        assert_eq!(notion.page_size, Some(50));

        let webflow = config.require_webflow().unwrap();
        assert_eq!(webflow.site_id, "site123");
        assert_eq!(webflow.base_url, None);

        assert_eq!(config.convert.max_depth, 8);
        assert!(config.convert.parallel_fetch);
        assert_eq!(config.convert.theme, "InspiredGitHub");
        assert_eq!(config.convert.timeout_secs, 30);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_explicit_missing_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(p) if p == path));
    }

    #[test]
    fn test_discover_in_parent() {
        let dir = TempDir::new().unwrap();
        let path = write_config(dir.path(), "[notion]\napi_key = \"k\"\n");
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(Config::discover_config(&nested), Some(path));
    }

    #[test]
    fn test_discover_nearest_wins() {
        let dir = TempDir::new().unwrap();
        write_config(dir.path(), "");
        let nested = dir.path().join("site");
        fs::create_dir_all(&nested).unwrap();
        let inner = write_config(&nested, "");

        assert_eq!(Config::discover_config(&nested), Some(inner));
    }

    #[test]
    fn test_env_expansion_in_secrets() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("NW_CFG_TEST_NOTION_KEY", "secret_env");
            std::env::set_var("NW_CFG_TEST_SITE", "site_env");
        }
        let dir = TempDir::new().unwrap();
        let path = write_config(
            dir.path(),
            r#"
[notion]
api_key = "${NW_CFG_TEST_NOTION_KEY}"

[webflow]
api_key = "${NW_CFG_TEST_WF_KEY:-wf_default}"
site_id = "${NW_CFG_TEST_SITE}"
"#,
        );

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.require_notion().unwrap().api_key, "secret_env");
        let webflow = config.require_webflow().unwrap();
        assert_eq!(webflow.api_key, "wf_default");
        assert_eq!(webflow.site_id, "site_env");

        unsafe {
            std::env::remove_var("NW_CFG_TEST_NOTION_KEY");
            std::env::remove_var("NW_CFG_TEST_SITE");
        }
    }

    #[test]
    fn test_unset_env_var_fails() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("NW_CFG_TEST_ABSENT");
        }
        let dir = TempDir::new().unwrap();
        let path = write_config(dir.path(), "[notion]\napi_key = \"${NW_CFG_TEST_ABSENT}\"\n");

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { ref field, .. } if field == "notion.api_key"));
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(dir.path(), "[notion]\napi_key = \"  \"\n");

        let err = Config::load(Some(&path), None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration: notion.api_key must not be empty"
        );
    }

    #[test]
    fn test_non_http_base_url_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            dir.path(),
            "[notion]\napi_key = \"k\"\nbase_url = \"ftp://example.com\"\n",
        );

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(msg) if msg.contains("notion.base_url")));
    }

    #[test]
    fn test_page_size_out_of_range() {
        let dir = TempDir::new().unwrap();
        let path = write_config(dir.path(), "[notion]\napi_key = \"k\"\npage_size = 101\n");

        let err = Config::load(Some(&path), None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration: notion.page_size must be between 1 and 100, got 101"
        );
    }

    #[test]
    fn test_zero_max_depth_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(dir.path(), "[convert]\nmax_depth = 0\n");

        assert!(matches!(
            Config::load(Some(&path), None),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_webflow_requires_site_id() {
        let dir = TempDir::new().unwrap();
        let path = write_config(dir.path(), "[webflow]\napi_key = \"k\"\n");

        let err = Config::load(Some(&path), None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration: webflow.site_id must not be empty"
        );
    }

    #[test]
    fn test_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = write_config(dir.path(), "[notion\napi_key = ");

        assert!(matches!(
            Config::load(Some(&path), None),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_cli_settings_override() {
        let dir = TempDir::new().unwrap();
        let path = write_config(dir.path(), "[convert]\nmax_depth = 10\ntheme = \"Solarized (dark)\"\n");
        let settings = CliSettings {
            max_depth: Some(3),
            parallel_fetch: Some(true),
            theme: None,
        };

        let config = Config::load(Some(&path), Some(&settings)).unwrap();
        assert_eq!(config.convert.max_depth, 3);
        assert!(config.convert.parallel_fetch);
        assert_eq!(config.convert.theme, "Solarized (dark)");
    }

    #[test]
    fn test_cli_zero_max_depth_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(dir.path(), "");
        let settings = CliSettings {
            max_depth: Some(0),
            ..CliSettings::default()
        };

        assert!(matches!(
            Config::load(Some(&path), Some(&settings)),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_require_notion_missing() {
        let err = Config::default().require_notion().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration: [notion] section with api_key is required in nw.toml"
        );
    }

    #[test]
    fn test_require_webflow_missing() {
        assert!(Config::default().require_webflow().is_err());
    }
}
