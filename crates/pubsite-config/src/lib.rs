//! Configuration management for pubsite.
//!
//! Parses `pubsite.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `database.url`
//! - `content.base_url`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override site registry database URL.
    pub database_url: Option<String>,
    /// Override raw content host base URL.
    pub content_url: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "pubsite.toml";

/// Path part of an in-memory `SQLite` URL, never resolved against the config directory.
const SQLITE_MEMORY_PATH: &str = ":memory:";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Site registry database configuration.
    pub database: DatabaseConfig,
    /// Raw content host configuration.
    pub content: ContentConfig,
    /// Owner identity configuration.
    pub auth: AuthConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
        }
    }
}

/// Site registry database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// sqlx SQLite connection URL.
    pub url: String,
    /// Maximum pooled connections.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://pubsite.db".to_owned(),
            max_connections: 5,
        }
    }
}

/// Raw content host configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Base URL files are fetched from (`<base_url>/<repo>/<branch>/<path>`).
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            base_url: "https://raw.githubusercontent.com".to_owned(),
            timeout_secs: 30,
        }
    }
}

impl ContentConfig {
    /// Request timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Owner identity configuration.
///
/// Authentication happens in front of pubsite; the proxy forwards the
/// signed-in user's numeric id in `owner_header`.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Request header carrying the owner id.
    pub owner_header: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            owner_header: "x-owner-id".to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`database.url`").
        field: String,
        /// Error message (e.g., "${`PUBSITE_DB`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

/// RFC 9110 token characters allowed in a header name.
fn is_header_token(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `pubsite.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the final configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(url) = &settings.database_url {
            self.database.url.clone_from(url);
        }
        if let Some(url) = &settings.content_url {
            self.content.base_url.clone_from(url);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_database()?;
        self.validate_content()?;
        self.validate_auth()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    fn validate_database(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.database.url, "database.url")?;
        if !self.database.url.starts_with("sqlite:") {
            return Err(ConfigError::Validation(
                "database.url must be a sqlite: URL".to_owned(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation(
                "database.max_connections must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_content(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.content.base_url, "content.base_url")?;
        require_http_url(&self.content.base_url, "content.base_url")?;
        if self.content.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "content.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_auth(&self) -> Result<(), ConfigError> {
        if !is_header_token(&self.auth.owner_header) {
            return Err(ConfigError::Validation(format!(
                "auth.owner_header is not a valid header name: {:?}",
                self.auth.owner_header
            )));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        self.database.url = expand::expand_env(&self.database.url, "database.url")?;
        self.content.base_url = expand::expand_env(&self.content.base_url, "content.base_url")?;
        Ok(())
    }

    /// Resolve a relative SQLite file path against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.database.url = resolve_sqlite_url(&self.database.url, config_dir);
    }
}

/// Make the file path of a `sqlite:` URL absolute.
///
/// In-memory URLs (with or without query parameters) and URLs that
/// already carry an absolute path are returned unchanged. Query parameters
/// (`?mode=rwc`) are preserved.
fn resolve_sqlite_url(url: &str, base: &Path) -> String {
    let Some(rest) = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
    else {
        return url.to_owned();
    };

    let (path, query) = match rest.find('?') {
        Some(pos) => rest.split_at(pos),
        None => (rest, ""),
    };
    if path.is_empty() || path == SQLITE_MEMORY_PATH || Path::new(path).is_absolute() {
        return url.to_owned();
    }

    format!("sqlite://{}{query}", base.join(path).display())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7979);
        assert_eq!(config.database.url, "sqlite://pubsite.db");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.content.base_url, "https://raw.githubusercontent.com");
        assert_eq!(config.content.timeout(), Duration::from_secs(30));
        assert_eq!(config.auth.owner_header, "x-owner-id");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7979);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "0.0.0.0"
port = 9000

[database]
url = "sqlite:///var/lib/pubsite/sites.db"
max_connections = 2

[content]
base_url = "http://localhost:8081"
timeout_secs = 5

[auth]
owner_header = "x-forwarded-user"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.database.url, "sqlite:///var/lib/pubsite/sites.db");
        assert_eq!(config.database.max_connections, 2);
        assert_eq!(config.content.base_url, "http://localhost:8081");
        assert_eq!(config.content.timeout_secs, 5);
        assert_eq!(config.auth.owner_header, "x-forwarded-user");
    }

    #[test]
    fn test_resolve_sqlite_url_relative() {
        assert_eq!(
            resolve_sqlite_url("sqlite://pubsite.db", Path::new("/project")),
            "sqlite:///project/pubsite.db"
        );
        assert_eq!(
            resolve_sqlite_url("sqlite:data/sites.db?mode=rwc", Path::new("/project")),
            "sqlite:///project/data/sites.db?mode=rwc"
        );
    }

    #[test]
    fn test_resolve_sqlite_url_unchanged() {
        let base = Path::new("/project");
        assert_eq!(resolve_sqlite_url("sqlite::memory:", base), "sqlite::memory:");
        assert_eq!(
            resolve_sqlite_url("sqlite::memory:?cache=shared", base),
            "sqlite::memory:?cache=shared"
        );
        assert_eq!(resolve_sqlite_url("sqlite://:memory:", base), "sqlite://:memory:");
        assert_eq!(
            resolve_sqlite_url("sqlite:///abs/sites.db", base),
            "sqlite:///abs/sites.db"
        );
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("server.port"));
    }

    #[test]
    fn test_validate_rejects_non_http_content_url() {
        let mut config = Config::default();
        config.content.base_url = "ftp://example.com".to_owned();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("content.base_url"));
    }

    #[test]
    fn test_validate_rejects_non_sqlite_database() {
        let mut config = Config::default();
        config.database.url = "postgres://localhost/sites".to_owned();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("database.url"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.content.timeout_secs = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_header_name() {
        let mut config = Config::default();
        config.auth.owner_header = "x owner".to_owned();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("auth.owner_header"));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default();
        let overrides = CliSettings {
            port: Some(9000),
            content_url: Some("http://127.0.0.1:9999".to_owned()),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1"); // Unchanged
        assert_eq!(config.content.base_url, "http://127.0.0.1:9999");
        assert_eq!(config.database.url, "sqlite://pubsite.db"); // Unchanged
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let result = Config::load(Some(Path::new("/nonexistent/pubsite.toml")), None);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_from_file_resolves_database_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            "[server]\nport = 8000\n\n[database]\nurl = \"sqlite://sites.db\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.server.port, 8000);
        assert_eq!(
            config.database.url,
            format!("sqlite://{}", dir.path().join("sites.db").display())
        );
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_applies_cli_settings_after_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[server]\nhost = \"0.0.0.0\"\nport = 8000\n").unwrap();
        let settings = CliSettings {
            port: Some(8100),
            ..Default::default()
        };

        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8100);
    }

    #[test]
    fn test_load_rejects_invalid_cli_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();
        let settings = CliSettings {
            content_url: Some("not-a-url".to_owned()),
            ..Default::default()
        };

        let result = Config::load(Some(&path), Some(&settings));

        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_load_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[server\nport = ").unwrap();

        let result = Config::load(Some(&path), None);

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
