//! Layered service configuration.
//!
//! Sources, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. `settings.{toml,json,yaml}` in the configuration directory
//! 3. `settings.<environment>.{toml,json,yaml}`
//! 4. process environment variables (`FLIGHTBOOK_DATABASE__URL`, ...)
//!
//! Developer secrets live in a `.env` file that [`load_developer_secrets`] copies into
//! the process environment for development environments only, so they sit between the
//! files and the real environment (dotenvy never overwrites a variable that is set).

use anyhow::{Context, Result};
use config::{Config, Environment, File, Map};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "FLIGHTBOOK";
pub const DEFAULT_ENVIRONMENT: &str = "development";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Environment name the settings were loaded for; never read from a source.
    #[serde(skip)]
    pub environment: String,
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub token: TokenSettings,
    #[serde(default)]
    pub cors: CorsSettings,
    pub logging: LoggingSettings,
    #[serde(default)]
    pub metrics: MetricsSettings,
    #[serde(default)]
    pub sentry: SentrySettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub interface: String,
    pub port: u16,
    /// Reject every request that did not arrive over HTTPS.
    pub require_https: bool,
    /// Honour `X-Forwarded-Proto` / `Forwarded` set by a TLS-terminating proxy.
    pub trust_forwarded_proto: bool,
}

#[derive(Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

// Keeps credentials embedded in the URL out of debug logs.
impl std::fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("url", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

#[derive(Clone, Deserialize)]
pub struct TokenSettings {
    /// HMAC key used to sign and verify bearer tokens.
    pub signing_key: String,
    #[serde(default)]
    pub issuer: Option<String>,
    #[serde(default)]
    pub audience: Option<String>,
    pub lifetime_hours: i64,
}

impl std::fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSettings")
            .field("signing_key", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("lifetime_hours", &self.lifetime_hours)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins. Empty, or containing `*`, allows any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub filter: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsSettings {
    #[serde(default)]
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SentrySettings {
    #[serde(default)]
    pub dsn: Option<String>,
}

/// Whether developer-only sources (the `.env` secrets file) apply to this environment.
pub fn is_development(environment: &str) -> bool {
    matches!(
        environment.to_ascii_lowercase().as_str(),
        "development" | "dev" | "local"
    )
}

/// Copy `.env` from the configuration directory into the process environment.
///
/// Only used for development environments. Returns the path that was loaded, or
/// `None` when there is no file; an unreadable or malformed one is an error. Runs
/// before logging is configured, so reporting is left to the caller.
pub fn load_developer_secrets(config_dir: &Path) -> Result<Option<PathBuf>> {
    let path = config_dir.join(".env");
    match dotenvy::from_path(&path) {
        Ok(()) => Ok(Some(path)),
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to load {}", path.display())),
    }
}

impl Settings {
    /// Load settings for `environment` from `config_dir` and the process environment.
    pub fn load(config_dir: &Path, environment: &str) -> Result<Self> {
        Self::load_with_env(config_dir, environment, None)
    }

    /// Same as [`Settings::load`], but reads environment variables from `env_vars`
    /// instead of the process environment when given.
    pub fn load_with_env(
        config_dir: &Path,
        environment: &str,
        env_vars: Option<Map<String, String>>,
    ) -> Result<Self> {
        let base = config_dir.join("settings");
        let specific = config_dir.join(format!("settings.{}", environment));

        let config = Config::builder()
            .set_default("server.interface", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("server.require_https", true)?
            .set_default("server.trust_forwarded_proto", true)?
            .set_default("database.max_connections", 10)?
            .set_default("token.lifetime_hours", 24 * 7)?
            .set_default("logging.filter", "info")?
            .add_source(File::with_name(&base.to_string_lossy()).required(false))
            .add_source(File::with_name(&specific.to_string_lossy()).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .source(env_vars),
            )
            .build()
            .with_context(|| {
                format!(
                    "Failed to read configuration from {} for environment '{}'",
                    config_dir.display(),
                    environment
                )
            })?;

        let mut settings: Settings = config
            .try_deserialize()
            .context("Configuration is incomplete or has invalid values")?;
        settings.environment = environment.to_string();

        if settings.token.signing_key.trim().is_empty() {
            anyhow::bail!("token.signing_key must not be empty");
        }
        if settings.token.lifetime_hours <= 0 {
            anyhow::bail!("token.lifetime_hours must be positive");
        }

        Ok(settings)
    }

    pub fn http_address(&self) -> String {
        format!("{}:{}", self.server.interface, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn required_env() -> Map<String, String> {
        let mut env = Map::new();
        env.insert(
            "FLIGHTBOOK_DATABASE__URL".to_string(),
            "postgres://env/flightbook".to_string(),
        );
        env.insert(
            "FLIGHTBOOK_TOKEN__SIGNING_KEY".to_string(),
            "env-secret".to_string(),
        );
        env
    }

    fn write(dir: &TempDir, name: &str, contents: &str) {
        fs::write(dir.path().join(name), contents).unwrap();
    }

    #[test]
    fn test_defaults_without_files() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load_with_env(dir.path(), "production", Some(required_env()))
            .expect("missing optional files must not be an error");

        assert_eq!(settings.environment, "production");
        assert_eq!(settings.server.interface, "0.0.0.0");
        assert_eq!(settings.server.port, 5000);
        assert!(settings.server.require_https);
        assert_eq!(settings.database.max_connections, 10);
        assert_eq!(settings.token.lifetime_hours, 168);
        assert!(settings.cors.allowed_origins.is_empty());
        assert_eq!(settings.metrics.port, None);
        assert_eq!(settings.sentry.dsn, None);
    }

    #[test]
    fn test_environment_file_overrides_base_file() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "settings.toml",
            r#"
[server]
port = 1000
interface = "127.0.0.1"

[database]
url = "postgres://base/flightbook"

[token]
signing_key = "base-secret"
"#,
        );
        write(
            &dir,
            "settings.staging.toml",
            r#"
[server]
port = 2000
"#,
        );

        let settings = Settings::load_with_env(dir.path(), "staging", Some(Map::new())).unwrap();
        assert_eq!(settings.server.port, 2000);
        // Values the environment file does not mention come from the base file
        assert_eq!(settings.server.interface, "127.0.0.1");
        assert_eq!(settings.database.url, "postgres://base/flightbook");

        // A different environment ignores the staging file
        let settings =
            Settings::load_with_env(dir.path(), "production", Some(Map::new())).unwrap();
        assert_eq!(settings.server.port, 1000);
    }

    #[test]
    fn test_environment_variables_override_files() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "settings.toml",
            r#"
[server]
port = 1000

[database]
url = "postgres://base/flightbook"

[token]
signing_key = "base-secret"
"#,
        );
        write(&dir, "settings.staging.toml", "[server]\nport = 2000\n");

        let mut env = required_env();
        env.insert("FLIGHTBOOK_SERVER__PORT".to_string(), "3000".to_string());
        env.insert(
            "FLIGHTBOOK_CORS__ALLOWED_ORIGINS".to_string(),
            "https://a.example,https://b.example".to_string(),
        );

        let settings = Settings::load_with_env(dir.path(), "staging", Some(env)).unwrap();
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.database.url, "postgres://env/flightbook");
        assert_eq!(settings.token.signing_key, "env-secret");
        assert_eq!(
            settings.cors.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        write(&dir, "settings.toml", "[server\nport = ");

        let result = Settings::load_with_env(dir.path(), "production", Some(required_env()));
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_required_values_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = Settings::load_with_env(dir.path(), "production", Some(Map::new()));
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_signing_key_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut env = required_env();
        env.insert("FLIGHTBOOK_TOKEN__SIGNING_KEY".to_string(), " ".to_string());
        let result = Settings::load_with_env(dir.path(), "production", Some(env));
        assert!(result.is_err());
    }

    #[test]
    fn test_token_lifetime_must_be_positive() {
        let dir = TempDir::new().unwrap();
        write(&dir, "settings.toml", "[token]\nlifetime_hours = 0\n");
        let result = Settings::load_with_env(dir.path(), "production", Some(required_env()));
        assert_eq!(
            result.unwrap_err().to_string(),
            "token.lifetime_hours must be positive"
        );
    }

    #[test]
    fn test_is_development() {
        assert!(is_development("development"));
        assert!(is_development("Development"));
        assert!(is_development("local"));
        assert!(!is_development("production"));
        assert!(!is_development("staging"));
    }

    #[test]
    fn test_missing_developer_secrets_file_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        assert_eq!(load_developer_secrets(dir.path()).unwrap(), None);
    }

    #[test]
    #[serial]
    fn test_developer_secrets_feed_the_environment_layer() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "settings.toml",
            r#"
[database]
url = "postgres://base/flightbook"

[token]
signing_key = "base-secret"
"#,
        );
        write(
            &dir,
            ".env",
            "FLIGHTBOOK_LOGGING__FILTER=flightbook=debug\n",
        );

        let loaded = load_developer_secrets(dir.path()).unwrap();
        assert_eq!(loaded, Some(dir.path().join(".env")));
        let settings = Settings::load(dir.path(), "development").unwrap();
        assert_eq!(settings.logging.filter, "flightbook=debug");
        assert!(is_development(&settings.environment));
    }

    #[test]
    fn test_debug_output_redacts_secrets() {
        let dir = TempDir::new().unwrap();
        let settings =
            Settings::load_with_env(dir.path(), "production", Some(required_env())).unwrap();
        let rendered = format!("{:?}", settings);
        assert!(!rendered.contains("env-secret"));
        assert!(!rendered.contains("postgres://env"));
    }
}
