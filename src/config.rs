//! TOML configuration.
//!
//! ```toml
//! [remote]
//! base_url = "http://127.0.0.1:3000"
//! collection_path = "/api/contacts"
//! timeout_secs = 30
//!
//! [server]
//! bind = "127.0.0.1:3000"
//!
//! [logging]
//! filter = "warn"
//! ```
//!
//! Every section and key is optional.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Where the CLI looks for a config file when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "./config/contacts.toml";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// The contacts API the client syncs against.
#[derive(Debug, Deserialize, Clone)]
pub struct RemoteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_collection_path")]
    pub collection_path: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            collection_path: default_collection_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl RemoteConfig {
    /// Absolute URL of the collection endpoint.
    pub fn collection_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.collection_path.trim_end_matches('/')
        )
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:3000".to_string()
}
fn default_collection_path() -> String {
    "/api/contacts".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

/// Reference API server started by `contacts serve`.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, used when `RUST_LOG`
    /// is unset.
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

fn default_filter() -> String {
    "warn".to_string()
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

/// Load `path` if given; otherwise load the default path if it exists,
/// falling back to built-in defaults.
pub fn load_config_or_default(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => load_config(path),
        None => {
            let default = Path::new(DEFAULT_CONFIG_PATH);
            if default.exists() {
                load_config(default)
            } else {
                Ok(Config::default())
            }
        }
    }
}

fn validate(config: &Config) -> Result<()> {
    let remote = &config.remote;
    if remote.timeout_secs == 0 {
        anyhow::bail!("remote.timeout_secs must be > 0");
    }
    if !(remote.base_url.starts_with("http://") || remote.base_url.starts_with("https://")) {
        anyhow::bail!(
            "remote.base_url must start with http:// or https://, got '{}'",
            remote.base_url
        );
    }
    if !remote.collection_path.starts_with('/') {
        anyhow::bail!(
            "remote.collection_path must start with '/', got '{}'",
            remote.collection_path
        );
    }
    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(content: &str) -> (TempDir, std::path::PathBuf) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("contacts.toml");
        fs::write(&path, content).unwrap();
        (tmp, path)
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let (_tmp, path) = write_config("");
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.remote.collection_url(), "http://127.0.0.1:3000/api/contacts");
        assert_eq!(cfg.remote.timeout_secs, 30);
        assert_eq!(cfg.logging.filter, "warn");
    }

    #[test]
    fn test_collection_url_trims_slashes() {
        let (_tmp, path) = write_config(
            r#"
[remote]
base_url = "https://contacts.example.com/"
collection_path = "/v2/contacts/"
"#,
        );
        let cfg = load_config(&path).unwrap();
        assert_eq!(
            cfg.remote.collection_url(),
            "https://contacts.example.com/v2/contacts"
        );
    }

    #[test]
    fn test_rejects_bad_values() {
        for bad in [
            "[remote]\ntimeout_secs = 0\n",
            "[remote]\nbase_url = \"ftp://x\"\n",
            "[remote]\ncollection_path = \"api\"\n",
            "[server]\nbind = \" \"\n",
            "[remote\n",
        ] {
            let (_tmp, path) = write_config(bad);
            assert!(load_config(&path).is_err(), "accepted: {}", bad);
        }
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope.toml");
        assert!(load_config_or_default(Some(&missing)).is_err());
    }
}
