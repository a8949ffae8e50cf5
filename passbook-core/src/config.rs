//! Configuration management
//!
//! Reads settings.json from the data directory:
//! ```json
//! {
//!   "server": { "listenAddr": "127.0.0.1:8080" },
//!   "auth": { "jwtSecret": "...", "tokenTtlSecs": 86400 }
//! }
//! ```

use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_TOKEN_TTL_SECS: u64 = 86_400;
const DEV_JWT_SECRET: &str = "passbook-dev-secret";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    server: ServerSettings,
    #[serde(default)]
    auth: AuthSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServerSettings {
    #[serde(default)]
    listen_addr: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthSettings {
    #[serde(default)]
    jwt_secret: Option<String>,
    #[serde(default)]
    token_ttl_secs: Option<u64>,
}

/// Passbook configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub jwt_secret: String,
    pub token_ttl_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }
}

impl Config {
    /// Load config from the data directory
    ///
    /// The listen address and JWT secret can also come from the
    /// environment (PASSBOOK_LISTEN, PASSBOOK_JWT_SECRET), which takes
    /// precedence over the settings file.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let settings_path = data_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        let listen_addr = match std::env::var("PASSBOOK_LISTEN").ok() {
            Some(addr) if !addr.is_empty() => addr,
            _ => raw
                .server
                .listen_addr
                .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string()),
        };

        let jwt_secret = match std::env::var("PASSBOOK_JWT_SECRET").ok() {
            Some(secret) if !secret.is_empty() => secret,
            _ => raw.auth.jwt_secret.unwrap_or_else(|| {
                tracing::warn!("no JWT secret configured, using the development default");
                DEV_JWT_SECRET.to_string()
            }),
        };

        let token_ttl_secs = raw.auth.token_ttl_secs.unwrap_or(DEFAULT_TOKEN_TTL_SECS);

        Ok(Self {
            listen_addr,
            jwt_secret,
            token_ttl_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_no_settings_file() {
        let dir = TempDir::new().unwrap();

        let config = Config::load(dir.path()).unwrap();

        assert_eq!(config.listen_addr, DEFAULT_LISTEN_ADDR);
        assert_eq!(config.token_ttl_secs, DEFAULT_TOKEN_TTL_SECS);
    }

    #[test]
    fn test_settings_file_values_used() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{
                "server": { "listenAddr": "0.0.0.0:9999" },
                "auth": { "jwtSecret": "file-secret", "tokenTtlSecs": 600 }
            }"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();

        assert_eq!(config.listen_addr, "0.0.0.0:9999");
        assert_eq!(config.jwt_secret, "file-secret");
        assert_eq!(config.token_ttl_secs, 600);
    }

    #[test]
    fn test_malformed_settings_fall_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("settings.json"), "{not json").unwrap();

        let config = Config::load(dir.path()).unwrap();

        assert_eq!(config.listen_addr, DEFAULT_LISTEN_ADDR);
    }
}
