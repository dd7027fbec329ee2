//! Configuracion del servidor.
//!
//! Settings are layered: built-in defaults, then an optional file named by
//! `ROTOR_CONFIG`, then `ROTOR_`-prefixed environment variables.
//!
//! | Variable                    | Default    |
//! |-----------------------------|------------|
//! | `ROTOR_HOST`                | `0.0.0.0`  |
//! | `ROTOR_PORT`                | `8888`     |
//! | `ROTOR_DATA_DIR`            | `./data`   |
//! | `ROTOR_REFRESH_INTERVAL_MS` | `60000`    |
//! | `ROTOR_STORES`              | (none)     |
//!
//! `ROTOR_STORES` is a comma-separated list of `name` or
//! `name=metadata/path.json` entries. A bare name reads
//! `<name>/metadata.json` under the data dir.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Environment variable naming an optional settings file.
pub const CONFIG_FILE_ENV: &str = "ROTOR_CONFIG";

const ENV_PREFIX: &str = "ROTOR";

/// Server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Root directory of the local object storage.
    pub data_dir: PathBuf,
    /// Refresh interval shared by every store.
    pub refresh_interval_ms: u64,
    /// Store entries, see the module docs.
    pub stores: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8888,
            data_dir: PathBuf::from("./data"),
            refresh_interval_ms: 60_000,
            stores: Vec::new(),
        }
    }
}

/// One store to keep loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub name: String,
    /// Metadata path relative to the data dir.
    pub metadata_path: String,
}

impl ServerSettings {
    /// Loads settings from `ROTOR_CONFIG` and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let file = std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);
        Self::load_from(file.as_deref(), None)
    }

    /// Loads settings from an optional file and an environment map.
    ///
    /// `env` replaces the process environment when given.
    pub fn load_from(
        file: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = file {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("stores")
                .source(env),
        );

        builder.build()?.try_deserialize()
    }

    /// Returns the address to bind.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::Message(format!("invalid listen address: {}", e)))
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    /// Parses the configured store entries.
    pub fn store_settings(&self) -> Vec<StoreSettings> {
        self.stores
            .iter()
            .map(|entry| entry.trim())
            .filter(|entry| !entry.is_empty())
            .map(|entry| match entry.split_once('=') {
                Some((name, path)) => StoreSettings {
                    name: name.trim().to_string(),
                    metadata_path: path.trim().to_string(),
                },
                None => StoreSettings {
                    name: entry.to_string(),
                    metadata_path: format!("{}/metadata.json", entry),
                },
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_defaults() {
        let settings = ServerSettings::load_from(None, env(&[])).unwrap();

        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.port, 8888);
        assert_eq!(settings.refresh_interval(), Duration::from_secs(60));
        assert!(settings.store_settings().is_empty());
    }

    #[test]
    fn test_environment_overrides() {
        let settings = ServerSettings::load_from(
            None,
            env(&[
                ("ROTOR_PORT", "9000"),
                ("ROTOR_DATA_DIR", "/srv/rotor"),
                ("ROTOR_REFRESH_INTERVAL_MS", "1500"),
                ("ROTOR_STORES", "keys,salts=salts/meta.json"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.port, 9000);
        assert_eq!(settings.data_dir, PathBuf::from("/srv/rotor"));
        assert_eq!(settings.refresh_interval_ms, 1500);
        assert_eq!(
            settings.store_settings(),
            vec![
                StoreSettings {
                    name: "keys".into(),
                    metadata_path: "keys/metadata.json".into(),
                },
                StoreSettings {
                    name: "salts".into(),
                    metadata_path: "salts/meta.json".into(),
                },
            ]
        );
    }

    #[test]
    fn test_file_then_environment() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "port = 7000\nrefresh_interval_ms = 250\nstores = [\"keys\"]").unwrap();

        let settings =
            ServerSettings::load_from(Some(file.path()), env(&[("ROTOR_PORT", "7001")])).unwrap();

        assert_eq!(settings.port, 7001);
        assert_eq!(settings.refresh_interval_ms, 250);
        assert_eq!(settings.stores, vec!["keys"]);
    }

    #[test]
    fn test_socket_addr() {
        let settings = ServerSettings {
            host: "127.0.0.1".into(),
            port: 8080,
            ..Default::default()
        };
        assert_eq!(settings.socket_addr().unwrap().port(), 8080);

        let bad = ServerSettings {
            host: "not a host".into(),
            ..Default::default()
        };
        assert!(bad.socket_addr().is_err());
    }
}
