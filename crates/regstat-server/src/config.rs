use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use regstat_store::StoreConfig;

use crate::error::{ServerError, ServerResult};

/// HTTP endpoint configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Route at which the registry posts notification envelopes.
    pub route: String,
    pub tls: Option<TlsConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:10443".parse().unwrap(),
            route: "/events".to_owned(),
            tls: None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TlsConfig {
    /// Path to a certificate file in PEM format.
    pub cert_path: PathBuf,
    /// Path to the matching certificate key file.
    pub key_path: PathBuf,
}

/// Full collector configuration: HTTP endpoint plus statistics store.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
}

impl CollectorConfig {
    /// Load from a TOML file. Missing fields fall back to defaults; the
    /// result is validated before it is returned.
    pub fn load(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)
            .map_err(|e| ServerError::Config(format!("failed to parse {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot possibly serve.
    pub fn validate(&self) -> ServerResult<()> {
        if !self.server.route.starts_with('/') {
            return Err(ServerError::Config(format!(
                "route must start with '/': {:?}",
                self.server.route
            )));
        }
        if let Some(tls) = &self.server.tls {
            if !tls.cert_path.exists() {
                return Err(ServerError::Config(format!(
                    "certificate file not found: {}",
                    tls.cert_path.display()
                )));
            }
            if !tls.key_path.exists() {
                return Err(ServerError::Config(format!(
                    "certificate key file not found: {}",
                    tls.key_path.display()
                )));
            }
        }
        if self.store.database.is_empty() {
            return Err(ServerError::Config(
                "store database must not be empty".to_owned(),
            ));
        }
        if self.store.collection.is_empty() {
            return Err(ServerError::Config(
                "store collection must not be empty".to_owned(),
            ));
        }
        Ok(())
    }
}
