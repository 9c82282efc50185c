//! Service configuration loaded via OrthoConfig.
//!
//! Values layer CLI flags over `BANDSTAND_*` environment variables over an
//! optional configuration file.

use std::net::SocketAddr;
use std::path::PathBuf;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_BIND_ADDR: ([u8; 4], u16) = ([0, 0, 0, 0], 8080);

/// Where documents live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// JSON collections in a local directory.
    Local,
    /// PostgreSQL via Diesel.
    Postgres,
}

/// Invalid combinations of configuration values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("unknown storage backend '{value}'; expected local|postgres")]
    UnknownStorage { value: String },
    #[error("storage backend 'postgres' requires BANDSTAND_DATABASE_URL")]
    MissingDatabaseUrl,
    #[error("data directory {path} is not valid UTF-8")]
    NonUtf8DataDir { path: PathBuf },
}

/// Top-level service settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BANDSTAND")]
pub struct BandstandSettings {
    /// Storage backend: `local` (default) or `postgres`.
    pub storage: Option<String>,
    /// Directory holding the local JSON collections.
    pub data_dir: Option<PathBuf>,
    /// PostgreSQL connection string for the `postgres` backend.
    pub database_url: Option<String>,
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<SocketAddr>,
    /// Insert the sample bands when the catalogue is empty.
    #[ortho_config(default = false)]
    pub seed_samples: bool,
    /// Recompute like counters from like records at startup.
    #[ortho_config(default = false)]
    pub reconcile_likes: bool,
}

impl BandstandSettings {
    /// Parsed storage backend, [`StorageBackend::Local`] when unset.
    pub fn storage_backend(&self) -> Result<StorageBackend, SettingsError> {
        let Some(raw) = self.storage.as_deref() else {
            return Ok(StorageBackend::Local);
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "local" => Ok(StorageBackend::Local),
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            _ => Err(SettingsError::UnknownStorage {
                value: raw.to_owned(),
            }),
        }
    }

    /// Local data directory, `./data` when unset.
    pub fn data_dir(&self) -> Result<Utf8PathBuf, SettingsError> {
        let path = self
            .data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        Utf8PathBuf::from_path_buf(path).map_err(|path| SettingsError::NonUtf8DataDir { path })
    }

    /// Database URL, required by the `postgres` backend.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    /// Bind address, `0.0.0.0:8080` when unset.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from(DEFAULT_BIND_ADDR))
    }
}
