//! Engine configuration file support.
//!
//! Configuration is read from a TOML file, then environment variables are
//! applied on top. Every section has defaults, so an empty file is valid.
//!
//! ```toml
//! [catalog]
//! stars_path = "resources/hip_main.dat"
//! constellations_path = "resources/constellationship.fab"
//!
//! [geocoding]
//! vworld_api_key = "..."
//! timeout_secs = 10
//!
//! [sky]
//! magnitude_limit = 6.5
//! weight_offset = 3.0
//!
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{SkyError, SkyResult};

/// Engine configuration from file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub geocoding: GeocodingSettings,
    #[serde(default)]
    pub sky: SkySettings,
    #[serde(default)]
    pub server: ServerSettings,
}

/// Locations of the static data files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSettings {
    #[serde(default = "default_stars_path")]
    pub stars_path: PathBuf,
    #[serde(default = "default_constellations_path")]
    pub constellations_path: PathBuf,
}

/// Geocoding provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingSettings {
    /// Regional provider key; the regional path is disabled without it
    #[serde(default)]
    pub vworld_api_key: Option<String>,
    #[serde(default = "default_vworld_url")]
    pub vworld_url: String,
    #[serde(default = "default_nominatim_url")]
    pub nominatim_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Sky computation parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SkySettings {
    #[serde(default = "default_magnitude_limit")]
    pub magnitude_limit: f64,
    /// Offset in the brightness weight `1 / (magnitude + offset)`
    #[serde(default = "default_weight_offset")]
    pub weight_offset: f64,
}

/// HTTP server bind settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_stars_path() -> PathBuf {
    PathBuf::from("resources/hip_main.dat")
}

fn default_constellations_path() -> PathBuf {
    PathBuf::from("resources/constellationship.fab")
}

fn default_vworld_url() -> String {
    "https://api.vworld.kr/req/address".to_string()
}

fn default_nominatim_url() -> String {
    "https://nominatim.openstreetmap.org/search".to_string()
}

fn default_user_agent() -> String {
    concat!("nightsky-rust/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Traditional naked-eye limit.
pub fn default_magnitude_limit() -> f64 {
    6.5
}

fn default_weight_offset() -> f64 {
    3.0
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            stars_path: default_stars_path(),
            constellations_path: default_constellations_path(),
        }
    }
}

impl Default for GeocodingSettings {
    fn default() -> Self {
        Self {
            vworld_api_key: None,
            vworld_url: default_vworld_url(),
            nominatim_url: default_nominatim_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GeocodingSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The configured key, ignoring blank values.
    pub fn regional_key(&self) -> Option<&str> {
        self.vworld_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

impl Default for SkySettings {
    fn default() -> Self {
        Self {
            magnitude_limit: default_magnitude_limit(),
            weight_offset: default_weight_offset(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(EngineConfig)` if successful
    /// * `Err(SkyError::Configuration)` if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> SkyResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            SkyError::Configuration(format!("Failed to read config file: {}", e))
        })?;

        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> SkyResult<Self> {
        toml::from_str(content)
            .map_err(|e| SkyError::Configuration(format!("Failed to parse config file: {}", e)))
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `nightsky.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    ///
    /// Falls back to built-in defaults when no file exists. Environment
    /// overrides are applied in both cases.
    pub fn load() -> SkyResult<Self> {
        let search_paths = [
            PathBuf::from("nightsky.toml"),
            PathBuf::from("backend/nightsky.toml"),
            PathBuf::from("../nightsky.toml"),
        ];

        let mut config = match search_paths.iter().find(|p| p.exists()) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable source (normally the process environment).
    ///
    /// Recognized variables: `VWORLD_API_KEY`, `NIGHTSKY_STARS_PATH`,
    /// `NIGHTSKY_CONSTELLATIONS_PATH`, `HOST`, `PORT`. An unparsable `PORT`
    /// is ignored.
    pub fn apply_env_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = var("VWORLD_API_KEY") {
            self.geocoding.vworld_api_key = Some(key);
        }
        if let Some(path) = var("NIGHTSKY_STARS_PATH") {
            self.catalog.stars_path = PathBuf::from(path);
        }
        if let Some(path) = var("NIGHTSKY_CONSTELLATIONS_PATH") {
            self.catalog.constellations_path = PathBuf::from(path);
        }
        if let Some(host) = var("HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
    }

    /// Reject settings the engine cannot work with.
    pub fn validate(&self) -> SkyResult<()> {
        if self.geocoding.timeout_secs == 0 {
            return Err(SkyError::Configuration(
                "'geocoding.timeout_secs' must be greater than zero".to_string(),
            ));
        }
        if !self.sky.magnitude_limit.is_finite() {
            return Err(SkyError::Configuration(
                "'sky.magnitude_limit' must be a finite number".to_string(),
            ));
        }
        if !(self.sky.weight_offset.is_finite() && self.sky.weight_offset > 0.0) {
            return Err(SkyError::Configuration(
                "'sky.weight_offset' must be a positive number".to_string(),
            ));
        }
        Ok(())
    }
}
