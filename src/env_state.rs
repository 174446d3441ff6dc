//! # neolab environment state
//!
//! This module defines [`NeoConfig`], the user-facing configuration of the crate, and
//! [`NeoEnv`], the **shared environment object** passed to every component that talks
//! to the outside world:
//!
//! - A persistent **HTTP client** ([`ureq::Agent`]) built with the configured timeout.
//! - The **remote locations**: NEO catalog page, NEO orbit flat file, JPL Horizons API,
//!   NAIF planetary kernels.
//! - The **local data directory** where downloads, SPK kernels and the SQLite catalog live.
//!
//! ## Structure
//!
//! ```text
//! NeoEnv
//! ├── config       (NeoConfig)
//! └── http_client  (ureq::Agent)
//! ```
//!
//! ## Configuration sources
//!
//! [`NeoConfig::default`] points to the Minor Planet Center and JPL services and stores data
//! under the platform cache directory (`<cache>/neolab`). [`NeoConfig::from_env`] starts
//! from the defaults and applies any of the following environment variables:
//!
//! | Variable                 | Field               |
//! |--------------------------|---------------------|
//! | `NEOLAB_CATALOG_PAGE_URL`| `catalog_page_url`  |
//! | `NEOLAB_FLAT_FILE_URL`   | `flat_file_url`     |
//! | `NEOLAB_HORIZONS_URL`    | `horizons_url`      |
//! | `NEOLAB_HTTP_TIMEOUT`    | `http_timeout_secs` |
//! | `NEOLAB_DATA_DIR`        | `data_dir`          |
//! | `NEOLAB_DATABASE`        | `database_name`     |
//! | `NEOLAB_KERNEL_BASE_URL` | `kernel_base_url`   |
//! | `NEOLAB_SPK_KERNEL`      | `spk_kernel`        |
//!
//! ## Usage
//!
//! ```rust,no_run
//! use neolab::env_state::{NeoConfig, NeoEnv};
//!
//! let env = NeoEnv::new(NeoConfig::from_env());
//! let page = env.get_from_url(&env.config.catalog_page_url).unwrap();
//! println!("{} bytes", page.len());
//! ```
use std::time::Duration;

use camino::Utf8PathBuf;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;
use ureq::Agent;

use crate::neolab_errors::NeoError;

const DEFAULT_CATALOG_PAGE_URL: &str = "https://www.minorplanetcenter.net/iau/lists/MPLists.html";
const DEFAULT_FLAT_FILE_URL: &str = "https://www.minorplanetcenter.net/iau/MPCORB/NEA.txt";
const DEFAULT_HORIZONS_URL: &str = "https://ssd.jpl.nasa.gov/api/horizons.api";
const DEFAULT_DATABASE_NAME: &str = "neo_catalog.sqlite";
const COUNT_FILE_NAME: &str = "neo_count.txt";
const DEFAULT_KERNEL_BASE_URL: &str = "https://naif.jpl.nasa.gov/pub/naif/generic_kernels/spk/planets";
const DEFAULT_SPK_KERNEL: &str = "de440s";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeoConfig {
    pub catalog_page_url: String,
    pub flat_file_url: String,
    pub horizons_url: String,
    pub http_timeout_secs: u64,
    pub data_dir: Utf8PathBuf,
    pub database_name: String,
    /// Directory URL the SPK kernels are downloaded from.
    pub kernel_base_url: String,
    /// Planetary kernel version, e.g. `de440s` or `de442`.
    pub spk_kernel: String,
}

impl Default for NeoConfig {
    fn default() -> Self {
        let data_dir = BaseDirs::new()
            .and_then(|dirs| Utf8PathBuf::from_path_buf(dirs.cache_dir().to_path_buf()).ok())
            .unwrap_or_else(|| Utf8PathBuf::from("."))
            .join("neolab");

        NeoConfig {
            catalog_page_url: DEFAULT_CATALOG_PAGE_URL.into(),
            flat_file_url: DEFAULT_FLAT_FILE_URL.into(),
            horizons_url: DEFAULT_HORIZONS_URL.into(),
            http_timeout_secs: 30,
            data_dir,
            database_name: DEFAULT_DATABASE_NAME.into(),
            kernel_base_url: DEFAULT_KERNEL_BASE_URL.into(),
            spk_kernel: DEFAULT_SPK_KERNEL.into(),
        }
    }
}

impl NeoConfig {
    /// Default configuration overridden by the `NEOLAB_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`NeoConfig::from_env`] with an arbitrary variable lookup.
    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = NeoConfig::default();
        if let Some(url) = lookup("NEOLAB_CATALOG_PAGE_URL") {
            config.catalog_page_url = url;
        }
        if let Some(url) = lookup("NEOLAB_FLAT_FILE_URL") {
            config.flat_file_url = url;
        }
        if let Some(url) = lookup("NEOLAB_HORIZONS_URL") {
            config.horizons_url = url;
        }
        if let Some(timeout) = lookup("NEOLAB_HTTP_TIMEOUT").and_then(|t| t.parse().ok()) {
            config.http_timeout_secs = timeout;
        }
        if let Some(dir) = lookup("NEOLAB_DATA_DIR") {
            config.data_dir = dir.into();
        }
        if let Some(name) = lookup("NEOLAB_DATABASE") {
            config.database_name = name;
        }
        if let Some(url) = lookup("NEOLAB_KERNEL_BASE_URL") {
            config.kernel_base_url = url;
        }
        if let Some(kernel) = lookup("NEOLAB_SPK_KERNEL") {
            config.spk_kernel = kernel;
        }
        config
    }

    /// Path of the SQLite catalog inside the data directory.
    pub fn database_path(&self) -> Utf8PathBuf {
        self.data_dir.join(&self.database_name)
    }

    /// Path of the downloaded flat file inside the data directory.
    pub fn flat_file_path(&self) -> Utf8PathBuf {
        let file_name = self
            .flat_file_url
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .unwrap_or("NEA.txt");
        self.data_dir.join(file_name)
    }

    /// Path of the object count extracted from the catalog page.
    pub fn count_file_path(&self) -> Utf8PathBuf {
        self.data_dir.join(COUNT_FILE_NAME)
    }

    /// Cached location of the configured SPK kernel.
    pub fn kernel_path(&self) -> Utf8PathBuf {
        self.data_dir
            .join("kernels")
            .join(format!("{}.bsp", self.spk_kernel))
    }

    /// Remote location of the configured SPK kernel.
    pub fn kernel_url(&self) -> String {
        format!(
            "{}/{}.bsp",
            self.kernel_base_url.trim_end_matches('/'),
            self.spk_kernel
        )
    }

    /// Create the data directory if needed and return it.
    pub fn ensure_data_dir(&self) -> Result<&Utf8PathBuf, NeoError> {
        std::fs::create_dir_all(&self.data_dir)
            .map_err(|err| NeoError::UnableToCreateBaseDir(format!("{}: {err}", self.data_dir)))?;
        Ok(&self.data_dir)
    }
}

/// This object is passed to the components that need network access
///
/// # Fields
///
/// * `config` - The active configuration
/// * `http_client` - A ureq agent used to make blocking HTTP requests
#[derive(Debug, Clone)]
pub struct NeoEnv {
    pub config: NeoConfig,
    pub http_client: Agent,
}

impl Default for NeoEnv {
    fn default() -> Self {
        Self::new(NeoConfig::default())
    }
}

impl NeoEnv {
    pub fn new(config: NeoConfig) -> Self {
        let agent_config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.http_timeout_secs)))
            .build();
        let agent: Agent = agent_config.into();

        NeoEnv {
            config,
            http_client: agent,
        }
    }

    /// Blocking GET returning the body as text.
    pub fn get_from_url(&self, url: &str) -> Result<String, NeoError> {
        debug!(url, "GET");
        let body = self
            .http_client
            .get(url)
            .call()?
            .body_mut()
            .read_to_string()?;
        Ok(body)
    }

    /// Blocking GET with query parameters, returning the body as text.
    pub fn get_with_query(&self, url: &str, params: &[(&str, &str)]) -> Result<String, NeoError> {
        debug!(url, n_params = params.len(), "GET with query");
        let mut request = self.http_client.get(url);
        for (key, value) in params {
            request = request.query(*key, *value);
        }
        let body = request.call()?.body_mut().read_to_string()?;
        Ok(body)
    }
}
