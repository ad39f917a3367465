//! Layered configuration.
//!
//! Sources, lowest priority first:
//! 1. compiled defaults,
//! 2. `cube.toml` in the platform config directory,
//! 3. `cube.toml` in the working directory,
//! 4. an explicit file (TOML, YAML or JSON by extension),
//! 5. `CUBE_` environment variables, with `__` separating nested keys
//!    (`CUBE_SOURCE__URL_TEMPLATE`).

pub mod error;

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{ErrorKind, Result};

pub const FILE_NAME: &str = "cube.toml";
pub const ENV_PREFIX: &str = "CUBE_";
const FALLBACK_CACHE_DIR: &str = ".cube-cache";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the lookup stores.
    pub cache_dir: PathBuf,
    pub source: SourceConfig,
    pub deck: DeckConfig,
    pub collection: CollectionConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Address of a card details page; `{id}` is replaced by the identifier.
    pub url_template: String,
    /// Prepended to page-relative image links.
    pub image_host: String,
    /// Absent means requests never time out.
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Written as `loc:` on every exported deck record.
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// Written as `r:` on every exported collection record.
    pub rating: u32,
}

impl Default for Config {
    fn default() -> Self {
        let cache_dir = project_dirs()
            .map(|dirs| dirs.cache_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(FALLBACK_CACHE_DIR));
        Self {
            cache_dir,
            source: SourceConfig::default(),
            deck: DeckConfig::default(),
            collection: CollectionConfig::default(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url_template: cube_fetch::DEFAULT_URL_TEMPLATE.to_string(),
            image_host: cube_extract::DEFAULT_IMAGE_HOST.to_string(),
            timeout_secs: None,
            user_agent: None,
        }
    }
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self { location: "Deck".to_string() }
    }
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self { rating: 1 }
    }
}

impl Config {
    /// Load every layer, with `explicit` (from `--config`) above the
    /// discovered files.
    #[instrument]
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut files = Vec::new();
        if let Some(dirs) = project_dirs() {
            files.push(dirs.config_dir().join(FILE_NAME));
        }
        files.push(PathBuf::from(FILE_NAME));
        if let Some(path) = explicit {
            if !path.is_file() {
                exn::bail!(ErrorKind::Invalid(format!("config file {} does not exist", path.display())));
            }
            files.push(path.to_path_buf());
        }
        Self::from_figment(&Self::figment(&files))
    }

    /// Defaults, then each of `files` in order (missing files are skipped),
    /// then the environment.
    pub fn figment(files: &[PathBuf]) -> Figment {
        let figment = files
            .iter()
            .fold(Figment::from(Serialized::defaults(Self::default())), |figment, path| merge_file(figment, path));
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn from_figment(figment: &Figment) -> Result<Self> {
        let config: Self = figment.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        tracing::debug!(cache_dir = %config.cache_dir.display(), source = %config.source.url_template, "Configuration loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.source.url_template.contains(cube_fetch::ID_PLACEHOLDER) {
            exn::bail!(ErrorKind::Invalid(format!(
                "source.url_template must contain {}",
                cube_fetch::ID_PLACEHOLDER
            )));
        }
        if self.source.image_host.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid("source.image_host is empty".to_string()));
        }
        if self.source.timeout_secs == Some(0) {
            exn::bail!(ErrorKind::Invalid("source.timeout_secs must be positive".to_string()));
        }
        if self.deck.location.contains('\n') {
            exn::bail!(ErrorKind::Invalid("deck.location must be a single line".to_string()));
        }
        if self.cache_dir.as_os_str().is_empty() {
            exn::bail!(ErrorKind::Invalid("cache_dir is empty".to_string()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.source.timeout_secs.map(Duration::from_secs)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "cube")
}

fn merge_file(figment: Figment, path: &Path) -> Figment {
    match path.extension().and_then(OsStr::to_str) {
        Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path)),
        Some("json") => figment.merge(Json::file_exact(path)),
        _ => figment.merge(Toml::file_exact(path)),
    }
}
