// ===========================================================================
// config - Configuration Loading (~/.mlcontrol/config.toml)
// ===========================================================================

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read config: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("home directory not found")]
    NoHome,
}

// ---------------------------------------------------------------------------
// File Config
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub upload: UploadConfig,

    #[serde(default)]
    pub gpu: GpuConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthConfig {
    /// OAuth client secrets downloaded from the cloud console
    #[serde(default = "default_credentials_file")]
    pub credentials_file: PathBuf,

    /// Persisted access/refresh token
    #[serde(default = "default_token_file")]
    pub token_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadConfig {
    #[serde(default = "default_chunk_size_mib")]
    pub chunk_size_mib: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GpuConfig {
    #[serde(default = "default_gpu_program")]
    pub program: String,

    #[serde(default = "default_gpu_args")]
    pub args: Vec<String>,
}

fn default_credentials_file() -> PathBuf {
    PathBuf::from("credentials.json")
}

fn default_token_file() -> PathBuf {
    PathBuf::from("token.json")
}

fn default_chunk_size_mib() -> u64 {
    8
}

fn default_gpu_program() -> String {
    "vastai".to_string()
}

fn default_gpu_args() -> Vec<String> {
    vec!["search".to_string(), "offers".to_string()]
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            credentials_file: default_credentials_file(),
            token_file: default_token_file(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            chunk_size_mib: default_chunk_size_mib(),
        }
    }
}

impl Default for GpuConfig {
    fn default() -> Self {
        Self {
            program: default_gpu_program(),
            args: default_gpu_args(),
        }
    }
}

impl UploadConfig {
    /// Chunk size in bytes, before alignment to the provider's grid
    pub fn chunk_size_bytes(&self) -> usize {
        let bytes = self.chunk_size_mib.saturating_mul(1024 * 1024);
        usize::try_from(bytes).unwrap_or(usize::MAX)
    }
}

// ---------------------------------------------------------------------------
// Runtime Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub base_dir: PathBuf,
    pub auth: AuthConfig,
    pub upload: UploadConfig,
    pub gpu: GpuConfig,
}

impl Config {
    /// Load ~/.mlcontrol/config.toml, falling back to defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::base_dir()?)
    }

    pub fn load_from(base_dir: &Path) -> Result<Self> {
        let global = Self::load_global(base_dir)?;

        Ok(Self {
            base_dir: base_dir.to_path_buf(),
            auth: global.auth,
            upload: global.upload,
            gpu: global.gpu,
        })
    }

    pub fn base_dir() -> Result<PathBuf> {
        let base = BaseDirs::new().ok_or(Error::NoHome)?;
        Ok(base.home_dir().join(".mlcontrol"))
    }

    fn load_global(base_dir: &Path) -> Result<GlobalConfig> {
        let path = base_dir.join("config.toml");
        if !path.exists() {
            return Ok(GlobalConfig::default());
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Write the effective settings back as a config file
    pub fn save(&self) -> Result<PathBuf> {
        let global = GlobalConfig {
            auth: self.auth.clone(),
            upload: self.upload.clone(),
            gpu: self.gpu.clone(),
        };
        std::fs::create_dir_all(&self.base_dir)?;
        let path = self.base_dir.join("config.toml");
        std::fs::write(&path, toml::to_string_pretty(&global)?)?;
        Ok(path)
    }
}
