// ===========================================================================
// storage - Remote Object Store Seam (Drive REST + in-memory)
// ===========================================================================

mod drive;
mod memory;

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub use drive::{align_chunk_size, DriveClient, FOLDER_MIME};
pub use memory::{MemoryStorage, Op};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Response(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Rejected(String),
}

/// Opaque identifier assigned by the provider. Never changes once issued.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderId(String);

/// Provider alias for the top of the drive
pub const ROOT_ALIAS: &str = "root";

impl FolderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The drive's top level, usable wherever a parent id is expected
    pub fn root() -> Self {
        Self::new(ROOT_ALIAS)
    }

    pub fn is_root(&self) -> bool {
        self.0 == ROOT_ALIAS
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One listed remote object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: FolderId,
    pub name: String,
}

/// Filter for `Storage::list`. Every set field must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub name: Option<String>,
    pub parent: Option<FolderId>,
    pub folders_only: bool,
}

impl Query {
    pub fn folders() -> Self {
        Self {
            folders_only: true,
            ..Self::default()
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn under(mut self, parent: Option<&FolderId>) -> Self {
        self.parent = parent.cloned();
        self
    }
}

/// Flat, id-addressed object store. Every call blocks until the provider answers.
pub trait Storage {
    /// Create a new folder; never reuses an existing one.
    fn create_folder(&self, name: &str, parent: Option<&FolderId>) -> Result<FolderId>;

    fn list(&self, query: &Query) -> Result<Vec<Entry>>;

    /// Stream a local file into a new remote object under `parent`.
    fn upload_file(&self, name: &str, parent: &FolderId, path: &Path) -> Result<FolderId>;
}
