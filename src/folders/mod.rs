// ===========================================================================
// folders - Name-addressed Folder Directory over an Id-addressed Store
// ===========================================================================

use crate::storage::{self, FolderId, Query, Storage};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no folder named '{0}' found")]
    NotFound(String),

    #[error("multiple folders named '{name}' found ({count} matches)")]
    AmbiguousName { name: String, count: usize },

    #[error("failed to {action} folder '{name}': {source}")]
    RemoteService {
        action: &'static str,
        name: String,
        #[source]
        source: storage::Error,
    },
}

impl Error {
    fn remote<'n>(
        action: &'static str,
        name: &'n str,
    ) -> impl FnOnce(storage::Error) -> Self + 'n {
        move |source| Error::RemoteService {
            action,
            name: name.to_string(),
            source,
        }
    }
}

/// Folder tree addressed by name.
///
/// Names are not unique on the remote side, so lookups refuse to guess:
/// zero matches and several matches are both errors.
pub struct Folders<'a> {
    storage: &'a dyn Storage,
}

impl<'a> Folders<'a> {
    pub fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }

    /// Create a new folder under `parent` (root if `None`). Never reuses an
    /// existing folder of the same name.
    pub fn create_folder(&self, name: &str, parent: Option<&FolderId>) -> Result<FolderId> {
        self.storage
            .create_folder(name, parent)
            .map_err(Error::remote("create", name))
    }

    /// Resolve exactly one folder named `name`, optionally restricted to
    /// direct children of `parent`.
    pub fn find_folder_by_name(&self, name: &str, parent: Option<&FolderId>) -> Result<FolderId> {
        let query = Query::folders().named(name).under(parent);
        let mut matches = self
            .storage
            .list(&query)
            .map_err(Error::remote("search for", name))?;

        match matches.len() {
            0 => Err(Error::NotFound(name.to_string())),
            1 => Ok(matches.remove(0).id),
            count => Err(Error::AmbiguousName {
                name: name.to_string(),
                count,
            }),
        }
    }

    /// Direct child folders of `parent` as (name, id), in listing order
    pub fn list_child_folders(&self, parent: &FolderId) -> Result<Vec<(String, FolderId)>> {
        let query = Query::folders().under(Some(parent));
        let entries = self
            .storage
            .list(&query)
            .map_err(Error::remote("list children of", parent.as_str()))?;

        Ok(entries.into_iter().map(|e| (e.name, e.id)).collect())
    }
}
