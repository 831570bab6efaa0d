// ===========================================================================
// upload - Flatten a Local Tree into One Remote Folder
// ===========================================================================

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::storage::{self, FolderId, Storage};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("'{0}' is not a directory")]
    NotADirectory(PathBuf),

    #[error("failed to walk local tree: {0}")]
    Walk(#[from] ignore::Error),

    #[error("upload of '{}' failed after {uploaded} file(s): {source}", .path.display())]
    Upload {
        uploaded: usize,
        path: PathBuf,
        #[source]
        source: storage::Error,
    },
}

/// Observer notified as files finish transferring
pub trait Progress {
    fn begin(&mut self, _total: usize) {}

    /// Called once per file, after it has been stored remotely
    fn advance(&mut self, done: usize, total: usize, file: &LocalFile);
}

/// Progress sink that ignores every event
pub struct Silent;

impl Progress for Silent {
    fn advance(&mut self, _done: usize, _total: usize, _file: &LocalFile) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub path: PathBuf,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadReport {
    pub files_uploaded: usize,
}

/// Every regular file under `root` at any depth, hidden files included.
///
/// Each directory's entries are visited in file-name order.
pub fn collect_files(root: &Path) -> Result<Vec<LocalFile>> {
    if !root.is_dir() {
        return Err(Error::NotADirectory(root.to_path_buf()));
    }

    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        files.push(LocalFile {
            path: path.to_path_buf(),
            name: entry.file_name().to_string_lossy().into_owned(),
        });
    }

    Ok(files)
}

/// Upload every file under `local_root` directly into `target`.
///
/// Sub-directories are not recreated remotely. The first failed transfer
/// stops the batch; files already sent stay where they are.
pub fn upload_tree(
    storage: &dyn Storage,
    local_root: &Path,
    target: &FolderId,
    progress: &mut dyn Progress,
) -> Result<UploadReport> {
    let files = collect_files(local_root)?;
    let total = files.len();
    progress.begin(total);

    for (uploaded, file) in files.iter().enumerate() {
        storage
            .upload_file(&file.name, target, &file.path)
            .map_err(|source| Error::Upload {
                uploaded,
                path: file.path.clone(),
                source,
            })?;
        progress.advance(uploaded + 1, total, file);
    }

    Ok(UploadReport {
        files_uploaded: total,
    })
}
