// ===========================================================================
// layout - Project Scaffold (<project>/data, <project>/models)
// ===========================================================================

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::folders::{self, Folders};
use crate::storage::{FolderId, Storage};
use crate::util;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Folder(#[from] folders::Error),

    #[error("project '{project}' has no {category} yet")]
    EmptyCategory { project: String, category: Category },

    #[error("cannot name a folder after '{0}'")]
    NoLeafName(String),
}

/// One of the two fixed subdivisions of a project
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    #[default]
    Data,
    Models,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Data, Category::Models];

    /// Remote folder name
    pub fn folder_name(self) -> &'static str {
        match self {
            Category::Data => "data",
            Category::Models => "models",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.folder_name())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "data" => Ok(Category::Data),
            "models" => Ok(Category::Models),
            other => Err(format!("unknown category '{other}' (expected data or models)")),
        }
    }
}

/// Creates and navigates project scaffolds
pub struct Projects<'a> {
    folders: Folders<'a>,
}

impl<'a> Projects<'a> {
    pub fn new(storage: &'a dyn Storage) -> Self {
        Self {
            folders: Folders::new(storage),
        }
    }

    pub fn folders(&self) -> &Folders<'a> {
        &self.folders
    }

    /// Create `<name>`, then `<name>/data`, then `<name>/models`.
    ///
    /// A failure after the root exists leaves the partial project in place.
    pub fn create_project(&self, name: &str) -> Result<FolderId> {
        let project = self.folders.create_folder(name, None)?;
        for category in Category::ALL {
            self.folders
                .create_folder(category.folder_name(), Some(&project))?;
        }
        Ok(project)
    }

    /// Top-level folders as (name, id), in listing order. Every root folder
    /// counts, whether or not it carries the data/models scaffold.
    pub fn list_projects(&self) -> Result<Vec<(String, FolderId)>> {
        Ok(self.folders.list_child_folders(&FolderId::root())?)
    }

    /// Create a fresh folder under `<project>/<category>` named after the
    /// last segment of `local_path`. Repeated uploads of the same directory
    /// produce sibling folders sharing a name.
    pub fn resolve_upload_target(
        &self,
        project: &str,
        category: Category,
        local_path: &Path,
    ) -> Result<FolderId> {
        let path = local_path.to_string_lossy();
        let leaf = util::leaf_name(&path);
        if leaf.is_empty() {
            return Err(Error::NoLeafName(path.into_owned()));
        }

        let category_id = self.resolve_category(project, category)?;
        Ok(self.folders.create_folder(&leaf, Some(&category_id))?)
    }

    /// Names of the dataset or model folders of a project, in listing order
    pub fn list_category(&self, project: &str, category: Category) -> Result<Vec<String>> {
        let category_id = self.resolve_category(project, category)?;
        let names: Vec<String> = self
            .folders
            .list_child_folders(&category_id)?
            .into_iter()
            .map(|(name, _)| name)
            .collect();

        if names.is_empty() {
            return Err(Error::EmptyCategory {
                project: project.to_string(),
                category,
            });
        }

        Ok(names)
    }

    fn resolve_category(&self, project: &str, category: Category) -> Result<FolderId> {
        let project_id = self.folders.find_folder_by_name(project, None)?;
        Ok(self
            .folders
            .find_folder_by_name(category.folder_name(), Some(&project_id))?)
    }
}
