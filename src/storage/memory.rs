// ===========================================================================
// storage/memory - In-process Store with an Operation Log
// ===========================================================================

use std::cell::RefCell;
use std::path::Path;

use super::{Entry, Error, FolderId, Query, Result, Storage};

/// A call recorded by `MemoryStorage`, in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    CreateFolder {
        name: String,
        parent: Option<FolderId>,
    },
    List(Query),
    Upload {
        name: String,
        parent: FolderId,
    },
}

#[derive(Debug, Clone)]
struct Object {
    id: FolderId,
    name: String,
    parent: Option<FolderId>,
    content: Option<Vec<u8>>,
}

impl Object {
    fn is_folder(&self) -> bool {
        self.content.is_none()
    }

    fn matches(&self, query: &Query) -> bool {
        if query.folders_only && !self.is_folder() {
            return false;
        }
        if let Some(name) = &query.name {
            if &self.name != name {
                return false;
            }
        }
        match &query.parent {
            Some(parent) if parent.is_root() => self.parent.is_none(),
            Some(parent) => self.parent.as_ref() == Some(parent),
            None => true,
        }
    }
}

#[derive(Debug, Default)]
struct State {
    next_id: u64,
    objects: Vec<Object>,
    ops: Vec<Op>,
    uploads: usize,
    fail_upload_at: Option<usize>,
    fail_create: Option<String>,
    fail_list: bool,
}

impl State {
    fn insert(&mut self, name: &str, parent: Option<&FolderId>, content: Option<Vec<u8>>) -> FolderId {
        self.next_id += 1;
        let id = FolderId::new(format!("mem-{}", self.next_id));
        self.objects.push(Object {
            id: id.clone(),
            name: name.to_string(),
            parent: parent.filter(|p| !p.is_root()).cloned(),
            content,
        });
        id
    }
}

/// Storage backed by process memory. Failures can be injected per operation.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    state: RefCell<State>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the upload with this zero-based call index fail
    pub fn fail_upload_at(self, index: usize) -> Self {
        self.state.borrow_mut().fail_upload_at = Some(index);
        self
    }

    /// Make folder creation fail for this name
    pub fn fail_create_of(self, name: &str) -> Self {
        self.state.borrow_mut().fail_create = Some(name.to_string());
        self
    }

    pub fn fail_lists(self) -> Self {
        self.state.borrow_mut().fail_list = true;
        self
    }

    /// Every call received so far
    pub fn ops(&self) -> Vec<Op> {
        self.state.borrow().ops.clone()
    }

    pub fn upload_count(&self) -> usize {
        self.state
            .borrow()
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Upload { .. }))
            .count()
    }

    /// Folder names and parents, in creation order
    pub fn folders(&self) -> Vec<(String, Option<FolderId>)> {
        self.state
            .borrow()
            .objects
            .iter()
            .filter(|o| o.is_folder())
            .map(|o| (o.name.clone(), o.parent.clone()))
            .collect()
    }

    /// Stored files directly under `parent`, in upload order
    pub fn files_in(&self, parent: &FolderId) -> Vec<(String, Vec<u8>)> {
        self.state
            .borrow()
            .objects
            .iter()
            .filter(|o| o.parent.as_ref() == Some(parent))
            .filter_map(|o| o.content.clone().map(|c| (o.name.clone(), c)))
            .collect()
    }
}

impl Storage for MemoryStorage {
    fn create_folder(&self, name: &str, parent: Option<&FolderId>) -> Result<FolderId> {
        let mut state = self.state.borrow_mut();
        state.ops.push(Op::CreateFolder {
            name: name.to_string(),
            parent: parent.cloned(),
        });

        if state.fail_create.as_deref() == Some(name) {
            return Err(Error::Rejected("backend unavailable".into()));
        }

        Ok(state.insert(name, parent, None))
    }

    fn list(&self, query: &Query) -> Result<Vec<Entry>> {
        let mut state = self.state.borrow_mut();
        state.ops.push(Op::List(query.clone()));

        if state.fail_list {
            return Err(Error::Rejected("backend unavailable".into()));
        }

        Ok(state
            .objects
            .iter()
            .filter(|o| o.matches(query))
            .map(|o| Entry {
                id: o.id.clone(),
                name: o.name.clone(),
            })
            .collect())
    }

    fn upload_file(&self, name: &str, parent: &FolderId, path: &Path) -> Result<FolderId> {
        let mut state = self.state.borrow_mut();
        state.ops.push(Op::Upload {
            name: name.to_string(),
            parent: parent.clone(),
        });

        let index = state.uploads;
        state.uploads += 1;
        if state.fail_upload_at == Some(index) {
            return Err(Error::Rejected(format!("transfer of '{name}' interrupted")));
        }

        let content = std::fs::read(path)?;
        Ok(state.insert(name, Some(parent), Some(content)))
    }
}
