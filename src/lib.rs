// ===========================================================================
// mlcontrol - ML Project Artifacts on Google Drive
// ===========================================================================

pub mod auth;
pub mod cli;
pub mod config;
pub mod folders;
pub mod layout;
pub mod process;
pub mod prompt;
pub mod storage;
pub mod upload;
pub mod util;

pub use config::Config;
pub use layout::{Category, Projects};
pub use storage::{FolderId, Storage};
