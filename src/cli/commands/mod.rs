// ===========================================================================
// cli/commands - Command Implementations
// ===========================================================================

pub mod config;
pub mod gpus;
pub mod init;
pub mod ls;
pub mod projects;
pub mod upload;
pub mod upload_folder;

use clap::ValueEnum;

use crate::layout::Category;

// Re-export argument types
pub use gpus::GpusArgs;
pub use init::InitArgs;
pub use ls::LsArgs;
pub use upload::UploadArgs;
pub use upload_folder::UploadFolderArgs;

#[derive(Clone, Copy, ValueEnum)]
pub enum CategoryArg {
    Data,
    Models,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Data => Category::Data,
            CategoryArg::Models => Category::Models,
        }
    }
}
