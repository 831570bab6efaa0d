// ===========================================================================
// cli - Command Line Interface
// ===========================================================================

mod commands;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::storage::DriveClient;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(#[from] crate::config::Error),

    #[error("auth error: {0}")]
    Auth(#[from] crate::auth::Error),

    #[error("{0}")]
    Folder(#[from] crate::folders::Error),

    #[error("{0}")]
    Layout(#[from] crate::layout::Error),

    #[error("{0}")]
    Upload(#[from] crate::upload::Error),

    #[error("{0}")]
    Process(#[from] crate::process::Error),

    #[error("{0}")]
    Prompt(#[from] crate::prompt::Error),

    #[error("{0}")]
    Other(String),
}

#[derive(Parser)]
#[command(
    name = "mlctl",
    version,
    about = "Organize ML datasets and models in Google Drive projects",
    after_help = "Run 'mlctl config' to create ~/.mlcontrol/config.toml."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Hide progress bars
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Create a project folder with data/ and models/
    Init(commands::InitArgs),

    /// Upload a local directory into a project's data or models
    Upload(commands::UploadArgs),

    /// Upload a local directory into an existing Drive folder by name
    UploadFolder(commands::UploadFolderArgs),

    /// List the datasets or models of a project
    Ls(commands::LsArgs),

    /// List top-level project folders
    Projects,

    /// Search GPU marketplace offers
    Gpus(commands::GpusArgs),

    /// Show or create the config file
    Config,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Init(args) => commands::init::run(args, &config),
            Command::Upload(args) => commands::upload::run(args, &config, self.quiet),
            Command::UploadFolder(args) => {
                commands::upload_folder::run(args, &config, self.quiet)
            }
            Command::Ls(args) => commands::ls::run(args, &config),
            Command::Projects => commands::projects::run(&config),
            Command::Gpus(args) => commands::gpus::run(args, &config),
            Command::Config => commands::config::run(&config),
        }
    }
}

/// Authenticate and build a Drive client for this run
pub(crate) fn connect(config: &Config) -> Result<DriveClient> {
    let token = crate::auth::access_token(&config.auth)?;
    Ok(DriveClient::new(token, config.upload.chunk_size_bytes()))
}
