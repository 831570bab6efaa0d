// ===========================================================================
// mlctl upload-folder - Upload into an existing Drive folder by name
// ===========================================================================

use std::path::PathBuf;

use clap::Args;

use super::upload::{ensure_dir, ProgressBarSink};
use crate::cli::{self, Result};
use crate::config::Config;
use crate::folders::Folders;
use crate::upload;

#[derive(Args)]
pub struct UploadFolderArgs {
    /// Local directory to upload (all files, flattened)
    local_dir: PathBuf,

    /// Name of the destination Drive folder (must be unique)
    folder_name: String,
}

pub fn run(args: UploadFolderArgs, config: &Config, quiet: bool) -> Result<()> {
    ensure_dir(&args.local_dir)?;

    let drive = cli::connect(config)?;
    let target = Folders::new(&drive).find_folder_by_name(&args.folder_name, None)?;

    let mut progress = ProgressBarSink::new(quiet);
    let report = upload::upload_tree(&drive, &args.local_dir, &target, &mut progress)?;

    println!(
        "Data from {} ({} file(s)) uploaded to Drive folder '{}' with ID: {target}",
        args.local_dir.display(),
        report.files_uploaded,
        args.folder_name
    );
    Ok(())
}
