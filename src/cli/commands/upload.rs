// ===========================================================================
// mlctl upload - Upload a local directory into a project
// ===========================================================================

use std::path::{Path, PathBuf};

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use super::CategoryArg;
use crate::cli::{self, Error, Result};
use crate::config::Config;
use crate::layout::{Category, Projects};
use crate::upload::{self, LocalFile, Progress};
use crate::util;

#[derive(Args)]
pub struct UploadArgs {
    /// Project name
    project: String,

    /// Local directory to upload (all files, flattened)
    local_dir: PathBuf,

    /// Upload as a dataset or as a model
    #[arg(short, long, value_enum, default_value_t = CategoryArg::Data)]
    category: CategoryArg,
}

pub fn run(args: UploadArgs, config: &Config, quiet: bool) -> Result<()> {
    // Fail before creating anything remotely
    ensure_dir(&args.local_dir)?;

    let drive = cli::connect(config)?;
    let projects = Projects::new(&drive);
    let category: Category = args.category.into();

    let target = projects.resolve_upload_target(&args.project, category, &args.local_dir)?;
    let leaf = util::leaf_name(&args.local_dir.to_string_lossy());

    eprintln!(
        "Uploading {} to {}/{category}/{leaf}",
        args.local_dir.display(),
        args.project
    );

    let mut progress = ProgressBarSink::new(quiet);
    let report = upload::upload_tree(&drive, &args.local_dir, &target, &mut progress)?;

    println!(
        "Uploaded {} file(s) to {}/{category}/{leaf} (ID: {target})",
        report.files_uploaded, args.project
    );
    Ok(())
}

pub(super) fn ensure_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(Error::Other(format!("'{}' is not a directory", path.display())))
    }
}

/// Terminal progress bar fed by the upload orchestrator
pub(super) struct ProgressBarSink {
    bar: ProgressBar,
}

impl ProgressBarSink {
    pub(super) fn new(quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(0)
        };
        if let Ok(style) = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}") {
            bar.set_style(style);
        }
        Self { bar }
    }
}

impl Progress for ProgressBarSink {
    fn begin(&mut self, total: usize) {
        self.bar.set_length(total as u64);
    }

    fn advance(&mut self, done: usize, _total: usize, file: &LocalFile) {
        self.bar.set_position(done as u64);
        self.bar.set_message(file.name.clone());
    }
}

impl Drop for ProgressBarSink {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}
