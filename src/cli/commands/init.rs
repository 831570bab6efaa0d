// ===========================================================================
// mlctl init - Create a project scaffold on Drive
// ===========================================================================

use clap::Args;

use crate::cli::{self, Error, Result};
use crate::config::Config;
use crate::folders;
use crate::layout::Projects;
use crate::prompt;

#[derive(Args)]
pub struct InitArgs {
    /// Project name (becomes a root-level Drive folder)
    project: String,

    /// Create the project even if a folder with this name already exists
    #[arg(short, long)]
    yes: bool,
}

pub fn run(args: InitArgs, config: &Config) -> Result<()> {
    let drive = cli::connect(config)?;
    let projects = Projects::new(&drive);

    if !args.yes {
        let existing = match projects.folders().find_folder_by_name(&args.project, None) {
            Ok(_) => 1,
            Err(folders::Error::AmbiguousName { count, .. }) => count,
            Err(folders::Error::NotFound(_)) => 0,
            Err(e) => return Err(e.into()),
        };

        if let Some(message) = duplicate_warning(&args.project, existing) {
            if !prompt::confirm(&message)? {
                return Err(Error::Other("aborted".into()));
            }
        }
    }

    eprintln!("Initializing new ML project: {}", args.project);
    let project_id = projects.create_project(&args.project)?;

    println!("Project {} created with ID: {project_id}", args.project);
    Ok(())
}

/// Prompt text when `existing` folders already carry the project name
fn duplicate_warning(project: &str, existing: usize) -> Option<String> {
    match existing {
        0 => None,
        1 => Some(format!(
            "A folder named '{project}' already exists. Create another project with the same name?"
        )),
        n => Some(format!(
            "{n} folders named '{project}' already exist. Create another project with the same name?"
        )),
    }
}
