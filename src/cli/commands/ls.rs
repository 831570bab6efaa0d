// ===========================================================================
// mlctl ls - List the datasets or models of a project
// ===========================================================================

use clap::Args;

use super::CategoryArg;
use crate::cli::{self, Result};
use crate::config::Config;
use crate::layout::{self, Category, Projects};

#[derive(Args)]
pub struct LsArgs {
    /// Project name
    project: String,

    /// Which part of the project to list
    #[arg(short, long, value_enum, default_value_t = CategoryArg::Data)]
    category: CategoryArg,
}

pub fn run(args: LsArgs, config: &Config) -> Result<()> {
    let drive = cli::connect(config)?;
    let projects = Projects::new(&drive);
    let category: Category = args.category.into();

    match projects.list_category(&args.project, category) {
        Ok(names) => {
            print!("{}", render(&names));
            Ok(())
        }
        Err(layout::Error::EmptyCategory { .. }) => {
            eprintln!("No {category} in project '{}' yet.", args.project);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn render(names: &[String]) -> String {
    names.iter().map(|name| format!("{name}\n")).collect()
}
