// ===========================================================================
// mlctl projects - List top-level project folders
// ===========================================================================

use crate::cli::{self, Result};
use crate::config::Config;
use crate::layout::Projects;
use crate::storage::FolderId;

pub fn run(config: &Config) -> Result<()> {
    let drive = cli::connect(config)?;
    let projects = Projects::new(&drive).list_projects()?;

    if projects.is_empty() {
        eprintln!("No top-level projects found.");
        return Ok(());
    }

    eprintln!("Top-level project folders:");
    print!("{}", render(&projects));
    Ok(())
}

fn render(projects: &[(String, FolderId)]) -> String {
    projects
        .iter()
        .map(|(name, id)| format!("- {name} (ID: {id})\n"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_render_name_and_id() {
        let projects = vec![
            ("demo".to_string(), FolderId::new("1AbC")),
            ("vision".to_string(), FolderId::new("2dEf")),
        ];
        assert_eq!(
            render(&projects),
            "- demo (ID: 1AbC)\n- vision (ID: 2dEf)\n"
        );
    }

    #[test]
    fn test_render_skips_nested_folders() {
        let storage = MemoryStorage::new();
        let layout = Projects::new(&storage);
        layout.create_project("demo").unwrap();

        let listed = layout.list_projects().unwrap();
        assert_eq!(render(&listed), "- demo (ID: mem-1)\n");
    }
}
