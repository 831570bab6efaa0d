// ===========================================================================
// Workflow Tests - Project scaffold, upload and listing end to end
// ===========================================================================

use std::path::Path;

use mlcontrol::folders;
use mlcontrol::layout::{self, Category, Projects};
use mlcontrol::storage::{MemoryStorage, Op, Storage};
use mlcontrol::upload::{self, LocalFile, Progress, Silent};
use tempfile::tempdir;

struct Counter(Vec<(usize, usize)>);

impl Progress for Counter {
    fn advance(&mut self, done: usize, total: usize, _file: &LocalFile) {
        self.0.push((done, total));
    }
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

#[test]
fn test_cats_scenario() {
    let local = tempdir().unwrap();
    write(local.path(), "images/cats/a.jpg", "aaa");
    write(local.path(), "images/cats/b.jpg", "bbb");
    let cats = local.path().join("images").join("cats");
    let cats_arg = format!("{}/", cats.display());

    let storage = MemoryStorage::new();
    let projects = Projects::new(&storage);
    projects.create_project("demo").unwrap();

    let target = projects
        .resolve_upload_target("demo", Category::Data, Path::new(&cats_arg))
        .unwrap();
    let mut progress = Counter(Vec::new());
    let report = upload::upload_tree(&storage, &cats, &target, &mut progress).unwrap();

    assert_eq!(report.files_uploaded, 2);
    assert_eq!(progress.0, vec![(1, 2), (2, 2)]);
    assert_eq!(
        projects.list_category("demo", Category::Data).unwrap(),
        vec!["cats"]
    );
    assert_eq!(
        storage.files_in(&target),
        vec![
            ("a.jpg".to_string(), b"aaa".to_vec()),
            ("b.jpg".to_string(), b"bbb".to_vec()),
        ]
    );
}

#[test]
fn test_operation_order() {
    let local = tempdir().unwrap();
    write(local.path(), "run/model.pt", "w");

    let storage = MemoryStorage::new();
    let projects = Projects::new(&storage);
    let project = projects.create_project("p").unwrap();

    let run = local.path().join("run");
    let target = projects
        .resolve_upload_target("p", Category::Models, &run)
        .unwrap();
    upload::upload_tree(&storage, &run, &target, &mut Silent).unwrap();

    let ops = storage.ops();
    let kinds: Vec<&str> = ops
        .iter()
        .map(|op| match op {
            Op::CreateFolder { .. } => "create",
            Op::List(_) => "list",
            Op::Upload { .. } => "upload",
        })
        .collect();
    assert_eq!(
        kinds,
        vec!["create", "create", "create", "list", "list", "create", "upload"]
    );
    assert_eq!(
        ops[0],
        Op::CreateFolder {
            name: "p".into(),
            parent: None
        }
    );
    assert_eq!(
        ops[1],
        Op::CreateFolder {
            name: "data".into(),
            parent: Some(project.clone())
        }
    );
    assert_eq!(
        ops[2],
        Op::CreateFolder {
            name: "models".into(),
            parent: Some(project)
        }
    );
    assert!(matches!(&ops[5], Op::CreateFolder { name, .. } if name == "run"));
}

#[test]
fn test_partial_upload_keeps_sent_files() {
    let local = tempdir().unwrap();
    for name in ["1.bin", "2.bin", "3.bin", "4.bin", "5.bin"] {
        write(local.path(), &format!("shards/{name}"), name);
    }
    let shards = local.path().join("shards");

    let storage = MemoryStorage::new().fail_upload_at(3);
    let projects = Projects::new(&storage);
    projects.create_project("demo").unwrap();
    let target = projects
        .resolve_upload_target("demo", Category::Data, &shards)
        .unwrap();

    let err = upload::upload_tree(&storage, &shards, &target, &mut Silent).unwrap_err();

    assert!(matches!(err, upload::Error::Upload { uploaded: 3, .. }));
    assert_eq!(storage.upload_count(), 4);
    let names: Vec<_> = storage
        .files_in(&target)
        .into_iter()
        .map(|(n, _)| n)
        .collect();
    assert_eq!(names, vec!["1.bin", "2.bin", "3.bin"]);
    // the leaf folder stays too
    assert_eq!(
        projects.list_category("demo", Category::Data).unwrap(),
        vec!["shards"]
    );
}

#[test]
fn test_uninitialized_vs_empty_project() {
    let storage = MemoryStorage::new();
    let projects = Projects::new(&storage);

    let err = projects.list_category("demo", Category::Models).unwrap_err();
    assert!(matches!(
        err,
        layout::Error::Folder(folders::Error::NotFound(_))
    ));

    projects.create_project("demo").unwrap();
    let err = projects.list_category("demo", Category::Models).unwrap_err();
    assert!(matches!(err, layout::Error::EmptyCategory { .. }));
}

#[test]
fn test_duplicate_project_blocks_uploads() {
    let local = tempdir().unwrap();
    write(local.path(), "d/x.csv", "1,2");

    let storage = MemoryStorage::new();
    let projects = Projects::new(&storage);
    projects.create_project("demo").unwrap();
    projects.create_project("demo").unwrap();
    let before = storage.ops().len();

    let err = projects
        .resolve_upload_target("demo", Category::Data, &local.path().join("d"))
        .unwrap_err();

    assert!(matches!(
        err,
        layout::Error::Folder(folders::Error::AmbiguousName { count: 2, .. })
    ));
    // only the failed lookup happened
    assert_eq!(storage.ops().len(), before + 1);
}

#[test]
fn test_projects_lists_only_top_level() {
    let local = tempdir().unwrap();
    write(local.path(), "cats/a.jpg", "a");

    let storage = MemoryStorage::new();
    let projects = Projects::new(&storage);
    assert!(projects.list_projects().unwrap().is_empty());

    let demo = projects.create_project("demo").unwrap();
    let scratch = storage.create_folder("scratch", None).unwrap();
    projects
        .resolve_upload_target("demo", Category::Data, &local.path().join("cats"))
        .unwrap();

    assert_eq!(
        projects.list_projects().unwrap(),
        vec![("demo".to_string(), demo), ("scratch".to_string(), scratch)]
    );
}
