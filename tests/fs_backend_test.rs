use notedir::model::DirectoryLocation;
use notedir::store::fs_backend::FsBackend;
use notedir::store::NoteStorage;
use std::fs;
use tempfile::TempDir;

fn setup() -> (TempDir, FsBackend) {
    let dir = TempDir::new().unwrap();
    let backend = FsBackend::new(dir.path().join("notes"));
    (dir, backend)
}

#[tokio::test]
async fn test_fs_backend_basic_content_io() {
    let (_dir, backend) = setup();
    backend.ensure_directory().await.unwrap();

    // 1. Write
    backend.write_text("a.txt", "Hello World").await.unwrap();

    // 2. Read
    assert_eq!(backend.read_text("a.txt").await.unwrap(), "Hello World");

    // 3. Overwrite replaces the whole file
    backend.write_text("a.txt", "Hi").await.unwrap();
    assert_eq!(backend.read_text("a.txt").await.unwrap(), "Hi");

    // 4. Delete
    backend.delete_entry("a.txt").await.unwrap();
    let err = backend.read_text("a.txt").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_fs_backend_ensure_directory_is_idempotent() {
    let (dir, backend) = setup();
    backend.ensure_directory().await.unwrap();
    backend.ensure_directory().await.unwrap();
    assert!(dir.path().join("notes").is_dir());
}

#[tokio::test]
async fn test_fs_backend_delete_missing_is_not_found() {
    let (_dir, backend) = setup();
    backend.ensure_directory().await.unwrap();
    let err = backend.delete_entry("never.txt").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_fs_backend_atomic_write_artifacts() {
    let (dir, backend) = setup();
    backend.ensure_directory().await.unwrap();
    backend.write_text("Atomic.txt", "Atomic").await.unwrap();

    let notes_dir = dir.path().join("notes");
    let on_disk = fs::read_to_string(notes_dir.join("Atomic.txt")).unwrap();
    assert_eq!(on_disk, "Atomic");

    // Verify NO .tmp files are left behind
    for entry in fs::read_dir(&notes_dir).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
    }
}

#[tokio::test]
async fn test_fs_backend_list_entries_skips_directories() {
    let (dir, backend) = setup();
    backend.ensure_directory().await.unwrap();
    backend.write_text("one.txt", "1").await.unwrap();
    backend.write_text("two.md", "2").await.unwrap();
    fs::create_dir(dir.path().join("notes").join("sub.txt")).unwrap();

    let mut names: Vec<_> = backend
        .list_entries()
        .await
        .unwrap()
        .into_iter()
        .map(|e| {
            assert!(e.modified.is_some());
            e.name
        })
        .collect();
    names.sort();
    assert_eq!(names, vec!["one.txt", "two.md"]);
}

#[tokio::test]
async fn test_fs_backend_list_missing_directory_fails() {
    let (_dir, backend) = setup();
    assert!(backend.list_entries().await.is_err());
}

#[tokio::test]
async fn test_fs_backend_rejects_path_traversal() {
    let (_dir, backend) = setup();
    backend.ensure_directory().await.unwrap();
    assert!(backend.write_text("../escape.txt", "x").await.is_err());
    assert!(backend.read_text("a/b.txt").await.is_err());
}

#[tokio::test]
async fn test_fs_backend_resolves_directory() {
    let (dir, backend) = setup();
    backend.ensure_directory().await.unwrap();
    let location = backend.resolve_directory_location().await.unwrap();
    let expected = fs::canonicalize(dir.path().join("notes")).unwrap();
    assert_eq!(location, DirectoryLocation::Path(expected));
}
