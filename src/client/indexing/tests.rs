use super::*;
use std::path::PathBuf;
use tempfile::TempDir;

const GO_SOURCE: &str = "package main\n\nfunc A() {}\n\nfunc B() int {\n\treturn 1\n}\n";

fn config_for(out: &TempDir) -> IndexingConfig {
    IndexingConfig {
        output_path: out.path().join("data").join("chunked.jsonl"),
        ..Default::default()
    }
}

fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, content).unwrap();
    path
}

fn read_store(path: &Path) -> Vec<Chunk> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test]
async fn test_index_single_file() {
    let repo = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write(repo.path(), "main.go", GO_SOURCE);
    let config = config_for(&out);

    let response = do_index(&config, repo.path()).await.unwrap();

    assert_eq!(response.files_indexed, 1);
    assert_eq!(response.chunks_written, 2);
    assert!(response.errors.is_empty());

    let chunks = read_store(&config.output_path);
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].symbol, "A");
    assert_eq!(chunks[1].symbol, "B");
    assert_eq!(chunks[0].file, repo.path().join("main.go").display().to_string());
}

#[tokio::test]
async fn test_missing_root_writes_nothing() {
    let out = TempDir::new().unwrap();
    let config = config_for(&out);

    let err = do_index(&config, Path::new("/nonexistent/repo/12345"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RepoQaError::Indexing(IndexingError::DirectoryNotFound(_))
    ));
    assert!(!config.output_path.exists());
}

#[tokio::test]
async fn test_file_root_is_rejected() {
    let repo = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let file = write(repo.path(), "main.go", GO_SOURCE);

    let config = config_for(&out);

    let err = do_index(&config, &file).await.unwrap_err();
    assert!(matches!(
        err,
        RepoQaError::Indexing(IndexingError::NotADirectory(_))
    ));
    assert!(!config.output_path.exists());
}

#[tokio::test]
async fn test_filtered_and_unsupported_files_are_skipped() {
    let repo = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write(repo.path(), "main.go", GO_SOURCE);
    write(repo.path(), "README.md", "# readme\n");
    write(repo.path(), "types.d.ts", "declare function f(): void;\n");
    write(repo.path(), "notes.txt", "plain text\n");
    write(repo.path(), "node_modules/dep/index.js", "function dep() {}\n");

    let response = do_index(&config_for(&out), repo.path()).await.unwrap();

    assert_eq!(response.files_indexed, 1);
    assert_eq!(response.files_skipped, 3);
    assert_eq!(response.chunks_written, 2);
}

#[tokio::test]
async fn test_parse_failure_is_recorded_and_run_succeeds() {
    let repo = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write(repo.path(), "good.go", GO_SOURCE);
    write(repo.path(), "bad.go", "package main\n\nfunc broken( {\n");
    let config = config_for(&out);

    let response = do_index(&config, repo.path()).await.unwrap();

    assert_eq!(response.files_indexed, 1);
    assert_eq!(response.files_skipped, 1);
    assert_eq!(response.errors.len(), 1);
    assert!(response.errors[0].contains("bad.go"));

    let chunks = read_store(&config.output_path);
    assert_eq!(chunks.len(), 2);
    assert!(chunks.iter().all(|c| c.file.ends_with("good.go")));
}

#[tokio::test]
async fn test_oversized_file_is_skipped() {
    let repo = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write(repo.path(), "main.go", GO_SOURCE);
    let mut config = config_for(&out);
    config.max_file_size = 8;

    let response = do_index(&config, repo.path()).await.unwrap();

    assert_eq!(response.files_indexed, 0);
    assert_eq!(response.files_skipped, 1);
    assert_eq!(response.chunks_written, 0);
    assert!(response.errors[0].contains("exceeds maximum size"));
}

#[tokio::test]
async fn test_invalid_utf8_is_decoded_lossily() {
    let repo = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let mut bytes = b"package main\n\n// caf".to_vec();
    bytes.push(0xE9);
    bytes.extend_from_slice(b"\nfunc A() {}\n");
    std::fs::write(repo.path().join("latin1.go"), bytes).unwrap();
    let config = config_for(&out);

    let response = do_index(&config, repo.path()).await.unwrap();

    assert_eq!(response.chunks_written, 1);
    let chunks = read_store(&config.output_path);
    assert_eq!(chunks[0].code, "func A() {}");
    assert_eq!(chunks[0].start_line, 4);
}

#[tokio::test]
async fn test_store_is_truncated_each_run() {
    let repo = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write(repo.path(), "main.go", GO_SOURCE);
    let config = config_for(&out);

    do_index(&config, repo.path()).await.unwrap();
    do_index(&config, repo.path()).await.unwrap();

    assert_eq!(read_store(&config.output_path).len(), 2);
}

#[tokio::test]
async fn test_extra_excludes_from_config() {
    let repo = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write(repo.path(), "main.go", GO_SOURCE);
    write(repo.path(), "vendor/lib/lib.go", GO_SOURCE);
    write(repo.path(), "gen/api_generated.go", GO_SOURCE);
    let mut config = config_for(&out);
    config.exclude_dirs = vec!["vendor".to_string()];
    config.exclude_patterns = vec!["_generated".to_string()];

    let response = do_index(&config, repo.path()).await.unwrap();

    assert_eq!(response.files_indexed, 1);
    assert_eq!(response.files_skipped, 1);
}

#[cfg(unix)]
#[tokio::test]
async fn test_unreadable_directory_aborts_but_flushes() {
    use std::os::unix::fs::PermissionsExt;

    let repo = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write(repo.path(), "a_first.go", GO_SOURCE);
    let locked = repo.path().join("locked");
    std::fs::create_dir(&locked).unwrap();
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

    // Root ignores permission bits
    if std::fs::read_dir(&locked).is_ok() {
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let config = config_for(&out);
    let result = do_index(&config, repo.path()).await;
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

    assert!(matches!(
        result.unwrap_err(),
        RepoQaError::Indexing(IndexingError::WalkFailed { .. })
    ));
    // Every line that reached the store is a complete record
    assert!(read_store(&config.output_path).len() <= 2);
}
