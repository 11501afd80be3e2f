use joinery_storage::*;
use std::path::PathBuf;
use tempfile::TempDir;

async fn storage(temp: &TempDir) -> Storage {
    Storage::builder().root(temp.path().join("domains")).connect().await.unwrap()
}

#[tokio::test]
async fn test_path_traversal_blocked() {
    let temp = TempDir::new().unwrap();
    let storage = storage(&temp).await;

    assert!(storage.resolve("../etc/passwd").is_err());
    assert!(storage.resolve("foo/../../bar").is_err());
    assert!(storage.write("/tmp/escape.toml", "x").await.is_err());
}

#[tokio::test]
async fn test_read_missing_returns_none() {
    let temp = TempDir::new().unwrap();
    let storage = storage(&temp).await;

    assert_eq!(storage.read("missing.toml").await.unwrap(), None);
}

#[tokio::test]
async fn test_write_read_roundtrip() {
    let temp = TempDir::new().unwrap();
    let storage = storage(&temp).await;

    storage.write("orders.toml", "[fields.id]\ntype = \"integer\"\n").await.unwrap();
    assert!(storage.exists("orders.toml").unwrap());
    assert_eq!(
        storage.read("orders.toml").await.unwrap().as_deref(),
        Some("[fields.id]\ntype = \"integer\"\n")
    );
}

#[tokio::test]
async fn test_overwrite_replaces_contents_and_leaves_no_temp_files() {
    let temp = TempDir::new().unwrap();
    let storage = storage(&temp).await;

    storage.write("orders.toml", "first").await.unwrap();
    storage.write("orders.toml", "second").await.unwrap();

    assert_eq!(storage.read("orders.toml").await.unwrap().as_deref(), Some("second"));
    let names: Vec<_> = std::fs::read_dir(storage.root())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(names, vec!["orders.toml".to_owned()]);
}

#[tokio::test]
async fn test_nested_write_creates_parents() {
    let temp = TempDir::new().unwrap();
    let storage = storage(&temp).await;

    storage.write("archive/2024/orders.toml", "x").await.unwrap();
    assert!(storage.exists("archive/2024/orders.toml").unwrap());
}

#[tokio::test]
async fn test_non_utf8_content_is_an_encoding_error() {
    let temp = TempDir::new().unwrap();
    let storage = storage(&temp).await;
    std::fs::write(storage.root().join("binary.toml"), [0xff, 0xfe, 0x00]).unwrap();

    let err = storage.read("binary.toml").await.unwrap_err();
    assert!(matches!(err, StorageError::Encoding { .. }), "{err:?}");
}

#[tokio::test]
async fn test_list_filters_by_extension() {
    let temp = TempDir::new().unwrap();
    let storage = storage(&temp).await;

    storage.write("orders.toml", "x").await.unwrap();
    storage.write("accounts.toml", "x").await.unwrap();
    storage.write("notes.md", "x").await.unwrap();
    storage.write("nested/inner.toml", "x").await.unwrap();
    std::fs::write(storage.root().join(".orders.toml.joinerytmp.9"), "x").unwrap();

    assert_eq!(
        storage.list("toml").await.unwrap(),
        vec![PathBuf::from("accounts.toml"), PathBuf::from("orders.toml")]
    );
}

#[tokio::test]
async fn test_delete_and_exists() {
    let temp = TempDir::new().unwrap();
    let storage = storage(&temp).await;

    storage.write("orders.toml", "x").await.unwrap();
    storage.delete("orders.toml").await.unwrap();
    assert!(!storage.exists("orders.toml").unwrap());

    storage.delete("orders.toml").await.unwrap();
}

#[tokio::test]
async fn test_missing_root_without_create_fails() {
    let temp = TempDir::new().unwrap();
    let result = Storage::builder().root(temp.path().join("absent")).create(false).connect().await;
    assert!(matches!(result, Err(StorageError::Io { .. })));
}

#[tokio::test]
async fn test_root_must_be_a_directory() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("domains.toml");
    std::fs::write(&file, "x").unwrap();

    let result = Storage::builder().root(&file).create(false).purge(false).connect().await;
    assert!(matches!(result, Err(StorageError::InvalidTarget { .. })));
}
