//! File store tests against a temporary directory

use infra_storage::{FileStore, StorageError, UploadCategory};
use tempfile::TempDir;

fn store(max_bytes: usize) -> (TempDir, FileStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path(), max_bytes);
    (dir, store)
}

#[tokio::test]
async fn test_save_writes_under_category_dir() {
    let (_dir, store) = store(1024);
    store.init().await.unwrap();

    let path = store
        .save(UploadCategory::ReportPhoto, "dompet.PNG", b"\x89PNG data")
        .await
        .unwrap();

    assert!(path.starts_with("laporan/"));
    assert!(path.ends_with(".png"));
    assert!(store.exists(&path).await.unwrap());
    let content = std::fs::read(store.resolve(&path).unwrap()).unwrap();
    assert_eq!(content, b"\x89PNG data");
}

#[tokio::test]
async fn test_each_save_gets_a_fresh_name() {
    let (_dir, store) = store(1024);
    let a = store.save(UploadCategory::ProfilePhoto, "me.jpg", b"a").await.unwrap();
    let b = store.save(UploadCategory::ProfilePhoto, "me.jpg", b"b").await.unwrap();
    assert_ne!(a, b);
}

#[tokio::test]
async fn test_rejects_unsupported_and_oversized_files() {
    let (_dir, store) = store(4);

    let err = store.save(UploadCategory::ReportPhoto, "virus.exe", b"MZ").await.unwrap_err();
    assert!(matches!(err, StorageError::UnsupportedType(_)));
    assert!(err.is_client_error());

    let err = store.save(UploadCategory::ReportPhoto, "big.jpg", b"12345").await.unwrap_err();
    assert!(matches!(err, StorageError::TooLarge { size: 5, max: 4 }));

    let err = store.save(UploadCategory::ReportPhoto, "empty.jpg", b"").await.unwrap_err();
    assert!(matches!(err, StorageError::EmptyFile));
}

#[tokio::test]
async fn test_evidence_accepts_pdf() {
    let (_dir, store) = store(1024);
    let path = store
        .save(UploadCategory::ClaimEvidence, "serah-terima.pdf", b"%PDF-1.7")
        .await
        .unwrap();
    assert!(path.starts_with("bukti/"));
}

#[tokio::test]
async fn test_remove_is_idempotent() {
    let (_dir, store) = store(1024);
    let path = store.save(UploadCategory::ProfilePhoto, "me.webp", b"RIFF").await.unwrap();

    store.remove(&path).await.unwrap();
    assert!(!store.exists(&path).await.unwrap());

    // Second removal of the same file is a no-op
    store.remove(&path).await.unwrap();
    store.remove("profil/never-existed.jpg").await.unwrap();
}

#[tokio::test]
async fn test_remove_refuses_paths_outside_root() {
    let (_dir, store) = store(1024);
    let err = store.remove("../outside.jpg").await.unwrap_err();
    assert!(matches!(err, StorageError::InvalidPath(_)));
}

#[tokio::test]
async fn test_remove_propagates_other_io_errors() {
    let (_dir, store) = store(1024);
    store.init().await.unwrap();

    // A directory cannot be removed with remove_file
    let err = store.remove("laporan").await.unwrap_err();
    assert!(matches!(err, StorageError::Io(_)));
}
