use bytes::Bytes;
use catalog_blob::prelude::*;
use catalog_errors::codes;
use tempfile::tempdir;

#[tokio::test]
async fn disk_store_writes_file_and_indexes_it() {
    let tmp = tempdir().unwrap();
    let store = DiskImageStore::new(tmp.path().join("img"));

    let blob_id = store
        .store("laptop-1", ".jpg", Bytes::from_static(b"\xff\xd8\xff\xe0jpeg"))
        .await
        .unwrap();

    let info = store.info(&blob_id).unwrap();
    assert_eq!(info.laptop_id, "laptop-1");
    assert_eq!(info.image_type, ".jpg");
    assert_eq!(info.size, 8);

    let path = info.path.unwrap();
    assert_eq!(path, tmp.path().join("img").join(format!("{blob_id}.jpg")));
    let written = tokio::fs::read(&path).await.unwrap();
    assert_eq!(written, b"\xff\xd8\xff\xe0jpeg");

    let snapshot = store.metrics().snapshot();
    assert_eq!(snapshot.stored, 1);
    assert_eq!(snapshot.bytes, 8);
}

#[tokio::test]
async fn disk_store_refuses_path_like_types() {
    let tmp = tempdir().unwrap();
    let store = DiskImageStore::new(tmp.path());

    let err = store
        .store("laptop-1", "/../../passwd", Bytes::from_static(b"x"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), codes::SCHEMA_VALIDATION);
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn disk_store_counts_failed_writes() {
    let tmp = tempdir().unwrap();
    let blocker = tmp.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();
    let stats = BlobStats::new();
    let store = DiskImageStore::new(blocker.join("img")).with_metrics(stats.clone());

    let err = store
        .store("laptop-1", ".jpg", Bytes::from_static(b"jpeg"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), codes::STORAGE_UNAVAILABLE);
    assert_eq!(
        stats.snapshot(),
        BlobStatsSnapshot {
            stored: 0,
            bytes: 0,
            failed: 1,
        }
    );
}

#[tokio::test]
async fn memory_sink_keeps_bytes() {
    let sink = MemoryBlobSink::new();
    let blob_id = sink
        .store("laptop-2", ".png", Bytes::from_static(b"png!"))
        .await
        .unwrap();

    assert_eq!(&sink.get(&blob_id).unwrap()[..], b"png!");
    assert_eq!(sink.info(&blob_id).unwrap().laptop_id, "laptop-2");
    assert_eq!(sink.len(), 1);
    assert_eq!(sink.get("missing").unwrap_err().code(), codes::STORAGE_NOT_FOUND);
}
