use crate::errors::BlobError;
use crate::metrics::BlobStats;
use crate::model::ImageInfo;
use crate::sink::{check_image_type, sha256_hex, BlobSink};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Writes each image to `<root>/<blob id><image type>` and keeps an in-memory index.
#[derive(Clone)]
pub struct DiskImageStore {
    root: PathBuf,
    index: Arc<RwLock<HashMap<String, ImageInfo>>>,
    metrics: BlobStats,
}

impl DiskImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            index: Arc::new(RwLock::new(HashMap::new())),
            metrics: BlobStats::default(),
        }
    }

    pub fn with_metrics(mut self, metrics: BlobStats) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &BlobStats {
        &self.metrics
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), BlobError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| BlobError::unavailable(&format!("mkdirs: {err}")))?;
        }

        let temp_path = path.with_extension("uploading");
        {
            let mut file = tokio::fs::File::create(&temp_path)
                .await
                .map_err(|err| BlobError::unavailable(&format!("create: {err}")))?;
            file.write_all(bytes)
                .await
                .map_err(|err| BlobError::unavailable(&format!("write: {err}")))?;
            file.sync_all()
                .await
                .map_err(|err| BlobError::unavailable(&format!("sync: {err}")))?;
        }
        tokio::fs::rename(&temp_path, path)
            .await
            .map_err(|err| BlobError::unavailable(&format!("rename: {err}")))
    }
}

#[async_trait]
impl BlobSink for DiskImageStore {
    async fn store(
        &self,
        owner_id: &str,
        mime_type: &str,
        bytes: Bytes,
    ) -> Result<String, BlobError> {
        check_image_type(mime_type)?;

        let blob_id = Uuid::new_v4().to_string();
        let path = self.root.join(format!("{blob_id}{mime_type}"));

        if let Err(err) = Self::write_atomic(&path, &bytes).await {
            self.metrics.record_failure();
            return Err(err);
        }

        let size = bytes.len() as u64;
        let info = ImageInfo {
            laptop_id: owner_id.to_string(),
            image_type: mime_type.to_string(),
            path: Some(path.clone()),
            size,
            sha256: sha256_hex(&bytes),
            stored_at: Utc::now(),
        };
        self.index.write().insert(blob_id.clone(), info);
        self.metrics.record_store(size);

        tracing::debug!(%blob_id, laptop_id = %owner_id, path = %path.display(), size, "image written");
        Ok(blob_id)
    }

    fn info(&self, blob_id: &str) -> Option<ImageInfo> {
        self.index.read().get(blob_id).cloned()
    }
}
