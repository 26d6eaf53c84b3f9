use crate::errors::BlobError;
use crate::metrics::BlobStats;
use crate::model::ImageInfo;
use crate::sink::{check_image_type, sha256_hex, BlobSink};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct MemoryBlobSink {
    blobs: Arc<RwLock<HashMap<String, (ImageInfo, Bytes)>>>,
    metrics: BlobStats,
}

impl MemoryBlobSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metrics(&self) -> &BlobStats {
        &self.metrics
    }

    pub fn get(&self, blob_id: &str) -> Result<Bytes, BlobError> {
        self.blobs
            .read()
            .get(blob_id)
            .map(|(_, bytes)| bytes.clone())
            .ok_or_else(|| BlobError::not_found(blob_id))
    }

    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }
}

#[async_trait]
impl BlobSink for MemoryBlobSink {
    async fn store(
        &self,
        owner_id: &str,
        mime_type: &str,
        bytes: Bytes,
    ) -> Result<String, BlobError> {
        check_image_type(mime_type)?;

        let blob_id = Uuid::new_v4().to_string();
        let size = bytes.len() as u64;
        let info = ImageInfo {
            laptop_id: owner_id.to_string(),
            image_type: mime_type.to_string(),
            path: None,
            size,
            sha256: sha256_hex(&bytes),
            stored_at: Utc::now(),
        };
        self.blobs.write().insert(blob_id.clone(), (info, bytes));
        self.metrics.record_store(size);
        Ok(blob_id)
    }

    fn info(&self, blob_id: &str) -> Option<ImageInfo> {
        self.blobs.read().get(blob_id).map(|(info, _)| info.clone())
    }
}
