pub use crate::errors::BlobError;
pub use crate::fs::DiskImageStore;
pub use crate::memory::MemoryBlobSink;
pub use crate::metrics::{BlobStats, BlobStatsSnapshot};
pub use crate::model::ImageInfo;
pub use crate::sink::BlobSink;
