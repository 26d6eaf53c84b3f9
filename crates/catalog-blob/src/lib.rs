pub mod errors;
pub mod fs;
pub mod memory;
pub mod metrics;
pub mod model;
pub mod prelude;
pub mod sink;

pub use errors::BlobError;
pub use fs::DiskImageStore;
pub use memory::MemoryBlobSink;
pub use model::ImageInfo;
pub use sink::BlobSink;
