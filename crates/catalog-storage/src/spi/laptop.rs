use crate::errors::StorageError;
use async_trait::async_trait;
use catalog_types::{CallSignal, Filter, Laptop};

/// Receives each laptop matched by [`LaptopStore::search`]. An error stops the search.
#[async_trait]
pub trait SearchVisitor: Send {
    async fn visit(&mut self, laptop: Laptop) -> Result<(), StorageError>;
}

/// Catalog storage capability. Values crossing this boundary are owned copies.
#[async_trait]
pub trait LaptopStore: Send + Sync {
    /// Stores a copy of `laptop` and returns its final id.
    ///
    /// An empty id is replaced by a fresh UUID. A non-empty id must be a UUID and must not
    /// already be present; an existing record is never overwritten.
    async fn save(&self, laptop: &Laptop) -> Result<String, StorageError>;

    async fn find(&self, id: &str) -> Result<Option<Laptop>, StorageError>;

    /// Visits every laptop matching `filter`, checking `signal` before each one.
    ///
    /// Visits happen outside any store lock, so a visitor may block or call back into
    /// the store without stalling writers.
    async fn search(
        &self,
        signal: &CallSignal,
        filter: &Filter,
        visitor: &mut dyn SearchVisitor,
    ) -> Result<(), StorageError>;

    async fn len(&self) -> Result<usize, StorageError>;
}
