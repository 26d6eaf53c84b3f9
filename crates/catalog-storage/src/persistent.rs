use crate::errors::StorageError;
use crate::spi::laptop::{LaptopStore, SearchVisitor};
use async_trait::async_trait;
use catalog_types::{CallSignal, Filter, Laptop};

/// Placeholder for a database-backed catalog. Every operation reports `STORAGE.UNAVAILABLE`.
#[derive(Clone, Debug)]
pub struct PersistentLaptopStore {
    dsn: String,
}

impl PersistentLaptopStore {
    pub fn new(dsn: impl Into<String>) -> Self {
        Self { dsn: dsn.into() }
    }

    fn not_implemented(&self) -> StorageError {
        StorageError::unavailable(&format!(
            "persistent laptop store is not implemented (dsn: {})",
            self.dsn
        ))
    }
}

#[async_trait]
impl LaptopStore for PersistentLaptopStore {
    async fn save(&self, _laptop: &Laptop) -> Result<String, StorageError> {
        Err(self.not_implemented())
    }

    async fn find(&self, _id: &str) -> Result<Option<Laptop>, StorageError> {
        Err(self.not_implemented())
    }

    async fn search(
        &self,
        _signal: &CallSignal,
        _filter: &Filter,
        _visitor: &mut dyn SearchVisitor,
    ) -> Result<(), StorageError> {
        Err(self.not_implemented())
    }

    async fn len(&self) -> Result<usize, StorageError> {
        Err(self.not_implemented())
    }
}
