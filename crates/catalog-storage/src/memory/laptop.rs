use crate::errors::StorageError;
use crate::filter::is_qualified;
use crate::spi::laptop::{LaptopStore, SearchVisitor};
use async_trait::async_trait;
use catalog_types::{resolve_laptop_id, CallSignal, Filter, Laptop};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryLaptopStore {
    laptops: RwLock<HashMap<String, Laptop>>,
}

impl InMemoryLaptopStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LaptopStore for InMemoryLaptopStore {
    async fn save(&self, laptop: &Laptop) -> Result<String, StorageError> {
        let id = resolve_laptop_id(&laptop.id)
            .map_err(|err| StorageError::invalid_argument(&err.to_string()))?;

        let mut laptops = self.laptops.write().await;
        if laptops.contains_key(&id) {
            return Err(StorageError::already_exists(&id));
        }

        let mut stored = laptop.clone();
        stored.id = id.clone();
        laptops.insert(id.clone(), stored);
        Ok(id)
    }

    async fn find(&self, id: &str) -> Result<Option<Laptop>, StorageError> {
        Ok(self.laptops.read().await.get(id).cloned())
    }

    async fn search(
        &self,
        signal: &CallSignal,
        filter: &Filter,
        visitor: &mut dyn SearchVisitor,
    ) -> Result<(), StorageError> {
        let matches: Vec<Laptop> = {
            let laptops = self.laptops.read().await;
            laptops
                .values()
                .filter(|laptop| is_qualified(filter, laptop))
                .cloned()
                .collect()
        };

        // The guard is gone here; a slow visitor never holds up writers.
        for laptop in matches {
            if let Err(reason) = signal.check() {
                tracing::debug!(%reason, "search interrupted");
                return Err(reason.into());
            }
            visitor.visit(laptop).await?;
        }
        Ok(())
    }

    async fn len(&self) -> Result<usize, StorageError> {
        Ok(self.laptops.read().await.len())
    }
}
