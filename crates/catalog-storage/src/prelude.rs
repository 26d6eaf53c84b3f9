pub use crate::errors::StorageError;
pub use crate::filter::is_qualified;
pub use crate::memory::{InMemoryLaptopStore, InMemoryRatingStore};
pub use crate::persistent::PersistentLaptopStore;
pub use crate::spi::laptop::{LaptopStore, SearchVisitor};
pub use crate::spi::rating::RatingStore;
