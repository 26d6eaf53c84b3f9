pub mod errors;
pub mod filter;
pub mod memory;
pub mod persistent;
pub mod prelude;
pub mod spi;

pub use errors::StorageError;
pub use filter::is_qualified;
pub use memory::{InMemoryLaptopStore, InMemoryRatingStore};
pub use persistent::PersistentLaptopStore;
pub use spi::{LaptopStore, RatingStore, SearchVisitor};
