pub mod laptop;
pub mod rating;

pub use laptop::{LaptopStore, SearchVisitor};
pub use rating::RatingStore;
