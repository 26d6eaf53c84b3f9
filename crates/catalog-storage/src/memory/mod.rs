mod laptop;
mod rating;

pub use laptop::InMemoryLaptopStore;
pub use rating::InMemoryRatingStore;
