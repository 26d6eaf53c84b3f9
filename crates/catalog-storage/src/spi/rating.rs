use crate::errors::StorageError;
use catalog_types::Rating;

pub trait RatingStore: Send + Sync {
    /// Folds `score` into the running rating of `laptop_id` and returns the updated value.
    fn add(&self, laptop_id: &str, score: f64) -> Result<Rating, StorageError>;

    fn get(&self, laptop_id: &str) -> Option<Rating>;
}
