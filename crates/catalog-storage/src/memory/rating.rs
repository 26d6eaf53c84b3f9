use crate::errors::StorageError;
use crate::spi::rating::RatingStore;
use catalog_types::Rating;
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Default)]
pub struct InMemoryRatingStore {
    ratings: Mutex<HashMap<String, Rating>>,
}

impl InMemoryRatingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RatingStore for InMemoryRatingStore {
    fn add(&self, laptop_id: &str, score: f64) -> Result<Rating, StorageError> {
        let mut ratings = self.ratings.lock();
        let rating = ratings
            .entry(laptop_id.to_string())
            .and_modify(|rating| {
                rating.count = rating.count.saturating_add(1);
                rating.sum += score;
            })
            .or_insert_with(|| Rating::first(score));
        Ok(*rating)
    }

    fn get(&self, laptop_id: &str) -> Option<Rating> {
        self.ratings.lock().get(laptop_id).copied()
    }
}
