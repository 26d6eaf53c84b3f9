use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("cannot access fixture file: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot convert fixture to JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Writes `value` as pretty JSON to `path`.
pub fn write_json_file<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<(), FixtureError> {
    let data = serde_json::to_vec_pretty(value)?;
    std::fs::write(path, data)?;
    Ok(())
}

pub fn read_json_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, FixtureError> {
    let data = std::fs::read(path)?;
    Ok(serde_json::from_slice(&data)?)
}
