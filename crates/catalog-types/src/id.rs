use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum IdError {
    #[error("laptop ID is not a valid UUID: {0}")]
    InvalidUuid(String),
}

/// Returns `candidate` when it is a well-formed UUID, or a fresh v4 UUID when it is empty.
pub fn resolve_laptop_id(candidate: &str) -> Result<String, IdError> {
    if candidate.is_empty() {
        return Ok(Uuid::new_v4().to_string());
    }
    Uuid::parse_str(candidate)
        .map(|_| candidate.to_string())
        .map_err(|_| IdError::InvalidUuid(candidate.to_string()))
}
