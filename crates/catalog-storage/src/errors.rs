use catalog_errors::prelude::*;
use catalog_types::Interrupted;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0}")]
pub struct StorageError(pub Box<ErrorObj>);

impl StorageError {
    pub fn into_inner(self) -> ErrorObj {
        *self.0
    }

    pub fn code(&self) -> ErrorCode {
        self.0.code
    }

    pub fn is(&self, code: ErrorCode) -> bool {
        self.0.code == code
    }

    pub fn not_found(msg: &str) -> Self {
        StorageError(Box::new(
            ErrorBuilder::new(codes::STORAGE_NOT_FOUND)
                .user_msg("Resource not found.")
                .dev_msg(msg)
                .build(),
        ))
    }

    pub fn already_exists(id: &str) -> Self {
        StorageError(Box::new(
            ErrorBuilder::new(codes::STORAGE_ALREADY_EXISTS)
                .user_msg("record already exists")
                .meta_kv("id", serde_json::Value::String(id.to_string()))
                .build(),
        ))
    }

    pub fn unavailable(msg: &str) -> Self {
        StorageError(Box::new(
            ErrorBuilder::new(codes::STORAGE_UNAVAILABLE)
                .user_msg("Storage backend unavailable.")
                .dev_msg(msg)
                .build(),
        ))
    }

    pub fn invalid_argument(msg: &str) -> Self {
        StorageError(Box::new(
            ErrorBuilder::new(codes::SCHEMA_VALIDATION)
                .user_msg(msg)
                .build(),
        ))
    }

    pub fn interrupted(reason: Interrupted) -> Self {
        let code = match reason {
            Interrupted::Canceled => codes::CALL_CANCELED,
            Interrupted::DeadlineExceeded => codes::CALL_DEADLINE_EXCEEDED,
        };
        StorageError(Box::new(
            ErrorBuilder::new(code).user_msg(reason.to_string()).build(),
        ))
    }

    pub fn internal(msg: &str) -> Self {
        StorageError(Box::new(
            ErrorBuilder::new(codes::UNKNOWN_INTERNAL)
                .user_msg("Storage internal error.")
                .dev_msg(msg)
                .build(),
        ))
    }
}

impl From<Interrupted> for StorageError {
    fn from(reason: Interrupted) -> Self {
        StorageError::interrupted(reason)
    }
}
