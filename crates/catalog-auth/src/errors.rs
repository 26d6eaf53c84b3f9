use catalog_errors::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0}")]
pub struct AuthError(pub ErrorObj);

impl AuthError {
    pub fn into_inner(self) -> ErrorObj {
        self.0
    }

    pub fn code(&self) -> ErrorCode {
        self.0.code
    }
}

pub fn unauthenticated(msg: &str) -> AuthError {
    AuthError(
        ErrorBuilder::new(codes::AUTH_UNAUTHENTICATED)
            .user_msg("Please sign in.")
            .dev_msg(msg)
            .build(),
    )
}

pub fn forbidden(msg: &str) -> AuthError {
    AuthError(
        ErrorBuilder::new(codes::AUTH_FORBIDDEN)
            .user_msg("no permission to access this RPC")
            .dev_msg(msg)
            .build(),
    )
}

pub fn user_exists(username: &str) -> AuthError {
    AuthError(
        ErrorBuilder::new(codes::STORAGE_ALREADY_EXISTS)
            .user_msg("User already exists.")
            .meta_kv("username", serde_json::Value::String(username.to_string()))
            .build(),
    )
}

pub fn internal(msg: &str) -> AuthError {
    AuthError(
        ErrorBuilder::new(codes::UNKNOWN_INTERNAL)
            .dev_msg(msg)
            .build(),
    )
}
