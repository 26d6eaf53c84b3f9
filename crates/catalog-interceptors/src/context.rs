use crate::metadata::{Metadata, AUTHORIZATION};
use catalog_auth::Claims;
use catalog_types::CallSignal;

/// Everything the gates and handlers know about one call besides its messages.
#[derive(Clone, Debug, Default)]
pub struct CallContext {
    pub method: String,
    pub metadata: Metadata,
    pub signal: CallSignal,
    pub request_id: String,
    /// Set by the server gate once the caller's token is verified.
    pub claims: Option<Claims>,
}

impl CallContext {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            ..Self::default()
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_signal(mut self, signal: CallSignal) -> Self {
        self.signal = signal;
        self
    }

    /// Raw token from the `authorization` entry, with an optional `Bearer ` prefix removed.
    pub fn bearer_token(&self) -> Option<&str> {
        let value = self.metadata.get(AUTHORIZATION)?;
        let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
        if token.is_empty() {
            None
        } else {
            Some(token)
        }
    }
}
