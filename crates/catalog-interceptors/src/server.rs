use crate::context::CallContext;
use crate::stages::Stage;
use crate::status::Status;
use async_trait::async_trait;
use catalog_auth::{AccessPolicy, TokenAuthority};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    MissingToken,
    InvalidToken,
    PermissionDenied,
}

impl RejectReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            RejectReason::MissingToken => "missing_token",
            RejectReason::InvalidToken => "invalid_token",
            RejectReason::PermissionDenied => "permission_denied",
        }
    }
}

/// Notified of every call the gate turns away.
pub trait GateObserver: Send + Sync {
    fn rejected(&self, method: &str, reason: RejectReason);
}

/// Verifies the caller's token and role for methods listed in the access policy.
pub struct ServerAuthGate {
    authority: Arc<TokenAuthority>,
    policy: Arc<AccessPolicy>,
    observer: Option<Arc<dyn GateObserver>>,
}

impl ServerAuthGate {
    pub fn new(authority: Arc<TokenAuthority>, policy: Arc<AccessPolicy>) -> Self {
        Self {
            authority,
            policy,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn GateObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    pub fn authorize(&self, cx: &mut CallContext) -> Result<(), Status> {
        let Some(allowed) = self.policy.allowed_roles(&cx.method) else {
            return Ok(());
        };

        let Some(token) = cx.bearer_token() else {
            return Err(self.reject(
                cx,
                RejectReason::MissingToken,
                "authorization token is not provided",
            ));
        };

        let claims = match self.authority.verify(token) {
            Ok(claims) => claims,
            Err(err) => {
                tracing::warn!(
                    method = %cx.method,
                    request_id = %cx.request_id,
                    error = %err,
                    "access token rejected"
                );
                return Err(self.reject(
                    cx,
                    RejectReason::InvalidToken,
                    "access token is invalid",
                ));
            }
        };

        if !allowed.contains(&claims.role) {
            tracing::warn!(
                method = %cx.method,
                user = %claims.sub,
                role = %claims.role,
                "role not allowed"
            );
            return Err(self.reject(
                cx,
                RejectReason::PermissionDenied,
                "no permission to access this RPC",
            ));
        }

        cx.claims = Some(claims);
        Ok(())
    }

    fn reject(&self, cx: &CallContext, reason: RejectReason, message: &str) -> Status {
        if let Some(observer) = &self.observer {
            observer.rejected(&cx.method, reason);
        }
        match reason {
            RejectReason::MissingToken | RejectReason::InvalidToken => {
                Status::unauthenticated(message)
            }
            RejectReason::PermissionDenied => Status::permission_denied(message),
        }
    }
}

#[async_trait]
impl Stage for ServerAuthGate {
    async fn handle(&self, cx: &mut CallContext) -> Result<(), Status> {
        self.authorize(cx)
    }
}
