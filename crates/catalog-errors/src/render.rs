use crate::model::ErrorObj;
use serde::Serialize;
use serde_json::{Map, Value};

/// What a caller sees: the stable code, the user message and the call's request id.
#[derive(Debug, Serialize)]
pub struct PublicErrorView {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// What the server logs about a failed call.
#[derive(Debug, Serialize)]
pub struct AuditErrorView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub code: &'static str,
    pub kind: &'static str,
    pub severity: &'static str,
    pub grpc_status: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub meta: Map<String, Value>,
}

impl ErrorObj {
    pub fn to_public(&self) -> PublicErrorView {
        PublicErrorView {
            code: self.code.0,
            message: self.message_user.clone(),
            request_id: self.request_id.clone(),
        }
    }

    pub fn to_audit(&self) -> AuditErrorView {
        AuditErrorView {
            request_id: self.request_id.clone(),
            code: self.code.0,
            kind: self.kind.as_str(),
            severity: self.severity.as_str(),
            grpc_status: self.grpc_status,
            message: self.message_user.clone(),
            detail: self.message_dev.clone(),
            meta: self.meta.clone(),
        }
    }
}
