use crate::{kind::ErrorKind, severity::Severity};
use once_cell::sync::Lazy;
use serde::{Serialize, Serializer};
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ErrorCode(pub &'static str);

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

#[derive(Clone, Debug)]
pub struct CodeSpec {
    pub code: ErrorCode,
    pub kind: ErrorKind,
    pub http_status: u16,
    pub grpc_status: i32,
    pub severity: Severity,
    pub default_user_msg: &'static str,
}

pub mod codes {
    use super::ErrorCode;

    pub const AUTH_UNAUTHENTICATED: ErrorCode = ErrorCode("AUTH.UNAUTHENTICATED");
    pub const AUTH_FORBIDDEN: ErrorCode = ErrorCode("AUTH.FORBIDDEN");
    pub const SCHEMA_VALIDATION: ErrorCode = ErrorCode("SCHEMA.VALIDATION_FAILED");
    pub const STORAGE_NOT_FOUND: ErrorCode = ErrorCode("STORAGE.NOT_FOUND");
    pub const STORAGE_ALREADY_EXISTS: ErrorCode = ErrorCode("STORAGE.ALREADY_EXISTS");
    pub const STORAGE_UNAVAILABLE: ErrorCode = ErrorCode("STORAGE.UNAVAILABLE");
    pub const CALL_CANCELED: ErrorCode = ErrorCode("CALL.CANCELED");
    pub const CALL_DEADLINE_EXCEEDED: ErrorCode = ErrorCode("CALL.DEADLINE_EXCEEDED");
    pub const UNKNOWN_INTERNAL: ErrorCode = ErrorCode("UNKNOWN.INTERNAL");
}

pub static REGISTRY: Lazy<HashMap<&'static str, CodeSpec>> = Lazy::new(|| {
    use codes::*;

    let mut map = HashMap::new();
    let mut add = |spec: CodeSpec| {
        let key = spec.code.0;
        if map.insert(key, spec).is_some() {
            panic!("duplicate error code: {}", key);
        }
    };

    add(CodeSpec {
        code: AUTH_UNAUTHENTICATED,
        kind: ErrorKind::Auth,
        http_status: 401,
        grpc_status: 16,
        severity: Severity::Warn,
        default_user_msg: "Please sign in.",
    });

    add(CodeSpec {
        code: AUTH_FORBIDDEN,
        kind: ErrorKind::Auth,
        http_status: 403,
        grpc_status: 7,
        severity: Severity::Warn,
        default_user_msg: "You don't have permission to perform this action.",
    });

    add(CodeSpec {
        code: SCHEMA_VALIDATION,
        kind: ErrorKind::Schema,
        http_status: 422,
        grpc_status: 3,
        severity: Severity::Warn,
        default_user_msg: "Your request is invalid. Please check inputs.",
    });

    add(CodeSpec {
        code: STORAGE_NOT_FOUND,
        kind: ErrorKind::NotFound,
        http_status: 404,
        grpc_status: 5,
        severity: Severity::Info,
        default_user_msg: "Resource not found.",
    });

    add(CodeSpec {
        code: STORAGE_ALREADY_EXISTS,
        kind: ErrorKind::Conflict,
        http_status: 409,
        grpc_status: 6,
        severity: Severity::Warn,
        default_user_msg: "The resource already exists.",
    });

    add(CodeSpec {
        code: STORAGE_UNAVAILABLE,
        kind: ErrorKind::Storage,
        http_status: 503,
        grpc_status: 14,
        severity: Severity::Error,
        default_user_msg: "Storage backend is unavailable. Please retry later.",
    });

    add(CodeSpec {
        code: CALL_CANCELED,
        kind: ErrorKind::Cancelled,
        http_status: 499,
        grpc_status: 1,
        severity: Severity::Info,
        default_user_msg: "The request was canceled.",
    });

    add(CodeSpec {
        code: CALL_DEADLINE_EXCEEDED,
        kind: ErrorKind::Timeout,
        http_status: 504,
        grpc_status: 4,
        severity: Severity::Warn,
        default_user_msg: "The request deadline was exceeded.",
    });

    add(CodeSpec {
        code: UNKNOWN_INTERNAL,
        kind: ErrorKind::Unknown,
        http_status: 500,
        grpc_status: 13,
        severity: Severity::Critical,
        default_user_msg: "Internal error. Please retry later.",
    });

    map
});

static FALLBACK: Lazy<CodeSpec> = Lazy::new(|| CodeSpec {
    code: codes::UNKNOWN_INTERNAL,
    kind: ErrorKind::Unknown,
    http_status: 500,
    grpc_status: 13,
    severity: Severity::Critical,
    default_user_msg: "Internal error. Please retry later.",
});

/// Looks up the registered spec for `code`, falling back to `UNKNOWN.INTERNAL`.
pub fn spec_of(code: ErrorCode) -> &'static CodeSpec {
    REGISTRY.get(code.0).unwrap_or(&FALLBACK)
}
