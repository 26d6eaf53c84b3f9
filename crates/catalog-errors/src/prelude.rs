pub use crate::{
    code::{codes, spec_of, CodeSpec, ErrorCode, REGISTRY},
    kind::ErrorKind,
    model::{ErrorBuilder, ErrorObj},
    render::{AuditErrorView, PublicErrorView},
    severity::Severity,
};
