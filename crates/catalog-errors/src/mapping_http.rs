use crate::model::ErrorObj;

/// HTTP status registered for the error's code.
pub fn to_http_status(err: &ErrorObj) -> http::StatusCode {
    http::StatusCode::from_u16(err.http_status).unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR)
}
