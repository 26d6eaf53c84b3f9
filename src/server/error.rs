use axum::response::{IntoResponse, Response};
use axum::Json;
use catalog_errors::mapping_http::to_http_status;
use catalog_errors::render::PublicErrorView;
use catalog_errors::ErrorObj;
use catalog_interceptors::Status;

/// A call status rendered through the error registry as `{code, message, request_id}`.
#[derive(Debug)]
pub struct ApiError {
    status: Status,
    request_id: Option<String>,
}

impl ApiError {
    pub fn new(status: Status) -> Self {
        Self {
            status,
            request_id: None,
        }
    }

    /// Maps a failed call's status, tagging it with the call's request id.
    pub fn tagged(request_id: Option<String>) -> impl FnOnce(Status) -> ApiError {
        move |status| ApiError { status, request_id }
    }

    fn error(&self) -> ErrorObj {
        let builder = self.status.error_builder();
        match &self.request_id {
            Some(id) => builder.request_id(id.clone()).build(),
            None => builder.build(),
        }
    }

    pub fn view(&self) -> PublicErrorView {
        self.error().to_public()
    }
}

impl From<Status> for ApiError {
    fn from(status: Status) -> Self {
        Self::new(status)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.error();
        (to_http_status(&err), Json(err.to_public())).into_response()
    }
}
