use std::sync::Arc;

use axum::http::HeaderMap;
use catalog_interceptors::metadata::REQUEST_ID;
use catalog_interceptors::prelude::*;
use catalog_service::CatalogServer;
use catalog_types::CallSignal;

use crate::app::CatalogApp;

/// Per-call deadline, as a humantime duration such as `500ms`.
pub const CALL_TIMEOUT_HEADER: &str = "x-call-timeout";

#[derive(Clone)]
pub struct GatewayState {
    app: CatalogApp,
}

impl GatewayState {
    pub fn new(app: CatalogApp) -> Self {
        Self { app }
    }

    pub fn server(&self) -> &Arc<CatalogServer> {
        &self.app.server
    }

    /// Call context for `method` carrying the request's auth and id headers. Requests
    /// without an id get a fresh one so gateway errors and server logs share it.
    pub fn call_context(&self, method: &str, headers: &HeaderMap) -> Result<CallContext, Status> {
        let mut metadata = Metadata::new();
        for key in [AUTHORIZATION, REQUEST_ID] {
            if let Some(value) = headers.get(key) {
                let value = value
                    .to_str()
                    .map_err(|_| Status::invalid_argument(format!("header {key} is not ASCII")))?;
                metadata.insert(key, value);
            }
        }
        if metadata.get(REQUEST_ID).is_none() {
            metadata.insert(REQUEST_ID, uuid::Uuid::new_v4().to_string());
        }

        let mut signal = CallSignal::new();
        if let Some(raw) = headers.get(CALL_TIMEOUT_HEADER) {
            let timeout = raw
                .to_str()
                .ok()
                .and_then(|raw| humantime::parse_duration(raw).ok())
                .ok_or_else(|| {
                    Status::invalid_argument(format!("invalid {CALL_TIMEOUT_HEADER} header"))
                })?;
            signal = signal.with_timeout(timeout);
        }

        Ok(CallContext::new(method)
            .with_metadata(metadata)
            .with_signal(signal))
    }

    pub async fn laptop_count(&self) -> Option<usize> {
        self.app.server.laptops().store().len().await.ok()
    }
}

/// The request id a gateway call context carries.
pub fn request_id(cx: &CallContext) -> Option<String> {
    cx.metadata.get(REQUEST_ID).map(str::to_string)
}
