use crate::context::CallContext;
use crate::metadata::REQUEST_ID;
use crate::stages::Stage;
use crate::status::Status;
use async_trait::async_trait;

/// Assigns the request id, taken from `x-request-id` when the caller sent one.
pub struct ContextInitStage;

#[async_trait]
impl Stage for ContextInitStage {
    async fn handle(&self, cx: &mut CallContext) -> Result<(), Status> {
        if cx.request_id.is_empty() {
            cx.request_id = cx
                .metadata
                .get(REQUEST_ID)
                .map(str::to_string)
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        }
        Ok(())
    }
}
