use crate::context::CallContext;
use crate::status::Status;
use async_trait::async_trait;

pub mod context_init;

/// One step of the inbound call pipeline. Runs once per call, before any message is read.
#[async_trait]
pub trait Stage: Send + Sync {
    async fn handle(&self, cx: &mut CallContext) -> Result<(), Status>;
}

pub struct InterceptorChain {
    stages: Vec<Box<dyn Stage>>,
}

impl InterceptorChain {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    /// Runs every stage in order. The first error rejects the call.
    pub async fn run(&self, cx: &mut CallContext) -> Result<(), Status> {
        for stage in &self.stages {
            stage.handle(cx).await?;
        }
        Ok(())
    }
}
