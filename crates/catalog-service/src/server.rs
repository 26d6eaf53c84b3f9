use crate::auth::AuthServer;
use crate::laptop::LaptopServer;
use crate::observe::CallObserver;
use catalog_errors::prelude::Severity;
use catalog_interceptors::prelude::*;
use catalog_types::message::*;
use std::future::Future;
use std::sync::Arc;
use tokio::time::Instant;

const STREAM_BUFFER: usize = 16;

/// Entry point of every inbound call.
///
/// The interceptor chain (request id, then the auth gate) runs exactly once per call,
/// before any message is read. Streaming calls then run on their own task.
pub struct CatalogServer {
    chain: InterceptorChain,
    auth: AuthServer,
    laptops: LaptopServer,
    observer: Option<Arc<dyn CallObserver>>,
}

impl CatalogServer {
    pub fn new(gate: ServerAuthGate, auth: AuthServer, laptops: LaptopServer) -> Self {
        Self {
            chain: InterceptorChain::new(vec![Box::new(ContextInitStage), Box::new(gate)]),
            auth,
            laptops,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn CallObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn laptops(&self) -> &LaptopServer {
        &self.laptops
    }

    pub async fn login(
        &self,
        mut cx: CallContext,
        request: LoginRequest,
    ) -> Result<LoginResponse, Status> {
        let started = Instant::now();
        let result = async {
            self.chain.run(&mut cx).await?;
            self.auth.login(&cx, request).await
        }
        .await;
        self.finish(&cx, started, result.as_ref().err());
        result
    }

    pub async fn create_laptop(
        &self,
        mut cx: CallContext,
        request: CreateLaptopRequest,
    ) -> Result<CreateLaptopResponse, Status> {
        let started = Instant::now();
        let result = async {
            self.chain.run(&mut cx).await?;
            self.laptops.create_laptop(&cx, request).await
        }
        .await;
        self.finish(&cx, started, result.as_ref().err());
        result
    }

    /// Server-streaming search. Matches arrive on the returned stream; a failure ends it
    /// with a status.
    pub async fn search_laptop(
        self: &Arc<Self>,
        mut cx: CallContext,
        request: SearchLaptopRequest,
    ) -> Result<Streaming<SearchLaptopResponse>, Status> {
        let started = Instant::now();
        self.admit(&mut cx, started).await?;

        let (sink, stream) = channel(STREAM_BUFFER);
        let server = Arc::clone(self);
        tokio::spawn(async move {
            let result = server.laptops.search_laptop(&cx, request, &sink).await;
            server.finish(&cx, started, result.as_ref().err());
            if let Err(status) = result {
                settle(sink, status).await;
            }
        });
        Ok(stream)
    }

    /// Client-streaming upload. Resolves once the whole image is stored or rejected.
    pub async fn upload_image(
        self: &Arc<Self>,
        mut cx: CallContext,
        requests: Streaming<UploadImageRequest>,
    ) -> Result<UploadImageResponse, Status> {
        let started = Instant::now();
        self.admit(&mut cx, started).await?;

        let server = Arc::clone(self);
        join(tokio::spawn(async move {
            let result = server.laptops.upload_image(&cx, requests).await;
            server.finish(&cx, started, result.as_ref().err());
            if let (Some(observer), Ok(response)) = (&server.observer, &result) {
                observer.image_uploaded(response.size);
            }
            result
        }))
        .await
    }

    /// Bidirectional rating exchange. One response per request, in order.
    pub async fn rate_laptop(
        self: &Arc<Self>,
        mut cx: CallContext,
        requests: Streaming<RateLaptopRequest>,
    ) -> Result<Streaming<RateLaptopResponse>, Status> {
        let started = Instant::now();
        self.admit(&mut cx, started).await?;

        let (sink, stream) = channel(STREAM_BUFFER);
        let server = Arc::clone(self);
        tokio::spawn(async move {
            let result = server.laptops.rate_laptop(&cx, requests, &sink).await;
            server.finish(&cx, started, result.as_ref().err());
            if let Err(status) = result {
                settle(sink, status).await;
            }
        });
        Ok(stream)
    }

    async fn admit(&self, cx: &mut CallContext, started: Instant) -> Result<(), Status> {
        let result = self.chain.run(cx).await;
        if let Err(status) = &result {
            self.finish(cx, started, Some(status));
        }
        result
    }

    fn finish(&self, cx: &CallContext, started: Instant, failure: Option<&Status>) {
        let code = failure.map(Status::code).unwrap_or(Code::Ok);
        if let Some(status) = failure {
            let err = status
                .error_builder()
                .request_id(cx.request_id.clone())
                .build();
            let audit = err.to_audit();
            match err.severity {
                Severity::Critical | Severity::Error => {
                    tracing::error!(method = %cx.method, ?audit, "call failed")
                }
                Severity::Warn => tracing::warn!(method = %cx.method, ?audit, "call rejected"),
                Severity::Info => tracing::info!(method = %cx.method, ?audit, "call ended early"),
            }
        }
        if let Some(observer) = &self.observer {
            observer.call_finished(&cx.method, code, started.elapsed());
        }
    }
}

/// Ends a response stream with `status`. An interrupted caller may have stopped reading,
/// so those statuses are only queued when there is room.
async fn settle<T>(sink: StreamSink<T>, status: Status) {
    match status.code() {
        Code::Canceled | Code::DeadlineExceeded => {
            if !sink.try_fail(status) {
                tracing::debug!("interrupted stream left without a final status");
            }
        }
        _ => sink.fail(status).await,
    }
}

async fn join<T>(
    task: impl Future<Output = Result<Result<T, Status>, tokio::task::JoinError>>,
) -> Result<T, Status> {
    match task.await {
        Ok(result) => result,
        Err(err) => Err(Status::internal(format!("call task failed: {err}"))),
    }
}
