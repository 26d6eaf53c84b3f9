use crate::server::CatalogServer;
use catalog_interceptors::prelude::*;
use catalog_types::CallSignal;
use std::sync::Arc;
use std::time::Duration;

/// In-process transport from a client to a [`CatalogServer`].
///
/// Every call head passes through the optional client auth gate, so protected methods
/// carry the gate's current token.
#[derive(Clone)]
pub struct LocalChannel {
    server: Arc<CatalogServer>,
    gate: Option<Arc<ClientAuthGate>>,
    timeout: Option<Duration>,
}

impl LocalChannel {
    pub fn new(server: Arc<CatalogServer>) -> Self {
        Self {
            server,
            gate: None,
            timeout: None,
        }
    }

    pub fn with_gate(mut self, gate: Arc<ClientAuthGate>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Deadline applied to every call made through this channel.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn server(&self) -> &Arc<CatalogServer> {
        &self.server
    }

    pub fn context(&self, method: &str) -> CallContext {
        self.context_with_signal(method, CallSignal::new())
    }

    pub fn context_with_signal(&self, method: &str, mut signal: CallSignal) -> CallContext {
        if let Some(timeout) = self.timeout {
            signal = signal.with_timeout(timeout);
        }
        let mut cx = CallContext::new(method).with_signal(signal);
        if let Some(gate) = &self.gate {
            gate.intercept(&mut cx);
        }
        cx
    }
}
