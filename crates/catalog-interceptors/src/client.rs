use crate::context::CallContext;
use crate::metadata::AUTHORIZATION;
use crate::status::Status;
use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Something that can obtain a fresh access token, usually by calling Login.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn login(&self) -> Result<String, Status>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefreshPolicy {
    /// Delay between refreshes after a successful login.
    pub interval: Duration,
    /// Delay before retrying after a failed login.
    pub retry_delay: Duration,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            retry_delay: Duration::from_secs(1),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshState {
    Steady,
    FastRetry,
}

impl RefreshState {
    pub fn delay(self, policy: &RefreshPolicy) -> Duration {
        match self {
            RefreshState::Steady => policy.interval,
            RefreshState::FastRetry => policy.retry_delay,
        }
    }

    pub fn after(login_ok: bool) -> RefreshState {
        if login_ok {
            RefreshState::Steady
        } else {
            RefreshState::FastRetry
        }
    }
}

/// Attaches the current access token to outbound calls of protected methods and keeps
/// that token fresh from a background task.
///
/// The task stops on [`ClientAuthGate::shutdown`] or when the gate is dropped.
pub struct ClientAuthGate {
    token: Arc<ArcSwapOption<String>>,
    protected: HashSet<String>,
    state: watch::Receiver<RefreshState>,
    shutdown: CancellationToken,
}

impl ClientAuthGate {
    /// Logs in once, then starts the refresh task. A failed first login is returned as is.
    pub async fn start<I>(
        source: Arc<dyn TokenSource>,
        protected_methods: I,
        policy: RefreshPolicy,
    ) -> Result<Self, Status>
    where
        I: IntoIterator<Item = String>,
    {
        let initial = source.login().await?;
        tracing::info!("client auth gate obtained initial token");

        let token = Arc::new(ArcSwapOption::from_pointee(initial));
        let (state_tx, state_rx) = watch::channel(RefreshState::Steady);
        let shutdown = CancellationToken::new();

        tokio::spawn(refresh_loop(
            source,
            token.clone(),
            policy,
            state_tx,
            shutdown.clone(),
        ));

        Ok(Self {
            token,
            protected: protected_methods.into_iter().collect(),
            state: state_rx,
            shutdown,
        })
    }

    pub fn intercept(&self, cx: &mut CallContext) {
        if !self.protected.contains(&cx.method) {
            return;
        }
        if let Some(token) = self.token.load_full() {
            cx.metadata.insert(AUTHORIZATION, format!("Bearer {token}"));
        }
    }

    pub fn current_token(&self) -> Option<Arc<String>> {
        self.token.load_full()
    }

    pub fn refresh_state(&self) -> RefreshState {
        *self.state.borrow()
    }

    /// Receiver that observes every state the refresh task settles in.
    pub fn subscribe(&self) -> watch::Receiver<RefreshState> {
        self.state.clone()
    }

    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl Drop for ClientAuthGate {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn refresh_loop(
    source: Arc<dyn TokenSource>,
    token: Arc<ArcSwapOption<String>>,
    policy: RefreshPolicy,
    state_tx: watch::Sender<RefreshState>,
    shutdown: CancellationToken,
) {
    let mut state = RefreshState::Steady;
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(state.delay(&policy)) => {}
        }

        let outcome = tokio::select! {
            _ = shutdown.cancelled() => break,
            outcome = source.login() => outcome,
        };

        state = match outcome {
            Ok(fresh) => {
                token.store(Some(Arc::new(fresh)));
                tracing::debug!("access token refreshed");
                RefreshState::after(true)
            }
            Err(status) => {
                tracing::warn!(error = %status, "access token refresh failed, retrying");
                RefreshState::after(false)
            }
        };
        // `send_replace` keeps the value even when no receiver is left.
        state_tx.send_replace(state);
    }
    tracing::debug!("token refresh task stopped");
}
