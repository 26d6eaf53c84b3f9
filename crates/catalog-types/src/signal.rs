use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Why a call stopped before completing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Interrupted {
    #[error("request is canceled")]
    Canceled,
    #[error("deadline is exceeded")]
    DeadlineExceeded,
}

/// Cancellation and deadline state observed by a single in-flight call.
#[derive(Clone, Debug, Default)]
pub struct CallSignal {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl CallSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancellation wins over an expired deadline when both hold.
    pub fn check(&self) -> Result<(), Interrupted> {
        if self.cancel.is_cancelled() {
            return Err(Interrupted::Canceled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(Interrupted::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Resolves once the call is cancelled or its deadline passes.
    pub async fn interrupted(&self) -> Interrupted {
        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Interrupted::Canceled,
            _ = expired => Interrupted::DeadlineExceeded,
        }
    }

    /// Drives `fut` unless the call is interrupted first. `fut` is dropped on interruption.
    pub async fn guard<F: Future>(&self, fut: F) -> Result<F::Output, Interrupted> {
        self.check()?;
        tokio::select! {
            biased;
            reason = self.interrupted() => Err(reason),
            output = fut => Ok(output),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_signal_is_clear() {
        assert_eq!(CallSignal::new().check(), Ok(()));
    }

    #[test]
    fn cancel_is_observed_by_clones() {
        let signal = CallSignal::new();
        let observer = signal.clone();
        signal.cancel();
        assert_eq!(observer.check(), Err(Interrupted::Canceled));
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_expires() {
        let signal = CallSignal::new().with_timeout(Duration::from_millis(50));
        assert_eq!(signal.check(), Ok(()));
        tokio::time::advance(Duration::from_millis(60)).await;
        assert_eq!(signal.check(), Err(Interrupted::DeadlineExceeded));
    }

    #[tokio::test]
    async fn guard_gives_up_on_cancel() {
        let signal = CallSignal::new();
        let canceller = signal.clone();
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            canceller.cancel();
        });
        let result = signal.guard(std::future::pending::<()>()).await;
        assert_eq!(result, Err(Interrupted::Canceled));
    }

    #[tokio::test(start_paused = true)]
    async fn guard_gives_up_at_deadline() {
        let signal = CallSignal::new().with_timeout(Duration::from_millis(50));
        let result = signal.guard(std::future::pending::<()>()).await;
        assert_eq!(result, Err(Interrupted::DeadlineExceeded));
    }

    #[tokio::test]
    async fn guard_passes_output_through() {
        let signal = CallSignal::new();
        assert_eq!(signal.guard(async { 7 }).await, Ok(7));

        signal.cancel();
        assert_eq!(signal.guard(async { 7 }).await, Err(Interrupted::Canceled));
    }
}
