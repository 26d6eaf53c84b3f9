use catalog_interceptors::Code;
use std::time::Duration;

/// Hook for call-level accounting such as metrics.
pub trait CallObserver: Send + Sync {
    fn call_finished(&self, method: &str, code: Code, elapsed: Duration);

    fn image_uploaded(&self, _bytes: u64) {}
}
