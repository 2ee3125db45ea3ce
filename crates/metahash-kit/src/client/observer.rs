//! Hooks into the endpoint ladder.
//!
//! The client never logs on its own. It reports each attempt to a
//! [`TransportObserver`]; the default [`NoopObserver`] discards everything and
//! [`TracingObserver`] forwards to `tracing`.

/// Receives events from the endpoint ladder.
///
/// All methods default to doing nothing.
pub trait TransportObserver: Send + Sync {
    /// About to try `url`, the `attempt`-th (1-based) of `total` candidates.
    fn on_attempt(&self, _url: &str, _attempt: usize, _total: usize) {}

    /// `url` failed before producing a status line; the ladder moves on.
    fn on_transport_failure(&self, _url: &str, _error: &reqwest::Error) {}

    /// `url` answered with `status`. The ladder stops here.
    fn on_response(&self, _url: &str, _status: u16) {}
}

/// Observer that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl TransportObserver for NoopObserver {}

/// Observer that emits `tracing` events.
///
/// Attempts and responses are logged at `debug`, transport failures at `warn`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl TransportObserver for TracingObserver {
    fn on_attempt(&self, url: &str, attempt: usize, total: usize) {
        tracing::debug!(url, attempt, total, "Sending request");
    }

    fn on_transport_failure(&self, url: &str, error: &reqwest::Error) {
        tracing::warn!(url, error = %error, "Endpoint unreachable, trying next");
    }

    fn on_response(&self, url: &str, status: u16) {
        tracing::debug!(url, status, "Endpoint responded");
    }
}
