//! Cooperative cancellation for analysis runs
//!
//! Rules poll the token between declarations. A cancelled file reports
//! [`Cancelled`] instead of a partial diagnostic list.

use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Returned when work was abandoned because cancellation was requested
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Analysis cancelled")]
pub struct Cancelled;

/// A cancellation token shared between the host and running analyses
#[derive(Clone)]
pub struct Cancellation {
    inner: CancellationToken,
}

impl Cancellation {
    /// Create a new cancellation token.
    pub fn new() -> Self {
        Self {
            inner: CancellationToken::new(),
        }
    }

    /// Check if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.inner.is_cancelled()
    }

    /// Request cancellation.
    ///
    /// After this is called, `is_cancelled()` will return `true`.
    pub fn cancel(&self) {
        self.inner.cancel()
    }

    /// `Err(Cancelled)` once cancellation has been requested
    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}

impl Default for Cancellation {
    fn default() -> Self {
        Self::new()
    }
}

impl From<CancellationToken> for Cancellation {
    fn from(token: CancellationToken) -> Self {
        Self { inner: token }
    }
}
