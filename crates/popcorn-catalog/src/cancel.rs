//! Cooperative cancellation for catalog requests.
//!
//! A [`CancelHandle`] is held by whoever started an episode; the matching
//! [`CancelToken`]s travel into the transport. Cancelling the handle, or
//! dropping it, resolves every token's [`CancelToken::cancelled`] future.

use std::future::Future;
use tokio::sync::watch;
use crate::error::CatalogError;

#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: self.tx.subscribe(),
        }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        // A dropped handle counts as cancelled
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }

    /// Resolves once the owning handle is cancelled or dropped.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}

/// Run `fut` unless `token` fires first. The losing request future is
/// dropped, which aborts the underlying HTTP exchange.
pub async fn cancellable<T, F>(token: &CancelToken, fut: F) -> Result<T, CatalogError>
where
    F: Future<Output = Result<T, CatalogError>>,
{
    if token.is_cancelled() {
        return Err(CatalogError::Cancelled);
    }

    tokio::select! {
        biased;
        _ = token.cancelled() => Err(CatalogError::Cancelled),
        result = fut => result,
    }
}
