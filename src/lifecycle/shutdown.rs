//! Shutdown coordination.

use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

/// One-shot cancellation signal shared by every long-running task.
///
/// Triggering is idempotent and the signal never resets. Tasks observe it
/// through [`Shutdown::cancelled`] or a [`CancellationToken`] clone.
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    token: CancellationToken,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        if !self.token.is_cancelled() {
            tracing::debug!("Shutdown triggered");
        }
        self.token.cancel();
    }

    pub fn is_triggered(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the signal fired; immediately if it already has.
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }

    /// Token observing this signal.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// A signal that fires with this one, and can also be fired on its own.
    pub fn child(&self) -> Shutdown {
        Shutdown {
            token: self.token.child_token(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_trigger_is_broadcast_and_idempotent() {
        let shutdown = Shutdown::new();
        let observer = shutdown.clone();
        let waiter = tokio::spawn(async move { observer.cancelled().await });

        shutdown.trigger();
        shutdown.trigger();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
        assert!(shutdown.is_triggered());
        shutdown.cancelled().await;
    }

    #[tokio::test]
    async fn test_child_follows_parent_only() {
        let parent = Shutdown::new();
        let child = parent.child();

        child.trigger();
        assert!(!parent.is_triggered());

        let other = parent.child();
        parent.trigger();
        assert!(other.is_triggered());
    }
}
