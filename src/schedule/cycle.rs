//! Cyclic sequence generator.
//!
//! Turns a finite list into an endless, cancelable stream:
//! `[A, B, C]` is delivered as `A, B, C, A, B, C, A, ...` until the
//! cancellation token fires.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Consumer side of a cyclic sequence.
///
/// At most one element is waiting in the channel at any time. Once the
/// token is cancelled, [`Cycle::recv`] returns `None`, including when an
/// element was already handed over but not yet received.
///
/// There is a single receiver behind `&mut self`; consumers in separate
/// tasks that take turns must share the handle through a `Mutex`.
#[derive(Debug)]
pub struct Cycle<T> {
    rx: mpsc::Receiver<T>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

/// Start producing `items` cyclically until `cancel` fires.
///
/// Spawns one background task that owns the producer side. An empty list
/// yields a handle that is already closed.
pub fn infinite_range<T>(items: Vec<T>, cancel: CancellationToken) -> Cycle<T>
where
    T: Clone + Send + 'static,
{
    let (tx, rx) = mpsc::channel(1);

    if items.is_empty() {
        tracing::debug!("Empty sequence, closing cycle immediately");
        return Cycle {
            rx,
            cancel,
            task: None,
        };
    }

    let task = tokio::spawn(produce(items, tx, cancel.clone()));
    Cycle {
        rx,
        cancel,
        task: Some(task),
    }
}

async fn produce<T: Clone>(items: Vec<T>, tx: mpsc::Sender<T>, cancel: CancellationToken) {
    tracing::debug!(len = items.len(), "Cycle producer started");

    // No borrow of `items` may live across the select: `T` is not `Sync`.
    let mut next = 0;
    loop {
        let item = items[next].clone();
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("Cycle producer cancelled");
                return;
            }
            permit = tx.reserve() => match permit {
                Ok(permit) => permit.send(item),
                Err(_) => {
                    tracing::debug!("Cycle consumer dropped, stopping producer");
                    return;
                }
            }
        }
        next = (next + 1) % items.len();
    }
}

impl<T> Cycle<T> {
    /// Receive the next element, or `None` once cancelled or closed.
    pub async fn recv(&mut self) -> Option<T> {
        if self.cancel.is_cancelled() {
            self.rx.close();
            return None;
        }
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                self.rx.close();
                None
            }
            item = self.rx.recv() => item.filter(|_| !self.cancel.is_cancelled()),
        }
    }

    /// Whether the token observed by this cycle has fired.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Stop consuming and wait for the background task to finish.
    pub async fn shutdown(self) {
        let Cycle { rx, task, .. } = self;
        drop(rx);
        if let Some(task) = task {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Cycle producer task failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    const BUDGET: Duration = Duration::from_secs(2);

    #[tokio::test]
    async fn test_elements_repeat_in_order() {
        let cancel = CancellationToken::new();
        let mut cycle = infinite_range(vec!['A', 'B', 'C'], cancel.clone());

        let mut seen = Vec::new();
        for _ in 0..7 {
            seen.push(cycle.recv().await.unwrap());
        }
        assert_eq!(seen, vec!['A', 'B', 'C', 'A', 'B', 'C', 'A']);

        cancel.cancel();
        assert_eq!(cycle.recv().await, None);
    }

    #[tokio::test]
    async fn test_elements_need_not_be_sync() {
        use std::cell::Cell;

        let cancel = CancellationToken::new();
        let mut cycle = infinite_range(vec![Cell::new(1u8), Cell::new(2u8)], cancel.clone());

        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(cycle.recv().await.unwrap().get());
        }
        assert_eq!(seen, vec![1, 2, 1, 2]);

        cancel.cancel();
        timeout(BUDGET, cycle.shutdown()).await.unwrap();
    }

    #[tokio::test]
    async fn test_no_delivery_after_cancellation() {
        let cancel = CancellationToken::new();
        let mut cycle = infinite_range(vec![1, 2, 3], cancel.clone());
        assert_eq!(cycle.recv().await, Some(1));

        // Give the producer time to park the next element in the channel.
        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel();

        assert_eq!(cycle.recv().await, None);
        assert_eq!(cycle.recv().await, None);
        timeout(BUDGET, cycle.shutdown()).await.unwrap();
    }

    #[tokio::test]
    async fn test_cancel_before_first_receive() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut cycle = infinite_range(vec!["x"], cancel.clone());

        assert_eq!(cycle.recv().await, None);
        assert!(cycle.is_cancelled());
        cancel.cancel();
        timeout(BUDGET, cycle.shutdown()).await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_sequence_closes_immediately() {
        let mut cycle = infinite_range(Vec::<u8>::new(), CancellationToken::new());
        let next = timeout(BUDGET, cycle.recv()).await.unwrap();
        assert_eq!(next, None);
        timeout(BUDGET, cycle.shutdown()).await.unwrap();
    }

    #[tokio::test]
    async fn test_producer_stops_on_cancellation() {
        let cancel = CancellationToken::new();
        let mut cycle = infinite_range(vec![1u32], cancel.clone());
        assert_eq!(cycle.recv().await, Some(1));

        cancel.cancel();
        let task = cycle.task.take().unwrap();
        timeout(BUDGET, task).await.unwrap().unwrap();
        assert_eq!(cycle.recv().await, None);
    }

    #[tokio::test]
    async fn test_dropping_consumer_stops_producer() {
        let cycle = infinite_range(vec![1, 2], CancellationToken::new());
        timeout(BUDGET, cycle.shutdown()).await.unwrap();
    }
}
