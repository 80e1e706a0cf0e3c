//! Panic isolation for units of work.
//!
//! A panic inside a guarded unit is caught, logged with its message and
//! turned into `None`, so the supervising loop keeps running.

use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

use futures_util::FutureExt;

/// Best-effort text of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

fn report(task: &str, payload: &(dyn Any + Send)) {
    tracing::error!(task, panic = %panic_message(payload), "Caught panic, recovering");
}

/// Run `f`, returning `None` if it panicked.
pub fn catch_panic<R>(task: &str, f: impl FnOnce() -> R) -> Option<R> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Some(value),
        Err(payload) => {
            report(task, &*payload);
            None
        }
    }
}

/// Await `future`, returning `None` if polling it panicked.
pub async fn guarded<F: Future>(task: &str, future: F) -> Option<F::Output> {
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(value) => Some(value),
        Err(payload) => {
            report(task, &*payload);
            None
        }
    }
}
