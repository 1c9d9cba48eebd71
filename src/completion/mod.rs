//! One-shot completion signals for callback-style tests.
//!
//! Code that reports through a callback instead of returning a future is
//! awkward to test: the test has to wait for the callback, fail if it never
//! arrives, and fail loudly if it arrives with the wrong payload. This module
//! provides [`channel`], which returns a [`Done`] handle to hand to the code
//! under test and a [`DoneWaiter`] the test awaits.
//!
//! A signal fires at most once. [`Done::resolve`] and [`Done::reject`] report
//! whether they fired; later attempts are ignored. If every `Done` handle is
//! dropped before the signal fires, the waiter resolves to
//! [`Error::Abandoned`] instead of hanging, which is what happens when the
//! callback panicked or was never invoked.
//!
//! # Example
//!
//! ```rust
//! use understudy::completion;
//!
//! fn fetch(callback: impl FnOnce(&str) + Send + 'static) {
//!     std::thread::spawn(move || callback("data"));
//! }
//!
//! let (done, waiter) = completion::channel::<String>();
//! fetch(move |data| {
//!     done.resolve(data.to_string());
//! });
//!
//! let outcome = futures::executor::block_on(waiter.wait());
//! assert_eq!(outcome.unwrap(), "data");
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll, Waker};
#[cfg(feature = "tokio")]
use std::time::Duration;

use parking_lot::Mutex;

use crate::error::{Error, Result};

/// Create a completion signal.
///
/// Returns the firing half and the waiting half. The [`Done`] handle is
/// cloneable; the signal is abandoned only when every handle is gone.
///
/// # Example
///
/// ```rust
/// use understudy::completion;
///
/// let (done, waiter) = completion::channel::<i32>();
/// assert!(done.resolve(7));
/// assert_eq!(futures::executor::block_on(waiter.wait()).unwrap(), 7);
/// ```
#[must_use]
pub fn channel<T>() -> (Done<T>, DoneWaiter<T>) {
    let inner = Arc::new(Inner {
        state: Mutex::new(SignalState::Pending { waker: None }),
        handles: AtomicUsize::new(1),
    });

    (
        Done {
            inner: Arc::clone(&inner),
        },
        DoneWaiter { inner },
    )
}

struct Inner<T> {
    state: Mutex<SignalState<T>>,
    /// Number of live `Done` handles.
    handles: AtomicUsize,
}

enum SignalState<T> {
    Pending { waker: Option<Waker> },
    Resolved(Option<T>),
    Rejected(Option<String>),
    Abandoned,
}

/// Firing half of a completion signal.
///
/// Hand this (or a clone) to the code under test. The first call to
/// [`resolve`](Done::resolve) or [`reject`](Done::reject) settles the signal;
/// everything after that is a no-op that returns `false`.
pub struct Done<T = ()> {
    inner: Arc<Inner<T>>,
}

impl<T> Done<T> {
    /// Fire the signal with a success payload.
    ///
    /// Returns `true` if this call settled the signal.
    pub fn resolve(&self, value: T) -> bool {
        self.fire(SignalState::Resolved(Some(value)))
    }

    /// Fire the signal with a failure reason.
    ///
    /// The waiter resolves to [`Error::Rejected`] carrying the reason.
    /// Returns `true` if this call settled the signal.
    pub fn reject(&self, reason: impl Into<String>) -> bool {
        self.fire(SignalState::Rejected(Some(reason.into())))
    }

    /// Check if the signal has already fired.
    #[must_use]
    pub fn is_fired(&self) -> bool {
        !matches!(*self.inner.state.lock(), SignalState::Pending { .. })
    }

    fn fire(&self, fired: SignalState<T>) -> bool {
        let mut state = self.inner.state.lock();
        match &mut *state {
            SignalState::Pending { waker } => {
                let waker = waker.take();
                *state = fired;
                drop(state);
                if let Some(waker) = waker {
                    waker.wake();
                }
                true
            }
            _ => false,
        }
    }
}

impl Done<()> {
    /// Fire a payload-free signal.
    ///
    /// Shorthand for `resolve(())`.
    pub fn complete(&self) -> bool {
        self.resolve(())
    }
}

impl<T> Clone for Done<T> {
    fn clone(&self) -> Self {
        self.inner.handles.fetch_add(1, Ordering::SeqCst);
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Drop for Done<T> {
    fn drop(&mut self) {
        if self.inner.handles.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Last handle gone. If nothing fired, the signal can never fire:
            // wake the waiter with the abandonment instead of leaving it parked.
            let mut state = self.inner.state.lock();
            if let SignalState::Pending { waker } = &mut *state {
                let waker = waker.take();
                *state = SignalState::Abandoned;
                drop(state);
                if let Some(waker) = waker {
                    waker.wake();
                }
            }
        }
    }
}

impl<T> std::fmt::Debug for Done<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Done")
            .field("fired", &self.is_fired())
            .field("handles", &self.inner.handles.load(Ordering::SeqCst))
            .finish()
    }
}

/// Waiting half of a completion signal.
pub struct DoneWaiter<T = ()> {
    inner: Arc<Inner<T>>,
}

impl<T> DoneWaiter<T> {
    /// Wait for the signal to settle.
    ///
    /// Resolves to `Ok(payload)` on [`Done::resolve`], to
    /// [`Error::Rejected`] on [`Done::reject`], and to [`Error::Abandoned`]
    /// if every handle was dropped unfired.
    pub fn wait(self) -> Wait<T> {
        Wait { inner: self.inner }
    }

    /// Wait for the signal, failing with [`Error::Timeout`] after `deadline`.
    #[cfg(feature = "tokio")]
    pub async fn wait_timeout(self, deadline: Duration) -> Result<T> {
        match tokio::time::timeout(deadline, self.wait()).await {
            Ok(outcome) => outcome,
            Err(_) => Err(Error::Timeout(deadline)),
        }
    }
}

impl<T> std::fmt::Debug for DoneWaiter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DoneWaiter").finish_non_exhaustive()
    }
}

/// Future returned by [`DoneWaiter::wait`].
///
/// # Panics
///
/// Panics if polled again after it has already produced the payload.
pub struct Wait<T = ()> {
    inner: Arc<Inner<T>>,
}

impl<T> Future for Wait<T> {
    type Output = Result<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.inner.state.lock();
        match &mut *state {
            SignalState::Pending { waker } => {
                *waker = Some(cx.waker().clone());
                Poll::Pending
            }
            SignalState::Resolved(value) => match value.take() {
                Some(value) => Poll::Ready(Ok(value)),
                None => panic!("polled after completion"),
            },
            SignalState::Rejected(reason) => match reason.take() {
                Some(reason) => Poll::Ready(Err(Error::rejected(reason))),
                None => panic!("polled after completion"),
            },
            SignalState::Abandoned => Poll::Ready(Err(Error::Abandoned)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::pin::pin;
    use std::time::Duration;

    use crate::{assert_pending, assert_ready};

    #[test]
    fn test_resolve_before_wait() {
        let (done, waiter) = channel::<i32>();

        assert!(!done.is_fired());
        assert!(done.resolve(7));
        assert!(done.is_fired());

        let outcome = assert_ready!(waiter.wait());
        assert_eq!(outcome.unwrap(), 7);
    }

    #[test]
    fn test_resolve_wakes_parked_waiter() {
        let (done, waiter) = channel::<&str>();

        let mut wait = pin!(waiter.wait());
        let mut cx = Context::from_waker(Waker::noop());
        assert!(wait.as_mut().poll(&mut cx).is_pending());

        assert!(done.resolve("payload"));

        match wait.as_mut().poll(&mut cx) {
            Poll::Ready(Ok(value)) => assert_eq!(value, "payload"),
            other => panic!("expected resolution, got {other:?}"),
        }
    }

    #[test]
    fn test_first_fire_wins() {
        let (done, waiter) = channel::<i32>();

        assert!(done.resolve(1));
        assert!(!done.resolve(2));
        assert!(!done.reject("too late"));

        let outcome = assert_ready!(waiter.wait());
        assert_eq!(outcome.unwrap(), 1);
    }

    #[test]
    fn test_reject_carries_reason() {
        let (done, waiter) = channel::<i32>();

        assert!(done.reject("wrong payload"));

        let err = assert_ready!(waiter.wait()).unwrap_err();
        assert!(err.is_rejection_with("wrong payload"));
    }

    #[test]
    fn test_abandoned_when_all_handles_drop() {
        let (done, waiter) = channel::<i32>();
        let spare = done.clone();

        drop(done);
        drop(spare);

        let err = assert_ready!(waiter.wait()).unwrap_err();
        assert!(matches!(err, Error::Abandoned));
    }

    #[test]
    fn test_abandon_wakes_parked_waiter() {
        let (done, waiter) = channel::<i32>();

        let mut wait = pin!(waiter.wait());
        let mut cx = Context::from_waker(Waker::noop());
        assert!(wait.as_mut().poll(&mut cx).is_pending());

        drop(done);

        match wait.as_mut().poll(&mut cx) {
            Poll::Ready(Err(Error::Abandoned)) => {}
            other => panic!("expected abandonment, got {other:?}"),
        }
    }

    #[test]
    fn test_clone_keeps_signal_alive() {
        let (done, waiter) = channel::<i32>();
        let spare = done.clone();

        drop(done);

        // One handle remains, so the signal is still pending and can fire.
        let mut wait = pin!(waiter.wait());
        let mut cx = Context::from_waker(Waker::noop());
        assert!(wait.as_mut().poll(&mut cx).is_pending());

        assert!(spare.resolve(3));
        assert!(matches!(wait.as_mut().poll(&mut cx), Poll::Ready(Ok(3))));
    }

    #[test]
    fn test_resolved_signal_survives_handle_drop() {
        let (done, waiter) = channel::<i32>();

        done.resolve(42);
        drop(done);

        let outcome = assert_ready!(waiter.wait());
        assert_eq!(outcome.unwrap(), 42);
    }

    #[test]
    fn test_complete_sugar() {
        let (done, waiter) = channel::<()>();

        assert!(done.complete());
        assert!(!done.complete());

        assert!(assert_ready!(waiter.wait()).is_ok());
    }

    #[test]
    fn test_unfired_signal_stays_pending() {
        let (done, waiter) = channel::<i32>();
        assert_pending!(waiter.wait());
        drop(done);
    }

    #[test]
    fn test_done_debug() {
        let (done, _waiter) = channel::<i32>();
        let debug = format!("{done:?}");
        assert!(debug.contains("Done"));
        assert!(debug.contains("fired: false"));
    }

    #[tokio::test]
    async fn test_wait_across_tasks() {
        let (done, waiter) = channel::<String>();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            done.resolve("from the other task".to_string());
        });

        let outcome = waiter.wait().await;
        assert_eq!(outcome.unwrap(), "from the other task");
    }

    #[tokio::test]
    async fn test_abandon_across_tasks() {
        let (done, waiter) = channel::<String>();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            drop(done);
        });

        let err = waiter.wait().await.unwrap_err();
        assert!(matches!(err, Error::Abandoned));
    }

    #[cfg(feature = "tokio")]
    #[tokio::test]
    async fn test_wait_timeout_elapses() {
        let (_done, waiter) = channel::<()>();

        let err = waiter
            .wait_timeout(Duration::from_millis(20))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout(_)));
    }

    #[cfg(feature = "tokio")]
    #[tokio::test]
    async fn test_wait_timeout_fired_in_time() {
        let (done, waiter) = channel::<i32>();
        done.resolve(5);

        let outcome = waiter.wait_timeout(Duration::from_secs(1)).await;
        assert_eq!(outcome.unwrap(), 5);
    }
}
