//! Future assertion utilities for testing async code.
//!
//! This module provides utilities for checking how futures behave:
//!
//! - [`poll_once`] - Poll a future once without an executor
//! - [`assert_ready!`] - Assert a future is immediately ready
//! - [`assert_pending!`] - Assert a future is not ready
//! - [`assert_resolves!`] - Assert a fallible future resolves (to a value)
//! - [`assert_rejects!`] - Assert a fallible future rejects (with an error)
//!
//! # Example
//!
//! ```rust
//! use understudy::{assert_ready, assert_pending};
//! use understudy::completion;
//!
//! let (done, waiter) = completion::channel::<i32>();
//!
//! // Nothing fired yet
//! assert_pending!(waiter.wait());
//!
//! // After firing, the wait is immediately ready
//! let (done2, waiter2) = completion::channel::<i32>();
//! done2.resolve(7);
//! let outcome = assert_ready!(waiter2.wait());
//! assert_eq!(outcome.unwrap(), 7);
//! # drop(done);
//! ```

use std::future::Future;
use std::task::{Context, Poll, Waker};

/// Poll a future once and return the result.
///
/// This is useful for testing futures without an executor. The future is
/// polled with a no-op waker, so a `Pending` result is a statement about
/// this poll only.
///
/// # Example
///
/// ```rust
/// use understudy::assertions::poll_once;
/// use understudy::completion;
/// use std::task::Poll;
///
/// let (done, waiter) = completion::channel::<&str>();
/// done.resolve("settled");
///
/// match poll_once(waiter.wait()) {
///     Poll::Ready(outcome) => assert_eq!(outcome.unwrap(), "settled"),
///     Poll::Pending => unreachable!(),
/// }
/// ```
pub fn poll_once<F: Future>(future: F) -> Poll<F::Output> {
    let mut cx = Context::from_waker(Waker::noop());
    let mut pinned = Box::pin(future);
    pinned.as_mut().poll(&mut cx)
}

/// Assert that a future is immediately ready.
///
/// Returns the ready value.
///
/// # Panics
///
/// Panics if the future returns `Poll::Pending`.
///
/// # Example
///
/// ```rust
/// use understudy::assert_ready;
///
/// let ready = async { 42 };
/// let value = assert_ready!(ready);
/// assert_eq!(value, 42);
/// ```
#[macro_export]
macro_rules! assert_ready {
    ($future:expr) => {{
        match $crate::assertions::poll_once($future) {
            ::std::task::Poll::Ready(value) => value,
            ::std::task::Poll::Pending => {
                panic!("assertion failed: expected future to be Ready, but it was Pending");
            }
        }
    }};
    ($future:expr, $($arg:tt)+) => {{
        match $crate::assertions::poll_once($future) {
            ::std::task::Poll::Ready(value) => value,
            ::std::task::Poll::Pending => {
                panic!("assertion failed: expected future to be Ready, but it was Pending: {}", format_args!($($arg)+));
            }
        }
    }};
}

/// Assert that a future is pending (not ready).
///
/// # Panics
///
/// Panics if the future returns `Poll::Ready`.
///
/// # Example
///
/// ```rust
/// use understudy::assert_pending;
/// use understudy::completion;
///
/// let (done, waiter) = completion::channel::<i32>();
/// assert_pending!(waiter.wait());
/// # drop(done);
/// ```
#[macro_export]
macro_rules! assert_pending {
    ($future:expr) => {{
        match $crate::assertions::poll_once($future) {
            ::std::task::Poll::Pending => {}
            ::std::task::Poll::Ready(value) => {
                panic!(
                    "assertion failed: expected future to be Pending, but it was Ready({:?})",
                    value
                );
            }
        }
    }};
    ($future:expr, $($arg:tt)+) => {{
        match $crate::assertions::poll_once($future) {
            ::std::task::Poll::Pending => {}
            ::std::task::Poll::Ready(value) => {
                panic!(
                    "assertion failed: expected future to be Pending, but it was Ready({:?}): {}",
                    value,
                    format_args!($($arg)+)
                );
            }
        }
    }};
}

/// Assert that a fallible future resolves.
///
/// Awaits the future, panics if it rejected, and returns the resolved value.
/// With a second argument, also asserts the resolved value equals it.
///
/// # Panics
///
/// Panics if the future resolves to `Err`, or if the resolved value differs
/// from the expected one.
///
/// # Example
///
/// ```rust
/// use understudy::assert_resolves;
///
/// async fn get_result() -> Result<i32, &'static str> { Ok(42) }
///
/// futures::executor::block_on(async {
///     let value = assert_resolves!(get_result());
///     assert_eq!(value, 42);
///
///     assert_resolves!(get_result(), 42);
/// });
/// ```
#[macro_export]
macro_rules! assert_resolves {
    ($future:expr) => {{
        match $future.await {
            Ok(value) => value,
            Err(err) => panic!(
                "assertion failed: expected the future to resolve, but it rejected with {:?}",
                err
            ),
        }
    }};
    ($future:expr, $expected:expr $(,)?) => {{
        let value = $crate::assert_resolves!($future);
        assert_eq!(value, $expected);
        value
    }};
}

/// Assert that a fallible future rejects.
///
/// Awaits the future, panics if it resolved, and returns the error. With a
/// second argument, also asserts the error equals it.
///
/// # Panics
///
/// Panics if the future resolves to `Ok`, or if the error differs from the
/// expected one.
///
/// # Example
///
/// ```rust
/// use understudy::assert_rejects;
///
/// async fn get_error() -> Result<i32, &'static str> { Err("oops") }
///
/// futures::executor::block_on(async {
///     let err = assert_rejects!(get_error());
///     assert_eq!(err, "oops");
///
///     assert_rejects!(get_error(), "oops");
/// });
/// ```
#[macro_export]
macro_rules! assert_rejects {
    ($future:expr) => {{
        match $future.await {
            Err(err) => err,
            Ok(value) => panic!(
                "assertion failed: expected the future to reject, but it resolved to {:?}",
                value
            ),
        }
    }};
    ($future:expr, $expected:expr $(,)?) => {{
        let err = $crate::assert_rejects!($future);
        assert_eq!(err, $expected);
        err
    }};
}
