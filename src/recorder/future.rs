// Allow must_use_candidate since recorder methods often have useful side effects
#![allow(clippy::must_use_candidate)]

//! Call recording for async functions.
//!
//! [`AsyncRecorder`] is the async counterpart of
//! [`Recorder`](super::Recorder): the wrapped target returns a future,
//! `call` is awaited, and scripted resolutions short-circuit the target.
//!
//! # Example
//!
//! ```rust
//! use understudy::recorder::AsyncRecorder;
//!
//! futures::executor::block_on(async {
//!     let fetch = AsyncRecorder::new(|id: u32| async move { id * 10 });
//!
//!     assert_eq!(fetch.call(3).await, 30);
//!     assert_eq!(fetch.call_count(), 1);
//! });
//! ```

use std::collections::VecDeque;
use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use super::sync::CallRecord;
use crate::assertions::matcher::Matcher;

type TargetFuture<O> = Pin<Box<dyn Future<Output = O> + Send>>;
type AsyncTarget<A, O> = Box<dyn Fn(A) -> TargetFuture<O> + Send + Sync>;

struct AsyncRecorderState<A, O> {
    records: Vec<CallRecord<A, O>>,
    once_queue: VecDeque<O>,
    fallback: Option<O>,
}

/// A test double that wraps an async function and records every call.
///
/// Outcome resolution works exactly as in [`Recorder`](super::Recorder):
/// queued one-shot resolutions first, then the persistent fallback, then the
/// wrapped target. Scripted outcomes never poll the target. The internal
/// lock is released before the target future is awaited, so recorded calls
/// may finish in any order under concurrency while each one still appends
/// exactly one record.
///
/// # Type Parameters
///
/// - `A` - The argument type (must be Clone for recording)
/// - `O` - The resolved outcome type (must be Clone for recording)
pub struct AsyncRecorder<A, O> {
    target: AsyncTarget<A, O>,
    state: Mutex<AsyncRecorderState<A, O>>,
    created_at: Instant,
}

impl<A, O> AsyncRecorder<A, O>
where
    A: Clone,
    O: Clone,
{
    /// Create a recorder wrapping the given async target.
    ///
    /// # Example
    ///
    /// ```rust
    /// use understudy::recorder::AsyncRecorder;
    ///
    /// let fetch = AsyncRecorder::new(|id: u32| async move {
    ///     format!("user-{id}")
    /// });
    /// # let _ = fetch;
    /// ```
    pub fn new<F, Fut>(target: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = O> + Send + 'static,
    {
        Self {
            target: Box::new(move |args| Box::pin(target(args))),
            state: Mutex::new(AsyncRecorderState {
                records: Vec::new(),
                once_queue: VecDeque::new(),
                fallback: None,
            }),
            created_at: Instant::now(),
        }
    }

    /// Create a recorder whose target always resolves to `value`.
    pub fn resolving(value: O) -> Self
    where
        O: Send + Sync + 'static,
    {
        Self::new(move |_| {
            let value = value.clone();
            async move { value }
        })
    }

    /// Call through the recorder.
    ///
    /// Scripted resolutions are served without constructing the target
    /// future; otherwise the target runs to completion. Either way the call
    /// is recorded, and a failed outcome resolves unchanged.
    pub async fn call(&self, args: A) -> O {
        let start = Instant::now();
        let scripted = {
            let mut state = self.state.lock();
            let once = state.once_queue.pop_front();
            once.or_else(|| state.fallback.clone())
        };
        let result = match scripted {
            Some(value) => value,
            None => (self.target)(args.clone()).await,
        };
        let duration = start.elapsed();
        self.record_call(args, result.clone(), duration);
        result
    }

    /// Queue a one-shot resolution for the next unclaimed call. Chainable.
    pub fn then_resolves(&self, value: O) -> &Self {
        self.state.lock().once_queue.push_back(value);
        self
    }

    /// Queue several one-shot resolutions at once, in order.
    pub fn resolves_sequence<I>(&self, values: I) -> &Self
    where
        I: IntoIterator<Item = O>,
    {
        self.state.lock().once_queue.extend(values);
        self
    }

    /// Set the persistent fallback resolution.
    ///
    /// Replaces any previous fallback. Queued one-shot resolutions still win
    /// until they run out.
    pub fn resolves(&self, value: O) {
        self.state.lock().fallback = Some(value);
    }

    /// Get all recorded calls, in completion order.
    pub fn calls(&self) -> Vec<CallRecord<A, O>> {
        self.state.lock().records.clone()
    }

    /// Get the number of times the recorder was called.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.state.lock().records.len()
    }

    /// Check if the recorder was called at least once.
    #[must_use]
    pub fn was_called(&self) -> bool {
        self.call_count() > 0
    }

    /// Check if the recorder was called exactly N times.
    #[must_use]
    pub fn was_called_times(&self, n: usize) -> bool {
        self.call_count() == n
    }

    /// Get the Nth call record (0-indexed).
    pub fn nth_call(&self, n: usize) -> Option<CallRecord<A, O>> {
        self.state.lock().records.get(n).cloned()
    }

    /// Get the most recent call record.
    pub fn last_call(&self) -> Option<CallRecord<A, O>> {
        self.state.lock().records.last().cloned()
    }

    /// Check if any call was made with the given arguments.
    pub fn was_called_with(&self, expected: &A) -> bool
    where
        A: PartialEq,
    {
        self.state.lock().records.iter().any(|c| &c.args == expected)
    }

    /// Check if any call's arguments satisfy the given matcher.
    pub fn was_called_matching<M>(&self, matcher: &M) -> bool
    where
        M: Matcher<A> + ?Sized,
    {
        self.state.lock().records.iter().any(|c| matcher.matches(&c.args))
    }

    fn record_call(&self, args: A, result: O, duration: Duration) {
        self.state.lock().records.push(CallRecord {
            args,
            result,
            duration,
            timestamp: self.created_at.elapsed(),
        });
    }
}

// Recorders without a target resolve unclaimed calls to O::default().
impl<A, O> Default for AsyncRecorder<A, O>
where
    A: Clone,
    O: Clone + Default + Send + 'static,
{
    fn default() -> Self {
        Self::new(|_| async { O::default() })
    }
}

// Convenience for no-argument targets
impl<O> AsyncRecorder<(), O>
where
    O: Clone,
{
    /// Call a no-argument recorder.
    pub async fn call_no_args(&self) -> O {
        self.call(()).await
    }
}

// Sugar for fallible resolutions
impl<A, T, E> AsyncRecorder<A, Result<T, E>>
where
    A: Clone,
    T: Clone,
    E: Clone,
{
    /// Set the persistent fallback to `Err(error)`.
    pub fn rejects(&self, error: E) {
        self.resolves(Err(error));
    }

    /// Queue a one-shot `Err(error)` resolution. Chainable.
    pub fn then_rejects(&self, error: E) -> &Self {
        self.then_resolves(Err(error))
    }
}

impl<A: Debug + Clone, O: Debug + Clone> Debug for AsyncRecorder<A, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("AsyncRecorder")
            .field("call_count", &state.records.len())
            .field("calls", &state.records)
            .field("once_queued", &state.once_queue.len())
            .field("has_fallback", &state.fallback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::sync::Arc;

    #[test]
    fn test_async_recorder_basic() {
        block_on(async {
            let double = AsyncRecorder::new(|x: i32| async move { x * 2 });

            assert!(!double.was_called());
            assert_eq!(double.call(5).await, 10);

            assert!(double.was_called());
            assert_eq!(double.call_count(), 1);
            assert_eq!(double.nth_call(0).unwrap().args, 5);
            assert_eq!(double.nth_call(0).unwrap().result, 10);
        });
    }

    #[test]
    fn test_async_scripted_resolutions() {
        block_on(async {
            let rec: AsyncRecorder<(), i32> = AsyncRecorder::default();
            rec.then_resolves(1).then_resolves(2);
            rec.resolves(9);

            assert_eq!(rec.call_no_args().await, 1);
            assert_eq!(rec.call_no_args().await, 2);
            assert_eq!(rec.call_no_args().await, 9);
            assert_eq!(rec.call_no_args().await, 9);
        });
    }

    #[test]
    fn test_async_default_resolution() {
        block_on(async {
            let rec: AsyncRecorder<i32, i32> = AsyncRecorder::default();
            assert_eq!(rec.call(7).await, 0);
            assert!(rec.was_called_with(&7));
        });
    }

    #[test]
    fn test_async_resolving_constructor() {
        block_on(async {
            let rec: AsyncRecorder<u32, String> = AsyncRecorder::resolving("cached".to_string());
            assert_eq!(rec.call(1).await, "cached");
            assert_eq!(rec.call(2).await, "cached");
            assert!(rec.was_called_times(2));
        });
    }

    #[test]
    fn test_async_rejection_resolves_unchanged() {
        block_on(async {
            let fetch: AsyncRecorder<String, Result<Vec<u8>, String>> =
                AsyncRecorder::new(|_| async { Ok(Vec::new()) });
            fetch
                .then_rejects("connection refused".to_string())
                .then_resolves(Ok(vec![1, 2]));

            let err = fetch.call("a".into()).await;
            assert_eq!(err, Err("connection refused".to_string()));
            assert_eq!(fetch.call("b".into()).await, Ok(vec![1, 2]));

            // The rejection is in the history as the value the caller saw.
            assert_eq!(
                fetch.nth_call(0).unwrap().result,
                Err("connection refused".to_string())
            );
        });
    }

    #[test]
    fn test_async_resolves_sequence() {
        block_on(async {
            let rec: AsyncRecorder<(), &str> = AsyncRecorder::resolving("later");
            rec.resolves_sequence(["first", "second"]);

            assert_eq!(rec.call_no_args().await, "first");
            assert_eq!(rec.call_no_args().await, "second");
            assert_eq!(rec.call_no_args().await, "later");
        });
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_async_recorder_concurrent_calls() {
        let rec = Arc::new(AsyncRecorder::new(|x: i32| async move { x + 100 }));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let rec = Arc::clone(&rec);
                tokio::spawn(async move { rec.call(i).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(rec.call_count(), 8);
        for call in rec.calls() {
            assert_eq!(call.result, call.args + 100);
        }
    }

    #[test]
    fn test_async_recorder_debug() {
        block_on(async {
            let rec: AsyncRecorder<(), i32> = AsyncRecorder::default();
            rec.call_no_args().await;

            let debug = format!("{rec:?}");
            assert!(debug.contains("AsyncRecorder"));
            assert!(debug.contains("call_count"));
        });
    }
}
