// Allow must_use_candidate since recorder methods often have useful side effects
#![allow(clippy::must_use_candidate)]

//! Call recording for synchronous functions.
//!
//! This module provides [`Recorder`] for wrapping functions, recording every
//! invocation, and scripting outcomes ahead of time.
//!
//! # Example
//!
//! ```rust
//! use understudy::recorder::Recorder;
//!
//! // Wrap a real function
//! let double = Recorder::new(|x: i32| x * 2);
//!
//! // Call through the recorder
//! let result = double.call(5);
//! assert_eq!(result, 10);
//!
//! // Verify the call
//! assert!(double.was_called());
//! assert_eq!(double.call_count(), 1);
//! ```

use std::collections::VecDeque;
use std::fmt::Debug;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::assertions::matcher::Matcher;

/// A record of a single call through a recorder.
#[derive(Debug, Clone)]
pub struct CallRecord<A, R> {
    /// The arguments passed to the call.
    pub args: A,
    /// The outcome the call produced. For fallible targets this is the
    /// `Result` itself; an `Err` here means the call failed and the same
    /// error value was handed back to the caller.
    pub result: R,
    /// Duration of the call.
    pub duration: Duration,
    /// When the call was made (relative to recorder creation).
    pub timestamp: Duration,
}

type Target<A, R> = Box<dyn Fn(A) -> R + Send + Sync>;

struct RecorderState<A, R> {
    records: Vec<CallRecord<A, R>>,
    once_queue: VecDeque<R>,
    fallback: Option<R>,
}

/// A test double that wraps a function and records every call.
///
/// Each call resolves its outcome in a fixed order: a queued one-shot value
/// (FIFO, consumed by the call that uses it), then the persistent fallback
/// set by [`returns`](Recorder::returns), then the wrapped target. Whatever
/// the source, exactly one [`CallRecord`] is appended.
///
/// A `Recorder` is `Send + Sync`; share one between threads with
/// `Arc<Recorder<..>>`.
///
/// # Type Parameters
///
/// - `A` - The argument type (must be Clone for recording)
/// - `R` - The outcome type (must be Clone for recording)
pub struct Recorder<A, R> {
    target: Target<A, R>,
    state: Mutex<RecorderState<A, R>>,
    created_at: Instant,
}

impl<A, R> Recorder<A, R>
where
    A: Clone,
    R: Clone,
{
    /// Create a recorder wrapping the given target function.
    ///
    /// # Example
    ///
    /// ```rust
    /// use understudy::recorder::Recorder;
    ///
    /// let double: Recorder<i32, i32> = Recorder::new(|x| x + 1);
    /// assert_eq!(double.call(2), 3);
    /// ```
    pub fn new<F>(target: F) -> Self
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        Self {
            target: Box::new(target),
            state: Mutex::new(RecorderState {
                records: Vec::new(),
                once_queue: VecDeque::new(),
                fallback: None,
            }),
            created_at: Instant::now(),
        }
    }

    /// Create a recorder whose target always produces `value`.
    ///
    /// Shorthand for `Recorder::new(move |_| value.clone())`.
    pub fn returning(value: R) -> Self
    where
        R: Send + Sync + 'static,
    {
        Self::new(move |_| value.clone())
    }

    /// Call through the recorder.
    ///
    /// The outcome comes from the first of: a queued one-shot value, the
    /// persistent fallback, the target function. The call is recorded either
    /// way, and a failed outcome is returned unchanged.
    pub fn call(&self, args: A) -> R {
        let start = Instant::now();
        let scripted = {
            let mut state = self.state.lock();
            let once = state.once_queue.pop_front();
            once.or_else(|| state.fallback.clone())
        };
        let result = match scripted {
            Some(value) => value,
            None => (self.target)(args.clone()),
        };
        let duration = start.elapsed();
        self.record_call(args, result.clone(), duration);
        result
    }

    /// Queue a one-shot outcome for the next unclaimed call.
    ///
    /// Queued outcomes are served in the order they were queued, each
    /// consumed by exactly one call, before the fallback or target is
    /// consulted. Chainable.
    ///
    /// # Example
    ///
    /// ```rust
    /// use understudy::recorder::Recorder;
    ///
    /// let flaky: Recorder<(), &str> = Recorder::returning("ok");
    /// flaky.then_returns("first").then_returns("second");
    ///
    /// assert_eq!(flaky.call(()), "first");
    /// assert_eq!(flaky.call(()), "second");
    /// assert_eq!(flaky.call(()), "ok");
    /// ```
    pub fn then_returns(&self, value: R) -> &Self {
        self.state.lock().once_queue.push_back(value);
        self
    }

    /// Queue several one-shot outcomes at once, in order.
    pub fn returns_sequence<I>(&self, values: I) -> &Self
    where
        I: IntoIterator<Item = R>,
    {
        self.state.lock().once_queue.extend(values);
        self
    }

    /// Set the persistent fallback outcome.
    ///
    /// Replaces any previous fallback. Queued one-shot outcomes still win
    /// until they run out.
    pub fn returns(&self, value: R) {
        self.state.lock().fallback = Some(value);
    }

    /// Get all recorded calls, in call order.
    ///
    /// This is a snapshot: reading it does not change the history, and two
    /// reads with no calls in between see the same records.
    pub fn calls(&self) -> Vec<CallRecord<A, R>> {
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
    pub fn nth_call(&self, n: usize) -> Option<CallRecord<A, R>> {
        self.state.lock().records.get(n).cloned()
    }

    /// Get the most recent call record.
    pub fn last_call(&self) -> Option<CallRecord<A, R>> {
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

    /// Record a call with the given arguments and outcome.
    fn record_call(&self, args: A, result: R, duration: Duration) {
        self.state.lock().records.push(CallRecord {
            args,
            result,
            duration,
            timestamp: self.created_at.elapsed(),
        });
    }
}

// Recorders without a target produce R::default() for unclaimed calls.
impl<A, R> Default for Recorder<A, R>
where
    A: Clone,
    R: Clone + Default,
{
    fn default() -> Self {
        Self::new(|_| R::default())
    }
}

// Convenience for no-argument targets
impl<R> Recorder<(), R>
where
    R: Clone,
{
    /// Call a no-argument recorder.
    pub fn call_no_args(&self) -> R {
        self.call(())
    }
}

// Sugar for fallible outcomes
impl<A, T, E> Recorder<A, Result<T, E>>
where
    A: Clone,
    T: Clone,
    E: Clone,
{
    /// Set the persistent fallback to `Ok(value)`.
    pub fn succeeds(&self, value: T) {
        self.returns(Ok(value));
    }

    /// Set the persistent fallback to `Err(error)`.
    pub fn fails(&self, error: E) {
        self.returns(Err(error));
    }

    /// Queue a one-shot `Ok(value)` outcome. Chainable.
    pub fn then_succeeds(&self, value: T) -> &Self {
        self.then_returns(Ok(value))
    }

    /// Queue a one-shot `Err(error)` outcome. Chainable.
    pub fn then_fails(&self, error: E) -> &Self {
        self.then_returns(Err(error))
    }
}

impl<A: Debug + Clone, R: Debug + Clone> Debug for Recorder<A, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Recorder")
            .field("call_count", &state.records.len())
            .field("calls", &state.records)
            .field("once_queued", &state.once_queue.len())
            .field("has_fallback", &state.fallback.is_some())
            .finish()
    }
}
