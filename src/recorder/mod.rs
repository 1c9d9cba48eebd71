//! Call-recording test doubles.
//!
//! This module provides function doubles that remember every invocation:
//!
//! - [`Recorder`] - Wraps a synchronous function, records calls, and serves
//!   scripted outcomes
//! - [`AsyncRecorder`] - The same for async functions
//! - [`CallRecord`] - One recorded invocation (arguments, outcome, timing)
//!
//! Every call through a recorder appends exactly one [`CallRecord`], in call
//! order, whether the outcome came from a scripted value or the wrapped
//! target. Records are never removed; the history a test reads is the history
//! that happened.
//!
//! # Example
//!
//! ```rust
//! use understudy::recorder::Recorder;
//!
//! let double = Recorder::new(|x: i32| x + 1);
//!
//! assert_eq!(double.call(0), 1);
//! assert_eq!(double.call(1), 2);
//!
//! let calls = double.calls();
//! assert_eq!(calls.len(), 2);
//! assert_eq!(calls[0].args, 0);
//! assert_eq!(calls[0].result, 1);
//! ```

mod future;
mod sync;

pub use future::AsyncRecorder;
pub use sync::{CallRecord, Recorder};
