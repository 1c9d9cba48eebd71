//! # understudy 🎭
//!
//! > Call-recording test doubles for async Rust
//!
//! **understudy** provides function doubles that record every call, scripted
//! outcomes, completion signals for callback-style code, and assertions for
//! futures.
//!
//! ## Quick Start
//!
//! ```rust
//! use understudy::recorder::Recorder;
//!
//! // Wrap a function; every call through the double is recorded
//! let double = Recorder::new(|x: i32| x + 1);
//!
//! double.call(0);
//! double.call(1);
//!
//! let calls = double.calls();
//! assert_eq!(calls.len(), 2);
//! assert_eq!(calls[0].args, 0);
//! assert_eq!(calls[0].result, 1);
//! assert_eq!(calls[1].result, 2);
//! ```
//!
//! ## Features
//!
//! - 🎬 **Recorders** - Wrap sync or async functions, inspect every call
//! - 📜 **Scripted outcomes** - Queue one-shot values, set fallbacks, reject on demand
//! - 🏁 **Completion signals** - Await callbacks without hanging forever
//! - 🔍 **Async Assertions** - Poll, resolve, and reject checks plus matchers
//! - 🧪 **Test macro** - `#[understudy::test]` with runtime selection and deadlines
//!
//! ## Doubling a collaborator
//!
//! There is no runtime patching: a double stands in for a collaborator
//! because the collaborator is injected. Put the seam behind a trait, hand
//! the real implementation to production code, and hand a recorder-backed
//! type to tests. Overriding part of a collaborator is a type that holds a
//! recorder for the overridden member and delegates the rest to the real
//! implementation:
//!
//! ```rust,ignore
//! struct PatchedDirectory {
//!     lookup: AsyncRecorder<String, Result<Vec<String>, String>>,
//!     rest: LiveDirectory,
//! }
//!
//! #[async_trait]
//! impl Directory for PatchedDirectory {
//!     async fn lookup(&self, path: &str) -> Result<Vec<String>, String> {
//!         self.lookup.call(path.to_string()).await
//!     }
//!
//!     fn label(&self) -> String {
//!         self.rest.label()
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod assertions;
pub mod completion;
pub mod error;
pub mod recorder;

/// Prelude for convenient imports
///
/// ```rust
/// use understudy::prelude::*;
/// ```
pub mod prelude {
    pub use crate::assertions::matcher::Matcher;
    pub use crate::completion::{channel, Done, DoneWaiter};
    pub use crate::error::{Error, Result};
    pub use crate::recorder::{AsyncRecorder, CallRecord, Recorder};
}

// Re-exports
pub use error::{Error, Result};

// Re-export the test macro when macros feature is enabled
#[cfg(feature = "macros")]
pub use understudy_macros::test;
