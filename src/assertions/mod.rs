//! Fluent assertions for async code.
//!
//! This module provides assertion utilities for async testing:
//!
//! - [`assert_ready!`] - Assert a future is immediately ready
//! - [`assert_pending!`] - Assert a future is not ready
//! - [`assert_resolves!`] - Assert a fallible future resolves
//! - [`assert_rejects!`] - Assert a fallible future rejects
//! - [`poll_once`] - Poll a future once and return the result
//! - [`matcher`] - Custom matcher system for flexible assertions
//!
//! # Future Assertions
//!
//! ```rust
//! use understudy::{assert_ready, assert_pending};
//! use std::future::ready;
//!
//! // Assert a future is ready
//! let value = assert_ready!(ready(42));
//! assert_eq!(value, 42);
//!
//! // Assert a future is pending
//! assert_pending!(futures::future::pending::<i32>());
//! ```
//!
//! # Resolution Assertions
//!
//! ```rust,ignore
//! use understudy::{assert_resolves, assert_rejects};
//!
//! async fn lookup(id: u32) -> Result<String, String> {
//!     if id == 0 { Err("no such user".to_string()) } else { Ok("alice".to_string()) }
//! }
//!
//! assert_resolves!(lookup(1), "alice".to_string());
//! assert_rejects!(lookup(0), "no such user".to_string());
//! ```
//!
//! # Custom Matchers
//!
//! ```rust
//! use understudy::{assert_that, assertions::matcher::{eq, gt, all_of}};
//!
//! assert_that!(42, eq(42));
//! assert_that!(50, all_of(vec![gt(0), gt(10)]));
//! ```

mod future;
pub mod matcher;

pub use future::poll_once;
