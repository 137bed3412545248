//! Feedback collection: validation, submission lifecycle, and listing.
//!
//! The crate keeps the same split as a classic ports-and-adapters layout:
//!
//! - **[`core`]**: Pure, deterministic logic (field validation, email syntax,
//!   the form state machine). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (configuration files, the record
//!   store and its backends). Isolated behind [`io::store::FeedbackStore`] so
//!   tests can substitute in-memory fakes.
//!
//! Orchestration modules ([`form`], [`listing`]) coordinate core logic with
//! the store to implement the two user-facing screens.

pub mod core;
pub mod exit_codes;
pub mod form;
pub mod io;
pub mod listing;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
