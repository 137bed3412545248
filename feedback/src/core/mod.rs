//! Deterministic, pure logic for feedback forms.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! values and return deterministic outputs suitable for tests.

pub mod email;
pub mod lifecycle;
pub mod types;
pub mod validator;
