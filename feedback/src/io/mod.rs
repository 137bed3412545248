//! I/O helpers: configuration and the record store backends.

pub mod config;
pub mod file_store;
pub mod memory_store;
pub mod rest_store;
pub mod store;
