//! In-memory storage backend for callscope.
//!
//! Implements the `callscope-store` traits with tables behind a single
//! mutex, so create-if-absent checks are atomic with their inserts.
//! Thread-safe for use with tokio's multi-threaded runtime.

pub mod store;

pub use store::MemoryStore;
