//! In-memory adapter implementations for tests and embedded use.
//!
//! These adapters provide simple, thread-safe implementations that need no
//! database.

mod task;

pub use task::InMemoryTaskRepository;
