//! Task lifecycle management.
//!
//! This module creates, edits, archives, soft-deletes, restores and purges
//! tasks, and lists them through a single parameterized query. An injected
//! ownership policy decides whether every operation is scoped to the calling
//! user (multi-tenant) or sees all tasks (single-tenant). The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
