//! Taskmanager: task-management backend core.
//!
//! This crate provides the task lifecycle and the ownership-scoped query
//! contract behind a task-management API. Routing, credential handling and
//! wire formats belong to the surrounding request layer, which resolves the
//! caller and passes it explicitly into every operation.
//!
//! # Architecture
//!
//! Taskmanager follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`task`]: Task lifecycle, ownership scoping and listings
//! - [`config`]: Layered configuration loading
//! - [`telemetry`]: Structured logging bootstrap

pub mod config;
pub mod task;
pub mod telemetry;
