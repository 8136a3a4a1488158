//! Application services for task lifecycle orchestration.

mod lifecycle;
mod queries;

pub use lifecycle::{
    CreateTaskRequest, TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService,
    UpdateTaskRequest, UpdateTaskStatusRequest,
};
