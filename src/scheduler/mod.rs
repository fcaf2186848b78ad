//! Expression scheduling and the orchestrator's HTTP surface.
//!
//! The scheduler owns all shared mutable state of the process: a map of
//! submitted expressions, each carrying its compiled task list. Workers
//! pull runnable tasks and push results back over HTTP.
//!
//! ## Lifecycle
//! 1. **Submission**: an expression is compiled and stored `pending`.
//! 2. **Dispatch**: a worker polls; the first `pending` task whose
//!    dependencies are all `completed` flips to `processing` and is handed
//!    out with its arguments resolved to concrete numbers.
//! 3. **Completion**: the worker reports a result (task `completed`, and
//!    once all are, the expression completes with the root task's value) or
//!    an error (the whole expression fails).
//! 4. **Delivery**: reading a completed expression by id returns the value
//!    once and evicts it.
//!
//! ## Submodules
//! - **`types`**: expression/task domain model.
//! - **`manager`**: the store and its state transitions, behind one
//!   reader-writer lock.
//! - **`protocol`**: JSON wire types and endpoint paths.
//! - **`handlers`**: axum handlers and router assembly.

pub mod handlers;
pub mod manager;
pub mod protocol;
pub mod types;
