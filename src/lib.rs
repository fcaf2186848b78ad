//! Distributed Arithmetic Evaluation Library
//!
//! This library crate defines the components of a distributed calculator:
//! an orchestrator that compiles infix expressions into dependency graphs
//! of elementary operations, and worker agents that evaluate those
//! operations one at a time over HTTP.
//!
//! ## Architecture Modules
//!
//! - **`compiler`**: The infix-to-task-graph pipeline. Tokenizes the input,
//!   converts it to reverse Polish notation (shunting-yard), and emits one
//!   task per operator with dependency edges between them.
//! - **`scheduler`**: The orchestrator core. An in-memory expression store
//!   behind a single reader-writer lock, dependency-aware task dispatch,
//!   result roll-up, and the axum HTTP surface (public expression API plus
//!   internal worker endpoints).
//! - **`auth`**: Shared-secret middleware protecting the worker-facing
//!   endpoints.
//! - **`worker`**: The agent side: polls for runnable tasks, performs the
//!   arithmetic (simulating the configured per-operation cost), and reports
//!   results or errors back.
//! - **`config`**: Environment-driven settings, injected at construction.

pub mod auth;
pub mod compiler;
pub mod config;
pub mod scheduler;
pub mod worker;
