//! # Worker abstractions.
//!
//! This module provides the worker-side types:
//! - [`Worker`] — trait for implementing stateful, command-driven units
//! - [`WorkerRef`] — boxed worker handle (`Box<dyn Worker<Command = C>>`)
//! - [`Lifecycle`] — the init/close state embedded in every worker

mod lifecycle;
mod worker;

pub use lifecycle::Lifecycle;
pub use worker::{Worker, WorkerRef};
