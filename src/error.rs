//! Error types used by the workvisor runtime and workers.
//!
//! This module defines three error enums, one per failure domain:
//!
//! - [`WorkerError`] — errors raised by a worker's own operations
//!   (lifecycle violations, unsupported commands, domain failures).
//! - [`HandlerError`] — errors raised by a worker's dispatch loop.
//! - [`RuntimeError`] — errors raised by the supervisor itself
//!   (routing and registration).
//!
//! All types provide `as_label` for logging/metrics. Worker and handler
//! errors are fatal for the affected worker's loop; the loop surfaces them
//! to the supervisor as a fault envelope before they propagate. Runtime
//! errors end the whole fleet run.

use thiserror::Error;

use crate::mail::Address;

/// # Errors produced by a worker's own operations.
///
/// Lifecycle violations keep the worker's state unchanged; an unsupported
/// command means the order named an operation outside this worker's
/// command set.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum WorkerError {
    /// `init` was called on a worker that already initialized.
    #[error("cannot initialize worker twice")]
    AlreadyInitialized,

    /// `close` was called before a successful `init`, or after a close.
    #[error("cannot close worker before initialization")]
    NotInitialized,

    /// The dispatched command is not part of this worker's command set.
    #[error("unknown command for this worker: {command}")]
    UnknownCommand {
        /// Short name of the rejected command.
        command: String,
    },

    /// A domain operation failed.
    #[error("worker operation failed: {error}")]
    Failed {
        /// The underlying error message.
        error: String,
    },
}

impl WorkerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use workvisor::WorkerError;
    ///
    /// assert_eq!(WorkerError::AlreadyInitialized.as_label(), "worker_already_initialized");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            WorkerError::AlreadyInitialized => "worker_already_initialized",
            WorkerError::NotInitialized => "worker_not_initialized",
            WorkerError::UnknownCommand { .. } => "worker_unknown_command",
            WorkerError::Failed { .. } => "worker_failed",
        }
    }
}

/// # Errors produced by a worker's dispatch loop.
///
/// Any of these stops the loop. The loop posts a best-effort fault envelope
/// to the supervisor before returning the error, so the failure is observed
/// immediately rather than at join timeout.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum HandlerError {
    /// The dispatched operation failed inside the worker.
    #[error("worker failed: {0}")]
    Worker(#[from] WorkerError),

    /// An envelope intended for another address reached this loop.
    #[error("envelope for {intended} delivered to {actual}")]
    MisdeliveredEnvelope {
        /// Receiver named by the envelope.
        intended: Address,
        /// Address of the worker that received it.
        actual: Address,
    },

    /// A control reply (for the supervisor) was dispatched at a worker.
    #[error("unexpected control order: {kind}")]
    UnexpectedOrder {
        /// Stable label of the offending order.
        kind: &'static str,
    },

    /// The shared channel to the supervisor is gone.
    #[error("channel closed: receiver side dropped")]
    ChannelClosed,
}

impl HandlerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            HandlerError::Worker(e) => e.as_label(),
            HandlerError::MisdeliveredEnvelope { .. } => "handler_misdelivered_envelope",
            HandlerError::UnexpectedOrder { .. } => "handler_unexpected_order",
            HandlerError::ChannelClosed => "handler_channel_closed",
        }
    }
}

/// # Errors produced by the supervisor.
///
/// Routing to an unknown receiver is fatal for the whole fleet run; the
/// registration variants are reported before any worker is spawned.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// An envelope named a receiver absent from the worker table.
    #[error("no worker registered at address {address}")]
    UnknownReceiver {
        /// The unroutable address.
        address: Address,
    },

    /// Two registered workers share an address.
    #[error("address {address} is already taken")]
    DuplicateAddress {
        /// The contested address.
        address: Address,
    },

    /// A worker tried to register under the supervisor's own address.
    #[error("address {address} is reserved for the supervisor")]
    ReservedAddress {
        /// The reserved address.
        address: Address,
    },

    /// A worker's dedicated channel closed before it could be initialized.
    #[error("worker {address} dropped its channel before initialization")]
    WorkerUnavailable {
        /// Address of the unreachable worker.
        address: Address,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use workvisor::{Address, RuntimeError};
    ///
    /// let err = RuntimeError::UnknownReceiver { address: Address::new("nowhere") };
    /// assert_eq!(err.as_label(), "runtime_unknown_receiver");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::UnknownReceiver { .. } => "runtime_unknown_receiver",
            RuntimeError::DuplicateAddress { .. } => "runtime_duplicate_address",
            RuntimeError::ReservedAddress { .. } => "runtime_reserved_address",
            RuntimeError::WorkerUnavailable { .. } => "runtime_worker_unavailable",
        }
    }
}
