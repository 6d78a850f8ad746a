//! # Worker abstraction.
//!
//! This module defines the [`Worker`] trait: a stateful unit with an
//! [`Address`], an embedded [`Lifecycle`], and a set of supported commands.
//! Concrete workers override the `on_*` hooks; the provided [`Worker::init`]
//! and [`Worker::close`] operations enforce the lifecycle state machine and
//! emit exactly one reply each.
//!
//! A worker is owned by its dispatch loop and never shared; anything it
//! spawns privately reports back through a cloned [`Mailbox`], never by
//! sharing state with the loop.
//!
//! # Example
//! ```
//! use async_trait::async_trait;
//! use workvisor::{Address, Envelope, Lifecycle, Mailbox, Order, Worker, WorkerError};
//!
//! #[derive(Debug, PartialEq)]
//! enum EchoCommand {
//!     Say(String),
//! }
//!
//! struct EchoWorker {
//!     address: Address,
//!     lifecycle: Lifecycle,
//! }
//!
//! #[async_trait]
//! impl Worker for EchoWorker {
//!     type Command = EchoCommand;
//!
//!     fn address(&self) -> &Address {
//!         &self.address
//!     }
//!     fn lifecycle(&self) -> &Lifecycle {
//!         &self.lifecycle
//!     }
//!     fn lifecycle_mut(&mut self) -> &mut Lifecycle {
//!         &mut self.lifecycle
//!     }
//!
//!     async fn on_command(
//!         &mut self,
//!         command: EchoCommand,
//!         _mailbox: &Mailbox<EchoCommand>,
//!     ) -> Result<Vec<Envelope<EchoCommand>>, WorkerError> {
//!         match command {
//!             EchoCommand::Say(text) => Ok(vec![Envelope::new(
//!                 self.address.clone(),
//!                 Address::supervisor(),
//!                 Order::Call(EchoCommand::Say(text)),
//!             )]),
//!         }
//!     }
//! }
//! ```

use async_trait::async_trait;

use super::lifecycle::Lifecycle;
use crate::error::WorkerError;
use crate::mail::{Address, Command, Envelope, Mailbox, Order};

/// Boxed worker handle, as stored by the supervisor and its dispatch loops.
pub type WorkerRef<C> = Box<dyn Worker<Command = C>>;

/// # A stateful unit with an init/close lifecycle and a command set.
///
/// Implementors provide the address and lifecycle accessors plus the
/// `on_*` hooks. The provided [`init`](Worker::init) and
/// [`close`](Worker::close) operations wrap the hooks with the lifecycle
/// checks and the single-reply contract; dispatch loops call those, never
/// the hooks directly.
///
/// ### Rules
/// - `init` on a non-fresh worker fails with
///   [`WorkerError::AlreadyInitialized`]; `close` outside the ready window
///   fails with [`WorkerError::NotInitialized`].
/// - A failed hook leaves the lifecycle state unchanged.
/// - `on_command` returns the ordered sequence of outbound envelopes; a
///   command the worker does not support must fail with
///   [`WorkerError::UnknownCommand`], never silently no-op.
#[async_trait]
pub trait Worker: Send + 'static {
    /// The fleet's command set this worker dispatches from.
    type Command: Command;

    /// Returns this worker's stable address.
    fn address(&self) -> &Address;

    /// Returns the lifecycle state.
    fn lifecycle(&self) -> &Lifecycle;

    /// Returns the lifecycle state for updates.
    fn lifecycle_mut(&mut self) -> &mut Lifecycle;

    /// Domain setup run inside [`init`](Worker::init). Defaults to a no-op.
    async fn on_init(&mut self) -> Result<(), WorkerError> {
        Ok(())
    }

    /// Domain teardown run inside [`close`](Worker::close). Defaults to a no-op.
    async fn on_close(&mut self) -> Result<(), WorkerError> {
        Ok(())
    }

    /// Dispatches one command.
    ///
    /// `mailbox` allows mid-call sends (and clones moved into privately
    /// spawned work); ordered replies should be returned instead.
    async fn on_command(
        &mut self,
        command: Self::Command,
        mailbox: &Mailbox<Self::Command>,
    ) -> Result<Vec<Envelope<Self::Command>>, WorkerError>;

    /// Initializes the worker.
    ///
    /// On success the worker becomes ready and exactly one
    /// [`Order::FinishedInit`] reply to the supervisor is returned.
    async fn init(&mut self) -> Result<Vec<Envelope<Self::Command>>, WorkerError> {
        self.lifecycle().ensure_uninitialized()?;
        self.on_init().await?;
        self.lifecycle_mut().mark_ready();
        log::info!("worker {} initialized", self.address());
        Ok(vec![Envelope::new(
            self.address().clone(),
            Address::supervisor(),
            Order::FinishedInit,
        )])
    }

    /// Closes the worker.
    ///
    /// On success the worker becomes inert and exactly one
    /// [`Order::FinishedClose`] reply to the supervisor is returned.
    async fn close(&mut self) -> Result<Vec<Envelope<Self::Command>>, WorkerError> {
        self.lifecycle().ensure_ready()?;
        self.on_close().await?;
        self.lifecycle_mut().mark_closed();
        log::info!("worker {} closed", self.address());
        Ok(vec![Envelope::new(
            self.address().clone(),
            Address::supervisor(),
            Order::FinishedClose,
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain {
        address: Address,
        lifecycle: Lifecycle,
        fail_init: bool,
    }

    impl Plain {
        fn new(fail_init: bool) -> Self {
            Self {
                address: Address::new("plain"),
                lifecycle: Lifecycle::new(),
                fail_init,
            }
        }
    }

    #[async_trait]
    impl Worker for Plain {
        type Command = ();

        fn address(&self) -> &Address {
            &self.address
        }
        fn lifecycle(&self) -> &Lifecycle {
            &self.lifecycle
        }
        fn lifecycle_mut(&mut self) -> &mut Lifecycle {
            &mut self.lifecycle
        }

        async fn on_init(&mut self) -> Result<(), WorkerError> {
            if self.fail_init {
                return Err(WorkerError::Failed {
                    error: "setup exploded".into(),
                });
            }
            Ok(())
        }

        async fn on_command(
            &mut self,
            _command: (),
            _mailbox: &Mailbox<()>,
        ) -> Result<Vec<Envelope<()>>, WorkerError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn init_emits_exactly_one_reply() {
        let mut worker = Plain::new(false);
        let out = worker.init().await.unwrap();
        assert_eq!(
            out,
            vec![Envelope::new(
                Address::new("plain"),
                Address::supervisor(),
                Order::FinishedInit,
            )]
        );
        assert!(worker.lifecycle().is_ready());
    }

    #[tokio::test]
    async fn second_init_fails() {
        let mut worker = Plain::new(false);
        worker.init().await.unwrap();
        let err = worker.init().await.unwrap_err();
        assert_eq!(err.as_label(), "worker_already_initialized");
    }

    #[tokio::test]
    async fn close_before_init_fails() {
        let mut worker = Plain::new(false);
        let err = worker.close().await.unwrap_err();
        assert_eq!(err.as_label(), "worker_not_initialized");
    }

    #[tokio::test]
    async fn close_emits_exactly_one_reply() {
        let mut worker = Plain::new(false);
        worker.init().await.unwrap();
        let out = worker.close().await.unwrap();
        assert_eq!(
            out,
            vec![Envelope::new(
                Address::new("plain"),
                Address::supervisor(),
                Order::FinishedClose,
            )]
        );
        assert!(!worker.lifecycle().is_ready());
    }

    #[tokio::test]
    async fn close_after_close_fails() {
        let mut worker = Plain::new(false);
        worker.init().await.unwrap();
        worker.close().await.unwrap();
        let err = worker.close().await.unwrap_err();
        assert_eq!(err.as_label(), "worker_not_initialized");
    }

    #[tokio::test]
    async fn failed_init_hook_leaves_state_unchanged() {
        let mut worker = Plain::new(true);
        let err = worker.init().await.unwrap_err();
        assert_eq!(err.as_label(), "worker_failed");
        assert!(!worker.lifecycle().is_initialized());

        // The worker never became ready, so close is still rejected.
        let err = worker.close().await.unwrap_err();
        assert_eq!(err.as_label(), "worker_not_initialized");
    }
}
