//! # Handler: per-worker dispatch loop.
//!
//! Pumps one worker's message loop:
//! - receives envelopes from the worker's dedicated channel,
//! - dispatches orders to the owned [`Worker`](crate::Worker),
//! - forwards every returned envelope onto the shared channel,
//! - detects loss of the supervising parent through a [`Liveness`] probe,
//! - stops on the terminal sentinel without dispatching it.
//!
//! ## Step flow
//! ```text
//! listen_step(timeout):
//!   ├─► receive one envelope (poll-bounded, or try_recv when timeout=None)
//!   │     ├─ channel disconnected ───────────► Stopped(Disconnected)
//!   │     └─ empty / received
//!   ├─► probe.is_alive()? ── no ─────────────► Stopped(ParentLost)
//!   ├─► nothing received ────────────────────► Idle
//!   ├─► sentinel ────────────────────────────► Stopped(ShutdownOrder)
//!   ├─► receiver == own address? ── no ──────► MisdeliveredEnvelope
//!   ├─► dispatch: Init → init(), Close → close(), Call(c) → on_command(c)
//!   │            control reply at a worker ──► UnexpectedOrder
//!   └─► forward returned envelopes ──────────► Dispatched
//! ```
//!
//! ## Rules
//! - The loop is single-threaded; a slow worker hook only delays this
//!   worker's next receive.
//! - A fatal dispatch error stops the loop; [`Handler::listen`] posts a
//!   best-effort fault envelope to the supervisor before propagating it.
//! - The sentinel is idempotent: delivered to an already-stopped loop it is
//!   simply never dispatched.
//!
//! Embeddings that own their scheduling loop (an interactive main loop, an
//! external process) construct a `Handler` directly and pump
//! [`listen_step`](Handler::listen_step) themselves — `None` polls without
//! waiting, which suits a frame timer.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time;

use crate::core::probe::Liveness;
use crate::error::HandlerError;
use crate::mail::{Address, Command, Envelope, Mailbox, Order};
use crate::workers::WorkerRef;

/// Outcome of one [`Handler::listen_step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// One envelope was decoded, dispatched, and its replies forwarded.
    Dispatched,
    /// Nothing was available within the poll window.
    Idle,
    /// The loop stopped; no further dispatch will happen.
    Stopped(StopReason),
}

/// Why a dispatch loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The terminal sentinel arrived.
    ShutdownOrder,
    /// The liveness probe reported the supervising parent gone.
    ParentLost,
    /// The dedicated channel closed (supervisor side dropped).
    Disconnected,
}

impl StopReason {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            StopReason::ShutdownOrder => "shutdown_order",
            StopReason::ParentLost => "parent_lost",
            StopReason::Disconnected => "disconnected",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Dispatch loop owning one worker.
pub struct Handler<C: Command> {
    worker: WorkerRef<C>,
    inbound: mpsc::Receiver<Envelope<C>>,
    mailbox: Mailbox<C>,
    probe: Arc<dyn Liveness>,
    poll_timeout: Duration,
    running: bool,
}

impl<C: Command> Handler<C> {
    /// Creates a handler for `worker`.
    ///
    /// `inbound` is the worker's dedicated channel (supervisor writes);
    /// `outbound` is the shared channel (supervisor reads). The probe is
    /// consulted on every poll.
    pub fn new(
        worker: WorkerRef<C>,
        inbound: mpsc::Receiver<Envelope<C>>,
        outbound: mpsc::Sender<Envelope<C>>,
        probe: Arc<dyn Liveness>,
        poll_timeout: Duration,
    ) -> Self {
        let mailbox = Mailbox::new(worker.address().clone(), outbound);
        Self {
            worker,
            inbound,
            mailbox,
            probe,
            poll_timeout,
            running: false,
        }
    }

    /// Returns the owned worker's address.
    pub fn address(&self) -> &Address {
        self.worker.address()
    }

    /// Returns true between a successful init and a successful close of the
    /// owned worker.
    pub fn is_ready(&self) -> bool {
        self.worker.lifecycle().is_ready()
    }

    /// Returns true while the continuous loop is running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Returns a clone of the worker's sending handle.
    pub fn mailbox(&self) -> Mailbox<C> {
        self.mailbox.clone()
    }

    /// Runs one step of the loop.
    ///
    /// `Some(window)` waits up to `window` for an envelope; `None` polls
    /// without waiting (for externally pumped loops).
    pub async fn listen_step(&mut self, timeout: Option<Duration>) -> Result<Step, HandlerError> {
        let received = match timeout {
            Some(window) => match time::timeout(window, self.inbound.recv()).await {
                Ok(Some(envelope)) => Some(envelope),
                Ok(None) => return Ok(self.stop(StopReason::Disconnected)),
                Err(_elapsed) => None,
            },
            None => match self.inbound.try_recv() {
                Ok(envelope) => Some(envelope),
                Err(mpsc::error::TryRecvError::Empty) => None,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    return Ok(self.stop(StopReason::Disconnected));
                }
            },
        };

        // Checked whether or not an envelope arrived: a dying parent stops
        // the loop even with an envelope in hand.
        if !self.probe.is_alive() {
            return Ok(self.stop(StopReason::ParentLost));
        }

        let Some(envelope) = received else {
            return Ok(Step::Idle);
        };

        if envelope.order.is_shutdown() {
            return Ok(self.stop(StopReason::ShutdownOrder));
        }

        self.dispatch(envelope).await?;
        Ok(Step::Dispatched)
    }

    /// Runs the loop until it stops, returning the stop reason.
    ///
    /// A fatal dispatch error is posted to the supervisor as a fault
    /// envelope (best effort) before it propagates.
    pub async fn listen(&mut self) -> Result<StopReason, HandlerError> {
        self.running = true;
        loop {
            match self.listen_step(Some(self.poll_timeout)).await {
                Ok(Step::Stopped(reason)) => {
                    log::debug!("worker {} loop stopped: {reason}", self.worker.address());
                    return Ok(reason);
                }
                Ok(_) => {}
                Err(err) => {
                    self.running = false;
                    self.report_fault(&err).await;
                    return Err(err);
                }
            }
        }
    }

    /// Decodes and dispatches one envelope, forwarding the replies.
    async fn dispatch(&mut self, envelope: Envelope<C>) -> Result<(), HandlerError> {
        if envelope.receiver != *self.worker.address() {
            return Err(HandlerError::MisdeliveredEnvelope {
                intended: envelope.receiver,
                actual: self.worker.address().clone(),
            });
        }

        let kind = envelope.order.kind();
        log::debug!(
            "worker {} dispatching {kind} from {}",
            self.worker.address(),
            envelope.sender
        );

        let replies = match envelope.order {
            Order::Init => self.worker.init().await?,
            Order::Close => self.worker.close().await?,
            Order::Call(command) => self.worker.on_command(command, &self.mailbox).await?,
            Order::FinishedInit
            | Order::FinishedClose
            | Order::RequestShutdown
            | Order::Fault { .. }
            | Order::Shutdown => {
                return Err(HandlerError::UnexpectedOrder { kind });
            }
        };

        for reply in replies {
            self.mailbox.forward(reply).await?;
        }
        Ok(())
    }

    fn stop(&mut self, reason: StopReason) -> Step {
        self.running = false;
        Step::Stopped(reason)
    }

    /// Posts a fault envelope to the supervisor, best effort.
    async fn report_fault(&mut self, err: &HandlerError) {
        let address = self.worker.address();
        log::error!("worker {address} loop died: {err}");
        let fault = Envelope::new(
            address.clone(),
            Address::supervisor(),
            Order::Fault {
                reason: err.to_string(),
            },
        );
        if self.mailbox.forward(fault).await.is_err() {
            log::warn!("worker {address} could not report its fault: channel closed");
        }
    }
}
