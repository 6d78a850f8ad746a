//! # Supervisor: fleet spawn, init sequencing, relay, shutdown.
//!
//! The [`Supervisor`] owns the full fleet lifecycle: it spawns one dispatch
//! loop per registered worker, sequences initialization, relays inter-worker
//! envelopes through the single shared channel, reacts to control orders,
//! and drives an orderly shutdown with a bounded join grace.
//!
//! ## High-level architecture
//! ```text
//! Inputs to run():
//!   registered workers + kickoff table ──► Supervisor::run()
//!
//! Spawn:
//!   per worker — dedicated channel, child token probe, spawned Handler loop
//!   running count = worker count; a drop guard cancels every probe if the
//!   supervising future is ever dropped
//!
//! Relay (single shared channel, FIFO per sender):
//!   worker ──Envelope──► shared channel ──► Supervisor
//!        receiver == supervisor:
//!          FinishedInit     → log + fire the worker's kickoff order (once)
//!          FinishedClose    → sentinel to that worker, running count −1
//!          RequestShutdown  → broadcast Close to every worker (latched)
//!          Fault{reason}    → log error, running count −1
//!        receiver == worker  → forward verbatim onto its dedicated channel
//!        receiver unknown    → fatal RuntimeError::UnknownReceiver
//!
//! Shutdown path:
//!   running count == 0 → relay loop exits
//!   wait_workers(): cancel probes → per worker: drop dedicated sender,
//!   join within Config::join_grace, abort and re-join stragglers
//! ```
//!
//! ## Rules
//! - Envelopes on one dedicated channel are dispatched FIFO; no ordering
//!   holds across workers beyond arrival at the shared channel.
//! - The kickoff table is fixed at build time and fires at most once per
//!   worker.
//! - No restart policy: a faulted worker is counted out and the run ends
//!   when the remaining workers drain.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::core::builder::SupervisorBuilder;
use crate::core::config::Config;
use crate::core::handler::{Handler, StopReason};
use crate::core::probe::TokenProbe;
use crate::error::{HandlerError, RuntimeError};
use crate::mail::{Address, Command, Envelope, Order};
use crate::workers::WorkerRef;

/// Handle to one spawned worker loop.
struct WorkerEntry<C: Command> {
    /// Dedicated channel: only the supervisor writes, only that loop reads.
    tx: mpsc::Sender<Envelope<C>>,
    /// Join handle of the loop's task.
    join: JoinHandle<Result<StopReason, HandlerError>>,
}

/// Live state of a running fleet.
struct Fleet<C: Command> {
    /// Registration order, for deterministic init and broadcast sequences.
    roster: Vec<Address>,
    entries: HashMap<Address, WorkerEntry<C>>,
    /// Shared channel: every worker writes, only the supervisor reads.
    inbound: mpsc::Receiver<Envelope<C>>,
    /// Workers still counted towards shutdown completion.
    running: usize,
    /// Latched once a close broadcast went out.
    closing: bool,
    token: CancellationToken,
    /// Cancels every probe if the supervising future is dropped.
    _guard: DropGuard,
}

/// Coordinates worker loops, envelope relay, and graceful shutdown.
pub struct Supervisor<C: Command> {
    cfg: Config,
    workers: Vec<WorkerRef<C>>,
    kickoffs: HashMap<Address, C>,
}

impl<C: Command> Supervisor<C> {
    /// Starts building a supervisor with the given configuration.
    pub fn builder(cfg: Config) -> SupervisorBuilder<C> {
        SupervisorBuilder::new(cfg)
    }

    pub(crate) fn new(
        cfg: Config,
        workers: Vec<WorkerRef<C>>,
        kickoffs: HashMap<Address, C>,
    ) -> Self {
        Self {
            cfg,
            workers,
            kickoffs,
        }
    }

    /// Runs the fleet until every worker reported `FinishedClose` (or
    /// faulted), then joins all loops.
    ///
    /// Returns the first fatal routing or registration error; shutdown and
    /// joining still run before the error is reported.
    pub async fn run(mut self) -> Result<(), RuntimeError> {
        let mut fleet = self.spawn_workers()?;
        let outcome = self.drive(&mut fleet).await;
        self.wait_workers(&mut fleet).await;
        outcome
    }

    /// Spawns one dispatch loop per registered worker.
    ///
    /// Addresses are validated up front so a rejected registration never
    /// leaves a half-spawned fleet behind.
    fn spawn_workers(&mut self) -> Result<Fleet<C>, RuntimeError> {
        let mut taken: HashSet<Address> = HashSet::new();
        for worker in &self.workers {
            let address = worker.address().clone();
            if address.is_supervisor() {
                return Err(RuntimeError::ReservedAddress { address });
            }
            if !taken.insert(address.clone()) {
                return Err(RuntimeError::DuplicateAddress { address });
            }
        }

        let capacity = self.cfg.channel_capacity_clamped();
        let (shared_tx, inbound) = mpsc::channel::<Envelope<C>>(capacity);
        let token = CancellationToken::new();

        let mut roster = Vec::new();
        let mut entries: HashMap<Address, WorkerEntry<C>> = HashMap::new();

        for worker in self.workers.drain(..) {
            let address = worker.address().clone();
            let (tx, rx) = mpsc::channel::<Envelope<C>>(capacity);
            let probe = Arc::new(TokenProbe::new(token.child_token()));
            let mut handler =
                Handler::new(worker, rx, shared_tx.clone(), probe, self.cfg.poll_timeout);
            let join = tokio::spawn(async move { handler.listen().await });

            log::info!("spawned worker {address}");
            roster.push(address.clone());
            entries.insert(address, WorkerEntry { tx, join });
        }

        // Only the worker mailboxes keep the shared channel open from here
        // on; a closed channel then means every loop is gone.
        drop(shared_tx);

        let running = roster.len();
        Ok(Fleet {
            roster,
            entries,
            inbound,
            running,
            closing: false,
            _guard: token.clone().drop_guard(),
            token,
        })
    }

    /// Sends `Init` to every worker, then relays until the fleet drains.
    async fn drive(&mut self, fleet: &mut Fleet<C>) -> Result<(), RuntimeError> {
        self.init_workers(fleet).await?;

        while fleet.running > 0 {
            let Some(envelope) = fleet.inbound.recv().await else {
                // Every loop died without reporting; nothing left to relay.
                break;
            };
            self.route(envelope, fleet).await?;
        }
        Ok(())
    }

    /// Sends the init order on every dedicated channel, in registration order.
    async fn init_workers(&self, fleet: &Fleet<C>) -> Result<(), RuntimeError> {
        for address in &fleet.roster {
            let Some(entry) = fleet.entries.get(address) else {
                continue;
            };
            let envelope = Envelope::new(Address::supervisor(), address.clone(), Order::Init);
            if entry.tx.send(envelope).await.is_err() {
                return Err(RuntimeError::WorkerUnavailable {
                    address: address.clone(),
                });
            }
        }
        Ok(())
    }

    /// Routes one envelope from the shared channel.
    async fn route(&mut self, envelope: Envelope<C>, fleet: &mut Fleet<C>) -> Result<(), RuntimeError> {
        if envelope.receiver.is_supervisor() {
            self.handle_control(envelope, fleet).await;
            return Ok(());
        }

        if fleet.entries.contains_key(&envelope.receiver) {
            let receiver = envelope.receiver.clone();
            let sender = envelope.sender.clone();
            let kind = envelope.order.kind();
            let entry = &fleet.entries[&receiver];
            if entry.tx.send(envelope).await.is_err() {
                log::warn!("worker {receiver} is gone; dropping {kind} from {sender}");
            }
            return Ok(());
        }

        Err(RuntimeError::UnknownReceiver {
            address: envelope.receiver,
        })
    }

    /// Interprets an order addressed to the supervisor as a control event.
    async fn handle_control(&mut self, envelope: Envelope<C>, fleet: &mut Fleet<C>) {
        let sender = envelope.sender;
        match envelope.order {
            Order::FinishedInit => {
                log::info!("worker {sender} finished initialization");
                if let Some(command) = self.kickoffs.remove(&sender) {
                    Self::send_to(fleet, &sender, Order::Call(command)).await;
                }
            }
            Order::FinishedClose => {
                log::info!("worker {sender} finished closing");
                Self::send_to(fleet, &sender, Order::Shutdown).await;
                fleet.running = fleet.running.saturating_sub(1);
            }
            Order::RequestShutdown => {
                if fleet.closing {
                    log::debug!("shutdown already in progress; ignoring request from {sender}");
                    return;
                }
                log::info!("worker {sender} requested shutdown");
                fleet.closing = true;
                for address in fleet.roster.clone() {
                    Self::send_to(fleet, &address, Order::Close).await;
                }
            }
            Order::Fault { reason } => {
                log::error!("worker {sender} faulted: {reason}");
                fleet.running = fleet.running.saturating_sub(1);
            }
            other => {
                log::warn!(
                    "ignoring {} addressed to the supervisor from {sender}",
                    other.kind()
                );
            }
        }
    }

    /// Sends an order to one worker, best effort.
    ///
    /// Delivery to a dead worker is dropped with a warning — in particular
    /// the terminal sentinel, which must never fail against an
    /// already-stopped loop.
    async fn send_to(fleet: &Fleet<C>, address: &Address, order: Order<C>) {
        let Some(entry) = fleet.entries.get(address) else {
            return;
        };
        let kind = order.kind();
        let envelope = Envelope::new(Address::supervisor(), address.clone(), order);
        if entry.tx.send(envelope).await.is_err() {
            log::warn!("worker {address} is gone; dropping {kind}");
        }
    }

    /// Joins every loop within the configured grace; aborts stragglers.
    async fn wait_workers(&self, fleet: &mut Fleet<C>) {
        fleet.token.cancel();

        for address in fleet.roster.clone() {
            let Some(entry) = fleet.entries.remove(&address) else {
                continue;
            };
            let WorkerEntry { tx, mut join } = entry;
            drop(tx);

            match time::timeout(self.cfg.join_grace, &mut join).await {
                Ok(Ok(Ok(reason))) => {
                    log::debug!("worker {address} loop ended: {}", reason.as_label());
                }
                Ok(Ok(Err(err))) => {
                    log::error!("worker {address} loop ended with error: {err}");
                }
                Ok(Err(join_err)) => {
                    log::error!("worker {address} loop panicked: {join_err}");
                }
                Err(_elapsed) => {
                    log::warn!(
                        "worker {address} did not stop within {:?}; aborting",
                        self.cfg.join_grace
                    );
                    join.abort();
                    let _ = join.await;
                }
            }
        }
    }
}
