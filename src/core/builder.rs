//! # Builder for assembling a fleet.
//!
//! Collects the registered workers and the kickoff table, then produces a
//! [`Supervisor`]. Address validation (duplicates, the reserved supervisor
//! address) happens at the start of [`Supervisor::run`], before any worker
//! is spawned.

use std::collections::HashMap;

use crate::core::config::Config;
use crate::core::supervisor::Supervisor;
use crate::mail::{Address, Command};
use crate::workers::{Worker, WorkerRef};

/// Builder for constructing a [`Supervisor`].
pub struct SupervisorBuilder<C: Command> {
    cfg: Config,
    workers: Vec<WorkerRef<C>>,
    kickoffs: HashMap<Address, C>,
}

impl<C: Command> SupervisorBuilder<C> {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            workers: Vec::new(),
            kickoffs: HashMap::new(),
        }
    }

    /// Registers a worker. Spawn and init order follow registration order.
    pub fn register(mut self, worker: impl Worker<Command = C>) -> Self {
        self.workers.push(Box::new(worker));
        self
    }

    /// Configures the order sent to `address` once it reports finished
    /// initialization (e.g. telling an interactive worker to start its main
    /// loop). At most one kickoff per address; it fires at most once.
    pub fn kickoff(mut self, address: impl Into<Address>, command: C) -> Self {
        self.kickoffs.insert(address.into(), command);
        self
    }

    /// Builds the supervisor. Consumes the builder.
    pub fn build(self) -> Supervisor<C> {
        Supervisor::new(self.cfg, self.workers, self.kickoffs)
    }
}
