//! # workvisor
//!
//! **Workvisor** is a lightweight worker-fleet supervision runtime for Rust.
//!
//! It supervises a small, static set of long-lived workers, routes typed
//! request/reply envelopes between them and a central supervisor, and
//! guarantees an orderly init/close lifecycle even when the supervising
//! parent disappears abruptly. The crate is designed as the message-passing
//! backbone of multi-component applications (an interactive panel plus a
//! scraping backend, a frontend plus device drivers, and the like).
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   Worker     │   │   Worker     │   │   Worker     │
//!     │  (user #1)   │   │  (user #2)   │   │  (user #3)   │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼ owned            ▼ owned            ▼ owned
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   Handler    │   │   Handler    │   │   Handler    │
//!     │ (dispatch    │   │ (dispatch    │   │ (dispatch    │
//!     │  loop)       │   │  loop)       │   │  loop)       │
//!     └──┬────────▲──┘   └──┬────────▲──┘   └──┬────────▲──┘
//!        │ shared │ dedicated│       │         │        │
//!        ▼        │          ▼       │         ▼        │
//! ┌───────────────────────────────────────────────────────────────┐
//! │  Supervisor (relay + lifecycle)                               │
//! │  - single shared inbound channel (all workers write)          │
//! │  - one dedicated channel per worker (only supervisor writes)  │
//! │  - kickoff table: finished_init → configured order            │
//! │  - running count: shutdown-completion gate                    │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! builder.register(..) ──► Supervisor::run()
//!
//! run:
//!   ├─► spawn one Handler loop per worker (child-token liveness probes)
//!   ├─► send Init to every worker            → FinishedInit replies
//!   ├─► fire kickoff orders (at most once per worker)
//!   ├─► relay Call/reply envelopes between workers
//!   ├─► RequestShutdown from any worker      → broadcast Close (latched)
//!   ├─► FinishedClose from a worker          → Shutdown sentinel, count −1
//!   └─► count == 0 → join every loop within Config::join_grace,
//!       abort stragglers
//!
//! Handler loop exit conditions:
//!   - Shutdown sentinel received (never dispatched)
//!   - liveness probe reports the parent gone (orphan detection)
//!   - dedicated channel disconnected
//!   - fatal dispatch error (fault envelope posted to the supervisor)
//! ```
//!
//! ## Features
//! | Area          | Description                                                   | Key types / traits                  |
//! |---------------|---------------------------------------------------------------|-------------------------------------|
//! | **Workers**   | Stateful units with an enforced init/close lifecycle.         | [`Worker`], [`Lifecycle`]           |
//! | **Mail**      | Typed envelopes and sending handles.                          | [`Envelope`], [`Order`], [`Mailbox`]|
//! | **Dispatch**  | Per-worker loops with poll-bounded receive and orphan checks. | [`Handler`], [`Step`], [`Liveness`] |
//! | **Supervision** | Fleet spawn, init sequencing, relay, bounded shutdown.      | [`Supervisor`], [`Config`]          |
//! | **Errors**    | Typed errors per failure domain.                              | [`WorkerError`], [`RuntimeError`]   |
//!
//! ## Optional features
//! - `serde`: `Serialize`/`Deserialize` on [`Address`], [`Order`], and
//!   [`Envelope`] for cross-process transports.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use workvisor::{
//!     Address, Config, Envelope, Lifecycle, Mailbox, Order, Supervisor, Worker, WorkerError,
//! };
//!
//! enum PingCommand {
//!     Ping,
//! }
//!
//! struct PingWorker {
//!     address: Address,
//!     lifecycle: Lifecycle,
//! }
//!
//! #[async_trait]
//! impl Worker for PingWorker {
//!     type Command = PingCommand;
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
//!         command: PingCommand,
//!         _mailbox: &Mailbox<PingCommand>,
//!     ) -> Result<Vec<Envelope<PingCommand>>, WorkerError> {
//!         match command {
//!             // One ping, then wind the fleet down.
//!             PingCommand::Ping => Ok(vec![Envelope::new(
//!                 self.address.clone(),
//!                 Address::supervisor(),
//!                 Order::RequestShutdown,
//!             )]),
//!         }
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sup = Supervisor::builder(Config::default())
//!         .register(PingWorker {
//!             address: Address::new("ping"),
//!             lifecycle: Lifecycle::new(),
//!         })
//!         .kickoff("ping", PingCommand::Ping)
//!         .build();
//!
//!     sup.run().await?;
//!     Ok(())
//! }
//! ```

mod core;
mod error;
mod mail;
mod workers;

#[cfg(test)]
pub(crate) mod testkit;

// ---- Public re-exports ----

pub use crate::core::{
    Config, Handler, Liveness, ParentPidProbe, Step, StopReason, Supervisor, SupervisorBuilder,
    TokenProbe,
};
pub use error::{HandlerError, RuntimeError, WorkerError};
pub use mail::{Address, Command, Envelope, Mailbox, Order};
pub use workers::{Lifecycle, Worker, WorkerRef};
