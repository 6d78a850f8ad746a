//! Runtime core: dispatch loops, supervision, and lifecycle.
//!
//! ## System wiring
//! ```text
//!                         ┌──────────────────────────────────────────┐
//!                         │  Supervisor (relay + lifecycle)          │
//!                         │  - kickoff table (finished_init → order) │
//!                         │  - running count (shutdown gate)         │
//!                         └──┬────────────┬──────────────────▲───────┘
//!            dedicated chan  │            │ dedicated chan   │ shared chan
//!                            ▼            ▼                  │ (all workers)
//!                   ┌────────────┐  ┌────────────┐           │
//!                   │  Handler   │  │  Handler   │ ──────────┘
//!                   │ (loop)     │  │ (loop)     │
//!                   └────┬───────┘  └────┬───────┘
//!                        ▼               ▼
//!                   ┌────────────┐  ┌────────────┐
//!                   │  Worker    │  │  Worker    │
//!                   │ (owned)    │  │ (owned)    │
//!                   └────────────┘  └────────────┘
//! ```
//!
//! Modules:
//! - [`supervisor`]: spawn, init sequencing, relay, bounded-grace shutdown;
//! - [`handler`]: one worker's dispatch loop and its stop conditions;
//! - [`builder`]: fleet assembly (workers + kickoff table);
//! - [`probe`]: cooperative parent-death detection;
//! - [`config`]: runtime tunables.

mod builder;
mod config;
mod handler;
mod probe;
mod supervisor;

pub use builder::SupervisorBuilder;
pub use config::Config;
pub use handler::{Handler, Step, StopReason};
pub use probe::{Liveness, ParentPidProbe, TokenProbe};
pub use supervisor::Supervisor;
