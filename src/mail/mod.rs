//! Wire format and sending handles.
//!
//! This module groups the message **data model** and the **mailbox** used to
//! enqueue messages onto a fleet's shared channel.
//!
//! ## Contents
//! - [`Address`], [`Order`], [`Envelope`] — routing triple and payload
//! - [`Command`] — marker for a fleet's command set
//! - [`Mailbox`] — thin sender handle bound to one worker's address
//!
//! See `core/mod.rs` for the system-level wiring diagram.

mod envelope;
mod mailbox;

pub use envelope::{Address, Command, Envelope, Order};
pub use mailbox::Mailbox;
