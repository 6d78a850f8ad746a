//! # Mailbox: the sending handle onto the shared channel.
//!
//! [`Mailbox`] is a thin wrapper around the shared channel's sender, bound
//! to one worker's [`Address`]. The dispatch loop uses it to forward the
//! envelopes a worker returns; domain code holds a reference (or a clone)
//! to post messages from inside an operation — the way an interactive
//! worker's callbacks submit work to a peer while its main command is still
//! running.
//!
//! ## Rules
//! - `post` stamps the mailbox owner as sender; `forward` sends an envelope
//!   unchanged (worker-returned messages carry their own sender).
//! - No acknowledgement and no delivery guarantee beyond the channel's FIFO
//!   order.
//! - A closed channel (supervisor gone) surfaces as
//!   [`HandlerError::ChannelClosed`].

use tokio::sync::mpsc;

use super::envelope::{Address, Command, Envelope, Order};
use crate::error::HandlerError;

/// Sending handle bound to one worker's address.
///
/// Cheap to clone; clones may be moved into privately spawned tasks so that
/// internal concurrency reports back exclusively through envelopes.
#[derive(Debug)]
pub struct Mailbox<C: Command> {
    address: Address,
    outbound: mpsc::Sender<Envelope<C>>,
}

// Not derived: a derived impl would require `C: Clone`.
impl<C: Command> Clone for Mailbox<C> {
    fn clone(&self) -> Self {
        Self {
            address: self.address.clone(),
            outbound: self.outbound.clone(),
        }
    }
}

impl<C: Command> Mailbox<C> {
    /// Creates a mailbox for `address` writing to the shared channel.
    pub fn new(address: Address, outbound: mpsc::Sender<Envelope<C>>) -> Self {
        Self { address, outbound }
    }

    /// Returns the owning worker's address.
    #[inline]
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Enqueues an order for `to`, stamping this mailbox's address as sender.
    pub async fn post(&self, to: Address, order: Order<C>) -> Result<(), HandlerError> {
        self.forward(Envelope::new(self.address.clone(), to, order))
            .await
    }

    /// Enqueues an envelope unchanged.
    pub async fn forward(&self, envelope: Envelope<C>) -> Result<(), HandlerError> {
        self.outbound
            .send(envelope)
            .await
            .map_err(|_| HandlerError::ChannelClosed)
    }
}
