//! # Wire format: addresses, orders, envelopes.
//!
//! Every message exchanged in a fleet is an [`Envelope`]: a sender
//! [`Address`], a receiver [`Address`], and an [`Order`] payload. Control
//! orders drive the worker lifecycle; domain orders carry one variant of the
//! fleet's command set `C` (one enum per application, shared by all of its
//! workers — each worker dispatches the variants it supports and rejects the
//! rest).
//!
//! ## Routing
//! ```text
//! worker ──(Envelope{sender, receiver, order})──► shared channel ──► supervisor
//!                                                                      │
//!                           receiver == supervisor ── control handling ┤
//!                           receiver == worker ────── forward verbatim ┘
//! ```
//!
//! ## Rules
//! - No validation at send time; an unknown receiver is caught at relay time.
//! - FIFO is guaranteed per channel, never across channels.
//! - [`Order::Shutdown`] is the terminal sentinel: a dispatch loop that
//!   receives it stops without dispatching. It is sent by the supervisor;
//!   applications have no reason to construct it.

use std::fmt;
use std::sync::Arc;

/// Marker for a fleet's command set, carried inside [`Order::Call`].
///
/// Blanket-implemented for every `Send + 'static` type; applications just
/// define an enum of commands and use it as the `C` parameter throughout.
pub trait Command: Send + 'static {}

impl<T: Send + 'static> Command for T {}

/// Stable string identifier of a worker or the supervisor.
///
/// Cheap to clone (shared string). Assigned when a worker is registered and
/// never reused concurrently within a fleet.
///
/// # Example
/// ```
/// use workvisor::Address;
///
/// let gui = Address::new("gui");
/// assert_eq!(gui.as_str(), "gui");
/// assert!(!gui.is_supervisor());
/// assert!(Address::supervisor().is_supervisor());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Address(Arc<str>);

/// Address of the coordinator side of every fleet.
const SUPERVISOR: &str = "supervisor";

impl Address {
    /// Creates an address from any string-like value.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// Returns the address of the supervisor.
    pub fn supervisor() -> Self {
        Self::new(SUPERVISOR)
    }

    /// Returns true if this address names the supervisor.
    #[inline]
    pub fn is_supervisor(&self) -> bool {
        &*self.0 == SUPERVISOR
    }

    /// Returns the address as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Address {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// Payload of a message: a control order or one command from the fleet's
/// command set.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Order<C> {
    /// Run the worker's initialization; replied to with [`Order::FinishedInit`].
    Init,
    /// Run the worker's teardown; replied to with [`Order::FinishedClose`].
    Close,
    /// Worker → supervisor: initialization completed.
    FinishedInit,
    /// Worker → supervisor: teardown completed.
    FinishedClose,
    /// Worker → supervisor: close the whole fleet.
    RequestShutdown,
    /// Worker loop → supervisor: the loop died with the given reason.
    Fault {
        /// Human-readable description of the failure.
        reason: String,
    },
    /// Terminal sentinel: stop the dispatch loop without dispatching.
    Shutdown,
    /// A domain command for the receiving worker.
    Call(C),
}

impl<C> Order<C> {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Order::Init => "init",
            Order::Close => "close",
            Order::FinishedInit => "finished_init",
            Order::FinishedClose => "finished_close",
            Order::RequestShutdown => "request_shutdown",
            Order::Fault { .. } => "fault",
            Order::Shutdown => "shutdown",
            Order::Call(_) => "call",
        }
    }

    /// Returns true for the terminal sentinel.
    #[inline]
    pub fn is_shutdown(&self) -> bool {
        matches!(self, Order::Shutdown)
    }
}

/// One routed message: `(sender, receiver, order)`.
///
/// Invariant: `receiver` must name the supervisor or a registered worker.
/// The supervisor treats anything else as a fatal routing error.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Envelope<C> {
    /// Address the message originates from.
    pub sender: Address,
    /// Address the message is routed to.
    pub receiver: Address,
    /// The payload.
    pub order: Order<C>,
}

impl<C> Envelope<C> {
    /// Creates an envelope.
    pub fn new(sender: Address, receiver: Address, order: Order<C>) -> Self {
        Self {
            sender,
            receiver,
            order,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supervisor_address_is_recognized() {
        assert!(Address::supervisor().is_supervisor());
        assert!(!Address::new("gui").is_supervisor());
        assert_eq!(Address::supervisor(), Address::new("supervisor"));
    }

    #[test]
    fn address_is_cheap_to_clone_and_displayable() {
        let page: Address = "page".into();
        let copy = page.clone();
        assert_eq!(page, copy);
        assert_eq!(format!("{page}"), "page");
    }

    #[test]
    fn order_kinds_are_stable() {
        let orders: Vec<Order<()>> = vec![
            Order::Init,
            Order::Close,
            Order::FinishedInit,
            Order::FinishedClose,
            Order::RequestShutdown,
            Order::Fault {
                reason: "boom".into(),
            },
            Order::Shutdown,
            Order::Call(()),
        ];
        let kinds: Vec<&str> = orders.iter().map(Order::kind).collect();
        assert_eq!(
            kinds,
            [
                "init",
                "close",
                "finished_init",
                "finished_close",
                "request_shutdown",
                "fault",
                "shutdown",
                "call",
            ]
        );
    }

    #[test]
    fn only_the_sentinel_is_shutdown() {
        assert!(Order::<()>::Shutdown.is_shutdown());
        assert!(!Order::<()>::Close.is_shutdown());
    }
}
