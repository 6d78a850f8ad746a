//! Shared test fixtures: a small scraper-shaped fleet.
//!
//! The fixtures mirror the two collaborator shapes the runtime is built
//! for — an interactive panel worker (`gui`) and a page worker (`page`) —
//! and record every dispatched operation into a shared log so tests can
//! assert exact sequences.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::core::Liveness;
use crate::error::WorkerError;
use crate::mail::{Address, Envelope, Mailbox, Order};
use crate::workers::{Lifecycle, Worker};

/// Shared record of dispatched operations.
pub(crate) type Log = Arc<Mutex<Vec<String>>>;

fn log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

/// Command set of the fixture fleet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ScrapeCommand {
    Mainloop,
    Scrap { url: String },
    FetchTitle { url: String },
    SetTitle { title: String },
}

impl ScrapeCommand {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            ScrapeCommand::Mainloop => "mainloop",
            ScrapeCommand::Scrap { .. } => "scrap",
            ScrapeCommand::FetchTitle { .. } => "fetch_title",
            ScrapeCommand::SetTitle { .. } => "set_title",
        }
    }
}

/// Builds a dedicated channel pair and a shared channel pair, in the roles
/// the supervisor would wire: `(to_worker, from_supervisor, to_supervisor,
/// from_workers)`.
pub(crate) fn channels() -> (
    mpsc::Sender<Envelope<ScrapeCommand>>,
    mpsc::Receiver<Envelope<ScrapeCommand>>,
    mpsc::Sender<Envelope<ScrapeCommand>>,
    mpsc::Receiver<Envelope<ScrapeCommand>>,
) {
    let (to_worker, from_supervisor) = mpsc::channel(16);
    let (to_supervisor, from_workers) = mpsc::channel(16);
    (to_worker, from_supervisor, to_supervisor, from_workers)
}

/// Liveness probe tests can flip.
pub(crate) struct FlipProbe {
    alive: AtomicBool,
}

impl FlipProbe {
    pub(crate) fn alive() -> Self {
        Self {
            alive: AtomicBool::new(true),
        }
    }

    pub(crate) fn kill(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}

impl Liveness for FlipProbe {
    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }
}

/// Interactive worker shape: drives a main loop, displays titles.
pub(crate) struct PanelWorker {
    pub(crate) address: Address,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) seen: Log,
    pub(crate) titles: Log,
    /// When set, request shutdown once this many titles were displayed.
    pub(crate) shutdown_after_titles: Option<usize>,
}

impl PanelWorker {
    pub(crate) fn new() -> Self {
        Self {
            address: Address::new("gui"),
            lifecycle: Lifecycle::new(),
            seen: log(),
            titles: log(),
            shutdown_after_titles: None,
        }
    }

    fn request_shutdown(&self) -> Envelope<ScrapeCommand> {
        Envelope::new(
            self.address.clone(),
            Address::supervisor(),
            Order::RequestShutdown,
        )
    }
}

#[async_trait]
impl Worker for PanelWorker {
    type Command = ScrapeCommand;

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
        self.seen.lock().unwrap().push("init".into());
        Ok(())
    }

    async fn on_close(&mut self) -> Result<(), WorkerError> {
        self.seen.lock().unwrap().push("close".into());
        Ok(())
    }

    async fn on_command(
        &mut self,
        command: ScrapeCommand,
        _mailbox: &Mailbox<ScrapeCommand>,
    ) -> Result<Vec<Envelope<ScrapeCommand>>, WorkerError> {
        match command {
            ScrapeCommand::Mainloop => {
                self.seen.lock().unwrap().push("mainloop".into());
                // The fixture's main loop runs to completion immediately and
                // asks the fleet to wind down, like a window being closed.
                Ok(vec![self.request_shutdown()])
            }
            ScrapeCommand::SetTitle { title } => {
                self.seen.lock().unwrap().push("set_title".into());
                let mut titles = self.titles.lock().unwrap();
                titles.push(title);
                let done = self
                    .shutdown_after_titles
                    .is_some_and(|limit| titles.len() >= limit);
                drop(titles);
                if done {
                    Ok(vec![self.request_shutdown()])
                } else {
                    Ok(Vec::new())
                }
            }
            other => Err(WorkerError::UnknownCommand {
                command: other.label().into(),
            }),
        }
    }
}

/// Page worker shape: scrapes and reports titles to the panel.
pub(crate) struct PageWorker {
    pub(crate) address: Address,
    pub(crate) panel: Address,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) seen: Log,
}

impl PageWorker {
    pub(crate) fn new() -> Self {
        Self {
            address: Address::new("page"),
            panel: Address::new("gui"),
            lifecycle: Lifecycle::new(),
            seen: log(),
        }
    }
}

#[async_trait]
impl Worker for PageWorker {
    type Command = ScrapeCommand;

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
        self.seen.lock().unwrap().push("init".into());
        Ok(())
    }

    async fn on_close(&mut self) -> Result<(), WorkerError> {
        self.seen.lock().unwrap().push("close".into());
        Ok(())
    }

    async fn on_command(
        &mut self,
        command: ScrapeCommand,
        _mailbox: &Mailbox<ScrapeCommand>,
    ) -> Result<Vec<Envelope<ScrapeCommand>>, WorkerError> {
        match command {
            ScrapeCommand::Scrap { url } => {
                self.seen.lock().unwrap().push(format!("scrap {url}"));
                Ok(Vec::new())
            }
            ScrapeCommand::FetchTitle { url } => {
                self.seen.lock().unwrap().push(format!("fetch_title {url}"));
                let title = if self.lifecycle.is_ready() {
                    format!("Title of {url}")
                } else {
                    "-".to_string()
                };
                Ok(vec![Envelope::new(
                    self.address.clone(),
                    self.panel.clone(),
                    Order::Call(ScrapeCommand::SetTitle { title }),
                )])
            }
            other => Err(WorkerError::UnknownCommand {
                command: other.label().into(),
            }),
        }
    }
}

/// Worker whose init hook fails, for exercising the fault path.
pub(crate) struct FailingWorker {
    address: Address,
    lifecycle: Lifecycle,
}

impl FailingWorker {
    pub(crate) fn new() -> Self {
        Self {
            address: Address::new("flaky"),
            lifecycle: Lifecycle::new(),
        }
    }
}

#[async_trait]
impl Worker for FailingWorker {
    type Command = ScrapeCommand;

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
        Err(WorkerError::Failed {
            error: "browser did not start".into(),
        })
    }

    async fn on_command(
        &mut self,
        _command: ScrapeCommand,
        _mailbox: &Mailbox<ScrapeCommand>,
    ) -> Result<Vec<Envelope<ScrapeCommand>>, WorkerError> {
        Ok(Vec::new())
    }
}
