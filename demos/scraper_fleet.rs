//! # Example: a scraper-shaped fleet.
//!
//! A panel worker (the interactive side) and a page worker (the scraping
//! side): the panel's main loop asks the page for a title, the page replies
//! with a `SetTitle` envelope, and the panel winds the fleet down once the
//! title is displayed.
//!
//! Run with: cargo run --example scraper_fleet

use async_trait::async_trait;
use workvisor::{
    Address, Config, Envelope, Lifecycle, Mailbox, Order, Supervisor, Worker, WorkerError,
};

#[derive(Clone, Debug)]
enum ScrapeCommand {
    Mainloop,
    FetchTitle { url: String },
    SetTitle { title: String },
}

/// Interactive side: drives the session and displays results.
struct PanelWorker {
    address: Address,
    page: Address,
    lifecycle: Lifecycle,
    url: String,
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
        println!("[panel] window ready");
        Ok(())
    }

    async fn on_close(&mut self) -> Result<(), WorkerError> {
        println!("[panel] window closed");
        Ok(())
    }

    async fn on_command(
        &mut self,
        command: ScrapeCommand,
        _mailbox: &Mailbox<ScrapeCommand>,
    ) -> Result<Vec<Envelope<ScrapeCommand>>, WorkerError> {
        match command {
            ScrapeCommand::Mainloop => {
                println!("[panel] asking for the title of {}", self.url);
                Ok(vec![Envelope::new(
                    self.address.clone(),
                    self.page.clone(),
                    Order::Call(ScrapeCommand::FetchTitle {
                        url: self.url.clone(),
                    }),
                )])
            }
            ScrapeCommand::SetTitle { title } => {
                println!("[panel] title: {title}");
                Ok(vec![Envelope::new(
                    self.address.clone(),
                    Address::supervisor(),
                    Order::RequestShutdown,
                )])
            }
            ScrapeCommand::FetchTitle { .. } => Err(WorkerError::UnknownCommand {
                command: "fetch_title".into(),
            }),
        }
    }
}

/// Scraping side: resolves titles for the panel.
struct PageWorker {
    address: Address,
    panel: Address,
    lifecycle: Lifecycle,
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
        println!("[page] session started");
        Ok(())
    }

    async fn on_close(&mut self) -> Result<(), WorkerError> {
        println!("[page] session stopped");
        Ok(())
    }

    async fn on_command(
        &mut self,
        command: ScrapeCommand,
        _mailbox: &Mailbox<ScrapeCommand>,
    ) -> Result<Vec<Envelope<ScrapeCommand>>, WorkerError> {
        match command {
            ScrapeCommand::FetchTitle { url } => {
                // A real page worker navigates a browser session here; the
                // demo derives the title from the address.
                let title = if self.lifecycle.is_ready() {
                    format!("Title of {url}")
                } else {
                    "-".to_string()
                };
                println!("[page] resolved {url}");
                Ok(vec![Envelope::new(
                    self.address.clone(),
                    self.panel.clone(),
                    Order::Call(ScrapeCommand::SetTitle { title }),
                )])
            }
            ScrapeCommand::Mainloop | ScrapeCommand::SetTitle { .. } => {
                Err(WorkerError::UnknownCommand {
                    command: "mainloop/set_title".into(),
                })
            }
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let sup = Supervisor::builder(Config::default())
        .register(PanelWorker {
            address: Address::new("gui"),
            page: Address::new("page"),
            lifecycle: Lifecycle::new(),
            url: "https://example.org/score/42".into(),
        })
        .register(PageWorker {
            address: Address::new("page"),
            panel: Address::new("gui"),
            lifecycle: Lifecycle::new(),
        })
        .kickoff("gui", ScrapeCommand::Mainloop)
        .build();

    sup.run().await?;
    println!("[main] fleet drained");
    Ok(())
}
