//! # Example: two workers bouncing a counter through the supervisor relay.
//!
//! Run with: cargo run --example ping_pong

use async_trait::async_trait;
use workvisor::{
    Address, Config, Envelope, Lifecycle, Mailbox, Order, Supervisor, Worker, WorkerError,
};

#[derive(Clone, Debug)]
enum RallyCommand {
    Bounce { count: u32 },
}

/// Returns the ball to `peer` until the rally is long enough.
struct Paddle {
    address: Address,
    peer: Address,
    lifecycle: Lifecycle,
    rally_limit: u32,
}

impl Paddle {
    fn new(address: &str, peer: &str, rally_limit: u32) -> Self {
        Self {
            address: Address::new(address),
            peer: Address::new(peer),
            lifecycle: Lifecycle::new(),
            rally_limit,
        }
    }
}

#[async_trait]
impl Worker for Paddle {
    type Command = RallyCommand;

    fn address(&self) -> &Address {
        &self.address
    }
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }
    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    async fn on_command(
        &mut self,
        command: RallyCommand,
        _mailbox: &Mailbox<RallyCommand>,
    ) -> Result<Vec<Envelope<RallyCommand>>, WorkerError> {
        match command {
            RallyCommand::Bounce { count } => {
                println!("[{}] bounce #{count}", self.address);
                if count >= self.rally_limit {
                    println!("[{}] rally over, winding down", self.address);
                    return Ok(vec![Envelope::new(
                        self.address.clone(),
                        Address::supervisor(),
                        Order::RequestShutdown,
                    )]);
                }
                Ok(vec![Envelope::new(
                    self.address.clone(),
                    self.peer.clone(),
                    Order::Call(RallyCommand::Bounce { count: count + 1 }),
                )])
            }
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let sup = Supervisor::builder(Config::default())
        .register(Paddle::new("ping", "pong", 6))
        .register(Paddle::new("pong", "ping", 6))
        .kickoff("ping", RallyCommand::Bounce { count: 1 })
        .build();

    sup.run().await?;
    println!("[main] fleet drained");
    Ok(())
}
