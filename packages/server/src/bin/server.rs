//! Broadcast relay server for the classroom chat.
//!
//! Accepts WebSocket connections on `/ws`, keeps everyone informed of the
//! connected-user count, and relays every chat message to all clients.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 127.0.0.1 --port 3000
//! PORT=3000 cargo run --bin hiroba-server
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use hiroba_server::{
    config::{DEFAULT_HOST, DEFAULT_PORT, MessageLimits, ServerConfig},
    infrastructure::registry::InMemoryConnectionRegistry,
    ui::Server,
    usecase::{ConnectClientUseCase, DisconnectClientUseCase, RelayMessageUseCase},
};
use hiroba_shared::{
    logger::{install_panic_hook, setup_logger},
    time::SystemClock,
};

#[derive(Parser, Debug)]
#[command(name = "hiroba-server")]
#[command(about = "WebSocket broadcast relay for classroom chat", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Close connections that send nothing for this many seconds
    #[arg(long, env = "IDLE_TIMEOUT_SECS")]
    idle_timeout_secs: Option<u64>,

    /// Maximum sender name length in characters
    #[arg(long, env = "MAX_SENDER_LENGTH")]
    max_sender_length: Option<usize>,

    /// Maximum message length in characters
    #[arg(long, env = "MAX_MESSAGE_LENGTH")]
    max_message_length: Option<usize>,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            idle_timeout: args.idle_timeout_secs.map(Duration::from_secs),
            limits: MessageLimits {
                max_sender_len: args.max_sender_length,
                max_message_len: args.max_message_length,
            },
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");
    install_panic_hook();

    let config = ServerConfig::from(Args::parse());

    // Initialize dependencies in order:
    // 1. ConnectionRegistry
    // 2. UseCases
    // 3. Server

    // 1. Create ConnectionRegistry (in-memory)
    let registry = Arc::new(InMemoryConnectionRegistry::new());

    // 2. Create UseCases
    let connect_client_usecase = Arc::new(ConnectClientUseCase::new(registry.clone()));
    let disconnect_client_usecase = Arc::new(DisconnectClientUseCase::new(registry.clone()));
    let relay_message_usecase = Arc::new(RelayMessageUseCase::new(
        registry,
        Arc::new(SystemClock),
        config.limits,
    ));

    // 3. Create and run the server
    let server = Server::new(
        connect_client_usecase,
        disconnect_client_usecase,
        relay_message_usecase,
        config.idle_timeout,
    );
    if let Err(e) = server.run(&config.bind_addr()).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
