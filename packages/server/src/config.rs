//! Runtime configuration.

use std::time::Duration;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// Optional length limits on inbound chat fields, in characters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageLimits {
    pub max_sender_len: Option<usize>,
    pub max_message_len: Option<usize>,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port shared by HTTP and the WebSocket channel
    pub port: u16,
    /// Close a connection after this long without an inbound frame
    pub idle_timeout: Option<Duration>,
    pub limits: MessageLimits,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            idle_timeout: None,
            limits: MessageLimits::default(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
