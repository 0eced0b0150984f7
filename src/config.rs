use tokio::time::Duration;

use crate::transport::frame::{DEFAULT_WRITE_TIMEOUT, MAX_FRAME_SIZE};

/// Default address the server listens on.
pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

/// Runtime settings of the match server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: String,
    /// Largest frame accepted or sent, in bytes.
    pub max_frame_size: u32,
    /// Time allowed to write one frame to a client before the connection is dropped.
    pub write_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            max_frame_size: MAX_FRAME_SIZE,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
        }
    }
}
