use crate::protocol::{Request, ServerFrame};

/// Client side of a connection to the match server.
#[async_trait::async_trait]
pub trait Transport: Send {
    async fn send(&mut self, request: Request) -> anyhow::Result<()>;
    async fn recv(&mut self) -> anyhow::Result<ServerFrame>;
}

pub mod frame;
pub mod listener;
pub mod tcp;
