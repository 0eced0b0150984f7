use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::time::Duration;

use crate::protocol::{Request, ServerFrame};
use crate::transport::frame::{FrameReader, FrameWriter, DEFAULT_WRITE_TIMEOUT, MAX_FRAME_SIZE};
use crate::transport::Transport;

/// Client transport over one TCP connection.
pub struct TcpTransport {
    reader: FrameReader<OwnedReadHalf>,
    writer: FrameWriter<OwnedWriteHalf>,
}

impl TcpTransport {
    pub fn new(stream: TcpStream) -> Self {
        Self::with_config(stream, MAX_FRAME_SIZE, DEFAULT_WRITE_TIMEOUT)
    }

    pub fn with_config(stream: TcpStream, max_frame_size: u32, write_timeout: Duration) -> Self {
        let (read_half, write_half) = stream.into_split();
        Self {
            reader: FrameReader::new(read_half, max_frame_size),
            writer: FrameWriter::new(write_half, max_frame_size, write_timeout),
        }
    }

    pub async fn connect<A: ToSocketAddrs>(addr: A) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        Ok(Self::new(stream))
    }
}

#[async_trait::async_trait]
impl Transport for TcpTransport {
    async fn send(&mut self, request: Request) -> anyhow::Result<()> {
        self.writer.send(&request).await
    }

    async fn recv(&mut self) -> anyhow::Result<ServerFrame> {
        self.reader.recv().await
    }
}
