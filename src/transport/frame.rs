//! Length-prefixed bincode frames.
//!
//! Each frame is a 4-byte big-endian length followed by that many bytes of
//! bincode. Reading and writing are split so that one task can read requests
//! while another writes replies and notifications on the same stream.

use anyhow::{anyhow, Context};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::{timeout, Duration};

/// Maximum frame size (1 MiB) to prevent excessive memory allocation.
pub const MAX_FRAME_SIZE: u32 = 1 << 20;

/// Default timeout for writing one frame.
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(30);

fn io_error(e: std::io::Error, op: &str) -> anyhow::Error {
    match e.kind() {
        std::io::ErrorKind::UnexpectedEof
        | std::io::ErrorKind::BrokenPipe
        | std::io::ErrorKind::ConnectionReset => anyhow!("Connection closed by peer"),
        _ => anyhow!("{} error: {}", op, e),
    }
}

pub struct FrameReader<R> {
    inner: R,
    max_frame_size: u32,
}

impl<R: AsyncRead + Unpin + Send> FrameReader<R> {
    pub fn new(inner: R, max_frame_size: u32) -> Self {
        Self {
            inner,
            max_frame_size,
        }
    }

    /// Read one frame. Waits as long as it takes for the frame to start.
    pub async fn recv<M: DeserializeOwned>(&mut self) -> anyhow::Result<M> {
        let mut len_buf = [0u8; 4];
        self.inner
            .read_exact(&mut len_buf)
            .await
            .map_err(|e| io_error(e, "Read"))?;

        let len = u32::from_be_bytes(len_buf);
        if len > self.max_frame_size {
            return Err(anyhow!(
                "Message too large: {} bytes (max: {})",
                len,
                self.max_frame_size
            ));
        }
        if len == 0 {
            return Err(anyhow!("Invalid message length: 0"));
        }

        let mut buf = vec![0u8; len as usize];
        self.inner
            .read_exact(&mut buf)
            .await
            .map_err(|e| io_error(e, "Read"))?;

        bincode::deserialize(&buf).context("Deserialization error")
    }
}

pub struct FrameWriter<W> {
    inner: W,
    max_frame_size: u32,
    write_timeout: Duration,
}

impl<W: AsyncWrite + Unpin + Send> FrameWriter<W> {
    pub fn new(inner: W, max_frame_size: u32, write_timeout: Duration) -> Self {
        Self {
            inner,
            max_frame_size,
            write_timeout,
        }
    }

    /// Write one frame, failing if it takes longer than the write timeout.
    pub async fn send<M: Serialize + Sync>(&mut self, msg: &M) -> anyhow::Result<()> {
        let data = bincode::serialize(msg).context("Serialization error")?;
        if data.len() > self.max_frame_size as usize {
            return Err(anyhow!(
                "Message too large: {} bytes (max: {})",
                data.len(),
                self.max_frame_size
            ));
        }

        let inner = &mut self.inner;
        let write_op = async move {
            let len = (data.len() as u32).to_be_bytes();
            inner.write_all(&len).await.map_err(|e| io_error(e, "Write"))?;
            inner.write_all(&data).await.map_err(|e| io_error(e, "Write"))?;
            inner.flush().await.map_err(|e| io_error(e, "Write"))?;
            anyhow::Ok(())
        };

        timeout(self.write_timeout, write_op)
            .await
            .map_err(|_| anyhow!("Send timeout after {:?}", self.write_timeout))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Notification, ServerFrame};

    #[tokio::test]
    async fn frames_cross_a_duplex_pipe() -> anyhow::Result<()> {
        let (client, server) = tokio::io::duplex(1024);
        let mut writer = FrameWriter::new(server, MAX_FRAME_SIZE, DEFAULT_WRITE_TIMEOUT);
        let mut reader = FrameReader::new(client, MAX_FRAME_SIZE);

        let frame = ServerFrame::Notification(Notification::Admitted { id: 4 });
        writer.send(&frame).await?;
        let received: ServerFrame = reader.recv().await?;
        assert_eq!(received, frame);
        Ok(())
    }

    #[tokio::test]
    async fn oversized_and_empty_frames_are_refused() {
        let (mut raw, client) = tokio::io::duplex(1024);
        let mut reader = FrameReader::new(client, 16);

        raw.write_all(&1000u32.to_be_bytes()).await.unwrap();
        let err = reader.recv::<ServerFrame>().await.unwrap_err();
        assert!(err.to_string().contains("too large"));

        let (mut raw, client) = tokio::io::duplex(1024);
        let mut reader = FrameReader::new(client, 16);
        raw.write_all(&0u32.to_be_bytes()).await.unwrap();
        let err = reader.recv::<ServerFrame>().await.unwrap_err();
        assert!(err.to_string().contains("length: 0"));
    }

    #[tokio::test]
    async fn closed_stream_reports_peer_closure() {
        let (raw, client) = tokio::io::duplex(64);
        drop(raw);
        let mut reader = FrameReader::new(client, MAX_FRAME_SIZE);
        let err = reader.recv::<ServerFrame>().await.unwrap_err();
        assert_eq!(err.to_string(), "Connection closed by peer");
    }
}
