//! Accept loop and per-connection adapter between TCP clients and a [`Server`].
//!
//! Each connection gets a reader loop, which turns requests into orchestrator
//! calls, and a writer task, which drains replies and notifications in
//! order. A connection carries at most one admitted participant: when the
//! socket closes the participant is disconnected, and when the participant is
//! disconnected from elsewhere the socket is closed.

use std::future;
use std::net::SocketAddr;

use log::{debug, info, warn};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::config::ServerConfig;
use crate::core::ParticipantId;
use crate::error::ServerError;
use crate::protocol::{RejectReason, Request, ServerFrame};
use crate::server::Server;
use crate::transport::frame::{FrameReader, FrameWriter};

/// Accept connections forever, one task per client.
pub async fn serve(listener: TcpListener, server: Server, config: ServerConfig) -> anyhow::Result<()> {
    info!("Server listening on {}", listener.local_addr()?);
    loop {
        let (stream, addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!("Error accepting connection: {}", e);
                tokio::time::sleep(Duration::from_millis(10)).await;
                continue;
            }
        };
        let server = server.clone();
        let config = config.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, addr, server, config).await {
                warn!("Connection from {} ended with an error: {}", addr, e);
            }
        });
    }
}

fn rejection(err: &ServerError) -> ServerFrame {
    ServerFrame::Rejected {
        reason: err.reason(),
        message: err.to_string(),
    }
}

async fn wait_leave(leave: Option<CancellationToken>) {
    match leave {
        Some(token) => token.cancelled().await,
        None => future::pending().await,
    }
}

/// Serve one client until it hangs up or its participant leaves.
pub async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    server: Server,
    config: ServerConfig,
) -> anyhow::Result<()> {
    info!("Client connected from {}", addr);
    stream.set_nodelay(true)?;
    let (read_half, write_half) = stream.into_split();
    let mut reader = FrameReader::new(read_half, config.max_frame_size);
    let mut writer = FrameWriter::new(write_half, config.max_frame_size, config.write_timeout);

    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<ServerFrame>();
    let writer_task = tokio::spawn(async move {
        while let Some(frame) = out_rx.recv().await {
            if let Err(e) = writer.send(&frame).await {
                warn!("Failed to send to {}: {}", addr, e);
                break;
            }
        }
    });

    let mut admitted: Option<(ParticipantId, CancellationToken)> = None;
    loop {
        let leave = admitted.as_ref().map(|(_, leave)| leave.clone());
        let request = tokio::select! {
            request = reader.recv::<Request>() => Some(request),
            _ = wait_leave(leave) => None,
        };
        let request = match request {
            Some(Ok(request)) => request,
            Some(Err(e)) => {
                debug!("Stopped reading from {}: {}", addr, e);
                break;
            }
            None => {
                debug!("Session on {} closed by the server", addr);
                break;
            }
        };

        let frame = match request {
            Request::Connect { .. } if admitted.is_some() => ServerFrame::Rejected {
                reason: RejectReason::Protocol,
                message: "this connection already holds a participant".to_string(),
            },
            Request::Connect { name, ships } => match server.connect(name, ships).await {
                Ok(handle) => {
                    let (id, mut notifications, leave) = handle.into_parts();
                    let out = out_tx.clone();
                    tokio::spawn(async move {
                        while let Some(notification) = notifications.recv().await {
                            if out.send(ServerFrame::Notification(notification)).is_err() {
                                break;
                            }
                        }
                    });
                    admitted = Some((id, leave));
                    // the Admitted notification answers the request
                    continue;
                }
                Err(e) => rejection(&e),
            },
            Request::Disconnect { id } => match server.disconnect(id).await {
                Ok(()) => ServerFrame::Ack,
                Err(e) => rejection(&e),
            },
            Request::Play { id, position } => match server.play(id, position).await {
                Ok(reply) => ServerFrame::Played(reply),
                Err(e) => rejection(&e),
            },
            Request::Rearm { id, ships } => match server.rearm(id, ships).await {
                Ok(()) => ServerFrame::Ack,
                Err(e) => rejection(&e),
            },
        };
        if out_tx.send(frame).is_err() {
            break;
        }
    }

    if let Some((id, _)) = admitted {
        match server.disconnect(id).await {
            Ok(()) => info!("Participant {} dropped with its connection", id),
            Err(ServerError::UnknownParticipant(_)) => {}
            Err(e) => warn!("Failed to release participant {}: {}", id, e),
        }
    }
    drop(out_tx);
    let _ = writer_task.await;
    info!("Client {} disconnected", addr);
    Ok(())
}
