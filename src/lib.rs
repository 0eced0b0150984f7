//! Two-player battleship match server.
//!
//! [`crate::core`] holds the rules, [`server`] arbitrates a two-seat session on top
//! of them, and [`transport`] carries the session over TCP.

pub mod client;
pub mod config;
pub mod core;
pub mod disposer;
pub mod error;
mod logging;
pub mod notifier;
pub mod protocol;
pub mod server;
pub mod session;
pub mod transport;

pub use client::{Client, Refused, Tally};
pub use config::ServerConfig;
pub use crate::core::*;
pub use disposer::{disposer_by_name, Disposer, FixedDisposer, RandomDisposer};
pub use error::ServerError;
pub use logging::init_logging;
pub use notifier::{DeliveryError, Notifier};
pub use protocol::*;
pub use server::{MatchSnapshot, Server, SessionHandle};
pub use session::{Participant, Seats, Slot};
pub use transport::tcp::TcpTransport;
pub use transport::Transport;
