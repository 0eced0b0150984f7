use battleship_server::{
    disposer_by_name, init_logging, transport::listener, Client, Server, ServerConfig,
    TcpTransport,
};

use clap::{Parser, Subcommand};
use log::{info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tokio::net::TcpListener;
use tokio::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Host the match server and wait for two players.
    Serve {
        #[arg(long, default_value = battleship_server::config::DEFAULT_BIND)]
        bind: String,
        #[arg(long, default_value_t = battleship_server::transport::frame::MAX_FRAME_SIZE)]
        max_frame_size: u32,
        #[arg(long, default_value_t = 30, help = "Seconds allowed to write one frame")]
        write_timeout_secs: u64,
    },
    /// Join a match server with an automatic player.
    Play {
        #[arg(long, default_value = "127.0.0.1:8080")]
        connect: String,
        #[arg(long, default_value = "robot")]
        name: String,
        #[arg(long, default_value = "random", help = "Placement policy: random or fixed")]
        disposer: String,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, default_value_t = 1)]
        rounds: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            bind,
            max_frame_size,
            write_timeout_secs,
        } => {
            let config = ServerConfig {
                bind,
                max_frame_size,
                write_timeout: Duration::from_secs(write_timeout_secs),
            };
            let listener = TcpListener::bind(&config.bind).await?;
            let server = Server::new();
            tokio::select! {
                result = listener::serve(listener, server, config) => result?,
                _ = tokio::signal::ctrl_c() => info!("Shutting down"),
            }
        }
        Commands::Play {
            connect,
            name,
            disposer,
            seed,
            rounds,
        } => {
            let mut disposer = disposer_by_name(&disposer, seed)
                .ok_or_else(|| anyhow::anyhow!("unknown disposer '{}'", disposer))?;
            let mut rng = match seed {
                Some(s) => SmallRng::seed_from_u64(s.wrapping_add(1)),
                None => SmallRng::from_rng(&mut rand::rng()),
            };

            info!("Connecting to {}...", connect);
            let mut client = Client::new(TcpTransport::connect(&connect).await?);
            let id = client.connect(name, disposer.dispose()).await?;
            info!("Admitted as {}", id);

            tokio::select! {
                tally = client.autoplay(disposer.as_mut(), &mut rng, rounds) => {
                    let tally = tally?;
                    info!("Done: {} won, {} lost", tally.won, tally.lost);
                }
                _ = tokio::signal::ctrl_c() => warn!("Interrupted"),
            }
        }
    }
    Ok(())
}
