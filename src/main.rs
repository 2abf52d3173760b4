use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use clap::Parser;
use tokio::io::AsyncBufReadExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use oncall_rota::models::{Registry, Roster};
use oncall_rota::repl::{Outcome, Repl};
use oncall_rota::store::{self, Store};

#[derive(Parser)]
#[command(name = "rota")]
#[command(version)]
#[command(about = "Interactive on-call tracker with fair round-robin task distribution")]
struct Cli {
    /// Snapshot file (default: the per-user data directory)
    #[arg(short, long)]
    state: Option<PathBuf>,

    /// Roster member names in rotation order, comma-separated
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    roster: Option<Vec<String>>,

    /// Seconds between automatic snapshot saves
    #[arg(long, default_value_t = store::DEFAULT_AUTOSAVE_SECS)]
    autosave_interval: u64,
}

/// Initialize tracing to stderr; stdout belongs to the prompt.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "oncall_rota=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let roster = match cli.roster {
        Some(names) => Roster::new(names)?,
        None => Roster::default(),
    };

    let store = match cli.state {
        Some(path) => Store::new(path),
        None => Store::open_default()?,
    };

    let mut registry = Registry::new(roster);
    if store.exists() {
        match store.load() {
            Ok(loaded) => {
                registry = loaded;
                println!("[Info] Loaded from: {}", store.path().display());
            }
            Err(e) => {
                tracing::warn!("could not load snapshot: {e:#}");
                println!("[Warning] Could not load {}: {e:#}", store.path().display());
                println!("[Warning] Starting with a fresh registry.");
            }
        }
    }
    let registry = Arc::new(RwLock::new(registry));

    let (stop_tx, stop_rx) = tokio::sync::watch::channel(false);
    let saver = store::spawn_autosave(
        registry.clone(),
        store.clone(),
        Duration::from_secs(cli.autosave_interval.max(1)),
        stop_rx,
    );

    let repl = Repl::new(registry, store);
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!(">> ");
        std::io::stdout().flush()?;
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                println!();
                None
            }
        };
        match line {
            Some(line) => {
                if repl.handle_line(&line) == Outcome::Exit {
                    break;
                }
            }
            // EOF or interrupt
            None => break,
        }
    }

    // let the in-flight autosave cycle finish before exiting
    let _ = stop_tx.send(true);
    saver.await?;
    println!("Exiting..");
    Ok(())
}
