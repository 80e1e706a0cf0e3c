//! appkit: probe TCP endpoints in a repeating cycle.
//!
//! ```text
//! config file ──▶ format dispatch ──▶ structural decode ──▶ ProbeConfig
//!                                                             │
//!            env (APPKIT_*) ─────────── defaults ─────────────┤
//!                                                             ▼
//!   SIGINT/SIGTERM ──▶ Shutdown ──▶ cycle(targets) ──▶ guarded probe loop
//! ```

use std::path::PathBuf;

use clap::Parser;

use appkit::config::{env, load_config, ProbeConfig};
use appkit::lifecycle::{signals, Shutdown};
use appkit::observability::init_logging;
use appkit::probe::Prober;

#[derive(Parser, Debug)]
#[command(name = "appkit", version, about = "Probe TCP endpoints in a repeating cycle")]
struct Cli {
    /// Configuration file [env: APPKIT_CONFIG]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Document format: json or yaml [env: APPKIT_FORMAT]
    #[arg(short, long)]
    format: Option<String>,

    /// Stop after this many probes
    #[arg(short = 'n', long)]
    count: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging("appkit=info");

    let cli = Cli::parse();
    let path = cli.config.or_else(|| {
        let path = env::get_string("APPKIT_CONFIG", "");
        (!path.is_empty()).then(|| PathBuf::from(path))
    });
    let format = cli
        .format
        .unwrap_or_else(|| env::get_string("APPKIT_FORMAT", ""));

    let mut config = match &path {
        Some(path) => load_config::<ProbeConfig>(path, &format)?,
        None => {
            tracing::warn!("No configuration file given, using defaults");
            ProbeConfig::default()
        }
    };
    config.timing.interval = env::get_duration("APPKIT_INTERVAL", config.timing.interval);
    if cli.count.is_some() {
        config.max_probes = cli.count;
    }

    tracing::info!(
        config = ?path,
        format = %format,
        targets = config.targets.len(),
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    tokio::spawn(signals::trigger_on_signal(shutdown.clone()));

    let stats = Prober::new(config).run(shutdown.clone()).await;
    shutdown.trigger();

    tracing::info!(probes = stats.total(), "Shutdown complete");
    Ok(())
}
