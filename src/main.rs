mod cli;
mod correlate;
mod error;
mod filter;
mod model;
mod net;
mod output;
mod platform;
mod process;

use clap::Parser;
use cli::CliArgs;
use filter::FilterConfig;
use output::OutputFormatter;
use platform::{create_provider, ProviderConfig};
use process::OwnershipIndex;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    let filter_config = match FilterConfig::from_cli(&args) {
        Ok(fc) => fc,
        Err(e) => {
            eprintln!("Error parsing filters: {}", e);
            std::process::exit(1);
        }
    };
    let formatter = OutputFormatter::from_cli(&args);

    let config = ProviderConfig {
        proc_root: args.proc_root.clone(),
        protocols: filter_config.protocols.clone(),
    };

    if let Err(e) = run_once(config, &filter_config, &formatter) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_once(
    config: ProviderConfig,
    filter_config: &FilterConfig,
    formatter: &OutputFormatter,
) -> error::Result<()> {
    if !nix::unistd::geteuid().is_root() {
        warn!("not running as root: sockets of other users' processes will not be shown");
    }

    let provider = create_provider(config)?;

    // Both sides are built independently before the join.
    let connections = provider.connection_tables()?;
    let index = OwnershipIndex::build(provider.list_processes()?);
    if index.is_empty() {
        warn!("no socket descriptors could be read from any process");
    }
    debug!(
        connections = connections.len(),
        processes = index.process_count(),
        sockets = index.len(),
        "snapshot taken"
    );

    let mut result = correlate::correlate(&connections, &index, &filter_config.states);
    result.retain(|c| filter_config.matches(c));

    formatter
        .print(&result)
        .map_err(|e| error::LsnetError::io("<stdout>", e))
}
