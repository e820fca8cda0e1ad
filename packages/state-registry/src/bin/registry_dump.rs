//! Registry Dump CLI
//!
//! Loads a snapshot JSON file into a registry state and inspects it.
//!
//! # Usage
//!
//! ```bash
//! # Node/kind counts and root alert totals
//! cargo run --bin registry-dump -- summary --snapshot snapshot.json
//!
//! # Debug export to a directory tree
//! cargo run --bin registry-dump -- export --snapshot snapshot.json --output target/registry
//!
//! # One bundled node as JSON
//! cargo run --bin registry-dump -- node --snapshot snapshot.json --dn "root/ns-[default]"
//! ```

use clap::{Parser, Subcommand};
use state_registry::{RegistryConfig, RegistryState, SnapshotInfo};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "registry-dump")]
#[command(about = "Inspect a registry snapshot", long_about = None)]
struct Cli {
    /// Snapshot JSON file
    #[arg(short, long, global = true)]
    snapshot: Option<PathBuf>,

    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Log filter (overridden by RUST_LOG)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print node and kind counts plus root alert totals
    Summary,

    /// Write the debug export tree
    Export {
        /// Output directory (defaults to debug_output.dir from the config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print one bundled node as JSON
    Node {
        /// DN of the node
        #[arg(long)]
        dn: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match &cli.config {
        Some(path) => RegistryConfig::from_yaml(path)?,
        None => RegistryConfig::default(),
    };

    let snapshot_path = cli.snapshot.ok_or("missing --snapshot <FILE>")?;
    info!(path = %snapshot_path.display(), "Loading snapshot");
    let snapshot = SnapshotInfo::from_file(&snapshot_path)?;
    let mut state = RegistryState::with_config(snapshot, &config);

    match cli.command {
        Commands::Summary => print_summary(&mut state)?,
        Commands::Export { output } => {
            let dir = output
                .or_else(|| config.debug_output.dir.clone())
                .ok_or("missing --output <DIR> (and no debug_output.dir in config)")?;
            let summary = state.debug_output_to_dir(&dir, config.debug_output.pretty)?;
            println!(
                "Exported {} DNs ({} files) to {}",
                summary.dns_exported,
                summary.files_written,
                dir.display()
            );
        }
        Commands::Node { dn } => {
            let bundle = state.build_bundle()?;
            match bundle.get_node(&dn) {
                Some(node) => println!("{}", serde_json::to_string_pretty(node)?),
                None => return Err(format!("node not found: {}", dn).into()),
            }
        }
    }

    Ok(())
}

fn print_summary(state: &mut RegistryState) -> Result<(), Box<dyn std::error::Error>> {
    println!("Snapshot date: {}", state.date().to_rfc3339());
    println!("Nodes: {}", state.get_count());

    println!("\nKinds:");
    for (kind, count) in state.tree_index().kinds() {
        println!("  {:<24} {}", kind, count);
    }

    let bundle = state.build_bundle()?;
    match bundle.get_node(bundle.root_dn()) {
        Some(root) => println!(
            "\nAlerts under {}: {} errors, {} warnings",
            bundle.root_dn(),
            root.alert_count.error,
            root.alert_count.warn
        ),
        None => println!("\nRoot node {} not found", bundle.root_dn()),
    }

    Ok(())
}
