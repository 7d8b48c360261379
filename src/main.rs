//! Hylesaga command-line client.
//!
//! ```text
//! hylesaga [--config PATH] [--url URL] <command>
//!
//!   keygen              new secp256k1 key pair
//!   address <name>      entity address
//!   create <name>       create an entity
//!   take <name> <space> take space from an entity
//!   status <batch-id>   poll a batch once
//!   list                all entities in the namespace
//!   show <name>         one entity
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use hylesaga_client::config::{load_or_default, ClientConfig, ConfigWatcher};
use hylesaga_client::ledger::{address, Action, EntityActions, LedgerHandle, Outcome, Signer};
use hylesaga_client::lifecycle::{cancellable, CancelSource};
use hylesaga_client::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "hylesaga")]
#[command(about = "Sign, submit and inspect Hylesaga transactions", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ledger REST API URL (overrides the config file).
    #[arg(short, long)]
    url: Option<String>,

    /// Keep polling until the batch commits or the retry bound is hit.
    #[arg(short, long)]
    wait: bool,

    /// Reload the config file on change while the command runs.
    #[arg(long)]
    watch: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new signing key
    Keygen,
    /// Print the ledger address of an entity
    Address { name: String },
    /// Create an entity
    Create { name: String },
    /// Take space from an entity
    Take { name: String, space: String },
    /// Poll the status of a submitted batch once
    Status { batch_id: String },
    /// List every entity in the namespace
    List,
    /// Show one entity
    Show { name: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(url) = &cli.url {
        config.ledger.url = url.clone();
    }

    init_logging(&config.observability);

    match run(cli, config).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: ClientConfig) -> Result<bool, Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Keygen => {
            let signer = Signer::random();
            println!("private_key: {}", signer.private_key_hex());
            println!("public_key:  {}", signer.public_key());
            Ok(true)
        }
        Commands::Address { name } => {
            println!("{}", address::address(&name));
            Ok(true)
        }
        command => {
            let watch_path = cli.config.filter(|_| cli.watch);
            run_online(command, watch_path, cli.wait, config).await
        }
    }
}

async fn run_online(
    command: Commands,
    watch_path: Option<PathBuf>,
    wait: bool,
    config: ClientConfig,
) -> Result<bool, Box<dyn std::error::Error>> {
    let handle = Arc::new(LedgerHandle::from_config(config.ledger.clone())?);

    // The watcher must outlive the command.
    let _watcher = match watch_path {
        Some(path) => Some(ConfigWatcher::new(&path, handle.clone()).run()?),
        None => None,
    };

    let cancel = CancelSource::new();
    let token = cancel.token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, cancelling");
            cancel.cancel();
        }
    });

    match command {
        Commands::Create { name } => {
            let actions = EntityActions::new(handle, signer_for(&config)?);
            let outcome = if wait {
                cancellable(
                    &token,
                    actions.perform_and_wait(&name, Action::Create, None, &config.confirmation),
                )
                .await?
            } else {
                cancellable(&token, actions.create_entity(&name)).await?
            };
            Ok(report(&outcome))
        }
        Commands::Take { name, space } => {
            let actions = EntityActions::new(handle, signer_for(&config)?);
            let outcome = if wait {
                cancellable(
                    &token,
                    actions.perform_and_wait(&name, Action::Take, Some(&space), &config.confirmation),
                )
                .await?
            } else {
                cancellable(&token, actions.take_space(&name, &space)).await?
            };
            Ok(report(&outcome))
        }
        Commands::Status { batch_id } => {
            let client = handle.client();
            let status =
                cancellable(&token, client.poll_status(&batch_id, client.wait_secs())).await?;
            Ok(report(&Outcome { batch_id, status }))
        }
        Commands::List => {
            let reader = handle.state_reader();
            let mut records = cancellable(&token, reader.list_family()).await?;
            records.sort_by_key(|r| r.name.to_lowercase());
            for record in &records {
                println!("{}", serde_json::to_string(record)?);
            }
            Ok(true)
        }
        Commands::Show { name } => {
            let reader = handle.state_reader();
            let record = cancellable(&token, reader.get_entity_by_name(&name)).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(true)
        }
        Commands::Keygen | Commands::Address { .. } => Ok(false),
    }
}

fn signer_for(config: &ClientConfig) -> Result<Signer, Box<dyn std::error::Error>> {
    Ok(Signer::from_env_var(&config.signer.private_key_env)?)
}

fn report(outcome: &Outcome) -> bool {
    println!("batch:  {}", outcome.batch_id);
    println!("status: {}", outcome.status.code());
    println!("{}", outcome.message());
    outcome.is_success()
}
