//! StaffHub data console
//!
//! Runs data access adapter operations from the shell: resolve endpoints,
//! inspect filter normalization, and read or write documents through the
//! same envelope the UI hooks receive.

mod commands;
mod config;

use std::sync::Arc;

use clap::{CommandFactory, Parser};
use tracing::info;

use staffhub_datastore::backends::memory::MemoryStore;
use staffhub_datastore::core::DocumentStore;
use staffhub_datastore::endpoint::EndpointResolver;
use staffhub_datastore::seed::{SeedingStore, StaticSeedData};
use staffhub_datastore::{AdapterConfig, DataService};

use crate::commands::{is_failure, run};
use crate::config::{BackendKind, CliConfig, Command};

/// Initializes tracing with an env filter, writing to stderr.
fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("staffhub={},staffhub_datastore={}", level, level))
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Loads sample data from `--seed-file`, or none.
fn load_seed_data(config: &CliConfig) -> anyhow::Result<StaticSeedData> {
    match &config.seed_file {
        Some(path) => {
            info!(path = %path.display(), "Loading seed data");
            Ok(StaticSeedData::from_json_file(path)?)
        }
        None => Ok(StaticSeedData::new()),
    }
}

/// Wraps `store` in seeding and runs `command` through a data service.
async fn execute<S>(
    store: S,
    config: &CliConfig,
    resolver: Arc<EndpointResolver>,
    adapter_config: AdapterConfig,
    command: Command,
) -> anyhow::Result<serde_json::Value>
where
    S: DocumentStore,
{
    let seeding = adapter_config.seeding_enabled();
    let store = SeedingStore::new(store, load_seed_data(config)?).with_enabled(seeding);
    let service = DataService::new(store, resolver, adapter_config);
    run(&service, command).await
}

#[cfg(feature = "firestore")]
fn create_firestore_store(
    config: &CliConfig,
) -> anyhow::Result<staffhub_datastore::backends::firestore::FirestoreStore> {
    use staffhub_datastore::backends::firestore::{FirestoreConfig, FirestoreStore};

    let project = config
        .firestore_project
        .clone()
        .ok_or_else(|| anyhow::anyhow!("--firestore-project is required"))?;

    let mut firestore = FirestoreConfig::new(project).with_database(config.firestore_database.clone());
    if let Some(url) = &config.firestore_url {
        firestore = firestore.with_base_url(url.clone());
    }
    if let Some(token) = &config.firestore_token {
        firestore = firestore.with_bearer_token(token.clone());
    } else if let Some(key) = &config.firestore_api_key {
        firestore = firestore.with_api_key(key.clone());
    }

    info!(
        project = %firestore.project_id,
        database = %firestore.database_id,
        "Initializing Firestore backend"
    );
    Ok(FirestoreStore::new(firestore)?)
}

#[cfg(feature = "firestore")]
async fn run_firestore(
    config: &CliConfig,
    resolver: Arc<EndpointResolver>,
    adapter_config: AdapterConfig,
    command: Command,
) -> anyhow::Result<serde_json::Value> {
    let store = create_firestore_store(config)?;
    execute(store, config, resolver, adapter_config, command).await
}

/// Fallback when the firestore feature is not enabled.
#[cfg(not(feature = "firestore"))]
async fn run_firestore(
    _config: &CliConfig,
    _resolver: Arc<EndpointResolver>,
    _adapter_config: AdapterConfig,
    _command: Command,
) -> anyhow::Result<serde_json::Value> {
    anyhow::bail!(
        "The firestore backend requires the 'firestore' feature. \
         Build with: cargo build -p staffhub --features firestore"
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    let Some(command) = config.command.clone() else {
        CliConfig::command().print_help()?;
        return Ok(());
    };

    let resolver = Arc::new(config.resolver()?);
    let adapter_config = config.adapter_config();

    info!(
        backend = %config.backend,
        environment = %config.environment,
        "Starting StaffHub data console"
    );

    let output = match config.backend {
        BackendKind::Memory => {
            execute(MemoryStore::new(), &config, resolver, adapter_config, command).await?
        }
        BackendKind::Firestore => run_firestore(&config, resolver, adapter_config, command).await?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);

    if is_failure(&output) {
        std::process::exit(2);
    }
    Ok(())
}
