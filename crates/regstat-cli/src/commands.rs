use std::sync::Arc;

use anyhow::Context;

use regstat_server::{CollectorConfig, CollectorServer};
use regstat_store::MongoStatsStore;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args).await,
        Command::CheckConfig(args) => cmd_check_config(args),
    }
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => CollectorConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => CollectorConfig::default(),
    };

    if let Some(bind) = args.bind {
        config.server.bind_addr = bind;
    }
    if let Some(route) = args.route {
        config.server.route = route;
    }
    if let Some(uri) = args.store_uri {
        config.store.uri = uri;
    }
    if let Some(database) = args.database {
        config.store.database = database;
    }
    if let Some(collection) = args.collection {
        config.store.collection = collection;
    }
    config.validate().context("invalid configuration")?;
    tracing::info!(
        bind = %config.server.bind_addr,
        route = %config.server.route,
        database = %config.store.database,
        collection = %config.store.collection,
        "starting collector"
    );

    let store = MongoStatsStore::connect(&config.store)
        .await
        .context("failed to connect to the document store")?;

    CollectorServer::new(config, Arc::new(store))
        .serve()
        .await
        .context("server terminated")
}

fn cmd_check_config(args: CheckConfigArgs) -> anyhow::Result<()> {
    let config = CollectorConfig::load(&args.config)
        .with_context(|| format!("failed to load {}", args.config.display()))?;
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
