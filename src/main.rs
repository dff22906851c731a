use anyhow::{Context, Result};
use clap::Parser;
use sqlx::{Pool, Sqlite};
use tracing_subscriber::EnvFilter;

use std::{path::Path, sync::Arc};

mod binding;
mod commands;
mod config;
mod controller;
mod db;
mod error;
mod import;
mod mapper;
mod models;
mod routes;
mod seed;
mod service;
mod validation;
mod view_models;

use commands::{Args, Commands};
use config::Config;
use controller::PersonController;
use routes::AppState;
use service::SqlitePersonService;

const DEFAULT_LOG_FILTER: &str = "recolhaki=info,tower_http=info";

async fn open_database(database_url: &str) -> Result<Pool<Sqlite>> {
    let pool = db::connect(database_url)
        .await
        .context("Could not connect to database")?;

    db::create_table(&pool)
        .await
        .context("Database error while creating people table")?;

    Ok(pool)
}

async fn serve(config: Config) -> Result<()> {
    tracing::info!("Setting up environment ({})", config.environment);

    let pool = open_database(&config.database_url).await?;
    let service = Arc::new(SqlitePersonService::new(pool));
    let state = AppState::new(PersonController::new(service), config.environment);
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Could not bind {}", config.bind))?;
    tracing::info!("Listening on http://{}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Could not listen for shutdown signal: {:?}", e);
        std::future::pending::<()>().await;
    }
}

async fn init_db(database_url: &str, reset: bool) -> Result<()> {
    let pool = db::connect(database_url)
        .await
        .context("Could not connect to database")?;

    if reset {
        db::create_empty_table(&pool)
            .await
            .context("Database error while resetting people table")?;
    } else {
        db::create_table(&pool)
            .await
            .context("Database error while creating people table")?;
    }

    tracing::info!("Database ready");

    Ok(())
}

async fn seed_people(database_url: &str, count: u32) -> Result<()> {
    let pool = open_database(database_url).await?;
    let service = SqlitePersonService::new(pool);

    seed::seed(&service, count)
        .await
        .context("Could not register collectors")?;

    Ok(())
}

async fn import_people(database_url: &str, file: &Path) -> Result<()> {
    let pool = open_database(database_url).await?;
    let service = Arc::new(SqlitePersonService::new(pool));

    let summary = import::import_csv(service, file)
        .await
        .with_context(|| format!("Could not import {}", file.display()))?;

    println!(
        "Imported {} collectors, skipped {} rows",
        summary.imported,
        summary.skipped()
    );
    if !summary.skipped_lines.is_empty() {
        println!("Skipped rows starting on lines {:?}", summary.skipped_lines);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; flags and the real environment still apply
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let cli = Args::parse();
    match cli.command {
        Some(Commands::Serve { bind, environment }) => {
            serve(Config::new(&cli.database_url, &bind, environment)?).await?
        }
        Some(Commands::InitDb { reset }) => init_db(&cli.database_url, reset).await?,
        Some(Commands::Seed { count }) => seed_people(&cli.database_url, count).await?,
        Some(Commands::Import { file }) => import_people(&cli.database_url, &file).await?,
        None => {
            println!("Run with --help to see instructions");
        }
    }

    Ok(())
}
