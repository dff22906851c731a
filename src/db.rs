use std::str::FromStr;

use sqlx::{
    Pool, Sqlite,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};

use crate::error::Result;

pub async fn connect(database_url: &str) -> Result<Pool<Sqlite>> {
    tracing::info!("Connecting to database");

    let connect_options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal);

    if let Some(parent) = connect_options.get_filename().parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    // An in-memory database lives and dies with its connection
    let max_connections = if database_url.contains(":memory:") { 1 } else { 8 };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(connect_options)
        .await?;

    Ok(pool)
}

pub async fn create_table(pool: &Pool<Sqlite>) -> Result<()> {
    sqlx::query(
        r#"
    CREATE TABLE IF NOT EXISTS people (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            tax_id TEXT,
            name TEXT NOT NULL,
            email TEXT,
            street TEXT,
            postal_code INTEGER NOT NULL DEFAULT 0,
            number INTEGER NOT NULL DEFAULT 0,
            complement TEXT,
            city TEXT,
            neighborhood TEXT,
            state TEXT)"#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_empty_table(pool: &Pool<Sqlite>) -> Result<()> {
    tracing::info!("Creating empty people table");

    sqlx::query("DROP TABLE IF EXISTS people")
        .execute(pool)
        .await?;

    create_table(pool).await
}
