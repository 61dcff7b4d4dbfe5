// SQLite Connection Pool Setup

use matchday_core::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

use crate::error::map_sqlx_error;

/// Create SQLite connection pool with WAL mode and foreign keys enforced
///
/// An in-memory database is private to its connection, so `:memory:` URLs
/// get a single-connection pool.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    let in_memory = database_url.contains(":memory:");
    let mut options = SqliteConnectOptions::from_str(database_url)
        .map_err(map_sqlx_error)?
        .busy_timeout(Duration::from_secs(5))
        .foreign_keys(true)
        .create_if_missing(true);
    if !in_memory {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    SqlitePoolOptions::new()
        .max_connections(if in_memory { 1 } else { 10 })
        .connect_with(options)
        .await
        .map_err(map_sqlx_error)
}

/// `sqlite://` URL for a database file path
pub fn database_url(path: &str) -> String {
    format!("sqlite://{}", path)
}
