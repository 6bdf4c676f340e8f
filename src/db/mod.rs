pub mod models;

pub use models::{
    find_checks_by_url, find_url_by_id, find_url_by_name, init_db, insert_check, insert_url,
    list_url_summaries, NewUrlCheck, Url, UrlCheck,
};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

use crate::config::Config;

/// Open the connection pool, creating the database file and its directory when needed.
pub async fn connect(config: &Config) -> anyhow::Result<SqlitePool> {
    let max_connections = if config.is_in_memory() {
        1
    } else {
        // Parse the database URL to extract the file path and ensure parent directory exists
        let db_path = config
            .database_url
            .strip_prefix("sqlite://")
            .or_else(|| config.database_url.strip_prefix("sqlite:"))
            .unwrap_or(&config.database_url);
        let db_path = db_path.split('?').next().unwrap_or(db_path);
        if let Some(parent) = std::path::Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        config.db_max_connections.max(1)
    };

    let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);

    let mut pool_options = SqlitePoolOptions::new().max_connections(max_connections);
    if config.is_in_memory() {
        // Dropping the only connection would drop the database with it.
        pool_options = pool_options.idle_timeout(None).max_lifetime(None);
    }

    let pool = pool_options.connect_with(options).await?;

    Ok(pool)
}
