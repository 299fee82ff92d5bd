pub mod catalog;
pub mod dashboard;
pub mod enrollment;
pub mod models;
pub mod progress;
pub mod test_utils;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use util::config::AppConfig;

/// Connects to the configured SQLite database, creating the file if needed.
pub async fn connect() -> Result<DatabaseConnection, DbErr> {
    let path_or_url = AppConfig::global().database_path.clone();
    let url = if path_or_url.starts_with("sqlite:") {
        path_or_url
    } else {
        // SQLite won't create intermediate directories.
        if let Err(e) = util::paths::ensure_parent_dir(&path_or_url) {
            tracing::warn!(path = %path_or_url, error = %e, "Could not create database directory");
        }
        format!("sqlite://{path_or_url}?mode=rwc")
    };

    let mut options = ConnectOptions::new(url);
    options.sqlx_logging(false);
    Database::connect(options).await
}
