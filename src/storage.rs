use sea_orm::{ConnectOptions, Database, DatabaseConnection, DatabaseTransaction, TransactionTrait};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::Result;

pub use crate::entities::ensure_schema;

/// Opens the pool described by `config` and makes sure the schema exists.
pub async fn connect(config: &Config) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(1)
        .connect_timeout(config.connect_timeout)
        .acquire_timeout(config.acquire_timeout)
        .sqlx_logging(config.sql_logging);

    let db = Database::connect(options).await?;
    ensure_schema(&db).await?;
    info!(url = %config.database_url, "database ready");
    Ok(db)
}

pub async fn begin(db: &DatabaseConnection) -> Result<DatabaseTransaction> {
    Ok(db.begin().await?)
}

/// Ends a unit of work: commits when `result` is `Ok`, rolls back otherwise.
/// A failed commit is reported as the operation's error.
pub async fn finish<T>(txn: DatabaseTransaction, result: Result<T>) -> Result<T> {
    match result {
        Ok(value) => {
            txn.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                warn!(error = %rollback_err, "rollback failed");
            }
            Err(err)
        }
    }
}
