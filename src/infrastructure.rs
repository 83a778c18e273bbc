pub mod hotel;

use std::{error::Error, str::FromStr, time::Duration};

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use tracing::{debug, info};

use crate::{
    domain::{hotel::UnknownCurrency, DataAccessError, ManagerError},
    Database,
};

const CREATE_TABLES: &str = include_str!("infrastructure/sql/create_tables.sql");
const DROP_TABLES: &str = include_str!("infrastructure/sql/drop_tables.sql");

type BoxError = Box<dyn Error + Send + Sync>;

impl From<sqlx::Error> for DataAccessError {
    fn from(value: sqlx::Error) -> Self {
        let wrap: fn(BoxError) -> Self = match &value {
            sqlx::Error::Configuration(_)
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => Self::ConnectionError,
            sqlx::Error::Database(e)
                if e.is_foreign_key_violation()
                    || e.is_unique_violation()
                    || e.is_check_violation() =>
            {
                Self::WriteError
            }
            sqlx::Error::Database(_) | sqlx::Error::Protocol(_) => Self::QueryError,
            sqlx::Error::RowNotFound
            | sqlx::Error::TypeNotFound { .. }
            | sqlx::Error::ColumnIndexOutOfBounds { .. }
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_) => Self::ReadError,
            _ => Self::ClientSideError,
        };
        wrap(Box::new(value))
    }
}

impl From<UnknownCurrency> for DataAccessError {
    fn from(value: UnknownCurrency) -> Self {
        DataAccessError::ReadError(Box::new(value))
    }
}

impl<E> From<sqlx::Error> for ManagerError<E>
where
    E: Error + 'static,
{
    fn from(value: sqlx::Error) -> Self {
        ManagerError::DataAccess(value.into())
    }
}

/// `database.url` への接続プールを開く。全接続で外部キー制約を有効にする
pub async fn connect(database: &Database) -> Result<SqlitePool, DataAccessError> {
    let options = SqliteConnectOptions::from_str(&database.url)?
        .create_if_missing(true)
        .foreign_keys(true);
    // an in-memory database lives as long as one of its connections
    let pool = SqlitePoolOptions::new()
        .max_connections(database.max_connections)
        .min_connections(1)
        .idle_timeout(None::<Duration>)
        .max_lifetime(None::<Duration>)
        .connect_with(options)
        .await?;
    info!("Connected to {}", database.url);
    Ok(pool)
}

/// `script` を `;` で区切った各文を単一トランザクションで実行する。
/// 区切りは単純な分割なので、文字列リテラルやトリガー本体に `;` を含むスクリプトには使えない
pub async fn execute_script(pool: &SqlitePool, script: &str) -> Result<(), DataAccessError> {
    let mut tx = pool.begin().await?;
    for statement in script.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        debug!("Executing: {}", statement);
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    Ok(())
}

pub async fn create_tables(pool: &SqlitePool) -> Result<(), DataAccessError> {
    execute_script(pool, CREATE_TABLES).await
}

pub async fn drop_tables(pool: &SqlitePool) -> Result<(), DataAccessError> {
    execute_script(pool, DROP_TABLES).await
}

/// 全テーブル作成済みの新しいインメモリデータベース
#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    let pool = connect(&Database::in_memory()).await.unwrap();
    create_tables(&pool).await.unwrap();
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn table_count(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('guest', 'room', 'accommodation')",
        )
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_drop_tables() {
        let pool = memory_pool().await;
        assert_eq!(table_count(&pool).await, 3);

        // idempotent
        create_tables(&pool).await.unwrap();
        assert_eq!(table_count(&pool).await, 3);

        drop_tables(&pool).await.unwrap();
        assert_eq!(table_count(&pool).await, 0);
    }

    #[tokio::test]
    async fn test_memory_pools_are_isolated() {
        let first = memory_pool().await;
        let second = connect(&Database::in_memory()).await.unwrap();
        assert_eq!(table_count(&first).await, 3);
        assert_eq!(table_count(&second).await, 0);
    }

    #[tokio::test]
    async fn test_failed_script_is_rolled_back() {
        let pool = connect(&Database::in_memory()).await.unwrap();
        let result = execute_script(
            &pool,
            "CREATE TABLE first (id INTEGER); CREATE TABLE broken (",
        )
        .await;
        assert!(matches!(result, Err(DataAccessError::QueryError(_))));
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM sqlite_master WHERE name = 'first'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_foreign_key_violation_is_write_error() {
        let pool = memory_pool().await;
        let error = sqlx::query(
            "INSERT INTO accommodation (guest_id, room_id, date_from, date_to, total_price_amount, total_price_currency) VALUES (1, 1, '2016-02-28', '2016-03-01', 0, 'CZK')",
        )
        .execute(&pool)
        .await
        .unwrap_err();
        assert!(matches!(
            DataAccessError::from(error),
            DataAccessError::WriteError(_)
        ));
    }

    #[test]
    fn test_row_not_found_is_read_error() {
        assert!(matches!(
            DataAccessError::from(sqlx::Error::RowNotFound),
            DataAccessError::ReadError(_)
        ));
        assert!(matches!(
            DataAccessError::from(sqlx::Error::PoolClosed),
            DataAccessError::ConnectionError(_)
        ));
    }
}
