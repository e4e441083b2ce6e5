pub mod loan_ledger;
pub mod record_store;
mod rows;

use crate::ports::errors::StoreError;
use sqlx::PgPool;

pub use loan_ledger::PgTransaction;

/// RecordStore と LoanLedger のPostgreSQL実装
///
/// 貸出の変更は書籍と貸出の行を `FOR UPDATE` でロックするため、
/// 同じ書籍への同時操作はデータベースによって直列化される。
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// PostgreSQL接続プールからストアを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// 一意制約・外部キー制約の違反は Conflict、それ以外は Backend として扱う
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() || db_err.is_foreign_key_violation() {
                return StoreError::Conflict(db_err.message().to_string());
            }
        }
        StoreError::backend(err)
    }
}
