mod memory;
mod postgres;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;

use crate::models::employee::{Employee, EmployeeRow};

pub use memory::InMemoryEmployeeStore;
pub use postgres::PgEmployeeStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The row changed or disappeared since `version` was read.
    #[error("stale write on employee {id}")]
    Conflict { id: i32 },
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Persistence for employee rows.
///
/// `insert` ignores `employee.id` and assigns a fresh one. `update` only
/// succeeds when the stored version still equals `expected_version`, and
/// bumps it.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn list(&self) -> Result<Vec<EmployeeRow>, StoreError>;
    async fn find(&self, id: i32) -> Result<Option<EmployeeRow>, StoreError>;
    async fn insert(&self, employee: &Employee) -> Result<EmployeeRow, StoreError>;
    async fn update(
        &self,
        employee: &Employee,
        expected_version: i32,
    ) -> Result<EmployeeRow, StoreError>;
    /// Returns whether a row was removed.
    async fn delete(&self, id: i32) -> Result<bool, StoreError>;
    async fn exists(&self, id: i32) -> Result<bool, StoreError>;
}

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
