use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{EmployeeStore, StoreError};
use crate::models::employee::{Employee, EmployeeRow};

#[derive(Default)]
struct Table {
    rows: BTreeMap<i32, EmployeeRow>,
    last_id: i32,
}

/// Process-local store used when no database is configured, and by tests.
#[derive(Default)]
pub struct InMemoryEmployeeStore {
    table: RwLock<Table>,
}

impl InMemoryEmployeeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmployeeStore for InMemoryEmployeeStore {
    async fn list(&self) -> Result<Vec<EmployeeRow>, StoreError> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn find(&self, id: i32) -> Result<Option<EmployeeRow>, StoreError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn insert(&self, employee: &Employee) -> Result<EmployeeRow, StoreError> {
        let mut table = self.table.write().await;
        table.last_id += 1;
        let row = EmployeeRow {
            id: table.last_id,
            first_name: employee.first_name.clone(),
            last_name: employee.last_name.clone(),
            date_of_birth: employee.date_of_birth,
            email: employee.email.clone(),
            version: 1,
        };
        table.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        employee: &Employee,
        expected_version: i32,
    ) -> Result<EmployeeRow, StoreError> {
        let mut table = self.table.write().await;
        let row = table
            .rows
            .get_mut(&employee.id)
            .filter(|row| row.version == expected_version)
            .ok_or(StoreError::Conflict { id: employee.id })?;
        row.first_name = employee.first_name.clone();
        row.last_name = employee.last_name.clone();
        row.date_of_birth = employee.date_of_birth;
        row.email = employee.email.clone();
        row.version += 1;
        Ok(row.clone())
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }

    async fn exists(&self, id: i32) -> Result<bool, StoreError> {
        Ok(self.table.read().await.rows.contains_key(&id))
    }
}
