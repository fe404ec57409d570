use async_trait::async_trait;
use sqlx::PgPool;

use super::{EmployeeStore, StoreError};
use crate::models::employee::{Employee, EmployeeRow};

#[derive(Clone)]
pub struct PgEmployeeStore {
    pool: PgPool,
}

impl PgEmployeeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeStore for PgEmployeeStore {
    async fn list(&self) -> Result<Vec<EmployeeRow>, StoreError> {
        let rows = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT id, first_name, last_name, date_of_birth, email, version
            FROM employees
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find(&self, id: i32) -> Result<Option<EmployeeRow>, StoreError> {
        let row = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT id, first_name, last_name, date_of_birth, email, version
            FROM employees
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert(&self, employee: &Employee) -> Result<EmployeeRow, StoreError> {
        let row = sqlx::query_as::<_, EmployeeRow>(
            r#"
            INSERT INTO employees (first_name, last_name, date_of_birth, email)
            VALUES ($1, $2, $3, $4)
            RETURNING id, first_name, last_name, date_of_birth, email, version
            "#,
        )
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(employee.date_of_birth)
        .bind(&employee.email)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(
        &self,
        employee: &Employee,
        expected_version: i32,
    ) -> Result<EmployeeRow, StoreError> {
        sqlx::query_as::<_, EmployeeRow>(
            r#"
            UPDATE employees
            SET first_name = $1, last_name = $2, date_of_birth = $3, email = $4,
                version = version + 1
            WHERE id = $5 AND version = $6
            RETURNING id, first_name, last_name, date_of_birth, email, version
            "#,
        )
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(employee.date_of_birth)
        .bind(&employee.email)
        .bind(employee.id)
        .bind(expected_version)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::Conflict { id: employee.id })
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, id: i32) -> Result<bool, StoreError> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM employees WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}
