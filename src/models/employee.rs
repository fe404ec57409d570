use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Value an employee's date of birth holds until someone sets it.
pub fn unset_date_of_birth() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Request bodies bind through `utils::serialization::employee_from_body`,
/// which matches keys case-insensitively.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: i32,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: NaiveDateTime,
    pub email: Option<String>,
}

impl Default for Employee {
    fn default() -> Self {
        Self {
            id: 0,
            first_name: None,
            last_name: None,
            date_of_birth: unset_date_of_birth(),
            email: None,
        }
    }
}

/// An `employees` row: the employee plus its concurrency token.
#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRow {
    pub id: i32,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: NaiveDateTime,
    pub email: Option<String>,
    pub version: i32,
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            date_of_birth: row.date_of_birth,
            email: row.email,
        }
    }
}

/// Read-only projection shown on the employee list.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDetails {
    pub id: i32,
    pub full_name: String,
    pub email: Option<String>,
}
