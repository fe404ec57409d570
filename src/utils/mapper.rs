use crate::models::employee::{Employee, EmployeeDetails};

/// Builds the list-view projection. Missing name parts count as empty text.
pub fn project(employee: &Employee) -> EmployeeDetails {
    EmployeeDetails {
        id: employee.id,
        full_name: format!(
            "{} {}",
            employee.first_name.as_deref().unwrap_or_default(),
            employee.last_name.as_deref().unwrap_or_default()
        ),
        email: employee.email.clone(),
    }
}
