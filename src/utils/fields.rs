//! Named access to [`Employee`] properties.
//!
//! Handlers copy submitted values onto a fresh or stored employee one
//! property at a time through this table instead of assigning fields by hand.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

use crate::models::employee::Employee;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmployeeField {
    Id,
    FirstName,
    LastName,
    DateOfBirth,
    Email,
}

impl EmployeeField {
    /// Every property in declaration order.
    pub const ALL: [EmployeeField; 5] = [
        EmployeeField::Id,
        EmployeeField::FirstName,
        EmployeeField::LastName,
        EmployeeField::DateOfBirth,
        EmployeeField::Email,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EmployeeField::Id => "Id",
            EmployeeField::FirstName => "FirstName",
            EmployeeField::LastName => "LastName",
            EmployeeField::DateOfBirth => "DateOfBirth",
            EmployeeField::Email => "Email",
        }
    }

    /// `Id` belongs to the store and is never written through this table.
    pub fn is_writable(self) -> bool {
        !matches!(self, EmployeeField::Id)
    }

    pub fn get(self, employee: &Employee) -> FieldValue {
        match self {
            EmployeeField::Id => FieldValue::Int(employee.id),
            EmployeeField::FirstName => FieldValue::Text(employee.first_name.clone()),
            EmployeeField::LastName => FieldValue::Text(employee.last_name.clone()),
            EmployeeField::DateOfBirth => FieldValue::DateTime(employee.date_of_birth),
            EmployeeField::Email => FieldValue::Text(employee.email.clone()),
        }
    }

    /// Writes `value` when the property is writable and the value has the
    /// property's type. Returns whether anything was written.
    pub fn set(self, employee: &mut Employee, value: FieldValue) -> bool {
        if !self.is_writable() {
            return false;
        }
        match (self, value) {
            (EmployeeField::FirstName, FieldValue::Text(text)) => employee.first_name = text,
            (EmployeeField::LastName, FieldValue::Text(text)) => employee.last_name = text,
            (EmployeeField::DateOfBirth, FieldValue::DateTime(when)) => employee.date_of_birth = when,
            (EmployeeField::Email, FieldValue::Text(text)) => employee.email = text,
            _ => return false,
        }
        true
    }
}

impl fmt::Display for EmployeeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Employee has no property named '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for EmployeeField {
    type Err = UnknownField;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        EmployeeField::ALL
            .into_iter()
            .find(|field| field.name() == name)
            .ok_or_else(|| UnknownField(name.to_string()))
    }
}

/// A property value lifted out of an [`Employee`].
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i32),
    Text(Option<String>),
    DateTime(NaiveDateTime),
}

pub fn get_property(employee: &Employee, name: &str) -> Option<FieldValue> {
    name.parse::<EmployeeField>()
        .ok()
        .map(|field| field.get(employee))
}

/// Unknown names, read-only properties and mistyped values are ignored.
pub fn set_property(employee: &mut Employee, name: &str, value: FieldValue) {
    if let Ok(field) = name.parse::<EmployeeField>() {
        field.set(employee, value);
    }
}

pub fn property_exists(name: &str) -> bool {
    name.parse::<EmployeeField>().is_ok()
}

/// Copies every writable property of `source` onto `target`.
pub fn copy_properties(target: &mut Employee, source: &Employee) {
    for field in EmployeeField::ALL {
        if let Some(value) = get_property(source, field.name()) {
            set_property(target, field.name(), value);
        }
    }
}
