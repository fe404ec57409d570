use serde::Serialize;
use thiserror::Error;

use crate::models::employee::Employee;
use crate::utils::fields::EmployeeField;
use crate::utils::serialization::{self, SerializationError};

#[derive(Error, Debug)]
pub enum RoundTripError {
    #[error("Employee data is null.")]
    InvalidArgument,
    #[error("Serialization failed: {0}")]
    Encode(#[source] SerializationError),
    #[error("JSON deserialization failed.")]
    JsonDecode(#[source] SerializationError),
    #[error("XML deserialization failed.")]
    XmlDecode(#[source] SerializationError),
    #[error("Deserialized JSON employee does not match the original.")]
    JsonMismatch { fields: Vec<EmployeeField> },
    #[error("Deserialized XML employee does not match the original.")]
    XmlMismatch { fields: Vec<EmployeeField> },
}

/// Everything produced while pushing one employee through both codecs.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RoundTrip {
    pub original_employee: Employee,
    pub serialized_json: String,
    pub serialized_xml: String,
    pub deserialized_employee_from_json: Employee,
    pub deserialized_employee_from_xml: Employee,
}

/// Properties whose values differ between `a` and `b`, in declared order.
pub fn differing_fields(a: &Employee, b: &Employee) -> Vec<EmployeeField> {
    EmployeeField::ALL
        .into_iter()
        .filter(|field| field.get(a) != field.get(b))
        .collect()
}

/// Property-by-property equality. An absent side never compares equal.
pub fn equals(a: Option<&Employee>, b: Option<&Employee>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => differing_fields(a, b).is_empty(),
        _ => false,
    }
}

pub fn verify_round_trip(employee: Option<&Employee>) -> Result<RoundTrip, RoundTripError> {
    let employee = employee.ok_or(RoundTripError::InvalidArgument)?;

    let json = serialization::to_json(employee).map_err(RoundTripError::Encode)?;
    let xml = serialization::to_xml(Some(employee)).map_err(RoundTripError::Encode)?;

    let from_json = serialization::from_json(&json).map_err(RoundTripError::JsonDecode)?;
    let from_xml = serialization::from_xml(&xml).map_err(RoundTripError::XmlDecode)?;

    let fields = differing_fields(employee, &from_json);
    if !fields.is_empty() {
        return Err(RoundTripError::JsonMismatch { fields });
    }
    let fields = differing_fields(employee, &from_xml);
    if !fields.is_empty() {
        return Err(RoundTripError::XmlMismatch { fields });
    }

    Ok(RoundTrip {
        original_employee: employee.clone(),
        serialized_json: json,
        serialized_xml: xml,
        deserialized_employee_from_json: from_json,
        deserialized_employee_from_xml: from_xml,
    })
}
