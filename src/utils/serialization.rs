//! JSON and XML codecs for [`Employee`].
//!
//! The two encodings deliberately disagree. JSON drops `DateOfBirth` and
//! writes `Email` as `email_address`; XML keeps every property under its
//! declared name. The round-trip check depends on both rules.

use chrono::NaiveDateTime;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::employee::Employee;
use crate::utils::fields::{EmployeeField, FieldValue};

#[derive(Error, Debug)]
pub enum SerializationError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("JSON document is not an object")]
    NotAnObject,
    #[error("Value for {field} is not {expected}")]
    TypeMismatch {
        field: EmployeeField,
        expected: &'static str,
    },
    #[error("Malformed XML: {0}")]
    Xml(String),
}

/// JSON key for a property, or `None` when the property is left out of JSON.
pub fn json_key(field: EmployeeField) -> Option<&'static str> {
    match field {
        EmployeeField::DateOfBirth => None,
        EmployeeField::Email => Some("email_address"),
        other => Some(other.name()),
    }
}

pub fn to_json(employee: &Employee) -> Result<String, SerializationError> {
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::pretty(&mut out);
    let mut map = (&mut serializer).serialize_map(None)?;
    for field in EmployeeField::ALL {
        if let Some(key) = json_key(field) {
            map.serialize_entry(key, &field.get(employee))?;
        }
    }
    map.end()?;
    // serde_json only ever writes UTF-8
    Ok(String::from_utf8_lossy(&out).into_owned())
}

pub fn from_json(json: &str) -> Result<Employee, SerializationError> {
    let Value::Object(object) = serde_json::from_str::<Value>(json)? else {
        return Err(SerializationError::NotAnObject);
    };
    decode_object(&object, |key| {
        EmployeeField::ALL
            .into_iter()
            .find(|field| json_key(*field).is_some_and(|name| name.eq_ignore_ascii_case(key)))
    })
}

/// Binds a request body to an employee. Keys match case-insensitively on the
/// property name or its JSON key, so the output of [`to_json`] binds too.
/// A `null` body is no employee at all.
pub fn employee_from_body(body: &Value) -> Result<Option<Employee>, SerializationError> {
    match body {
        Value::Null => Ok(None),
        Value::Object(object) => decode_object(object, |key| {
            EmployeeField::ALL.into_iter().find(|field| {
                field.name().eq_ignore_ascii_case(key)
                    || json_key(*field).is_some_and(|name| name.eq_ignore_ascii_case(key))
            })
        })
        .map(Some),
        _ => Err(SerializationError::NotAnObject),
    }
}

fn decode_object(
    object: &Map<String, Value>,
    field_for: impl Fn(&str) -> Option<EmployeeField>,
) -> Result<Employee, SerializationError> {
    let mut employee = Employee::default();
    for (key, token) in object {
        if let Some(field) = field_for(key) {
            assign(&mut employee, field, json_value(field, token)?);
        }
    }
    Ok(employee)
}

/// Decoders build fresh instances, so they may set `Id` as well.
fn assign(employee: &mut Employee, field: EmployeeField, value: FieldValue) {
    match (field, value) {
        (EmployeeField::Id, FieldValue::Int(id)) => employee.id = id,
        (field, value) => {
            field.set(employee, value);
        }
    }
}

fn json_value(field: EmployeeField, token: &Value) -> Result<FieldValue, SerializationError> {
    let mismatch = |expected| SerializationError::TypeMismatch { field, expected };
    match field {
        EmployeeField::Id => {
            let id = match token {
                Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
                Value::String(s) => s.trim().parse::<i32>().ok(),
                _ => None,
            };
            id.map(FieldValue::Int).ok_or_else(|| mismatch("a 32-bit integer"))
        }
        EmployeeField::DateOfBirth => serde_json::from_value::<NaiveDateTime>(token.clone())
            .map(FieldValue::DateTime)
            .map_err(|_| mismatch("a date-time")),
        EmployeeField::FirstName | EmployeeField::LastName | EmployeeField::Email => {
            let text = match token {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                Value::Array(_) | Value::Object(_) => return Err(mismatch("text")),
            };
            Ok(FieldValue::Text(text))
        }
    }
}

const XML_ROOT: &str = "Employee";

#[derive(Serialize, Debug)]
#[serde(rename = "Employee", rename_all = "PascalCase")]
struct XmlEmployee<'a> {
    id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_name: Option<&'a str>,
    date_of_birth: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
}

impl<'a> From<&'a Employee> for XmlEmployee<'a> {
    fn from(employee: &'a Employee) -> Self {
        Self {
            id: employee.id,
            first_name: employee.first_name.as_deref(),
            last_name: employee.last_name.as_deref(),
            date_of_birth: employee.date_of_birth,
            email: employee.email.as_deref(),
        }
    }
}

fn xml_error(err: impl std::fmt::Display) -> SerializationError {
    SerializationError::Xml(err.to_string())
}

fn xml_field(name: &[u8]) -> Option<EmployeeField> {
    EmployeeField::ALL
        .into_iter()
        .find(|field| field.name().as_bytes() == name)
}

fn xml_value(field: EmployeeField, text: &str) -> Result<FieldValue, SerializationError> {
    let mismatch = |expected| SerializationError::TypeMismatch { field, expected };
    match field {
        EmployeeField::Id => text
            .trim()
            .parse::<i32>()
            .map(FieldValue::Int)
            .map_err(|_| mismatch("a 32-bit integer")),
        EmployeeField::DateOfBirth => text
            .trim()
            .parse::<NaiveDateTime>()
            .map(FieldValue::DateTime)
            .map_err(|_| mismatch("a date-time")),
        EmployeeField::FirstName | EmployeeField::LastName | EmployeeField::Email => {
            Ok(FieldValue::Text(Some(text.to_owned())))
        }
    }
}

pub fn to_xml(employee: Option<&Employee>) -> Result<String, SerializationError> {
    let employee = employee.ok_or(SerializationError::InvalidArgument("employee is absent"))?;
    quick_xml::se::to_string(&XmlEmployee::from(employee)).map_err(xml_error)
}

/// Reads an `<Employee>` document. Element text is taken verbatim, edge
/// whitespace included; an absent element leaves the property absent.
pub fn from_xml(xml: &str) -> Result<Employee, SerializationError> {
    if xml.is_empty() {
        return Err(SerializationError::InvalidArgument("xml is empty"));
    }
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut employee = Employee::default();
    let mut seen = Vec::new();
    let mut depth = 0usize;
    let mut closed = false;
    // property element being read, with its text so far
    let mut current: Option<(EmployeeField, String)> = None;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(start) => {
                depth += 1;
                let name = start.name();
                match depth {
                    1 if name.as_ref() == XML_ROOT.as_bytes() && !closed => {}
                    1 => return Err(xml_error("expected a single <Employee> root")),
                    2 => current = xml_field(name.as_ref()).map(|field| (field, String::new())),
                    _ => {
                        if let Some((field, _)) = &current {
                            return Err(xml_error(format!("unexpected markup inside <{}>", field)));
                        }
                    }
                }
            }
            Event::Empty(start) => match depth {
                0 => return Err(xml_error("<Employee> has no properties")),
                1 => {
                    if let Some(field) = xml_field(start.name().as_ref()) {
                        assign(&mut employee, field, xml_value(field, "")?);
                        seen.push(field);
                    }
                }
                _ => {
                    if let Some((field, _)) = &current {
                        return Err(xml_error(format!("unexpected markup inside <{}>", field)));
                    }
                }
            },
            Event::Text(text) => {
                if let Some((_, value)) = current.as_mut() {
                    value.push_str(&text.unescape().map_err(xml_error)?);
                }
            }
            Event::CData(data) => {
                if let Some((_, value)) = current.as_mut() {
                    value.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::End(_) => {
                match depth {
                    1 => closed = true,
                    2 => {
                        if let Some((field, text)) = current.take() {
                            assign(&mut employee, field, xml_value(field, &text)?);
                            seen.push(field);
                        }
                    }
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 || !closed {
        return Err(xml_error("unexpected end of document"));
    }
    for required in [EmployeeField::Id, EmployeeField::DateOfBirth] {
        if !seen.contains(&required) {
            return Err(xml_error(format!("missing element <{}>", required)));
        }
    }
    Ok(employee)
}
