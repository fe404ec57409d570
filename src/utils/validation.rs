use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

use crate::errors::AppError;

/// Runs the derived rules and echoes the submission back on failure.
pub fn validate_payload<T: Validate + Serialize>(payload: &T) -> Result<(), AppError> {
    payload.validate().map_err(|err| {
        let mut details = err
            .field_errors()
            .iter()
            .map(|(field, errs)| {
                let errors = errs
                    .iter()
                    .map(|e| format!("{}: {}", e.code, e.message.as_deref().unwrap_or("")))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}: [{}]", field, errors)
            })
            .collect::<Vec<_>>();
        details.sort();
        AppError::ValidationFailed {
            message: format!("Validation failed: {}", details.join("; ")),
            form: serde_json::to_value(payload).unwrap_or(serde_json::Value::Null),
        }
    })
}

pub fn validate_date_of_birth(date_of_birth: &NaiveDateTime) -> Result<(), ValidationError> {
    if *date_of_birth > Local::now().naive_local() {
        let mut err = ValidationError::new("future_date");
        err.message = Some("Date of birth cannot be in the future".into());
        return Err(err);
    }
    Ok(())
}

/// HTML forms post empty inputs as `""`; those bind as absent.
pub fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

const DATE_TIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

pub fn parse_form_date_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Accepts the shapes `<input type="date">` and `<input type="datetime-local">` post.
pub fn form_date_time<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_form_date_time(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid dateOfBirth '{}'", raw)))
}

/// Numeric form input; an empty input binds as absent.
pub fn form_optional_int<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<i32>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid number '{}'", raw))),
    }
}

pub fn form_int<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    form_optional_int(deserializer).map(Option::unwrap_or_default)
}
