use std::collections::BTreeMap;

use actix_web::{http::header, web, HttpResponse};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::db::{EmployeeStore, StoreError};
use crate::errors::AppError;
use crate::models::employee::{Employee, EmployeeDetails};
use crate::utils::validation::{
    empty_string_as_none, form_date_time, form_int, form_optional_int, validate_date_of_birth,
    validate_payload,
};
use crate::utils::{fields, mapper, round_trip, serialization};

pub const INDEX_PATH: &str = "/Employee";

/// Fields posted by the create and edit forms.
#[derive(Deserialize, Serialize, Validate, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeForm {
    #[serde(default, deserialize_with = "form_int")]
    pub id: i32,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    #[serde(deserialize_with = "form_date_time")]
    #[validate(custom = "validate_date_of_birth")]
    pub date_of_birth: NaiveDateTime,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(email)]
    pub email: Option<String>,
    /// Concurrency token from the edit view; the stored one is used when absent.
    #[serde(default, deserialize_with = "form_optional_int")]
    pub version: Option<i32>,
}

/// Form fields exactly as posted.
pub type SubmittedForm = BTreeMap<String, String>;

impl EmployeeForm {
    /// Binds the posted fields. A value that cannot be read is a validation
    /// failure that echoes the submission back.
    pub fn bind(submitted: SubmittedForm) -> Result<Self, AppError> {
        let raw = Value::Object(
            submitted
                .into_iter()
                .map(|(name, value)| (name, Value::String(value)))
                .collect(),
        );
        serde_json::from_value(raw.clone()).map_err(|err| AppError::ValidationFailed {
            message: format!("Validation failed: {}", err),
            form: raw,
        })
    }

    fn to_employee(&self) -> Employee {
        Employee {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            date_of_birth: self.date_of_birth,
            email: self.email.clone(),
        }
    }
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Employee {} not found", id))
}

fn redirect_to_index() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, INDEX_PATH))
        .finish()
}

pub async fn index(store: web::Data<dyn EmployeeStore>) -> Result<HttpResponse, AppError> {
    let details = store
        .list()
        .await?
        .into_iter()
        .map(|row| mapper::project(&Employee::from(row)))
        .collect::<Vec<EmployeeDetails>>();

    Ok(HttpResponse::Ok().json(details))
}

pub async fn create_form() -> HttpResponse {
    HttpResponse::Ok().json(Employee::default())
}

pub async fn create(
    store: web::Data<dyn EmployeeStore>,
    form: web::Form<SubmittedForm>,
) -> Result<HttpResponse, AppError> {
    let form = EmployeeForm::bind(form.into_inner())?;
    validate_payload(&form)?;

    let mut employee = Employee::default();
    fields::copy_properties(&mut employee, &form.to_employee());

    let row = store.insert(&employee).await?;
    log::info!("Created employee {}", row.id);

    Ok(redirect_to_index())
}

pub async fn edit_form(
    store: web::Data<dyn EmployeeStore>,
    id: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();
    let row = store.find(id).await?.ok_or_else(|| not_found(id))?;
    Ok(HttpResponse::Ok().json(row))
}

pub async fn edit(
    store: web::Data<dyn EmployeeStore>,
    id: web::Path<i32>,
    form: web::Form<SubmittedForm>,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();
    let form = EmployeeForm::bind(form.into_inner())?;

    if form.id != id {
        return Err(not_found(id));
    }
    validate_payload(&form)?;

    let existing = store.find(id).await?.ok_or_else(|| not_found(id))?;
    let version = form.version.unwrap_or(existing.version);

    let mut employee = Employee::from(existing);
    fields::copy_properties(&mut employee, &form.to_employee());

    match store.update(&employee, version).await {
        Ok(row) => {
            log::info!("Updated employee {} to version {}", row.id, row.version);
            Ok(redirect_to_index())
        }
        Err(StoreError::Conflict { .. }) => {
            if !store.exists(id).await? {
                log::warn!("Employee {} was deleted during edit", id);
                return Err(not_found(id));
            }
            log::warn!("Stale write on employee {} at version {}", id, version);
            Err(StoreError::Conflict { id }.into())
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn delete_form(
    store: web::Data<dyn EmployeeStore>,
    id: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();
    let row = store.find(id).await?.ok_or_else(|| not_found(id))?;
    Ok(HttpResponse::Ok().json(row))
}

pub async fn delete(
    store: web::Data<dyn EmployeeStore>,
    id: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();
    if store.delete(id).await? {
        log::info!("Deleted employee {}", id);
    }
    Ok(redirect_to_index())
}

pub async fn serialize_employee(
    body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let employee = serialization::employee_from_body(&body)?;
    let result = round_trip::verify_round_trip(employee.as_ref())?;
    Ok(HttpResponse::Ok().json(result))
}
