pub mod employee;

use actix_web::web;

use crate::errors::AppError;

/// Registers the employee routes and the extractor error mapping.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::FormConfig::default().error_handler(|err, _req| {
        AppError::ValidationFailed {
            message: format!("Validation failed: {}", err),
            form: serde_json::Value::Null,
        }
        .into()
    }))
    .app_data(web::JsonConfig::default().error_handler(|err, _req| {
        log::debug!("Rejected employee payload: {}", err);
        AppError::BadRequest("Employee data is null.".to_string()).into()
    }))
    .service(
        web::resource(employee::INDEX_PATH)
            .route(web::get().to(employee::index)),
    )
    .service(
        web::resource("/Employee/Index")
            .route(web::get().to(employee::index)),
    )
    .service(
        web::resource("/Employee/Create")
            .route(web::get().to(employee::create_form))
            .route(web::post().to(employee::create)),
    )
    .service(
        web::resource("/Employee/Edit/{id}")
            .route(web::get().to(employee::edit_form))
            .route(web::post().to(employee::edit)),
    )
    .service(
        web::resource("/Employee/Delete/{id}")
            .route(web::get().to(employee::delete_form))
            .route(web::post().to(employee::delete)),
    )
    .service(
        web::resource("/Employee/SerializeEmployee")
            .route(web::post().to(employee::serialize_employee)),
    );
}
