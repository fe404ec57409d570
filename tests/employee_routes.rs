use std::sync::Arc;

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use async_trait::async_trait;
use serde_json::{json, Value};

use orgmanager_backend::db::{EmployeeStore, InMemoryEmployeeStore, StoreError};
use orgmanager_backend::handlers;
use orgmanager_backend::models::employee::{Employee, EmployeeRow};
use orgmanager_backend::utils::serialization::to_json;

macro_rules! init_app {
    ($store:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::from($store.clone()))
                .configure(handlers::configure),
        )
        .await
    };
}

fn memory_store() -> Arc<dyn EmployeeStore> {
    Arc::new(InMemoryEmployeeStore::new())
}

fn ada_form() -> Vec<(&'static str, &'static str)> {
    vec![
        ("firstName", "Ada"),
        ("lastName", "Lovelace"),
        ("dateOfBirth", "1815-12-10"),
        ("email", "ada@x.com"),
    ]
}

/// Deletes the row and then reports a stale write, as if another request won.
struct DeletedDuringEdit(InMemoryEmployeeStore);

#[async_trait]
impl EmployeeStore for DeletedDuringEdit {
    async fn list(&self) -> Result<Vec<EmployeeRow>, StoreError> {
        self.0.list().await
    }
    async fn find(&self, id: i32) -> Result<Option<EmployeeRow>, StoreError> {
        self.0.find(id).await
    }
    async fn insert(&self, employee: &Employee) -> Result<EmployeeRow, StoreError> {
        self.0.insert(employee).await
    }
    async fn update(&self, employee: &Employee, _version: i32) -> Result<EmployeeRow, StoreError> {
        self.0.delete(employee.id).await?;
        Err(StoreError::Conflict { id: employee.id })
    }
    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        self.0.delete(id).await
    }
    async fn exists(&self, id: i32) -> Result<bool, StoreError> {
        self.0.exists(id).await
    }
}

#[actix_web::test]
async fn test_create_then_list_shows_projection() {
    let store = memory_store();
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/Employee/Create")
        .set_form(ada_form())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/Employee");

    let req = test::TestRequest::get().uri("/Employee").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        body,
        json!([{ "id": 1, "fullName": "Ada Lovelace", "email": "ada@x.com" }])
    );

    let stored = store.find(1).await.unwrap().unwrap();
    assert_eq!(stored.date_of_birth.to_string(), "1815-12-10 00:00:00");
}

#[actix_web::test]
async fn test_index_alias_and_blank_create_form() {
    let app = init_app!(memory_store());

    let req = test::TestRequest::get().uri("/Employee/Index").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!([]));

    let req = test::TestRequest::get().uri("/Employee/Create").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["id"], 0);
    assert_eq!(body["firstName"], Value::Null);
    assert_eq!(body["dateOfBirth"], "0001-01-01T00:00:00");
}

#[actix_web::test]
async fn test_create_ignores_posted_id() {
    let store = memory_store();
    let app = init_app!(store);

    let mut form = ada_form();
    form.push(("id", "77"));
    let req = test::TestRequest::post()
        .uri("/Employee/Create")
        .set_form(form)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FOUND);
    assert!(store.find(77).await.unwrap().is_none());
    assert!(store.find(1).await.unwrap().is_some());
}

#[actix_web::test]
async fn test_create_rejects_invalid_email_and_echoes_form() {
    let store = memory_store();
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/Employee/Create")
        .set_form([
            ("firstName", "Ada"),
            ("dateOfBirth", "1815-12-10"),
            ("email", "not-an-email"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().starts_with("Validation failed"));
    assert_eq!(body["form"]["email"], "not-an-email");
    assert_eq!(body["form"]["firstName"], "Ada");
    assert!(store.list().await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_create_rejects_unreadable_date() {
    let app = init_app!(memory_store());

    let req = test::TestRequest::post()
        .uri("/Employee/Create")
        .set_form([("firstName", "Ada"), ("dateOfBirth", "yesterday")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("invalid dateOfBirth 'yesterday'"));
    assert_eq!(body["form"], json!({ "firstName": "Ada", "dateOfBirth": "yesterday" }));
}

#[actix_web::test]
async fn test_edit_rejects_unreadable_version_and_echoes_form() {
    let store = memory_store();
    let app = init_app!(store);
    store.insert(&Employee::default()).await.unwrap();

    let req = test::TestRequest::post()
        .uri("/Employee/Edit/1")
        .set_form([("id", "1"), ("dateOfBirth", "1990-01-01"), ("version", "v1")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["form"]["version"], "v1");
    assert_eq!(store.find(1).await.unwrap().unwrap().version, 1);
}

#[actix_web::test]
async fn test_edit_form_not_found_cases() {
    let app = init_app!(memory_store());

    for uri in ["/Employee/Edit/5", "/Employee/Edit/abc", "/Employee/Edit"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[actix_web::test]
async fn test_edit_updates_row_and_bumps_version() {
    let store = memory_store();
    let app = init_app!(store);
    store
        .insert(&Employee {
            first_name: Some("Ada".into()),
            ..Employee::default()
        })
        .await
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/Employee/Edit/1")
        .set_form([
            ("id", "1"),
            ("firstName", "Ada"),
            ("lastName", "King"),
            ("dateOfBirth", "1815-12-10T00:00"),
            ("email", ""),
            ("version", "1"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let req = test::TestRequest::get().uri("/Employee/Edit/1").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["lastName"], "King");
    assert_eq!(body["email"], Value::Null);
    assert_eq!(body["version"], 2);
}

#[actix_web::test]
async fn test_edit_with_mismatched_id_is_not_found() {
    let store = memory_store();
    let app = init_app!(store);
    store.insert(&Employee::default()).await.unwrap();

    let req = test::TestRequest::post()
        .uri("/Employee/Edit/1")
        .set_form([("id", "2"), ("dateOfBirth", "1990-01-01")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(store.find(1).await.unwrap().unwrap().version, 1);
}

#[actix_web::test]
async fn test_edit_missing_row_is_not_found() {
    let app = init_app!(memory_store());

    let req = test::TestRequest::post()
        .uri("/Employee/Edit/3")
        .set_form([("id", "3"), ("dateOfBirth", "1990-01-01")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_edit_with_stale_version_conflicts() {
    let store = memory_store();
    let app = init_app!(store);
    let row = store.insert(&Employee::default()).await.unwrap();
    store.update(&Employee::from(row), 1).await.unwrap();

    let req = test::TestRequest::post()
        .uri("/Employee/Edit/1")
        .set_form([
            ("id", "1"),
            ("firstName", "Late"),
            ("dateOfBirth", "1990-01-01"),
            ("version", "1"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(store.find(1).await.unwrap().unwrap().first_name, None);
}

#[actix_web::test]
async fn test_edit_of_row_deleted_meanwhile_is_not_found() {
    let inner = InMemoryEmployeeStore::new();
    inner.insert(&Employee::default()).await.unwrap();
    let store: Arc<dyn EmployeeStore> = Arc::new(DeletedDuringEdit(inner));
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/Employee/Edit/1")
        .set_form([("id", "1"), ("dateOfBirth", "1990-01-01")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_delete_flow() {
    let store = memory_store();
    let app = init_app!(store);
    store.insert(&Employee::default()).await.unwrap();

    let req = test::TestRequest::get().uri("/Employee/Delete/1").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post().uri("/Employee/Delete/1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(!store.exists(1).await.unwrap());

    let req = test::TestRequest::get().uri("/Employee/Delete/1").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_delete_unknown_id_redirects() {
    let app = init_app!(memory_store());

    let req = test::TestRequest::post().uri("/Employee/Delete/404").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/Employee");
}

#[actix_web::test]
async fn test_serialize_employee_with_birth_date_fails_json_check() {
    let app = init_app!(memory_store());

    let req = test::TestRequest::post()
        .uri("/Employee/SerializeEmployee")
        .set_json(json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@x.com",
            "dateOfBirth": "1815-12-10T00:00:00"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["error"],
        "Deserialized JSON employee does not match the original."
    );
}

#[actix_web::test]
async fn test_serialize_employee_without_birth_date_succeeds() {
    let app = init_app!(memory_store());

    let req = test::TestRequest::post()
        .uri("/Employee/SerializeEmployee")
        .set_json(json!({
            "id": 8,
            "firstName": "Grace",
            "lastName": "Hopper",
            "email_address": "grace@navy.mil"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["originalEmployee"]["email"], "grace@navy.mil");
    assert_eq!(body["deserializedEmployeeFromJson"], body["originalEmployee"]);
    assert_eq!(body["deserializedEmployeeFromXml"], body["originalEmployee"]);

    let json = body["serializedJson"].as_str().unwrap();
    assert!(json.contains("\"email_address\": \"grace@navy.mil\""));
    assert!(!json.contains("DateOfBirth"));
    let xml = body["serializedXml"].as_str().unwrap();
    assert!(xml.contains("<Email>grace@navy.mil</Email>"));
    assert!(xml.contains("<DateOfBirth>0001-01-01T00:00:00</DateOfBirth>"));
}

#[actix_web::test]
async fn test_serialize_employee_rejects_missing_body() {
    let app = init_app!(memory_store());

    let empty = test::TestRequest::post()
        .uri("/Employee/SerializeEmployee")
        .insert_header(header::ContentType::json())
        .set_payload("")
        .to_request();
    let null = test::TestRequest::post()
        .uri("/Employee/SerializeEmployee")
        .insert_header(header::ContentType::json())
        .set_payload("null")
        .to_request();

    for req in [empty, null] {
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Employee data is null.");
    }
}

#[actix_web::test]
async fn test_serialize_employee_keeps_padded_names() {
    let app = init_app!(memory_store());

    let req = test::TestRequest::post()
        .uri("/Employee/SerializeEmployee")
        .set_json(json!({ "id": 2, "firstName": "Ada ", "lastName": "   " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["deserializedEmployeeFromXml"]["firstName"], "Ada ");
    assert_eq!(body["deserializedEmployeeFromXml"]["lastName"], "   ");
}

#[actix_web::test]
async fn test_serialize_employee_binds_its_own_json_output() {
    let app = init_app!(memory_store());
    let employee = Employee {
        id: 5,
        first_name: Some("Ada".into()),
        last_name: Some("Lovelace".into()),
        email: Some("ada@x.com".into()),
        ..Employee::default()
    };

    let req = test::TestRequest::post()
        .uri("/Employee/SerializeEmployee")
        .insert_header(header::ContentType::json())
        .set_payload(to_json(&employee).unwrap())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["originalEmployee"],
        json!({
            "id": 5,
            "firstName": "Ada",
            "lastName": "Lovelace",
            "dateOfBirth": "0001-01-01T00:00:00",
            "email": "ada@x.com"
        })
    );
}

#[actix_web::test]
async fn test_serialize_employee_rejects_mistyped_fields() {
    let app = init_app!(memory_store());

    for payload in [json!({ "Id": "five" }), json!([1, 2])] {
        let req = test::TestRequest::post()
            .uri("/Employee/SerializeEmployee")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
