use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use sea_orm::{ConnectionTrait, Database};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use server::config::AppConfig;
use server::http::{AppState, build_router};

async fn test_app() -> Router {
    let conn = Database::connect("sqlite::memory:").await.unwrap();
    bootstrap_sqlite(&conn).await;
    let state = AppState {
        pool: Arc::new(conn),
        config: Arc::new(AppConfig::default()),
    };
    build_router(state)
}

async fn bootstrap_sqlite(db: &sea_orm::DatabaseConnection) {
    for ddl in [
        r#"
        CREATE TABLE employees (
            id TEXT PRIMARY KEY,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            position TEXT NOT NULL,
            department TEXT NOT NULL
        );
        "#,
        r#"
        CREATE TABLE employee_reports (
            manager_id TEXT NOT NULL,
            report_id TEXT NOT NULL,
            ordinal INTEGER NOT NULL,
            PRIMARY KEY (manager_id, report_id)
        );
        "#,
        r#"
        CREATE TABLE compensations (
            id TEXT PRIMARY KEY,
            employee_id TEXT NOT NULL UNIQUE,
            salary TEXT NOT NULL,
            effective_date TEXT NOT NULL
        );
        "#,
    ] {
        db.execute_unprepared(ddl).await.unwrap();
    }
}

async fn request(
    app: &Router,
    method: &str,
    path: &str,
    body: Option<String>,
) -> (StatusCode, String) {
    let builder = Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    let request = match body {
        Some(body) => builder.body(Body::from(body)).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn create_employee(app: &Router, first_name: &str, report_ids: &[Uuid]) -> Value {
    let reports: Vec<String> = report_ids.iter().map(Uuid::to_string).collect();
    let payload = json!({
        "firstName": first_name,
        "lastName": "Example",
        "position": "Developer",
        "department": "Engineering",
        "directReports": reports,
    });
    let (status, body) = request(app, "POST", "/employee", Some(payload.to_string())).await;
    assert_eq!(status, StatusCode::CREATED, "body: {body}");
    serde_json::from_str(&body).unwrap()
}

fn id_of(employee: &Value) -> Uuid {
    employee["employeeId"].as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn employee_create_read_update_round_trip() {
    let app = test_app().await;

    let created = create_employee(&app, "John", &[]).await;
    let id = id_of(&created);
    assert_eq!(created["firstName"], "John");
    assert_eq!(created["position"], "Developer");

    let (status, body) = request(&app, "GET", &format!("/employee/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let read: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(read, created);

    let update = json!({
        "firstName": "John",
        "lastName": "Example",
        "position": "Development Manager",
        "department": "Engineering",
    });
    let (status, body) = request(
        &app,
        "PUT",
        &format!("/employee/{id}"),
        Some(update.to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let updated: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(id_of(&updated), id);
    assert_eq!(updated["position"], "Development Manager");
}

#[tokio::test]
async fn unknown_and_malformed_employee_ids_are_not_found() {
    let app = test_app().await;

    let (status, _) = request(&app, "GET", &format!("/employee/{}", Uuid::new_v4()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = request(&app, "GET", "/employee/Bad_Id", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = request(
        &app,
        "PUT",
        &format!("/employee/{}", Uuid::new_v4()),
        Some(json!({ "firstName": "Ghost" }).to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_with_unknown_report_reference_is_rejected() {
    let app = test_app().await;
    let payload = json!({
        "firstName": "John",
        "directReports": [Uuid::new_v4().to_string()],
    });
    let (status, body) = request(&app, "POST", "/employee", Some(payload.to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
}

#[tokio::test]
async fn reporting_structure_counts_shared_descendants_once() {
    let app = test_app().await;

    // A -> [B, C]; B -> [D]; C -> [D]: the diamond counts 3, not 4.
    let d = id_of(&create_employee(&app, "D", &[]).await);
    let b = id_of(&create_employee(&app, "B", &[d]).await);
    let c = id_of(&create_employee(&app, "C", &[d]).await);
    let a = id_of(&create_employee(&app, "A", &[b, c]).await);

    let (status, body) = request(
        &app,
        "GET",
        &format!("/employee/{a}/reporting-structure"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let structure: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(structure["numberOfReports"], json!(3));
    assert_eq!(id_of(&structure["employee"]), a);
}

#[tokio::test]
async fn reporting_structure_for_a_leaf_is_zero() {
    let app = test_app().await;
    let id = id_of(&create_employee(&app, "Paul", &[]).await);

    let (status, body) = request(
        &app,
        "GET",
        &format!("/employee/{id}/reporting-structure"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let structure: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(structure["numberOfReports"], json!(0));
}

#[tokio::test]
async fn compensation_create_read_and_conflict() {
    let app = test_app().await;
    let id = id_of(&create_employee(&app, "Pete", &[]).await);

    // Raw body keeps the decimal text exact; no f64 on the way in.
    let body = r#"{"salary":200000.00,"effectiveDate":"2024-03-01"}"#;
    let (status, created) = request(
        &app,
        "POST",
        &format!("/employee/{id}/compensation"),
        Some(body.to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "body: {created}");
    assert!(
        created.contains("\"salary\":200000.00"),
        "salary lost precision: {created}"
    );

    let (status, second) = request(
        &app,
        "POST",
        &format!("/employee/{id}/compensation"),
        Some(r#"{"salary":999999.99,"effectiveDate":"2024-04-01"}"#.to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT, "body: {second}");

    // The original record is still the one served.
    let (status, read) = request(&app, "GET", &format!("/employee/{id}/compensation"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(read.contains("\"salary\":200000.00"), "body: {read}");
    assert!(read.contains("\"effectiveDate\":\"2024-03-01\""), "body: {read}");
}

#[tokio::test]
async fn compensation_endpoints_for_unknown_employee_are_not_found() {
    let app = test_app().await;
    let missing = Uuid::new_v4();

    let (status, _) = request(
        &app,
        "POST",
        &format!("/employee/{missing}/compensation"),
        Some(r#"{"salary":100.00,"effectiveDate":"2024-03-01"}"#.to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = request(
        &app,
        "GET",
        &format!("/employee/{missing}/compensation"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn compensation_read_without_record_is_not_found() {
    let app = test_app().await;
    let id = id_of(&create_employee(&app, "George", &[]).await);

    let (status, body) = request(&app, "GET", &format!("/employee/{id}/compensation"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let err: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(err["code"], "NOT_FOUND");
}

#[tokio::test]
async fn nested_reports_are_materialized_on_read() {
    let app = test_app().await;

    let pete = id_of(&create_employee(&app, "Pete", &[]).await);
    let george = id_of(&create_employee(&app, "George", &[]).await);
    let ringo = id_of(&create_employee(&app, "Ringo", &[pete, george]).await);
    let paul = id_of(&create_employee(&app, "Paul", &[]).await);
    let john = id_of(&create_employee(&app, "John", &[paul, ringo]).await);

    let (status, body) = request(&app, "GET", &format!("/employee/{john}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let employee: Value = serde_json::from_str(&body).unwrap();
    let reports = employee["directReports"].as_array().unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(id_of(&reports[0]), paul);
    assert_eq!(id_of(&reports[1]), ringo);
    let nested = reports[1]["directReports"].as_array().unwrap();
    assert_eq!(nested.len(), 2);
    assert_eq!(id_of(&nested[0]), pete);

    let (status, body) = request(
        &app,
        "GET",
        &format!("/employee/{john}/reporting-structure"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let structure: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(structure["numberOfReports"], json!(4));
}
