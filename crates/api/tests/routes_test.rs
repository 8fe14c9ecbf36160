//! End-to-end tests driving the router with `oneshot` against a seeded
//! in-memory database.

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use hrm_api::{AppState, create_router};
use hrm_db::provisioning::seed_sample_org;
use hrm_db::{EmployeeRepository, Migrator};
use hrm_shared::types::{EmployeeId, TenantId};
use http_body_util::BodyExt;
use rstest::rstest;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use serde_json::{Value, json};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    db: DatabaseConnection,
    tenant_id: TenantId,
}

impl TestApp {
    async fn seeded() -> Self {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);
        let db = Database::connect(options)
            .await
            .expect("Failed to open in-memory database");
        Migrator::up(&db, None).await.expect("Failed to migrate");
        let summary = seed_sample_org(&db).await.expect("Failed to seed");

        Self {
            router: create_router(AppState::new(db.clone())),
            db,
            tenant_id: summary.tenant_id,
        }
    }

    async fn employee(&self, code: &str) -> EmployeeId {
        EmployeeRepository::new(self.db.clone())
            .find_by_code(self.tenant_id, code)
            .await
            .unwrap()
            .unwrap()
            .id
    }

    fn tenant_uri(&self, rest: &str) -> String {
        format!("/api/v1/tenants/{}{rest}", self.tenant_id)
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }
}

// ============================================================================
// Test: Health
// ============================================================================
#[tokio::test]
async fn test_health_reports_database() {
    let app = TestApp::seeded().await;
    let (status, body) = app.get("/api/v1/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], true);
}

// ============================================================================
// Test: Tenants and departments
// ============================================================================
#[tokio::test]
async fn test_tenant_lookup_and_unknown_tenant() {
    let app = TestApp::seeded().await;

    let (status, body) = app.get(&app.tenant_uri("")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slug"], "techcorp");

    let missing = format!("/api/v1/tenants/{}", TenantId::new());
    let (status, body) = app.get(&missing).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_duplicate_department_code_conflicts() {
    let app = TestApp::seeded().await;
    let (status, body) = app
        .send(
            Method::POST,
            &app.tenant_uri("/departments"),
            Some(json!({ "name": "Engineering Two", "code": "eng" })),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "CONFLICT");

    let (status, body) = app.get(&app.tenant_uri("/departments")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 5);
}

// ============================================================================
// Test: Employee directory and hierarchy
// ============================================================================
#[rstest]
#[case(1, 4, 4)]
#[case(3, 4, 2)]
#[case(2, 10, 0)]
#[tokio::test]
async fn test_employee_pagination(
    #[case] page: u32,
    #[case] per_page: u32,
    #[case] expected: usize,
) {
    let app = TestApp::seeded().await;
    let uri = app.tenant_uri(&format!("/employees?page={page}&per_page={per_page}"));
    let (status, body) = app.get(&uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), expected);
    assert_eq!(body["meta"]["total"], 10);
}

#[tokio::test]
async fn test_chain_and_reports() {
    let app = TestApp::seeded().await;
    let arjun = app.employee("EMP006").await;
    let ceo = app.employee("EMP001").await;

    let (status, body) = app
        .get(&app.tenant_uri(&format!("/employees/{arjun}/chain")))
        .await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["designation"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Engineering Manager", "CTO", "CEO"]);

    let (status, body) = app
        .get(&app.tenant_uri(&format!("/employees/{ceo}/reports")))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 9);
}

#[tokio::test]
async fn test_manager_change_rejects_cycle() {
    let app = TestApp::seeded().await;
    let ceo = app.employee("EMP001").await;
    let arjun = app.employee("EMP006").await;

    let (status, body) = app
        .send(
            Method::PUT,
            &app.tenant_uri(&format!("/employees/{ceo}/manager")),
            Some(json!({ "manager_id": arjun })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "CYCLE_DETECTED");

    // Moving a leaf is fine and shows up in the chain.
    let sneha = app.employee("EMP007").await;
    let (status, body) = app
        .send(
            Method::PUT,
            &app.tenant_uri(&format!("/employees/{sneha}/manager")),
            Some(json!({ "manager_id": arjun })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reporting_manager_id"], json!(arjun));

    let (_, chain) = app
        .get(&app.tenant_uri(&format!("/employees/{sneha}/chain")))
        .await;
    assert_eq!(chain.as_array().unwrap().len(), 4);
}

// ============================================================================
// Test: Expense lifecycle over HTTP
// ============================================================================
#[tokio::test]
async fn test_expense_item_status_is_one_way() {
    let app = TestApp::seeded().await;

    let (_, reports) = app.get(&app.tenant_uri("/expense-reports")).await;
    let report_id = reports[0]["id"].as_str().unwrap().to_string();
    let (status, detail) = app
        .get(&app.tenant_uri(&format!("/expense-reports/{report_id}")))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["total"], "11750.50");
    let item_id = detail["items"][0]["id"].as_str().unwrap().to_string();
    let uri = app.tenant_uri(&format!("/expense-items/{item_id}/status"));

    let (status, body) = app
        .send(Method::POST, &uri, Some(json!({ "status": "approved" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "approved");

    let (status, body) = app
        .send(Method::POST, &uri, Some(json!({ "status": "pending" })))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "INVALID_TRANSITION");

    let (status, body) = app
        .send(Method::POST, &uri, Some(json!({ "status": "archived" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_filed_report_uses_tenant_currency() {
    let app = TestApp::seeded().await;
    let sneha = app.employee("EMP007").await;

    let (status, body) = app
        .send(
            Method::POST,
            &app.tenant_uri("/expense-reports"),
            Some(json!({
                "employee_id": sneha,
                "title": "Conference",
                "items": [
                    { "category": "training", "description": "Ticket", "amount": "2999.00", "incurred_on": "2024-02-10" },
                    { "category": "meals", "description": "Lunch", "amount": "450.50", "incurred_on": "2024-02-10" }
                ]
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["currency"], "INR");
    assert_eq!(body["total"], "3449.50");
    assert_eq!(body["status"], "submitted");
    assert_eq!(body["items"].as_array().unwrap().len(), 2);

    let (_, mine) = app
        .get(&app.tenant_uri(&format!("/expense-reports?employee_id={sneha}")))
        .await;
    assert_eq!(mine.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_oversized_expense_amount_is_a_bad_request() {
    let app = TestApp::seeded().await;
    let sneha = app.employee("EMP007").await;

    let (status, body) = app
        .send(
            Method::POST,
            &app.tenant_uri("/expense-reports"),
            Some(json!({
                "employee_id": sneha,
                "title": "Typo",
                "items": [
                    { "category": "other", "description": "A", "amount": "50000000000000000000000000000", "incurred_on": "2024-02-10" },
                    { "category": "other", "description": "B", "amount": "50000000000000000000000000000", "incurred_on": "2024-02-10" }
                ]
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["message"].as_str().unwrap().contains("out of range"));

    let (_, mine) = app
        .get(&app.tenant_uri(&format!("/expense-reports?employee_id={sneha}")))
        .await;
    assert!(mine.as_array().unwrap().is_empty());
}

// ============================================================================
// Test: Case progress and timesheet status
// ============================================================================
#[tokio::test]
async fn test_onboarding_progress_cannot_regress() {
    let app = TestApp::seeded().await;
    let (_, cases) = app.get(&app.tenant_uri("/onboarding")).await;
    let case_id = cases[0]["id"].as_str().unwrap().to_string();
    let uri = app.tenant_uri(&format!("/onboarding/{case_id}/progress"));

    let (status, _) = app
        .send(Method::PUT, &uri, Some(json!({ "progress": 70 })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .send(Method::PUT, &uri, Some(json!({ "progress": 30 })))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "PROGRESS_REGRESSION");
}

#[tokio::test]
async fn test_offboarding_completion_requires_clearance() {
    let app = TestApp::seeded().await;
    let (_, cases) = app.get(&app.tenant_uri("/offboarding")).await;
    let case_id = cases[0]["id"].as_str().unwrap().to_string();
    let status_uri = app.tenant_uri(&format!("/offboarding/{case_id}/status"));
    let clearance_uri = app.tenant_uri(&format!("/offboarding/{case_id}/clearance"));

    let (status, _) = app
        .send(Method::POST, &status_uri, Some(json!({ "status": "in_progress" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .send(
            Method::PUT,
            &app.tenant_uri(&format!("/offboarding/{case_id}/progress")),
            Some(json!({ "progress": 100 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .send(Method::POST, &status_uri, Some(json!({ "status": "completed" })))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "CLEARANCE_PENDING");

    let (status, _) = app
        .send(Method::POST, &clearance_uri, Some(json!({ "item": "Parking pass" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .send(Method::POST, &clearance_uri, Some(json!({ "item": "it assets returned" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    let cleared = body["clearance"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|item| item["cleared"] == true)
        .count();
    assert_eq!(cleared, 1);
}

#[tokio::test]
async fn test_timesheet_listing_and_status() {
    let app = TestApp::seeded().await;
    let arjun = app.employee("EMP006").await;

    let (status, sheets) = app
        .get(&app.tenant_uri(&format!("/timesheets?employee_id={arjun}")))
        .await;
    assert_eq!(status, StatusCode::OK);
    let sheets = sheets.as_array().unwrap();
    assert_eq!(sheets.len(), 1);
    assert_eq!(sheets[0]["total_hours"], "37");

    let id = sheets[0]["id"].as_str().unwrap();
    let (status, body) = app
        .send(
            Method::POST,
            &app.tenant_uri(&format!("/timesheets/{id}/status")),
            Some(json!({ "status": "Submitted" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "submitted");
}

// ============================================================================
// Test: Benefits
// ============================================================================
#[tokio::test]
async fn test_enrollment_activation() {
    let app = TestApp::seeded().await;

    let (status, plans) = app.get(&app.tenant_uri("/benefit-plans")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(plans.as_array().unwrap().len(), 2);

    let (_, enrollments) = app.get(&app.tenant_uri("/enrollments")).await;
    let id = enrollments[0]["id"].as_str().unwrap();
    let uri = app.tenant_uri(&format!("/enrollments/{id}/status"));

    let (status, body) = app
        .send(Method::POST, &uri, Some(json!({ "status": "active" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "active");

    let (status, body) = app
        .send(Method::POST, &uri, Some(json!({ "status": "pending" })))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "INVALID_TRANSITION");
}
