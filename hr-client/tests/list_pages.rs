//! List page controllers against an in-process stub server

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use hr_client::page::{
    EmployeeAction, EmployeeFilter, EmployeesPage, ListController, LoadOutcome, MutateOutcome,
    PasswordFilter, PayrollAction, PayrollFilter, PayrollPage,
};
use hr_client::{ClientError, HrApi, Lang, NoticeBoard, NoticeLevel, OneshotHttpClient};
use serde_json::{Value, json};
use shared::models::PayrollStatus;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct Stub {
    employees: Vec<Value>,
    payrolls: Vec<Value>,
    fail_list: bool,
    writes: Vec<String>,
    payroll_queries: Vec<HashMap<String, String>>,
}

type Shared = Arc<Mutex<Stub>>;

async fn list_employees(State(stub): State<Shared>) -> Response {
    let stub = stub.lock().unwrap();
    if stub.fail_list {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "db down"}))).into_response();
    }
    Json(Value::Array(stub.employees.clone())).into_response()
}

async fn set_password(
    State(stub): State<Shared>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let mut stub = stub.lock().unwrap();
    stub.writes.push(format!("PUT {id} {}", body["password"]));
    for employee in stub.employees.iter_mut().filter(|e| e["id"] == id) {
        employee["has_password"] = json!(true);
    }
    Json(json!({"success": true, "message": "Password updated"}))
}

async fn remove_password(State(stub): State<Shared>, Path(id): Path<i64>) -> Json<Value> {
    let mut stub = stub.lock().unwrap();
    stub.writes.push(format!("DELETE {id}"));
    Json(json!({"success": true}))
}

async fn list_payrolls(
    State(stub): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let mut stub = stub.lock().unwrap();
    let records = stub
        .payrolls
        .iter()
        .filter(|p| query.get("status").is_none_or(|s| p["status"] == s.as_str()))
        .cloned()
        .collect();
    stub.payroll_queries.push(query);
    Json(Value::Array(records))
}

async fn approve_payroll(State(stub): State<Shared>, Path(id): Path<i64>) -> Json<Value> {
    let mut stub = stub.lock().unwrap();
    stub.writes.push(format!("APPROVE {id}"));
    for record in stub.payrolls.iter_mut().filter(|p| p["id"] == id) {
        record["status"] = json!("approved");
    }
    Json(json!({"success": true}))
}

fn router(stub: Shared) -> Router {
    Router::new()
        .route("/api/employees", get(list_employees))
        .route(
            "/api/employee/{id}/password",
            put(set_password).delete(remove_password),
        )
        .route("/api/payroll", get(list_payrolls))
        .route("/api/payroll/{id}/approve", post(approve_payroll))
        .with_state(stub)
}

fn employee(id: i64, name: &str, department: &str, has_password: bool) -> Value {
    json!({
        "id": id,
        "name": name,
        "code": format!("E-{id:02}"),
        "department": department,
        "active": true,
        "has_password": has_password,
    })
}

fn payroll(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "employee_id": 1,
        "month": 3,
        "year": 2025,
        "basic": 3000.0,
        "gross_salary": 3000.0,
        "total_deductions": 390.0,
        "net": 2610.0,
        "status": status,
    })
}

fn setup() -> (Shared, HrApi<OneshotHttpClient>, NoticeBoard) {
    let stub = Arc::new(Mutex::new(Stub {
        employees: vec![
            employee(1, "Ali Hassan", "Sales", false),
            employee(2, "Sara Omar", "HR", true),
        ],
        payrolls: vec![
            payroll(10, "pending"),
            payroll(11, "approved"),
            payroll(12, "paid"),
        ],
        ..Default::default()
    }));
    let api = HrApi::new(OneshotHttpClient::new(router(stub.clone())));
    (stub, api, NoticeBoard::default())
}

#[tokio::test]
async fn test_mutation_reloads_server_state() {
    let (stub, api, notices) = setup();
    let page = ListController::new(EmployeesPage, api, notices.clone(), Lang::En);
    assert_eq!(page.load().await.unwrap(), LoadOutcome::Applied(2));
    assert!(!page.items().await[0].has_password);

    let outcome = page
        .mutate(
            EmployeeAction::SetPassword {
                employee_id: 1,
                password: "1234".into(),
                confirmation: "1234".into(),
            },
            &|_: &str| true,
        )
        .await
        .unwrap();

    assert_eq!(outcome, MutateOutcome::Done);
    assert!(page.items().await[0].has_password);
    assert_eq!(stub.lock().unwrap().writes, vec![r#"PUT 1 "1234""#.to_string()]);
    let notice = notices.latest().unwrap();
    assert_eq!(notice.level, NoticeLevel::Success);
    assert_eq!(notice.message, "Password updated");
}

#[tokio::test]
async fn test_failed_load_keeps_cache() {
    let (stub, api, notices) = setup();
    let page = ListController::new(EmployeesPage, api, notices.clone(), Lang::En);
    page.load().await.unwrap();

    stub.lock().unwrap().fail_list = true;
    let err = page.load().await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 500, .. }));
    assert_eq!(page.items().await.len(), 2);
    assert!(page.is_loaded().await);

    let notice = notices.latest().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.message, "db down");
}

#[tokio::test]
async fn test_declined_confirmation_sends_nothing() {
    let (stub, api, notices) = setup();
    let page = ListController::new(EmployeesPage, api, notices.clone(), Lang::En);
    page.load().await.unwrap();

    let asked = AtomicUsize::new(0);
    let decline = |_: &str| {
        asked.fetch_add(1, Ordering::SeqCst);
        false
    };
    let outcome = page
        .mutate(EmployeeAction::RemovePassword { employee_id: 2 }, &decline)
        .await
        .unwrap();

    assert_eq!(outcome, MutateOutcome::Declined);
    assert_eq!(asked.load(Ordering::SeqCst), 1);
    assert!(stub.lock().unwrap().writes.is_empty());
    assert!(notices.latest().is_none());
}

#[tokio::test]
async fn test_invalid_input_sends_nothing() {
    let (stub, api, notices) = setup();
    let page = ListController::new(EmployeesPage, api, notices.clone(), Lang::En);

    let err = page
        .mutate(
            EmployeeAction::SetPassword {
                employee_id: 1,
                password: "1234".into(),
                confirmation: "4321".into(),
            },
            &|_: &str| true,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Validation(ref m) if m == "Passwords do not match"));
    assert!(stub.lock().unwrap().writes.is_empty());
}

#[tokio::test]
async fn test_filter_is_idempotent_and_never_fetches() {
    let (stub, api, notices) = setup();
    let page = ListController::new(EmployeesPage, api, notices, Lang::En);
    page.load().await.unwrap();
    stub.lock().unwrap().fail_list = true;

    let filter = EmployeeFilter {
        search: "sara".into(),
        department: Some("HR".into()),
        password: PasswordFilter::Set,
    };
    let once = page.set_filter(filter.clone()).await;
    let twice = page.set_filter(filter).await;
    assert_eq!(once.ids(), vec![2]);
    assert_eq!(once, twice);

    let none = page
        .update_filter(|f| f.password = PasswordFilter::NotSet)
        .await;
    assert!(none.is_empty());
    assert!(none.to_html().as_str().contains("No data available"));
}

#[tokio::test]
async fn test_payroll_actions_follow_status() {
    let (stub, api, notices) = setup();
    let page = ListController::new(PayrollPage::new(), api, notices, Lang::En);
    page.load().await.unwrap();

    let table = page.view().await;
    let pending = table.row(10).unwrap();
    assert!(pending.offers("edit") && pending.offers("approve") && pending.offers("delete"));
    assert!(!pending.offers("download"));
    let approved = table.row(11).unwrap();
    assert!(approved.offers("pay") && !approved.offers("edit"));
    let paid = table.row(12).unwrap();
    assert!(paid.offers("download"));
    assert!(!paid.offers("edit") && !paid.offers("delete"));

    page.mutate(PayrollAction::Approve(10), &|_: &str| true)
        .await
        .unwrap();
    assert_eq!(stub.lock().unwrap().writes, vec!["APPROVE 10".to_string()]);
    let row = page.view().await.row(10).cloned().unwrap();
    assert!(row.offers("pay"));
    assert!(!row.offers("approve"));
}

#[tokio::test]
async fn test_widening_payroll_scope_refetches() {
    let (stub, api, notices) = setup();
    let page = ListController::new(PayrollPage::new(), api, notices, Lang::En);
    let pending_only = PayrollFilter {
        status: Some(PayrollStatus::Pending),
        ..Default::default()
    };
    page.set_filter(pending_only.clone()).await;
    page.load().await.unwrap();
    assert_eq!(page.items().await.len(), 1);
    assert_eq!(stub.lock().unwrap().payroll_queries[0].get("status").map(String::as_str), Some("pending"));

    let all = page.set_filter(PayrollFilter::default()).await;
    assert_eq!(all.ids(), vec![10, 11, 12]);
    assert_eq!(stub.lock().unwrap().payroll_queries.len(), 2);

    // The search narrows the cache without asking the server
    let searched = page
        .update_filter(|f| f.search = "nobody".into())
        .await;
    assert!(searched.is_empty());
    let queries = stub.lock().unwrap().payroll_queries.clone();
    assert_eq!(queries.len(), 2);
    assert!(queries.iter().all(|q| !q.contains_key("search")));
}

#[tokio::test]
async fn test_newer_load_supersedes_older() {
    let gate = Arc::new(tokio::sync::Notify::new());
    let calls = Arc::new(AtomicUsize::new(0));
    let router = {
        let gate = gate.clone();
        let calls = calls.clone();
        Router::new().route(
            "/api/employees",
            get(move || {
                let gate = gate.clone();
                let call = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if call == 0 {
                        // First request hangs until released
                        gate.notified().await;
                        Json(json!([employee(1, "stale", "X", false)]))
                    } else {
                        Json(json!([employee(1, "fresh", "X", false), employee(2, "new", "X", false)]))
                    }
                }
            }),
        )
    };
    let api = HrApi::new(OneshotHttpClient::new(router));
    let page = ListController::new(EmployeesPage, api, NoticeBoard::default(), Lang::En);

    let first = tokio::spawn({
        let page = page.clone();
        async move { page.load().await }
    });
    while calls.load(Ordering::SeqCst) == 0 {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    assert_eq!(page.load().await.unwrap(), LoadOutcome::Applied(2));
    gate.notify_one();
    assert_eq!(first.await.unwrap().unwrap(), LoadOutcome::Superseded);

    let names: Vec<String> = page
        .items()
        .await
        .iter()
        .map(|e| e.display_name().to_string())
        .collect();
    assert_eq!(names, vec!["fresh", "new"]);
}
