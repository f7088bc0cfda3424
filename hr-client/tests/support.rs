//! Manager queue and employee task board

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use hr_client::page::{
    AlwaysConfirm, ListController, ManagerQueuePage, QueueAction, QueueFilter, TaskAction,
    TaskBoard, spawn_poller,
};
use hr_client::{HrApi, Lang, NoticeBoard, NoticeLevel, OneshotHttpClient};
use serde_json::{Value, json};
use shared::models::{CaseStatus, ContactMethod, ManagerResponse, Priority};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct Stub {
    posts: Vec<(String, Value)>,
    notifications_down: bool,
    task_loads: AtomicUsize,
}

type Shared = Arc<Mutex<Stub>>;

async fn queue() -> Json<Value> {
    Json(json!({
        "complaints": [
            {"id": 1, "customer_phone": "0501", "customer_name": "Nora",
             "issue_description": "double charge", "status": "sent_to_manager",
             "priority": "urgent", "category": "billing"},
            {"id": 2, "customer_phone": "0502", "issue_description": "cannot log in",
             "status": "in_progress", "priority": "low", "category": "technical",
             "employee_action": "reset password"},
        ],
        "statistics": {"sent_to_manager": 1, "in_progress": 1}
    }))
}

async fn tasks(State(stub): State<Shared>) -> Json<Value> {
    stub.lock().unwrap().task_loads.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "new": [{"id": 5, "customer_phone": "0505", "issue_description": "slow",
                 "manager_response_date": "2025-01-02T10:00:00"}],
        "progress": [],
        "completed": [],
    }))
}

async fn record(State(stub): State<Shared>, Path(id): Path<i64>, Json(body): Json<Value>) -> Json<Value> {
    stub.lock().unwrap().posts.push((format!("case {id}"), body));
    Json(json!({"success": true}))
}

async fn notify(State(stub): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut stub = stub.lock().unwrap();
    if stub.notifications_down {
        return StatusCode::BAD_GATEWAY.into_response();
    }
    stub.posts.push(("notify".to_string(), body));
    Json(json!({"success": true})).into_response()
}

fn api(stub: Shared) -> HrApi<OneshotHttpClient> {
    let router = Router::new()
        .route("/api/support/manager/complaints", get(queue))
        .route("/api/support/manager/respond/{id}", post(record))
        .route("/api/support/employee/tasks", get(tasks))
        .route("/api/support/employee/resolve/{id}", post(record))
        .route("/api/notifications/send", post(notify))
        .route("/api/notifications/send-to-manager", post(notify))
        .with_state(stub);
    HrApi::new(OneshotHttpClient::new(router))
}

fn response(assigned_to: Option<i64>) -> ManagerResponse {
    ManagerResponse {
        manager_solution: "refund the duplicate".into(),
        manager_instructions: "call the customer first".into(),
        assigned_to,
        priority: Priority::Urgent,
    }
}

#[tokio::test]
async fn test_queue_statistics_and_filters() {
    let stub: Shared = Arc::default();
    let page = ListController::new(ManagerQueuePage::new(), api(stub), NoticeBoard::default(), Lang::En);
    page.load().await.unwrap();

    let stats = page.page().statistics();
    assert_eq!((stats.sent_to_manager, stats.in_progress), (1, 1));

    let table = page
        .set_filter(QueueFilter {
            status: Some(CaseStatus::InProgress),
            ..Default::default()
        })
        .await;
    assert_eq!(table.ids(), vec![2]);
    assert!(table.row(2).unwrap().offers("execution"));

    let urgent = page.set_filter(QueueFilter::default()).await;
    assert!(urgent.row(1).unwrap().offers("respond"));
    assert!(!urgent.row(1).unwrap().offers("execution"));
    assert!(urgent.to_html().as_str().contains("table-danger"));
}

#[tokio::test]
async fn test_response_notifies_the_assignee() {
    let stub: Shared = Arc::default();
    let notices = NoticeBoard::default();
    let page = ListController::new(ManagerQueuePage::new(), api(stub.clone()), notices.clone(), Lang::En);

    page.mutate(QueueAction::Respond { id: 1, response: response(Some(4)) }, &AlwaysConfirm)
        .await
        .unwrap();

    let posts = stub.lock().unwrap().posts.clone();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].0, "case 1");
    assert_eq!(posts[0].1["manager_solution"], "refund the duplicate");
    assert_eq!(
        posts[1],
        (
            "notify".to_string(),
            json!({
                "user_id": 4,
                "type": "manager_solution",
                "message": "تم إرسال حل من المدير للشكوى #1",
                "link": "/support/employee?complaint=1",
            })
        )
    );
    assert_eq!(notices.latest().unwrap().level, NoticeLevel::Success);
}

#[tokio::test]
async fn test_failed_notification_does_not_fail_the_response() {
    let stub: Shared = Arc::new(Mutex::new(Stub {
        notifications_down: true,
        ..Default::default()
    }));
    let notices = NoticeBoard::default();
    let page = ListController::new(ManagerQueuePage::new(), api(stub.clone()), notices.clone(), Lang::En);

    page.mutate(QueueAction::Respond { id: 1, response: response(Some(4)) }, &AlwaysConfirm)
        .await
        .unwrap();
    assert_eq!(stub.lock().unwrap().posts.len(), 1);
    assert_eq!(notices.latest().unwrap().message, "Response sent");
}

#[tokio::test]
async fn test_resolution_requires_confirmation_then_notifies_managers() {
    let stub: Shared = Arc::default();
    let notices = NoticeBoard::default();
    let board = TaskBoard::new(api(stub.clone()), notices.clone(), Lang::En);
    board.load().await.unwrap();
    assert_eq!(board.counts().await, (1, 0, 0));

    let resolve = |confirmed| TaskAction::Resolve {
        id: 5,
        employee_action: " restarted the router ".into(),
        contact_method: Some(ContactMethod::WhatsApp),
        customer_response: "works now".into(),
        resolution_details: "line reset".into(),
        confirmed,
    };

    assert!(board.mutate(resolve(false)).await.is_err());
    assert!(stub.lock().unwrap().posts.is_empty());

    board.mutate(resolve(true)).await.unwrap();
    let posts = stub.lock().unwrap().posts.clone();
    assert_eq!(posts[0].0, "case 5");
    assert_eq!(posts[0].1["employee_action"], "restarted the router");
    assert_eq!(posts[0].1["customer_contact_method"], "whatsapp");
    assert_eq!(posts[1].1["type"], "complaint_resolved");
    assert_eq!(posts[1].1["complaint_id"], 5);
    assert_eq!(notices.latest().unwrap().message, "Resolution recorded");
}

#[tokio::test(start_paused = true)]
async fn test_poller_refreshes_until_stopped() {
    let stub: Shared = Arc::default();
    let board = TaskBoard::new(api(stub.clone()), NoticeBoard::default(), Lang::En);
    let loads = || stub.lock().unwrap().task_loads.load(Ordering::SeqCst);

    let handle = spawn_poller(board.clone(), Duration::from_secs(20));
    tokio::time::sleep(Duration::from_secs(61)).await;
    assert_eq!(loads(), 3);

    handle.shutdown().await;
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(loads(), 3);
}
