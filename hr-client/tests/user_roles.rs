//! Paginated user-role assignments against an in-process stub server

use axum::extract::{Path, Query, State};
use axum::routing::{delete, get};
use axum::{Json, Router};
use hr_client::page::{MutateOutcome, PER_PAGE, UserRoleAction, UserRolesController};
use hr_client::{ClientError, HrApi, Lang, NoticeBoard, NoticeLevel, OneshotHttpClient};
use serde_json::{Value, json};
use shared::models::RoleAssignment;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Stub {
    queries: Vec<HashMap<String, String>>,
    writes: Vec<String>,
    reject_removal: bool,
}

type Shared = Arc<Mutex<Stub>>;

async fn list(State(stub): State<Shared>, Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    let page: u32 = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    stub.lock().unwrap().queries.push(query);
    Json(json!({
        "user_roles": [
            {"user_id": page as i64 * 10, "username": format!("user-{page}"),
             "roles": [{"id": 3, "name": "hr", "name_en": "HR"}]},
        ],
        "total": 120,
        "pages": 3,
        "current_page": page,
    }))
}

async fn assign(State(stub): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    stub.lock().unwrap().writes.push(format!("POST {body}"));
    Json(json!({"success": true, "message": "Role assigned to user-1"}))
}

async fn remove(State(stub): State<Shared>, Path(id): Path<i64>) -> Json<Value> {
    let mut stub = stub.lock().unwrap();
    stub.writes.push(format!("DELETE {id}"));
    if stub.reject_removal {
        return Json(json!({"success": false, "error": "Cannot remove the last admin"}));
    }
    Json(json!({"success": true}))
}

fn controller(stub: Shared) -> (UserRolesController<OneshotHttpClient>, NoticeBoard) {
    let router = Router::new()
        .route("/api/user-roles", get(list).post(assign))
        .route("/api/user-roles/{id}", delete(remove))
        .with_state(stub);
    let notices = NoticeBoard::default();
    let controller = UserRolesController::new(
        HrApi::new(OneshotHttpClient::new(router)),
        notices.clone(),
        Lang::En,
    );
    (controller, notices)
}

fn param<'a>(query: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    query.get(key).map(String::as_str)
}

#[tokio::test]
async fn test_search_restarts_at_first_page() {
    let stub: Shared = Arc::default();
    let (controller, _) = controller(stub.clone());

    controller.load().await.unwrap();
    controller.go_to(3).await.unwrap();
    assert_eq!(controller.window().await.current, 3);
    assert_eq!(controller.entries().await[0].username, "user-3");

    controller.search("  ali ").await.unwrap();
    assert_eq!(controller.window().await.current, 1);

    let queries = stub.lock().unwrap().queries.clone();
    assert_eq!(queries.len(), 3);
    let per_page = PER_PAGE.to_string();
    assert_eq!(param(&queries[0], "per_page"), Some(per_page.as_str()));
    assert_eq!(param(&queries[0], "search"), None);
    assert_eq!(param(&queries[1], "page"), Some("3"));
    assert_eq!(param(&queries[2], "page"), Some("1"));
    assert_eq!(param(&queries[2], "search"), Some("ali"));
}

#[tokio::test]
async fn test_pager_window_follows_server_page() {
    let stub: Shared = Arc::default();
    let (controller, _) = controller(stub);
    controller.go_to(2).await.unwrap();

    let window = controller.window().await;
    assert_eq!(window.numbers(), 1..=3);
    assert!(window.has_previous() && window.has_next());
    let html = controller.render().await.into_string();
    assert!(html.contains("user-2"));
    assert!(html.contains("pagination"));
}

#[tokio::test]
async fn test_declined_remove_sends_nothing() {
    let stub: Shared = Arc::default();
    let (controller, notices) = controller(stub.clone());
    controller.load().await.unwrap();

    let asked = AtomicUsize::new(0);
    let decline = |_: &str| {
        asked.fetch_add(1, Ordering::SeqCst);
        false
    };
    let outcome = controller
        .mutate(UserRoleAction::Remove { id: 5 }, &decline)
        .await
        .unwrap();

    assert_eq!(outcome, MutateOutcome::Declined);
    assert_eq!(asked.load(Ordering::SeqCst), 1);
    assert!(stub.lock().unwrap().writes.is_empty());
    assert!(notices.latest().is_none());
}

#[tokio::test]
async fn test_invalid_assignment_sends_nothing() {
    let stub: Shared = Arc::default();
    let (controller, notices) = controller(stub.clone());

    for (user_id, role_id) in [(0, 3), (-1, 3), (4, 0)] {
        let action = UserRoleAction::Assign(RoleAssignment {
            user_id,
            role_id,
            is_primary: false,
        });
        let err = controller.mutate(action, &|_: &str| true).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(ref m) if m == "Select a user and a role"));
    }

    assert!(stub.lock().unwrap().writes.is_empty());
    assert_eq!(notices.latest().unwrap().level, NoticeLevel::Error);
}

#[tokio::test]
async fn test_assign_reloads_and_shows_server_message() {
    let stub: Shared = Arc::default();
    let (controller, notices) = controller(stub.clone());
    controller.load().await.unwrap();

    let action = UserRoleAction::Assign(RoleAssignment {
        user_id: 4,
        role_id: 3,
        is_primary: true,
    });
    let outcome = controller.mutate(action, &|_: &str| true).await.unwrap();

    assert_eq!(outcome, MutateOutcome::Done);
    let stub = stub.lock().unwrap();
    assert_eq!(
        stub.writes,
        vec![format!("POST {}", json!({"user_id": 4, "role_id": 3, "is_primary": true}))]
    );
    assert_eq!(stub.queries.len(), 2);
    let notice = notices.latest().unwrap();
    assert_eq!(notice.level, NoticeLevel::Success);
    assert_eq!(notice.message, "Role assigned to user-1");
}

#[tokio::test]
async fn test_rejected_removal_becomes_notice() {
    let stub: Shared = Arc::new(Mutex::new(Stub {
        reject_removal: true,
        ..Default::default()
    }));
    let (controller, notices) = controller(stub.clone());
    controller.load().await.unwrap();

    let err = controller
        .mutate(UserRoleAction::Remove { id: 5 }, &|_: &str| true)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Rejected(_)));
    assert_eq!(stub.lock().unwrap().writes, vec!["DELETE 5".to_string()]);
    // No reload after a failed mutation
    assert_eq!(stub.lock().unwrap().queries.len(), 1);
    assert_eq!(notices.latest().unwrap().message, "Cannot remove the last admin");
}
