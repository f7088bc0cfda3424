//! Employee task board
//!
//! Three columns (new, in progress, completed) from one endpoint. Executing
//! a task reports progress first, then a final resolution that notifies the
//! managers.

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use shared::Lang;
use shared::models::{Complaint, ContactMethod, EmployeeTasks, ManagerNotification, ProgressReport, ResolutionReport};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{
    LoadOutcome, Refresh, acknowledged, generic_failure_text, load_error_text, load_into, require,
};
use crate::api::HrApi;
use crate::client::HttpClient;
use crate::notify::NoticeBoard;
use crate::render::format::{date_time, time_ago, truncate};
use crate::render::{Html, HtmlBuilder, badge, labels};
use crate::request::RequestSlot;
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone)]
pub enum TaskAction {
    MarkInProgress {
        id: i64,
        report: ProgressReport,
    },
    Resolve {
        id: i64,
        employee_action: String,
        contact_method: Option<ContactMethod>,
        customer_response: String,
        resolution_details: String,
        /// The "problem is solved" checkbox
        confirmed: bool,
    },
}

/// Notification sent to managers once a case is resolved
pub fn resolution_notification(complaint_id: i64) -> ManagerNotification {
    ManagerNotification {
        kind: "complaint_resolved".to_string(),
        complaint_id,
        message: format!("تم حل الشكوى #{complaint_id} من قبل الموظف"),
    }
}

#[derive(Debug, Default)]
struct State {
    tasks: EmployeeTasks,
    loaded: bool,
}

/// Task board controller
pub struct TaskBoard<C> {
    api: HrApi<C>,
    state: Arc<RwLock<State>>,
    slot: RequestSlot,
    notices: NoticeBoard,
    lang: Lang,
}

impl<C> Clone for TaskBoard<C> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            state: Arc::clone(&self.state),
            slot: self.slot.clone(),
            notices: self.notices.clone(),
            lang: self.lang,
        }
    }
}

impl<C: HttpClient + 'static> TaskBoard<C> {
    pub fn new(api: HrApi<C>, notices: NoticeBoard, lang: Lang) -> Self {
        Self {
            api,
            state: Arc::new(RwLock::new(State::default())),
            slot: RequestSlot::new("employee_tasks"),
            notices,
            lang,
        }
    }

    pub async fn load(&self) -> ClientResult<LoadOutcome> {
        load_into(
            &self.slot,
            &self.notices,
            &load_error_text(self.lang),
            self.api.employee_tasks(),
            || self.state.write(),
            |state: &mut State, tasks: EmployeeTasks| {
                let count = tasks.new.len() + tasks.progress.len() + tasks.completed.len();
                state.tasks = tasks;
                state.loaded = true;
                Some(count)
            },
        )
        .await
    }

    pub async fn tasks(&self) -> EmployeeTasks {
        self.state.read().await.tasks.clone()
    }

    /// (new, in progress, completed)
    pub async fn counts(&self) -> (usize, usize, usize) {
        let state = self.state.read().await;
        (
            state.tasks.new.len(),
            state.tasks.progress.len(),
            state.tasks.completed.len(),
        )
    }

    pub fn validate(&self, action: &TaskAction) -> Result<(), String> {
        let lang = self.lang;
        match action {
            TaskAction::MarkInProgress { report, .. } => require(
                &report.employee_action,
                lang.pick("يرجى كتابة الإجراء المتخذ", "Describe the action taken"),
            ),
            TaskAction::Resolve {
                employee_action,
                contact_method,
                customer_response,
                resolution_details,
                confirmed,
                ..
            } => {
                let message = lang.pick(
                    "يرجى ملء جميع الحقول المطلوبة",
                    "Please fill in all required fields",
                );
                require(employee_action, message)?;
                require(customer_response, message)?;
                require(resolution_details, message)?;
                if contact_method.is_none() {
                    return Err(message.to_string());
                }
                if !confirmed {
                    return Err(lang
                        .pick("يرجى تأكيد حل المشكلة", "Confirm the problem is solved")
                        .to_string());
                }
                Ok(())
            }
        }
    }

    pub async fn mutate(&self, action: TaskAction) -> ClientResult<()> {
        let lang = self.lang;
        if let Err(message) = self.validate(&action) {
            self.notices.error(message.clone());
            return Err(ClientError::Validation(message));
        }

        let result = match &action {
            TaskAction::MarkInProgress { id, report } => self
                .api
                .mark_case_in_progress(*id, report)
                .await
                .map(|m| acknowledged(m, lang.pick("تم حفظ التقدم بنجاح", "Progress saved"))),
            TaskAction::Resolve {
                id,
                employee_action,
                contact_method: Some(contact_method),
                customer_response,
                resolution_details,
                ..
            } => {
                let report = ResolutionReport {
                    employee_action: employee_action.trim().to_string(),
                    customer_contact_method: contact_method.clone(),
                    customer_response: customer_response.trim().to_string(),
                    resolution_details: resolution_details.trim().to_string(),
                };
                match self.api.resolve_case(*id, &report).await {
                    Ok(message) => {
                        if let Err(e) = self.api.notify_managers(&resolution_notification(*id)).await {
                            tracing::warn!(complaint_id = id, error = %e, "Manager notification failed");
                        }
                        Ok(acknowledged(
                            message,
                            lang.pick("تم تسجيل الحل النهائي بنجاح", "Resolution recorded"),
                        ))
                    }
                    Err(e) => Err(e),
                }
            }
            TaskAction::Resolve { contact_method: None, .. } => {
                return Err(ClientError::Internal("contact method missing after validation".into()));
            }
        };

        match result {
            Ok(text) => {
                tracing::info!(resource = "employee_tasks", ?action, "Mutation succeeded");
                self.notices.success(text);
                if let Err(err) = self.load().await {
                    tracing::debug!(error = %err, "Reload after mutation failed");
                }
                Ok(())
            }
            Err(err) => {
                tracing::warn!(resource = "employee_tasks", ?action, error = %err, "Mutation failed");
                self.notices.error(err.user_message(&generic_failure_text(lang)));
                Err(err)
            }
        }
    }

    /// All three columns; `now` drives the "time ago" labels
    pub async fn render(&self, now: NaiveDateTime) -> Html {
        let tasks = self.tasks().await;
        let lang = self.lang;
        Html::concat([
            column(
                "new",
                &tasks.new,
                lang.pick("لا توجد مهام جديدة حالياً", "No new tasks"),
                now,
                lang,
            ),
            column(
                "progress",
                &tasks.progress,
                lang.pick("لا توجد مهام قيد التنفيذ", "Nothing in progress"),
                now,
                lang,
            ),
            column(
                "completed",
                &tasks.completed,
                lang.pick("لا توجد مهام مكتملة", "No completed tasks"),
                now,
                lang,
            ),
        ])
    }

    pub fn cancel(&self) {
        self.slot.cancel();
    }
}

#[async_trait]
impl<C: HttpClient + 'static> Refresh for TaskBoard<C> {
    async fn refresh(&self) {
        if let Err(err) = self.load().await {
            tracing::debug!(error = %err, "Periodic refresh failed");
        }
    }
}

fn column(kind: &str, tasks: &[Complaint], empty: &str, now: NaiveDateTime, lang: Lang) -> Html {
    let mut builder = HtmlBuilder::new();
    builder.open("div", &[("class", "list-group"), ("data-column", kind)]);
    if tasks.is_empty() {
        builder.element("div", &[("class", "alert alert-info")], empty);
        return builder.build();
    }
    for task in tasks {
        let id = task.id.to_string();
        let customer = task
            .customer_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(lang.pick("عميل", "Customer"));
        builder
            .open("div", &[("class", "list-group-item"), ("data-id", id.as_str())])
            .open("h5", &[])
            .element("span", &[("class", "badge bg-primary")], &format!("#{id}"))
            .text(" ")
            .text(customer)
            .text(" ")
            .fragment(&badge(&labels::priority(&task.priority, lang)))
            .close()
            .element("p", &[("class", "phone")], &task.customer_phone)
            .element("p", &[("class", "issue")], &truncate(&task.issue_description, 100));

        match kind {
            "completed" => {
                builder.element(
                    "small",
                    &[("class", "text-muted")],
                    &format!(
                        "{} {}",
                        lang.pick("تم الحل في", "Resolved"),
                        date_time(task.resolved_at.as_deref(), lang)
                    ),
                );
            }
            _ => {
                let since = task
                    .manager_response_date
                    .as_deref()
                    .or(task.updated_at.as_deref());
                builder
                    .element(
                        "small",
                        &[("class", "text-muted")],
                        &format!("{} {}", lang.pick("منذ", "since"), time_ago(since, now, lang)),
                    )
                    .element(
                        "button",
                        &[
                            ("type", "button"),
                            ("class", "btn btn-primary btn-sm"),
                            ("data-action", "execute"),
                            ("data-id", id.as_str()),
                        ],
                        lang.pick("عرض الحل والتنفيذ", "View solution"),
                    );
            }
        }
        builder.close();
    }
    builder.build()
}

/// Current UTC time for "time ago" labels
pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::format::parse_timestamp;

    fn resolve(contact: Option<ContactMethod>, confirmed: bool) -> TaskAction {
        TaskAction::Resolve {
            id: 1,
            employee_action: "called".into(),
            contact_method: contact,
            customer_response: "happy".into(),
            resolution_details: "refunded".into(),
            confirmed,
        }
    }

    #[test]
    fn test_resolution_notification() {
        let n = resolution_notification(8);
        assert_eq!(n.kind, "complaint_resolved");
        assert_eq!(n.complaint_id, 8);
        assert_eq!(n.message, "تم حل الشكوى #8 من قبل الموظف");
    }

    #[test]
    fn test_column_escapes_and_labels() {
        let now = parse_timestamp("2025-01-02T12:00:00").unwrap();
        let task = Complaint {
            id: 3,
            customer_name: Some("<x>".into()),
            customer_phone: "0501".into(),
            issue_description: "broken".into(),
            manager_response_date: Some("2025-01-02T10:00:00".into()),
            ..Default::default()
        };
        let html = column("new", &[task], "empty", now, Lang::Ar).into_string();
        assert!(html.contains("&lt;x&gt;"));
        assert!(html.contains("منذ 2 ساعة"));
        assert!(html.contains(r#"data-action="execute" data-id="3""#));

        let empty = column("progress", &[], "nothing", now, Lang::En).into_string();
        assert!(empty.contains(r#"<div class="alert alert-info">nothing</div>"#));
    }

    #[tokio::test]
    async fn test_resolve_validation() {
        let api = HrApi::new(crate::client::NetworkHttpClient::new("http://localhost:1").unwrap());
        let board = TaskBoard::new(api, NoticeBoard::default(), Lang::En);
        assert!(board.validate(&resolve(None, true)).is_err());
        assert_eq!(
            board.validate(&resolve(Some(ContactMethod::Phone), false)),
            Err("Confirm the problem is solved".into())
        );
        assert!(board.validate(&resolve(Some(ContactMethod::Phone), true)).is_ok());
    }
}
