//! Manager complaint queue

use async_trait::async_trait;
use shared::Lang;
use shared::models::{
    CaseStatus, Category, Complaint, ManagerResponse, Priority, QueueStatistics, UserNotification,
};
use std::sync::{PoisonError, RwLock};

use super::{ListPage, acknowledged, require, text_matches};
use crate::ClientResult;
use crate::api::HrApi;
use crate::client::HttpClient;
use crate::render::format::{date_time, truncate};
use crate::render::{Affordance, Html, HtmlBuilder, Row, badge, labels};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueFilter {
    pub status: Option<CaseStatus>,
    pub priority: Option<Priority>,
    pub category: Option<Category>,
    /// Matches name, phone and issue text
    pub search: String,
}

#[derive(Debug, Clone)]
pub enum QueueAction {
    Respond { id: i64, response: ManagerResponse },
}

/// Notification sent to the assignee after a manager responds
pub fn solution_notification(complaint_id: i64, user_id: i64) -> UserNotification {
    UserNotification {
        user_id,
        kind: "manager_solution".to_string(),
        message: format!("تم إرسال حل من المدير للشكوى #{complaint_id}"),
        link: format!("/support/employee?complaint={complaint_id}"),
    }
}

#[derive(Debug, Default)]
pub struct ManagerQueuePage {
    statistics: RwLock<QueueStatistics>,
}

impl ManagerQueuePage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters from the last load
    pub fn statistics(&self) -> QueueStatistics {
        *self.statistics.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub async fn case<C: HttpClient>(&self, api: &HrApi<C>, id: i64) -> ClientResult<Complaint> {
        api.support_case(id).await
    }

    /// What the employee did, shown from the execution-details affordance
    pub fn execution_html(&self, complaint: &Complaint, lang: Lang) -> Html {
        let mut builder = HtmlBuilder::new();
        builder.open("dl", &[("class", "execution-details")]);
        let mut field = |label: &str, value: &str| {
            builder.element("dt", &[], label).element("dd", &[], value);
        };
        field(
            lang.pick("الإجراء المتخذ", "Action taken"),
            complaint.employee_action.as_deref().unwrap_or("-"),
        );
        field(
            lang.pick("طريقة التواصل", "Contact method"),
            &labels::contact_method(complaint.customer_contact_method.as_ref(), lang),
        );
        field(
            lang.pick("رد العميل", "Customer response"),
            complaint.customer_response.as_deref().unwrap_or("-"),
        );
        field(
            lang.pick("تفاصيل الحل", "Resolution"),
            complaint.resolution_details.as_deref().unwrap_or("-"),
        );
        field(
            lang.pick("تاريخ الحل", "Resolved at"),
            &date_time(complaint.resolved_at.as_deref(), lang),
        );
        builder.build()
    }
}

#[async_trait]
impl ListPage for ManagerQueuePage {
    type Item = Complaint;
    type Filter = QueueFilter;
    type Action = QueueAction;

    const NAME: &'static str = "manager_queue";

    async fn fetch<C: HttpClient>(
        &self,
        api: &HrApi<C>,
        _filter: &QueueFilter,
    ) -> ClientResult<Vec<Complaint>> {
        let queue = api.manager_queue().await?;
        *self.statistics.write().unwrap_or_else(PoisonError::into_inner) = queue.statistics;
        Ok(queue.complaints)
    }

    fn matches(&self, complaint: &Complaint, filter: &QueueFilter) -> bool {
        filter.status.as_ref().is_none_or(|s| *s == complaint.status)
            && filter.priority.as_ref().is_none_or(|p| *p == complaint.priority)
            && filter.category.as_ref().is_none_or(|c| *c == complaint.category)
            && text_matches(
                &filter.search,
                [
                    complaint.customer_name.as_deref().unwrap_or_default(),
                    complaint.customer_phone.as_str(),
                    complaint.issue_description.as_str(),
                ],
            )
    }

    fn headers(&self, lang: Lang) -> Vec<String> {
        [
            "#",
            lang.pick("العميل", "Customer"),
            lang.pick("المشكلة", "Issue"),
            lang.pick("التصنيف", "Category"),
            lang.pick("الأولوية", "Priority"),
            lang.pick("الحالة", "Status"),
            lang.pick("التاريخ", "Date"),
            lang.pick("إجراءات", "Actions"),
        ]
        .map(str::to_string)
        .to_vec()
    }

    fn row(&self, complaint: &Complaint, lang: Lang) -> Row {
        let id = complaint.id;
        let customer = complaint
            .customer_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&complaint.customer_phone);
        let mut row = Row::new(id)
            .text(&id.to_string())
            .text(customer)
            .text(&truncate(&complaint.issue_description, 60))
            .cell(badge(&labels::category(&complaint.category, lang)))
            .cell(badge(&labels::priority(&complaint.priority, lang)))
            .cell(badge(&labels::case_status(&complaint.status, lang)))
            .text(&date_time(complaint.created_at.as_deref(), lang));
        if complaint.priority == Priority::Urgent {
            row = row.class("table-danger");
        }
        if matches!(complaint.status, CaseStatus::SentToManager | CaseStatus::New) {
            row = row.action(Affordance::button("respond", lang.pick("الرد", "Respond"), "primary", id));
        } else {
            row = row.action(Affordance::button("view", lang.pick("عرض", "View"), "info", id));
        }
        if complaint.has_employee_action() {
            row = row.action(Affordance::button(
                "execution",
                lang.pick("تفاصيل التنفيذ", "Execution details"),
                "secondary",
                id,
            ));
        }
        row
    }

    fn empty_text(&self, lang: Lang) -> String {
        lang.pick("لا توجد شكاوى بانتظار الرد", "No complaints awaiting a response")
            .to_string()
    }

    fn validate(&self, action: &QueueAction, lang: Lang) -> Result<(), String> {
        let QueueAction::Respond { response, .. } = action;
        let message = lang.pick(
            "يرجى إدخال الحل والتعليمات",
            "Enter both the solution and the instructions",
        );
        require(&response.manager_solution, message)?;
        require(&response.manager_instructions, message)
    }

    async fn perform<C: HttpClient>(
        &self,
        api: &HrApi<C>,
        action: &QueueAction,
        lang: Lang,
    ) -> ClientResult<String> {
        let QueueAction::Respond { id, response } = action;
        let message = api.respond_to_case(*id, response).await?;

        if let Some(user_id) = response.assigned_to
            && let Err(e) = api.notify_user(&solution_notification(*id, user_id)).await
        {
            tracing::warn!(complaint_id = id, error = %e, "Assignee notification failed");
        }

        Ok(acknowledged(message, lang.pick("تم إرسال الرد بنجاح", "Response sent")))
    }

    fn failure_text(&self, _action: &QueueAction, lang: Lang) -> String {
        lang.pick("خطأ في إرسال الرد", "Error sending the response")
            .to_string()
    }
}
