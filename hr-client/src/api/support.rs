use serde_json::Value;
use shared::Payload;
use shared::models::{
    Complaint, EmployeeTasks, ManagerNotification, ManagerQueue, ManagerResponse, ProgressReport,
    ResolutionReport, UserNotification,
};

use super::{HrApi, acknowledge};
use crate::ClientResult;
use crate::client::HttpClient;

impl<C: HttpClient> HrApi<C> {
    /// `GET /api/complaints/list` (bare array)
    pub async fn complaint_log(&self) -> ClientResult<Vec<Complaint>> {
        self.fetch("/api/complaints/list", Payload::Whole).await
    }

    /// `GET /api/complaints/get/{id}`
    pub async fn logged_complaint(&self, id: i64) -> ClientResult<Complaint> {
        self.fetch(&format!("/api/complaints/get/{id}"), Payload::Whole).await
    }

    /// `GET /api/support/manager/complaints` → `{complaints, statistics}`
    pub async fn manager_queue(&self) -> ClientResult<ManagerQueue> {
        self.fetch("/api/support/manager/complaints", Payload::Whole).await
    }

    /// `GET /api/support/complaints/{id}`
    pub async fn support_case(&self, id: i64) -> ClientResult<Complaint> {
        self.fetch(&format!("/api/support/complaints/{id}"), Payload::Whole)
            .await
    }

    /// `POST /api/support/manager/respond/{id}`
    pub async fn respond_to_case(
        &self,
        id: i64,
        response: &ManagerResponse,
    ) -> ClientResult<Option<String>> {
        let body: Value = self
            .http
            .post(&format!("/api/support/manager/respond/{id}"), response)
            .await?;
        acknowledge(body)
    }

    /// `GET /api/support/employee/tasks` → `{new, progress, completed}`
    pub async fn employee_tasks(&self) -> ClientResult<EmployeeTasks> {
        self.fetch("/api/support/employee/tasks", Payload::Whole).await
    }

    /// `POST /api/support/employee/mark-progress/{id}`
    pub async fn mark_case_in_progress(
        &self,
        id: i64,
        report: &ProgressReport,
    ) -> ClientResult<Option<String>> {
        let body: Value = self
            .http
            .post(&format!("/api/support/employee/mark-progress/{id}"), report)
            .await?;
        acknowledge(body)
    }

    /// `POST /api/support/employee/resolve/{id}`
    pub async fn resolve_case(
        &self,
        id: i64,
        report: &ResolutionReport,
    ) -> ClientResult<Option<String>> {
        let body: Value = self
            .http
            .post(&format!("/api/support/employee/resolve/{id}"), report)
            .await?;
        acknowledge(body)
    }

    /// `POST /api/notifications/send`
    pub async fn notify_user(&self, notification: &UserNotification) -> ClientResult<()> {
        let body: Value = self.http.post("/api/notifications/send", notification).await?;
        acknowledge(body).map(|_| ())
    }

    /// `POST /api/notifications/send-to-manager`
    pub async fn notify_managers(&self, notification: &ManagerNotification) -> ClientResult<()> {
        let body: Value = self
            .http
            .post("/api/notifications/send-to-manager", notification)
            .await?;
        acknowledge(body).map(|_| ())
    }
}
