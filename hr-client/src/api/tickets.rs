use serde_json::Value;
use shared::Payload;
use shared::models::{
    AssignRequest, Department, StatusUpdate, TicketStats, TransferOutcome, TransferRecord,
    TransferRequest, UserSummary,
};

use super::{HrApi, acknowledge};
use crate::ClientResult;
use crate::client::HttpClient;

// Every client-support endpoint answers with a `{success, ...}` envelope.
impl<C: HttpClient> HrApi<C> {
    /// `POST /api/client-support/transfer/{id}`
    pub async fn transfer_ticket(
        &self,
        id: i64,
        request: &TransferRequest,
    ) -> ClientResult<TransferOutcome> {
        let body: Value = self
            .http
            .post(&format!("/api/client-support/transfer/{id}"), request)
            .await?;
        let message = acknowledge(body.clone())?;
        let outcome: TransferOutcome = serde_json::from_value(body).unwrap_or_default();
        Ok(TransferOutcome { message, ..outcome })
    }

    /// `GET /api/client-support/transfer-history/{id}` → `{success, transfers}`
    pub async fn transfer_history(&self, id: i64) -> ClientResult<Vec<TransferRecord>> {
        self.fetch(
            &format!("/api/client-support/transfer-history/{id}"),
            Payload::Field("transfers"),
        )
        .await
    }

    /// `POST /api/client-support/assign/{id}`
    pub async fn assign_ticket(&self, id: i64, user_id: i64) -> ClientResult<Option<String>> {
        let body: Value = self
            .http
            .post(
                &format!("/api/client-support/assign/{id}"),
                &AssignRequest { user_id },
            )
            .await?;
        acknowledge(body)
    }

    /// `POST /api/client-support/update-status/{id}`
    pub async fn update_ticket_status(
        &self,
        id: i64,
        update: &StatusUpdate,
    ) -> ClientResult<Option<String>> {
        let body: Value = self
            .http
            .post(&format!("/api/client-support/update-status/{id}"), update)
            .await?;
        acknowledge(body)
    }

    /// `GET /api/client-support/departments/{department}` → `{success, users}`
    pub async fn department_users(&self, department: &Department) -> ClientResult<Vec<UserSummary>> {
        self.fetch(
            &format!(
                "/api/client-support/departments/{}",
                urlencoding::encode(department.as_str())
            ),
            Payload::Field("users"),
        )
        .await
    }

    /// `GET /api/client-support/stats` → `{success, stats}`
    pub async fn ticket_stats(&self) -> ClientResult<TicketStats> {
        self.fetch("/api/client-support/stats", Payload::Field("stats"))
            .await
    }
}
