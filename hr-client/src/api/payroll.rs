use serde_json::Value;
use shared::Payload;
use shared::models::{
    BatchRequest, BatchResult, Payroll, PayrollInput, PayrollQuery, PayrollTemplate,
};

use super::{HrApi, acknowledge, with_query};
use crate::ClientResult;
use crate::client::{Fetched, HttpClient};

impl<C: HttpClient> HrApi<C> {
    /// `GET /api/payroll?month&year&status&search` (bare array)
    pub async fn payrolls(&self, query: &PayrollQuery) -> ClientResult<Vec<Payroll>> {
        let path = with_query("/api/payroll", &query.params());
        self.fetch(&path, Payload::Whole).await
    }

    /// `GET /api/payroll/{id}`
    pub async fn payroll(&self, id: i64) -> ClientResult<Payroll> {
        self.fetch(&format!("/api/payroll/{id}"), Payload::Whole).await
    }

    /// `POST /api/payroll`
    pub async fn create_payroll(&self, input: &PayrollInput) -> ClientResult<Option<String>> {
        let response: Value = self.http.post("/api/payroll", input).await?;
        acknowledge(response)
    }

    /// `PUT /api/payroll/{id}`
    pub async fn update_payroll(&self, id: i64, input: &PayrollInput) -> ClientResult<Option<String>> {
        let response: Value = self.http.put(&format!("/api/payroll/{id}"), input).await?;
        acknowledge(response)
    }

    /// `POST /api/payroll/{id}/approve`
    pub async fn approve_payroll(&self, id: i64) -> ClientResult<Option<String>> {
        let response: Value = self.http.post_empty(&format!("/api/payroll/{id}/approve")).await?;
        acknowledge(response)
    }

    /// `POST /api/payroll/{id}/pay`
    pub async fn pay_payroll(&self, id: i64) -> ClientResult<Option<String>> {
        let response: Value = self.http.post_empty(&format!("/api/payroll/{id}/pay")).await?;
        acknowledge(response)
    }

    /// `DELETE /api/payroll/{id}`
    pub async fn delete_payroll(&self, id: i64) -> ClientResult<Option<String>> {
        let response: Value = self.http.delete(&format!("/api/payroll/{id}")).await?;
        acknowledge(response)
    }

    /// `POST /api/payroll/batch` → `{count}`
    pub async fn generate_payroll_batch(&self, month: u32, year: i32) -> ClientResult<BatchResult> {
        let response: Value = self
            .http
            .post("/api/payroll/batch", &BatchRequest { month, year })
            .await?;
        Ok(shared::response::normalize(response, Payload::Whole)?)
    }

    /// `GET /api/payroll/template/{employee_id}`
    pub async fn payroll_template(&self, employee_id: i64) -> ClientResult<PayrollTemplate> {
        self.fetch(&format!("/api/payroll/template/{employee_id}"), Payload::Whole)
            .await
    }

    /// `GET /api/payroll/{id}/payslip` (PDF)
    pub async fn payslip(&self, id: i64) -> ClientResult<Fetched> {
        self.http.get_bytes(&payslip_path(id)).await
    }
}

/// Download link for a paid payroll's payslip
pub fn payslip_path(id: i64) -> String {
    format!("/api/payroll/{id}/payslip")
}
