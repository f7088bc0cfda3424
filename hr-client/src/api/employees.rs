use serde_json::Value;
use shared::Payload;
use shared::models::{Employee, PasswordUpdate, UserPage, UserSummary};

use super::{HrApi, acknowledge, with_query};
use crate::ClientResult;
use crate::client::HttpClient;

impl<C: HttpClient> HrApi<C> {
    /// `GET /api/employees` (bare array)
    pub async fn employees(&self) -> ClientResult<Vec<Employee>> {
        self.fetch("/api/employees", Payload::Whole).await
    }

    /// `PUT /api/employee/{id}/password`
    pub async fn set_employee_password(
        &self,
        employee_id: i64,
        password: &str,
    ) -> ClientResult<Option<String>> {
        let body = PasswordUpdate {
            password: password.to_string(),
        };
        let response: Value = self
            .http
            .put(&format!("/api/employee/{employee_id}/password"), &body)
            .await?;
        acknowledge(response)
    }

    /// `DELETE /api/employee/{id}/password`
    pub async fn remove_employee_password(&self, employee_id: i64) -> ClientResult<Option<String>> {
        let response: Value = self
            .http
            .delete(&format!("/api/employee/{employee_id}/password"))
            .await?;
        acknowledge(response)
    }

    /// `GET /api/users?page&per_page` → `{users}`
    pub async fn users(&self, page: u32, per_page: u32) -> ClientResult<Vec<UserSummary>> {
        let path = with_query(
            "/api/users",
            &[("page", page.to_string()), ("per_page", per_page.to_string())],
        );
        let page: UserPage = self.fetch(&path, Payload::Whole).await?;
        Ok(page.users)
    }
}
