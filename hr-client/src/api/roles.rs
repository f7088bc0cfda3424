use serde_json::Value;
use shared::Payload;
use shared::models::{Permission, Role, RoleAssignment, RoleInput, UserRolesPage};

use super::{HrApi, acknowledge, with_query};
use crate::ClientResult;
use crate::client::HttpClient;

impl<C: HttpClient> HrApi<C> {
    /// `GET /api/roles` (bare array)
    pub async fn roles(&self) -> ClientResult<Vec<Role>> {
        self.fetch("/api/roles", Payload::Whole).await
    }

    /// `GET /api/roles/{id}`, including permission ids
    pub async fn role(&self, id: i64) -> ClientResult<Role> {
        self.fetch(&format!("/api/roles/{id}"), Payload::Whole).await
    }

    /// `POST /api/roles`
    pub async fn create_role(&self, input: &RoleInput) -> ClientResult<Option<String>> {
        let response: Value = self.http.post("/api/roles", input).await?;
        acknowledge(response)
    }

    /// `PUT /api/roles/{id}`
    pub async fn update_role(&self, id: i64, input: &RoleInput) -> ClientResult<Option<String>> {
        let response: Value = self.http.put(&format!("/api/roles/{id}"), input).await?;
        acknowledge(response)
    }

    /// `DELETE /api/roles/{id}`
    pub async fn delete_role(&self, id: i64) -> ClientResult<Option<String>> {
        let response: Value = self.http.delete(&format!("/api/roles/{id}")).await?;
        acknowledge(response)
    }

    /// `GET /api/permissions` (bare array)
    pub async fn permissions(&self) -> ClientResult<Vec<Permission>> {
        self.fetch("/api/permissions", Payload::Whole).await
    }

    /// `POST /api/permissions/initialize`
    pub async fn initialize_permissions(&self) -> ClientResult<Option<String>> {
        let response: Value = self.http.post_empty("/api/permissions/initialize").await?;
        acknowledge(response)
    }

    /// `GET /api/user-roles?page&per_page&search`
    pub async fn user_roles(
        &self,
        page: u32,
        per_page: u32,
        search: &str,
    ) -> ClientResult<UserRolesPage> {
        let mut params = vec![("page", page.to_string()), ("per_page", per_page.to_string())];
        let search = search.trim();
        if !search.is_empty() {
            params.push(("search", search.to_string()));
        }
        self.fetch(&with_query("/api/user-roles", &params), Payload::Whole)
            .await
    }

    /// `POST /api/user-roles`
    pub async fn assign_role(&self, assignment: &RoleAssignment) -> ClientResult<Option<String>> {
        let response: Value = self.http.post("/api/user-roles", assignment).await?;
        acknowledge(response)
    }

    /// `DELETE /api/user-roles/{id}`
    pub async fn remove_user_role(&self, user_role_id: i64) -> ClientResult<Option<String>> {
        let response: Value = self
            .http
            .delete(&format!("/api/user-roles/{user_role_id}"))
            .await?;
        acknowledge(response)
    }
}
