//! Role Model

use serde::{Deserialize, Serialize};

/// Name of the built-in role that can never be deleted
pub const ADMIN_ROLE: &str = "admin";

/// Role entity (RBAC)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub display_name_ar: Option<String>,
    pub display_name_en: Option<String>,
    pub description: Option<String>,
    pub permissions_count: u32,
    pub is_active: bool,
    /// Permission ids, only present on `GET /api/roles/{id}`
    pub permissions: Vec<i64>,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        self.name == ADMIN_ROLE
    }
}

/// Create / update role payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleInput {
    pub name: String,
    pub display_name_ar: String,
    pub display_name_en: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub permissions: Vec<i64>,
}

/// Localized role name as embedded in user-role listings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleLabel {
    pub id: Option<i64>,
    pub name: String,
    pub name_ar: Option<String>,
    pub name_en: Option<String>,
}

/// Roles held by one user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserRoles {
    pub user_id: i64,
    pub username: String,
    pub roles: Vec<RoleLabel>,
    pub primary_role: Option<RoleLabel>,
}

/// `GET /api/user-roles?page&per_page&search`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserRolesPage {
    pub user_roles: Vec<UserRoles>,
    pub total: u32,
    pub pages: u32,
    pub current_page: u32,
}

/// Role assignment (`POST /api/user-roles`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub user_id: i64,
    pub role_id: i64,
    pub is_primary: bool,
}

impl RoleLabel {
    /// Localized name, falling back to the technical name
    pub fn label(&self, lang: crate::Lang) -> &str {
        let localized = match lang {
            crate::Lang::Ar => self.name_ar.as_deref(),
            crate::Lang::En => self.name_en.as_deref(),
        };
        localized.filter(|n| !n.is_empty()).unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Lang;

    #[test]
    fn test_user_roles_page() {
        let page: UserRolesPage = serde_json::from_str(
            r#"{"user_roles":[{"user_id":3,"username":"huda",
                "roles":[{"id":1,"name":"hr","name_ar":"موارد بشرية","name_en":"HR"}],
                "primary_role":null}],
                "total":1,"pages":1,"current_page":1,"per_page":50}"#,
        )
        .unwrap();
        let user = &page.user_roles[0];
        assert_eq!(user.roles[0].label(Lang::En), "HR");
        assert!(user.primary_role.is_none());
        assert_eq!(page.pages, 1);
    }

    #[test]
    fn test_label_falls_back_to_name() {
        let label = RoleLabel {
            name: "auditor".into(),
            ..Default::default()
        };
        assert_eq!(label.label(Lang::Ar), "auditor");
    }

    #[test]
    fn test_admin_detection() {
        let role = Role {
            name: ADMIN_ROLE.into(),
            ..Default::default()
        };
        assert!(role.is_admin());
    }
}
