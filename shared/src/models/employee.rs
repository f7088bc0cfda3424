//! Employee Model

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// Employee as listed by `/api/employees`.
///
/// Older endpoints send `full_name` / `employee_code`, newer ones `name` /
/// `code`; both spellings are accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub employee_code: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub has_password: bool,
}

impl Employee {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.full_name.as_deref())
            .unwrap_or_default()
    }

    pub fn employee_code(&self) -> Option<&str> {
        self.code
            .as_deref()
            .or(self.employee_code.as_deref())
            .filter(|c| !c.is_empty())
    }
}

/// Set password payload (`PUT /api/employee/{id}/password`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordUpdate {
    pub password: String,
}

/// Minimal user record (`/api/users`, department user lists)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Page of users (`/api/users?page&per_page`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPage {
    #[serde(default)]
    pub users: Vec<UserSummary>,
}
