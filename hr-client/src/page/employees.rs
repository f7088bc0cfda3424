//! Employee password management

use async_trait::async_trait;
use shared::Lang;
use shared::models::Employee;
use std::collections::BTreeSet;

use super::{ListPage, acknowledged, text_matches};
use crate::ClientResult;
use crate::api::HrApi;
use crate::client::HttpClient;
use crate::render::{Affordance, Label, Row, badge};

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PasswordFilter {
    #[default]
    Any,
    Set,
    NotSet,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    /// Matches name or code
    pub search: String,
    pub department: Option<String>,
    pub password: PasswordFilter,
}

#[derive(Debug, Clone)]
pub enum EmployeeAction {
    SetPassword {
        employee_id: i64,
        password: String,
        confirmation: String,
    },
    RemovePassword {
        employee_id: i64,
    },
}

/// Counters over the whole cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmployeeStats {
    pub total: usize,
    pub with_password: usize,
    pub without_password: usize,
    pub active: usize,
}

impl EmployeeStats {
    pub fn from_employees(employees: &[Employee]) -> Self {
        let with_password = employees.iter().filter(|e| e.has_password).count();
        Self {
            total: employees.len(),
            with_password,
            without_password: employees.len() - with_password,
            active: employees.iter().filter(|e| e.active).count(),
        }
    }
}

/// Sorted distinct departments, for the department select
pub fn departments(employees: &[Employee]) -> Vec<String> {
    employees
        .iter()
        .filter_map(|e| e.department.as_deref())
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[derive(Debug, Default)]
pub struct EmployeesPage;

#[async_trait]
impl ListPage for EmployeesPage {
    type Item = Employee;
    type Filter = EmployeeFilter;
    type Action = EmployeeAction;

    const NAME: &'static str = "employees";

    async fn fetch<C: HttpClient>(
        &self,
        api: &HrApi<C>,
        _filter: &EmployeeFilter,
    ) -> ClientResult<Vec<Employee>> {
        api.employees().await
    }

    fn matches(&self, employee: &Employee, filter: &EmployeeFilter) -> bool {
        let text = text_matches(
            &filter.search,
            [employee.display_name(), employee.employee_code().unwrap_or_default()],
        );
        let department = match filter.department.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(wanted) => employee.department.as_deref().map(str::trim) == Some(wanted),
        };
        let password = match filter.password {
            PasswordFilter::Any => true,
            PasswordFilter::Set => employee.has_password,
            PasswordFilter::NotSet => !employee.has_password,
        };
        text && department && password
    }

    fn headers(&self, lang: Lang) -> Vec<String> {
        [
            lang.pick("الموظف", "Employee"),
            lang.pick("الكود", "Code"),
            lang.pick("القسم", "Department"),
            lang.pick("المسمى الوظيفي", "Job title"),
            lang.pick("كلمة المرور", "Password"),
            lang.pick("الحالة", "Status"),
            lang.pick("إجراءات", "Actions"),
        ]
        .map(str::to_string)
        .to_vec()
    }

    fn row(&self, employee: &Employee, lang: Lang) -> Row {
        let password = if employee.has_password {
            Label {
                text: lang.pick("مفعّلة", "Set").to_string(),
                color: "success",
            }
        } else {
            Label {
                text: lang.pick("غير مفعّلة", "Not set").to_string(),
                color: "secondary",
            }
        };
        let status = if employee.active {
            Label {
                text: lang.pick("نشط", "Active").to_string(),
                color: "success",
            }
        } else {
            Label {
                text: lang.pick("غير نشط", "Inactive").to_string(),
                color: "danger",
            }
        };

        let mut row = Row::new(employee.id)
            .text(employee.display_name())
            .text_or_dash(employee.employee_code())
            .text_or_dash(employee.department.as_deref())
            .text_or_dash(employee.job_title.as_deref())
            .cell(badge(&password))
            .cell(badge(&status))
            .action(
                Affordance::button(
                    "set-password",
                    if employee.has_password {
                        lang.pick("تغيير", "Change")
                    } else {
                        lang.pick("تعيين", "Set")
                    },
                    "primary",
                    employee.id,
                )
                .enabled(employee.active),
            );
        if employee.has_password {
            row = row.action(
                Affordance::button("remove-password", lang.pick("حذف", "Remove"), "danger", employee.id)
                    .enabled(employee.active),
            );
        }
        if !employee.active {
            row = row.class("table-secondary");
        }
        row
    }

    fn confirmation(&self, action: &EmployeeAction, lang: Lang) -> Option<String> {
        match action {
            EmployeeAction::SetPassword { .. } => None,
            EmployeeAction::RemovePassword { .. } => Some(
                lang.pick(
                    "هل أنت متأكد من حذف كلمة المرور لهذا الموظف؟",
                    "Remove this employee's password?",
                )
                .to_string(),
            ),
        }
    }

    fn validate(&self, action: &EmployeeAction, lang: Lang) -> Result<(), String> {
        let EmployeeAction::SetPassword {
            password,
            confirmation,
            ..
        } = action
        else {
            return Ok(());
        };
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(lang
                .pick(
                    "كلمة المرور يجب أن تكون 4 أحرف على الأقل",
                    "Password must be at least 4 characters",
                )
                .to_string());
        }
        if password != confirmation {
            return Err(lang
                .pick("كلمتا المرور غير متطابقتين", "Passwords do not match")
                .to_string());
        }
        Ok(())
    }

    async fn perform<C: HttpClient>(
        &self,
        api: &HrApi<C>,
        action: &EmployeeAction,
        lang: Lang,
    ) -> ClientResult<String> {
        match action {
            EmployeeAction::SetPassword {
                employee_id,
                password,
                ..
            } => {
                let message = api.set_employee_password(*employee_id, password).await?;
                Ok(acknowledged(message, lang.pick("تم تعيين كلمة المرور بنجاح", "Password set")))
            }
            EmployeeAction::RemovePassword { employee_id } => {
                let message = api.remove_employee_password(*employee_id).await?;
                Ok(acknowledged(message, lang.pick("تم حذف كلمة المرور بنجاح", "Password removed")))
            }
        }
    }

    fn failure_text(&self, action: &EmployeeAction, lang: Lang) -> String {
        match action {
            EmployeeAction::SetPassword { .. } => lang
                .pick("فشل في تعيين كلمة المرور", "Failed to set password")
                .to_string(),
            EmployeeAction::RemovePassword { .. } => lang
                .pick("فشل في حذف كلمة المرور", "Failed to remove password")
                .to_string(),
        }
    }
}
