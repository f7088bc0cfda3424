//! Role management

use async_trait::async_trait;
use shared::Lang;
use shared::models::{Role, RoleInput};

use super::{ListPage, acknowledged, require, text_matches};
use crate::ClientResult;
use crate::api::HrApi;
use crate::client::HttpClient;
use crate::render::{Affordance, Label, Row, badge};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleFilter {
    /// Matches the name and both display names
    pub search: String,
}

#[derive(Debug, Clone)]
pub enum RoleAction {
    /// Create when `id` is `None`, update otherwise
    Save { id: Option<i64>, input: RoleInput },
    /// Carries the name so `admin` can be refused locally
    Delete { id: i64, name: String },
}

#[derive(Debug, Default)]
pub struct RolesPage;

impl RolesPage {
    fn display_name<'a>(role: &'a Role, lang: Lang) -> &'a str {
        let localized = match lang {
            Lang::Ar => role.display_name_ar.as_deref(),
            Lang::En => role.display_name_en.as_deref(),
        };
        localized.filter(|n| !n.is_empty()).unwrap_or(&role.name)
    }

    /// Role detail with its permission ids, for the editor
    pub async fn detail<C: HttpClient>(&self, api: &HrApi<C>, id: i64) -> ClientResult<Role> {
        api.role(id).await
    }
}

#[async_trait]
impl ListPage for RolesPage {
    type Item = Role;
    type Filter = RoleFilter;
    type Action = RoleAction;

    const NAME: &'static str = "roles";

    async fn fetch<C: HttpClient>(&self, api: &HrApi<C>, _filter: &RoleFilter) -> ClientResult<Vec<Role>> {
        api.roles().await
    }

    fn matches(&self, role: &Role, filter: &RoleFilter) -> bool {
        text_matches(
            &filter.search,
            [
                role.name.as_str(),
                role.display_name_ar.as_deref().unwrap_or_default(),
                role.display_name_en.as_deref().unwrap_or_default(),
            ],
        )
    }

    fn headers(&self, lang: Lang) -> Vec<String> {
        [
            lang.pick("الدور", "Role"),
            lang.pick("المعرف", "Name"),
            lang.pick("الوصف", "Description"),
            lang.pick("الصلاحيات", "Permissions"),
            lang.pick("الحالة", "Status"),
            lang.pick("إجراءات", "Actions"),
        ]
        .map(str::to_string)
        .to_vec()
    }

    fn row(&self, role: &Role, lang: Lang) -> Row {
        let status = if role.is_active {
            Label {
                text: lang.pick("نشط", "Active").to_string(),
                color: "success",
            }
        } else {
            Label {
                text: lang.pick("معطل", "Disabled").to_string(),
                color: "secondary",
            }
        };
        let mut row = Row::new(role.id)
            .text(Self::display_name(role, lang))
            .text(&role.name)
            .text_or_dash(role.description.as_deref())
            .text(&role.permissions_count.to_string())
            .cell(badge(&status))
            .action(Affordance::button("edit", lang.pick("تعديل", "Edit"), "warning", role.id));
        if !role.is_admin() {
            row = row.action(Affordance::button("delete", lang.pick("حذف", "Delete"), "danger", role.id));
        }
        row
    }

    fn empty_text(&self, lang: Lang) -> String {
        lang.pick("لا توجد أدوار", "No roles found").to_string()
    }

    fn confirmation(&self, action: &RoleAction, lang: Lang) -> Option<String> {
        match action {
            RoleAction::Save { .. } => None,
            RoleAction::Delete { .. } => Some(
                lang.pick("هل أنت متأكد من حذف هذا الدور؟", "Delete this role?")
                    .to_string(),
            ),
        }
    }

    fn validate(&self, action: &RoleAction, lang: Lang) -> Result<(), String> {
        match action {
            RoleAction::Save { input, .. } => {
                let message = lang.pick(
                    "يرجى ملء جميع الحقول المطلوبة",
                    "Please fill in all required fields",
                );
                require(&input.name, message)?;
                require(&input.display_name_ar, message)?;
                require(&input.display_name_en, message)
            }
            RoleAction::Delete { name, .. } if name == shared::models::ADMIN_ROLE => Err(lang
                .pick("لا يمكن حذف دور المدير", "The admin role cannot be deleted")
                .to_string()),
            RoleAction::Delete { .. } => Ok(()),
        }
    }

    async fn perform<C: HttpClient>(
        &self,
        api: &HrApi<C>,
        action: &RoleAction,
        lang: Lang,
    ) -> ClientResult<String> {
        let (message, fallback) = match action {
            RoleAction::Save { id: None, input } => (
                api.create_role(input).await?,
                lang.pick("تم إنشاء الدور بنجاح", "Role created"),
            ),
            RoleAction::Save { id: Some(id), input } => (
                api.update_role(*id, input).await?,
                lang.pick("تم تحديث الدور بنجاح", "Role updated"),
            ),
            RoleAction::Delete { id, .. } => (
                api.delete_role(*id).await?,
                lang.pick("تم حذف الدور بنجاح", "Role deleted"),
            ),
        };
        Ok(acknowledged(message, fallback))
    }

    fn failure_text(&self, action: &RoleAction, lang: Lang) -> String {
        match action {
            RoleAction::Save { .. } => lang.pick("خطأ في حفظ الدور", "Error saving role"),
            RoleAction::Delete { .. } => lang.pick("خطأ في حذف الدور", "Error deleting role"),
        }
        .to_string()
    }
}
