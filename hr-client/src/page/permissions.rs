//! Permission catalogue
//!
//! Module chips allow several modules at once; the single-module select is
//! used only when no chip is active.

use async_trait::async_trait;
use shared::Lang;
use shared::models::{Permission, group_by_module};
use std::collections::{BTreeSet, HashSet};

use super::{ListPage, acknowledged, text_matches};
use crate::ClientResult;
use crate::api::HrApi;
use crate::client::HttpClient;
use crate::render::{Html, HtmlBuilder, Row};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionFilter {
    /// Active module chips
    pub modules: BTreeSet<String>,
    /// Module select, ignored while chips are active
    pub module: Option<String>,
    /// Matches both display names, module and action
    pub search: String,
}

impl PermissionFilter {
    /// Toggle a module chip
    pub fn toggle_module(&mut self, module: &str) {
        if !self.modules.remove(module) {
            self.modules.insert(module.to_string());
        }
    }

    fn module_matches(&self, module: &str) -> bool {
        if !self.modules.is_empty() {
            return self.modules.contains(module);
        }
        match self.module.as_deref() {
            None | Some("") => true,
            Some(wanted) => wanted == module,
        }
    }
}

/// The only mutation: seed the default permission set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitializePermissions;

#[derive(Debug, Default)]
pub struct PermissionsPage;

impl PermissionsPage {
    /// Distinct modules in first-seen order
    pub fn modules(permissions: &[Permission]) -> Vec<String> {
        group_by_module(permissions)
            .into_iter()
            .map(|g| g.module.to_string())
            .collect()
    }
}

#[async_trait]
impl ListPage for PermissionsPage {
    type Item = Permission;
    type Filter = PermissionFilter;
    type Action = InitializePermissions;

    const NAME: &'static str = "permissions";

    async fn fetch<C: HttpClient>(
        &self,
        api: &HrApi<C>,
        _filter: &PermissionFilter,
    ) -> ClientResult<Vec<Permission>> {
        api.permissions().await
    }

    fn matches(&self, permission: &Permission, filter: &PermissionFilter) -> bool {
        filter.module_matches(&permission.module)
            && text_matches(
                &filter.search,
                [
                    permission.display_name_ar.as_deref().unwrap_or_default(),
                    permission.display_name_en.as_deref().unwrap_or_default(),
                    permission.module.as_str(),
                    permission.action.as_str(),
                ],
            )
    }

    fn headers(&self, lang: Lang) -> Vec<String> {
        [
            lang.pick("الصلاحية", "Permission"),
            lang.pick("الوحدة", "Module"),
            lang.pick("الإجراء", "Action"),
        ]
        .map(str::to_string)
        .to_vec()
    }

    fn row(&self, permission: &Permission, lang: Lang) -> Row {
        Row::new(permission.id)
            .text(&permission.label(lang))
            .text(&permission.module)
            .text(&permission.action)
    }

    fn empty_text(&self, lang: Lang) -> String {
        lang.pick("لا توجد صلاحيات", "No permissions found").to_string()
    }

    fn confirmation(&self, _action: &InitializePermissions, lang: Lang) -> Option<String> {
        Some(
            lang.pick(
                "هل تريد تهيئة الصلاحيات الافتراضية؟",
                "Initialize the default permissions?",
            )
            .to_string(),
        )
    }

    async fn perform<C: HttpClient>(
        &self,
        api: &HrApi<C>,
        _action: &InitializePermissions,
        lang: Lang,
    ) -> ClientResult<String> {
        let message = api.initialize_permissions().await?;
        Ok(acknowledged(
            message,
            lang.pick("تم تهيئة الصلاحيات بنجاح", "Permissions initialized"),
        ))
    }

    fn failure_text(&self, _action: &InitializePermissions, lang: Lang) -> String {
        lang.pick("خطأ في تهيئة الصلاحيات", "Error initializing permissions")
            .to_string()
    }
}

/// Checkbox groups for the role editor, one fieldset per module
pub fn render_permission_groups(permissions: &[Permission], checked: &[i64], lang: Lang) -> Html {
    let checked: HashSet<i64> = checked.iter().copied().collect();
    let mut builder = HtmlBuilder::new();
    for group in group_by_module(permissions) {
        builder
            .open("fieldset", &[("class", "permission-group"), ("data-module", group.module)])
            .element("legend", &[], group.module);
        for permission in group.permissions {
            let id = permission.id.to_string();
            let input_id = format!("perm-{id}");
            let mut attrs = vec![
                ("type", "checkbox"),
                ("class", "form-check-input"),
                ("name", "permissions"),
                ("id", input_id.as_str()),
                ("value", id.as_str()),
            ];
            if checked.contains(&permission.id) {
                attrs.push(("checked", "checked"));
            }
            builder
                .open("div", &[("class", "form-check")])
                .void("input", &attrs)
                .element(
                    "label",
                    &[("class", "form-check-label"), ("for", input_id.as_str())],
                    &permission.label(lang),
                )
                .close();
        }
        builder.close();
    }
    builder.build()
}
