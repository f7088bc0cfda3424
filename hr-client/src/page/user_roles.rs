//! User role assignments
//!
//! Unlike the other lists this one is paginated and searched on the server,
//! so it has its own controller instead of a [`ListPage`](super::ListPage).

use shared::Lang;
use shared::models::{RoleAssignment, UserRoles, UserRolesPage, UserSummary};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{
    Confirm, LoadOutcome, MutateOutcome, acknowledged, generic_failure_text, load_error_text,
    load_into,
};
use crate::api::HrApi;
use crate::client::HttpClient;
use crate::notify::NoticeBoard;
use crate::render::{Html, HtmlBuilder, PageWindow, Row, Table, badge, Label};
use crate::request::RequestSlot;
use crate::{ClientError, ClientResult};

/// Rows per page of assignments
pub const PER_PAGE: u32 = 50;
/// Users offered in the assignment picker
pub const PICKER_SIZE: u32 = 100;

#[derive(Debug, Clone)]
pub enum UserRoleAction {
    Assign(RoleAssignment),
    /// Remove one assignment by its id
    Remove { id: i64 },
}

#[derive(Debug, Default)]
struct State {
    page: UserRolesPage,
    current: u32,
    search: String,
    loaded: bool,
}

/// Paginated user-role list
pub struct UserRolesController<C> {
    api: HrApi<C>,
    state: Arc<RwLock<State>>,
    slot: RequestSlot,
    notices: NoticeBoard,
    lang: Lang,
}

impl<C> Clone for UserRolesController<C> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            state: Arc::clone(&self.state),
            slot: self.slot.clone(),
            notices: self.notices.clone(),
            lang: self.lang,
        }
    }
}

impl<C: HttpClient + 'static> UserRolesController<C> {
    pub fn new(api: HrApi<C>, notices: NoticeBoard, lang: Lang) -> Self {
        Self {
            api,
            state: Arc::new(RwLock::new(State {
                current: 1,
                ..Default::default()
            })),
            slot: RequestSlot::new("user_roles"),
            notices,
            lang,
        }
    }

    /// Fetch the current page with the current search
    pub async fn load(&self) -> ClientResult<LoadOutcome> {
        let (current, search) = {
            let state = self.state.read().await;
            (state.current, state.search.clone())
        };
        load_into(
            &self.slot,
            &self.notices,
            &load_error_text(self.lang),
            self.api.user_roles(current, PER_PAGE, &search),
            || self.state.write(),
            |state: &mut State, page: UserRolesPage| {
                let count = page.user_roles.len();
                if page.current_page > 0 {
                    state.current = page.current_page;
                }
                state.page = page;
                state.loaded = true;
                Some(count)
            },
        )
        .await
    }

    /// Jump to a page and load it
    pub async fn go_to(&self, page: u32) -> ClientResult<LoadOutcome> {
        self.state.write().await.current = page.max(1);
        self.load().await
    }

    /// New search term; always restarts at page 1
    pub async fn search(&self, term: &str) -> ClientResult<LoadOutcome> {
        {
            let mut state = self.state.write().await;
            state.search = term.trim().to_string();
            state.current = 1;
        }
        self.load().await
    }

    /// Users for the assignment picker
    pub async fn users(&self) -> ClientResult<Vec<UserSummary>> {
        self.api.users(1, PICKER_SIZE).await.inspect_err(|e| {
            self.notices
                .error(e.user_message(self.lang.pick("خطأ في تحميل المستخدمين", "Error loading users")));
        })
    }

    pub async fn mutate(
        &self,
        action: UserRoleAction,
        confirm: &dyn Confirm,
    ) -> ClientResult<MutateOutcome> {
        let lang = self.lang;
        if let UserRoleAction::Assign(assignment) = &action
            && (assignment.user_id <= 0 || assignment.role_id <= 0)
        {
            let message = lang
                .pick("يرجى اختيار المستخدم والدور", "Select a user and a role")
                .to_string();
            self.notices.error(message.clone());
            return Err(ClientError::Validation(message));
        }
        if let UserRoleAction::Remove { .. } = &action
            && !confirm.confirm(lang.pick(
                "هل أنت متأكد من إزالة هذا الدور من المستخدم؟",
                "Remove this role from the user?",
            ))
        {
            return Ok(MutateOutcome::Declined);
        }

        let result = match &action {
            UserRoleAction::Assign(assignment) => self
                .api
                .assign_role(assignment)
                .await
                .map(|m| acknowledged(m, lang.pick("تم تعيين الدور بنجاح", "Role assigned"))),
            UserRoleAction::Remove { id } => self
                .api
                .remove_user_role(*id)
                .await
                .map(|m| acknowledged(m, lang.pick("تم إزالة الدور بنجاح", "Role removed"))),
        };

        match result {
            Ok(text) => {
                tracing::info!(resource = "user_roles", ?action, "Mutation succeeded");
                self.notices.success(text);
                if let Err(err) = self.load().await {
                    tracing::debug!(error = %err, "Reload after mutation failed");
                }
                Ok(MutateOutcome::Done)
            }
            Err(err) => {
                tracing::warn!(resource = "user_roles", ?action, error = %err, "Mutation failed");
                self.notices.error(err.user_message(&generic_failure_text(lang)));
                Err(err)
            }
        }
    }

    pub async fn entries(&self) -> Vec<UserRoles> {
        self.state.read().await.page.user_roles.clone()
    }

    pub async fn window(&self) -> PageWindow {
        let state = self.state.read().await;
        PageWindow::new(state.current, state.page.pages, state.page.total)
    }

    pub async fn view(&self) -> Table {
        let lang = self.lang;
        let rows = self
            .entries()
            .await
            .iter()
            .map(|entry| user_row(entry, lang))
            .collect();
        Table::new(
            vec![
                lang.pick("المستخدم", "User").to_string(),
                lang.pick("الأدوار", "Roles").to_string(),
                lang.pick("الدور الأساسي", "Primary role").to_string(),
            ],
            rows,
            lang.pick("لا يوجد مستخدمون", "No users found"),
        )
    }

    /// Table plus pagination control
    pub async fn render(&self) -> Html {
        let table = self.view().await.to_html();
        let pager = self.window().await.to_html(self.lang);
        Html::concat([table, pager])
    }

    pub fn cancel(&self) {
        self.slot.cancel();
    }
}

fn user_row(entry: &UserRoles, lang: Lang) -> Row {
    let mut roles = HtmlBuilder::new();
    for role in &entry.roles {
        roles.fragment(&badge(&Label {
            text: role.label(lang).to_string(),
            color: "info",
        }));
        if let Some(id) = role.id {
            let id = id.to_string();
            roles.element(
                "button",
                &[
                    ("type", "button"),
                    ("class", "btn btn-sm btn-link text-danger"),
                    ("data-action", "remove-role"),
                    ("data-id", id.as_str()),
                ],
                "×",
            );
        }
    }
    let primary = entry
        .primary_role
        .as_ref()
        .map(|r| r.label(lang).to_string());
    Row::new(entry.user_id)
        .text(&entry.username)
        .cell(roles.build())
        .text_or_dash(primary.as_deref())
}
