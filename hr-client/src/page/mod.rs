//! Page controllers
//!
//! Every list page has the same shape: load a collection, filter it on the
//! client, render rows, and run mutations that reload on success. The
//! per-page parts live behind [`ListPage`]; [`ListController`] owns the
//! cache, the in-flight request, and the notices.

mod complaints;
mod employees;
mod manager_queue;
mod payroll;
mod permissions;
mod poll;
mod roles;
mod tasks;
mod tickets;
mod user_roles;

pub use complaints::{ComplaintFilter, ComplaintLogPage, ComplaintStats, NoAction, chat_link};
pub use employees::{
    EmployeeAction, EmployeeFilter, EmployeeStats, EmployeesPage, MIN_PASSWORD_LEN, PasswordFilter,
    departments,
};
pub use manager_queue::{ManagerQueuePage, QueueAction, QueueFilter, solution_notification};
pub use payroll::{
    PayrollAction, PayrollFilter, PayrollForm, PayrollPage, PayrollStats, parse_amount, parse_count,
};
pub use permissions::{
    InitializePermissions, PermissionFilter, PermissionsPage, render_permission_groups,
};
pub use poll::{PollHandle, Refresh, spawn_poller};
pub use roles::{RoleAction, RoleFilter, RolesPage};
pub use tasks::{TaskAction, TaskBoard, now, resolution_notification};
pub use tickets::{
    TicketDesk, TransferForm, render_stats, render_ticket_details, render_transfer_history,
    render_user_options, sort_newest_first,
};
pub use user_roles::{PER_PAGE, PICKER_SIZE, UserRoleAction, UserRolesController};

use async_trait::async_trait;
use shared::Lang;
use std::fmt;
use std::future::Future;
use std::ops::DerefMut;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::api::HrApi;
use crate::client::HttpClient;
use crate::notify::NoticeBoard;
use crate::render::{Html, Row, Table};
use crate::request::RequestSlot;
use crate::{ClientError, ClientResult};

/// Asks the user to confirm a destructive or irreversible action
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Confirms everything (scripted use and tests)
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

pub(crate) fn load_error_text(lang: Lang) -> String {
    lang.pick("خطأ في تحميل البيانات", "Error loading data").to_string()
}

pub(crate) fn generic_failure_text(lang: Lang) -> String {
    lang.pick("حدث خطأ، حاول مرة أخرى", "Something went wrong, try again")
        .to_string()
}

/// Server acknowledgement text, or `fallback` when it sent none
pub(crate) fn acknowledged(message: Option<String>, fallback: &str) -> String {
    message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

/// Case-insensitive contains over any of `fields`; an empty query matches
pub(crate) fn text_matches<'a>(query: &str, fields: impl IntoIterator<Item = &'a str>) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    fields
        .into_iter()
        .any(|field| field.to_lowercase().contains(&query))
}

/// Required form field check
pub(crate) fn require(value: &str, message: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(message.to_string())
    } else {
        Ok(())
    }
}

/// Superseding load shared by every controller.
///
/// Runs `fetch` under a fresh ticket from `slot`, then takes the caller's
/// lock and calls `apply` only while the ticket is still current. `apply`
/// returns the item count, or `None` when the response no longer fits the
/// state. A failure posts a notice (the server's text, else `failure_text`)
/// and leaves the state untouched.
pub(crate) async fn load_into<T, S, L, G>(
    slot: &RequestSlot,
    notices: &NoticeBoard,
    failure_text: &str,
    fetch: impl Future<Output = ClientResult<T>>,
    lock: impl FnOnce() -> L,
    apply: impl FnOnce(&mut S, T) -> Option<usize>,
) -> ClientResult<LoadOutcome>
where
    L: Future<Output = G>,
    G: DerefMut<Target = S>,
{
    let resource = slot.name();
    let ticket = slot.begin();
    tracing::debug!(resource, generation = ticket.generation(), "Loading");

    match ticket.run(fetch).await {
        Ok(value) => {
            let mut guard = lock().await;
            if !ticket.is_current() {
                tracing::warn!(resource, "Dropping stale response");
                return Ok(LoadOutcome::Superseded);
            }
            match apply(&mut *guard, value) {
                Some(count) => {
                    tracing::debug!(resource, count, "Loaded");
                    Ok(LoadOutcome::Applied(count))
                }
                None => Ok(LoadOutcome::Superseded),
            }
        }
        Err(ClientError::Superseded) => Ok(LoadOutcome::Superseded),
        Err(_) if !ticket.is_current() => Ok(LoadOutcome::Superseded),
        Err(err) => {
            tracing::warn!(resource, error = %err, "Load failed");
            notices.error(err.user_message(failure_text));
            Err(err)
        }
    }
}

/// The page-specific half of a list page
#[async_trait]
pub trait ListPage: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;
    type Filter: Clone + Default + Send + Sync + 'static;
    type Action: fmt::Debug + Send + Sync;

    /// Resource name used in logs
    const NAME: &'static str;

    /// Fetch the collection
    async fn fetch<C: HttpClient>(
        &self,
        api: &HrApi<C>,
        filter: &Self::Filter,
    ) -> ClientResult<Vec<Self::Item>>;

    /// Client-side predicate
    fn matches(&self, item: &Self::Item, filter: &Self::Filter) -> bool;

    /// Whether moving from the filter of the last load to `next` needs a
    /// new fetch. Only pages whose fetch is scoped by the filter say yes.
    fn refetch_on(&self, _loaded: &Self::Filter, _next: &Self::Filter) -> bool {
        false
    }

    fn headers(&self, lang: Lang) -> Vec<String>;

    fn row(&self, item: &Self::Item, lang: Lang) -> Row;

    fn empty_text(&self, lang: Lang) -> String {
        lang.pick("لا توجد بيانات", "No data available").to_string()
    }

    /// Prompt shown before the action runs; `None` runs it directly
    fn confirmation(&self, _action: &Self::Action, _lang: Lang) -> Option<String> {
        None
    }

    /// Local input checks; the error text is shown and nothing is sent
    fn validate(&self, _action: &Self::Action, _lang: Lang) -> Result<(), String> {
        Ok(())
    }

    /// Send the mutation and return the success notice text
    async fn perform<C: HttpClient>(
        &self,
        api: &HrApi<C>,
        action: &Self::Action,
        lang: Lang,
    ) -> ClientResult<String>;

    /// Notice text when the server gave no message of its own
    fn failure_text(&self, _action: &Self::Action, lang: Lang) -> String {
        generic_failure_text(lang)
    }
}

/// Result of [`ListController::load`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response replaced the cache
    Applied(usize),
    /// A newer load started first; the response was dropped
    Superseded,
}

/// Result of [`ListController::mutate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutateOutcome {
    Done,
    /// The user declined the confirmation; nothing was sent
    Declined,
}

#[derive(Debug)]
struct ListState<I, F> {
    items: Vec<I>,
    filter: F,
    /// Filter the cached items were fetched with
    fetched_with: Option<F>,
    loaded: bool,
}

/// Cache, filter, and mutation flow for one list page
pub struct ListController<P: ListPage, C> {
    page: Arc<P>,
    api: HrApi<C>,
    state: Arc<RwLock<ListState<P::Item, P::Filter>>>,
    slot: RequestSlot,
    notices: NoticeBoard,
    lang: Lang,
}

impl<P: ListPage, C> Clone for ListController<P, C> {
    fn clone(&self) -> Self {
        Self {
            page: Arc::clone(&self.page),
            api: self.api.clone(),
            state: Arc::clone(&self.state),
            slot: self.slot.clone(),
            notices: self.notices.clone(),
            lang: self.lang,
        }
    }
}

impl<P: ListPage, C: HttpClient + 'static> ListController<P, C> {
    pub fn new(page: P, api: HrApi<C>, notices: NoticeBoard, lang: Lang) -> Self {
        Self {
            page: Arc::new(page),
            api,
            state: Arc::new(RwLock::new(ListState {
                items: Vec::new(),
                filter: P::Filter::default(),
                fetched_with: None,
                loaded: false,
            })),
            slot: RequestSlot::new(P::NAME),
            notices,
            lang,
        }
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn api(&self) -> &HrApi<C> {
        &self.api
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn lang(&self) -> Lang {
        self.lang
    }

    /// Fetch the collection and replace the cache.
    ///
    /// A failed load keeps the previous cache and posts an error notice.
    /// Starting another load cancels this one.
    pub async fn load(&self) -> ClientResult<LoadOutcome> {
        let filter = self.state.read().await.filter.clone();
        load_into(
            &self.slot,
            &self.notices,
            &load_error_text(self.lang),
            self.page.fetch(&self.api, &filter),
            || self.state.write(),
            |state: &mut ListState<P::Item, P::Filter>, items: Vec<P::Item>| {
                let count = items.len();
                state.items = items;
                state.fetched_with = Some(filter.clone());
                state.loaded = true;
                Some(count)
            },
        )
        .await
    }

    /// Run a mutation: confirm, validate, send, notify, reload.
    ///
    /// Local state is never patched; the reload brings the server's view.
    pub async fn mutate(&self, action: P::Action, confirm: &dyn Confirm) -> ClientResult<MutateOutcome> {
        if let Err(message) = self.page.validate(&action, self.lang) {
            self.notices.error(message.clone());
            return Err(ClientError::Validation(message));
        }

        if let Some(prompt) = self.page.confirmation(&action, self.lang)
            && !confirm.confirm(&prompt)
        {
            tracing::debug!(resource = P::NAME, ?action, "Declined");
            return Ok(MutateOutcome::Declined);
        }

        match self.page.perform(&self.api, &action, self.lang).await {
            Ok(message) => {
                tracing::info!(resource = P::NAME, ?action, "Mutation succeeded");
                self.notices.success(message);
                if let Err(err) = self.load().await {
                    tracing::debug!(resource = P::NAME, error = %err, "Reload after mutation failed");
                }
                Ok(MutateOutcome::Done)
            }
            Err(err) => {
                tracing::warn!(resource = P::NAME, ?action, error = %err, "Mutation failed");
                let fallback = self.page.failure_text(&action, self.lang);
                self.notices.error(err.user_message(&fallback));
                Err(err)
            }
        }
    }

    /// Whether at least one load succeeded
    pub async fn is_loaded(&self) -> bool {
        self.state.read().await.loaded
    }

    /// The whole cache, unfiltered
    pub async fn items(&self) -> Vec<P::Item> {
        self.state.read().await.items.clone()
    }

    pub async fn filter(&self) -> P::Filter {
        self.state.read().await.filter.clone()
    }

    /// Cached items passing the current filter
    pub async fn visible(&self) -> Vec<P::Item> {
        let state = self.state.read().await;
        state
            .items
            .iter()
            .filter(|item| self.page.matches(item, &state.filter))
            .cloned()
            .collect()
    }

    /// Replace the filter and re-render from the cache. Fetches only when
    /// the page scopes its fetch by a field that changed.
    pub async fn set_filter(&self, filter: P::Filter) -> Table {
        self.update_filter(|current| *current = filter).await
    }

    /// Edit the filter in place and re-render, as [`Self::set_filter`]
    pub async fn update_filter(&self, edit: impl FnOnce(&mut P::Filter) + Send) -> Table {
        let refetch = {
            let mut state = self.state.write().await;
            edit(&mut state.filter);
            state
                .fetched_with
                .as_ref()
                .is_some_and(|loaded| self.page.refetch_on(loaded, &state.filter))
        };
        if refetch
            && let Err(err) = self.load().await
        {
            tracing::debug!(resource = P::NAME, error = %err, "Refetch after filter change failed");
        }
        self.view().await
    }

    /// Rows for the visible items
    pub async fn view(&self) -> Table {
        let rows = self
            .visible()
            .await
            .iter()
            .map(|item| self.page.row(item, self.lang))
            .collect();
        Table::new(
            self.page.headers(self.lang),
            rows,
            self.page.empty_text(self.lang),
        )
    }

    pub async fn render(&self) -> Html {
        self.view().await.to_html()
    }

    /// Cancel any in-flight load (page teardown)
    pub fn cancel(&self) {
        self.slot.cancel();
    }
}

#[async_trait]
impl<P: ListPage, C: HttpClient + 'static> Refresh for ListController<P, C> {
    async fn refresh(&self) {
        if let Err(err) = self.load().await {
            tracing::debug!(resource = P::NAME, error = %err, "Periodic refresh failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_matches() {
        assert!(text_matches("", ["anything"]));
        assert!(text_matches("  ", ["anything"]));
        assert!(text_matches("ALI", ["Ali Hassan", "E-01"]));
        assert!(text_matches("e-01", ["Ali Hassan", "E-01"]));
        assert!(text_matches("أحمد", ["محمد", "أحمد علي"]));
        assert!(!text_matches("zzz", ["Ali Hassan"]));
    }

    #[test]
    fn test_acknowledged_prefers_server_text() {
        assert_eq!(acknowledged(Some(" Saved by server ".into()), "Saved"), "Saved by server");
        assert_eq!(acknowledged(Some("  ".into()), "Saved"), "Saved");
        assert_eq!(acknowledged(None, "Saved"), "Saved");
    }

    #[test]
    fn test_require() {
        assert!(require("x", "missing").is_ok());
        assert_eq!(require("  ", "missing"), Err("missing".to_string()));
    }

    #[test]
    fn test_closure_confirm() {
        let yes = |_: &str| true;
        let no = |prompt: &str| prompt.is_empty();
        assert!(yes.confirm("delete?"));
        assert!(!no.confirm("delete?"));
        assert!(AlwaysConfirm.confirm("anything"));
    }
}
