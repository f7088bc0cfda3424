//! Client support tickets: transfers between departments, assignment,
//! status updates and statistics.

use shared::Lang;
use shared::models::{
    CaseStatus, Department, StatusUpdate, Ticket, TicketStats, TransferOutcome, TransferRecord,
    TransferRequest, UserSummary,
};
use std::cmp::Reverse;

use super::generic_failure_text;
use crate::api::HrApi;
use crate::client::HttpClient;
use crate::notify::NoticeBoard;
use crate::render::format::{date_time, parse_timestamp};
use crate::render::{Html, HtmlBuilder, badge, labels};
use crate::request::RequestSlot;
use crate::{ClientError, ClientResult};

/// Transfer dialog input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferForm {
    pub to_department: Option<Department>,
    pub to_user_id: Option<i64>,
    pub reason: String,
    pub notes: String,
}

impl TransferForm {
    fn to_request(&self, lang: Lang) -> Result<TransferRequest, String> {
        let Some(to_department) = self.to_department.clone() else {
            return Err(lang.pick("يرجى اختيار القسم", "Select a department").to_string());
        };
        let reason = self.reason.trim();
        if reason.is_empty() {
            return Err(lang
                .pick("يرجى كتابة سبب التحويل", "Enter a transfer reason")
                .to_string());
        }
        let notes = self.notes.trim();
        Ok(TransferRequest {
            to_department,
            to_user_id: self.to_user_id,
            transfer_reason: reason.to_string(),
            transfer_notes: (!notes.is_empty()).then(|| notes.to_string()),
        })
    }
}

/// Ticket actions; every endpoint uses the `{success, ...}` envelope
pub struct TicketDesk<C> {
    api: HrApi<C>,
    notices: NoticeBoard,
    history_slot: RequestSlot,
    lang: Lang,
}

impl<C> Clone for TicketDesk<C> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            notices: self.notices.clone(),
            history_slot: self.history_slot.clone(),
            lang: self.lang,
        }
    }
}

impl<C: HttpClient + 'static> TicketDesk<C> {
    pub fn new(api: HrApi<C>, notices: NoticeBoard, lang: Lang) -> Self {
        Self {
            api,
            notices,
            history_slot: RequestSlot::new("transfer_history"),
            lang,
        }
    }

    fn reject(&self, message: String) -> ClientError {
        self.notices.error(message.clone());
        ClientError::Validation(message)
    }

    fn report<T>(&self, result: ClientResult<T>, success: &str, failure: &str) -> ClientResult<T> {
        match result {
            Ok(value) => {
                self.notices.success(success);
                Ok(value)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Ticket action failed");
                self.notices.error(err.user_message(failure));
                Err(err)
            }
        }
    }

    pub async fn transfer(&self, ticket_id: i64, form: &TransferForm) -> ClientResult<TransferOutcome> {
        let lang = self.lang;
        let request = form.to_request(lang).map_err(|m| self.reject(m))?;
        tracing::info!(ticket_id, to = %request.to_department, "Transferring ticket");

        let result = self.api.transfer_ticket(ticket_id, &request).await;
        let success = result
            .as_ref()
            .ok()
            .and_then(|o| o.message.clone())
            .unwrap_or_else(|| lang.pick("تم التحويل بنجاح", "Ticket transferred").to_string());
        self.report(
            result,
            &success,
            lang.pick("حدث خطأ أثناء التحويل", "Error transferring the ticket"),
        )
    }

    pub async fn assign(&self, ticket_id: i64, user_id: Option<i64>) -> ClientResult<()> {
        let lang = self.lang;
        let Some(user_id) = user_id.filter(|id| *id > 0) else {
            return Err(self.reject(lang.pick("يرجى اختيار المستخدم", "Select a user").to_string()));
        };
        let result = self.api.assign_ticket(ticket_id, user_id).await;
        let success = result
            .as_ref()
            .ok()
            .cloned()
            .flatten()
            .unwrap_or_else(|| lang.pick("تم التعيين بنجاح", "Ticket assigned").to_string());
        self.report(
            result.map(|_| ()),
            &success,
            lang.pick("حدث خطأ أثناء التعيين", "Error assigning the ticket"),
        )
    }

    pub async fn update_status(
        &self,
        ticket_id: i64,
        status: CaseStatus,
        resolution_notes: Option<&str>,
    ) -> ClientResult<()> {
        let lang = self.lang;
        let update = StatusUpdate {
            status,
            resolution_notes: resolution_notes
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
        };
        let result = self.api.update_ticket_status(ticket_id, &update).await;
        let success = result
            .as_ref()
            .ok()
            .cloned()
            .flatten()
            .unwrap_or_else(|| lang.pick("تم تحديث الحالة بنجاح", "Status updated").to_string());
        self.report(
            result.map(|_| ()),
            &success,
            lang.pick("حدث خطأ أثناء تحديث الحالة", "Error updating the status"),
        )
    }

    /// Transfer history, newest first. Opening another ticket cancels a
    /// pending history request.
    pub async fn history(&self, ticket_id: i64) -> ClientResult<Vec<TransferRecord>> {
        let ticket = self.history_slot.begin();
        let mut records = ticket.run(self.api.transfer_history(ticket_id)).await.inspect_err(|e| {
            if !matches!(e, ClientError::Superseded) {
                self.notices.error(e.user_message(&generic_failure_text(self.lang)));
            }
        })?;
        if !ticket.is_current() {
            return Err(ClientError::Superseded);
        }
        sort_newest_first(&mut records);
        Ok(records)
    }

    pub async fn department_users(&self, department: &Department) -> ClientResult<Vec<UserSummary>> {
        self.api.department_users(department).await.inspect_err(|e| {
            tracing::warn!(%department, error = %e, "Department users unavailable");
        })
    }

    pub async fn stats(&self) -> ClientResult<TicketStats> {
        self.api.ticket_stats().await.inspect_err(|e| {
            self.notices.error(e.user_message(&generic_failure_text(self.lang)));
        })
    }
}

/// Sort by `created_at` descending; records without a time go last
pub fn sort_newest_first(records: &mut [TransferRecord]) {
    records.sort_by_key(|r| Reverse(r.created_at.as_deref().and_then(parse_timestamp)));
}

fn paragraph(builder: &mut HtmlBuilder, label: &str, value: &str) {
    builder
        .open("p", &[])
        .element("strong", &[], &format!("{label}:"))
        .text(" ")
        .text(value)
        .close();
}

pub fn render_ticket_details(ticket: &Ticket, lang: Lang) -> Html {
    let mut builder = HtmlBuilder::new();
    builder
        .open("div", &[("class", "ticket-details")])
        .open("div", &[("class", "row")])
        .open("div", &[("class", "col-md-6")]);
    paragraph(&mut builder, lang.pick("رقم التذكرة", "Ticket"), &format!("#{}", ticket.id));
    paragraph(&mut builder, lang.pick("العميل", "Client"), &ticket.client_name);
    paragraph(&mut builder, lang.pick("الهاتف", "Phone"), &ticket.client_phone);
    if let Some(email) = ticket.client_email.as_deref().filter(|e| !e.is_empty()) {
        paragraph(&mut builder, lang.pick("البريد", "Email"), email);
    }
    if let Some(company) = ticket.client_company.as_deref().filter(|c| !c.is_empty()) {
        paragraph(&mut builder, lang.pick("الشركة", "Company"), company);
    }
    builder.close().open("div", &[("class", "col-md-6")]);

    let badge_line = |builder: &mut HtmlBuilder, label: &str, html: Html| {
        builder
            .open("p", &[])
            .element("strong", &[], &format!("{label}:"))
            .text(" ")
            .fragment(&html)
            .close();
    };
    if let Some(department) = &ticket.department {
        badge_line(
            &mut builder,
            lang.pick("القسم", "Department"),
            badge(&labels::department(department, lang)),
        );
    }
    badge_line(
        &mut builder,
        lang.pick("الحالة", "Status"),
        badge(&labels::case_status(&ticket.status, lang)),
    );
    badge_line(
        &mut builder,
        lang.pick("الأولوية", "Priority"),
        badge(&labels::priority(&ticket.priority, lang)),
    );
    paragraph(
        &mut builder,
        lang.pick("التحويلات", "Transfers"),
        &ticket.transfer_count.to_string(),
    );
    builder.close().close();

    let sections = [
        (lang.pick("المشكلة", "Issue"), Some(ticket.issue.as_str())),
        (lang.pick("رد الإدارة", "Admin response"), ticket.admin_response.as_deref()),
        (lang.pick("ملاحظات الحل", "Resolution notes"), ticket.resolution_notes.as_deref()),
    ];
    for (label, text) in sections {
        let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
            continue;
        };
        builder
            .open("div", &[("class", "mt-3")])
            .open("p", &[])
            .element("strong", &[], &format!("{label}:"))
            .close()
            .element("p", &[], text)
            .close();
    }
    builder.build()
}

/// Timeline of transfers; the first entry is marked `latest`
pub fn render_transfer_history(records: &[TransferRecord], lang: Lang) -> Html {
    let mut builder = HtmlBuilder::new();
    if records.is_empty() {
        builder.element(
            "p",
            &[("class", "text-center text-muted")],
            lang.pick("لا يوجد تاريخ تحويلات", "No transfer history"),
        );
        return builder.build();
    }

    let department = |d: &Option<Department>| match d {
        Some(d) => labels::department(d, lang).text,
        None => "-".to_string(),
    };

    builder.open("div", &[("class", "transfer-timeline")]);
    for (index, record) in records.iter().enumerate() {
        let class = if index == 0 { "transfer-item mb-3 latest" } else { "transfer-item mb-3" };
        builder
            .open("div", &[("class", class)])
            .open("h6", &[])
            .element("span", &[("class", "badge bg-info")], &department(&record.from_department))
            .text(" → ")
            .element("span", &[("class", "badge bg-success")], &department(&record.to_department))
            .close();
        paragraph(&mut builder, lang.pick("السبب", "Reason"), &record.transfer_reason);
        if let Some(notes) = record.transfer_notes.as_deref().filter(|n| !n.is_empty()) {
            paragraph(&mut builder, lang.pick("ملاحظات", "Notes"), notes);
        }
        let mut by = format!(
            "{}: {}",
            lang.pick("بواسطة", "By"),
            record.transferred_by_name.as_deref().unwrap_or("-")
        );
        if let Some(to) = record.to_user_name.as_deref().filter(|n| !n.is_empty()) {
            by.push_str(&format!(" | {}: {to}", lang.pick("إلى", "To")));
        }
        builder
            .element("small", &[("class", "text-muted")], &by)
            .element(
                "small",
                &[("class", "text-muted float-end")],
                &date_time(record.created_at.as_deref(), lang),
            )
            .close();
    }
    builder.build()
}

/// `<option>` list for the target-user select
pub fn render_user_options(users: &[UserSummary], lang: Lang) -> Html {
    let mut builder = HtmlBuilder::new();
    builder.element("option", &[("value", "")], lang.pick("اختر المستخدم", "Select a user"));
    for user in users {
        let id = user.id.to_string();
        builder.element("option", &[("value", id.as_str())], &user.username);
    }
    builder.build()
}

/// Summary cards plus per-department counts
pub fn render_stats(stats: &TicketStats, lang: Lang) -> Html {
    let mut builder = HtmlBuilder::new();
    builder.open("div", &[("class", "ticket-stats")]);
    for (key, label, value) in [
        ("total", lang.pick("الإجمالي", "Total"), stats.total),
        ("open", lang.pick("مفتوحة", "Open"), stats.open),
        ("resolved", lang.pick("محلولة", "Resolved"), stats.resolved),
        ("transfers", lang.pick("التحويلات", "Transfers"), stats.total_transfers),
    ] {
        builder
            .open("div", &[("class", "stat-card"), ("data-stat", key)])
            .element("span", &[("class", "stat-label")], label)
            .element("strong", &[], &value.to_string())
            .close();
    }
    builder.open("ul", &[("class", "list-unstyled")]);
    for (code, entry) in &stats.by_department {
        let name = if entry.name.is_empty() {
            labels::department(&Department::from(code.as_str()), lang).text
        } else {
            entry.name.clone()
        };
        builder.element("li", &[], &format!("{name}: {}", entry.count));
    }
    builder.build()
}
