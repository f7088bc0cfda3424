//! Logged complaints (read only)

use async_trait::async_trait;
use shared::Lang;
use shared::models::{CaseStatus, Complaint};

use super::{ListPage, text_matches};
use crate::ClientResult;
use crate::api::HrApi;
use crate::client::HttpClient;
use crate::render::format::{date_time, truncate};
use crate::render::{Affordance, Html, HtmlBuilder, Row, badge, labels};

/// Characters of the issue shown in the list
const ISSUE_PREVIEW: usize = 50;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplaintFilter {
    pub status: Option<CaseStatus>,
    /// Matches phone, name and issue text
    pub search: String,
}

/// The log has no mutations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoAction {}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComplaintStats {
    pub new: usize,
    pub referred: usize,
    pub resolved: usize,
}

impl ComplaintStats {
    pub fn from_complaints(complaints: &[Complaint]) -> Self {
        let count = |status: CaseStatus| complaints.iter().filter(|c| c.status == status).count();
        Self {
            new: count(CaseStatus::New),
            referred: count(CaseStatus::Referred),
            resolved: count(CaseStatus::Resolved),
        }
    }
}

/// WhatsApp chat page for a customer
pub fn chat_link(phone: &str) -> String {
    format!("/whatsapp/chat/{}", urlencoding::encode(phone.trim()))
}

#[derive(Debug, Default)]
pub struct ComplaintLogPage;

impl ComplaintLogPage {
    pub async fn detail<C: HttpClient>(&self, api: &HrApi<C>, id: i64) -> ClientResult<Complaint> {
        api.logged_complaint(id).await
    }

    pub fn detail_html(&self, complaint: &Complaint, lang: Lang) -> Html {
        let fields = [
            (lang.pick("العميل", "Customer"), complaint.customer_name.as_deref()),
            (lang.pick("الهاتف", "Phone"), Some(complaint.customer_phone.as_str())),
            (lang.pick("المشكلة", "Issue"), Some(complaint.issue_description.as_str())),
            (lang.pick("القسم المحال إليه", "Referred to"), complaint.referred_to_department.as_deref()),
            (lang.pick("رد الإدارة", "Management response"), complaint.management_response.as_deref()),
            (lang.pick("تفاصيل الحل", "Resolution"), complaint.resolution_details.as_deref()),
        ];
        let mut builder = HtmlBuilder::new();
        builder
            .open("div", &[("class", "complaint-detail")])
            .fragment(&badge(&labels::case_status(&complaint.status, lang)))
            .open("dl", &[]);
        for (label, value) in fields {
            let value = value.map(str::trim).filter(|v| !v.is_empty()).unwrap_or("-");
            builder.element("dt", &[], label).element("dd", &[], value);
        }
        builder
            .element("dt", &[], lang.pick("تاريخ الإنشاء", "Created"))
            .element("dd", &[], &date_time(complaint.created_at.as_deref(), lang));
        builder.build()
    }
}

#[async_trait]
impl ListPage for ComplaintLogPage {
    type Item = Complaint;
    type Filter = ComplaintFilter;
    type Action = NoAction;

    const NAME: &'static str = "complaints";

    async fn fetch<C: HttpClient>(
        &self,
        api: &HrApi<C>,
        _filter: &ComplaintFilter,
    ) -> ClientResult<Vec<Complaint>> {
        api.complaint_log().await
    }

    fn matches(&self, complaint: &Complaint, filter: &ComplaintFilter) -> bool {
        filter.status.as_ref().is_none_or(|s| *s == complaint.status)
            && text_matches(
                &filter.search,
                [
                    complaint.customer_phone.as_str(),
                    complaint.customer_name.as_deref().unwrap_or_default(),
                    complaint.issue_description.as_str(),
                ],
            )
    }

    fn headers(&self, lang: Lang) -> Vec<String> {
        [
            "#",
            lang.pick("العميل", "Customer"),
            lang.pick("الهاتف", "Phone"),
            lang.pick("المشكلة", "Issue"),
            lang.pick("الحالة", "Status"),
            lang.pick("التاريخ", "Date"),
            lang.pick("إجراءات", "Actions"),
        ]
        .map(str::to_string)
        .to_vec()
    }

    fn row(&self, complaint: &Complaint, lang: Lang) -> Row {
        Row::new(complaint.id)
            .text(&complaint.id.to_string())
            .text_or_dash(complaint.customer_name.as_deref())
            .text(&complaint.customer_phone)
            .text(&truncate(&complaint.issue_description, ISSUE_PREVIEW))
            .cell(badge(&labels::case_status(&complaint.status, lang)))
            .text(&date_time(complaint.created_at.as_deref(), lang))
            .action(Affordance::button("view", lang.pick("عرض", "View"), "info", complaint.id))
            .action(Affordance::link(
                "chat",
                lang.pick("محادثة", "Chat"),
                "success",
                chat_link(&complaint.customer_phone),
            ))
    }

    fn empty_text(&self, lang: Lang) -> String {
        lang.pick("لا توجد شكاوى", "No complaints").to_string()
    }

    async fn perform<C: HttpClient>(
        &self,
        _api: &HrApi<C>,
        action: &NoAction,
        _lang: Lang,
    ) -> ClientResult<String> {
        match *action {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complaint(id: i64, status: CaseStatus, issue: &str) -> Complaint {
        Complaint {
            id,
            customer_phone: "+966 500".into(),
            customer_name: Some("Noura".into()),
            issue_description: issue.into(),
            status,
            ..Default::default()
        }
    }

    #[test]
    fn test_stats() {
        let list = vec![
            complaint(1, CaseStatus::New, "a"),
            complaint(2, CaseStatus::New, "b"),
            complaint(3, CaseStatus::Resolved, "c"),
            complaint(4, CaseStatus::Other("archived".into()), "d"),
        ];
        assert_eq!(
            ComplaintStats::from_complaints(&list),
            ComplaintStats {
                new: 2,
                referred: 0,
                resolved: 1
            }
        );
    }

    #[test]
    fn test_row_truncates_and_links_chat() {
        let issue = "x".repeat(80);
        let row = ComplaintLogPage.row(&complaint(1, CaseStatus::New, &issue), Lang::En);
        assert_eq!(row.cells[3].as_str(), format!("{}...", "x".repeat(50)));
        let html = row.to_html().into_string();
        assert!(html.contains(r#"href="/whatsapp/chat/%2B966%20500""#));
    }

    #[test]
    fn test_filter_idempotent() {
        let page = ComplaintLogPage;
        let filter = ComplaintFilter {
            status: Some(CaseStatus::New),
            search: "noura".into(),
        };
        let list = vec![
            complaint(1, CaseStatus::New, "late"),
            complaint(2, CaseStatus::Resolved, "late"),
        ];
        let once: Vec<_> = list.iter().filter(|c| page.matches(c, &filter)).cloned().collect();
        let twice: Vec<_> = once.iter().filter(|c| page.matches(c, &filter)).cloned().collect();
        assert_eq!(once, twice);
        assert_eq!(once.len(), 1);
    }
}
