//! Localized labels and badge colors for enum values
//!
//! Unknown values render verbatim with the neutral `secondary` color.

use shared::Lang;
use shared::models::{CaseStatus, Category, ContactMethod, Department, PayrollStatus, Priority};

/// Text plus Bootstrap color suffix (`success` → `bg-success`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub text: String,
    pub color: &'static str,
}

impl Label {
    fn new(lang: Lang, ar: &str, en: &str, color: &'static str) -> Self {
        Self {
            text: lang.pick(ar, en).to_string(),
            color,
        }
    }

    fn raw(text: &str) -> Self {
        Self {
            text: text.to_string(),
            color: "secondary",
        }
    }
}

pub fn payroll_status(status: &PayrollStatus, lang: Lang) -> Label {
    match status {
        PayrollStatus::Pending => Label::new(lang, "قيد الانتظار", "Pending", "warning"),
        PayrollStatus::Approved => Label::new(lang, "معتمد", "Approved", "success"),
        PayrollStatus::Paid => Label::new(lang, "مدفوع", "Paid", "primary"),
        PayrollStatus::Cancelled => Label::new(lang, "ملغي", "Cancelled", "danger"),
        PayrollStatus::Other(raw) => Label::raw(raw),
    }
}

pub fn case_status(status: &CaseStatus, lang: Lang) -> Label {
    match status {
        CaseStatus::New => Label::new(lang, "جديدة", "New", "info"),
        CaseStatus::Assigned => Label::new(lang, "معينة", "Assigned", "primary"),
        CaseStatus::InProgress => Label::new(lang, "قيد المعالجة", "In Progress", "warning"),
        CaseStatus::Referred => Label::new(lang, "محالة للإدارة", "Referred", "secondary"),
        CaseStatus::WaitingResponse => {
            Label::new(lang, "بانتظار رد الإدارة", "Awaiting Response", "warning")
        }
        CaseStatus::SentToManager => Label::new(lang, "محولة للمدير", "Sent to Manager", "warning"),
        CaseStatus::ManagerResponded => Label::new(lang, "تم الرد", "Manager Responded", "primary"),
        CaseStatus::Transferred => Label::new(lang, "محولة", "Transferred", "secondary"),
        CaseStatus::Resolved => Label::new(lang, "محلولة", "Resolved", "success"),
        CaseStatus::Closed => Label::new(lang, "مغلقة", "Closed", "dark"),
        CaseStatus::Other(raw) => Label::raw(raw),
    }
}

pub fn priority(priority: &Priority, lang: Lang) -> Label {
    match priority {
        Priority::Urgent => Label::new(lang, "عاجل", "Urgent", "danger"),
        Priority::High => Label::new(lang, "عالي", "High", "warning"),
        Priority::Medium => Label::new(lang, "متوسط", "Medium", "info"),
        Priority::Low => Label::new(lang, "منخفض", "Low", "secondary"),
        Priority::Other(raw) => Label::raw(raw),
    }
}

pub fn category(category: &Category, lang: Lang) -> Label {
    match category {
        Category::Billing => Label::new(lang, "فواتير", "Billing", "success"),
        Category::Technical => Label::new(lang, "دعم فني", "Technical", "danger"),
        Category::Training => Label::new(lang, "تدريب", "Training", "info"),
        Category::General => Label::new(lang, "أخرى", "Other", "secondary"),
        Category::Other(raw) => Label::raw(raw),
    }
}

pub fn department(department: &Department, lang: Lang) -> Label {
    match department {
        Department::TechnicalSupport => {
            Label::new(lang, "الدعم الفني", "Technical Support", "info")
        }
        Department::Sales => Label::new(lang, "المبيعات", "Sales", "success"),
        Department::Management => Label::new(lang, "الإدارة", "Management", "primary"),
        Department::Other(raw) => Label::raw(raw),
    }
}

pub fn contact_method(method: Option<&ContactMethod>, lang: Lang) -> String {
    let text = match method {
        Some(ContactMethod::Phone) => lang.pick("اتصال هاتفي", "Phone call"),
        Some(ContactMethod::WhatsApp) => lang.pick("واتساب", "WhatsApp"),
        Some(ContactMethod::Email) => lang.pick("بريد إلكتروني", "Email"),
        Some(ContactMethod::Visit) => lang.pick("زيارة ميدانية", "Site visit"),
        Some(ContactMethod::Other(raw)) => raw.as_str(),
        None => lang.pick("غير محدد", "N/A"),
    };
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payroll_status_colors() {
        assert_eq!(payroll_status(&PayrollStatus::Pending, Lang::En).color, "warning");
        assert_eq!(payroll_status(&PayrollStatus::Paid, Lang::En).text, "Paid");
        assert_eq!(payroll_status(&PayrollStatus::Approved, Lang::Ar).text, "معتمد");
    }

    #[test]
    fn test_unknown_values_render_verbatim() {
        let label = case_status(&CaseStatus::Other("escalated".into()), Lang::Ar);
        assert_eq!(label.text, "escalated");
        assert_eq!(label.color, "secondary");
        let label = department(&Department::Other("legal".into()), Lang::En);
        assert_eq!(label.text, "legal");
    }

    #[test]
    fn test_contact_method() {
        assert_eq!(contact_method(None, Lang::Ar), "غير محدد");
        assert_eq!(contact_method(Some(&ContactMethod::WhatsApp), Lang::En), "WhatsApp");
    }
}
