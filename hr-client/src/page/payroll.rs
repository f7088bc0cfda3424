//! Payroll list, form and payslips

use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::Lang;
use shared::models::{Employee, Payroll, PayrollInput, PayrollQuery, PayrollStatus, PayrollTemplate};
use shared::salary::{SalaryBreakdown, SalaryInputs, calculate, to_decimal, to_f64};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::{ListPage, acknowledged, text_matches};
use crate::ClientResult;
use crate::api::{HrApi, payslip_path};
use crate::client::HttpClient;
use crate::render::format::{currency, date, period};
use crate::render::{Affordance, Html, HtmlBuilder, Row, badge, labels};

/// Period and status scope the server query; the search is applied to the
/// cached records only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayrollFilter {
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub status: Option<PayrollStatus>,
    /// Matches employee name or code
    pub search: String,
}

impl PayrollFilter {
    pub fn query(&self) -> PayrollQuery {
        PayrollQuery {
            month: self.month,
            year: self.year,
            status: self.status.clone(),
            search: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum PayrollAction {
    /// Create when `id` is `None`, update otherwise
    Save {
        id: Option<i64>,
        input: PayrollInput,
    },
    Approve(i64),
    MarkPaid(i64),
    Delete(i64),
    GenerateBatch {
        month: u32,
        year: i32,
    },
}

/// Totals over the visible records
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PayrollStats {
    pub count: usize,
    pub gross: f64,
    pub deductions: f64,
    pub net: f64,
}

impl PayrollStats {
    pub fn from_records(records: &[Payroll]) -> Self {
        let sum = |pick: fn(&Payroll) -> f64| -> f64 {
            to_f64(records.iter().map(|r| to_decimal(pick(r))).sum::<Decimal>())
        };
        Self {
            count: records.len(),
            gross: sum(|r| r.gross_salary),
            deductions: sum(|r| r.total_deductions),
            net: sum(|r| r.net),
        }
    }
}

/// Payroll list page; keeps the employee directory for names
#[derive(Debug, Default)]
pub struct PayrollPage {
    directory: RwLock<HashMap<i64, Employee>>,
}

impl PayrollPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_directory(&self, employees: Vec<Employee>) {
        let mut directory = self.directory.write().unwrap_or_else(PoisonError::into_inner);
        *directory = employees.into_iter().map(|e| (e.id, e)).collect();
    }

    pub fn employee(&self, id: i64) -> Option<Employee> {
        self.directory
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    /// Employee name, or `#id` when unknown
    pub fn employee_name(&self, id: i64) -> String {
        self.employee(id)
            .map(|e| e.display_name().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("#{id}"))
    }

    fn directory_is_empty(&self) -> bool {
        self.directory
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    /// Fill the form from the employee's salary template
    pub async fn prefill<C: HttpClient>(
        &self,
        api: &HrApi<C>,
        form: &mut PayrollForm,
    ) -> ClientResult<()> {
        let Some(employee_id) = form.employee_id else {
            return Ok(());
        };
        let template = api.payroll_template(employee_id).await?;
        form.apply_template(&template);
        Ok(())
    }

    /// Full breakdown of one record
    pub fn detail_html(&self, record: &Payroll, lang: Lang) -> Html {
        let lines: [(&str, &str, f64); 18] = [
            ("الراتب الأساسي", "Basic salary", record.basic),
            ("بدل السكن", "Housing allowance", record.housing_allowance),
            ("بدل المواصلات", "Transport allowance", record.transport_allowance),
            ("بدل الطعام", "Food allowance", record.food_allowance),
            ("بدل الهاتف", "Phone allowance", record.phone_allowance),
            ("بدلات أخرى", "Other allowances", record.other_allowances),
            ("المكافأة", "Bonus", record.bonus),
            ("العمولة", "Commission", record.commission),
            ("الحوافز", "Incentives", record.incentives),
            ("العمل الإضافي", "Overtime", record.overtime_amount),
            ("خصم الغياب", "Absence deduction", record.absence_deduction),
            ("خصم التأخير", "Late deduction", record.late_deduction),
            ("خصم السلفة", "Loan deduction", record.loan_deduction),
            ("خصومات أخرى", "Other deductions", record.other_deductions),
            ("الضريبة", "Tax", record.tax),
            ("التأمينات", "Insurance", record.insurance),
            ("إجمالي الراتب", "Gross salary", record.gross_salary),
            ("إجمالي الخصومات", "Total deductions", record.total_deductions),
        ];

        let mut builder = HtmlBuilder::new();
        builder.open("div", &[("class", "payroll-detail")]);
        builder.element("h5", &[], &self.employee_name(record.employee_id));
        builder.element(
            "p",
            &[("class", "text-muted")],
            &format!(
                "{} · {}",
                period(record.month, record.year, lang),
                date(record.generated_at.as_deref(), lang)
            ),
        );
        builder.fragment(&badge(&labels::payroll_status(&record.status, lang)));
        builder.open("table", &[("class", "table table-sm")]).open("tbody", &[]);
        for (ar, en, amount) in lines {
            builder
                .open("tr", &[])
                .element("th", &[], lang.pick(ar, en))
                .element("td", &[], &currency(amount, lang))
                .close();
        }
        builder
            .open("tr", &[("class", "table-success")])
            .element("th", &[], lang.pick("صافي الراتب", "Net salary"))
            .element("td", &[], &currency(record.net, lang))
            .close();
        builder.close().close();
        if let Some(notes) = record.notes.as_deref().filter(|n| !n.trim().is_empty()) {
            builder.element("p", &[("class", "notes")], notes);
        }
        builder.build()
    }
}

#[async_trait]
impl ListPage for PayrollPage {
    type Item = Payroll;
    type Filter = PayrollFilter;
    type Action = PayrollAction;

    const NAME: &'static str = "payroll";

    async fn fetch<C: HttpClient>(
        &self,
        api: &HrApi<C>,
        filter: &PayrollFilter,
    ) -> ClientResult<Vec<Payroll>> {
        if self.directory_is_empty() {
            match api.employees().await {
                Ok(employees) => self.set_directory(employees),
                Err(e) => tracing::warn!(error = %e, "Employee directory unavailable"),
            }
        }
        api.payrolls(&filter.query()).await
    }

    fn refetch_on(&self, loaded: &PayrollFilter, next: &PayrollFilter) -> bool {
        loaded.query() != next.query()
    }

    fn matches(&self, record: &Payroll, filter: &PayrollFilter) -> bool {
        if filter.month.is_some_and(|m| m != record.month)
            || filter.year.is_some_and(|y| y != record.year)
            || filter.status.as_ref().is_some_and(|s| *s != record.status)
        {
            return false;
        }
        if filter.search.trim().is_empty() {
            return true;
        }
        let employee = self.employee(record.employee_id);
        let name = employee.as_ref().map(Employee::display_name).unwrap_or_default();
        let code = employee
            .as_ref()
            .and_then(Employee::employee_code)
            .unwrap_or_default();
        text_matches(&filter.search, [name, code])
    }

    fn headers(&self, lang: Lang) -> Vec<String> {
        [
            lang.pick("الموظف", "Employee"),
            lang.pick("الفترة", "Period"),
            lang.pick("الراتب الأساسي", "Basic"),
            lang.pick("الإجمالي", "Gross"),
            lang.pick("الخصومات", "Deductions"),
            lang.pick("الصافي", "Net"),
            lang.pick("الحالة", "Status"),
            lang.pick("إجراءات", "Actions"),
        ]
        .map(str::to_string)
        .to_vec()
    }

    fn row(&self, record: &Payroll, lang: Lang) -> Row {
        let id = record.id;
        let mut row = Row::new(id)
            .text(&self.employee_name(record.employee_id))
            .text(&period(record.month, record.year, lang))
            .text(&currency(record.basic, lang))
            .text(&currency(record.gross_salary, lang))
            .text(&currency(record.total_deductions, lang))
            .text(&currency(record.net, lang))
            .cell(badge(&labels::payroll_status(&record.status, lang)))
            .action(Affordance::button("view", lang.pick("عرض", "View"), "info", id));

        match record.status {
            PayrollStatus::Pending => {
                row = row
                    .action(Affordance::button("edit", lang.pick("تعديل", "Edit"), "warning", id))
                    .action(Affordance::button("approve", lang.pick("اعتماد", "Approve"), "success", id));
            }
            PayrollStatus::Approved => {
                row = row.action(Affordance::button("pay", lang.pick("صرف", "Mark paid"), "primary", id));
            }
            PayrollStatus::Paid => {
                row = row.action(Affordance::link(
                    "download",
                    lang.pick("قسيمة الراتب", "Payslip"),
                    "secondary",
                    payslip_path(id),
                ));
            }
            PayrollStatus::Cancelled | PayrollStatus::Other(_) => {}
        }

        if record.status != PayrollStatus::Paid {
            row = row.action(Affordance::button("delete", lang.pick("حذف", "Delete"), "danger", id));
        }
        row
    }

    fn empty_text(&self, lang: Lang) -> String {
        lang.pick("لا توجد رواتب لهذه الفترة", "No payroll records for this period")
            .to_string()
    }

    fn confirmation(&self, action: &PayrollAction, lang: Lang) -> Option<String> {
        let text = match action {
            PayrollAction::Save { .. } => return None,
            PayrollAction::Approve(_) => lang.pick(
                "هل أنت متأكد من اعتماد هذا الراتب؟",
                "Approve this payroll?",
            ),
            PayrollAction::MarkPaid(_) => lang.pick(
                "هل أنت متأكد من صرف هذا الراتب؟",
                "Mark this payroll as paid?",
            ),
            PayrollAction::Delete(_) => lang.pick(
                "هل أنت متأكد من حذف هذا الراتب؟",
                "Delete this payroll?",
            ),
            PayrollAction::GenerateBatch { month, year } => {
                return Some(format!(
                    "{} {}?",
                    lang.pick("إنشاء رواتب جميع الموظفين لفترة", "Generate payroll for all employees for"),
                    period(*month, *year, lang)
                ));
            }
        };
        Some(text.to_string())
    }

    fn validate(&self, action: &PayrollAction, lang: Lang) -> Result<(), String> {
        let (month, year) = match action {
            PayrollAction::Save { input, .. } => {
                if input.employee_id <= 0 {
                    return Err(lang.pick("يرجى اختيار الموظف", "Select an employee").to_string());
                }
                if input.basic < 0.0 {
                    return Err(lang
                        .pick("الراتب الأساسي غير صالح", "Invalid basic salary")
                        .to_string());
                }
                if let Err(e) = salary_inputs(input).validate() {
                    tracing::debug!(error = %e, "Payroll input rejected");
                    return Err(format!(
                        "{}: {}",
                        lang.pick("قيمة غير صالحة", "Invalid value"),
                        e.field()
                    ));
                }
                (input.month, input.year)
            }
            PayrollAction::GenerateBatch { month, year } => (*month, *year),
            _ => return Ok(()),
        };
        if !(1..=12).contains(&month) || year <= 0 {
            return Err(lang.pick("الفترة غير صالحة", "Invalid period").to_string());
        }
        Ok(())
    }

    async fn perform<C: HttpClient>(
        &self,
        api: &HrApi<C>,
        action: &PayrollAction,
        lang: Lang,
    ) -> ClientResult<String> {
        let (message, fallback) = match action {
            PayrollAction::Save { id: None, input } => (
                api.create_payroll(input).await?,
                lang.pick("تم إنشاء الراتب بنجاح", "Payroll created"),
            ),
            PayrollAction::Save { id: Some(id), input } => (
                api.update_payroll(*id, input).await?,
                lang.pick("تم تحديث الراتب بنجاح", "Payroll updated"),
            ),
            PayrollAction::Approve(id) => (
                api.approve_payroll(*id).await?,
                lang.pick("تم اعتماد الراتب بنجاح", "Payroll approved"),
            ),
            PayrollAction::MarkPaid(id) => (
                api.pay_payroll(*id).await?,
                lang.pick("تم صرف الراتب بنجاح", "Payroll marked as paid"),
            ),
            PayrollAction::Delete(id) => (
                api.delete_payroll(*id).await?,
                lang.pick("تم حذف الراتب بنجاح", "Payroll deleted"),
            ),
            PayrollAction::GenerateBatch { month, year } => {
                let result = api.generate_payroll_batch(*month, *year).await?;
                return Ok(format!(
                    "{} {} {}",
                    lang.pick("تم إنشاء رواتب", "Generated payroll for"),
                    result.count,
                    lang.pick("موظف", "employees")
                ));
            }
        };
        Ok(acknowledged(message, fallback))
    }

    fn failure_text(&self, action: &PayrollAction, lang: Lang) -> String {
        let text = match action {
            PayrollAction::Save { .. } => lang.pick("خطأ في حفظ الراتب", "Error saving payroll"),
            PayrollAction::Approve(_) => lang.pick("خطأ في اعتماد الراتب", "Error approving payroll"),
            PayrollAction::MarkPaid(_) => lang.pick("خطأ في صرف الراتب", "Error paying payroll"),
            PayrollAction::Delete(_) => lang.pick("خطأ في حذف الراتب", "Error deleting payroll"),
            PayrollAction::GenerateBatch { .. } => {
                lang.pick("خطأ في إنشاء الرواتب", "Error generating payroll")
            }
        };
        text.to_string()
    }
}

/// Calculator inputs carried by a save payload
fn salary_inputs(input: &PayrollInput) -> SalaryInputs {
    SalaryInputs {
        basic: input.basic,
        housing_allowance: input.housing_allowance,
        transport_allowance: input.transport_allowance,
        food_allowance: input.food_allowance,
        phone_allowance: input.phone_allowance,
        other_allowances: input.other_allowances,
        bonus: input.bonus,
        commission: input.commission,
        incentives: input.incentives,
        overtime_hours: input.overtime_hours,
        overtime_rate: None,
        absence_days: input.absence_days,
        late_minutes: input.late_minutes,
        loan_deduction: input.loan_deduction,
        other_deductions: input.other_deductions,
    }
}

/// Lenient amount parsing for form fields: blank or invalid reads as zero.
/// Accepts Arabic-Indic digits and thousands separators.
pub fn parse_amount(raw: &str) -> f64 {
    let normalized: String = raw
        .trim()
        .chars()
        .filter_map(|c| match c {
            '٠'..='٩' => char::from_digit(c as u32 - '٠' as u32, 10),
            '٫' => Some('.'),
            ',' | '٬' | ' ' => None,
            _ => Some(c),
        })
        .collect();
    normalized
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Whole-number variant of [`parse_amount`] (days, minutes)
pub fn parse_count(raw: &str) -> i64 {
    parse_amount(raw).trunc() as i64
}

/// Create/edit form with a live breakdown
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PayrollForm {
    pub employee_id: Option<i64>,
    pub month: u32,
    pub year: i32,
    pub inputs: SalaryInputs,
    pub notes: String,
}

impl PayrollForm {
    pub fn new(month: u32, year: i32) -> Self {
        Self {
            month,
            year,
            ..Default::default()
        }
    }

    pub fn from_record(record: &Payroll) -> Self {
        Self {
            employee_id: Some(record.employee_id),
            month: record.month,
            year: record.year,
            inputs: SalaryInputs {
                basic: record.basic,
                housing_allowance: record.housing_allowance,
                transport_allowance: record.transport_allowance,
                food_allowance: record.food_allowance,
                phone_allowance: record.phone_allowance,
                other_allowances: record.other_allowances,
                bonus: record.bonus,
                commission: record.commission,
                incentives: record.incentives,
                overtime_hours: record.overtime_hours,
                overtime_rate: None,
                absence_days: record.absence_days,
                late_minutes: record.late_minutes,
                loan_deduction: record.loan_deduction,
                other_deductions: record.other_deductions,
            },
            notes: record.notes.clone().unwrap_or_default(),
        }
    }

    /// Set a field by its input name; returns false for unknown names
    pub fn set(&mut self, field: &str, raw: &str) -> bool {
        let inputs = &mut self.inputs;
        match field {
            "basic" | "basic_salary" => inputs.basic = parse_amount(raw),
            "housing_allowance" => inputs.housing_allowance = parse_amount(raw),
            "transport_allowance" => inputs.transport_allowance = parse_amount(raw),
            "food_allowance" => inputs.food_allowance = parse_amount(raw),
            "phone_allowance" => inputs.phone_allowance = parse_amount(raw),
            "other_allowances" => inputs.other_allowances = parse_amount(raw),
            "bonus" => inputs.bonus = parse_amount(raw),
            "commission" => inputs.commission = parse_amount(raw),
            "incentives" => inputs.incentives = parse_amount(raw),
            "overtime_hours" => inputs.overtime_hours = parse_amount(raw),
            "overtime_rate" => inputs.overtime_rate = Some(parse_amount(raw)),
            "absence_days" => inputs.absence_days = parse_count(raw),
            "late_minutes" => inputs.late_minutes = parse_count(raw),
            "loan_deduction" => inputs.loan_deduction = parse_amount(raw),
            "other_deductions" => inputs.other_deductions = parse_amount(raw),
            "notes" => self.notes = raw.to_string(),
            _ => return false,
        }
        true
    }

    /// Copy the salary template, keeping variable fields as entered
    pub fn apply_template(&mut self, template: &PayrollTemplate) {
        let inputs = &mut self.inputs;
        inputs.basic = template.basic_salary;
        inputs.housing_allowance = template.housing_allowance;
        inputs.transport_allowance = template.transport_allowance;
        inputs.food_allowance = template.food_allowance;
        inputs.phone_allowance = template.phone_allowance;
        inputs.other_allowances = template.other_allowances;
        if template.overtime_rate.is_some() {
            inputs.overtime_rate = template.overtime_rate;
        }
    }

    pub fn breakdown(&self) -> SalaryBreakdown {
        calculate(&self.inputs)
    }

    /// Save payload; computed amounts come from [`calculate`]
    pub fn to_input(&self) -> PayrollInput {
        let b = self.breakdown();
        let i = &self.inputs;
        PayrollInput {
            employee_id: self.employee_id.unwrap_or_default(),
            month: self.month,
            year: self.year,
            basic: i.basic,
            housing_allowance: i.housing_allowance,
            transport_allowance: i.transport_allowance,
            food_allowance: i.food_allowance,
            phone_allowance: i.phone_allowance,
            other_allowances: i.other_allowances,
            bonus: i.bonus,
            commission: i.commission,
            incentives: i.incentives,
            overtime_hours: i.overtime_hours,
            overtime_amount: b.overtime_amount,
            absence_days: i.absence_days,
            absence_deduction: b.absence_deduction,
            late_minutes: i.late_minutes,
            late_deduction: b.late_deduction,
            loan_deduction: i.loan_deduction,
            other_deductions: i.other_deductions,
            notes: Some(self.notes.trim().to_string()).filter(|n| !n.is_empty()),
        }
    }

    /// Live totals shown under the form
    pub fn summary_html(&self, lang: Lang) -> Html {
        let b = self.breakdown();
        let lines = [
            ("overtime_amount", lang.pick("العمل الإضافي", "Overtime"), b.overtime_amount),
            ("absence_deduction", lang.pick("خصم الغياب", "Absence"), b.absence_deduction),
            ("late_deduction", lang.pick("خصم التأخير", "Late"), b.late_deduction),
            ("gross", lang.pick("إجمالي الراتب", "Gross"), b.gross),
            ("tax", lang.pick("الضريبة", "Tax"), b.tax),
            ("insurance", lang.pick("التأمينات", "Insurance"), b.insurance),
            ("health_insurance", lang.pick("التأمين الصحي", "Health insurance"), b.health_insurance),
            ("total_deductions", lang.pick("إجمالي الخصومات", "Total deductions"), b.total_deductions),
            ("net", lang.pick("صافي الراتب", "Net"), b.net),
        ];
        let mut builder = HtmlBuilder::new();
        builder.open("dl", &[("class", "row payroll-summary")]);
        for (key, label, amount) in lines {
            builder
                .element("dt", &[("class", "col-6")], label)
                .element("dd", &[("class", "col-6"), ("data-field", key)], &currency(amount, lang));
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, status: PayrollStatus) -> Payroll {
        Payroll {
            id,
            employee_id: 7,
            month: 3,
            year: 2025,
            basic: 3000.0,
            gross_salary: 3000.0,
            total_deductions: 390.0,
            net: 2610.0,
            status,
            ..Default::default()
        }
    }

    #[test]
    fn test_status_gated_actions() {
        let page = PayrollPage::new();
        let pending = page.row(&record(1, PayrollStatus::Pending), Lang::En);
        assert_eq!(pending.action_keys(), vec!["view", "edit", "approve", "delete"]);
        assert!(!pending.offers("download"));

        let approved = page.row(&record(2, PayrollStatus::Approved), Lang::En);
        assert_eq!(approved.action_keys(), vec!["view", "pay", "delete"]);

        let paid = page.row(&record(3, PayrollStatus::Paid), Lang::En);
        assert_eq!(paid.action_keys(), vec!["view", "download"]);
        assert!(!paid.offers("edit") && !paid.offers("delete"));
    }

    #[test]
    fn test_unknown_employee_shows_id() {
        let page = PayrollPage::new();
        let row = page.row(&record(1, PayrollStatus::Pending), Lang::En);
        assert_eq!(row.cells[0].as_str(), "#7");
        page.set_directory(vec![Employee {
            id: 7,
            name: Some("<Sara>".into()),
            ..Default::default()
        }]);
        let row = page.row(&record(1, PayrollStatus::Pending), Lang::En);
        assert_eq!(row.cells[0].as_str(), "&lt;Sara&gt;");
    }

    #[test]
    fn test_filter_by_period_status_and_name() {
        let page = PayrollPage::new();
        page.set_directory(vec![Employee {
            id: 7,
            name: Some("Sara".into()),
            code: Some("E-7".into()),
            ..Default::default()
        }]);
        let r = record(1, PayrollStatus::Approved);
        let mut filter = PayrollFilter {
            month: Some(3),
            year: Some(2025),
            ..Default::default()
        };
        assert!(page.matches(&r, &filter));
        filter.status = Some(PayrollStatus::Pending);
        assert!(!page.matches(&r, &filter));
        filter.status = None;
        filter.search = "e-7".into();
        assert!(page.matches(&r, &filter));
        filter.search = "omar".into();
        assert!(!page.matches(&r, &filter));
    }

    #[test]
    fn test_stats() {
        let stats = PayrollStats::from_records(&[
            record(1, PayrollStatus::Pending),
            record(2, PayrollStatus::Paid),
        ]);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.gross, 6000.0);
        assert_eq!(stats.deductions, 780.0);
        assert_eq!(stats.net, 5220.0);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("abc"), 0.0);
        assert_eq!(parse_amount("1,250.5"), 1250.5);
        assert_eq!(parse_amount("٣٠٠٠"), 3000.0);
        assert_eq!(parse_amount("NaN"), 0.0);
        assert_eq!(parse_count("2.9"), 2);
    }

    #[test]
    fn test_form_computes_amounts() {
        let mut form = PayrollForm::new(3, 2025);
        form.employee_id = Some(7);
        assert!(form.set("basic", "3000"));
        assert!(form.set("absence_days", "2"));
        assert!(!form.set("unknown", "1"));
        let input = form.to_input();
        assert_eq!(input.absence_deduction, 200.0);
        assert_eq!(input.employee_id, 7);
        assert_eq!(input.notes, None);
        assert!(form.summary_html(Lang::En).as_str().contains(r#"data-field="absence_deduction">200.00"#));
    }

    #[test]
    fn test_template_keeps_variable_fields() {
        let mut form = PayrollForm::new(1, 2025);
        form.set("bonus", "100");
        form.apply_template(&PayrollTemplate {
            basic_salary: 2400.0,
            housing_allowance: 500.0,
            overtime_rate: Some(2.0),
            ..Default::default()
        });
        assert_eq!(form.inputs.basic, 2400.0);
        assert_eq!(form.inputs.bonus, 100.0);
        assert_eq!(form.inputs.overtime_rate, Some(2.0));
    }

    #[test]
    fn test_validation() {
        let page = PayrollPage::new();
        let missing_employee = PayrollAction::Save {
            id: None,
            input: PayrollInput {
                month: 3,
                year: 2025,
                ..Default::default()
            },
        };
        assert!(page.validate(&missing_employee, Lang::En).is_err());
        let bad_batch = PayrollAction::GenerateBatch { month: 13, year: 2025 };
        assert_eq!(page.validate(&bad_batch, Lang::En), Err("Invalid period".into()));
        assert!(page.validate(&PayrollAction::Approve(1), Lang::En).is_ok());
    }

    #[test]
    fn test_oversized_form_input_is_rejected_not_fatal() {
        let mut form = PayrollForm::new(3, 2025);
        form.employee_id = Some(7);
        form.set("basic", "1e20");
        form.set("overtime_hours", "1e20");
        form.set("absence_days", "99999999999999999999");
        // The live summary still renders
        assert!(form.breakdown().gross.is_finite());
        assert!(form.summary_html(Lang::En).as_str().contains("data-field=\"net\""));

        let page = PayrollPage::new();
        let save = PayrollAction::Save {
            id: None,
            input: form.to_input(),
        };
        assert_eq!(page.validate(&save, Lang::En), Err("Invalid value: basic".into()));
    }

    #[test]
    fn test_irreversible_actions_confirm() {
        let page = PayrollPage::new();
        assert!(page.confirmation(&PayrollAction::Approve(1), Lang::En).is_some());
        assert!(page.confirmation(&PayrollAction::MarkPaid(1), Lang::En).is_some());
        assert!(page.confirmation(&PayrollAction::Delete(1), Lang::En).is_some());
        assert_eq!(
            page.confirmation(&PayrollAction::GenerateBatch { month: 3, year: 2025 }, Lang::En),
            Some("Generate payroll for all employees for Mar 2025?".into())
        );
        let save = PayrollAction::Save {
            id: Some(1),
            input: PayrollInput::default(),
        };
        assert!(page.confirmation(&save, Lang::En).is_none());
    }
}
