//! Payroll Model

use serde::{Deserialize, Serialize};

wire_enum! {
    /// Payroll lifecycle: pending → approved → paid, or cancelled
    pub enum PayrollStatus {
        Pending => "pending",
        Approved => "approved",
        Paid => "paid",
        Cancelled => "cancelled",
    }
}

impl Default for PayrollStatus {
    fn default() -> Self {
        PayrollStatus::Pending
    }
}

/// Payroll record (`/api/payroll`, `/api/payroll/{id}`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Payroll {
    pub id: i64,
    pub employee_id: i64,
    pub month: u32,
    pub year: i32,
    pub basic: f64,
    /// Aggregate of the itemized allowances, as stored by the server
    pub allowances: f64,
    pub housing_allowance: f64,
    pub transport_allowance: f64,
    pub food_allowance: f64,
    pub phone_allowance: f64,
    pub other_allowances: f64,
    pub bonus: f64,
    pub commission: f64,
    pub incentives: f64,
    pub overtime_hours: f64,
    pub overtime_amount: f64,
    pub absence_days: i64,
    pub absence_deduction: f64,
    pub late_minutes: i64,
    pub late_deduction: f64,
    pub loan_deduction: f64,
    pub other_deductions: f64,
    pub tax: f64,
    pub insurance: f64,
    pub gross_salary: f64,
    pub total_deductions: f64,
    pub net: f64,
    pub status: PayrollStatus,
    pub notes: Option<String>,
    pub period_start: Option<String>,
    pub period_end: Option<String>,
    pub generated_at: Option<String>,
}

/// Create / update payload (`POST /api/payroll`, `PUT /api/payroll/{id}`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayrollInput {
    pub employee_id: i64,
    pub month: u32,
    pub year: i32,
    pub basic: f64,
    pub housing_allowance: f64,
    pub transport_allowance: f64,
    pub food_allowance: f64,
    pub phone_allowance: f64,
    pub other_allowances: f64,
    pub bonus: f64,
    pub commission: f64,
    pub incentives: f64,
    pub overtime_hours: f64,
    pub overtime_amount: f64,
    pub absence_days: i64,
    pub absence_deduction: f64,
    pub late_minutes: i64,
    pub late_deduction: f64,
    pub loan_deduction: f64,
    pub other_deductions: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Salary template for an employee (`/api/payroll/template/{employee_id}`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayrollTemplate {
    pub basic_salary: f64,
    pub housing_allowance: f64,
    pub transport_allowance: f64,
    pub food_allowance: f64,
    pub phone_allowance: f64,
    pub other_allowances: f64,
    pub overtime_rate: Option<f64>,
}

/// Server-side scope of the payroll listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayrollQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub status: Option<PayrollStatus>,
    pub search: Option<String>,
}

impl PayrollQuery {
    /// Query parameters in request order, empty values skipped
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(month) = self.month {
            params.push(("month", month.to_string()));
        }
        if let Some(year) = self.year {
            params.push(("year", year.to_string()));
        }
        if let Some(status) = &self.status {
            params.push(("status", status.to_string()));
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            params.push(("search", search.to_string()));
        }
        params
    }
}

/// Batch generation request (`POST /api/payroll/batch`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRequest {
    pub month: u32,
    pub year: i32,
}

/// Batch generation result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    #[serde(default)]
    pub count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_record_uses_defaults() {
        let p: Payroll =
            serde_json::from_str(r#"{"id":5,"employee_id":2,"month":3,"year":2025,"net":1200.5}"#)
                .unwrap();
        assert_eq!(p.status, PayrollStatus::Pending);
        assert_eq!(p.net, 1200.5);
        assert_eq!(p.bonus, 0.0);
    }

    #[test]
    fn test_query_params_skip_empty() {
        let q = PayrollQuery {
            month: Some(4),
            year: None,
            status: Some(PayrollStatus::Approved),
            search: Some("  ".into()),
        };
        assert_eq!(
            q.params(),
            vec![("month", "4".to_string()), ("status", "approved".to_string())]
        );
    }
}
