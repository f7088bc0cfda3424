//! Payroll arithmetic
//!
//! Gross, deductions and net for one payroll record. Every divisor and rate
//! here matches the server's payslip calculation, so results must not drift:
//! a month is 30 days and 240 working hours.
//!
//! Inputs arrive as `f64` from forms and records; all intermediate math runs
//! in `Decimal` and only the reported figures are rounded to 2 places.

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

/// Rounding applied to reported amounts (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Days in a payroll month
pub const DAYS_PER_MONTH: u32 = 30;
/// Working hours in a payroll month (30 days × 8 hours)
pub const HOURS_PER_MONTH: u32 = 240;
/// Overtime multiplier used when none is given
pub const DEFAULT_OVERTIME_RATE: f64 = 1.5;

/// Maximum accepted magnitude of any single amount
pub const MAX_AMOUNT: f64 = 1_000_000_000.0;
/// Maximum overtime hours in one month (31 days × 24 hours)
pub const MAX_OVERTIME_HOURS: f64 = 744.0;
/// Maximum overtime multiplier
pub const MAX_OVERTIME_RATE: f64 = 10.0;
/// Maximum absence days in one month
pub const MAX_ABSENCE_DAYS: i64 = 31;
/// Maximum late minutes in one month (31 days × 24 hours × 60)
pub const MAX_LATE_MINUTES: i64 = 44_640;

/// Input rejected before any arithmetic runs
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SalaryInputError {
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },
    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} exceeds maximum allowed ({max}), got {value}")]
    TooLarge {
        field: &'static str,
        value: f64,
        max: f64,
    },
}

impl SalaryInputError {
    /// Name of the offending form field
    pub fn field(&self) -> &'static str {
        match self {
            Self::NonFinite { field } | Self::Negative { field, .. } | Self::TooLarge { field, .. } => {
                field
            }
        }
    }
}

fn check_range(field: &'static str, value: f64, max: f64) -> Result<(), SalaryInputError> {
    if !value.is_finite() {
        return Err(SalaryInputError::NonFinite { field });
    }
    if value < 0.0 {
        return Err(SalaryInputError::Negative { field, value });
    }
    if value > max {
        return Err(SalaryInputError::TooLarge { field, value, max });
    }
    Ok(())
}

/// Clamp into `[-max, max]`, logging when the value had to change.
/// Non-finite values read as zero.
fn clamp_amount(field: &'static str, value: f64, max: f64) -> f64 {
    if value.is_finite() && value.abs() <= max {
        return value;
    }
    let clamped = if value.is_finite() { value.clamp(-max, max) } else { 0.0 };
    tracing::warn!(field, value = ?value, clamped, "Salary input out of range, clamped");
    clamped
}

fn clamp_count(field: &'static str, value: i64, max: i64) -> i64 {
    if value.abs() <= max {
        return value;
    }
    let clamped = value.clamp(-max, max);
    tracing::warn!(field, value, clamped, "Salary input out of range, clamped");
    clamped
}

/// Income tax rate (10%)
fn tax_rate() -> Decimal {
    Decimal::new(10, 2)
}

/// Social insurance rate (2%)
fn insurance_rate() -> Decimal {
    Decimal::new(2, 2)
}

/// Health insurance rate (1%)
fn health_insurance_rate() -> Decimal {
    Decimal::new(1, 2)
}

/// Convert f64 to Decimal for precise calculation
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in salary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64, rounded to 2 decimal places
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Fixed two-place representation of an amount (`1234.5` → `"1234.50"`)
pub fn format_amount(value: f64) -> String {
    let rounded = to_decimal(value)
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

/// Figures entered for one employee and month
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalaryInputs {
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
    /// Overtime multiplier; `None` or zero means [`DEFAULT_OVERTIME_RATE`]
    pub overtime_rate: Option<f64>,
    pub absence_days: i64,
    pub late_minutes: i64,
    pub loan_deduction: f64,
    pub other_deductions: f64,
}

/// Result of [`calculate`], every amount rounded to 2 places
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SalaryBreakdown {
    pub hourly_rate: f64,
    pub daily_rate: f64,
    pub overtime_amount: f64,
    pub absence_deduction: f64,
    pub late_deduction: f64,
    pub allowances: f64,
    pub gross: f64,
    pub pre_tax_deductions: f64,
    pub taxable_income: f64,
    pub tax: f64,
    pub insurance: f64,
    pub health_insurance: f64,
    pub total_deductions: f64,
    pub net: f64,
}

impl SalaryInputs {
    fn amounts(&self) -> [(&'static str, f64); 12] {
        [
            ("basic", self.basic),
            ("housing_allowance", self.housing_allowance),
            ("transport_allowance", self.transport_allowance),
            ("food_allowance", self.food_allowance),
            ("phone_allowance", self.phone_allowance),
            ("other_allowances", self.other_allowances),
            ("bonus", self.bonus),
            ("commission", self.commission),
            ("incentives", self.incentives),
            ("loan_deduction", self.loan_deduction),
            ("other_deductions", self.other_deductions),
            ("overtime_hours", self.overtime_hours),
        ]
    }

    /// Reject values the calculation cannot represent
    pub fn validate(&self) -> Result<(), SalaryInputError> {
        for (field, value) in self.amounts() {
            let max = if field == "overtime_hours" { MAX_OVERTIME_HOURS } else { MAX_AMOUNT };
            check_range(field, value, max)?;
        }
        if let Some(rate) = self.overtime_rate {
            check_range("overtime_rate", rate, MAX_OVERTIME_RATE)?;
        }
        check_range("absence_days", self.absence_days as f64, MAX_ABSENCE_DAYS as f64)?;
        check_range("late_minutes", self.late_minutes as f64, MAX_LATE_MINUTES as f64)?;
        Ok(())
    }

    /// Copy with every field clamped into the accepted range
    fn bounded(&self) -> Self {
        let amount = |field, value| clamp_amount(field, value, MAX_AMOUNT);
        Self {
            basic: amount("basic", self.basic),
            housing_allowance: amount("housing_allowance", self.housing_allowance),
            transport_allowance: amount("transport_allowance", self.transport_allowance),
            food_allowance: amount("food_allowance", self.food_allowance),
            phone_allowance: amount("phone_allowance", self.phone_allowance),
            other_allowances: amount("other_allowances", self.other_allowances),
            bonus: amount("bonus", self.bonus),
            commission: amount("commission", self.commission),
            incentives: amount("incentives", self.incentives),
            overtime_hours: clamp_amount("overtime_hours", self.overtime_hours, MAX_OVERTIME_HOURS),
            overtime_rate: self
                .overtime_rate
                .map(|rate| clamp_amount("overtime_rate", rate, MAX_OVERTIME_RATE)),
            absence_days: clamp_count("absence_days", self.absence_days, MAX_ABSENCE_DAYS),
            late_minutes: clamp_count("late_minutes", self.late_minutes, MAX_LATE_MINUTES),
            loan_deduction: amount("loan_deduction", self.loan_deduction),
            other_deductions: amount("other_deductions", self.other_deductions),
        }
    }

    fn overtime_rate(&self) -> Decimal {
        match self.overtime_rate {
            Some(rate) if rate != 0.0 && rate.is_finite() => to_decimal(rate),
            _ => to_decimal(DEFAULT_OVERTIME_RATE),
        }
    }

    /// Sum of the five itemized allowances
    fn allowances(&self) -> Decimal {
        [
            self.housing_allowance,
            self.transport_allowance,
            self.food_allowance,
            self.phone_allowance,
            self.other_allowances,
        ]
        .into_iter()
        .map(to_decimal)
        .sum()
    }
}

/// Compute the full salary breakdown.
///
/// - overtime = basic / 240 × hours × rate
/// - absence  = basic / 30 × days
/// - late     = basic / 240 × minutes / 60
/// - tax      = 10% of max(0, gross − pre-tax deductions)
/// - insurance 2% and health insurance 1% of basic + allowances
///
/// Out-of-range inputs are clamped first (see [`SalaryInputs::validate`]),
/// so the arithmetic never overflows.
pub fn calculate(inputs: &SalaryInputs) -> SalaryBreakdown {
    let inputs = &inputs.bounded();
    let basic = to_decimal(inputs.basic);
    let hourly = basic / Decimal::from(HOURS_PER_MONTH);
    let daily = basic / Decimal::from(DAYS_PER_MONTH);

    let overtime = hourly * to_decimal(inputs.overtime_hours) * inputs.overtime_rate();
    let absence = daily * Decimal::from(inputs.absence_days);
    let late = hourly * (Decimal::from(inputs.late_minutes) / Decimal::from(60));

    let allowances = inputs.allowances();
    let gross = basic
        + allowances
        + to_decimal(inputs.bonus)
        + to_decimal(inputs.commission)
        + to_decimal(inputs.incentives)
        + overtime;

    let pre_tax =
        absence + late + to_decimal(inputs.loan_deduction) + to_decimal(inputs.other_deductions);
    let taxable = (gross - pre_tax).max(Decimal::ZERO);
    let tax = taxable * tax_rate();

    let insured_base = basic + allowances;
    let insurance = insured_base * insurance_rate();
    let health_insurance = insured_base * health_insurance_rate();

    let total_deductions = pre_tax + tax + insurance + health_insurance;
    let net = gross - total_deductions;

    SalaryBreakdown {
        hourly_rate: to_f64(hourly),
        daily_rate: to_f64(daily),
        overtime_amount: to_f64(overtime),
        absence_deduction: to_f64(absence),
        late_deduction: to_f64(late),
        allowances: to_f64(allowances),
        gross: to_f64(gross),
        pre_tax_deductions: to_f64(pre_tax),
        taxable_income: to_f64(taxable),
        tax: to_f64(tax),
        insurance: to_f64(insurance),
        health_insurance: to_f64(health_insurance),
        total_deductions: to_f64(total_deductions),
        net: to_f64(net),
    }
}
