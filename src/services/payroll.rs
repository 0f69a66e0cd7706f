// src/services/payroll.rs

use crate::{
    auth::AuthUser,
    errors::AppResult,
    models::{Attendance, Employee, Salary},
    services::attendance::month_key,
};
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;
use sqlx::{PgConnection, PgPool};
use thiserror::Error;
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

/// Provident fund rate applied to base salary.
pub const PF_RATE: Decimal = dec!(0.12);
/// Overtime premium over the derived hourly rate.
pub const OVERTIME_MULTIPLIER: Decimal = dec!(1.5);
pub const WORKING_DAYS_PER_MONTH: Decimal = dec!(22);
pub const HOURS_PER_DAY: Decimal = dec!(8);

#[derive(Debug, Error)]
pub enum PayrollError {
    #[error("No attendance record for employee {employee_id} in {month}")]
    AttendanceMissing { employee_id: Uuid, month: NaiveDate },

    #[error("Salary record already exists for employee {employee_id} in {month}")]
    DuplicatePeriod { employee_id: Uuid, month: NaiveDate },

    #[error("Employee {0} not found")]
    EmployeeNotFound(Uuid),

    #[error("{0}")]
    Calculation(String),

    #[error(transparent)]
    Persistence(#[from] sqlx::Error),
}

pub struct PayrollService;

pub struct SalaryBreakdown {
    pub overtime_pay: Decimal,
    pub pf_amount: Decimal,
}

/// Half-up to 2 decimal places. Applied at every intermediate step, not only
/// at the end; the cent-level results depend on it.
fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

impl PayrollService {
    /// Derive overtime pay and provident-fund deduction for one pay period.
    ///
    /// The hourly rate comes from the fixed 22-working-day, 8-hour month and
    /// is rounded before the overtime multiplication.
    pub fn calculate(base_salary: Decimal, overtime_hours: Decimal) -> SalaryBreakdown {
        let pf_amount = round2(base_salary * PF_RATE);

        let hourly_rate = if base_salary > Decimal::ZERO {
            round2(base_salary / WORKING_DAYS_PER_MONTH / HOURS_PER_DAY)
        } else {
            Decimal::ZERO
        };
        let overtime_pay = round2(hourly_rate * overtime_hours * OVERTIME_MULTIPLIER);

        SalaryBreakdown {
            overtime_pay,
            pf_amount,
        }
    }
}

impl SalaryBreakdown {
    pub fn total_salary(&self, base_salary: Decimal, bonus: Decimal, deductions: Decimal) -> Decimal {
        base_salary + self.overtime_pay + bonus - deductions - self.pf_amount
    }
}

/// Compute and insert one salary row for an employee within the caller's
/// transaction. Fails without writing if attendance is missing or the period
/// already has a salary; the composite key on (employee_id, month) backs the
/// existence check, so a race between two runs surfaces as DuplicatePeriod
/// rather than a second row.
async fn execute_for_employee(
    conn: &mut PgConnection,
    employee: &Employee,
    month: NaiveDate,
    bonus: Decimal,
    deductions: Decimal,
) -> Result<Salary, PayrollError> {
    let duplicate = PayrollError::DuplicatePeriod {
        employee_id: employee.employee_id,
        month,
    };

    let existing = sqlx::query_scalar::<_, i32>(
        "SELECT 1 FROM salaries WHERE employee_id = $1 AND month = $2",
    )
    .bind(employee.employee_id)
    .bind(month)
    .fetch_optional(&mut *conn)
    .await?;

    if existing.is_some() {
        return Err(duplicate);
    }

    let attendance = sqlx::query_as::<_, Attendance>(
        "SELECT * FROM attendance WHERE employee_id = $1 AND month = $2",
    )
    .bind(employee.employee_id)
    .bind(month)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(PayrollError::AttendanceMissing {
        employee_id: employee.employee_id,
        month,
    })?;

    if attendance.overtime_hours < Decimal::ZERO {
        return Err(PayrollError::Calculation(format!(
            "Attendance for employee {} in {} has negative overtime hours",
            employee.employee_id, month
        )));
    }

    let breakdown = PayrollService::calculate(employee.base_salary, attendance.overtime_hours);
    let total = breakdown.total_salary(employee.base_salary, bonus, deductions);

    sqlx::query_as::<_, Salary>(
        r#"INSERT INTO salaries (
            employee_id, month, overtime_hours, overtime_pay,
            bonus, deductions, pf_amount, total_salary, created_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())
        RETURNING *"#,
    )
    .bind(employee.employee_id)
    .bind(month)
    .bind(attendance.overtime_hours)
    .bind(breakdown.overtime_pay)
    .bind(bonus)
    .bind(deductions)
    .bind(breakdown.pf_amount)
    .bind(total)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| {
        if matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation()) {
            duplicate
        } else {
            PayrollError::Persistence(e)
        }
    })
}

/// Run payroll for a single employee. Either the salary row is inserted or
/// nothing is.
pub async fn run_single(
    db: &PgPool,
    auth: &AuthUser,
    employee_id: Uuid,
    month: NaiveDate,
    bonus: Decimal,
    deductions: Decimal,
) -> AppResult<Salary> {
    auth.require_admin()?;
    let month = month_key(month);

    let mut tx = db.begin().await?;

    let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE employee_id = $1")
        .bind(employee_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(PayrollError::EmployeeNotFound(employee_id))?;

    let salary = execute_for_employee(&mut tx, &employee, month, bonus, deductions).await?;
    tx.commit().await?;

    info!(
        "Payroll computed for employee {} ({}): net {}",
        employee.employee_id, month, salary.total_salary
    );
    Ok(salary)
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BulkPayrollFailure {
    pub employee_id: Uuid,
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BulkPayrollReport {
    pub month: NaiveDate,
    /// Employees whose salary computed cleanly during the run.
    pub success_count: i64,
    pub failed_count: i64,
    /// Salary rows actually persisted: equal to success_count when the run
    /// committed, zero after a rollback.
    pub final_success_count: i64,
    pub committed: bool,
    pub failed_details: Vec<BulkPayrollFailure>,
}

impl BulkPayrollReport {
    /// The tallies describe the attempted run; persisted state follows the
    /// all-or-nothing commit. Callers see success_count > 0 for a run that
    /// wrote nothing, which is the long-observed contract of this report.
    fn finalize(
        month: NaiveDate,
        success_count: i64,
        failed_details: Vec<BulkPayrollFailure>,
        committed: bool,
    ) -> Self {
        BulkPayrollReport {
            month,
            success_count,
            failed_count: failed_details.len() as i64,
            final_success_count: if committed { success_count } else { 0 },
            committed,
            failed_details,
        }
    }
}

/// Run payroll for every employee for one period inside a single transaction.
///
/// Processing never stops early: every employee is attempted so the report is
/// complete. If any employee fails (a missing attendance record, or a salary
/// already on file, which counts as a failure), the whole run rolls back.
pub async fn run_bulk(
    db: &PgPool,
    auth: &AuthUser,
    month: NaiveDate,
    default_bonus: Decimal,
) -> AppResult<BulkPayrollReport> {
    auth.require_admin()?;
    let month = month_key(month);

    let mut tx = db.begin().await?;

    let employees = sqlx::query_as::<_, Employee>("SELECT * FROM employees ORDER BY name")
        .fetch_all(&mut *tx)
        .await?;

    let mut success_count = 0i64;
    let mut failed_details = Vec::new();

    for employee in &employees {
        match execute_for_employee(&mut tx, employee, month, default_bonus, Decimal::ZERO).await {
            Ok(_) => success_count += 1,
            Err(err) => {
                let reason = match err {
                    PayrollError::DuplicatePeriod { .. } => {
                        "Salary record already exists".to_string()
                    }
                    other => other.to_string(),
                };
                failed_details.push(BulkPayrollFailure {
                    employee_id: employee.employee_id,
                    name: employee.name.clone(),
                    reason,
                });
            }
        }
    }

    let committed = failed_details.is_empty();
    if committed {
        tx.commit().await?;
        info!(
            "Bulk payroll for {} committed: {} employees processed",
            month, success_count
        );
    } else {
        tx.rollback().await?;
        warn!(
            "Bulk payroll for {} rolled back: {} of {} employees failed",
            month,
            failed_details.len(),
            employees.len()
        );
    }

    Ok(BulkPayrollReport::finalize(
        month,
        success_count,
        failed_details,
        committed,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn overtime_pay_from_even_hourly_rate() {
        // 22000 / 22 / 8 = 125 exactly; 125 * 10 * 1.5 = 1875
        let breakdown = PayrollService::calculate(dec!(22000), dec!(10));
        assert_eq!(breakdown.overtime_pay, dec!(1875.00));
        assert_eq!(breakdown.pf_amount, dec!(2640.00));
    }

    #[test]
    fn pf_is_twelve_percent_of_base() {
        let breakdown = PayrollService::calculate(dec!(50000), dec!(0));
        assert_eq!(breakdown.pf_amount, dec!(6000.00));
        assert_eq!(breakdown.overtime_pay, dec!(0));
    }

    #[test]
    fn hourly_rate_is_rounded_before_multiplying() {
        // 1000 / 176 = 5.6818..., rounded to 5.68 first.
        // 5.68 * 10 * 1.5 = 85.20; rounding only at the end would give 85.23.
        let breakdown = PayrollService::calculate(dec!(1000), dec!(10));
        assert_eq!(breakdown.overtime_pay, dec!(85.20));
    }

    #[test]
    fn zero_base_salary_produces_zero_rates() {
        let breakdown = PayrollService::calculate(dec!(0), dec!(12));
        assert_eq!(breakdown.overtime_pay, dec!(0));
        assert_eq!(breakdown.pf_amount, dec!(0));
    }

    #[test]
    fn total_salary_folds_in_bonus_and_deductions() {
        let breakdown = PayrollService::calculate(dec!(22000), dec!(10));
        let total = breakdown.total_salary(dec!(22000), dec!(500), dec!(200));
        // 22000 + 1875 + 500 - 200 - 2640
        assert_eq!(total, dec!(21535.00));
    }

    #[test]
    fn rolled_back_report_keeps_attempt_tallies() {
        let failures = vec![BulkPayrollFailure {
            employee_id: Uuid::new_v4(),
            name: "A. Worker".to_string(),
            reason: "No attendance record".to_string(),
        }];
        let report = BulkPayrollReport::finalize(date(2025, 3, 1), 2, failures, false);

        assert_eq!(report.success_count, 2);
        assert_eq!(report.failed_count, 1);
        assert_eq!(report.final_success_count, 0);
        assert!(!report.committed);
    }

    #[test]
    fn committed_report_persists_every_success() {
        let report = BulkPayrollReport::finalize(date(2025, 3, 1), 3, Vec::new(), true);

        assert_eq!(report.success_count, 3);
        assert_eq!(report.failed_count, 0);
        assert_eq!(report.final_success_count, 3);
        assert!(report.committed);
    }
}
