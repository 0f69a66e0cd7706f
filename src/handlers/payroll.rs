// src/handlers/payroll.rs

use crate::{
    auth::AuthUser,
    errors::{AppError, AppResult},
    models::{RunBulkPayrollRequest, RunSinglePayrollRequest, Salary},
    services::{
        self,
        attendance::month_key,
        payroll::BulkPayrollReport,
    },
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

fn require_non_negative(value: Decimal, field: &str) -> AppResult<Decimal> {
    if value < Decimal::ZERO {
        return Err(AppError::Validation(format!(
            "{} cannot be negative",
            field
        )));
    }
    Ok(value)
}

/// Compute and store the salary for one employee and month
#[utoipa::path(
    post,
    path = "/api/v1/employees/{employee_id}/payroll",
    request_body = RunSinglePayrollRequest,
    params(("employee_id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 201, description = "Salary computed", body = Salary),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "Salary already exists for this period"),
        (status = 422, description = "No attendance record for this period"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn run_single_payroll(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
    Json(body): Json<RunSinglePayrollRequest>,
) -> AppResult<(StatusCode, Json<Salary>)> {
    let bonus = require_non_negative(body.bonus.unwrap_or(Decimal::ZERO), "Bonus")?;
    let deductions = require_non_negative(body.deductions.unwrap_or(Decimal::ZERO), "Deductions")?;

    let salary = services::payroll::run_single(
        &state.db,
        &auth,
        employee_id,
        body.month,
        bonus,
        deductions,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(salary)))
}

/// Run payroll for every employee for one month.
/// The whole run is one transaction: any failure rolls back every insert,
/// while the report still details what was attempted.
#[utoipa::path(
    post,
    path = "/api/v1/payroll/run",
    request_body = RunBulkPayrollRequest,
    responses(
        (status = 200, description = "Run report", body = BulkPayrollReport),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn run_bulk_payroll(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<RunBulkPayrollRequest>,
) -> AppResult<Json<BulkPayrollReport>> {
    let bonus = require_non_negative(body.bonus.unwrap_or(Decimal::ZERO), "Bonus")?;

    let report = services::payroll::run_bulk(&state.db, &auth, body.month, bonus).await?;
    Ok(Json(report))
}

/// Salary history for one employee, newest month first
#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}/salaries",
    params(("employee_id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Salary records", body = Vec<Salary>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn list_employee_salaries(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
) -> AppResult<Json<Vec<Salary>>> {
    auth.authorize_employee(employee_id)?;

    let salaries = sqlx::query_as::<_, Salary>(
        "SELECT * FROM salaries WHERE employee_id = $1 ORDER BY month DESC",
    )
    .bind(employee_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(salaries))
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SalaryReportParams {
    /// Any date inside the target month
    pub month: NaiveDate,
}

/// All computed salaries for one month
#[utoipa::path(
    get,
    path = "/api/v1/salaries",
    params(SalaryReportParams),
    responses(
        (status = 200, description = "Salary records for the month", body = Vec<Salary>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn list_salaries_for_month(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<SalaryReportParams>,
) -> AppResult<Json<Vec<Salary>>> {
    auth.require_admin()?;

    let salaries = sqlx::query_as::<_, Salary>(
        "SELECT * FROM salaries WHERE month = $1 ORDER BY employee_id",
    )
    .bind(month_key(params.month))
    .fetch_all(&state.db)
    .await?;

    Ok(Json(salaries))
}
