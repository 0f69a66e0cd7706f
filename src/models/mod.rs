// src/models/mod.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// ─── Users ────────────────────────────────────────────────────────────────────

// sqlx 0.8: custom Postgres enums need #[sqlx(type_name = "...")] on the enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, ToSchema, PartialEq, Eq)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Employee,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub user_id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserPublic {
    pub user_id: Uuid,
    pub username: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        UserPublic {
            user_id: user.user_id,
            username: user.username,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterUserRequest {
    pub username: String,
    pub password: String,
    pub role: UserRole,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserPublic,
}

// ─── Employees ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Employee {
    pub employee_id: Uuid,
    pub name: String,
    pub department: String,
    pub position: String,
    pub joining_date: NaiveDate,
    pub base_salary: Decimal,
    /// Linked login account, at most one per employee.
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEmployeeRequest {
    pub name: String,
    pub department: String,
    pub position: String,
    pub joining_date: NaiveDate,
    pub base_salary: Decimal,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateEmployeeRequest {
    pub name: String,
    pub department: String,
    pub position: String,
    pub joining_date: NaiveDate,
    pub base_salary: Decimal,
    pub user_id: Option<Uuid>,
}

// ─── Attendance ───────────────────────────────────────────────────────────────

/// One row per (employee, month); month is stored as a first-of-month date.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Attendance {
    pub employee_id: Uuid,
    pub month: NaiveDate,
    pub days_present: i32,
    pub leaves_taken: i32,
    pub overtime_hours: Decimal,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UpsertMode {
    /// Replace days_present, leaves_taken and overtime_hours with the given values.
    #[default]
    Overwrite,
    /// Add the given leaves_taken to the existing count; other fields untouched.
    Accumulate,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpsertAttendanceRequest {
    pub employee_id: Uuid,
    /// Any date inside the target month; normalized to the first of the month.
    pub month: NaiveDate,
    pub days_present: i32,
    pub leaves_taken: i32,
    pub overtime_hours: Decimal,
    #[serde(default)]
    pub mode: UpsertMode,
}

// ─── Salaries ─────────────────────────────────────────────────────────────────

/// Computed salary for one employee and pay period. Insert-only: once a row
/// exists for (employee_id, month) the period is closed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Salary {
    pub employee_id: Uuid,
    pub month: NaiveDate,
    pub overtime_hours: Decimal,
    pub overtime_pay: Decimal,
    pub bonus: Decimal,
    pub deductions: Decimal,
    pub pf_amount: Decimal,
    pub total_salary: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RunSinglePayrollRequest {
    /// Any date inside the target month; normalized to the first of the month.
    pub month: NaiveDate,
    pub bonus: Option<Decimal>,
    pub deductions: Option<Decimal>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RunBulkPayrollRequest {
    /// Any date inside the target month; normalized to the first of the month.
    pub month: NaiveDate,
    /// Bonus applied uniformly to every employee. Defaults to 0.
    pub bonus: Option<Decimal>,
}

// ─── Leave requests ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, ToSchema, PartialEq, Eq)]
#[sqlx(type_name = "leave_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Denied,
}

impl std::fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            LeaveStatus::Pending => "pending",
            LeaveStatus::Approved => "approved",
            LeaveStatus::Denied => "denied",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LeaveRequest {
    pub request_id: Uuid,
    pub employee_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub status: LeaveStatus,
    pub requested_on: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitLeaveRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LeaveDecision {
    Approved,
    Denied,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DecideLeaveRequest {
    pub decision: LeaveDecision,
}

// ─── JWT Claims ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub role: UserRole,
    pub employee_id: Option<Uuid>,
    pub exp: usize,
    pub iat: usize,
}
