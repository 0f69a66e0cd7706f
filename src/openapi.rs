// src/openapi.rs

use crate::models::{
    Attendance, AuthResponse, CreateEmployeeRequest, DecideLeaveRequest, Employee, LeaveDecision,
    LeaveRequest, LeaveStatus, LoginRequest, RegisterUserRequest, RunBulkPayrollRequest,
    RunSinglePayrollRequest, Salary, SubmitLeaveRequest, UpdateEmployeeRequest,
    UpsertAttendanceRequest, UpsertMode, UserPublic, UserRole,
};
use crate::services::payroll::{BulkPayrollFailure, BulkPayrollReport};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRMS Backend API",
        version = "1.0.0",
        description = "HR administration backend: employee records, attendance, \
            leave requests with admin approval, and monthly payroll computation \
            with overtime pay and provident-fund deduction. Bulk payroll runs are \
            all-or-nothing across the workforce.",
        license(name = "MIT")
    ),
    paths(
        // Auth
        crate::handlers::user::register_user,
        crate::handlers::user::login_user,
        crate::handlers::user::get_me,
        // Employees
        crate::handlers::employee::create_employee,
        crate::handlers::employee::list_employees,
        crate::handlers::employee::get_employee,
        crate::handlers::employee::update_employee,
        crate::handlers::employee::delete_employee,
        // Attendance
        crate::handlers::attendance::upsert_attendance,
        crate::handlers::attendance::list_employee_attendance,
        // Leave
        crate::handlers::leave::submit_leave_request,
        crate::handlers::leave::list_leave_requests,
        crate::handlers::leave::list_employee_leave_requests,
        crate::handlers::leave::decide_leave_request,
        // Payroll
        crate::handlers::payroll::run_single_payroll,
        crate::handlers::payroll::run_bulk_payroll,
        crate::handlers::payroll::list_employee_salaries,
        crate::handlers::payroll::list_salaries_for_month,
    ),
    components(
        schemas(
            RegisterUserRequest, LoginRequest, AuthResponse, UserPublic, UserRole,
            CreateEmployeeRequest, UpdateEmployeeRequest, Employee,
            UpsertAttendanceRequest, UpsertMode, Attendance,
            SubmitLeaveRequest, DecideLeaveRequest, LeaveDecision, LeaveStatus, LeaveRequest,
            RunSinglePayrollRequest, RunBulkPayrollRequest, Salary,
            BulkPayrollReport, BulkPayrollFailure,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Auth", description = "Register, login, and inspect the current user"),
        (name = "Employees", description = "Manage employee records"),
        (name = "Attendance", description = "Monthly attendance entry and history"),
        (name = "Leave", description = "Submit and decide leave requests"),
        (name = "Payroll", description = "Compute and report monthly salaries"),
    )
)]
pub struct ApiDoc;
