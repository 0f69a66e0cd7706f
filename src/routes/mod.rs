// src/routes/mod.rs

use crate::{
    handlers::{
        attendance::{list_employee_attendance, upsert_attendance},
        employee::{
            create_employee, delete_employee, get_employee, list_employees, update_employee,
        },
        leave::{
            decide_leave_request, list_employee_leave_requests, list_leave_requests,
            submit_leave_request,
        },
        payroll::{
            list_employee_salaries, list_salaries_for_month, run_bulk_payroll, run_single_payroll,
        },
        user::{get_me, login_user, register_user},
    },
    state::AppState,
};
use axum::{
    Router,
    routing::{get, post, put},
};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // ─── Auth ─────────────────────────────────────────────
        .route("/auth/register", post(register_user))
        .route("/auth/login", post(login_user))
        .route("/auth/me", get(get_me))
        // ─── Employees ────────────────────────────────────────
        .route("/employees", post(create_employee).get(list_employees))
        .route(
            "/employees/{employee_id}",
            get(get_employee)
                .put(update_employee)
                .delete(delete_employee),
        )
        // ─── Attendance ───────────────────────────────────────
        .route("/attendance", put(upsert_attendance))
        .route(
            "/employees/{employee_id}/attendance",
            get(list_employee_attendance),
        )
        // ─── Leave ────────────────────────────────────────────
        .route(
            "/leave-requests",
            post(submit_leave_request).get(list_leave_requests),
        )
        .route(
            "/leave-requests/{request_id}/decision",
            post(decide_leave_request),
        )
        .route(
            "/employees/{employee_id}/leave-requests",
            get(list_employee_leave_requests),
        )
        // ─── Payroll ──────────────────────────────────────────
        .route(
            "/employees/{employee_id}/payroll",
            post(run_single_payroll),
        )
        .route(
            "/employees/{employee_id}/salaries",
            get(list_employee_salaries),
        )
        .route("/payroll/run", post(run_bulk_payroll))
        .route("/salaries", get(list_salaries_for_month))
}
