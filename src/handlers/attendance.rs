// src/handlers/attendance.rs

use crate::{
    auth::AuthUser,
    errors::AppResult,
    models::{Attendance, UpsertAttendanceRequest},
    services,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

/// Record attendance for an employee and month.
/// Default mode overwrites an existing record; accumulate mode adds the given
/// leaves_taken to the existing count instead.
#[utoipa::path(
    put,
    path = "/api/v1/attendance",
    request_body = UpsertAttendanceRequest,
    responses(
        (status = 200, description = "Attendance recorded", body = Attendance),
        (status = 404, description = "Employee not found"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn upsert_attendance(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<UpsertAttendanceRequest>,
) -> AppResult<Json<Attendance>> {
    let record = services::attendance::upsert(&state.db, &auth, body).await?;
    Ok(Json(record))
}

/// Attendance history for one employee, newest month first
#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}/attendance",
    params(("employee_id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Attendance records", body = Vec<Attendance>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn list_employee_attendance(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
) -> AppResult<Json<Vec<Attendance>>> {
    auth.authorize_employee(employee_id)?;

    let records = sqlx::query_as::<_, Attendance>(
        "SELECT * FROM attendance WHERE employee_id = $1 ORDER BY month DESC",
    )
    .bind(employee_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(records))
}
