// src/handlers/leave.rs

use crate::{
    auth::AuthUser,
    errors::AppResult,
    models::{DecideLeaveRequest, LeaveRequest, LeaveStatus, SubmitLeaveRequest},
    services,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListLeaveParams {
    /// Filter by request status
    pub status: Option<LeaveStatus>,
}

/// Submit a leave request for the employee linked to the authenticated account
#[utoipa::path(
    post,
    path = "/api/v1/leave-requests",
    request_body = SubmitLeaveRequest,
    responses(
        (status = 201, description = "Leave request submitted", body = LeaveRequest),
        (status = 400, description = "Invalid date range"),
        (status = 403, description = "No employee record linked to this account"),
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn submit_leave_request(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<SubmitLeaveRequest>,
) -> AppResult<(StatusCode, Json<LeaveRequest>)> {
    let request = services::leave::submit(&state.db, &auth, body).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// List leave requests, optionally filtered by status
#[utoipa::path(
    get,
    path = "/api/v1/leave-requests",
    params(ListLeaveParams),
    responses(
        (status = 200, description = "Leave requests", body = Vec<LeaveRequest>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn list_leave_requests(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListLeaveParams>,
) -> AppResult<Json<Vec<LeaveRequest>>> {
    auth.require_admin()?;

    let requests = match params.status {
        Some(status) => {
            sqlx::query_as::<_, LeaveRequest>(
                "SELECT * FROM leave_requests WHERE status = $1 ORDER BY requested_on DESC",
            )
            .bind(status)
            .fetch_all(&state.db)
            .await?
        }
        None => {
            sqlx::query_as::<_, LeaveRequest>(
                "SELECT * FROM leave_requests ORDER BY requested_on DESC",
            )
            .fetch_all(&state.db)
            .await?
        }
    };

    Ok(Json(requests))
}

/// Leave request history for one employee
#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}/leave-requests",
    params(("employee_id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Leave requests", body = Vec<LeaveRequest>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn list_employee_leave_requests(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
) -> AppResult<Json<Vec<LeaveRequest>>> {
    auth.authorize_employee(employee_id)?;

    let requests = sqlx::query_as::<_, LeaveRequest>(
        "SELECT * FROM leave_requests WHERE employee_id = $1 ORDER BY requested_on DESC",
    )
    .bind(employee_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(requests))
}

/// Approve or deny a pending leave request.
/// Approval folds the business-day count into the month's attendance record
/// in the same transaction as the status change.
#[utoipa::path(
    post,
    path = "/api/v1/leave-requests/{request_id}/decision",
    request_body = DecideLeaveRequest,
    params(("request_id" = Uuid, Path, description = "Leave request ID")),
    responses(
        (status = 200, description = "Decision recorded", body = LeaveRequest),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Request already decided"),
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn decide_leave_request(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
    Json(body): Json<DecideLeaveRequest>,
) -> AppResult<Json<LeaveRequest>> {
    let request = services::leave::decide(&state.db, &auth, request_id, body.decision).await?;
    Ok(Json(request))
}
