// src/services/leave.rs

use crate::{
    auth::AuthUser,
    errors::AppResult,
    models::{LeaveDecision, LeaveRequest, LeaveStatus, SubmitLeaveRequest},
    services::attendance::{accumulate_leave_days, month_key},
};
use chrono::{Datelike, NaiveDate, Weekday};
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum LeaveError {
    #[error("Leave request {0} not found")]
    RequestNotFound(Uuid),

    #[error("Leave request has already been decided: {status}")]
    AlreadyDecided { status: LeaveStatus },

    #[error("{0}")]
    InvalidDateRange(String),

    #[error(transparent)]
    Persistence(#[from] sqlx::Error),
}

/// Count the non-weekend days in the inclusive range [start, end].
/// An inverted range counts as empty rather than failing.
pub fn business_days(start: NaiveDate, end: NaiveDate) -> i32 {
    if end < start {
        return 0;
    }
    start
        .iter_days()
        .take_while(|day| *day <= end)
        .filter(|day| !matches!(day.weekday(), Weekday::Sat | Weekday::Sun))
        .count() as i32
}

/// Submission constraint: end on or after start, and a single calendar month,
/// so approval maps to exactly one attendance period.
fn validate_leave_range(start: NaiveDate, end: NaiveDate) -> Result<(), LeaveError> {
    if end < start {
        return Err(LeaveError::InvalidDateRange(
            "End date must not be before start date".to_string(),
        ));
    }
    if (start.year(), start.month()) != (end.year(), end.month()) {
        return Err(LeaveError::InvalidDateRange(
            "A leave request must fall within a single calendar month".to_string(),
        ));
    }
    Ok(())
}

fn ensure_pending(status: LeaveStatus) -> Result<(), LeaveError> {
    match status {
        LeaveStatus::Pending => Ok(()),
        decided => Err(LeaveError::AlreadyDecided { status: decided }),
    }
}

/// File a leave request for the employee behind the authenticated account.
pub async fn submit(
    db: &PgPool,
    auth: &AuthUser,
    req: SubmitLeaveRequest,
) -> AppResult<LeaveRequest> {
    let employee_id = auth.own_employee_id()?;
    validate_leave_range(req.start_date, req.end_date)?;

    let request = sqlx::query_as::<_, LeaveRequest>(
        r#"INSERT INTO leave_requests (request_id, employee_id, start_date, end_date, reason, status, requested_on)
           VALUES ($1, $2, $3, $4, $5, 'pending', NOW())
           RETURNING *"#,
    )
    .bind(Uuid::new_v4())
    .bind(employee_id)
    .bind(req.start_date)
    .bind(req.end_date)
    .bind(req.reason)
    .fetch_one(db)
    .await
    .map_err(LeaveError::Persistence)?;

    Ok(request)
}

/// Decide a pending request. Approval folds the business-day count into the
/// attendance record for the month of start_date; the status change and the
/// attendance upsert share one transaction, so either both persist or neither
/// does. Denial changes only the status.
pub async fn decide(
    db: &PgPool,
    auth: &AuthUser,
    request_id: Uuid,
    decision: LeaveDecision,
) -> AppResult<LeaveRequest> {
    auth.require_admin()?;

    let mut tx = db.begin().await?;

    // FOR UPDATE serializes concurrent decisions on the same request.
    let request = sqlx::query_as::<_, LeaveRequest>(
        "SELECT * FROM leave_requests WHERE request_id = $1 FOR UPDATE",
    )
    .bind(request_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(LeaveError::Persistence)?
    .ok_or(LeaveError::RequestNotFound(request_id))?;

    ensure_pending(request.status)?;

    let new_status = match decision {
        LeaveDecision::Approved => LeaveStatus::Approved,
        LeaveDecision::Denied => LeaveStatus::Denied,
    };

    let updated = sqlx::query_as::<_, LeaveRequest>(
        "UPDATE leave_requests SET status = $2 WHERE request_id = $1 RETURNING *",
    )
    .bind(request_id)
    .bind(new_status)
    .fetch_one(&mut *tx)
    .await
    .map_err(LeaveError::Persistence)?;

    if new_status == LeaveStatus::Approved {
        let days = business_days(request.start_date, request.end_date);
        let month = month_key(request.start_date);
        accumulate_leave_days(&mut tx, request.employee_id, month, days)
            .await
            .map_err(LeaveError::Persistence)?;
        info!(
            "Leave request {} approved: {} business days added to {} for employee {}",
            request_id, days, month, request.employee_id
        );
    } else {
        info!("Leave request {} denied", request_id);
    }

    tx.commit().await.map_err(LeaveError::Persistence)?;
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn single_saturday_counts_zero() {
        // 2025-03-08 is a Saturday
        assert_eq!(business_days(date(2025, 3, 8), date(2025, 3, 8)), 0);
    }

    #[test]
    fn full_week_counts_five() {
        // Monday 2025-03-03 through Sunday 2025-03-09
        assert_eq!(business_days(date(2025, 3, 3), date(2025, 3, 9)), 5);
    }

    #[test]
    fn inverted_range_counts_zero() {
        assert_eq!(business_days(date(2025, 3, 10), date(2025, 3, 3)), 0);
    }

    #[test]
    fn weekend_spanning_range_skips_saturday_and_sunday() {
        // Friday 2025-03-07 through Monday 2025-03-10
        assert_eq!(business_days(date(2025, 3, 7), date(2025, 3, 10)), 2);
    }

    #[test]
    fn range_crossing_months_is_rejected() {
        let err = validate_leave_range(date(2025, 3, 28), date(2025, 4, 2));
        assert!(matches!(err, Err(LeaveError::InvalidDateRange(_))));
    }

    #[test]
    fn inverted_range_is_rejected_at_submission() {
        let err = validate_leave_range(date(2025, 3, 10), date(2025, 3, 3));
        assert!(matches!(err, Err(LeaveError::InvalidDateRange(_))));
    }

    #[test]
    fn same_day_range_is_valid() {
        assert!(validate_leave_range(date(2025, 3, 5), date(2025, 3, 5)).is_ok());
    }

    #[test]
    fn decided_requests_cannot_be_decided_again() {
        let err = ensure_pending(LeaveStatus::Approved);
        assert!(matches!(
            err,
            Err(LeaveError::AlreadyDecided {
                status: LeaveStatus::Approved
            })
        ));
        assert!(ensure_pending(LeaveStatus::Pending).is_ok());
    }
}
