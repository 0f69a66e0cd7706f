// src/services/attendance.rs

use crate::{
    auth::AuthUser,
    errors::{AppError, AppResult},
    models::{Attendance, UpsertAttendanceRequest, UpsertMode},
};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Canonical pay-period key: the first day of the month containing `date`.
pub fn month_key(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Direct-entry merge policy: a new record is inserted as given, an existing
/// one has all three counters replaced.
pub(crate) async fn overwrite_entry(
    conn: &mut PgConnection,
    employee_id: Uuid,
    month: NaiveDate,
    days_present: i32,
    leaves_taken: i32,
    overtime_hours: Decimal,
) -> Result<Attendance, sqlx::Error> {
    sqlx::query_as::<_, Attendance>(
        r#"INSERT INTO attendance (employee_id, month, days_present, leaves_taken, overtime_hours, updated_at)
           VALUES ($1, $2, $3, $4, $5, NOW())
           ON CONFLICT (employee_id, month) DO UPDATE
           SET days_present = EXCLUDED.days_present,
               leaves_taken = EXCLUDED.leaves_taken,
               overtime_hours = EXCLUDED.overtime_hours,
               updated_at = NOW()
           RETURNING *"#,
    )
    .bind(employee_id)
    .bind(month)
    .bind(days_present)
    .bind(leaves_taken)
    .bind(overtime_hours)
    .fetch_one(conn)
    .await
}

/// Leave-approval merge policy: a new record starts with only the leave days,
/// an existing one accumulates them into leaves_taken and keeps the rest.
pub(crate) async fn accumulate_leave_days(
    conn: &mut PgConnection,
    employee_id: Uuid,
    month: NaiveDate,
    leave_days: i32,
) -> Result<Attendance, sqlx::Error> {
    sqlx::query_as::<_, Attendance>(
        r#"INSERT INTO attendance (employee_id, month, days_present, leaves_taken, overtime_hours, updated_at)
           VALUES ($1, $2, 0, $3, 0, NOW())
           ON CONFLICT (employee_id, month) DO UPDATE
           SET leaves_taken = attendance.leaves_taken + EXCLUDED.leaves_taken,
               updated_at = NOW()
           RETURNING *"#,
    )
    .bind(employee_id)
    .bind(month)
    .bind(leave_days)
    .fetch_one(conn)
    .await
}

/// Insert-or-merge an attendance record for (employee, month). The two modes
/// are distinct policies over the same key: overwrite for direct admin entry,
/// accumulate for folding in approved leave days.
pub async fn upsert(
    db: &PgPool,
    auth: &AuthUser,
    req: UpsertAttendanceRequest,
) -> AppResult<Attendance> {
    auth.require_admin()?;

    if req.days_present < 0 || req.leaves_taken < 0 || req.overtime_hours < Decimal::ZERO {
        return Err(AppError::Validation(
            "Attendance values cannot be negative".to_string(),
        ));
    }

    let exists = sqlx::query_scalar::<_, i32>("SELECT 1 FROM employees WHERE employee_id = $1")
        .bind(req.employee_id)
        .fetch_optional(db)
        .await?;
    if exists.is_none() {
        return Err(AppError::NotFound(format!(
            "Employee {} not found",
            req.employee_id
        )));
    }

    let month = month_key(req.month);
    let mut conn = db.acquire().await?;

    let record = match req.mode {
        UpsertMode::Overwrite => {
            overwrite_entry(
                &mut conn,
                req.employee_id,
                month,
                req.days_present,
                req.leaves_taken,
                req.overtime_hours,
            )
            .await?
        }
        UpsertMode::Accumulate => {
            accumulate_leave_days(&mut conn, req.employee_id, month, req.leaves_taken).await?
        }
    };

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_key_normalizes_to_first_of_month() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        assert_eq!(month_key(date), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    }

    #[test]
    fn month_key_is_stable_on_first_of_month() {
        let first = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        assert_eq!(month_key(first), first);
    }
}
