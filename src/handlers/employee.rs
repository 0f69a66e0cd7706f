// src/handlers/employee.rs

use crate::{
    auth::AuthUser,
    errors::{AppError, AppResult},
    models::{CreateEmployeeRequest, Employee, UpdateEmployeeRequest},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

/// Add a new employee record
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    request_body = CreateEmployeeRequest,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "User account already linked to another employee"),
    ),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
pub async fn create_employee(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<CreateEmployeeRequest>,
) -> AppResult<(StatusCode, Json<Employee>)> {
    auth.require_admin()?;

    if body.base_salary < Decimal::ZERO {
        return Err(AppError::Validation(
            "Base salary cannot be negative".to_string(),
        ));
    }

    if let Some(user_id) = body.user_id {
        let linked = sqlx::query_scalar::<_, Uuid>(
            "SELECT employee_id FROM employees WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&state.db)
        .await?;

        if linked.is_some() {
            return Err(AppError::Conflict(format!(
                "User {} is already linked to an employee",
                user_id
            )));
        }
    }

    let employee = sqlx::query_as::<_, Employee>(
        r#"INSERT INTO employees (
            employee_id, name, department, position, joining_date, base_salary, user_id, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), NOW())
        RETURNING *"#,
    )
    .bind(Uuid::new_v4())
    .bind(&body.name)
    .bind(&body.department)
    .bind(&body.position)
    .bind(body.joining_date)
    .bind(body.base_salary)
    .bind(body.user_id)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(employee)))
}

/// List all employees
#[utoipa::path(
    get,
    path = "/api/v1/employees",
    responses(
        (status = 200, description = "List of employees", body = Vec<Employee>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
pub async fn list_employees(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Employee>>> {
    auth.require_admin()?;

    let employees =
        sqlx::query_as::<_, Employee>("SELECT * FROM employees ORDER BY created_at DESC")
            .fetch_all(&state.db)
            .await?;

    Ok(Json(employees))
}

/// Get a single employee
#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}",
    params(("employee_id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee detail", body = Employee),
        (status = 404, description = "Employee not found"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
pub async fn get_employee(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
) -> AppResult<Json<Employee>> {
    auth.authorize_employee(employee_id)?;

    let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE employee_id = $1")
        .bind(employee_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", employee_id)))?;

    Ok(Json(employee))
}

/// Update an employee record in place
#[utoipa::path(
    put,
    path = "/api/v1/employees/{employee_id}",
    request_body = UpdateEmployeeRequest,
    params(("employee_id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee updated", body = Employee),
        (status = 404, description = "Employee not found"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
pub async fn update_employee(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
    Json(body): Json<UpdateEmployeeRequest>,
) -> AppResult<Json<Employee>> {
    auth.require_admin()?;

    if body.base_salary < Decimal::ZERO {
        return Err(AppError::Validation(
            "Base salary cannot be negative".to_string(),
        ));
    }

    let employee = sqlx::query_as::<_, Employee>(
        r#"UPDATE employees
           SET name = $2, department = $3, position = $4, joining_date = $5,
               base_salary = $6, user_id = $7, updated_at = NOW()
           WHERE employee_id = $1
           RETURNING *"#,
    )
    .bind(employee_id)
    .bind(&body.name)
    .bind(&body.department)
    .bind(&body.position)
    .bind(body.joining_date)
    .bind(body.base_salary)
    .bind(body.user_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", employee_id)))?;

    Ok(Json(employee))
}

/// Delete an employee and all dependent attendance, salary and leave records
#[utoipa::path(
    delete,
    path = "/api/v1/employees/{employee_id}",
    params(("employee_id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee deleted"),
        (status = 404, description = "Employee not found"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
pub async fn delete_employee(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    auth.require_admin()?;

    // Attendance, salaries and leave requests go with it via ON DELETE CASCADE.
    let result = sqlx::query("DELETE FROM employees WHERE employee_id = $1")
        .bind(employee_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "Employee {} not found",
            employee_id
        )));
    }

    info!("Employee {} deleted with dependent records", employee_id);

    Ok(Json(
        serde_json::json!({ "message": "Employee and dependent records deleted" }),
    ))
}
