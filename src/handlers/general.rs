use crate::state::AppState;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
};
use serde_json::json;

/// Root handler — returns an HTML landing page with project info and links
pub async fn root_handler() -> impl IntoResponse {
    Html(r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0"/>
  <title>HRMS Backend API</title>
  <style>
    * { box-sizing: border-box; margin: 0; padding: 0; }
    body { font-family: 'Segoe UI', system-ui, sans-serif; background: #0f172a; color: #e2e8f0; min-height: 100vh; padding: 40px 20px; }
    .container { max-width: 760px; margin: 0 auto; }
    header { text-align: center; margin-bottom: 40px; }
    header h1 { font-size: 2.4rem; font-weight: 800; background: linear-gradient(135deg, #22d3ee, #6366f1); -webkit-background-clip: text; -webkit-text-fill-color: transparent; margin-bottom: 8px; }
    header p { color: #94a3b8; font-size: 1.05rem; }
    .badge { display: inline-block; background: #1e293b; border: 1px solid #334155; color: #38bdf8; padding: 4px 12px; border-radius: 20px; font-size: 0.8rem; margin-top: 12px; }
    .card { background: #1e293b; border: 1px solid #334155; border-radius: 12px; padding: 20px; margin-bottom: 16px; }
    .card h3 { font-size: 1rem; font-weight: 600; color: #f1f5f9; margin-bottom: 6px; }
    .card p { font-size: 0.875rem; color: #94a3b8; line-height: 1.5; }
    .card a { color: #38bdf8; text-decoration: none; font-weight: 500; display: inline-block; margin-top: 8px; font-size: 0.875rem; }
    .card a:hover { text-decoration: underline; }
    footer { text-align: center; margin-top: 32px; color: #475569; font-size: 0.85rem; }
  </style>
</head>
<body>
<div class="container">
  <header>
    <h1>HRMS Backend API</h1>
    <p>Employee records, attendance, leave and payroll for one workforce</p>
    <span class="badge">v1.0.0 · REST API · JSON</span>
  </header>

  <div class="card">
    <h3>API Documentation</h3>
    <p>Interactive Swagger UI with every endpoint, request schema and response schema.</p>
    <a href="/docs">Open Swagger UI →</a>
  </div>
  <div class="card">
    <h3>Health Check</h3>
    <p>Confirm the service is running and the database is reachable.</p>
    <a href="/health">GET /health →</a>
  </div>
  <div class="card">
    <h3>Payroll</h3>
    <p>Monthly salary computation with overtime pay and provident fund, per employee or as an all-or-nothing bulk run.</p>
  </div>
  <div class="card">
    <h3>Leave &amp; Attendance</h3>
    <p>Leave requests flow through admin approval; approved business days land in the month's attendance record automatically.</p>
  </div>

  <footer>
    <p>Built with Rust · Axum · SQLx · PostgreSQL</p>
  </footer>
</div>
</body>
</html>"#)
}

/// Health check endpoint
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    match sqlx::query("SELECT 1").fetch_one(&state.db).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "database": "connected",
                "service": "hrms-backend",
                "version": "1.0.0"
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "database": "disconnected",
                "error": e.to_string()
            })),
        ),
    }
}
