use crate::auth::auth::AuthUser;
use crate::leave::{balance, report, rules};
use actix_web::{HttpResponse, Responder, web};
use chrono::{Datelike, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct ReportQuery {
    /// Calendar year to aggregate, defaults to the current year
    #[schema(example = 2026)]
    pub year: Option<i32>,
    /// Filter by leave status (all-requests listing only)
    #[schema(example = "approved")]
    pub status: Option<String>,
    /// Filter by department (all-requests listing only)
    #[schema(example = "Engineering")]
    pub department: Option<String>,
}

/// Year statistics: totals plus by-type, by-department, by-month and
/// by-status rollups (admin)
#[utoipa::path(
    get,
    path = "/api/v1/reports/statistics",
    params(ReportQuery),
    responses(
        (status = 200, description = "Aggregated leave statistics", body = Object),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Report"
)]
pub async fn statistics(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<ReportQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let year = query.year.unwrap_or_else(|| Utc::now().year());
    let stats = report::statistics(pool.get_ref(), year).await?;
    Ok(HttpResponse::Ok().json(stats))
}

#[derive(sqlx::FromRow, serde::Serialize)]
struct AdminRequestRow {
    id: u64,
    user_id: u64,
    employee_code: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    department: Option<String>,
    leave_type: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    total_days: u32,
    status: String,
    fiscal_year: i32,
}

/// All requests of a year with employee context (admin)
#[utoipa::path(
    get,
    path = "/api/v1/reports/all-requests",
    params(ReportQuery),
    responses(
        (status = 200, description = "Requests with employee context", body = Object),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Report"
)]
pub async fn all_requests(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<ReportQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let year = query.year.unwrap_or_else(|| Utc::now().year());
    let (start, end) = rules::year_bounds(year)?;

    let mut sql = String::from(
        r#"
        SELECT lr.id, lr.user_id, u.employee_code, u.first_name, u.last_name,
               u.department, lr.leave_type, lr.start_date, lr.end_date,
               lr.total_days, lr.status, lr.fiscal_year
        FROM leave_requests lr
        LEFT JOIN users u ON u.id = lr.user_id
        WHERE lr.start_date BETWEEN ? AND ?
        "#,
    );

    if query.status.is_some() {
        sql.push_str(" AND lr.status = ?");
    }
    if query.department.is_some() {
        sql.push_str(" AND u.department = ?");
    }
    sql.push_str(" ORDER BY lr.created_at DESC");

    let mut q = sqlx::query_as::<_, AdminRequestRow>(&sql).bind(start).bind(end);
    if let Some(status) = &query.status {
        q = q.bind(status);
    }
    if let Some(department) = &query.department {
        q = q.bind(department);
    }

    let rows = q.fetch_all(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch report rows");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(rows))
}

/// Yearly reset: every active employee back to the catalog defaults (admin)
#[utoipa::path(
    post,
    path = "/api/v1/reports/reset-yearly",
    responses(
        (status = 200, description = "Count of employees reset", body = Object),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Report"
)]
pub async fn reset_yearly(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let updated = balance::reset_all(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Yearly leave balance reset complete",
        "updated_count": updated
    })))
}
