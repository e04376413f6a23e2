use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::leave::{engine, rules};
use crate::model::leave_request::{LeaveRequest, LeaveType};
use crate::model::role::Role;
use crate::notify::{self, NotificationKind};
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    #[schema(example = "sick")]
    pub leave_type: LeaveType,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-07", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "Flu, doctor's note attached")]
    pub reason: String,
    pub has_medical_certificate: Option<bool>,
    pub is_long_term_sick: Option<bool>,
    #[schema(format = "date", value_type = Option<String>)]
    pub child_birth_date: Option<NaiveDate>,
    #[schema(format = "date", value_type = Option<String>)]
    pub ceremony_date: Option<NaiveDate>,
    pub is_paid_leave: Option<bool>,
    /// References returned by the file upload endpoint, at most 5.
    pub attachments: Option<Vec<String>>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateLeave {
    pub leave_type: LeaveType,
    #[schema(format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(format = "date", value_type = String)]
    pub end_date: NaiveDate,
    pub reason: String,
    #[schema(format = "date", value_type = Option<String>)]
    pub child_birth_date: Option<NaiveDate>,
    #[schema(format = "date", value_type = Option<String>)]
    pub ceremony_date: Option<NaiveDate>,
}

#[derive(Deserialize, ToSchema)]
pub struct DecisionReq {
    #[schema(example = "Approved, get well soon")]
    pub note: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct LeaveFilter {
    /// Filter by employee ID
    #[schema(example = 123)]
    pub user_id: Option<u64>,
    /// Filter by leave status
    #[schema(example = "pending")]
    pub status: Option<String>,
    /// Filter by start-date calendar year
    #[schema(example = 2026)]
    pub year: Option<i32>,
    /// Pagination page number (start with 1)
    #[schema(example = 1)]
    pub page: Option<u64>,
    /// Pagination per page number
    #[schema(example = 10)]
    pub per_page: Option<u64>,
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    U64(u64),
    Str(&'a str),
    Date(NaiveDate),
}

#[derive(Serialize)]
pub struct LeaveDetail {
    #[serde(flatten)]
    pub request: LeaveRequest,
    pub attachments: Vec<String>,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveListResponse {
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<LeaveRequest>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

#[derive(sqlx::FromRow)]
struct Contact {
    email: String,
    supervisor_id: Option<u64>,
}

async fn contact_of(pool: &MySqlPool, user_id: u64) -> Option<Contact> {
    sqlx::query_as::<_, Contact>("SELECT email, supervisor_id FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .ok()
        .flatten()
}

async fn email_of(pool: &MySqlPool, user_id: u64) -> Option<String> {
    sqlx::query_scalar::<_, String>("SELECT email FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .ok()
        .flatten()
}

fn leave_context(request: &LeaveRequest) -> serde_json::Value {
    json!({
        "request_id": request.id,
        "leave_type": request.leave_type,
        "start_date": request.start_date,
        "end_date": request.end_date,
        "total_days": request.total_days,
        "status": request.status,
    })
}

/* =========================
Create leave request
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/leave",
    request_body = CreateLeave,
    responses(
        (status = 201, description = "Leave request submitted, pending approval", body = Object),
        (status = 400, description = "Validation failed or insufficient balance"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<CreateLeave>,
) -> actix_web::Result<impl Responder> {
    let payload = payload.into_inner();
    let attachments = payload.attachments.unwrap_or_default();

    let submission = engine::Submission {
        user_id: auth.user_id,
        input: rules::NewRequestInput {
            leave_type: payload.leave_type,
            start_date: payload.start_date,
            end_date: payload.end_date,
            child_birth_date: payload.child_birth_date,
            ceremony_date: payload.ceremony_date,
            attachment_count: attachments.len(),
        },
        reason: payload.reason,
        has_medical_certificate: payload.has_medical_certificate.unwrap_or(false),
        is_long_term_sick: payload.is_long_term_sick.unwrap_or(false),
        is_paid_leave: payload.is_paid_leave.unwrap_or(true),
        attachments,
    };

    let request = engine::create(pool.get_ref(), submission).await?;

    // ping the direct supervisor, best-effort
    if let Some(contact) = contact_of(pool.get_ref(), auth.user_id).await {
        if let Some(supervisor_id) = contact.supervisor_id {
            if let Some(supervisor_email) = email_of(pool.get_ref(), supervisor_id).await {
                notify::notify_detached(
                    config.notify_webhook_url.clone(),
                    supervisor_email,
                    NotificationKind::LeaveSubmitted,
                    leave_context(&request),
                );
            }
        }
    }

    Ok(HttpResponse::Created().json(request))
}

/* =========================
Approve leave (Supervisor/Admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/approve",
    params(("leave_id" = u64, Path, description = "ID of the leave request to approve")),
    request_body = DecisionReq,
    responses(
        (status = 200, description = "Leave approved, balance debited", body = Object),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Request already processed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    path: web::Path<u64>,
    payload: web::Json<DecisionReq>,
) -> actix_web::Result<impl Responder> {
    auth.require_supervisor()?;

    let leave_id = path.into_inner();
    let request =
        engine::approve(pool.get_ref(), leave_id, auth.user_id, payload.note.as_deref()).await?;

    if let Some(employee_email) = email_of(pool.get_ref(), request.user_id).await {
        notify::notify_detached(
            config.notify_webhook_url.clone(),
            employee_email,
            NotificationKind::LeaveApproved,
            leave_context(&request),
        );
    }

    Ok(HttpResponse::Ok().json(request))
}

/* =========================
Reject leave (Supervisor/Admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/reject",
    params(("leave_id" = u64, Path, description = "ID of the leave request to reject")),
    request_body = DecisionReq,
    responses(
        (status = 200, description = "Leave rejected, balance untouched", body = Object),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Request already processed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    path: web::Path<u64>,
    payload: web::Json<DecisionReq>,
) -> actix_web::Result<impl Responder> {
    auth.require_supervisor()?;

    let leave_id = path.into_inner();
    let request =
        engine::reject(pool.get_ref(), leave_id, auth.user_id, payload.note.as_deref()).await?;

    if let Some(employee_email) = email_of(pool.get_ref(), request.user_id).await {
        notify::notify_detached(
            config.notify_webhook_url.clone(),
            employee_email,
            NotificationKind::LeaveRejected,
            leave_context(&request),
        );
    }

    Ok(HttpResponse::Ok().json(request))
}

/// Cancel an own pending request
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/cancel",
    params(("leave_id" = u64, Path, description = "ID of the leave request to cancel")),
    responses(
        (status = 200, description = "Leave cancelled", body = Object),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Request already processed"),
        (status = 403, description = "Not the requesting employee")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn cancel_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();
    let request = engine::cancel(pool.get_ref(), leave_id, auth.user_id).await?;
    Ok(HttpResponse::Ok().json(request))
}

/// Edit an own pending request
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}",
    params(("leave_id" = u64, Path, description = "ID of the leave request to edit")),
    request_body = UpdateLeave,
    responses(
        (status = 200, description = "Leave request updated and repriced", body = Object),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Request already processed")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn update_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateLeave>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();
    let payload = payload.into_inner();

    let input = rules::NewRequestInput {
        leave_type: payload.leave_type,
        start_date: payload.start_date,
        end_date: payload.end_date,
        child_birth_date: payload.child_birth_date,
        ceremony_date: payload.ceremony_date,
        attachment_count: 0, // attachments are not replaced on edit
    };

    let request =
        engine::update(pool.get_ref(), leave_id, auth.user_id, input, payload.reason).await?;
    Ok(HttpResponse::Ok().json(request))
}

/// Leave request details with attachments
#[utoipa::path(
    get,
    path = "/api/v1/leave/{leave_id}",
    params(("leave_id" = u64, Path, description = "ID of the leave request to fetch")),
    responses(
        (status = 200, description = "Leave request found", body = Object),
        (status = 403, description = "Not visible to this actor"),
        (status = 404, description = "Leave request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();
    let request = engine::fetch_request(pool.get_ref(), leave_id).await?;

    // visible to the owner, the owner's direct supervisor, and admins
    if auth.role != Role::Admin && request.user_id != auth.user_id {
        let supervisor_id = contact_of(pool.get_ref(), request.user_id)
            .await
            .and_then(|c| c.supervisor_id);
        if supervisor_id != Some(auth.user_id) {
            return Err(actix_web::error::ErrorForbidden("Not your request"));
        }
    }

    let attachments = engine::attachments(pool.get_ref(), leave_id).await?;
    Ok(HttpResponse::Ok().json(LeaveDetail {
        request,
        attachments,
    }))
}

const LIST_COLUMNS: &str = r#"
    id, user_id, leave_type, start_date, end_date, total_days, working_days,
    reason, has_medical_certificate, is_long_term_sick, child_birth_date,
    ceremony_date, is_paid_leave, fiscal_year, status, approved_by,
    approval_date, approval_note, created_at
"#;

/// Own leave history, newest first
#[utoipa::path(
    get,
    path = "/api/v1/leave",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Own leave requests", body = Object)
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn my_leaves(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<LeaveFilter>,
) -> actix_web::Result<impl Responder> {
    let mut where_sql = String::from(" WHERE user_id = ?");
    let mut args: Vec<FilterValue> = vec![FilterValue::U64(auth.user_id)];

    if let Some(status) = query.status.as_deref() {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status));
    }
    if let Some(year) = query.year {
        let (start, end) = rules::year_bounds(year)?;
        where_sql.push_str(" AND start_date BETWEEN ? AND ?");
        args.push(FilterValue::Date(start));
        args.push(FilterValue::Date(end));
    }

    let sql = format!(
        "SELECT {LIST_COLUMNS} FROM leave_requests{where_sql} ORDER BY created_at DESC"
    );

    let mut q = sqlx::query_as::<_, LeaveRequest>(&sql);
    for arg in args {
        q = match arg {
            FilterValue::U64(v) => q.bind(v),
            FilterValue::Str(s) => q.bind(s.to_string()),
            FilterValue::Date(d) => q.bind(d),
        };
    }

    let leaves = q.fetch_all(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch own leave requests");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(leaves))
}

/// Pending requests of the supervisor's direct reports (one level only)
#[utoipa::path(
    get,
    path = "/api/v1/leave/pending",
    responses(
        (status = 200, description = "Pending requests awaiting this supervisor", body = Object),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn pending_leaves(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_supervisor()?;

    let sql = format!(
        r#"
        SELECT {LIST_COLUMNS_PREFIXED}
        FROM leave_requests lr
        JOIN users u ON u.id = lr.user_id
        WHERE lr.status = 'pending' AND u.supervisor_id = ?
        ORDER BY lr.created_at ASC
        "#,
        LIST_COLUMNS_PREFIXED = LIST_COLUMNS
            .split(',')
            .map(|c| format!("lr.{}", c.trim()))
            .collect::<Vec<_>>()
            .join(", ")
    );

    let leaves = sqlx::query_as::<_, LeaveRequest>(&sql)
        .bind(auth.user_id)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch pending leave requests");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(leaves))
}

/// Requests of everyone sharing the caller's supervisor
#[utoipa::path(
    get,
    path = "/api/v1/leave/team",
    responses(
        (status = 200, description = "Requests of the caller's team", body = Object)
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn team_leaves(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let sql = format!(
        r#"
        SELECT {cols}
        FROM leave_requests lr
        JOIN users u ON u.id = lr.user_id
        WHERE u.supervisor_id = (SELECT supervisor_id FROM users WHERE id = ?)
          AND u.supervisor_id IS NOT NULL
        ORDER BY lr.start_date DESC
        "#,
        cols = LIST_COLUMNS
            .split(',')
            .map(|c| format!("lr.{}", c.trim()))
            .collect::<Vec<_>>()
            .join(", ")
    );

    let leaves = sqlx::query_as::<_, LeaveRequest>(&sql)
        .bind(auth.user_id)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch team leave requests");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(leaves))
}

/// All requests, paginated (admin)
#[utoipa::path(
    get,
    path = "/api/v1/leave/all",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Paginated leave list", body = LeaveListResponse),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<LeaveFilter>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    // -------------------------
    // Pagination
    // -------------------------
    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    // -------------------------
    // WHERE clause
    // -------------------------
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(user_id) = query.user_id {
        where_sql.push_str(" AND user_id = ?");
        args.push(FilterValue::U64(user_id));
    }
    if let Some(status) = query.status.as_deref() {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status));
    }
    if let Some(year) = query.year {
        let (start, end) = rules::year_bounds(year)?;
        where_sql.push_str(" AND start_date BETWEEN ? AND ?");
        args.push(FilterValue::Date(start));
        args.push(FilterValue::Date(end));
    }

    // -------------------------
    // COUNT query
    // -------------------------
    let count_sql = format!("SELECT COUNT(*) FROM leave_requests{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(s.to_string()),
            FilterValue::Date(d) => count_q.bind(*d),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count leave requests");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // -------------------------
    // DATA query
    // -------------------------
    let data_sql = format!(
        "SELECT {LIST_COLUMNS} FROM leave_requests{where_sql} ORDER BY created_at DESC LIMIT ? OFFSET ?"
    );

    let mut data_q = sqlx::query_as::<_, LeaveRequest>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s.to_string()),
            FilterValue::Date(d) => data_q.bind(d),
        };
    }

    let leaves = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch leave list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let response = LeaveListResponse {
        data: leaves,
        page: page as u32,
        per_page: per_page as u32,
        total,
    };

    Ok(HttpResponse::Ok().json(response))
}
