use crate::auth::auth::AuthUser;
use crate::leave::calendar;
use crate::utils::db_utils::{build_update_sql, execute_update};
use actix_web::{HttpResponse, Responder, web};
use chrono::{Datelike, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateHoliday {
    #[schema(example = "Substitute holiday")]
    pub name: String,
    #[schema(example = "2026-04-16", format = "date", value_type = String)]
    pub date: NaiveDate,
    pub description: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct HolidayQuery {
    /// Calendar year, defaults to the current year
    #[schema(example = 2026)]
    pub year: Option<i32>,
}

/// Active holidays of a year, ascending by date
#[utoipa::path(
    get,
    path = "/api/v1/holidays",
    params(HolidayQuery),
    responses((status = 200, description = "Holidays of the year", body = Object)),
    security(("bearer_auth" = [])),
    tag = "Holiday"
)]
pub async fn list_holidays(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<HolidayQuery>,
) -> actix_web::Result<impl Responder> {
    let year = query.year.unwrap_or_else(|| Utc::now().year());
    let holidays = calendar::list_for_year(pool.get_ref(), year).await?;
    Ok(HttpResponse::Ok().json(holidays))
}

/// Create holiday (admin); at most one active holiday per calendar day
#[utoipa::path(
    post,
    path = "/api/v1/holidays",
    request_body = CreateHoliday,
    responses(
        (status = 201, description = "Holiday created", body = Object),
        (status = 400, description = "An active holiday already exists on that day"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Holiday"
)]
pub async fn create_holiday(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateHoliday>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let id = calendar::create(
        pool.get_ref(),
        &payload.name,
        payload.date,
        payload.description.as_deref().unwrap_or(""),
    )
    .await?;

    Ok(HttpResponse::Created().json(json!({ "id": id })))
}

/// Update holiday fields (admin)
#[utoipa::path(
    put,
    path = "/api/v1/holidays/{id}",
    params(("id" = u64, Path, description = "Holiday ID")),
    request_body = Object,
    responses(
        (status = 200, description = "Holiday updated"),
        (status = 404, description = "Holiday not found"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Holiday"
)]
pub async fn update_holiday(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let id = path.into_inner();
    let update = build_update_sql(
        "holidays",
        &body,
        &["name", "date", "description", "is_active"],
        "id",
        id,
    )?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({ "message": "Holiday not found" })));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Holiday updated" })))
}

/// Delete holiday (admin)
#[utoipa::path(
    delete,
    path = "/api/v1/holidays/{id}",
    params(("id" = u64, Path, description = "Holiday ID")),
    responses(
        (status = 200, description = "Holiday removed"),
        (status = 404, description = "Holiday not found"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Holiday"
)]
pub async fn delete_holiday(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    calendar::delete(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Holiday removed" })))
}

/// Seed the fixed national holiday list for a year (admin, idempotent)
#[utoipa::path(
    post,
    path = "/api/v1/holidays/init",
    params(HolidayQuery),
    responses(
        (status = 200, description = "Holidays of the year after seeding", body = Object),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Holiday"
)]
pub async fn init_holidays(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<HolidayQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let year = query.year.unwrap_or_else(|| Utc::now().year());
    let holidays = calendar::seed_defaults(pool.get_ref(), year).await?;
    Ok(HttpResponse::Ok().json(holidays))
}
