use crate::auth::auth::AuthUser;
use crate::leave::catalog;
use crate::utils::db_utils::{build_update_sql, execute_update};
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::MySqlPool;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateLeaveType {
    #[schema(example = "Sick leave")]
    pub name: String,
    #[schema(example = "sick")]
    pub code: String,
    #[schema(example = "Leave due to illness")]
    pub description: Option<String>,
    #[schema(example = 30)]
    pub default_days: u32,
}

/// Active leave categories
#[utoipa::path(
    get,
    path = "/api/v1/leave-types",
    responses((status = 200, description = "Active leave categories", body = Object)),
    security(("bearer_auth" = [])),
    tag = "LeaveType"
)]
pub async fn list_leave_types(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let types = catalog::list_active(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(types))
}

/// Create leave category (admin)
#[utoipa::path(
    post,
    path = "/api/v1/leave-types",
    request_body = CreateLeaveType,
    responses(
        (status = 201, description = "Leave category created", body = Object),
        (status = 400, description = "Category code already exists"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "LeaveType"
)]
pub async fn create_leave_type(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateLeaveType>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let id = catalog::create(
        pool.get_ref(),
        &payload.name,
        &payload.code,
        payload.description.as_deref().unwrap_or(""),
        payload.default_days,
    )
    .await?;

    Ok(HttpResponse::Created().json(json!({ "id": id })))
}

/// Update leave category fields (admin). The code itself is immutable.
#[utoipa::path(
    put,
    path = "/api/v1/leave-types/{id}",
    params(("id" = u64, Path, description = "Leave category ID")),
    request_body = Object,
    responses(
        (status = 200, description = "Leave category updated"),
        (status = 404, description = "Leave category not found"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "LeaveType"
)]
pub async fn update_leave_type(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let id = path.into_inner();
    let update = build_update_sql(
        "leave_types",
        &body,
        &["name", "description", "default_days", "is_active"],
        "id",
        id,
    )?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({ "message": "Leave type not found" })));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Leave type updated" })))
}

/// Seed the fixed default categories (admin); never overwrites existing codes
#[utoipa::path(
    post,
    path = "/api/v1/leave-types/init",
    responses(
        (status = 200, description = "Catalog after seeding", body = Object),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "LeaveType"
)]
pub async fn init_leave_types(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let types = catalog::seed_defaults(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(types))
}
