use crate::auth::auth::AuthUser;
use crate::leave::balance;
use crate::model::user::User;
use crate::utils::db_utils::{build_update_sql, execute_update};
use crate::utils::email_filter;
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::MySqlPool;
use std::collections::HashMap;
use tracing::error;
use utoipa::ToSchema;

const USER_COLUMNS: &str = r#"
    id, employee_code, first_name, last_name, email, department, position,
    role_id, supervisor_id, start_date, is_active, created_at
"#;

#[derive(Deserialize, ToSchema)]
pub struct SetBalanceReq {
    /// Category code to remaining-day count, e.g. {"sick": 30, "vacation": 8}
    #[schema(value_type = Object)]
    pub balances: HashMap<String, u32>,
}

/// All employees with their balance maps (admin)
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses((status = 200, description = "Employee list", body = Object)),
    security(("bearer_auth" = [])),
    tag = "User"
)]
pub async fn list_users(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id ASC");
    let users = sqlx::query_as::<_, User>(&sql)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch users");
            ErrorInternalServerError("Database error")
        })?;

    Ok(HttpResponse::Ok().json(users))
}

/// One employee with the balance map (admin, or the employee themselves)
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = u64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Employee found", body = Object),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
pub async fn get_user(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let user_id = path.into_inner();
    if user_id != auth.user_id {
        auth.require_admin()?;
    }

    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(user_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, user_id, "Failed to fetch user");
            ErrorInternalServerError("Database error")
        })?;

    let Some(user) = user else {
        return Ok(HttpResponse::NotFound().json(json!({ "message": "User not found" })));
    };

    let balances = balance::balance_map(pool.get_ref(), user_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "user": user,
        "leave_balance": balances
    })))
}

/// Patch employee fields (admin)
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = u64, Path, description = "User ID")),
    request_body = Object,
    responses(
        (status = 200, description = "Employee updated"),
        (status = 404, description = "Employee not found"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
pub async fn update_user(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let user_id = path.into_inner();
    let update = build_update_sql(
        "users",
        &body,
        &[
            "first_name",
            "last_name",
            "email",
            "department",
            "position",
            "role_id",
            "supervisor_id",
            "is_active",
        ],
        "id",
        user_id,
    )?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({ "message": "User not found" })));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "User updated" })))
}

/// Remove employee (admin). Their requests survive and report under the
/// "unspecified" department.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = u64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Employee removed"),
        (status = 404, description = "Employee not found"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
pub async fn delete_user(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let user_id = path.into_inner();

    let email = sqlx::query_scalar::<_, String>("SELECT email FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, user_id, "Failed to fetch user before delete");
            ErrorInternalServerError("Database error")
        })?;

    let Some(email) = email else {
        return Ok(HttpResponse::NotFound().json(json!({ "message": "User not found" })));
    };

    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, user_id, "Failed to delete user");
            ErrorInternalServerError("Database error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({ "message": "User not found" })));
    }

    email_filter::remove(&email);

    // cut off session renewal; outstanding access tokens expire on their own
    if let Err(e) = sqlx::query("UPDATE refresh_tokens SET revoked = TRUE WHERE user_id = ?")
        .bind(user_id)
        .execute(pool.get_ref())
        .await
    {
        error!(error = %e, user_id, "Failed to revoke refresh tokens");
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "User removed" })))
}

/// Employees holding the supervisor or admin capability
#[utoipa::path(
    get,
    path = "/api/v1/users/supervisors",
    responses((status = 200, description = "Supervisors and admins", body = Object)),
    security(("bearer_auth" = [])),
    tag = "User"
)]
pub async fn list_supervisors(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let sql = format!(
        "SELECT {USER_COLUMNS} FROM users WHERE role_id IN (1, 2) AND is_active = TRUE ORDER BY id ASC"
    );
    let supervisors = sqlx::query_as::<_, User>(&sql)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch supervisors");
            ErrorInternalServerError("Database error")
        })?;

    Ok(HttpResponse::Ok().json(supervisors))
}

/// Direct balance edit (admin). Non-negativity is enforced by the unsigned
/// payload type; pending requests are not re-validated.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}/balance",
    params(("id" = u64, Path, description = "User ID")),
    request_body = SetBalanceReq,
    responses(
        (status = 200, description = "Balance map replaced", body = Object),
        (status = 404, description = "Employee not found"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
pub async fn set_balance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<SetBalanceReq>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let user_id = path.into_inner();
    balance::direct_set(pool.get_ref(), user_id, &payload.balances).await?;

    let balances = balance::balance_map(pool.get_ref(), user_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "leave_balance": balances })))
}
