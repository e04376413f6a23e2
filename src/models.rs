use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct RegisterReq {
    #[schema(example = "EMP-001")]
    pub employee_code: String,
    #[schema(example = "Somchai")]
    pub first_name: String,
    #[schema(example = "Jaidee")]
    pub last_name: String,
    #[schema(example = "somchai@company.com", format = "email")]
    pub email: String,
    pub password: String,
    #[schema(example = "Engineering")]
    pub department: String,
    #[schema(example = "Developer")]
    pub position: String,
    /// 1 = admin, 2 = supervisor, 3 = employee; defaults to employee
    #[schema(example = 3)]
    pub role_id: Option<u8>,
    #[schema(example = 2, nullable = true)]
    pub supervisor_id: Option<u64>,
    #[schema(example = "2024-01-01", format = "date", value_type = String)]
    pub start_date: Option<NaiveDate>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginReqDto {
    #[schema(example = "somchai@company.com", format = "email")]
    pub email: String,
    pub password: String,
}

#[derive(FromRow)]
pub struct UserSql {
    pub id: u64,
    pub email: String,
    pub password: String,
    pub role_id: u8,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    /// e-mail of the authenticated employee
    pub sub: String,
    pub role: u8,
    pub exp: usize,
    pub jti: String,
    pub token_type: TokenType,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub enum TokenType {
    Access,
    Refresh,
}
