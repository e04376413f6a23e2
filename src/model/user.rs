use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_code": "EMP-001",
        "first_name": "Somchai",
        "last_name": "Jaidee",
        "email": "somchai@company.com",
        "department": "Engineering",
        "position": "Developer",
        "role_id": 3,
        "supervisor_id": 2,
        "start_date": "2024-01-01",
        "is_active": true
    })
)]
pub struct User {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "EMP-001")]
    pub employee_code: String,

    #[schema(example = "Somchai")]
    pub first_name: String,

    #[schema(example = "Jaidee")]
    pub last_name: String,

    #[schema(example = "somchai@company.com")]
    pub email: String,

    #[schema(example = "Engineering")]
    pub department: String,

    #[schema(example = "Developer")]
    pub position: String,

    /// 1 = admin, 2 = supervisor, 3 = employee
    #[schema(example = 3)]
    pub role_id: u8,

    /// Weak reference to the direct supervisor, one level only.
    #[schema(example = 2, nullable = true)]
    pub supervisor_id: Option<u64>,

    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub start_date: NaiveDate,

    pub is_active: bool,

    #[schema(value_type = Option<String>, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,
}

/// One row of the per-employee balance map.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveBalanceRow {
    pub user_id: u64,
    #[schema(example = "sick")]
    pub category: String,
    #[schema(example = 30)]
    pub days: u32,
}
