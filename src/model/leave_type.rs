use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Catalog entry: an entitlement-carrying leave category.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "Sick leave",
        "code": "sick",
        "description": "Leave due to illness",
        "default_days": 30,
        "is_active": true
    })
)]
pub struct LeaveTypeRecord {
    pub id: u64,
    #[schema(example = "Sick leave")]
    pub name: String,
    #[schema(example = "sick")]
    pub code: String,
    pub description: String,
    #[schema(example = 30)]
    pub default_days: u32,
    pub is_active: bool,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,
}
