use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "New Year's Day",
        "date": "2026-01-01",
        "description": "New Year's Day",
        "is_active": true
    })
)]
pub struct Holiday {
    pub id: u64,
    #[schema(example = "New Year's Day")]
    pub name: String,
    #[schema(example = "2026-01-01", value_type = String, format = "date")]
    pub date: NaiveDate,
    pub description: String,
    pub is_active: bool,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,
}
