use crate::error::LeaveError;
use crate::model::leave_type::LeaveTypeRecord;
use sqlx::MySqlPool;
use std::collections::HashMap;
use tracing::info;

/// Fixed catalog seeded for a fresh install: code, name, description,
/// default annual days.
pub const DEFAULT_CATEGORIES: [(&str, &str, &str, u32); 3] = [
    ("sick", "Sick leave", "Leave due to illness", 30),
    ("personal", "Personal leave", "Leave for personal business", 10),
    ("vacation", "Vacation leave", "Annual vacation", 10),
];

pub async fn list_active(pool: &MySqlPool) -> Result<Vec<LeaveTypeRecord>, LeaveError> {
    let types = sqlx::query_as::<_, LeaveTypeRecord>(
        r#"
        SELECT id, name, code, description, default_days, is_active, created_at
        FROM leave_types
        WHERE is_active = TRUE
        ORDER BY id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(types)
}

async fn code_exists(pool: &MySqlPool, code: &str) -> Result<bool, LeaveError> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM leave_types WHERE code = ? LIMIT 1)",
    )
    .bind(code)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

pub async fn create(
    pool: &MySqlPool,
    name: &str,
    code: &str,
    description: &str,
    default_days: u32,
) -> Result<u64, LeaveError> {
    if code_exists(pool, code).await? {
        return Err(LeaveError::DuplicateCategory(code.to_string()));
    }

    let result = sqlx::query(
        "INSERT INTO leave_types (name, code, description, default_days) VALUES (?, ?, ?, ?)",
    )
    .bind(name)
    .bind(code)
    .bind(description)
    .bind(default_days)
    .execute(pool)
    .await?;

    Ok(result.last_insert_id())
}

/// Current default entitlement per active category code. Used by the yearly
/// balance reset.
pub async fn default_days_by_code(pool: &MySqlPool) -> Result<HashMap<String, u32>, LeaveError> {
    // fallback values apply when the catalog was never seeded
    let mut defaults: HashMap<String, u32> = DEFAULT_CATEGORIES
        .iter()
        .map(|(code, _, _, days)| (code.to_string(), *days))
        .collect();

    for record in list_active(pool).await? {
        defaults.insert(record.code, record.default_days);
    }
    Ok(defaults)
}

/// Idempotently inserts the fixed categories; codes already present are
/// never overwritten.
pub async fn seed_defaults(pool: &MySqlPool) -> Result<Vec<LeaveTypeRecord>, LeaveError> {
    let mut inserted = 0;
    for (code, name, description, default_days) in DEFAULT_CATEGORIES {
        if code_exists(pool, code).await? {
            continue;
        }
        sqlx::query(
            "INSERT INTO leave_types (name, code, description, default_days) VALUES (?, ?, ?, ?)",
        )
        .bind(name)
        .bind(code)
        .bind(description)
        .bind(default_days)
        .execute(pool)
        .await?;
        inserted += 1;
    }

    info!(inserted, "Leave type seeding complete");
    list_active(pool).await
}
