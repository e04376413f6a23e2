use crate::error::LeaveError;
use crate::leave::catalog;
use crate::model::user::LeaveBalanceRow;
use sqlx::{MySql, MySqlPool};
use std::collections::HashMap;
use tracing::info;

/// Remaining days per category for one employee.
pub async fn balance_map(pool: &MySqlPool, user_id: u64) -> Result<HashMap<String, u32>, LeaveError> {
    let rows = sqlx::query_as::<_, LeaveBalanceRow>(
        "SELECT user_id, category, days FROM leave_balances WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| (r.category, r.days)).collect())
}

/// Debit a tracked category. Clamps at zero so the stored balance never goes
/// negative. `CategoryNotTracked` when the employee has no row for the
/// category. Generic over the executor so the lifecycle engine can debit
/// inside the same transaction that flips the request to approved.
pub async fn debit<'e, E>(
    executor: E,
    user_id: u64,
    category: &str,
    days: u32,
) -> Result<(), LeaveError>
where
    E: sqlx::Executor<'e, Database = MySql>,
{
    let result = sqlx::query(
        r#"
        UPDATE leave_balances
        SET days = GREATEST(CAST(days AS SIGNED) - ?, 0)
        WHERE user_id = ? AND category = ?
        "#,
    )
    .bind(days)
    .bind(user_id)
    .bind(category.to_string())
    .execute(executor)
    .await?;

    if result.rows_affected() == 0 {
        return Err(LeaveError::CategoryNotTracked(category.to_string()));
    }
    Ok(())
}

/// Yearly reset: every active employee's tracked categories go back to the
/// catalog's current defaults. Returns the number of employees updated.
pub async fn reset_all(pool: &MySqlPool) -> Result<u64, LeaveError> {
    let defaults = catalog::default_days_by_code(pool).await?;

    let user_ids = sqlx::query_scalar::<_, u64>("SELECT id FROM users WHERE is_active = TRUE")
        .fetch_all(pool)
        .await?;

    for user_id in &user_ids {
        for (category, days) in &defaults {
            sqlx::query(
                r#"
                INSERT INTO leave_balances (user_id, category, days)
                VALUES (?, ?, ?)
                ON DUPLICATE KEY UPDATE days = VALUES(days)
                "#,
            )
            .bind(user_id)
            .bind(category)
            .bind(days)
            .execute(pool)
            .await?;
        }
    }

    let updated = user_ids.len() as u64;
    info!(updated, "Yearly leave balance reset complete");
    Ok(updated)
}

/// Admin direct edit. Values are unsigned at the API boundary, so
/// non-negativity is the only constraint enforced; outstanding pending
/// requests are not re-validated.
pub async fn direct_set(
    pool: &MySqlPool,
    user_id: u64,
    balances: &HashMap<String, u32>,
) -> Result<(), LeaveError> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM users WHERE id = ? LIMIT 1)",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    if !exists {
        return Err(LeaveError::NotFound("user"));
    }

    for (category, days) in balances {
        sqlx::query(
            r#"
            INSERT INTO leave_balances (user_id, category, days)
            VALUES (?, ?, ?)
            ON DUPLICATE KEY UPDATE days = VALUES(days)
            "#,
        )
        .bind(user_id)
        .bind(category)
        .bind(days)
        .execute(pool)
        .await?;
    }
    Ok(())
}

/// Seed a fresh employee's balance rows from the catalog defaults.
pub async fn seed_for_user(pool: &MySqlPool, user_id: u64) -> Result<(), LeaveError> {
    let defaults = catalog::default_days_by_code(pool).await?;
    for (category, days) in &defaults {
        sqlx::query(
            r#"
            INSERT INTO leave_balances (user_id, category, days)
            VALUES (?, ?, ?)
            ON DUPLICATE KEY UPDATE days = days
            "#,
        )
        .bind(user_id)
        .bind(category)
        .bind(days)
        .execute(pool)
        .await?;
    }
    Ok(())
}
