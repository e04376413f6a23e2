use crate::error::LeaveError;
use crate::leave::rules;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use sqlx::MySqlPool;
use std::collections::HashMap;
use utoipa::ToSchema;

/// Department bucket for requests whose employee record is gone.
pub const UNSPECIFIED_DEPARTMENT: &str = "unspecified";

/// One request joined with its (possibly missing) employee, as fetched for a
/// year slice.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReportRow {
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub total_days: u32,
    pub status: String,
    pub department: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeaveStatistics {
    pub year: i32,
    pub total_requests: u64,
    pub total_days: u64,
    pub total_employees: u64,
    pub by_type: HashMap<String, u64>,
    pub by_department: HashMap<String, u64>,
    /// Day sums keyed on start-date month, index 0 = January.
    pub by_month: [u64; 12],
    pub by_status: HashMap<String, u64>,
}

/// Pure rollup over one year's requests. Recomputed per call, no caching.
pub fn aggregate(year: i32, rows: &[ReportRow], total_employees: u64) -> LeaveStatistics {
    let mut by_type: HashMap<String, u64> = HashMap::new();
    let mut by_department: HashMap<String, u64> = HashMap::new();
    let mut by_month = [0u64; 12];
    let mut by_status: HashMap<String, u64> = HashMap::new();
    let mut total_days = 0u64;

    for row in rows {
        let days = row.total_days as u64;
        total_days += days;

        *by_type.entry(row.leave_type.clone()).or_default() += days;

        let dept = row
            .department
            .clone()
            .unwrap_or_else(|| UNSPECIFIED_DEPARTMENT.to_string());
        *by_department.entry(dept).or_default() += days;

        by_month[row.start_date.month0() as usize] += days;

        *by_status.entry(row.status.clone()).or_default() += 1;
    }

    LeaveStatistics {
        year,
        total_requests: rows.len() as u64,
        total_days,
        total_employees,
        by_type,
        by_department,
        by_month,
        by_status,
    }
}

/// Requests whose start date falls inside the calendar year, joined with the
/// employee's department. A missing employee keeps the request in the set.
pub async fn fetch_year_rows(pool: &MySqlPool, year: i32) -> Result<Vec<ReportRow>, LeaveError> {
    let (start, end) = rules::year_bounds(year)?;

    let rows = sqlx::query_as::<_, ReportRow>(
        r#"
        SELECT lr.leave_type, lr.start_date, lr.total_days, lr.status, u.department
        FROM leave_requests lr
        LEFT JOIN users u ON u.id = lr.user_id
        WHERE lr.start_date BETWEEN ? AND ?
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn count_active_employees(pool: &MySqlPool) -> Result<u64, LeaveError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE is_active = TRUE")
        .fetch_one(pool)
        .await?;
    Ok(count as u64)
}

pub async fn statistics(pool: &MySqlPool, year: i32) -> Result<LeaveStatistics, LeaveError> {
    let rows = fetch_year_rows(pool, year).await?;
    let employees = count_active_employees(pool).await?;
    Ok(aggregate(year, &rows, employees))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(leave_type: &str, start: (u32, u32), days: u32, status: &str, dept: Option<&str>) -> ReportRow {
        ReportRow {
            leave_type: leave_type.to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, start.0, start.1).unwrap(),
            total_days: days,
            status: status.to_string(),
            department: dept.map(str::to_string),
        }
    }

    #[test]
    fn empty_year_aggregates_to_zeroes() {
        let stats = aggregate(2024, &[], 7);
        assert_eq!(stats.total_requests, 0);
        assert_eq!(stats.total_days, 0);
        assert_eq!(stats.total_employees, 7);
        assert_eq!(stats.by_month, [0; 12]);
        assert!(stats.by_type.is_empty());
    }

    #[test]
    fn sums_by_type_department_month_status() {
        let rows = vec![
            row("sick", (1, 10), 3, "approved", Some("Engineering")),
            row("sick", (1, 20), 2, "rejected", Some("Engineering")),
            row("vacation", (6, 1), 5, "approved", Some("Sales")),
            row("personal", (12, 24), 1, "pending", Some("Sales")),
        ];
        let stats = aggregate(2024, &rows, 3);

        assert_eq!(stats.total_requests, 4);
        assert_eq!(stats.total_days, 11);
        assert_eq!(stats.by_type["sick"], 5);
        assert_eq!(stats.by_type["vacation"], 5);
        assert_eq!(stats.by_department["Engineering"], 5);
        assert_eq!(stats.by_department["Sales"], 6);
        assert_eq!(stats.by_month[0], 5);
        assert_eq!(stats.by_month[5], 5);
        assert_eq!(stats.by_month[11], 1);
        assert_eq!(stats.by_status["approved"], 2);
        assert_eq!(stats.by_status["pending"], 1);
    }

    #[test]
    fn missing_employee_lands_in_unspecified_bucket() {
        let rows = vec![row("sick", (2, 1), 4, "approved", None)];
        let stats = aggregate(2024, &rows, 1);
        assert_eq!(stats.by_department[UNSPECIFIED_DEPARTMENT], 4);
    }

    #[test]
    fn month_buckets_sum_to_total_days() {
        let rows = vec![
            row("sick", (1, 1), 2, "approved", Some("A")),
            row("personal", (3, 15), 7, "approved", Some("B")),
            row("vacation", (10, 2), 4, "cancelled", None),
            row("military", (12, 31), 9, "pending", Some("A")),
        ];
        let stats = aggregate(2024, &rows, 2);
        let month_sum: u64 = stats.by_month.iter().sum();
        assert_eq!(month_sum, stats.total_days);
    }
}
