use crate::error::LeaveError;
use crate::leave::rules;
use crate::model::holiday::Holiday;
use chrono::NaiveDate;
use sqlx::MySqlPool;
use std::collections::HashSet;
use tracing::info;

/// One entry of the fixed yearly seed list.
#[derive(Debug, Clone, PartialEq)]
pub struct HolidaySeed {
    pub name: &'static str,
    pub date: NaiveDate,
    pub description: &'static str,
}

/// Thai national holidays for a given year.
fn default_holidays(year: i32) -> Vec<HolidaySeed> {
    let d = |m: u32, day: u32| NaiveDate::from_ymd_opt(year, m, day).unwrap();
    vec![
        HolidaySeed { name: "วันขึ้นปีใหม่", date: d(1, 1), description: "New Year's Day" },
        HolidaySeed { name: "วันมาฆบูชา", date: d(2, 24), description: "Makha Bucha Day" },
        HolidaySeed { name: "วันจักรี", date: d(4, 6), description: "Chakri Memorial Day" },
        HolidaySeed { name: "วันสงกรานต์", date: d(4, 13), description: "Songkran Festival" },
        HolidaySeed { name: "วันสงกรานต์", date: d(4, 14), description: "Songkran Festival" },
        HolidaySeed { name: "วันสงกรานต์", date: d(4, 15), description: "Songkran Festival" },
        HolidaySeed { name: "วันแรงงานแห่งชาติ", date: d(5, 1), description: "National Labour Day" },
        HolidaySeed { name: "วันฉัตรมงคล", date: d(5, 4), description: "Coronation Day" },
        HolidaySeed { name: "วันวิสาขบูชา", date: d(5, 22), description: "Visakha Bucha Day" },
        HolidaySeed { name: "วันเฉลิมพระชนมพรรษา ร.10", date: d(7, 28), description: "H.M. King's Birthday" },
        HolidaySeed { name: "วันเฉลิมพระชนมพรรษา พระราชินี", date: d(8, 12), description: "H.M. Queen's Birthday" },
        HolidaySeed { name: "วันคล้ายวันสวรรคต ร.9", date: d(10, 13), description: "King Bhumibol Memorial Day" },
        HolidaySeed { name: "วันปิยมหาราช", date: d(10, 23), description: "Chulalongkorn Day" },
        HolidaySeed { name: "วันคล้ายวันพระบรมราชสมภพ ร.9", date: d(12, 5), description: "King Bhumibol's Birthday" },
        HolidaySeed { name: "วันรัฐธรรมนูญ", date: d(12, 10), description: "Constitution Day" },
        HolidaySeed { name: "วันสิ้นปี", date: d(12, 31), description: "New Year's Eve" },
    ]
}

/// Seed entries whose calendar day is not already covered by an active
/// holiday. Pure selection so idempotence is testable without a database.
/// The year is range-checked before the fixed list is built.
pub fn missing_defaults(
    year: i32,
    existing: &HashSet<NaiveDate>,
) -> Result<Vec<HolidaySeed>, LeaveError> {
    rules::year_bounds(year)?;
    Ok(default_holidays(year)
        .into_iter()
        .filter(|h| !existing.contains(&h.date))
        .collect())
}

/// Active holidays of the calendar year, ascending by date.
pub async fn list_for_year(pool: &MySqlPool, year: i32) -> Result<Vec<Holiday>, LeaveError> {
    let (start, end) = rules::year_bounds(year)?;

    let holidays = sqlx::query_as::<_, Holiday>(
        r#"
        SELECT id, name, date, description, is_active, created_at
        FROM holidays
        WHERE is_active = TRUE AND date BETWEEN ? AND ?
        ORDER BY date ASC
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    Ok(holidays)
}

pub async fn is_holiday(pool: &MySqlPool, date: NaiveDate) -> Result<bool, LeaveError> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM holidays WHERE date = ? AND is_active = TRUE LIMIT 1)",
    )
    .bind(date)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

/// Active holiday dates inside the range, for working-day pricing.
pub async fn holiday_dates_in_range(
    pool: &MySqlPool,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<HashSet<NaiveDate>, LeaveError> {
    let dates = sqlx::query_scalar::<_, NaiveDate>(
        "SELECT date FROM holidays WHERE is_active = TRUE AND date BETWEEN ? AND ?",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;
    Ok(dates.into_iter().collect())
}

/// At most one active holiday per calendar day.
pub async fn create(
    pool: &MySqlPool,
    name: &str,
    date: NaiveDate,
    description: &str,
) -> Result<u64, LeaveError> {
    if is_holiday(pool, date).await? {
        return Err(LeaveError::DuplicateHoliday(date));
    }

    let result = sqlx::query("INSERT INTO holidays (name, date, description) VALUES (?, ?, ?)")
        .bind(name)
        .bind(date)
        .bind(description)
        .execute(pool)
        .await?;

    Ok(result.last_insert_id())
}

pub async fn delete(pool: &MySqlPool, id: u64) -> Result<(), LeaveError> {
    let result = sqlx::query("DELETE FROM holidays WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(LeaveError::NotFound("holiday"));
    }
    Ok(())
}

/// Inserts the fixed yearly list, skipping days that already carry an active
/// holiday. Safe to call repeatedly.
pub async fn seed_defaults(pool: &MySqlPool, year: i32) -> Result<Vec<Holiday>, LeaveError> {
    let (start, end) = rules::year_bounds(year)?;
    let existing = holiday_dates_in_range(pool, start, end).await?;

    let to_insert = missing_defaults(year, &existing)?;
    let inserted = to_insert.len();

    for seed in to_insert {
        sqlx::query("INSERT INTO holidays (name, date, description) VALUES (?, ?, ?)")
            .bind(seed.name)
            .bind(seed.date)
            .bind(seed.description)
            .execute(pool)
            .await?;
    }

    info!(year, inserted, "Holiday seeding complete");
    list_for_year(pool, year).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_list_covers_the_fixed_days() {
        let list = default_holidays(2026);
        assert_eq!(list.len(), 16);
        // three days of Songkran
        let songkran = list.iter().filter(|h| h.description == "Songkran Festival").count();
        assert_eq!(songkran, 3);
    }

    #[test]
    fn missing_defaults_skips_existing_days() {
        let all = missing_defaults(2026, &HashSet::new()).unwrap();
        assert_eq!(all.len(), 16);

        // seeding over the full list again selects nothing
        let existing: HashSet<_> = all.iter().map(|h| h.date).collect();
        assert!(missing_defaults(2026, &existing).unwrap().is_empty());

        // a single pre-existing day is skipped, the rest still selected
        let one = HashSet::from([NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()]);
        let rest = missing_defaults(2026, &one).unwrap();
        assert_eq!(rest.len(), 15);
        assert!(rest.iter().all(|h| h.date != NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()));
    }

    #[test]
    fn out_of_range_year_is_rejected_not_panicked() {
        assert!(matches!(
            missing_defaults(300_000, &HashSet::new()),
            Err(LeaveError::InvalidYear(300_000))
        ));
        assert!(matches!(
            missing_defaults(-1, &HashSet::new()),
            Err(LeaveError::InvalidYear(-1))
        ));
    }
}
