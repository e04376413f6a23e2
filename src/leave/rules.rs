use crate::error::LeaveError;
use crate::model::leave_request::{LeaveStatus, LeaveType};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::{HashMap, HashSet};

pub const MAX_ATTACHMENTS: usize = 5;

pub const MIN_YEAR: i32 = 1970;
pub const MAX_YEAR: i32 = 9999;

/// Jan 1 and Dec 31 of a calendar year. Year-scoped queries take the year
/// straight from the request, so it is range-checked here before any date
/// construction; chrono itself only tops out near ±262143.
pub fn year_bounds(year: i32) -> Result<(NaiveDate, NaiveDate), LeaveError> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(LeaveError::InvalidYear(year));
    }
    let start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(LeaveError::InvalidYear(year))?;
    let end = NaiveDate::from_ymd_opt(year, 12, 31).ok_or(LeaveError::InvalidYear(year))?;
    Ok((start, end))
}

/// Inclusive day count of the range. `None` if the range is inverted.
pub fn total_days(start: NaiveDate, end: NaiveDate) -> Option<u32> {
    if end < start {
        return None;
    }
    Some((end - start).num_days() as u32 + 1)
}

/// Fiscal year runs Oct 1 - Sep 30: an October-December start belongs to the
/// next calendar year's fiscal year.
pub fn fiscal_year(start: NaiveDate) -> i32 {
    if start.month() >= 10 {
        start.year() + 1
    } else {
        start.year()
    }
}

/// Days in the range that are neither weekend nor an active holiday.
pub fn working_days(start: NaiveDate, end: NaiveDate, holidays: &HashSet<NaiveDate>) -> u32 {
    let mut day = start;
    let mut count = 0;
    while day <= end {
        let weekend = matches!(day.weekday(), Weekday::Sat | Weekday::Sun);
        if !weekend && !holidays.contains(&day) {
            count += 1;
        }
        day += Duration::days(1);
    }
    count
}

/// Input to create/update validation, already parsed from the request DTO.
#[derive(Debug, Clone)]
pub struct NewRequestInput {
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub child_birth_date: Option<NaiveDate>,
    pub ceremony_date: Option<NaiveDate>,
    pub attachment_count: usize,
}

/// Validates a submission and returns the priced day count. Checks run in a
/// fixed order so each failure mode is distinct: date range, required
/// type-specific fields, attachment cap. Balance sufficiency is checked
/// separately because it needs the balance map.
pub fn validate_new_request(input: &NewRequestInput) -> Result<u32, LeaveError> {
    let total = total_days(input.start_date, input.end_date).ok_or(LeaveError::InvalidDateRange)?;

    match input.leave_type {
        LeaveType::Paternity if input.child_birth_date.is_none() => {
            return Err(LeaveError::MissingRequiredField("child_birth_date"));
        }
        LeaveType::Ordination if input.ceremony_date.is_none() => {
            return Err(LeaveError::MissingRequiredField("ceremony_date"));
        }
        _ => {}
    }

    if input.attachment_count > MAX_ATTACHMENTS {
        return Err(LeaveError::TooManyAttachments(input.attachment_count));
    }

    Ok(total)
}

/// Balance sufficiency at submission time. Ordinary categories must be
/// covered by the remaining balance; military is unlimited; special types
/// absent from the balance map are not blocked here.
pub fn check_balance(
    leave_type: LeaveType,
    total: u32,
    balances: &HashMap<String, u32>,
) -> Result<(), LeaveError> {
    if leave_type.is_unlimited() || !leave_type.is_tracked() {
        return Ok(());
    }

    let category = leave_type.as_str();
    if let Some(remaining) = balances.get(category) {
        if total > *remaining {
            return Err(LeaveError::InsufficientBalance {
                category: category.to_string(),
                requested: total,
                remaining: *remaining,
            });
        }
    }
    Ok(())
}

/// Legal lifecycle moves. Pending is the only state anything leaves.
pub fn can_transition(from: LeaveStatus, to: LeaveStatus) -> bool {
    matches!(
        (from, to),
        (
            LeaveStatus::Pending,
            LeaveStatus::Approved | LeaveStatus::Rejected | LeaveStatus::Cancelled
        )
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn input(leave_type: LeaveType, start: NaiveDate, end: NaiveDate) -> NewRequestInput {
        NewRequestInput {
            leave_type,
            start_date: start,
            end_date: end,
            child_birth_date: None,
            ceremony_date: None,
            attachment_count: 0,
        }
    }

    #[test]
    fn total_days_is_inclusive() {
        assert_eq!(total_days(d(2024, 3, 1), d(2024, 3, 3)), Some(3));
        assert_eq!(total_days(d(2024, 3, 1), d(2024, 3, 1)), Some(1));
        assert_eq!(total_days(d(2024, 3, 3), d(2024, 3, 1)), None);
    }

    #[test]
    fn total_days_spans_month_and_year_boundaries() {
        assert_eq!(total_days(d(2024, 12, 30), d(2025, 1, 2)), Some(4));
        // leap day
        assert_eq!(total_days(d(2024, 2, 28), d(2024, 3, 1)), Some(3));
    }

    #[test]
    fn year_bounds_rejects_out_of_range_years() {
        assert!(matches!(
            year_bounds(300_000),
            Err(LeaveError::InvalidYear(300_000))
        ));
        assert!(matches!(year_bounds(-5), Err(LeaveError::InvalidYear(-5))));
        assert!(matches!(year_bounds(0), Err(LeaveError::InvalidYear(0))));
        assert!(matches!(
            year_bounds(10_000),
            Err(LeaveError::InvalidYear(10_000))
        ));

        assert_eq!(year_bounds(2026).unwrap(), (d(2026, 1, 1), d(2026, 12, 31)));
        assert!(year_bounds(MIN_YEAR).is_ok());
        assert!(year_bounds(MAX_YEAR).is_ok());
    }

    #[test]
    fn fiscal_year_rolls_over_in_october() {
        assert_eq!(fiscal_year(d(2024, 11, 15)), 2025);
        assert_eq!(fiscal_year(d(2024, 10, 1)), 2025);
        assert_eq!(fiscal_year(d(2024, 9, 30)), 2024);
        assert_eq!(fiscal_year(d(2024, 1, 5)), 2024);
    }

    #[test]
    fn working_days_skips_weekends_and_holidays() {
        // Mon 2024-03-04 .. Sun 2024-03-10: 5 weekdays
        let mut holidays = HashSet::new();
        assert_eq!(working_days(d(2024, 3, 4), d(2024, 3, 10), &holidays), 5);

        // a holiday on the Wednesday drops one more
        holidays.insert(d(2024, 3, 6));
        assert_eq!(working_days(d(2024, 3, 4), d(2024, 3, 10), &holidays), 4);

        // holiday on a Saturday changes nothing
        holidays.insert(d(2024, 3, 9));
        assert_eq!(working_days(d(2024, 3, 4), d(2024, 3, 10), &holidays), 4);
    }

    #[test]
    fn inverted_range_is_rejected_first() {
        let mut inp = input(LeaveType::Paternity, d(2024, 5, 10), d(2024, 5, 1));
        // even with the required field also missing, the date range wins
        inp.child_birth_date = None;
        assert!(matches!(
            validate_new_request(&inp),
            Err(LeaveError::InvalidDateRange)
        ));
    }

    #[test]
    fn paternity_requires_child_birth_date() {
        let inp = input(LeaveType::Paternity, d(2024, 5, 1), d(2024, 5, 3));
        assert!(matches!(
            validate_new_request(&inp),
            Err(LeaveError::MissingRequiredField("child_birth_date"))
        ));

        let mut ok = inp.clone();
        ok.child_birth_date = Some(d(2024, 4, 28));
        assert_eq!(validate_new_request(&ok).unwrap(), 3);
    }

    #[test]
    fn ordination_requires_ceremony_date() {
        let inp = input(LeaveType::Ordination, d(2024, 6, 1), d(2024, 6, 30));
        assert!(matches!(
            validate_new_request(&inp),
            Err(LeaveError::MissingRequiredField("ceremony_date"))
        ));
    }

    #[test]
    fn attachment_cap_is_five() {
        let mut inp = input(LeaveType::Sick, d(2024, 5, 1), d(2024, 5, 2));
        inp.attachment_count = 5;
        assert!(validate_new_request(&inp).is_ok());
        inp.attachment_count = 6;
        assert!(matches!(
            validate_new_request(&inp),
            Err(LeaveError::TooManyAttachments(6))
        ));
    }

    #[test]
    fn balance_check_blocks_ordinary_categories() {
        let balances = HashMap::from([("sick".to_string(), 4u32)]);
        assert!(check_balance(LeaveType::Sick, 4, &balances).is_ok());
        let err = check_balance(LeaveType::Sick, 5, &balances).unwrap_err();
        assert!(matches!(
            err,
            LeaveError::InsufficientBalance {
                requested: 5,
                remaining: 4,
                ..
            }
        ));
    }

    #[test]
    fn military_and_untracked_types_never_block() {
        let balances = HashMap::from([("military".to_string(), 0u32)]);
        assert!(check_balance(LeaveType::Military, 400, &balances).is_ok());
        // maternity is not in the map at all
        assert!(check_balance(LeaveType::Maternity, 90, &HashMap::new()).is_ok());
    }

    #[test]
    fn only_pending_transitions() {
        for to in [
            LeaveStatus::Approved,
            LeaveStatus::Rejected,
            LeaveStatus::Cancelled,
        ] {
            assert!(can_transition(LeaveStatus::Pending, to));
        }
        for from in [
            LeaveStatus::Approved,
            LeaveStatus::Rejected,
            LeaveStatus::Cancelled,
        ] {
            for to in [
                LeaveStatus::Pending,
                LeaveStatus::Approved,
                LeaveStatus::Rejected,
                LeaveStatus::Cancelled,
            ] {
                assert!(!can_transition(from, to));
            }
        }
    }
}
