use crate::error::LeaveError;
use crate::leave::{balance, calendar, rules};
use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveType};
use sqlx::MySqlPool;
use tracing::{info, warn};

const REQUEST_COLUMNS: &str = r#"
    id, user_id, leave_type, start_date, end_date, total_days, working_days,
    reason, has_medical_certificate, is_long_term_sick, child_birth_date,
    ceremony_date, is_paid_leave, fiscal_year, status, approved_by,
    approval_date, approval_note, created_at
"#;

/// A validated submission ready to persist.
#[derive(Debug, Clone)]
pub struct Submission {
    pub user_id: u64,
    pub input: rules::NewRequestInput,
    pub reason: String,
    pub has_medical_certificate: bool,
    pub is_long_term_sick: bool,
    pub is_paid_leave: bool,
    pub attachments: Vec<String>,
}

pub async fn fetch_request(pool: &MySqlPool, id: u64) -> Result<LeaveRequest, LeaveError> {
    let sql = format!("SELECT {REQUEST_COLUMNS} FROM leave_requests WHERE id = ?");
    sqlx::query_as::<_, LeaveRequest>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(LeaveError::NotFound("leave request"))
}

fn parse_status(raw: &str) -> LeaveStatus {
    // the column is constrained to the four lifecycle states
    raw.parse().unwrap_or(LeaveStatus::Pending)
}

fn parse_type(raw: &str) -> Option<LeaveType> {
    raw.parse().ok()
}

/// Submit a new leave request. Runs the validation chain, prices the range,
/// checks balance sufficiency for tracked categories and persists a
/// `pending` request. The balance itself is untouched until approval.
pub async fn create(pool: &MySqlPool, submission: Submission) -> Result<LeaveRequest, LeaveError> {
    let input = &submission.input;
    let total = rules::validate_new_request(input)?;

    let balances = balance::balance_map(pool, submission.user_id).await?;
    rules::check_balance(input.leave_type, total, &balances)?;

    let holidays =
        calendar::holiday_dates_in_range(pool, input.start_date, input.end_date).await?;
    let working = rules::working_days(input.start_date, input.end_date, &holidays);
    let fiscal = rules::fiscal_year(input.start_date);

    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        INSERT INTO leave_requests
            (user_id, leave_type, start_date, end_date, total_days, working_days,
             reason, has_medical_certificate, is_long_term_sick, child_birth_date,
             ceremony_date, is_paid_leave, fiscal_year, status)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'pending')
        "#,
    )
    .bind(submission.user_id)
    .bind(input.leave_type.as_str())
    .bind(input.start_date)
    .bind(input.end_date)
    .bind(total)
    .bind(working)
    .bind(&submission.reason)
    .bind(submission.has_medical_certificate)
    .bind(submission.is_long_term_sick)
    .bind(input.child_birth_date)
    .bind(input.ceremony_date)
    .bind(submission.is_paid_leave)
    .bind(fiscal)
    .execute(&mut *tx)
    .await?;

    let request_id = result.last_insert_id();

    for (position, file_ref) in submission.attachments.iter().enumerate() {
        sqlx::query(
            "INSERT INTO leave_attachments (leave_request_id, file_ref, position) VALUES (?, ?, ?)",
        )
        .bind(request_id)
        .bind(file_ref)
        .bind(position as u8)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    info!(
        request_id,
        user_id = submission.user_id,
        leave_type = input.leave_type.as_str(),
        total_days = total,
        "Leave request submitted"
    );

    fetch_request(pool, request_id).await
}

/// Approve a pending request and debit the balance in one transaction.
/// The conditional UPDATE on `status = 'pending'` is the compare-and-swap:
/// of two concurrent decisions exactly one sees a row flip.
pub async fn approve(
    pool: &MySqlPool,
    request_id: u64,
    approver_id: u64,
    note: Option<&str>,
) -> Result<LeaveRequest, LeaveError> {
    let mut tx = pool.begin().await?;

    let sql = format!("SELECT {REQUEST_COLUMNS} FROM leave_requests WHERE id = ? FOR UPDATE");
    let request = sqlx::query_as::<_, LeaveRequest>(&sql)
        .bind(request_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(LeaveError::NotFound("leave request"))?;

    let status = parse_status(&request.status);
    if !rules::can_transition(status, LeaveStatus::Approved) {
        return Err(LeaveError::InvalidTransition(status));
    }

    let result = sqlx::query(
        r#"
        UPDATE leave_requests
        SET status = 'approved', approved_by = ?, approval_date = NOW(), approval_note = ?
        WHERE id = ? AND status = 'pending'
        "#,
    )
    .bind(approver_id)
    .bind(note)
    .bind(request_id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        // lost the race to a concurrent decision
        return Err(LeaveError::InvalidTransition(status));
    }

    // Debit only categories present in the balance map; special types that
    // are not tracked pass through without touching the store.
    if let Some(leave_type) = parse_type(&request.leave_type) {
        if leave_type.is_tracked() {
            match balance::debit(&mut *tx, request.user_id, leave_type.as_str(), request.total_days)
                .await
            {
                Ok(()) => {}
                Err(LeaveError::CategoryNotTracked(category)) => {
                    // employee predates the category; nothing to debit
                    warn!(request_id, category, "No balance row to debit");
                }
                Err(err) => return Err(err),
            }
        }
    }

    tx.commit().await?;

    info!(request_id, approver_id, "Leave request approved");
    fetch_request(pool, request_id).await
}

/// Reject a pending request. No balance effect: nothing was reserved.
pub async fn reject(
    pool: &MySqlPool,
    request_id: u64,
    approver_id: u64,
    note: Option<&str>,
) -> Result<LeaveRequest, LeaveError> {
    decide_without_debit(pool, request_id, approver_id, note, LeaveStatus::Rejected).await
}

async fn decide_without_debit(
    pool: &MySqlPool,
    request_id: u64,
    approver_id: u64,
    note: Option<&str>,
    to: LeaveStatus,
) -> Result<LeaveRequest, LeaveError> {
    let current = fetch_request(pool, request_id).await?;
    let status = parse_status(&current.status);
    if !rules::can_transition(status, to) {
        return Err(LeaveError::InvalidTransition(status));
    }

    let result = sqlx::query(
        r#"
        UPDATE leave_requests
        SET status = ?, approved_by = ?, approval_date = NOW(), approval_note = ?
        WHERE id = ? AND status = 'pending'
        "#,
    )
    .bind(to.as_str())
    .bind(approver_id)
    .bind(note)
    .bind(request_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(LeaveError::InvalidTransition(status));
    }

    info!(request_id, approver_id, status = to.as_str(), "Leave request decided");
    fetch_request(pool, request_id).await
}

/// Cancel an own pending request.
pub async fn cancel(pool: &MySqlPool, request_id: u64, owner_id: u64) -> Result<LeaveRequest, LeaveError> {
    let current = fetch_request(pool, request_id).await?;
    if current.user_id != owner_id {
        return Err(LeaveError::Forbidden("Only the requesting employee may cancel"));
    }

    let status = parse_status(&current.status);
    if !rules::can_transition(status, LeaveStatus::Cancelled) {
        return Err(LeaveError::InvalidTransition(status));
    }

    let result = sqlx::query(
        "UPDATE leave_requests SET status = 'cancelled' WHERE id = ? AND status = 'pending'",
    )
    .bind(request_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(LeaveError::InvalidTransition(status));
    }

    info!(request_id, owner_id, "Leave request cancelled");
    fetch_request(pool, request_id).await
}

/// Edit an own pending request: replaces type/dates/reason, reprices the
/// range and fiscal year. Balance sufficiency is checked at submission only,
/// not re-run here.
pub async fn update(
    pool: &MySqlPool,
    request_id: u64,
    owner_id: u64,
    input: rules::NewRequestInput,
    reason: String,
) -> Result<LeaveRequest, LeaveError> {
    let current = fetch_request(pool, request_id).await?;
    if current.user_id != owner_id {
        return Err(LeaveError::Forbidden("Only the requesting employee may edit"));
    }

    let status = parse_status(&current.status);
    if status != LeaveStatus::Pending {
        return Err(LeaveError::InvalidTransition(status));
    }

    let total = rules::validate_new_request(&input)?;
    let holidays = calendar::holiday_dates_in_range(pool, input.start_date, input.end_date).await?;
    let working = rules::working_days(input.start_date, input.end_date, &holidays);
    let fiscal = rules::fiscal_year(input.start_date);

    let result = sqlx::query(
        r#"
        UPDATE leave_requests
        SET leave_type = ?, start_date = ?, end_date = ?, total_days = ?,
            working_days = ?, reason = ?, child_birth_date = ?, ceremony_date = ?,
            fiscal_year = ?
        WHERE id = ? AND status = 'pending'
        "#,
    )
    .bind(input.leave_type.as_str())
    .bind(input.start_date)
    .bind(input.end_date)
    .bind(total)
    .bind(working)
    .bind(&reason)
    .bind(input.child_birth_date)
    .bind(input.ceremony_date)
    .bind(fiscal)
    .bind(request_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(LeaveError::InvalidTransition(status));
    }

    info!(request_id, owner_id, "Leave request updated");
    fetch_request(pool, request_id).await
}

/// Stored attachment references in insertion order.
pub async fn attachments(pool: &MySqlPool, request_id: u64) -> Result<Vec<String>, LeaveError> {
    let refs = sqlx::query_scalar::<_, String>(
        "SELECT file_ref FROM leave_attachments WHERE leave_request_id = ? ORDER BY position ASC",
    )
    .bind(request_id)
    .fetch_all(pool)
    .await?;
    Ok(refs)
}
