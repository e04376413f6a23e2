use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// Closed set of leave types. The first three are tracked in the balance
/// store; the rest are special types with their own rules.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveType {
    Sick,
    Personal,
    Vacation,
    Maternity,
    Paternity,
    Childcare,
    Ordination,
    Military,
}

impl LeaveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveType::Sick => "sick",
            LeaveType::Personal => "personal",
            LeaveType::Vacation => "vacation",
            LeaveType::Maternity => "maternity",
            LeaveType::Paternity => "paternity",
            LeaveType::Childcare => "childcare",
            LeaveType::Ordination => "ordination",
            LeaveType::Military => "military",
        }
    }

    /// Categories with a per-year entitlement in the balance store.
    pub fn is_tracked(&self) -> bool {
        matches!(
            self,
            LeaveType::Sick | LeaveType::Personal | LeaveType::Vacation
        )
    }

    /// Military leave is never limited by balance.
    pub fn is_unlimited(&self) -> bool {
        matches!(self, LeaveType::Military)
    }
}

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl LeaveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "pending",
            LeaveStatus::Approved => "approved",
            LeaveStatus::Rejected => "rejected",
            LeaveStatus::Cancelled => "cancelled",
        }
    }

    /// Pending is the only non-absorbing state.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LeaveStatus::Pending)
    }
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct LeaveRequest {
    pub id: u64,
    pub user_id: u64,
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_days: u32,
    pub working_days: u32,
    pub reason: String,
    pub has_medical_certificate: bool,
    pub is_long_term_sick: bool,
    pub child_birth_date: Option<NaiveDate>,
    pub ceremony_date: Option<NaiveDate>,
    pub is_paid_leave: bool,
    pub fiscal_year: i32,
    pub status: String,
    pub approved_by: Option<u64>,
    pub approval_date: Option<DateTime<Utc>>,
    pub approval_note: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}
