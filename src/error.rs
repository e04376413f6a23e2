use crate::model::leave_request::LeaveStatus;
use actix_web::{HttpResponse, http::StatusCode};
use chrono::NaiveDate;
use serde_json::json;

/// Error taxonomy for the leave lifecycle core. Every variant is scoped to a
/// single request/transition; none is fatal to the process.
#[derive(thiserror::Error, Debug)]
pub enum LeaveError {
    #[error("end_date must be on or after start_date")]
    InvalidDateRange,

    #[error("year {0} out of range (1970-9999)")]
    InvalidYear(i32),

    #[error("missing required field: {0}")]
    MissingRequiredField(&'static str),

    #[error("too many attachments: {0} (max 5)")]
    TooManyAttachments(usize),

    #[error("insufficient {category} balance: requested {requested}, remaining {remaining}")]
    InsufficientBalance {
        category: String,
        requested: u32,
        remaining: u32,
    },

    #[error("request is already {0}, only pending requests can transition")]
    InvalidTransition(LeaveStatus),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("leave category '{0}' already exists")]
    DuplicateCategory(String),

    #[error("an active holiday already exists on {0}")]
    DuplicateHoliday(NaiveDate),

    #[error("category '{0}' is not tracked in the balance map")]
    CategoryNotTracked(String),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("database error")]
    Database(#[from] sqlx::Error),
}

impl actix_web::ResponseError for LeaveError {
    fn status_code(&self) -> StatusCode {
        match self {
            LeaveError::InvalidDateRange
            | LeaveError::InvalidYear(_)
            | LeaveError::MissingRequiredField(_)
            | LeaveError::TooManyAttachments(_)
            | LeaveError::InsufficientBalance { .. }
            | LeaveError::DuplicateCategory(_)
            | LeaveError::DuplicateHoliday(_)
            | LeaveError::CategoryNotTracked(_) => StatusCode::BAD_REQUEST,
            LeaveError::InvalidTransition(_) => StatusCode::CONFLICT,
            LeaveError::NotFound(_) => StatusCode::NOT_FOUND,
            LeaveError::Forbidden(_) => StatusCode::FORBIDDEN,
            LeaveError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let LeaveError::Database(e) = self {
            tracing::error!(error = %e, "Database error");
            // never leak driver details to the caller
            return HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            }));
        }

        HttpResponse::build(self.status_code()).json(json!({
            "message": self.to_string()
        }))
    }
}
