pub mod files;
pub mod holiday;
pub mod leave_request;
pub mod leave_type;
pub mod report;
pub mod user;
