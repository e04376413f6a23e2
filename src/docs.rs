use crate::api::files::UploadQuery;
use crate::api::holiday::{CreateHoliday, HolidayQuery};
use crate::api::leave_request::{
    CreateLeave, DecisionReq, LeaveFilter, LeaveListResponse, UpdateLeave,
};
use crate::api::leave_type::CreateLeaveType;
use crate::api::report::ReportQuery;
use crate::api::user::SetBalanceReq;
use crate::model::holiday::Holiday;
use crate::model::leave_request::{LeaveStatus, LeaveType};
use crate::model::leave_type::LeaveTypeRecord;
use crate::model::user::{LeaveBalanceRow, User};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Management API",
        version = "1.0.0",
        description = r#"
## Leave-Request Management System

This API manages the entire leave lifecycle of an organization.

### Key Features
- **Leave Requests**
  - Submit, edit and cancel leave requests; supervisors approve or reject
- **Leave Balances**
  - Per-category remaining days, debited on approval, reset yearly
- **Leave Catalog & Holidays**
  - Entitlement-carrying categories and the national holiday calendar
- **Reports**
  - Yearly statistics by type, department, month and status

### Security
Endpoints are protected using **JWT Bearer authentication**.
Approval endpoints require the **supervisor** capability; administration
requires **admin**.

### Response Format
- JSON-based RESTful responses
- Pagination supported for the admin leave listing
"#,
    ),
    paths(
        crate::api::leave_request::create_leave,
        crate::api::leave_request::update_leave,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::my_leaves,
        crate::api::leave_request::pending_leaves,
        crate::api::leave_request::team_leaves,
        crate::api::leave_request::leave_list,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,
        crate::api::leave_request::cancel_leave,

        crate::api::leave_type::list_leave_types,
        crate::api::leave_type::create_leave_type,
        crate::api::leave_type::update_leave_type,
        crate::api::leave_type::init_leave_types,

        crate::api::holiday::list_holidays,
        crate::api::holiday::create_holiday,
        crate::api::holiday::update_holiday,
        crate::api::holiday::delete_holiday,
        crate::api::holiday::init_holidays,

        crate::api::user::list_users,
        crate::api::user::get_user,
        crate::api::user::update_user,
        crate::api::user::delete_user,
        crate::api::user::list_supervisors,
        crate::api::user::set_balance,

        crate::api::report::statistics,
        crate::api::report::all_requests,
        crate::api::report::reset_yearly,

        crate::api::files::upload_file
    ),
    components(
        schemas(
            LeaveType,
            LeaveStatus,
            CreateLeave,
            UpdateLeave,
            DecisionReq,
            LeaveFilter,
            LeaveListResponse,
            CreateLeaveType,
            LeaveTypeRecord,
            CreateHoliday,
            HolidayQuery,
            Holiday,
            User,
            LeaveBalanceRow,
            SetBalanceReq,
            ReportQuery,
            UploadQuery
        )
    ),
    tags(
        (name = "Leave", description = "Leave request lifecycle APIs"),
        (name = "LeaveType", description = "Leave catalog APIs"),
        (name = "Holiday", description = "Holiday calendar APIs"),
        (name = "User", description = "Employee administration APIs"),
        (name = "Report", description = "Reporting and yearly reset APIs"),
        (name = "Files", description = "Attachment upload APIs"),
    )
)]
pub struct ApiDoc;
