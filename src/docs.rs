use crate::api::attendance::{
    AttendanceListResponse, AttendanceQuery, ImportPayload, ImportResponse, OverrideAttendance,
    ProcessPayload, ProcessResponse,
};
use crate::api::cash_advance::{CashAdvanceListResponse, CashAdvanceQuery, CreateCashAdvance};
use crate::api::employee::{CreateEmployee, EmployeeListResponse, EmployeeQuery, UpdateEmployee};
use crate::api::payroll::{
    DraftDetailResponse, DraftListResponse, DraftQuery, PayslipListResponse, PayslipQuery,
    PublishDraft,
};
use crate::api::request::{CreateRequest, RequestFilter, RequestListResponse};
use crate::model::attendance::{AttendanceRecord, CutoffWindow, DayRecord};
use crate::model::cash_advance::CashAdvance;
use crate::model::category::EmployeeCategory;
use crate::model::employee::{Employee, FreelanceItem, ObRate};
use crate::model::payroll::{
    DraftStatus, LineLeave, LineOb, LineOt, PayrollDraft, PayrollDraftLine, TimePair,
};
use crate::model::payslip::{PayLine, Payslip, PayslipStatus};
use crate::model::request::{AdjustmentRequest, RequestKind, RequestStatus};
use crate::reconcile::parser::SkippedRow;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Payroll HQ API",
        version = "1.0.0",
        description = r#"
## Payroll & HR Administration Service

This API computes payroll from biometric time-clock exports and approved
adjustment requests.

### Key Features
- **Attendance Reconciliation**
  - Import raw time-clock exports, confirm a semi-monthly cutoff, and get
    shift-clipped worked hours/days with explicit skipped-row reporting
- **Adjustment Requests**
  - File and approve overtime, official-business, leave and remote-work
    requests
- **Payroll Drafts**
  - Publish a cutoff, walk it through executive and admin approval, and
    generate payslips with category-specific rate rules
- **Payslips**
  - Statutory and cash-advance deductions, per-line currency rounding,
    publication workflow

### Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::import_attendance,
        crate::api::attendance::process_attendance,
        crate::api::attendance::list_attendance,
        crate::api::attendance::override_attendance,

        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::list_employees,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::request::create_request,
        crate::api::request::approve_request,
        crate::api::request::reject_request,
        crate::api::request::get_request,
        crate::api::request::list_requests,

        crate::api::cash_advance::create_cash_advance,
        crate::api::cash_advance::list_cash_advances,

        crate::api::payroll::publish_draft,
        crate::api::payroll::get_draft,
        crate::api::payroll::list_drafts,
        crate::api::payroll::submit_draft,
        crate::api::payroll::approve_exec,
        crate::api::payroll::approve_admin,
        crate::api::payroll::reject_draft,
        crate::api::payroll::list_payslips,
        crate::api::payroll::publish_payslip,
        crate::api::payroll::publish_all_payslips
    ),
    components(
        schemas(
            ImportPayload,
            ImportResponse,
            ProcessPayload,
            ProcessResponse,
            OverrideAttendance,
            AttendanceQuery,
            AttendanceListResponse,
            AttendanceRecord,
            DayRecord,
            CutoffWindow,
            SkippedRow,
            CreateEmployee,
            UpdateEmployee,
            EmployeeQuery,
            EmployeeListResponse,
            Employee,
            EmployeeCategory,
            ObRate,
            FreelanceItem,
            CreateRequest,
            RequestFilter,
            RequestListResponse,
            AdjustmentRequest,
            RequestKind,
            RequestStatus,
            CreateCashAdvance,
            CashAdvanceQuery,
            CashAdvanceListResponse,
            CashAdvance,
            PublishDraft,
            DraftQuery,
            DraftListResponse,
            DraftDetailResponse,
            PayrollDraft,
            PayrollDraftLine,
            DraftStatus,
            TimePair,
            LineOt,
            LineOb,
            LineLeave,
            PayslipQuery,
            PayslipListResponse,
            Payslip,
            PayslipStatus,
            PayLine
        )
    ),
    tags(
        (name = "Attendance", description = "Attendance import and reconciliation APIs"),
        (name = "Requests", description = "Adjustment request APIs"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "CashAdvance", description = "Cash advance APIs"),
        (name = "Payroll", description = "Payroll draft and payslip APIs"),
    )
)]
pub struct ApiDoc;
