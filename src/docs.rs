use crate::api::member::{CreateMember, MemberListResponse, MemberStats};
use crate::api::pto_request::{
    CreatePtoRequest, DenyPtoRequest, PtoRequestFilter, PtoRequestListResponse,
};
use crate::api::registration::{CreateRegistration, DenyRegistration, RegistrationListResponse};
use crate::model::member::{Member, Team};
use crate::model::pending_member::PendingMember;
use crate::model::position::Position;
use crate::model::pto_request::{PtoRequest, PtoType, RequestStatus};
use crate::utils::staff_cache::DirectoryEntry;
use crate::workdays::RangeBreakdown;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "PTO Tracker API",
        version = "1.0.0",
        description = r#"
## PTO Tracker

This API powers an internal **paid-time-off tracker**: employees submit PTO
requests, managers approve or deny them, and a calendar feed visualizes the
team's leave.

### 🔹 Key Features
- **PTO Requests**
  - Submit requests (full-day ranges or partial days with times), approve,
    deny, cancel, and track follow-up workflow flags
  - Duration is computed once at submission from the business-day calendar
    (weekends and US federal holidays excluded) and never recomputed
- **Balances**
  - Approval debits the stored hours from the member's PTO or sick balance;
    cancelling an approved request credits them back
- **Calendar**
  - Pending and approved requests as calendar events, plus a business-day
    breakdown preview for any date range
- **Employees & Registrations**
  - Employee CRUD with balance statistics; self-registration with manager
    approval
- **Staff Directory**
  - Cached team → position → employee map backing the request form's
    cascading dropdowns

### 📦 Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::pto_request::submit_request,
        crate::api::pto_request::list_requests,
        crate::api::pto_request::get_request,
        crate::api::pto_request::approve_request,
        crate::api::pto_request::deny_request,
        crate::api::pto_request::cancel_request,
        crate::api::pto_request::update_workflow,

        crate::api::calendar::calendar_events,
        crate::api::calendar::business_day_breakdown,

        crate::api::member::create_member,
        crate::api::member::list_members,
        crate::api::member::get_member,
        crate::api::member::update_member,
        crate::api::member::delete_member,
        crate::api::member::member_summary,

        crate::api::registration::submit_registration,
        crate::api::registration::list_registrations,
        crate::api::registration::approve_registration,
        crate::api::registration::deny_registration,

        crate::api::directory::staff_directory,
        crate::api::directory::refresh_staff_directory,
        crate::api::directory::positions
    ),
    components(
        schemas(
            CreatePtoRequest,
            DenyPtoRequest,
            PtoRequestFilter,
            PtoRequest,
            PtoRequestListResponse,
            PtoType,
            RequestStatus,
            CreateMember,
            Member,
            MemberListResponse,
            MemberStats,
            Team,
            CreateRegistration,
            DenyRegistration,
            PendingMember,
            RegistrationListResponse,
            Position,
            RangeBreakdown,
            DirectoryEntry
        )
    ),
    tags(
        (name = "Requests", description = "PTO request submission and review APIs"),
        (name = "Calendar", description = "Calendar feed and business-day preview APIs"),
        (name = "Employees", description = "Employee management APIs"),
        (name = "Registrations", description = "New employee registration APIs"),
        (name = "Directory", description = "Staff directory and positions APIs"),
    )
)]
pub struct ApiDoc;
