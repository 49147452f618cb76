use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Categories offered on the request form. `Sick Leave` draws down the sick
/// balance, everything else draws down the PTO balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
pub enum PtoType {
    Vacation,
    Personal,
    #[strum(serialize = "Sick Leave")]
    #[serde(rename = "Sick Leave")]
    SickLeave,
    #[strum(serialize = "Family Emergency")]
    #[serde(rename = "Family Emergency")]
    FamilyEmergency,
}

impl PtoType {
    pub fn uses_sick_balance(&self) -> bool {
        matches!(self, PtoType::SickLeave)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Denied,
    Cancelled,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 42,
        "member_id": 1,
        "start_date": "2025-09-18",
        "end_date": "2025-09-23",
        "pto_type": "Vacation",
        "status": "pending",
        "manager_team": "clinical",
        "denial_reason": null,
        "is_partial_day": false,
        "start_time": null,
        "end_time": null,
        "reason": null,
        "duration_business_days": 4.0,
        "duration_hours": 30.0,
        "timekeeping_complete": "No",
        "coverage_arranged": "No",
        "workflow_complete": "No",
        "submitted_at": "2025-09-10T14:30:00",
        "updated_at": "2025-09-10T14:30:00"
    })
)]
pub struct PtoRequest {
    #[schema(example = 42)]
    pub id: i64,

    #[schema(example = 1)]
    pub member_id: i64,

    #[schema(example = "2025-09-18", value_type = String, format = "date")]
    pub start_date: NaiveDate,

    #[schema(example = "2025-09-23", value_type = String, format = "date")]
    pub end_date: NaiveDate,

    #[schema(example = "Vacation")]
    pub pto_type: String,

    #[schema(example = "pending")]
    pub status: String,

    #[schema(example = "clinical")]
    pub manager_team: String,

    #[schema(nullable = true)]
    pub denial_reason: Option<String>,

    #[schema(example = false)]
    pub is_partial_day: bool,

    #[schema(example = "09:00", nullable = true)]
    pub start_time: Option<String>,

    #[schema(example = "13:30", nullable = true)]
    pub end_time: Option<String>,

    #[schema(nullable = true)]
    pub reason: Option<String>,

    /// Business days charged, fractional for partial days.
    #[schema(example = 4.0)]
    pub duration_business_days: f64,

    /// Hours charged against the balance.
    #[schema(example = 30.0)]
    pub duration_hours: f64,

    #[schema(example = "No")]
    pub timekeeping_complete: String,

    #[schema(example = "No")]
    pub coverage_arranged: String,

    #[schema(example = "No")]
    pub workflow_complete: String,

    #[schema(example = "2025-09-10T14:30:00", value_type = String, format = "date-time", nullable = true)]
    pub submitted_at: Option<NaiveDateTime>,

    #[schema(example = "2025-09-10T14:30:00", value_type = String, format = "date-time", nullable = true)]
    pub updated_at: Option<NaiveDateTime>,
}
