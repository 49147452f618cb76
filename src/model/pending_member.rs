use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A self-registered employee waiting for manager review. Approval copies the
/// row into `members`, denial keeps it here with the reason.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 7,
        "name": "New Hire",
        "email": "new.hire@example.com",
        "team": "admin",
        "position": "CT Desk",
        "status": "pending",
        "notes": "Starts on the 1st",
        "requested_pto_balance_hours": 60.0,
        "submitted_at": "2025-09-10T14:30:00",
        "reviewed_at": null,
        "denial_reason": null
    })
)]
pub struct PendingMember {
    #[schema(example = 7)]
    pub id: i64,

    #[schema(example = "New Hire")]
    pub name: String,

    #[schema(example = "new.hire@example.com")]
    pub email: String,

    #[schema(example = "admin")]
    pub team: String,

    #[schema(example = "CT Desk")]
    pub position: String,

    #[schema(example = "pending")]
    pub status: String,

    #[schema(nullable = true)]
    pub notes: Option<String>,

    #[schema(example = 60.0)]
    pub requested_pto_balance_hours: f64,

    #[schema(example = "2025-09-10T14:30:00", value_type = String, format = "date-time", nullable = true)]
    pub submitted_at: Option<NaiveDateTime>,

    #[schema(value_type = String, format = "date-time", nullable = true)]
    pub reviewed_at: Option<NaiveDateTime>,

    #[schema(nullable = true)]
    pub denial_reason: Option<String>,
}
