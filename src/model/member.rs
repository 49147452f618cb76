use chrono::{NaiveDate, NaiveDateTime};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Which manager queue a member's requests land in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    #[display(fmt = "admin")]
    Admin,
    #[display(fmt = "clinical")]
    Clinical,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "Jane Doe",
        "email": "jane.doe@example.com",
        "team": "clinical",
        "position": "CVI RNs",
        "pto_balance_hours": 60.0,
        "sick_balance_hours": 60.0,
        "pto_refresh_date": "2026-01-01",
        "status": "active",
        "created_at": "2025-09-01T00:00:00"
    })
)]
pub struct Member {
    #[schema(example = 1)]
    pub id: i64,

    #[schema(example = "Jane Doe")]
    pub name: String,

    #[schema(example = "jane.doe@example.com")]
    pub email: String,

    #[schema(example = "clinical")]
    pub team: String,

    #[schema(example = "CVI RNs")]
    pub position: String,

    #[schema(example = 60.0)]
    pub pto_balance_hours: f64,

    #[schema(example = 60.0)]
    pub sick_balance_hours: f64,

    #[schema(example = "2026-01-01", value_type = String, format = "date", nullable = true)]
    pub pto_refresh_date: Option<NaiveDate>,

    #[schema(example = "active")]
    pub status: String,

    #[schema(example = "2025-09-01T00:00:00", value_type = String, format = "date-time", nullable = true)]
    pub created_at: Option<NaiveDateTime>,
}

impl Member {
    /// PTO balance expressed in days, one decimal place.
    pub fn pto_balance_days(&self, day_hours: f64) -> f64 {
        round1(self.pto_balance_hours / day_hours)
    }

    /// Sick balance expressed in days, one decimal place.
    pub fn sick_balance_days(&self, day_hours: f64) -> f64 {
        round1(self.sick_balance_hours / day_hours)
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_member() -> Member {
        Member {
            id: 1,
            name: "Jane Doe".to_string(),
            email: "jane.doe@example.com".to_string(),
            team: "clinical".to_string(),
            position: "CVI RNs".to_string(),
            pto_balance_hours: 52.5,
            sick_balance_hours: 40.0,
            pto_refresh_date: None,
            status: "active".to_string(),
            created_at: None,
        }
    }

    #[test]
    fn test_balance_day_conversion() {
        let member = fixture_member();
        assert_eq!(member.pto_balance_days(7.5), 7.0);
        assert_eq!(member.sick_balance_days(7.5), 5.3);
    }

    #[test]
    fn test_team_display_is_lowercase() {
        assert_eq!(Team::Admin.to_string(), "admin");
        assert_eq!(Team::Clinical.to_string(), "clinical");
    }
}
