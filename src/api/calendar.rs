use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::SqlitePool;
use sqlx::prelude::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::workdays::FederalHolidayProvider;

/// One PTO request joined with the member it belongs to.
#[derive(FromRow)]
struct EventRow {
    id: i64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    pto_type: String,
    status: String,
    is_partial_day: bool,
    start_time: Option<String>,
    end_time: Option<String>,
    reason: Option<String>,
    duration_business_days: f64,
    duration_hours: f64,
    member_name: String,
    member_team: String,
    member_position: String,
}

/// FullCalendar event object. Partial-day requests carry times in start/end,
/// full-day requests carry bare dates and an inclusive end.
fn build_event(row: &EventRow) -> serde_json::Value {
    let color = match row.status.as_str() {
        "approved" => "#28a745", // Green
        "pending" => "#ffc107",  // Yellow
        _ => "#6c757d",          // Gray
    };

    let (start, end, title) = match (&row.start_time, &row.end_time) {
        (Some(start_time), Some(end_time)) if row.is_partial_day => (
            format!("{}T{}", row.start_date, start_time),
            format!("{}T{}", row.end_date, end_time),
            format!("{} - {} (Partial)", row.member_name, row.pto_type),
        ),
        _ => (
            row.start_date.to_string(),
            row.end_date.to_string(),
            format!("{} - {}", row.member_name, row.pto_type),
        ),
    };

    let duration = if row.is_partial_day {
        serde_json::json!(format!("{} hours", row.duration_hours))
    } else {
        serde_json::json!(row.duration_business_days)
    };

    serde_json::json!({
        "id": row.id,
        "title": title,
        "start": start,
        "end": end,
        "color": color,
        "extendedProps": {
            "employee": row.member_name,
            "type": row.pto_type,
            "status": row.status,
            "team": row.member_team,
            "employee_position": row.member_position,
            "duration": duration,
            "is_partial_day": row.is_partial_day,
            "reason": row.reason
        }
    })
}

/// for getting the calendar event feed endpoint
#[utoipa::path(
    get,
    path = "/api/calendar/events",
    responses(
        (status = 200, description = "Pending and approved requests as calendar events",
         body = Object,
         example = json!([{
            "id": 42,
            "title": "Jane Doe - Vacation",
            "start": "2025-09-18",
            "end": "2025-09-23",
            "color": "#ffc107",
            "extendedProps": {
                "employee": "Jane Doe",
                "type": "Vacation",
                "status": "pending",
                "team": "clinical",
                "employee_position": "CVI RNs",
                "duration": 4.0,
                "is_partial_day": false,
                "reason": null
            }
         }])
        )
    ),
    tag = "Calendar"
)]
pub async fn calendar_events(pool: web::Data<SqlitePool>) -> actix_web::Result<impl Responder> {
    let rows = sqlx::query_as::<_, EventRow>(
        r#"
        SELECT r.id, r.start_date, r.end_date, r.pto_type, r.status,
               r.is_partial_day, r.start_time, r.end_time, r.reason,
               r.duration_business_days, r.duration_hours,
               m.name AS member_name, m.team AS member_team, m.position AS member_position
        FROM pto_requests r
        JOIN members m ON m.id = r.member_id
        WHERE r.status IN ('pending', 'approved')
        ORDER BY r.start_date, r.id
        "#,
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch calendar events");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let events: Vec<serde_json::Value> = rows.iter().map(build_event).collect();
    Ok(HttpResponse::Ok().json(events))
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct BusinessDaysQuery {
    #[schema(example = "2025-09-18", format = "date", value_type = String)]
    /// First day of the range, inclusive
    pub start_date: NaiveDate,
    #[schema(example = "2025-09-23", format = "date", value_type = String)]
    /// Last day of the range, inclusive
    pub end_date: NaiveDate,
}

/// for previewing a date range before submitting endpoint
#[utoipa::path(
    get,
    path = "/api/business-days",
    params(BusinessDaysQuery),
    responses(
        (status = 200, description = "Business day breakdown for the range",
         body = Object,
         example = json!({
            "total_days": 6,
            "business_days": 4,
            "weekend_days": 2,
            "holiday_days": 0,
            "holidays": [],
            "weekends": ["2025-09-20", "2025-09-21"]
         })
        ),
        (status = 400, description = "Invalid range or year outside holiday data")
    ),
    tag = "Calendar"
)]
pub async fn business_day_breakdown(
    holidays: web::Data<FederalHolidayProvider>,
    query: web::Query<BusinessDaysQuery>,
) -> actix_web::Result<impl Responder> {
    let calendar = match holidays.calendar_for(&query.start_date, &query.end_date) {
        Ok(calendar) => calendar,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "message": e.to_string()
            })));
        }
    };

    match calendar.breakdown(&query.start_date, &query.end_date) {
        Ok(breakdown) => Ok(HttpResponse::Ok().json(breakdown)),
        Err(e) => Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": e.to_string()
        }))),
    }
}
