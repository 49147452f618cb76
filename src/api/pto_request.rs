use actix_web::{HttpResponse, Responder, web};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};

use crate::config::Config;
use crate::email::EmailService;
use crate::model::member::Team;
use crate::model::pto_request::{PtoRequest, PtoType, RequestStatus};
use crate::utils::db_utils;
use crate::utils::email_filter;
use crate::utils::staff_cache::StaffCache;
use crate::workdays::{FederalHolidayProvider, RequestSpan, compute_duration};

#[derive(Deserialize, ToSchema)]
pub struct CreatePtoRequest {
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "jane.doe@example.com")]
    pub email: String,
    /// Required for first-time submitters, ignored for known members
    #[schema(example = "clinical")]
    pub team: Option<Team>,
    /// Required for first-time submitters, ignored for known members
    #[schema(example = "CVI RNs")]
    pub position: Option<String>,
    #[schema(example = "2025-09-18", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2025-09-23", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "Vacation")]
    pub pto_type: PtoType, // enum ensures Swagger dropdown
    #[serde(default)]
    #[schema(example = false)]
    pub is_partial_day: bool,
    #[schema(example = "09:00", nullable = true)]
    pub start_time: Option<String>,
    #[schema(example = "13:30", nullable = true)]
    pub end_time: Option<String>,
    #[schema(nullable = true)]
    pub reason: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct DenyPtoRequest {
    #[schema(example = "Coverage conflict that week")]
    pub denial_reason: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct PtoRequestFilter {
    #[schema(example = 1)]
    /// Filter by member ID
    pub member_id: Option<i64>,
    #[schema(example = "pending")]
    /// Filter by request status
    pub status: Option<String>,
    #[schema(example = "clinical")]
    /// Filter by manager team
    pub team: Option<String>,
    #[schema(example = 1)]
    /// Pagination page number (start with 1)
    pub page: Option<u32>, // 1-based
    #[schema(example = 10)]
    /// Pagination per page number
    pub per_page: Option<u32>, // items per page
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    I64(i64),
    Str(&'a str),
}

#[derive(Serialize, ToSchema)]
#[schema(example = json!({
    "data": [
        {
            "id": 42,
            "member_id": 1,
            "start_date": "2025-09-18",
            "end_date": "2025-09-23",
            "pto_type": "Vacation",
            "status": "pending",
            "manager_team": "clinical",
            "duration_business_days": 4.0,
            "duration_hours": 30.0
        }
    ],
    "page": 1,
    "per_page": 10,
    "total": 1
}))]
pub struct PtoRequestListResponse {
    pub data: Vec<PtoRequest>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

/// Resolve the submitter to a member row, creating one for first-time
/// submitters. Returns `(member_id, team, position)`.
async fn resolve_member(
    pool: &SqlitePool,
    config: &Config,
    staff: &StaffCache,
    payload: &CreatePtoRequest,
    name: &str,
    email_addr: &str,
) -> actix_web::Result<Result<(i64, String, String), HttpResponse>> {
    let mut existing: Option<(i64, String, String, String)> = None;
    // Negative filter answer means the SELECT can be skipped entirely
    if email_filter::might_exist(email_addr) {
        existing = sqlx::query_as("SELECT id, team, position, status FROM members WHERE email = ?")
            .bind(email_addr)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, email = %email_addr, "Failed to look up member");
                actix_web::error::ErrorInternalServerError("Internal Server Error")
            })?;
    }

    if let Some((member_id, team, position, status)) = existing {
        if status != "active" {
            return Ok(Err(HttpResponse::BadRequest().json(serde_json::json!({
                "message": "This employee profile is inactive. Contact your manager."
            }))));
        }
        return Ok(Ok((member_id, team, position)));
    }

    let (Some(team), Some(position)) = (payload.team, payload.position.as_deref()) else {
        return Ok(Err(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "team and position are required for first-time submissions"
        }))));
    };

    let team = team.to_string();
    let known_position = super::position_exists(pool, &team, position)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to validate position");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;
    if !known_position {
        return Ok(Err(HttpResponse::BadRequest().json(serde_json::json!({
            "message": format!("Unknown position '{}' for team '{}'", position, team)
        }))));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO members
            (name, email, team, position, pto_balance_hours, sick_balance_hours)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(name)
    .bind(email_addr)
    .bind(&team)
    .bind(position)
    .bind(config.default_pto_balance_hours)
    .bind(config.default_sick_balance_hours)
    .execute(pool)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, email = %email_addr, "Failed to create member");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    email_filter::insert(email_addr);
    staff.invalidate().await;

    Ok(Ok((result.last_insert_rowid(), team, position.to_string())))
}

/* =========================
Submit PTO request
========================= */
/// Swagger doc for submit_request endpoint
#[utoipa::path(
    post,
    path = "/api/requests",
    request_body(
        content = CreatePtoRequest,
        description = "PTO request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "PTO request submitted successfully",
         body = Object,
         example = json!({
            "message": "PTO request submitted",
            "request_id": 42,
            "status": "pending",
            "duration_business_days": 4.0,
            "duration_hours": 30.0
         })
        ),
        (status = 400, description = "Bad request")
    ),
    tag = "Requests"
)]
pub async fn submit_request(
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    holidays: web::Data<FederalHolidayProvider>,
    staff: web::Data<StaffCache>,
    mailer: web::Data<EmailService>,
    payload: web::Json<CreatePtoRequest>,
) -> actix_web::Result<impl Responder> {
    let name = payload.name.trim();
    let email_addr = payload.email.trim().to_lowercase();

    // 1️⃣ validate identity fields
    if name.is_empty() || email_addr.is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "name and email are required"
        })));
    }

    // 2️⃣ price the span, duration is fixed at submission time
    let span = RequestSpan {
        start_date: payload.start_date,
        end_date: payload.end_date,
        is_partial_day: payload.is_partial_day,
        start_time: payload.start_time.clone(),
        end_time: payload.end_time.clone(),
    };
    let duration = match compute_duration(&span, &holidays, config.standard_day_hours) {
        Ok(duration) => duration,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "message": e.to_string()
            })));
        }
    };

    // 3️⃣ resolve the member, creating a profile on first submission
    let (member_id, member_team, member_position) =
        match resolve_member(pool.get_ref(), &config, &staff, &payload, name, &email_addr).await? {
            Ok(member) => member,
            Err(response) => return Ok(response),
        };

    // Requests route to the manager who owns the position, not the member's team
    let manager_team = super::position_team(pool.get_ref(), &member_position)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to resolve manager team");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?
        .unwrap_or_else(|| member_team.clone());

    // 4️⃣ insert request
    let now = Utc::now().naive_utc();
    let result = sqlx::query(
        r#"
        INSERT INTO pto_requests
            (member_id, start_date, end_date, pto_type, status, manager_team,
             is_partial_day, start_time, end_time, reason,
             duration_business_days, duration_hours, submitted_at, updated_at)
        VALUES (?, ?, ?, ?, 'pending', ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(member_id)
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(payload.pto_type.to_string())
    .bind(&manager_team)
    .bind(payload.is_partial_day)
    .bind(payload.start_time.as_deref())
    .bind(payload.end_time.as_deref())
    .bind(payload.reason.as_deref())
    .bind(duration.fractional_days)
    .bind(duration.hours)
    .bind(now)
    .bind(now)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, member_id, "Failed to create PTO request");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;
    let request_id = result.last_insert_rowid();

    let request = PtoRequest {
        id: request_id,
        member_id,
        start_date: payload.start_date,
        end_date: payload.end_date,
        pto_type: payload.pto_type.to_string(),
        status: "pending".to_string(),
        manager_team,
        denial_reason: None,
        is_partial_day: payload.is_partial_day,
        start_time: payload.start_time.clone(),
        end_time: payload.end_time.clone(),
        reason: payload.reason.clone(),
        duration_business_days: duration.fractional_days,
        duration_hours: duration.hours,
        timekeeping_complete: "No".to_string(),
        coverage_arranged: "No".to_string(),
        workflow_complete: "No".to_string(),
        submitted_at: Some(now),
        updated_at: Some(now),
    };
    mailer.send_submission_emails(&request, name, &email_addr).await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "PTO request submitted",
        "request_id": request_id,
        "status": "pending",
        "duration_business_days": duration.fractional_days,
        "duration_hours": duration.hours
    })))
}

/* =========================
Approve PTO request
========================= */
/// Swagger doc for approve_request endpoint
#[utoipa::path(
    put,
    path = "/api/requests/{request_id}/approve",
    params(
        ("request_id" = i64, Path, description = "ID of the PTO request to approve")
    ),
    responses(
        (status = 200, description = "PTO request approved successfully", body = Object, example = json!({
            "message": "PTO request approved"
        })),
        (status = 400, description = "PTO request not found or already processed", body = Object, example = json!({
            "message": "PTO request not found or already processed"
        }))
    ),
    tag = "Requests"
)]
pub async fn approve_request(
    pool: web::Data<SqlitePool>,
    mailer: web::Data<EmailService>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    let request_id = path.into_inner();

    let mut tx = pool.begin().await.map_err(|e| {
        tracing::error!(error = %e, request_id, "Failed to open transaction");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let request = sqlx::query_as::<_, PtoRequest>("SELECT * FROM pto_requests WHERE id = ?")
        .bind(request_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, request_id, "Failed to fetch PTO request");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;
    let Some(request) = request else {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "PTO request not found or already processed"
        })));
    };

    let result = sqlx::query(
        r#"
        UPDATE pto_requests
        SET status = 'approved', updated_at = ?
        WHERE id = ?
        AND status = 'pending'
        "#,
    )
    .bind(Utc::now().naive_utc())
    .bind(request_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, request_id, "Approve request failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "PTO request not found or already processed"
        })));
    }

    // Sick Leave draws down the sick balance, everything else the PTO balance.
    // The balance never goes below zero.
    let uses_sick = PtoType::from_str(&request.pto_type)
        .map(|t| t.uses_sick_balance())
        .unwrap_or(false);
    let column = if uses_sick {
        "sick_balance_hours"
    } else {
        "pto_balance_hours"
    };
    let debit_sql = format!(
        "UPDATE members SET {column} = MAX(0, {column} - ?) WHERE id = ?",
        column = column
    );
    sqlx::query(&debit_sql)
        .bind(request.duration_hours)
        .bind(request.member_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, request_id, "Balance debit failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    tx.commit().await.map_err(|e| {
        tracing::error!(error = %e, request_id, "Failed to commit approval");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let member = sqlx::query_as::<_, (String, String)>("SELECT name, email FROM members WHERE id = ?")
        .bind(request.member_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, request_id, "Failed to fetch member for notification");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;
    if let Some((member_name, member_email)) = member {
        mailer
            .send_decision_email(&request, &member_name, &member_email, true)
            .await;
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "PTO request approved"
    })))
}

/* =========================
Deny PTO request
========================= */
/// Swagger doc for deny_request endpoint
#[utoipa::path(
    put,
    path = "/api/requests/{request_id}/deny",
    params(
        ("request_id" = i64, Path, description = "ID of the PTO request to deny")
    ),
    request_body(
        content = DenyPtoRequest,
        description = "Denial reason payload",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "PTO request denied successfully", body = Object, example = json!({
            "message": "PTO request denied"
        })),
        (status = 400, description = "PTO request not found or already processed", body = Object, example = json!({
            "message": "PTO request not found or already processed"
        }))
    ),
    tag = "Requests"
)]
pub async fn deny_request(
    pool: web::Data<SqlitePool>,
    mailer: web::Data<EmailService>,
    path: web::Path<i64>,
    payload: web::Json<DenyPtoRequest>,
) -> actix_web::Result<impl Responder> {
    let request_id = path.into_inner();

    let result = sqlx::query(
        r#"
        UPDATE pto_requests
        SET status = 'denied', denial_reason = ?, updated_at = ?
        WHERE id = ?
        AND status = 'pending'
        "#,
    )
    .bind(payload.denial_reason.as_deref())
    .bind(Utc::now().naive_utc())
    .bind(request_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, request_id, "Deny request failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "PTO request not found or already processed"
        })));
    }

    let request = sqlx::query_as::<_, PtoRequest>("SELECT * FROM pto_requests WHERE id = ?")
        .bind(request_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, request_id, "Failed to fetch denied request");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;
    if let Some(request) = request {
        let member =
            sqlx::query_as::<_, (String, String)>("SELECT name, email FROM members WHERE id = ?")
                .bind(request.member_id)
                .fetch_optional(pool.get_ref())
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, request_id, "Failed to fetch member for notification");
                    actix_web::error::ErrorInternalServerError("Internal Server Error")
                })?;
        if let Some((member_name, member_email)) = member {
            mailer
                .send_decision_email(&request, &member_name, &member_email, false)
                .await;
        }
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "PTO request denied"
    })))
}

/* =========================
Cancel PTO request
========================= */
/// Swagger doc for cancel_request endpoint
#[utoipa::path(
    put,
    path = "/api/requests/{request_id}/cancel",
    params(
        ("request_id" = i64, Path, description = "ID of the PTO request to cancel")
    ),
    responses(
        (status = 200, description = "PTO request cancelled successfully", body = Object, example = json!({
            "message": "PTO request cancelled"
        })),
        (status = 400, description = "Only pending or approved requests can be cancelled", body = Object, example = json!({
            "message": "Only pending or approved requests can be cancelled"
        })),
        (status = 404, description = "PTO request not found")
    ),
    tag = "Requests"
)]
pub async fn cancel_request(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    let request_id = path.into_inner();

    let mut tx = pool.begin().await.map_err(|e| {
        tracing::error!(error = %e, request_id, "Failed to open transaction");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let request = sqlx::query_as::<_, PtoRequest>("SELECT * FROM pto_requests WHERE id = ?")
        .bind(request_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, request_id, "Failed to fetch PTO request");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;
    let Some(request) = request else {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "PTO request not found"
        })));
    };

    let approved = sqlx::query(
        r#"
        UPDATE pto_requests
        SET status = 'cancelled', updated_at = ?
        WHERE id = ?
        AND status = 'approved'
        "#,
    )
    .bind(Utc::now().naive_utc())
    .bind(request_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, request_id, "Cancel request failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if approved.rows_affected() == 1 {
        // Credit back exactly the hours debited at approval
        let uses_sick = PtoType::from_str(&request.pto_type)
            .map(|t| t.uses_sick_balance())
            .unwrap_or(false);
        let column = if uses_sick {
            "sick_balance_hours"
        } else {
            "pto_balance_hours"
        };
        let credit_sql = format!(
            "UPDATE members SET {column} = {column} + ? WHERE id = ?",
            column = column
        );
        sqlx::query(&credit_sql)
            .bind(request.duration_hours)
            .bind(request.member_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, request_id, "Balance credit failed");
                actix_web::error::ErrorInternalServerError("Internal Server Error")
            })?;
    } else {
        // Pending requests cancel without any balance movement
        let pending = sqlx::query(
            r#"
            UPDATE pto_requests
            SET status = 'cancelled', updated_at = ?
            WHERE id = ?
            AND status = 'pending'
            "#,
        )
        .bind(Utc::now().naive_utc())
        .bind(request_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, request_id, "Cancel request failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

        if pending.rows_affected() == 0 {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Only pending or approved requests can be cancelled"
            })));
        }
    }

    tx.commit().await.map_err(|e| {
        tracing::error!(error = %e, request_id, "Failed to commit cancellation");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "PTO request cancelled"
    })))
}

/* =========================
Update workflow flags
========================= */
const WORKFLOW_COLUMNS: [&str; 4] = [
    "timekeeping_complete",
    "coverage_arranged",
    "workflow_complete",
    "updated_at",
];

const WORKFLOW_FLAGS: [&str; 3] = [
    "timekeeping_complete",
    "coverage_arranged",
    "workflow_complete",
];

/// Swagger doc for update_workflow endpoint
#[utoipa::path(
    put,
    path = "/api/requests/{request_id}/workflow",
    params(
        ("request_id" = i64, Path, description = "ID of the PTO request to update")
    ),
    request_body(
        content = Object,
        description = "Workflow flags to set, each 'Yes' or 'No'",
        content_type = "application/json",
        example = json!({"timekeeping_complete": "Yes", "coverage_arranged": "No"})
    ),
    responses(
        (status = 200, description = "Workflow updated successfully", body = Object, example = json!({
            "message": "Workflow updated"
        })),
        (status = 400, description = "Bad request"),
        (status = 404, description = "PTO request not found")
    ),
    tag = "Requests"
)]
pub async fn update_workflow(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Json<serde_json::Value>,
) -> actix_web::Result<impl Responder> {
    let request_id = path.into_inner();

    let mut body = payload.into_inner();
    let obj = body
        .as_object_mut()
        .ok_or_else(|| actix_web::error::ErrorBadRequest("Payload must be a JSON object"))?;

    for flag in WORKFLOW_FLAGS {
        if let Some(value) = obj.get(flag) {
            if !matches!(value.as_str(), Some("Yes") | Some("No")) {
                return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                    "message": format!("{} must be 'Yes' or 'No'", flag)
                })));
            }
        }
    }
    obj.insert(
        "updated_at".to_string(),
        serde_json::json!(Utc::now().naive_utc().format("%Y-%m-%dT%H:%M:%S").to_string()),
    );

    let update = db_utils::build_update_sql("pto_requests", &body, &WORKFLOW_COLUMNS, "id", request_id)?;
    let affected = db_utils::execute_update(pool.get_ref(), update)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, request_id, "Workflow update failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "PTO request not found"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Workflow updated"
    })))
}

/// for getting a PTO request details endpoint
#[utoipa::path(
    get,
    path = "/api/requests/{request_id}",
    params(
        ("request_id" = i64, Path, description = "ID of the PTO request to fetch")
    ),
    responses(
        (status = 200, description = "PTO request found", body = PtoRequest),
        (status = 404, description = "PTO request not found", body = Object, example = json!({
            "message": "PTO request not found"
        }))
    ),
    tag = "Requests"
)]
pub async fn get_request(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    let request_id = path.into_inner();

    let request = sqlx::query_as::<_, PtoRequest>("SELECT * FROM pto_requests WHERE id = ?")
        .bind(request_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, request_id, "Failed to fetch PTO request");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    match request {
        Some(data) => Ok(HttpResponse::Ok().json(data)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "PTO request not found"
        }))),
    }
}

/// for getting PTO requests endpoint
#[utoipa::path(
    get,
    path = "/api/requests",
    params(PtoRequestFilter),
    responses(
        (status = 200, description = "Paginated PTO request list", body = PtoRequestListResponse),
        (status = 400, description = "Invalid filter")
    ),
    tag = "Requests"
)]
pub async fn list_requests(
    pool: web::Data<SqlitePool>,
    query: web::Query<PtoRequestFilter>,
) -> actix_web::Result<impl Responder> {
    // -------------------------
    // Pagination
    // -------------------------
    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    // -------------------------
    // WHERE clause
    // -------------------------
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(member_id) = query.member_id {
        where_sql.push_str(" AND member_id = ?");
        args.push(FilterValue::I64(member_id));
    }

    if let Some(status) = query.status.as_deref() {
        if RequestStatus::from_str(status).is_err() {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Invalid status filter. Allowed: pending, approved, denied, cancelled"
            })));
        }
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status));
    }

    if let Some(team) = query.team.as_deref() {
        where_sql.push_str(" AND manager_team = ?");
        args.push(FilterValue::Str(team));
    }

    // -------------------------
    // COUNT query
    // -------------------------
    let count_sql = format!("SELECT COUNT(*) FROM pto_requests{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::I64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count PTO requests");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // -------------------------
    // DATA query
    // -------------------------
    let data_sql = format!(
        r#"
        SELECT *
        FROM pto_requests
        {}
        ORDER BY submitted_at DESC, id DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, PtoRequest>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::I64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }

    let requests = data_q
        .bind(per_page as i64)
        .bind(offset as i64)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch PTO request list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    // -------------------------
    // Response
    // -------------------------
    let response = PtoRequestListResponse {
        data: requests,
        page,
        per_page,
        total,
    };

    Ok(HttpResponse::Ok().json(response))
}
