use crate::config::Config;
use crate::model::member::{Member, Team};
use crate::utils::db_utils::{build_update_sql, execute_update};
use crate::utils::email_filter;
use crate::utils::staff_cache::StaffCache;
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_json::json;
use sqlx::SqlitePool;
use tracing::{debug, error};
use utoipa::ToSchema;

/// Columns a PUT may touch. Email stays immutable so the lookup filter
/// never goes stale.
const UPDATE_COLUMNS: [&str; 7] = [
    "name",
    "team",
    "position",
    "pto_balance_hours",
    "sick_balance_hours",
    "pto_refresh_date",
    "status",
];

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateMember {
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "jane.doe@example.com", format = "email", value_type = String)]
    pub email: String,
    #[schema(example = "clinical")]
    pub team: Team,
    #[schema(example = "CVI RNs")]
    pub position: String,
    /// Defaults to the configured starting balance
    #[schema(example = 60.0, nullable = true)]
    pub pto_balance_hours: Option<f64>,
    /// Defaults to the configured starting balance
    #[schema(example = 60.0, nullable = true)]
    pub sick_balance_hours: Option<f64>,
    #[schema(example = "2026-01-01", format = "date", value_type = String, nullable = true)]
    pub pto_refresh_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MemberQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub team: Option<String>,
    pub position: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct MemberStats {
    #[schema(example = 15)]
    pub total_employees: i64,
    #[schema(example = 14)]
    pub active_employees: i64,
    /// Sum of PTO balances across the listed members, in days
    #[schema(example = 120.0)]
    pub total_pto_days: f64,
    #[schema(example = 8.0)]
    pub avg_pto_days: f64,
}

#[derive(Serialize, ToSchema)]
pub struct MemberListResponse {
    #[schema(
    example = json!([{
        "id": 1,
        "name": "Jane Doe",
        "email": "jane.doe@example.com",
        "team": "clinical",
        "position": "CVI RNs",
        "pto_balance_hours": 60.0,
        "sick_balance_hours": 60.0,
        "pto_refresh_date": null,
        "status": "active",
        "created_at": "2025-09-01T12:00:00"
    }])
)]
    pub data: Vec<Member>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 15)]
    pub total: i64,
    pub stats: MemberStats,
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    Str(&'a str),
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Countdown label for the next PTO refresh date.
fn refresh_status(refresh_date: Option<NaiveDate>, today: NaiveDate) -> String {
    let Some(refresh_date) = refresh_date else {
        return "Not set".to_string();
    };
    let days_diff = (refresh_date - today).num_days();
    if days_diff > 0 {
        format!("{} days", days_diff)
    } else if days_diff == 0 {
        "Today!".to_string()
    } else {
        format!("{} days overdue", -days_diff)
    }
}

/// Create Member
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateMember,
    responses(
        (status = 200, description = "Member created successfully", body = Object, example = json!({
            "message": "Member created successfully",
            "member_id": 1
        })),
        (status = 400, description = "Duplicate email or unknown position"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employees"
)]
pub async fn create_member(
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    staff: web::Data<StaffCache>,
    payload: web::Json<CreateMember>,
) -> actix_web::Result<impl Responder> {
    let name = payload.name.trim();
    let email_addr = payload.email.trim().to_lowercase();
    if name.is_empty() || email_addr.is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "name and email are required"
        })));
    }

    let team = payload.team.to_string();
    let known_position = super::position_exists(pool.get_ref(), &team, &payload.position)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to validate position");
            ErrorInternalServerError("Internal Server Error")
        })?;
    if !known_position {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": format!("Unknown position '{}' for team '{}'", payload.position, team)
        })));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO members
            (name, email, team, position, pto_balance_hours, sick_balance_hours, pto_refresh_date)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(name)
    .bind(&email_addr)
    .bind(&team)
    .bind(&payload.position)
    .bind(payload.pto_balance_hours.unwrap_or(config.default_pto_balance_hours))
    .bind(payload.sick_balance_hours.unwrap_or(config.default_sick_balance_hours))
    .bind(payload.pto_refresh_date)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(res) => {
            email_filter::insert(&email_addr);
            staff.invalidate().await;
            Ok(HttpResponse::Ok().json(json!({
                "message": "Member created successfully",
                "member_id": res.last_insert_rowid()
            })))
        }
        Err(e) => {
            // UNIQUE constraint on members.email
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("2067") {
                    return Ok(HttpResponse::BadRequest().json(json!({
                        "message": "A member with this email already exists"
                    })));
                }
            }
            error!(error = %e, "Failed to create member");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

// -------------------- Handler --------------------

#[utoipa::path(
    get,
    path = "/api/employees",
    params(
        ("page", Query, description = "Page number"),
        ("per_page", Query, description = "Items per page"),
        ("team", Query, description = "Filter by team"),
        ("position", Query, description = "Filter by position"),
        ("status", Query, description = "Filter by status"),
        ("search", Query, description = "Search by name or email")
    ),
    responses(
        (status = 200, description = "Paginated member list with balance statistics", body = MemberListResponse)
    ),
    tag = "Employees"
)]
pub async fn list_members(
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    query: web::Query<MemberQuery>,
) -> actix_web::Result<impl Responder> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * per_page;

    // ---------- build WHERE clause dynamically ----------
    let search_pattern = query.search.as_deref().map(|s| format!("%{}%", s.trim()));
    let mut conditions = Vec::new();
    let mut bindings: Vec<FilterValue> = Vec::new();

    if let Some(team) = query.team.as_deref() {
        conditions.push("team = ?");
        bindings.push(FilterValue::Str(team));
    }

    if let Some(position) = query.position.as_deref() {
        conditions.push("position = ?");
        bindings.push(FilterValue::Str(position));
    }

    if let Some(status) = query.status.as_deref() {
        conditions.push("status = ?");
        bindings.push(FilterValue::Str(status));
    }

    if let Some(pattern) = search_pattern.as_deref() {
        conditions.push("(name LIKE ? OR email LIKE ?)");
        bindings.push(FilterValue::Str(pattern));
        bindings.push(FilterValue::Str(pattern));
    }

    let where_clause = if conditions.is_empty() {
        "".to_string()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    // ---------- total count ----------
    let count_sql = format!("SELECT COUNT(*) as total FROM members {}", where_clause);
    debug!(sql = %count_sql, "Counting members");

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for b in &bindings {
        count_query = match b {
            FilterValue::Str(s) => count_query.bind(*s),
        };
    }
    let total = count_query.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %count_sql, "Failed to count members");
        ErrorInternalServerError("Database error")
    })?;

    // ---------- balance statistics over the same filter ----------
    let hours_sql = format!(
        "SELECT COALESCE(SUM(pto_balance_hours), 0.0) FROM members {}",
        where_clause
    );
    let mut hours_query = sqlx::query_scalar::<_, f64>(&hours_sql);
    for b in &bindings {
        hours_query = match b {
            FilterValue::Str(s) => hours_query.bind(*s),
        };
    }
    let total_hours = hours_query.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %hours_sql, "Failed to sum balances");
        ErrorInternalServerError("Database error")
    })?;

    let active_sql = if conditions.is_empty() {
        "SELECT COUNT(*) FROM members WHERE status = 'active'".to_string()
    } else {
        format!(
            "SELECT COUNT(*) FROM members {} AND status = 'active'",
            where_clause
        )
    };
    let mut active_query = sqlx::query_scalar::<_, i64>(&active_sql);
    for b in &bindings {
        active_query = match b {
            FilterValue::Str(s) => active_query.bind(*s),
        };
    }
    let active = active_query.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %active_sql, "Failed to count active members");
        ErrorInternalServerError("Database error")
    })?;

    // ---------- data query ----------
    let data_sql = format!(
        "SELECT * FROM members {} ORDER BY name LIMIT ? OFFSET ?",
        where_clause
    );
    debug!(sql = %data_sql, page, per_page, offset, "Fetching members");

    let mut data_query = sqlx::query_as::<_, Member>(&data_sql);
    for b in bindings {
        data_query = match b {
            FilterValue::Str(s) => data_query.bind(s),
        };
    }
    data_query = data_query.bind(per_page as i64).bind(offset as i64);

    let members = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %data_sql, "Failed to fetch members");
        ErrorInternalServerError("Database error")
    })?;

    let day_hours = config.standard_day_hours;
    let stats = MemberStats {
        total_employees: total,
        active_employees: active,
        total_pto_days: round1(total_hours / day_hours),
        avg_pto_days: if total > 0 {
            round1((total_hours / total as f64) / day_hours)
        } else {
            0.0
        },
    };

    Ok(HttpResponse::Ok().json(MemberListResponse {
        data: members,
        page,
        per_page,
        total,
        stats,
    }))
}

/// Update Member
#[utoipa::path(
    put,
    path = "/api/employees/{member_id}",
    params(
        ("member_id", Path, description = "Member ID")
    ),
    request_body(
        content = Object,
        description = "Fields to update",
        content_type = "application/json",
        example = json!({"position": "CT Desk", "pto_balance_hours": 45.0})
    ),
    responses(
        (status = 200, description = "Member updated successfully"),
        (status = 400, description = "Unknown field in payload"),
        (status = 404, description = "Member not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employees"
)]
pub async fn update_member(
    pool: web::Data<SqlitePool>,
    staff: web::Data<StaffCache>,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    let member_id = path.into_inner();

    let update = build_update_sql("members", &body, &UPDATE_COLUMNS, "id", member_id)?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().body("Member not found"));
    }

    staff.invalidate().await;
    Ok(HttpResponse::Ok().body("Member updated successfully"))
}

/// Deactivate Member
#[utoipa::path(
    delete,
    path = "/api/employees/{member_id}",
    params(
        ("member_id", Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Member deactivated", body = Object, example = json!({
            "message": "Member deactivated"
        })),
        (status = 404, description = "Member not found or already inactive", body = Object, example = json!({
            "message": "Member not found or already inactive"
        })),
        (status = 500, description = "Internal server error", body = Object)
    ),
    tag = "Employees"
)]
pub async fn delete_member(
    pool: web::Data<SqlitePool>,
    staff: web::Data<StaffCache>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    let member_id = path.into_inner();

    // Soft delete keeps the request history intact
    let result = sqlx::query("UPDATE members SET status = 'inactive' WHERE id = ? AND status = 'active'")
        .bind(member_id)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(res) => {
            if res.rows_affected() == 0 {
                return Ok(HttpResponse::NotFound().json(json!({
                    "message": "Member not found or already inactive"
                })));
            }

            staff.invalidate().await;
            Ok(HttpResponse::Ok().json(json!({
                "message": "Member deactivated"
            })))
        }

        Err(e) => {
            error!(error = %e, member_id, "Failed to deactivate member");

            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

/// Get Member by ID
#[utoipa::path(
    get,
    path = "/api/employees/{member_id}",
    params(
        ("member_id", Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Member found", body = Member),
        (status = 404, description = "Member not found", body = Object, example = json!({
            "message": "Member not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employees"
)]
pub async fn get_member(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    let member_id = path.into_inner();

    let member = sqlx::query_as::<_, Member>("SELECT * FROM members WHERE id = ?")
        .bind(member_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, member_id, "Failed to fetch member");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    match member {
        Some(member) => Ok(HttpResponse::Ok().json(member)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Member not found"
        }))),
    }
}

/// Get Member PTO summary
#[utoipa::path(
    get,
    path = "/api/employees/{member_id}/summary",
    params(
        ("member_id", Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Member with request statistics",
         body = Object,
         example = json!({
            "member": {"id": 1, "name": "Jane Doe", "pto_balance_hours": 30.0},
            "stats": {
                "total_requests": 2,
                "approved_requests": 1,
                "pending_requests": 1,
                "denied_requests": 0,
                "total_pto_used": 4.0,
                "refresh_status": "Not set",
                "pto_balance_days": 4.0,
                "sick_balance_days": 8.0
            }
         })
        ),
        (status = 404, description = "Member not found")
    ),
    tag = "Employees"
)]
pub async fn member_summary(
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    let member_id = path.into_inner();

    let member = sqlx::query_as::<_, Member>("SELECT * FROM members WHERE id = ?")
        .bind(member_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, member_id, "Failed to fetch member");
            ErrorInternalServerError("Internal Server Error")
        })?;
    let Some(member) = member else {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Member not found"
        })));
    };

    let rows: Vec<(String, i64, f64)> = sqlx::query_as(
        r#"
        SELECT status, COUNT(*), COALESCE(SUM(duration_business_days), 0.0)
        FROM pto_requests
        WHERE member_id = ?
        GROUP BY status
        "#,
    )
    .bind(member_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, member_id, "Failed to fetch request statistics");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let mut total_requests = 0i64;
    let mut approved_requests = 0i64;
    let mut pending_requests = 0i64;
    let mut denied_requests = 0i64;
    let mut total_pto_used = 0.0;
    for (status, count, days) in rows {
        total_requests += count;
        match status.as_str() {
            "approved" => {
                approved_requests = count;
                total_pto_used = days;
            }
            "pending" => pending_requests = count,
            "denied" => denied_requests = count,
            _ => {}
        }
    }

    let day_hours = config.standard_day_hours;
    let stats = json!({
        "total_requests": total_requests,
        "approved_requests": approved_requests,
        "pending_requests": pending_requests,
        "denied_requests": denied_requests,
        "total_pto_used": round1(total_pto_used),
        "refresh_status": refresh_status(member.pto_refresh_date, Utc::now().date_naive()),
        "pto_balance_days": member.pto_balance_days(day_hours),
        "sick_balance_days": member.sick_balance_days(day_hours),
    });

    Ok(HttpResponse::Ok().json(json!({
        "member": member,
        "stats": stats
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{peer, seed_member, spawn_app};
    use crate::db::test_pool;
    use actix_web::http::StatusCode;
    use actix_web::test;

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[actix_web::test]
    async fn test_refresh_status_labels() {
        let today = d(2025, 9, 1);
        assert_eq!(refresh_status(None, today), "Not set");
        assert_eq!(refresh_status(Some(d(2025, 9, 11)), today), "10 days");
        assert_eq!(refresh_status(Some(d(2025, 9, 1)), today), "Today!");
        assert_eq!(refresh_status(Some(d(2025, 8, 29)), today), "3 days overdue");
    }

    #[actix_web::test]
    async fn test_create_and_get_member() {
        let pool = test_pool().await;
        let app = spawn_app!(pool);

        let req = test::TestRequest::post()
            .uri("/api/employees")
            .peer_addr(peer())
            .set_json(json!({
                "name": "Alice Adams",
                "email": "alice.member1@example.com",
                "team": "admin",
                "position": "CT Desk",
                "pto_balance_hours": 45.0
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        let member_id = body["member_id"].as_i64().unwrap();

        let req = test::TestRequest::get()
            .uri(&format!("/api/employees/{}", member_id))
            .peer_addr(peer())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["name"], "Alice Adams");
        assert_eq!(body["pto_balance_hours"], 45.0);
        assert_eq!(body["sick_balance_hours"], 60.0);
        assert_eq!(body["status"], "active");
        assert!(body["created_at"].is_string());
    }

    #[actix_web::test]
    async fn test_create_member_rejects_duplicate_email() {
        let pool = test_pool().await;
        let app = spawn_app!(pool);

        for expected in [StatusCode::OK, StatusCode::BAD_REQUEST] {
            let req = test::TestRequest::post()
                .uri("/api/employees")
                .peer_addr(peer())
                .set_json(json!({
                    "name": "Alice Adams",
                    "email": "alice.member2@example.com",
                    "team": "admin",
                    "position": "CT Desk"
                }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), expected);
        }
    }

    #[actix_web::test]
    async fn test_create_member_rejects_unknown_position() {
        let pool = test_pool().await;
        let app = spawn_app!(pool);

        let req = test::TestRequest::post()
            .uri("/api/employees")
            .peer_addr(peer())
            .set_json(json!({
                "name": "Alice Adams",
                "email": "alice.member3@example.com",
                "team": "admin",
                "position": "Wizard"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_list_members_with_stats() {
        let pool = test_pool().await;
        seed_member(&pool, "Alice Adams", "alice.member4@example.com", "admin", "CT Desk", 60.0, 60.0).await;
        seed_member(&pool, "Bob Brown", "bob.member4@example.com", "admin", "Front Desk/Admin", 30.0, 60.0).await;
        seed_member(&pool, "Carol Clark", "carol.member4@example.com", "clinical", "APP", 60.0, 60.0).await;
        let app = spawn_app!(pool);

        let req = test::TestRequest::get()
            .uri("/api/employees?team=admin")
            .peer_addr(peer())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["total"], 2);
        assert_eq!(body["stats"]["total_employees"], 2);
        assert_eq!(body["stats"]["active_employees"], 2);
        assert_eq!(body["stats"]["total_pto_days"], 12.0);
        assert_eq!(body["stats"]["avg_pto_days"], 6.0);
        // Ordered by name
        assert_eq!(body["data"][0]["name"], "Alice Adams");

        let req = test::TestRequest::get()
            .uri("/api/employees?search=carol")
            .peer_addr(peer())
            .to_request();
        let resp = test::call_service(&app, req).await;
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["data"][0]["team"], "clinical");

        let req = test::TestRequest::get()
            .uri("/api/employees?position=APP")
            .peer_addr(peer())
            .to_request();
        let resp = test::call_service(&app, req).await;
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["data"][0]["name"], "Carol Clark");
    }

    #[actix_web::test]
    async fn test_update_member() {
        let pool = test_pool().await;
        let member_id = seed_member(
            &pool,
            "Alice Adams",
            "alice.member5@example.com",
            "admin",
            "CT Desk",
            60.0,
            60.0,
        )
        .await;
        let app = spawn_app!(pool);

        let req = test::TestRequest::put()
            .uri(&format!("/api/employees/{}", member_id))
            .peer_addr(peer())
            .set_json(json!({"position": "Authorization Team", "pto_balance_hours": 20.0}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let (position, balance): (String, f64) =
            sqlx::query_as("SELECT position, pto_balance_hours FROM members WHERE id = ?")
                .bind(member_id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(position, "Authorization Team");
        assert_eq!(balance, 20.0);

        // Email is not an updatable column
        let req = test::TestRequest::put()
            .uri(&format!("/api/employees/{}", member_id))
            .peer_addr(peer())
            .set_json(json!({"email": "sneaky@example.com"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_delete_member_is_soft() {
        let pool = test_pool().await;
        let member_id = seed_member(
            &pool,
            "Alice Adams",
            "alice.member6@example.com",
            "admin",
            "CT Desk",
            60.0,
            60.0,
        )
        .await;
        let app = spawn_app!(pool);

        for expected in [StatusCode::OK, StatusCode::NOT_FOUND] {
            let req = test::TestRequest::delete()
                .uri(&format!("/api/employees/{}", member_id))
                .peer_addr(peer())
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), expected);
        }

        let status: String = sqlx::query_scalar("SELECT status FROM members WHERE id = ?")
            .bind(member_id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(status, "inactive");
    }

    #[actix_web::test]
    async fn test_member_summary() {
        let pool = test_pool().await;
        let member_id = seed_member(
            &pool,
            "Alice Adams",
            "alice.member7@example.com",
            "clinical",
            "CVI RNs",
            60.0,
            60.0,
        )
        .await;
        let app = spawn_app!(pool);

        let mut ids = Vec::new();
        for dates in [("2025-09-18", "2025-09-23"), ("2025-10-06", "2025-10-06")] {
            let req = test::TestRequest::post()
                .uri("/api/requests")
                .peer_addr(peer())
                .set_json(json!({
                    "name": "Alice Adams",
                    "email": "alice.member7@example.com",
                    "start_date": dates.0,
                    "end_date": dates.1,
                    "pto_type": "Vacation"
                }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
            let body: Value = test::read_body_json(resp).await;
            ids.push(body["request_id"].as_i64().unwrap());
        }

        let req = test::TestRequest::put()
            .uri(&format!("/api/requests/{}/approve", ids[0]))
            .peer_addr(peer())
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/employees/{}/summary", member_id))
            .peer_addr(peer())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["stats"]["total_requests"], 2);
        assert_eq!(body["stats"]["approved_requests"], 1);
        assert_eq!(body["stats"]["pending_requests"], 1);
        assert_eq!(body["stats"]["denied_requests"], 0);
        assert_eq!(body["stats"]["total_pto_used"], 4.0);
        assert_eq!(body["stats"]["refresh_status"], "Not set");
        // 30 hours approved leaves 30 of 60, 4 days at 7.5h
        assert_eq!(body["member"]["pto_balance_hours"], 30.0);
        assert_eq!(body["stats"]["pto_balance_days"], 4.0);
        assert_eq!(body["stats"]["sick_balance_days"], 8.0);
    }
}
