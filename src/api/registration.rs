use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::config::Config;
use crate::email::EmailService;
use crate::model::member::Team;
use crate::model::pending_member::PendingMember;
use crate::utils::email_filter;
use crate::utils::staff_cache::StaffCache;

#[derive(Deserialize, ToSchema)]
pub struct CreateRegistration {
    #[schema(example = "New Hire")]
    pub name: String,
    #[schema(example = "new.hire@example.com", format = "email", value_type = String)]
    pub email: String,
    #[schema(example = "admin")]
    pub team: Team,
    #[schema(example = "CT Desk")]
    pub position: String,
    #[schema(example = "Starts on the 1st", nullable = true)]
    pub notes: Option<String>,
    /// Defaults to the configured starting balance
    #[schema(example = 60.0, nullable = true)]
    pub requested_pto_balance_hours: Option<f64>,
}

#[derive(Deserialize, ToSchema)]
pub struct DenyRegistration {
    #[schema(example = "Position already filled")]
    pub denial_reason: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct RegistrationFilter {
    #[schema(example = "admin")]
    /// Filter by team
    pub team: Option<String>,
    #[schema(example = "pending")]
    /// Filter by registration status
    pub status: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct RegistrationListResponse {
    pub data: Vec<PendingMember>,
    #[schema(example = 1)]
    pub total: i64,
}

/* =========================
Submit registration
========================= */
/// Swagger doc for submit_registration endpoint
#[utoipa::path(
    post,
    path = "/api/registrations",
    request_body(
        content = CreateRegistration,
        description = "New employee registration payload",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Registration submitted for manager review", body = Object, example = json!({
            "message": "Registration submitted for approval",
            "registration_id": 7
        })),
        (status = 400, description = "Duplicate email, pending registration, or unknown position")
    ),
    tag = "Registrations"
)]
pub async fn submit_registration(
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    mailer: web::Data<EmailService>,
    payload: web::Json<CreateRegistration>,
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
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;
    if !known_position {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": format!("Unknown position '{}' for team '{}'", payload.position, team)
        })));
    }

    let pending: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM pending_members WHERE email = ? AND status = 'pending'",
    )
    .bind(&email_addr)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to check pending registrations");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;
    if pending > 0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "A registration with this email is already pending approval"
        })));
    }

    // Negative filter answer means the SELECT can be skipped entirely
    if email_filter::might_exist(&email_addr) {
        let members: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members WHERE email = ?")
            .bind(&email_addr)
            .fetch_one(pool.get_ref())
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to check existing members");
                actix_web::error::ErrorInternalServerError("Internal Server Error")
            })?;
        if members > 0 {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": "An employee with this email already exists"
            })));
        }
    }

    let now = Utc::now().naive_utc();
    let result = sqlx::query(
        r#"
        INSERT INTO pending_members
            (name, email, team, position, notes, requested_pto_balance_hours, submitted_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(name)
    .bind(&email_addr)
    .bind(&team)
    .bind(&payload.position)
    .bind(payload.notes.as_deref())
    .bind(
        payload
            .requested_pto_balance_hours
            .unwrap_or(config.default_pto_balance_hours),
    )
    .bind(now)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, email = %email_addr, "Failed to create registration");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;
    let registration_id = result.last_insert_rowid();

    let pending = PendingMember {
        id: registration_id,
        name: name.to_string(),
        email: email_addr,
        team,
        position: payload.position.clone(),
        status: "pending".to_string(),
        notes: payload.notes.clone(),
        requested_pto_balance_hours: payload
            .requested_pto_balance_hours
            .unwrap_or(config.default_pto_balance_hours),
        submitted_at: Some(now),
        reviewed_at: None,
        denial_reason: None,
    };
    mailer.send_registration_pending_email(&pending).await;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Registration submitted for approval",
        "registration_id": registration_id
    })))
}

/* =========================
List registrations
========================= */
/// Swagger doc for list_registrations endpoint
#[utoipa::path(
    get,
    path = "/api/registrations",
    params(RegistrationFilter),
    responses(
        (status = 200, description = "Registrations matching the filter", body = RegistrationListResponse)
    ),
    tag = "Registrations"
)]
pub async fn list_registrations(
    pool: web::Data<SqlitePool>,
    query: web::Query<RegistrationFilter>,
) -> actix_web::Result<impl Responder> {
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<&str> = Vec::new();

    if let Some(team) = query.team.as_deref() {
        where_sql.push_str(" AND team = ?");
        args.push(team);
    }
    if let Some(status) = query.status.as_deref() {
        where_sql.push_str(" AND status = ?");
        args.push(status);
    }

    let sql = format!(
        "SELECT * FROM pending_members{} ORDER BY submitted_at DESC, id DESC",
        where_sql
    );
    let mut data_q = sqlx::query_as::<_, PendingMember>(&sql);
    for arg in args {
        data_q = data_q.bind(arg);
    }

    let registrations = data_q.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to fetch registrations");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let total = registrations.len() as i64;
    Ok(HttpResponse::Ok().json(RegistrationListResponse {
        data: registrations,
        total,
    }))
}

/* =========================
Approve registration
========================= */
/// Swagger doc for approve_registration endpoint
#[utoipa::path(
    put,
    path = "/api/registrations/{registration_id}/approve",
    params(
        ("registration_id" = i64, Path, description = "ID of the registration to approve")
    ),
    responses(
        (status = 200, description = "Registration approved, member created", body = Object, example = json!({
            "message": "Registration approved",
            "member_id": 12
        })),
        (status = 400, description = "Already processed or member email taken"),
        (status = 404, description = "Registration not found")
    ),
    tag = "Registrations"
)]
pub async fn approve_registration(
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    staff: web::Data<StaffCache>,
    mailer: web::Data<EmailService>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    let registration_id = path.into_inner();

    let mut tx = pool.begin().await.map_err(|e| {
        error!(error = %e, registration_id, "Failed to open transaction");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let pending =
        sqlx::query_as::<_, PendingMember>("SELECT * FROM pending_members WHERE id = ?")
            .bind(registration_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| {
                error!(error = %e, registration_id, "Failed to fetch registration");
                actix_web::error::ErrorInternalServerError("Internal Server Error")
            })?;
    let Some(pending) = pending else {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Registration not found"
        })));
    };

    let now = Utc::now().naive_utc();
    let result = sqlx::query(
        r#"
        UPDATE pending_members
        SET status = 'approved', reviewed_at = ?
        WHERE id = ?
        AND status = 'pending'
        "#,
    )
    .bind(now)
    .bind(registration_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        error!(error = %e, registration_id, "Approve registration failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;
    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Registration already processed"
        })));
    }

    // The approved member starts with the balance they asked for
    let insert = sqlx::query(
        r#"
        INSERT INTO members
            (name, email, team, position, pto_balance_hours, sick_balance_hours)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&pending.name)
    .bind(&pending.email)
    .bind(&pending.team)
    .bind(&pending.position)
    .bind(pending.requested_pto_balance_hours)
    .bind(config.default_sick_balance_hours)
    .execute(&mut *tx)
    .await;

    let member_id = match insert {
        Ok(res) => res.last_insert_rowid(),
        Err(e) => {
            // UNIQUE constraint on members.email; the rollback keeps the
            // registration pending
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("2067") {
                    return Ok(HttpResponse::BadRequest().json(json!({
                        "message": "A member with this email already exists"
                    })));
                }
            }
            error!(error = %e, registration_id, "Failed to create member from registration");
            return Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })));
        }
    };

    tx.commit().await.map_err(|e| {
        error!(error = %e, registration_id, "Failed to commit approval");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    email_filter::insert(&pending.email);
    staff.invalidate().await;

    let approved = PendingMember {
        status: "approved".to_string(),
        reviewed_at: Some(now),
        ..pending
    };
    mailer.send_registration_decision_email(&approved, true).await;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Registration approved",
        "member_id": member_id
    })))
}

/* =========================
Deny registration
========================= */
/// Swagger doc for deny_registration endpoint
#[utoipa::path(
    put,
    path = "/api/registrations/{registration_id}/deny",
    params(
        ("registration_id" = i64, Path, description = "ID of the registration to deny")
    ),
    request_body(
        content = DenyRegistration,
        description = "Denial reason payload",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Registration denied", body = Object, example = json!({
            "message": "Registration denied"
        })),
        (status = 400, description = "Registration not found or already processed")
    ),
    tag = "Registrations"
)]
pub async fn deny_registration(
    pool: web::Data<SqlitePool>,
    mailer: web::Data<EmailService>,
    path: web::Path<i64>,
    payload: web::Json<DenyRegistration>,
) -> actix_web::Result<impl Responder> {
    let registration_id = path.into_inner();

    let result = sqlx::query(
        r#"
        UPDATE pending_members
        SET status = 'denied', denial_reason = ?, reviewed_at = ?
        WHERE id = ?
        AND status = 'pending'
        "#,
    )
    .bind(payload.denial_reason.as_deref())
    .bind(Utc::now().naive_utc())
    .bind(registration_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, registration_id, "Deny registration failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Registration not found or already processed"
        })));
    }

    let denied =
        sqlx::query_as::<_, PendingMember>("SELECT * FROM pending_members WHERE id = ?")
            .bind(registration_id)
            .fetch_optional(pool.get_ref())
            .await
            .map_err(|e| {
                error!(error = %e, registration_id, "Failed to fetch denied registration");
                actix_web::error::ErrorInternalServerError("Internal Server Error")
            })?;
    if let Some(denied) = denied {
        mailer.send_registration_decision_email(&denied, false).await;
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Registration denied"
    })))
}

#[cfg(test)]
mod tests {
    use crate::api::testing::{peer, seed_member, spawn_app};
    use crate::db::test_pool;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{Value, json};

    fn registration_payload(name: &str, email: &str) -> Value {
        json!({
            "name": name,
            "email": email,
            "team": "admin",
            "position": "CT Desk"
        })
    }

    macro_rules! register {
        ($app:expr, $payload:expr $(,)?) => {{
            let req = test::TestRequest::post()
                .uri("/api/registrations")
                .peer_addr(peer())
                .set_json($payload)
                .to_request();
            test::call_service($app, req).await
        }};
    }

    #[actix_web::test]
    async fn test_register_creates_pending_row() {
        let pool = test_pool().await;
        let app = spawn_app!(pool);

        let resp = register!(&app, registration_payload("New Hire", "new.reg1@example.com"));
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["registration_id"].as_i64().is_some());

        let (status, balance): (String, f64) = sqlx::query_as(
            "SELECT status, requested_pto_balance_hours FROM pending_members WHERE email = ?",
        )
        .bind("new.reg1@example.com")
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(status, "pending");
        assert_eq!(balance, 60.0);
    }

    #[actix_web::test]
    async fn test_register_rejects_duplicate_pending() {
        let pool = test_pool().await;
        let app = spawn_app!(pool);

        for expected in [StatusCode::OK, StatusCode::BAD_REQUEST] {
            let resp = register!(&app, registration_payload("New Hire", "new.reg2@example.com"));
            assert_eq!(resp.status(), expected);
        }
    }

    #[actix_web::test]
    async fn test_register_rejects_existing_member() {
        let pool = test_pool().await;
        seed_member(&pool, "Old Hand", "old.reg3@example.com", "admin", "CT Desk", 60.0, 60.0).await;
        let app = spawn_app!(pool);

        let resp = register!(&app, registration_payload("Old Hand", "old.reg3@example.com"));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_register_rejects_unknown_position() {
        let pool = test_pool().await;
        let app = spawn_app!(pool);

        let mut payload = registration_payload("New Hire", "new.reg4@example.com");
        payload["position"] = json!("Wizard");
        let resp = register!(&app, payload);
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_approve_creates_member_with_requested_balance() {
        let pool = test_pool().await;
        let app = spawn_app!(pool);

        let mut payload = registration_payload("New Hire", "new.reg5@example.com");
        payload["requested_pto_balance_hours"] = json!(45.0);
        let resp = register!(&app, payload);
        let body: Value = test::read_body_json(resp).await;
        let registration_id = body["registration_id"].as_i64().unwrap();

        let req = test::TestRequest::put()
            .uri(&format!("/api/registrations/{}/approve", registration_id))
            .peer_addr(peer())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let (balance, team): (f64, String) =
            sqlx::query_as("SELECT pto_balance_hours, team FROM members WHERE email = ?")
                .bind("new.reg5@example.com")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(balance, 45.0);
        assert_eq!(team, "admin");

        let status: String =
            sqlx::query_scalar("SELECT status FROM pending_members WHERE id = ?")
                .bind(registration_id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(status, "approved");
    }

    #[actix_web::test]
    async fn test_approve_twice_fails() {
        let pool = test_pool().await;
        let app = spawn_app!(pool);

        let resp = register!(&app, registration_payload("New Hire", "new.reg6@example.com"));
        let body: Value = test::read_body_json(resp).await;
        let registration_id = body["registration_id"].as_i64().unwrap();

        for expected in [StatusCode::OK, StatusCode::BAD_REQUEST] {
            let req = test::TestRequest::put()
                .uri(&format!("/api/registrations/{}/approve", registration_id))
                .peer_addr(peer())
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), expected);
        }

        let members: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members WHERE email = ?")
            .bind("new.reg6@example.com")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(members, 1);
    }

    #[actix_web::test]
    async fn test_approved_member_can_submit_requests() {
        let pool = test_pool().await;
        let app = spawn_app!(pool);

        let resp = register!(&app, registration_payload("New Hire", "new.reg7@example.com"));
        let body: Value = test::read_body_json(resp).await;
        let registration_id = body["registration_id"].as_i64().unwrap();

        let req = test::TestRequest::put()
            .uri(&format!("/api/registrations/{}/approve", registration_id))
            .peer_addr(peer())
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::post()
            .uri("/api/requests")
            .peer_addr(peer())
            .set_json(json!({
                "name": "New Hire",
                "email": "new.reg7@example.com",
                "start_date": "2025-09-22",
                "end_date": "2025-09-22",
                "pto_type": "Vacation"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_deny_stores_reason() {
        let pool = test_pool().await;
        let app = spawn_app!(pool);

        let resp = register!(&app, registration_payload("New Hire", "new.reg8@example.com"));
        let body: Value = test::read_body_json(resp).await;
        let registration_id = body["registration_id"].as_i64().unwrap();

        let req = test::TestRequest::put()
            .uri(&format!("/api/registrations/{}/deny", registration_id))
            .peer_addr(peer())
            .set_json(json!({"denial_reason": "Position already filled"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let (status, reason): (String, Option<String>) =
            sqlx::query_as("SELECT status, denial_reason FROM pending_members WHERE id = ?")
                .bind(registration_id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(status, "denied");
        assert_eq!(reason.as_deref(), Some("Position already filled"));

        // No member was created
        let members: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members WHERE email = ?")
            .bind("new.reg8@example.com")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(members, 0);
    }

    #[actix_web::test]
    async fn test_list_filters_by_team_and_status() {
        let pool = test_pool().await;
        let app = spawn_app!(pool);

        let resp = register!(&app, registration_payload("Admin Hire", "admin.reg9@example.com"));
        assert_eq!(resp.status(), StatusCode::OK);
        let resp = register!(
            &app,
            json!({
                "name": "Clinical Hire",
                "email": "clinical.reg9@example.com",
                "team": "clinical",
                "position": "APP"
            }),
        );
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/api/registrations?team=admin&status=pending")
            .peer_addr(peer())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["data"][0]["email"], "admin.reg9@example.com");
    }
}
