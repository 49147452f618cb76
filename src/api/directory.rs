use actix_web::{HttpResponse, Responder, web};
use sqlx::SqlitePool;
use std::collections::BTreeMap;

use crate::model::position::Position;
use crate::utils::staff_cache::StaffCache;

/// for getting the staff directory endpoint
#[utoipa::path(
    get,
    path = "/api/staff-directory",
    responses(
        (status = 200, description = "Active members grouped by team and position",
         body = Object,
         example = json!({
            "clinical": {
                "CVI RNs": [{"name": "Jane Doe", "email": "jane.doe@example.com"}]
            }
         })
        )
    ),
    tag = "Directory"
)]
pub async fn staff_directory(
    pool: web::Data<SqlitePool>,
    staff: web::Data<StaffCache>,
) -> actix_web::Result<impl Responder> {
    let directory = staff.get(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to load staff directory");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(&*directory))
}

/// for rebuilding the staff directory cache endpoint
#[utoipa::path(
    post,
    path = "/api/staff-directory/refresh",
    responses(
        (status = 200, description = "Directory reloaded from the database", body = Object, example = json!({
            "message": "Staff directory refreshed",
            "teams": 2
        }))
    ),
    tag = "Directory"
)]
pub async fn refresh_staff_directory(
    pool: web::Data<SqlitePool>,
    staff: web::Data<StaffCache>,
) -> actix_web::Result<impl Responder> {
    let directory = staff.refresh(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to refresh staff directory");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Staff directory refreshed",
        "teams": directory.len()
    })))
}

/// for getting the available positions endpoint
#[utoipa::path(
    get,
    path = "/api/positions",
    responses(
        (status = 200, description = "Position names grouped by team",
         body = Object,
         example = json!({
            "admin": ["CT Desk", "Front Desk/Admin"],
            "clinical": ["APP", "CVI RNs"]
         })
        )
    ),
    tag = "Directory"
)]
pub async fn positions(pool: web::Data<SqlitePool>) -> actix_web::Result<impl Responder> {
    let rows = sqlx::query_as::<_, Position>("SELECT * FROM positions ORDER BY team, name")
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch positions");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for position in rows {
        map.entry(position.team).or_default().push(position.name);
    }

    Ok(HttpResponse::Ok().json(map))
}

#[cfg(test)]
mod tests {
    use crate::api::testing::{peer, seed_member, spawn_app};
    use crate::db::test_pool;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::Value;

    #[actix_web::test]
    async fn test_staff_directory_groups_members() {
        let pool = test_pool().await;
        seed_member(&pool, "Jane Doe", "jane.dir1@example.com", "clinical", "CVI RNs", 60.0, 60.0).await;
        seed_member(&pool, "Bob Stone", "bob.dir1@example.com", "admin", "CT Desk", 60.0, 60.0).await;
        let app = spawn_app!(pool);

        let req = test::TestRequest::get()
            .uri("/api/staff-directory")
            .peer_addr(peer())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["clinical"]["CVI RNs"][0]["name"], "Jane Doe");
        assert_eq!(body["admin"]["CT Desk"][0]["email"], "bob.dir1@example.com");
    }

    #[actix_web::test]
    async fn test_refresh_picks_up_new_members() {
        let pool = test_pool().await;
        let app = spawn_app!(pool);

        // Prime the cache while the directory is empty
        let req = test::TestRequest::get()
            .uri("/api/staff-directory")
            .peer_addr(peer())
            .to_request();
        let resp = test::call_service(&app, req).await;
        let body: Value = test::read_body_json(resp).await;
        assert!(body.as_object().unwrap().is_empty());

        seed_member(&pool, "Late Arrival", "late.dir2@example.com", "admin", "CT Desk", 60.0, 60.0).await;

        let req = test::TestRequest::post()
            .uri("/api/staff-directory/refresh")
            .peer_addr(peer())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["teams"], 1);

        let req = test::TestRequest::get()
            .uri("/api/staff-directory")
            .peer_addr(peer())
            .to_request();
        let resp = test::call_service(&app, req).await;
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["admin"]["CT Desk"][0]["name"], "Late Arrival");
    }

    #[actix_web::test]
    async fn test_positions_map_from_seed() {
        let pool = test_pool().await;
        let app = spawn_app!(pool);

        let req = test::TestRequest::get()
            .uri("/api/positions")
            .peer_addr(peer())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["admin"].as_array().unwrap().len(), 4);
        assert_eq!(body["clinical"].as_array().unwrap().len(), 11);
        assert!(body["admin"].as_array().unwrap().contains(&Value::from("CT Desk")));
    }
}
