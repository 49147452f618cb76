use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use dotenvy::dotenv;

mod api;
mod config;
mod db;
mod email;
mod model;
mod routes;
mod utils;
mod workdays;
mod docs;

use config::Config;
use db::init_db;
use email::EmailService;

use crate::utils::email_filter;
use crate::utils::staff_cache::{self, StaffCache};
use crate::workdays::{FederalHolidayProvider, MissingYearPolicy};
use tracing::info;
use tracing_appender::rolling;
use utoipa_swagger_ui::SwaggerUi;
use crate::docs::ApiDoc;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()

#[get("/")]
async fn index() -> impl Responder {
    "PTO Tracker is running"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let pool = init_db(&config.database_url).await;

    let staff_cache = StaffCache::new();
    let holidays = FederalHolidayProvider::new(
        config.observed_holidays,
        config.holiday_first_year,
        config.holiday_last_year,
        if config.missing_year_fallback {
            MissingYearPolicy::EmptySet
        } else {
            MissingYearPolicy::Error
        },
    );
    let mailer = EmailService::from_config(&config);

    let pool_for_filter_warmup = pool.clone();
    let pool_for_cache_warmup = pool.clone();
    let cache_for_warmup = staff_cache.clone();
    // Clone values for the closure (avoid move issues)
    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    actix_web::rt::spawn(async move {
        if let Err(e) = email_filter::warmup_email_filter(&pool_for_filter_warmup, 500).await {
            eprintln!("Failed to warmup email filter: {:?}", e);
        }
    });

    actix_web::rt::spawn(async move {
        if let Err(e) =
            staff_cache::warmup_staff_directory(&cache_for_warmup, &pool_for_cache_warmup).await
        {
            eprintln!("Failed to warmup staff directory: {:?}", e);
        }
    });

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(pool.clone()))
            .app_data(Data::new(config.clone()))
            .app_data(Data::new(holidays.clone()))
            .app_data(Data::new(staff_cache.clone()))
            .app_data(Data::new(mailer.clone()))
            .service(index)
            // Request, employee, registration, calendar and directory routes
            // with rate limiting
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(server_addr)?
    .run()
    .await
}
