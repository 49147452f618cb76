use crate::{
    api::{calendar, directory, member, pto_request, registration},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    // Public submission endpoints get a tighter budget than the dashboards
    let submit_limiter = Arc::new(build_limiter(config.rate_submit_per_min));
    let api_limiter = Arc::new(build_limiter(config.rate_api_per_min));

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(api_limiter) // rate limiting
            .service(
                web::scope("/requests")
                    // /requests
                    .service(
                        web::resource("")
                            .wrap(submit_limiter.clone())
                            .route(web::post().to(pto_request::submit_request))
                            .route(web::get().to(pto_request::list_requests)),
                    )
                    // /requests/{id}
                    .service(
                        web::resource("/{id}").route(web::get().to(pto_request::get_request)),
                    )
                    // /requests/{id}/approve
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(pto_request::approve_request)),
                    )
                    // /requests/{id}/deny
                    .service(
                        web::resource("/{id}/deny")
                            .route(web::put().to(pto_request::deny_request)),
                    )
                    // /requests/{id}/cancel
                    .service(
                        web::resource("/{id}/cancel")
                            .route(web::put().to(pto_request::cancel_request)),
                    )
                    // /requests/{id}/workflow
                    .service(
                        web::resource("/{id}/workflow")
                            .route(web::put().to(pto_request::update_workflow)),
                    ),
            )
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::post().to(member::create_member))
                            .route(web::get().to(member::list_members)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(member::get_member))
                            .route(web::put().to(member::update_member))
                            .route(web::delete().to(member::delete_member)),
                    )
                    // /employees/{id}/summary
                    .service(
                        web::resource("/{id}/summary")
                            .route(web::get().to(member::member_summary)),
                    ),
            )
            .service(
                web::scope("/registrations")
                    // /registrations
                    .service(
                        web::resource("")
                            .wrap(submit_limiter)
                            .route(web::post().to(registration::submit_registration))
                            .route(web::get().to(registration::list_registrations)),
                    )
                    // /registrations/{id}/approve
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(registration::approve_registration)),
                    )
                    // /registrations/{id}/deny
                    .service(
                        web::resource("/{id}/deny")
                            .route(web::put().to(registration::deny_registration)),
                    ),
            )
            .service(
                web::resource("/calendar/events")
                    .route(web::get().to(calendar::calendar_events)),
            )
            .service(
                web::resource("/business-days")
                    .route(web::get().to(calendar::business_day_breakdown)),
            )
            .service(
                web::resource("/staff-directory")
                    .route(web::get().to(directory::staff_directory)),
            )
            .service(
                web::resource("/staff-directory/refresh")
                    .route(web::post().to(directory::refresh_staff_directory)),
            )
            .service(web::resource("/positions").route(web::get().to(directory::positions))),
    );
}

// SUBMIT
//  └─ POST /api/requests (duration computed and stored once)
//
// REVIEW
//  ├─ PUT /api/requests/{id}/approve  → balance debit
//  ├─ PUT /api/requests/{id}/deny     → no balance movement
//  └─ PUT /api/requests/{id}/cancel   → restore if previously approved
