use crate::{
    api::{attendance, cash_advance, employee, payroll, request},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap()
    }

    // Imports and publishes churn the database; they get tighter buckets.
    let import_limiter = build_limiter(config.rate_import_per_min);
    let publish_limiter = build_limiter(config.rate_publish_per_min);
    let general_limiter = build_limiter(config.rate_general_per_min);

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(Governor::new(&general_limiter))
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(employee::update_employee))
                            .route(web::get().to(employee::get_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    ),
            )
            .service(
                web::scope("/requests")
                    // /requests
                    .service(
                        web::resource("")
                            .route(web::get().to(request::list_requests))
                            .route(web::post().to(request::create_request)),
                    )
                    // /requests/{id}
                    .service(web::resource("/{id}").route(web::get().to(request::get_request)))
                    // /requests/{id}/approve
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(request::approve_request)),
                    )
                    // /requests/{id}/reject
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::put().to(request::reject_request)),
                    ),
            )
            .service(
                web::scope("/cash-advances").service(
                    web::resource("")
                        .route(web::post().to(cash_advance::create_cash_advance))
                        .route(web::get().to(cash_advance::list_cash_advances)),
                ),
            )
            .service(
                web::scope("/attendance")
                    // /attendance/import
                    .service(
                        web::resource("/import")
                            .wrap(Governor::new(&import_limiter))
                            .route(web::post().to(attendance::import_attendance)),
                    )
                    // /attendance/process
                    .service(
                        web::resource("/process")
                            .wrap(Governor::new(&import_limiter))
                            .route(web::post().to(attendance::process_attendance)),
                    )
                    // /attendance
                    .service(
                        web::resource("").route(web::get().to(attendance::list_attendance)),
                    )
                    // /attendance/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(attendance::override_attendance)),
                    ),
            )
            .service(
                web::scope("/payroll/drafts")
                    // /payroll/drafts
                    .service(
                        web::resource("")
                            .wrap(Governor::new(&publish_limiter))
                            .route(web::post().to(payroll::publish_draft))
                            .route(web::get().to(payroll::list_drafts)),
                    )
                    // /payroll/drafts/{id}
                    .service(web::resource("/{id}").route(web::get().to(payroll::get_draft)))
                    .service(
                        web::resource("/{id}/submit")
                            .route(web::put().to(payroll::submit_draft)),
                    )
                    .service(
                        web::resource("/{id}/approve-exec")
                            .route(web::put().to(payroll::approve_exec)),
                    )
                    .service(
                        web::resource("/{id}/approve-admin")
                            .route(web::put().to(payroll::approve_admin)),
                    )
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::put().to(payroll::reject_draft)),
                    )
                    .service(
                        web::resource("/{id}/publish-payslips")
                            .wrap(Governor::new(&publish_limiter))
                            .route(web::put().to(payroll::publish_all_payslips)),
                    ),
            )
            .service(
                web::scope("/payslips")
                    // /payslips
                    .service(web::resource("").route(web::get().to(payroll::list_payslips)))
                    // /payslips/{id}/publish
                    .service(
                        web::resource("/{id}/publish")
                            .route(web::put().to(payroll::publish_payslip)),
                    ),
            ),
    );
}

// PUBLISH CUTOFF
//  ├─ draft (lines built from attendance + approved requests)
//  ├─ pending_exec (submit)
//  ├─ pending_admin (enough exec approvals)
//  └─ approved (admin) → payslips generated
