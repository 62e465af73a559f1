use crate::{
    api::{calendar, employee, leave_request},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{guard, web};
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let requests_per_min = requests_per_min.max(1);
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond((60_000 / requests_per_min as u64).max(1))
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .expect("period and burst size are non-zero");
        Governor::new(&cfg)
    }

    let apply_limiter = Arc::new(build_limiter(config.rate_apply_per_min));
    let upload_limiter = Arc::new(build_limiter(config.rate_upload_per_min));
    let read_limiter = Arc::new(build_limiter(config.rate_read_per_min));

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(read_limiter)
            .service(
                web::resource("/calendar").route(web::get().to(calendar::month_calendar)),
            )
            .service(
                web::scope("/employees")
                    // /employees
                    .service(web::resource("").route(web::get().to(employee::list_employees)))
                    // /employees/{name}/stats
                    .service(
                        web::resource("/{name}/stats")
                            .route(web::get().to(employee::employee_stats)),
                    ),
            )
            .service(
                web::scope("/leave")
                    // POST /leave, throttled separately from reads
                    .service(
                        web::resource("")
                            .guard(guard::Post())
                            .wrap(apply_limiter)
                            .route(web::post().to(leave_request::create_leave)),
                    )
                    // GET /leave
                    .service(web::resource("").route(web::get().to(leave_request::leave_list)))
                    // /leave/types
                    .service(
                        web::resource("/types").route(web::get().to(leave_request::leave_types)),
                    )
                    // /leave/export
                    .service(
                        web::resource("/export")
                            .route(web::get().to(leave_request::export_leaves)),
                    )
                    // /leave/upload
                    .service(
                        web::resource("/upload")
                            .wrap(upload_limiter)
                            .route(web::post().to(leave_request::upload_leaves)),
                    )
                    // /leave/{id}
                    .service(
                        web::resource("/{id}").route(web::get().to(leave_request::get_leave)),
                    ),
            ),
    );
}
