use actix_web::web;

use crate::handlers::{admin::admin_dashboard, system::admin_health_check};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/dashboard", web::get().to(admin_dashboard))
            .route("/health", web::get().to(admin_health_check)),
    );
}
