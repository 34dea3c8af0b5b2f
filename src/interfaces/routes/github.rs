use actix_web::web;

use crate::handlers::github;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/github")
            .route("/connect", web::post().to(github::connect_github))
            .route("/callback", web::get().to(github::github_callback))
            .route("/validate", web::post().to(github::validate_skills)),
    );
}
