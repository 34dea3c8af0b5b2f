use actix_web::web;

use crate::handlers::matches;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/matches")
            .service(
                web::resource("")
                    .route(web::get().to(matches::list_matches))
                    .route(web::post().to(matches::create_match)),
            )
            .service(web::resource("/{match_id}").route(web::get().to(matches::get_match)))
            .service(web::resource("/{match_id}/respond").route(web::post().to(matches::respond_to_match))),
    );
}
