use actix_web::web;

use crate::handlers::{profiles, skills};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/me")
            .service(
                web::resource("")
                    .route(web::get().to(profiles::get_me))
                    .route(web::put().to(profiles::upsert_profile)),
            )
            .service(web::resource("/developer").route(web::put().to(profiles::upsert_developer_profile)))
            .service(web::resource("/company").route(web::put().to(profiles::upsert_company_profile)))
            .service(
                web::resource("/skills")
                    .route(web::get().to(skills::list_my_skills))
                    .route(web::post().to(skills::add_skill)),
            )
            .service(web::resource("/skills/{skill_id}").route(web::delete().to(skills::remove_skill))),
    );
}
