use actix_web::web;

use crate::handlers::developers;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/developers")
            .service(web::resource("").route(web::get().to(developers::search_developers)))
            .service(web::resource("/{developer_id}").route(web::get().to(developers::get_developer)))
            .service(web::resource("/{developer_id}/card.svg").route(web::get().to(developers::social_card))),
    );
}
