use actix_web::web;

use crate::{constants::API_PREFIX, handlers::home::home};

mod admin;
mod developers;
mod github;
mod json_error;
mod matches;
mod me;
mod messaging;
mod projects;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);

    cfg.service(
        web::scope(API_PREFIX)
            .configure(me::config_routes)
            .configure(developers::config_routes)
            .configure(projects::config_routes)
            .configure(github::config_routes)
            .configure(matches::config_routes)
            .configure(messaging::config_routes)
            .configure(admin::config_routes),
    );

    cfg.configure(json_error::config_routes);
}
