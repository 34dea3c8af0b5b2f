use actix_web::web;

use crate::handlers::{conversations, inbox};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/inbox").route(web::get().to(inbox::get_inbox)));

    cfg.service(
        web::scope("/conversations")
            .service(web::resource("").route(web::get().to(conversations::list_conversations)))
            .service(
                web::resource("/{conversation_id}/messages")
                    .route(web::get().to(conversations::get_messages))
                    .route(web::post().to(conversations::send_message)),
            )
            .service(web::resource("/{conversation_id}/events").route(web::get().to(conversations::conversation_events)))
            .service(web::resource("/{conversation_id}/read").route(web::post().to(conversations::mark_read))),
    );
}
