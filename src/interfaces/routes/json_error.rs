use actix_web::{
    error::{InternalError, JsonPayloadError, QueryPayloadError},
    http::StatusCode,
    web,
};

use crate::handlers::json_error::json_error;

/// Turns body and query-string extraction failures into 400 JSON bodies.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().limit(64 * 1024).error_handler(|err, _req| {
        let status = match &err {
            JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            JsonPayloadError::ContentType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            _ => StatusCode::BAD_REQUEST,
        };
        let response = json_error(status, "Invalid JSON payload", &err.to_string());
        InternalError::from_response(err, response).into()
    }));

    cfg.app_data(web::QueryConfig::default().error_handler(|err: QueryPayloadError, _req| {
        let response = json_error(StatusCode::BAD_REQUEST, "Invalid query string", &err.to_string());
        InternalError::from_response(err, response).into()
    }));
}
