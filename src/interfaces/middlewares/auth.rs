use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::{Method, StatusCode},
    web, Error, HttpMessage,
};
use futures_util::future::{ok, LocalBoxFuture, Ready};
use std::{
    rc::Rc,
    task::{Context, Poll},
};

use crate::{entities::token::Claims, errors::AuthError, handlers::json_error::json_error, AppState};

/// Verifies the bearer token on every non-public route and stores its
/// [`Claims`] in the request extensions.
pub struct AuthMiddleware;

impl<S> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Rc::new(service),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            if is_public_route(req.path(), req.method()) {
                return service.call(req).await;
            }

            let claims = match get_valid_claims(&req) {
                Ok(claims) => claims,
                Err(AuthError::MissingJwtService) => {
                    tracing::error!("AppState missing in auth middleware");
                    let res = json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", "");
                    return Ok(req.into_response(res));
                }
                Err(e) => {
                    tracing::warn!(path = req.path(), error = %e, "Rejected unauthenticated request");
                    let details = match e {
                        AuthError::TokenExpired => "Token has expired",
                        AuthError::MissingCredentials => "Missing bearer token",
                        _ => "Invalid token",
                    };
                    let res = json_error(StatusCode::UNAUTHORIZED, "Unauthorized", details);
                    return Ok(req.into_response(res));
                }
            };

            if req.path().starts_with("/api/v1/admin") && !claims.is_admin() {
                tracing::warn!(path = req.path(), sub = %claims.sub, "Admin access required");
                let res = json_error(StatusCode::FORBIDDEN, "Forbidden", "Admin access required");
                return Ok(req.into_response(res));
            }

            req.extensions_mut().insert(claims);
            service.call(req).await
        })
    }
}

pub fn is_public_route(path: &str, method: &Method) -> bool {
    if *method == Method::OPTIONS {
        return true;
    }
    if *method != Method::GET {
        return false;
    }
    if matches!(path, "/" | "/api/v1/github/callback" | "/api/v1/developers") {
        return true;
    }

    // Public developer pages and their social cards.
    let Some(rest) = path.strip_prefix("/api/v1/developers/") else {
        return false;
    };
    let segments: Vec<&str> = rest.split('/').collect();
    matches!(segments.as_slice(), [id] | [id, "card.svg"] if !id.is_empty())
}

/// Bearer token from the `Authorization` header. Event streams may pass it as
/// `?access_token=` instead, since browsers' `EventSource` cannot set headers.
fn extract_token(req: &ServiceRequest) -> Option<String> {
    let from_header = req
        .headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| {
            let parts: Vec<&str> = header.split_whitespace().collect();
            if parts.len() == 2 && parts[0].eq_ignore_ascii_case("bearer") {
                Some(parts[1].to_string())
            } else {
                None
            }
        });

    from_header.or_else(|| {
        if !req.path().ends_with("/events") {
            return None;
        }
        web::Query::<std::collections::HashMap<String, String>>::from_query(req.query_string())
            .ok()
            .and_then(|query| query.get("access_token").cloned())
            .filter(|token| !token.is_empty())
    })
}

fn get_valid_claims(req: &ServiceRequest) -> Result<Claims, AuthError> {
    let state = req.app_data::<web::Data<AppState>>().ok_or(AuthError::MissingJwtService)?;

    let token = extract_token(req).ok_or(AuthError::MissingCredentials)?;
    let decoded = state.token_service.decode_jwt(&token)?;
    decoded.claims.user_id()?;
    Ok(decoded.claims)
}
