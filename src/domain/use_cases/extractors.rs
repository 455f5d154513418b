use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};

/// Identity of the caller.
///
/// This crate never inserts it. An authentication middleware mounted in
/// front of the product routes is expected to call
/// `req.extensions_mut().insert(AuthenticatedUser { .. })`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: String,
}

/// Extractor for the caller's user id; `anonymous` when no identity was attached.
/// Usage: Add `user: CurrentUser` as a parameter to your handler function.
#[derive(Debug)]
pub struct CurrentUser(pub String);

impl FromRequest for CurrentUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let id = req
            .extensions()
            .get::<AuthenticatedUser>()
            .map(|user| user.id.clone())
            .unwrap_or_else(|| "anonymous".to_string());
        ready(Ok(CurrentUser(id)))
    }
}

/// Reads named path parameters from a request.
///
/// Handlers receive this through `AppState` so tests can stand in their own.
pub trait RouteParamExtractor: Send + Sync {
    fn param(&self, req: &HttpRequest, name: &str) -> Option<String>;
}

/// Production extractor backed by the router's match info.
#[derive(Debug, Default, Clone, Copy)]
pub struct MatchInfoParams;

impl RouteParamExtractor for MatchInfoParams {
    fn param(&self, req: &HttpRequest, name: &str) -> Option<String> {
        req.match_info()
            .get(name)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }
}
