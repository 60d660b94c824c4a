use axum::extract::Request;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use service::permission::{Actor, ActorRole};
use tracing::warn;
use uuid::Uuid;

/// The acting user of a request, `None` for anonymous requests.
pub type Context = Option<Actor>;

pub const ACTOR_ID_HEADER: &str = "x-actor-id";
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

pub fn actor_from_headers(headers: &HeaderMap) -> Option<Actor> {
    let role = header_value(headers, ACTOR_ROLE_HEADER)?;
    let Some(role) = ActorRole::parse(role) else {
        warn!("Ignoring unknown actor role {}", role);
        return None;
    };
    let id = match header_value(headers, ACTOR_ID_HEADER) {
        Some(id) => match Uuid::parse_str(id) {
            Ok(id) => Some(id),
            Err(_) => {
                warn!("Ignoring malformed actor id {}", id);
                None
            }
        },
        None => None,
    };
    Some(Actor::new(id, role))
}

#[cfg(feature = "mock_auth")]
fn fallback_actor() -> Context {
    Some(Actor::new(None, ActorRole::Manager))
}
#[cfg(not(feature = "mock_auth"))]
fn fallback_actor() -> Context {
    None
}

/// Puts the request's [`Context`] into the request extensions.
///
/// The actor headers are trusted as sent. This service performs no token
/// verification, so it must only be reachable through a gateway which
/// authenticates the caller and overwrites `x-actor-id` and `x-actor-role`.
/// Requests without a role header fall back to the anonymous context, or to
/// a manager when built with the `mock_auth` feature.
pub async fn context_extractor(mut request: Request, next: Next) -> Response {
    let context: Context = if request.headers().contains_key(ACTOR_ROLE_HEADER) {
        actor_from_headers(request.headers())
    } else {
        fallback_actor()
    };
    request.extensions_mut().insert(context);
    next.run(request).await
}
