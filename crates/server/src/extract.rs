use axum::{extract::FromRequestParts, http::request::Parts};
use models::actor::Actor;
use std::convert::Infallible;

/// Header naming the caller on whose behalf a request writes
pub const ACTOR_HEADER: &str = "x-actor";

/// The acting principal, taken from `X-Actor`. Missing or unreadable headers
/// fall back to the anonymous actor.
#[derive(Debug, Clone)]
pub struct RequestActor(pub Actor);

impl<S> FromRequestParts<S> for RequestActor
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let actor = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(Actor::new)
            .unwrap_or_default();

        Ok(Self(actor))
    }
}
