use std::convert::Infallible;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use roulette_shared::constants::INIT_DATA_HEADER;

/// Raw `X-Telegram-Init-Data` header, if the client sent one. Verification
/// happens in the handler so request validation errors keep their order.
#[derive(Debug, Clone, Default)]
pub struct InitDataHeader(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for InitDataHeader
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(INIT_DATA_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        Ok(InitDataHeader(value))
    }
}
