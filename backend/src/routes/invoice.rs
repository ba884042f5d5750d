use axum::extract::{Query, State};
use axum::Json;
use roulette_shared::api::{InvoiceQuery, InvoiceResponse};
use roulette_shared::PriceTier;
use tracing::{error, info, warn};

use super::AppState;
use crate::auth::{authenticate, resolve_init_data, InitDataHeader};
use crate::error::ApiError;
use crate::telegram::InvoiceLink;

fn parse_tier(amount: Option<&str>) -> Result<PriceTier, ApiError> {
    let amount: u32 = amount
        .and_then(|raw| raw.trim().parse().ok())
        .ok_or(ApiError::InvalidAmount)?;
    PriceTier::try_from(amount).map_err(|_| {
        warn!("Invoice requested for unsupported amount {}", amount);
        ApiError::InvalidAmount
    })
}

pub async fn create_invoice(
    State(state): State<AppState>,
    InitDataHeader(header): InitDataHeader,
    Query(query): Query<InvoiceQuery>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    let (init_data, source) = resolve_init_data(header, query.init_data);
    info!(
        "Invoice requested: amount={:?}, init data from {}",
        query.amount,
        source.as_str()
    );

    let tier = parse_tier(query.amount.as_deref())?;
    let user = authenticate(&state.config, init_data.as_deref())?;

    let invoice = InvoiceLink::stars(tier, user.id);
    let link = state.bot.create_invoice_link(&invoice).await.map_err(|e| {
        error!("Invoice creation failed for user {} ({} stars): {}", user.id, tier, e);
        ApiError::InvoiceCreationFailed
    })?;

    info!("Invoice created for user {} ({} stars)", user.id, tier);
    Ok(Json(InvoiceResponse::new(link)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;

    use crate::routes::test_support::*;
    use crate::telegram::InvoiceLink;

    fn get(uri: &str, init_data: Option<&str>) -> Request<Body> {
        let mut request = Request::get(uri);
        if let Some(init_data) = init_data {
            request = request.header("X-Telegram-Init-Data", init_data);
        }
        request.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_creates_stars_invoice() {
        let bot = Arc::new(FakeBot::default());
        let init_data = signed_init_data(42);
        let (status, body) = send(test_app(bot.clone(), &[]), get("/api/invoice?amount=50", Some(&init_data))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "invoice_link": "https://t.me/$invoice", "invoiceLink": "https://t.me/$invoice" }));
        assert_eq!(
            bot.calls(),
            vec![BotCall::InvoiceLink(InvoiceLink::stars(roulette_shared::PriceTier::Stars50, 42))]
        );
    }

    #[tokio::test]
    async fn test_init_data_from_query() {
        let bot = Arc::new(FakeBot::default());
        let init_data = signed_init_data(7);
        let uri = format!(
            "/api/invoice?amount=25&init_data={}",
            url::form_urlencoded::byte_serialize(init_data.as_bytes()).collect::<String>()
        );
        let (status, _) = send(test_app(bot, &[]), get(&uri, None)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_amount_checked_before_init_data() {
        let bot = Arc::new(FakeBot::default());
        for uri in ["/api/invoice", "/api/invoice?amount=abc", "/api/invoice?amount=30"] {
            let (status, body) = send(test_app(bot.clone(), &[]), get(uri, None)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(body, json!({ "error": "invalid_amount" }));
        }
        assert!(bot.calls().is_empty());
    }

    #[tokio::test]
    async fn test_rejects_unsigned_init_data() {
        let bot = Arc::new(FakeBot::default());
        let (status, body) = send(test_app(bot.clone(), &[]), get("/api/invoice?amount=25", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "invalid_init_data" }));

        let forged = signed_init_data(42).replace("hash=", "hash=00");
        let (status, _) = send(test_app(bot.clone(), &[]), get("/api/invoice?amount=25", Some(&forged))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(bot.calls().is_empty());
    }

    #[tokio::test]
    async fn test_bot_failure() {
        let bot = Arc::new(FakeBot { fail: true, ..Default::default() });
        let init_data = signed_init_data(42);
        let (status, body) = send(test_app(bot, &[]), get("/api/invoice?amount=100", Some(&init_data))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "invoice_creation_failed" }));
    }
}
