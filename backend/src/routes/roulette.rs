use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use roulette_shared::api::RouletteWinResponse;
use serde_json::Value;
use tracing::{error, info, warn};

use super::AppState;
use crate::auth::{authenticate, resolve_init_data, InitDataHeader};
use crate::error::ApiError;
use crate::gifts::telegram_gift;

/// Body fields after type checks. The body is read as loose JSON so every
/// type error maps to its own error code.
#[derive(Debug, PartialEq)]
struct WinRequest {
    gift_key: String,
    spin_price: Option<u64>,
    init_data: Option<String>,
}

fn parse_win_request(body: &[u8]) -> Result<WinRequest, ApiError> {
    let payload: Value = serde_json::from_slice(body).map_err(|_| ApiError::InvalidJson)?;
    let Value::Object(fields) = payload else {
        return Err(ApiError::InvalidJson);
    };

    let gift_key = match fields.get("gift_key") {
        Some(Value::String(key)) if !key.is_empty() => key.clone(),
        _ => return Err(ApiError::InvalidGiftKey),
    };

    let init_data = match fields.get("init_data") {
        None | Some(Value::Null) => None,
        Some(Value::String(raw)) => Some(raw.clone()),
        Some(_) => return Err(ApiError::MalformedInitData),
    };

    let spin_price = match fields.get("spin_price") {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => match n.as_u64() {
            Some(price) if price > 0 => Some(price),
            _ => return Err(ApiError::InvalidSpinPrice),
        },
        Some(_) => return Err(ApiError::InvalidSpinPrice),
    };

    Ok(WinRequest { gift_key, spin_price, init_data })
}

pub async fn record_win(
    State(state): State<AppState>,
    InitDataHeader(header): InitDataHeader,
    body: Bytes,
) -> Result<Json<RouletteWinResponse>, ApiError> {
    let request = parse_win_request(&body)?;
    let (init_data, _) = resolve_init_data(header, request.init_data);
    let user = authenticate(&state.config, init_data.as_deref())?;

    let Some((gift_id, gift)) = telegram_gift(&request.gift_key) else {
        warn!("Gift not supported: {}", request.gift_key);
        return Err(ApiError::GiftNotSupported);
    };

    if let Err(e) = state.bot.send_gift(user.id, gift.gift_id).await {
        error!("Failed to send {} ({}) to user {}: {}", gift.name, gift_id, user.id, e);
        return Err(ApiError::GiftSendFailed);
    }

    info!(
        "Gift sent: user={}, gift={} ({}), telegram id {}, spin price {:?}",
        user.id, gift_id, gift.name, gift.gift_id, request.spin_price
    );
    Ok(Json(RouletteWinResponse { ok: true }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;

    use super::*;
    use crate::routes::test_support::*;

    fn post(body: Value, init_data: Option<&str>) -> Request<Body> {
        let mut request = Request::post("/api/roulette/win").header("Content-Type", "application/json");
        if let Some(init_data) = init_data {
            request = request.header("X-Telegram-Init-Data", init_data);
        }
        request.body(Body::from(body.to_string())).unwrap()
    }

    #[test]
    fn test_body_validation_codes() {
        assert_eq!(parse_win_request(b"{nope"), Err(ApiError::InvalidJson));
        assert_eq!(parse_win_request(b"[]"), Err(ApiError::InvalidJson));
        assert_eq!(parse_win_request(br#"{"gift_key":""}"#), Err(ApiError::InvalidGiftKey));
        assert_eq!(parse_win_request(br#"{"gift_key":5}"#), Err(ApiError::InvalidGiftKey));
        assert_eq!(
            parse_win_request(br#"{"gift_key":"rose","init_data":1}"#),
            Err(ApiError::MalformedInitData)
        );
        for price in ["0", "-5", "2.5", "\"25\""] {
            let body = format!(r#"{{"gift_key":"rose","spin_price":{}}}"#, price);
            assert_eq!(parse_win_request(body.as_bytes()), Err(ApiError::InvalidSpinPrice), "{}", price);
        }
        assert_eq!(
            parse_win_request(br#"{"gift_key":"rose","spin_price":null}"#),
            Ok(WinRequest { gift_key: "rose".into(), spin_price: None, init_data: None })
        );
    }

    #[tokio::test]
    async fn test_sends_won_gift() {
        let bot = Arc::new(FakeBot::default());
        let init_data = signed_init_data(42);
        let (status, body) = send(
            test_app(bot.clone(), &[]),
            post(json!({ "gift_key": "heart-box", "spin_price": 25 }), Some(&init_data)),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true }));
        assert_eq!(
            bot.calls(),
            vec![BotCall::SendGift { user_id: 42, gift_id: "5170145012310081615".into() }]
        );
    }

    #[tokio::test]
    async fn test_init_data_in_body() {
        let bot = Arc::new(FakeBot::default());
        let init_data = signed_init_data(9);
        let (status, _) = send(
            test_app(bot.clone(), &[]),
            post(json!({ "gift_key": "diamond", "init_data": init_data }), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(bot.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_gift() {
        let bot = Arc::new(FakeBot::default());
        let init_data = signed_init_data(42);
        let (status, body) = send(test_app(bot.clone(), &[]), post(json!({ "gift_key": "yacht" }), Some(&init_data))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "gift_not_supported" }));
        assert!(bot.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_init_data() {
        let bot = Arc::new(FakeBot::default());
        let (status, body) = send(test_app(bot, &[]), post(json!({ "gift_key": "rose" }), None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "invalid_init_data" }));
    }

    #[tokio::test]
    async fn test_send_failure() {
        let bot = Arc::new(FakeBot { fail: true, ..Default::default() });
        let init_data = signed_init_data(42);
        let (status, body) = send(test_app(bot, &[]), post(json!({ "gift_key": "rose" }), Some(&init_data))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "gift_send_failed" }));
    }
}
