//! Bot API webhook: checkout validation, payment receipts and `/start`.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use roulette_shared::payments::{parse_invoice_payload, validate_payment_request, PaymentCheck, PaymentRejection};
use serde::Deserialize;
use tracing::{error, info, warn};

use super::AppState;

const SECRET_TOKEN_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";
const START_GREETING: &str = "Hi! 🎁\nTap the button below to open the mini app and collect your gifts.";

#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub pre_checkout_query: Option<PreCheckoutQuery>,
}

#[derive(Debug, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub message_id: i64,
    #[serde(default)]
    pub from: Option<User>,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub successful_payment: Option<SuccessfulPayment>,
}

#[derive(Debug, Deserialize)]
pub struct SuccessfulPayment {
    pub currency: String,
    pub total_amount: i64,
    pub invoice_payload: String,
    pub telegram_payment_charge_id: String,
}

#[derive(Debug, Deserialize)]
pub struct PreCheckoutQuery {
    pub id: String,
    pub from: User,
    pub currency: String,
    pub total_amount: i64,
    pub invoice_payload: String,
}

pub fn check_pre_checkout(query: &PreCheckoutQuery) -> Result<(), PaymentRejection> {
    let payload = parse_invoice_payload(&query.invoice_payload)?;
    validate_payment_request(
        &payload,
        &PaymentCheck {
            currency: &query.currency,
            total_amount: query.total_amount,
            from_user_id: query.from.id,
        },
    )
}

async fn handle_pre_checkout(state: &AppState, query: PreCheckoutQuery) {
    info!(
        "Pre-checkout query {} from user {}: {} {}",
        query.id, query.from.id, query.total_amount, query.currency
    );

    let verdict = check_pre_checkout(&query);
    match &verdict {
        Ok(()) => info!("Pre-checkout query {} accepted", query.id),
        Err(reason) => warn!("Pre-checkout query {} rejected: {:?}", query.id, reason),
    }

    if let Err(e) = state
        .bot
        .answer_pre_checkout_query(&query.id, verdict.map_err(|reason| reason.to_string()))
        .await
    {
        error!("Failed to answer pre-checkout query {}: {}", query.id, e);
    }
}

fn handle_successful_payment(message: &Message, payment: &SuccessfulPayment) {
    match parse_invoice_payload(&payment.invoice_payload) {
        Ok(payload) => info!(
            "Successful payment: message {}, user {}, {} {}, payload id {:?}, correlation {}",
            message.message_id,
            payload.user_id,
            payment.total_amount,
            payment.currency,
            payload.id,
            payload
                .correlation_id
                .as_deref()
                .unwrap_or(&payment.telegram_payment_charge_id)
        ),
        Err(_) => warn!(
            "Successful payment with invalid payload: message {}, user {:?}",
            message.message_id,
            message.from.as_ref().map(|user| user.id)
        ),
    }
}

async fn handle_start(state: &AppState, message: &Message) {
    let Some(url) = state.config.mini_app_url.as_deref() else {
        warn!("/start received but MINI_APP_URL is not configured");
        return;
    };
    if let Err(e) = state
        .bot
        .send_app_button(message.chat.id, START_GREETING, &state.config.mini_app_button, url)
        .await
    {
        error!("Failed to answer /start in chat {}: {}", message.chat.id, e);
    }
}

/// Always answers 200 for well-formed calls so Telegram does not redeliver.
pub async fn telegram_webhook(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> StatusCode {
    if let Some(secret) = state.config.webhook_secret.as_deref() {
        let provided = headers.get(SECRET_TOKEN_HEADER).and_then(|value| value.to_str().ok());
        if provided != Some(secret) {
            warn!("Webhook call with a wrong secret token");
            return StatusCode::UNAUTHORIZED;
        }
    }

    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!("Ignoring unparseable update: {}", e);
            return StatusCode::OK;
        }
    };

    if let Some(query) = update.pre_checkout_query {
        handle_pre_checkout(&state, query).await;
    } else if let Some(message) = update.message {
        if let Some(payment) = &message.successful_payment {
            handle_successful_payment(&message, payment);
        } else if message.text.as_deref().is_some_and(|text| text.starts_with("/start")) {
            handle_start(&state, &message).await;
        }
    } else {
        info!("Ignoring update {}", update.update_id);
    }

    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{json, Value};

    use super::*;
    use crate::routes::test_support::*;

    fn update(body: Value) -> Request<Body> {
        Request::post("/api/telegram/webhook")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn pre_checkout(currency: &str, total_amount: i64, from: i64, payload: &str) -> Value {
        json!({
            "update_id": 1,
            "pre_checkout_query": {
                "id": "q1",
                "from": { "id": from, "is_bot": false, "first_name": "Ann" },
                "currency": currency,
                "total_amount": total_amount,
                "invoice_payload": payload,
            }
        })
    }

    #[tokio::test]
    async fn test_accepts_matching_checkout() {
        let bot = Arc::new(FakeBot::default());
        let body = pre_checkout("XTR", 50, 42, r#"{"amount":50,"user_id":42}"#);
        let (status, _) = send(test_app(bot.clone(), &[]), update(body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(bot.calls(), vec![BotCall::PreCheckout { query_id: "q1".into(), verdict: Ok(()) }]);
    }

    #[tokio::test]
    async fn test_rejects_checkout_from_other_user() {
        let bot = Arc::new(FakeBot::default());
        let body = pre_checkout("XTR", 50, 43, r#"{"amount":50,"user_id":42}"#);
        send(test_app(bot.clone(), &[]), update(body)).await;

        assert_eq!(
            bot.calls(),
            vec![BotCall::PreCheckout {
                query_id: "q1".into(),
                verdict: Err("Payment from another user.".into())
            }]
        );
    }

    #[tokio::test]
    async fn test_rejects_garbage_payload() {
        let bot = Arc::new(FakeBot::default());
        send(test_app(bot.clone(), &[]), update(pre_checkout("XTR", 25, 1, "spin"))).await;
        assert_eq!(
            bot.calls(),
            vec![BotCall::PreCheckout {
                query_id: "q1".into(),
                verdict: Err(PaymentRejection::MalformedPayload.to_string())
            }]
        );
    }

    #[tokio::test]
    async fn test_start_sends_app_button() {
        let bot = Arc::new(FakeBot::default());
        let body = json!({
            "update_id": 2,
            "message": { "message_id": 5, "chat": { "id": 77 }, "from": { "id": 77 }, "text": "/start" }
        });
        send(test_app(bot.clone(), &[]), update(body)).await;
        assert_eq!(bot.calls(), vec![BotCall::AppButton { chat_id: 77, url: "https://app.example".into() }]);
    }

    #[tokio::test]
    async fn test_successful_payment_is_acknowledged() {
        let bot = Arc::new(FakeBot::default());
        let body = json!({
            "update_id": 3,
            "message": {
                "message_id": 6,
                "chat": { "id": 42 },
                "from": { "id": 42 },
                "successful_payment": {
                    "currency": "XTR",
                    "total_amount": 25,
                    "invoice_payload": "{\"amount\":25,\"user_id\":42}",
                    "telegram_payment_charge_id": "ch_1"
                }
            }
        });
        let (status, _) = send(test_app(bot.clone(), &[]), update(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(bot.calls().is_empty());
    }

    #[tokio::test]
    async fn test_secret_token_enforced() {
        let bot = Arc::new(FakeBot::default());
        let app = test_app(bot.clone(), &[("WEBHOOK_SECRET", "s3cret")]);
        let body = pre_checkout("XTR", 50, 42, r#"{"amount":50,"user_id":42}"#);
        let (status, _) = send(app, update(body)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(bot.calls().is_empty());
    }
}
