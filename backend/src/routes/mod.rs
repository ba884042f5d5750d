use std::sync::Arc;

use axum::http::header::{HeaderName, CONTENT_TYPE};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use roulette_shared::constants::{INVOICE_ENDPOINT, ROULETTE_WIN_ENDPOINT, TELEGRAM_WEBHOOK_ENDPOINT};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::config::Config;
use crate::telegram::BotApi;

pub mod invoice;
pub mod roulette;
pub mod webhook;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub bot: Arc<dyn BotApi>,
}

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origin = match config.cors_origin().map(HeaderValue::from_str) {
        Some(Ok(origin)) => AllowOrigin::exact(origin),
        Some(Err(_)) => {
            warn!("CORS_ALLOW_ORIGIN is not a valid header value, allowing any origin");
            AllowOrigin::any()
        }
        None => AllowOrigin::any(),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(vec![CONTENT_TYPE, HeaderName::from_static("x-telegram-init-data")])
}

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/health", get(health_check))
        .route(INVOICE_ENDPOINT, get(invoice::create_invoice))
        .route(ROULETTE_WIN_ENDPOINT, post(roulette::record_win))
        .route(TELEGRAM_WEBHOOK_ENDPOINT, post(webhook::telegram_webhook))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::{Arc, Mutex};

    use axum::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use tower::ServiceExt;

    use super::{router, AppState};
    use crate::config::Config;
    use crate::telegram::{BotApi, InvoiceLink, TelegramError};

    pub const BOT_TOKEN: &str = "123456:TEST-token";

    #[derive(Debug, Clone, PartialEq)]
    pub enum BotCall {
        InvoiceLink(InvoiceLink),
        SendGift { user_id: i64, gift_id: String },
        PreCheckout { query_id: String, verdict: Result<(), String> },
        AppButton { chat_id: i64, url: String },
    }

    #[derive(Default)]
    pub struct FakeBot {
        pub calls: Mutex<Vec<BotCall>>,
        pub fail: bool,
    }

    impl FakeBot {
        pub fn calls(&self) -> Vec<BotCall> {
            self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
        }

        fn record(&self, call: BotCall) -> Result<(), TelegramError> {
            self.calls.lock().unwrap().push(call);
            if self.fail {
                Err(TelegramError::Api("Bad Request: BALANCE_TOO_LOW".into()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl BotApi for FakeBot {
        async fn create_invoice_link(&self, invoice: &InvoiceLink) -> Result<String, TelegramError> {
            self.record(BotCall::InvoiceLink(invoice.clone()))?;
            Ok("https://t.me/$invoice".to_string())
        }

        async fn send_gift(&self, user_id: i64, gift_id: &str) -> Result<(), TelegramError> {
            self.record(BotCall::SendGift { user_id, gift_id: gift_id.to_string() })
        }

        async fn answer_pre_checkout_query(&self, query_id: &str, verdict: Result<(), String>) -> Result<(), TelegramError> {
            self.record(BotCall::PreCheckout { query_id: query_id.to_string(), verdict })
        }

        async fn send_app_button(&self, chat_id: i64, _text: &str, _button: &str, url: &str) -> Result<(), TelegramError> {
            self.record(BotCall::AppButton { chat_id, url: url.to_string() })
        }
    }

    pub fn test_app(bot: Arc<FakeBot>, extra_env: &[(&str, &str)]) -> Router {
        let mut env = vec![("BOT_TOKEN", BOT_TOKEN), ("MINI_APP_URL", "https://app.example")];
        env.extend_from_slice(extra_env);
        let config = Config::from_lookup(|name| {
            env.iter().rev().find(|(key, _)| *key == name).map(|(_, value)| value.to_string())
        })
        .unwrap();
        router(AppState { config: Arc::new(config), bot })
    }

    pub fn signed_init_data(user_id: i64) -> String {
        crate::auth::init_data::test_support::signed_init_data(BOT_TOKEN, user_id, chrono::Utc::now().timestamp())
    }

    pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::test_support::*;

    #[tokio::test]
    async fn test_health_check() {
        let app = test_app(Arc::new(FakeBot::default()), &[]);
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn test_cors_preflight_uses_first_origin() {
        let app = test_app(Arc::new(FakeBot::default()), &[("CORS_ALLOW_ORIGIN", "https://a.example,https://b.example")]);
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/invoice")
            .header("Origin", "https://a.example")
            .header("Access-Control-Request-Method", "GET")
            .header("Access-Control-Request-Headers", "x-telegram-init-data")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "https://a.example"
        );
    }
}
