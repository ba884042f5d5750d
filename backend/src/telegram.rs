//! Minimal Telegram Bot API client: the four calls the service makes.

use std::fmt;

use axum::async_trait;
use reqwest::Client;
use roulette_shared::constants::{INVOICE_TITLE, STARS_CURRENCY};
use roulette_shared::payments::build_invoice_payload;
use roulette_shared::PriceTier;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::Config;

#[derive(Debug)]
pub enum TelegramError {
    Transport(reqwest::Error),
    Api(String),
}

impl fmt::Display for TelegramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "Bot API request failed: {}", e),
            Self::Api(description) => write!(f, "Bot API error: {}", description),
        }
    }
}

impl std::error::Error for TelegramError {}

impl From<reqwest::Error> for TelegramError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the bot token
        Self::Transport(err.without_url())
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LabeledPrice {
    pub label: String,
    pub amount: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InvoiceLink {
    pub title: String,
    pub description: String,
    pub payload: String,
    pub currency: String,
    pub prices: Vec<LabeledPrice>,
}

impl InvoiceLink {
    /// Stars invoice for one spin at `tier`, bound to the buyer.
    pub fn stars(tier: PriceTier, user_id: i64) -> Self {
        let amount = tier.stars();
        Self {
            title: INVOICE_TITLE.to_string(),
            description: format!("Gift purchase for {} stars.", amount),
            payload: build_invoice_payload(amount, user_id),
            currency: STARS_CURRENCY.to_string(),
            prices: vec![LabeledPrice { label: format!("{} ⭐", amount), amount }],
        }
    }
}

#[async_trait]
pub trait BotApi: Send + Sync {
    async fn create_invoice_link(&self, invoice: &InvoiceLink) -> Result<String, TelegramError>;

    async fn send_gift(&self, user_id: i64, gift_id: &str) -> Result<(), TelegramError>;

    /// `Err(message)` refuses the checkout and shows `message` to the buyer.
    async fn answer_pre_checkout_query(&self, query_id: &str, verdict: Result<(), String>) -> Result<(), TelegramError>;

    async fn send_app_button(&self, chat_id: i64, text: &str, button: &str, url: &str) -> Result<(), TelegramError>;
}

#[derive(Deserialize)]
struct BotResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

pub struct TelegramClient {
    client: Client,
    api_base: String,
    bot_token: String,
}

impl TelegramClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            api_base: config.telegram_api_base.clone(),
            bot_token: config.bot_token.clone(),
        }
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: serde_json::Value) -> Result<T, TelegramError> {
        let url = format!("{}/bot{}/{}", self.api_base, self.bot_token, method);
        let response = self.client.post(&url).json(&params).send().await?;
        let body: BotResponse<T> = response.json().await?;

        match (body.ok, body.result) {
            (true, Some(result)) => Ok(result),
            (true, None) => Err(TelegramError::Api(format!("{} returned no result", method))),
            (false, _) => Err(TelegramError::Api(
                body.description.unwrap_or_else(|| format!("{} failed", method)),
            )),
        }
    }
}

#[async_trait]
impl BotApi for TelegramClient {
    async fn create_invoice_link(&self, invoice: &InvoiceLink) -> Result<String, TelegramError> {
        self.call("createInvoiceLink", json!(invoice)).await
    }

    async fn send_gift(&self, user_id: i64, gift_id: &str) -> Result<(), TelegramError> {
        let _: bool = self.call("sendGift", json!({ "user_id": user_id, "gift_id": gift_id })).await?;
        Ok(())
    }

    async fn answer_pre_checkout_query(&self, query_id: &str, verdict: Result<(), String>) -> Result<(), TelegramError> {
        let params = match verdict {
            Ok(()) => json!({ "pre_checkout_query_id": query_id, "ok": true }),
            Err(message) => json!({ "pre_checkout_query_id": query_id, "ok": false, "error_message": message }),
        };
        let _: bool = self.call("answerPreCheckoutQuery", params).await?;
        Ok(())
    }

    async fn send_app_button(&self, chat_id: i64, text: &str, button: &str, url: &str) -> Result<(), TelegramError> {
        let params = json!({
            "chat_id": chat_id,
            "text": text,
            "reply_markup": {
                "inline_keyboard": [[{ "text": button, "web_app": { "url": url } }]]
            }
        });
        let _: serde_json::Value = self.call("sendMessage", params).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stars_invoice_shape() {
        let invoice = InvoiceLink::stars(PriceTier::Stars50, 9);
        assert_eq!(invoice.currency, "XTR");
        assert_eq!(invoice.prices, vec![LabeledPrice { label: "50 ⭐".into(), amount: 50 }]);
        assert_eq!(invoice.payload, r#"{"amount":50,"user_id":9}"#);
        assert_eq!(invoice.title, "Random Gift");
    }
}
