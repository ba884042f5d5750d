use serde::{Deserialize, Serialize};

use crate::catalog::{GiftId, PriceTier};

/// Query of `GET /api/invoice`. `amount` stays raw so a non-numeric value
/// maps to `invalid_amount` instead of a generic extractor error.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct InvoiceQuery {
    pub amount: Option<String>,
    pub init_data: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InvoiceResponse {
    pub invoice_link: String,
    #[serde(rename = "invoiceLink", default, skip_serializing_if = "Option::is_none")]
    pub invoice_link_alias: Option<String>,
}

impl InvoiceResponse {
    pub fn new(link: String) -> Self {
        Self {
            invoice_link_alias: Some(link.clone()),
            invoice_link: link,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RouletteWinRequest {
    pub gift_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spin_price: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init_data: Option<String>,
}

impl RouletteWinRequest {
    pub fn new(gift: GiftId, tier: PriceTier) -> Self {
        Self {
            gift_key: gift.as_str().to_string(),
            spin_price: Some(tier.stars()),
            init_data: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RouletteWinResponse {
    pub ok: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_response_carries_both_keys() {
        let body = serde_json::to_value(InvoiceResponse::new("https://t.me/$abc".into())).unwrap();
        assert_eq!(body["invoice_link"], "https://t.me/$abc");
        assert_eq!(body["invoiceLink"], "https://t.me/$abc");
    }

    #[test]
    fn test_win_request_wire_shape() {
        let body = serde_json::to_value(RouletteWinRequest::new(GiftId::HeartBox, PriceTier::Stars50)).unwrap();
        assert_eq!(body, serde_json::json!({ "gift_key": "heart-box", "spin_price": 50 }));
    }
}
