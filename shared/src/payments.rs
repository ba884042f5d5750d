//! Contract between the invoice the backend creates and the pre-checkout
//! query Telegram sends back for it.

use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::constants::{ALLOWED_PRICES, STARS_CURRENCY};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoicePayload {
    pub amount: i64,
    pub user_id: i64,
    pub id: Option<String>,
    pub correlation_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PayloadId {
    Text(String),
    Number(i64),
}

#[derive(Deserialize)]
struct RawInvoicePayload {
    amount: i64,
    user_id: i64,
    #[serde(default)]
    id: Option<PayloadId>,
    #[serde(default)]
    correlation_id: Option<String>,
}

/// Reason a pre-checkout query is refused. The display text goes back to
/// the buyer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentRejection {
    #[error("Invalid payment payload.")]
    MalformedPayload,
    #[error("Invalid currency.")]
    WrongCurrency,
    #[error("Invalid amount.")]
    InvalidAmount,
    #[error("Amount mismatch.")]
    AmountMismatch,
    #[error("Payment from another user.")]
    ForeignUser,
}

pub fn build_invoice_payload(amount: u32, user_id: i64) -> String {
    json!({ "amount": amount, "user_id": user_id }).to_string()
}

pub fn parse_invoice_payload(payload: &str) -> Result<InvoicePayload, PaymentRejection> {
    let value: serde_json::Value = serde_json::from_str(payload).map_err(|_| PaymentRejection::MalformedPayload)?;
    // Derived struct impls would also accept a JSON array
    if !value.is_object() {
        return Err(PaymentRejection::MalformedPayload);
    }
    let raw = RawInvoicePayload::deserialize(value).map_err(|_| PaymentRejection::MalformedPayload)?;
    Ok(InvoicePayload {
        amount: raw.amount,
        user_id: raw.user_id,
        id: raw.id.map(|id| match id {
            PayloadId::Text(text) => text,
            PayloadId::Number(number) => number.to_string(),
        }),
        correlation_id: raw.correlation_id,
    })
}

/// What Telegram reports about the payment being confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentCheck<'a> {
    pub currency: &'a str,
    pub total_amount: i64,
    pub from_user_id: i64,
}

pub fn validate_payment_request(payload: &InvoicePayload, check: &PaymentCheck<'_>) -> Result<(), PaymentRejection> {
    if check.currency != STARS_CURRENCY {
        return Err(PaymentRejection::WrongCurrency);
    }
    if !ALLOWED_PRICES.iter().any(|price| i64::from(*price) == payload.amount) {
        return Err(PaymentRejection::InvalidAmount);
    }
    if check.total_amount != payload.amount {
        return Err(PaymentRejection::AmountMismatch);
    }
    if check.from_user_id != payload.user_id {
        return Err(PaymentRejection::ForeignUser);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(currency: &str, total_amount: i64, from_user_id: i64) -> PaymentCheck<'_> {
        PaymentCheck { currency, total_amount, from_user_id }
    }

    #[test]
    fn test_built_payload_parses_back() {
        let raw = build_invoice_payload(50, 777);
        assert_eq!(raw, r#"{"amount":50,"user_id":777}"#);
        let payload = parse_invoice_payload(&raw).unwrap();
        assert_eq!(payload.amount, 50);
        assert_eq!(payload.user_id, 777);
        assert_eq!(payload.id, None);
    }

    #[test]
    fn test_optional_ids_are_normalized() {
        let payload = parse_invoice_payload(r#"{"amount":25,"user_id":1,"id":42,"correlation_id":"abc"}"#).unwrap();
        assert_eq!(payload.id.as_deref(), Some("42"));
        assert_eq!(payload.correlation_id.as_deref(), Some("abc"));

        let payload = parse_invoice_payload(r#"{"amount":25,"user_id":1,"id":"x-1"}"#).unwrap();
        assert_eq!(payload.id.as_deref(), Some("x-1"));
    }

    #[test]
    fn test_malformed_payloads_are_rejected() {
        for raw in [
            "not json",
            "[1,2]",
            r#"{"amount":"25","user_id":1}"#,
            r#"{"amount":25}"#,
            r#"{"amount":25.5,"user_id":1}"#,
            r#"{"amount":25,"user_id":1,"id":[1]}"#,
            r#"{"amount":25,"user_id":1,"correlation_id":7}"#,
        ] {
            assert_eq!(parse_invoice_payload(raw), Err(PaymentRejection::MalformedPayload), "{}", raw);
        }
    }

    #[test]
    fn test_validation_order() {
        let payload = parse_invoice_payload(&build_invoice_payload(100, 5)).unwrap();
        assert_eq!(validate_payment_request(&payload, &check("XTR", 100, 5)), Ok(()));
        assert_eq!(validate_payment_request(&payload, &check("USD", 100, 5)), Err(PaymentRejection::WrongCurrency));
        assert_eq!(validate_payment_request(&payload, &check("XTR", 50, 5)), Err(PaymentRejection::AmountMismatch));
        assert_eq!(validate_payment_request(&payload, &check("XTR", 100, 6)), Err(PaymentRejection::ForeignUser));

        let odd = InvoicePayload { amount: 30, ..payload };
        assert_eq!(validate_payment_request(&odd, &check("XTR", 30, 5)), Err(PaymentRejection::InvalidAmount));
    }
}
