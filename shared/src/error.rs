use thiserror::Error;

use crate::catalog::PriceTier;
use crate::constants::*;
use crate::gateway::PaymentOutcome;
use crate::spin::SpinState;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouletteError {
    #[error("payment capability is not available")]
    PaymentUnavailable,
    #[error("payment ended with status `{0}`")]
    PaymentDeclined(PaymentOutcome),
    #[error("payment request failed: {0}")]
    PaymentRequestFailed(String),
    #[error("gift delivery was not confirmed: {0}")]
    DeliveryConfirmationFailed(String),
    #[error("every chance weight for tier {0} is zero or negative")]
    DegenerateWeights(PriceTier),
    #[error("unsupported spin price {0}")]
    UnsupportedPrice(u32),
    #[error("unknown gift `{0}`")]
    UnknownGift(String),
    #[error("roulette is busy ({0:?})")]
    Busy(SpinState),
}

impl RouletteError {
    /// Text shown to the user when the error surfaces as a notice.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::PaymentUnavailable => PAYMENT_UNAVAILABLE_ERROR,
            Self::PaymentDeclined(PaymentOutcome::Cancelled) => PAYMENT_CANCELLED_ERROR,
            Self::PaymentDeclined(_) => PAYMENT_FAILED_ERROR,
            Self::PaymentRequestFailed(_) => PAYMENT_REQUEST_ERROR,
            Self::DeliveryConfirmationFailed(_) => DELIVERY_FAILED_ERROR,
            Self::DegenerateWeights(_)
            | Self::UnsupportedPrice(_)
            | Self::UnknownGift(_)
            | Self::Busy(_) => "Something went wrong. Please try again.",
        }
    }
}
