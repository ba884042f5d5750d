//! Boundaries to the collaborators the engine does not own.
//!
//! Both calls are asynchronous and may fail. The engine never blocks on them;
//! the driver resumes the state machine when they complete.

use std::fmt;
use std::str::FromStr;

use futures::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};

use crate::catalog::{GiftId, PriceTier};
use crate::error::RouletteError;

/// Status reported by the payment dialog.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentOutcome {
    Paid,
    Cancelled,
    Failed,
    /// Sheet closed before the payment settled. No spin is started.
    Pending,
}

impl PaymentOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
            Self::Pending => "pending",
        }
    }
}

impl fmt::Display for PaymentOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentOutcome {
    type Err = RouletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paid" => Ok(Self::Paid),
            "cancelled" => Ok(Self::Cancelled),
            "failed" => Ok(Self::Failed),
            "pending" => Ok(Self::Pending),
            other => Err(RouletteError::PaymentRequestFailed(format!("unknown invoice status `{}`", other))),
        }
    }
}

pub trait PaymentGateway {
    /// Whether the host can take payments at all.
    fn is_available(&self) -> bool;

    /// Opens a payment confirmation for `tier`.
    fn request_payment(&self, tier: PriceTier) -> LocalBoxFuture<'static, Result<PaymentOutcome, RouletteError>>;
}

pub trait GiftDeliveryService {
    /// Best-effort note to the server that `gift` was won at `tier`.
    fn record_win(&self, gift: GiftId, tier: PriceTier) -> LocalBoxFuture<'static, Result<(), RouletteError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_parses_telegram_statuses() {
        for outcome in [PaymentOutcome::Paid, PaymentOutcome::Cancelled, PaymentOutcome::Failed, PaymentOutcome::Pending] {
            assert_eq!(outcome.as_str().parse::<PaymentOutcome>().unwrap(), outcome);
        }
        assert!("refunded".parse::<PaymentOutcome>().is_err());
    }
}
