use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use roulette_shared::api::ErrorResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    InvalidAmount,
    InvalidJson,
    InvalidGiftKey,
    InvalidSpinPrice,
    /// init data present but not a string
    MalformedInitData,
    /// init data missing, unsigned, expired or without a user
    InvalidInitData,
    GiftNotSupported,
    InvoiceCreationFailed,
    GiftSendFailed,
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidAmount => "invalid_amount",
            Self::InvalidJson => "invalid_json",
            Self::InvalidGiftKey => "invalid_gift_key",
            Self::InvalidSpinPrice => "invalid_spin_price",
            Self::MalformedInitData | Self::InvalidInitData => "invalid_init_data",
            Self::GiftNotSupported => "gift_not_supported",
            Self::InvoiceCreationFailed => "invoice_creation_failed",
            Self::GiftSendFailed => "gift_send_failed",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInitData => StatusCode::UNAUTHORIZED,
            Self::InvoiceCreationFailed | Self::GiftSendFailed => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = ErrorResponse { error: self.code().to_string() };
        (self.status(), Json(body)).into_response()
    }
}
