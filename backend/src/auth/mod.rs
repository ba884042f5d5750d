use tracing::warn;

use crate::config::Config;
use crate::error::ApiError;

pub mod init_data;
pub mod middleware;

pub use init_data::{verify_init_data, InitDataError, TelegramUser};
pub use middleware::InitDataHeader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitDataSource {
    Header,
    Request,
    Missing,
}

impl InitDataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Request => "query_or_body",
            Self::Missing => "missing",
        }
    }
}

/// The header wins over init data passed in the query or body.
pub fn resolve_init_data(header: Option<String>, fallback: Option<String>) -> (Option<String>, InitDataSource) {
    match (header.filter(|v| !v.is_empty()), fallback.filter(|v| !v.is_empty())) {
        (Some(header), _) => (Some(header), InitDataSource::Header),
        (None, Some(fallback)) => (Some(fallback), InitDataSource::Request),
        (None, None) => (None, InitDataSource::Missing),
    }
}

pub fn authenticate(config: &Config, init_data: Option<&str>) -> Result<TelegramUser, ApiError> {
    let Some(raw) = init_data else {
        warn!("Request without init data");
        return Err(ApiError::InvalidInitData);
    };

    let now = chrono::Utc::now().timestamp();
    let verified = verify_init_data(raw, &config.bot_token, config.init_data_max_age_seconds, now).map_err(|e| {
        warn!("Rejected init data: {}", e);
        ApiError::InvalidInitData
    })?;

    verified.user().map_err(|e| {
        warn!("Rejected init data: {}", e);
        ApiError::InvalidInitData
    })
}
