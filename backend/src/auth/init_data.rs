//! Telegram Mini App init data verification.
//!
//! The data check string is every field except `hash`, sorted by key and
//! joined as `key=value` lines. It is signed with HMAC-SHA256 under
//! `HMAC-SHA256("WebAppData", bot_token)`.

use std::collections::BTreeMap;
use std::fmt;

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const SECRET_KEY_SALT: &[u8] = b"WebAppData";
const MAX_CLOCK_SKEW_SECONDS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitDataError {
    MissingHash,
    MissingAuthDate,
    Expired,
    FromTheFuture,
    BadSignature,
    MissingUser,
    InvalidUser,
}

impl fmt::Display for InitDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHash => write!(f, "init data has no hash"),
            Self::MissingAuthDate => write!(f, "init data has no valid auth_date"),
            Self::Expired => write!(f, "init data is too old"),
            Self::FromTheFuture => write!(f, "init data auth_date is in the future"),
            Self::BadSignature => write!(f, "init data signature mismatch"),
            Self::MissingUser => write!(f, "init data has no user"),
            Self::InvalidUser => write!(f, "init data user is malformed"),
        }
    }
}

impl std::error::Error for InitDataError {}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TelegramUser {
    pub id: i64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// Verified init data fields, `hash` removed.
#[derive(Debug, Clone)]
pub struct InitData {
    fields: BTreeMap<String, String>,
    pub auth_date: i64,
}

impl InitData {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn user(&self) -> Result<TelegramUser, InitDataError> {
        let raw = self.get("user").filter(|raw| !raw.is_empty()).ok_or(InitDataError::MissingUser)?;
        serde_json::from_str(raw).map_err(|_| InitDataError::InvalidUser)
    }
}

fn secret_key(bot_token: &str) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(SECRET_KEY_SALT).expect("HMAC can take key of any size");
    mac.update(bot_token.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

fn data_check_mac(fields: &BTreeMap<String, String>, bot_token: &str) -> HmacSha256 {
    let data_check_string = fields
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("\n");
    let mut mac = HmacSha256::new_from_slice(&secret_key(bot_token)).expect("HMAC can take key of any size");
    mac.update(data_check_string.as_bytes());
    mac
}

/// Hex signature Telegram would put in `hash` for these fields.
pub fn sign(fields: &BTreeMap<String, String>, bot_token: &str) -> String {
    hex::encode(data_check_mac(fields, bot_token).finalize().into_bytes())
}

pub fn verify_init_data(
    raw: &str,
    bot_token: &str,
    max_age_seconds: i64,
    now: i64,
) -> Result<InitData, InitDataError> {
    let mut fields: BTreeMap<String, String> = url::form_urlencoded::parse(raw.as_bytes()).into_owned().collect();

    let received_hash = fields
        .remove("hash")
        .filter(|hash| !hash.is_empty())
        .ok_or(InitDataError::MissingHash)?;

    let auth_date: i64 = fields
        .get("auth_date")
        .and_then(|raw| raw.parse().ok())
        .ok_or(InitDataError::MissingAuthDate)?;
    if auth_date < now - max_age_seconds {
        return Err(InitDataError::Expired);
    }
    if auth_date > now + MAX_CLOCK_SKEW_SECONDS {
        return Err(InitDataError::FromTheFuture);
    }

    let received = hex::decode(&received_hash).map_err(|_| InitDataError::BadSignature)?;
    data_check_mac(&fields, bot_token)
        .verify_slice(&received)
        .map_err(|_| InitDataError::BadSignature)?;

    Ok(InitData { fields, auth_date })
}


#[cfg(test)]
mod tests {
    use super::test_support::signed_init_data;
    use super::*;

    const TOKEN: &str = "123456:TEST-token";
    const NOW: i64 = 1_700_000_000;

    #[test]
    fn test_accepts_signed_data() {
        let raw = signed_init_data(TOKEN, 42, NOW - 60);
        let data = verify_init_data(&raw, TOKEN, 86400, NOW).unwrap();
        assert_eq!(data.auth_date, NOW - 60);
        let user = data.user().unwrap();
        assert_eq!(user.id, 42);
        assert_eq!(user.username.as_deref(), Some("ann"));
    }

    #[test]
    fn test_rejects_other_bot() {
        let raw = signed_init_data("999:other", 42, NOW);
        assert_eq!(verify_init_data(&raw, TOKEN, 86400, NOW).unwrap_err(), InitDataError::BadSignature);
    }

    #[test]
    fn test_rejects_tampered_user() {
        let raw = signed_init_data(TOKEN, 42, NOW).replace("%3A42%2C", "%3A43%2C");
        assert_ne!(raw, signed_init_data(TOKEN, 42, NOW));
        assert_eq!(verify_init_data(&raw, TOKEN, 86400, NOW).unwrap_err(), InitDataError::BadSignature);
    }

    #[test]
    fn test_time_window() {
        let old = signed_init_data(TOKEN, 42, NOW - 86401);
        assert_eq!(verify_init_data(&old, TOKEN, 86400, NOW).unwrap_err(), InitDataError::Expired);

        let skewed = signed_init_data(TOKEN, 42, NOW + 30);
        assert!(verify_init_data(&skewed, TOKEN, 86400, NOW).is_ok());

        let future = signed_init_data(TOKEN, 42, NOW + 31);
        assert_eq!(verify_init_data(&future, TOKEN, 86400, NOW).unwrap_err(), InitDataError::FromTheFuture);
    }

    #[test]
    fn test_missing_fields() {
        assert_eq!(verify_init_data("auth_date=1", TOKEN, 86400, NOW).unwrap_err(), InitDataError::MissingHash);
        assert_eq!(verify_init_data("hash=ab", TOKEN, 86400, NOW).unwrap_err(), InitDataError::MissingAuthDate);
        assert_eq!(
            verify_init_data("hash=ab&auth_date=soon", TOKEN, 86400, NOW).unwrap_err(),
            InitDataError::MissingAuthDate
        );
    }

    #[test]
    fn test_user_must_have_integer_id() {
        let mut fields = BTreeMap::new();
        fields.insert("auth_date".to_string(), NOW.to_string());
        fields.insert("user".to_string(), r#"{"id":"42"}"#.to_string());
        let hash = sign(&fields, TOKEN);
        let raw = format!("auth_date={}&user=%7B%22id%22%3A%2242%22%7D&hash={}", NOW, hash);

        let data = verify_init_data(&raw, TOKEN, 86400, NOW).unwrap();
        assert_eq!(data.user().unwrap_err(), InitDataError::InvalidUser);
    }
}
