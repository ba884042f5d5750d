use web_sys::window;

/// Backend origin. Set `ROULETTE_API_BASE` at build time when the API is not
/// served from the same origin as the page.
pub fn get_api_base_url() -> String {
    if let Some(base) = option_env!("ROULETTE_API_BASE") {
        return base.trim_end_matches('/').to_string();
    }

    if let Some(window) = window() {
        if let Ok(host) = window.location().host() {
            let protocol = window.location().protocol().unwrap_or_else(|_| "https:".to_string());
            return format!("{}//{}", protocol, host);
        }
    }

    // Default to the local backend for development
    "http://127.0.0.1:8080".to_string()
}

pub fn get_asset_url(path: &str) -> String {
    if path.starts_with("http") {
        path.to_string()
    } else {
        format!("{}{}", get_api_base_url(), path)
    }
}
