//! Thin bindings to `window.Telegram.WebApp`. Every call degrades to a no-op
//! (or a browser fallback) when the page runs outside Telegram.

use js_sys::{Array, Function, Reflect};
use roulette_shared::constants::WIN_VIBRATION_PATTERN;
use roulette_shared::easing::Platform;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

fn get_prop(target: &JsValue, key: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

fn call_method(target: &JsValue, name: &str, args: &Array) -> Option<JsValue> {
    let method: Function = get_prop(target, name)?.dyn_into().ok()?;
    method.apply(target, args).ok()
}

fn web_app() -> Option<JsValue> {
    let window = web_sys::window()?;
    let telegram = get_prop(&window, "Telegram")?;
    get_prop(&telegram, "WebApp")
}

/// Tells the client the page is ready and asks for the full height.
pub fn ready() {
    if let Some(app) = web_app() {
        call_method(&app, "ready", &Array::new());
        call_method(&app, "expand", &Array::new());
    } else {
        log::warn!("Telegram.WebApp not found, running outside Telegram");
    }
}

/// Signed launch parameters, empty outside Telegram.
pub fn init_data() -> Option<String> {
    get_prop(&web_app()?, "initData")?
        .as_string()
        .filter(|raw| !raw.is_empty())
}

pub fn platform() -> Platform {
    web_app()
        .and_then(|app| get_prop(&app, "platform"))
        .and_then(|platform| platform.as_string())
        .map(|platform| Platform::from_telegram(&platform))
        .unwrap_or_default()
}

pub fn supports_invoices() -> bool {
    web_app()
        .and_then(|app| get_prop(&app, "openInvoice"))
        .map(|open_invoice| open_invoice.is_function())
        .unwrap_or(false)
}

/// Opens the Stars payment sheet. `on_status` receives the raw status
/// string once the sheet closes. Returns false if the sheet could not open.
pub fn open_invoice(link: &str, on_status: impl FnOnce(String) + 'static) -> bool {
    let Some(app) = web_app() else {
        return false;
    };
    let callback = Closure::once_into_js(move |status: JsValue| {
        on_status(status.as_string().unwrap_or_default());
    });
    call_method(&app, "openInvoice", &Array::of2(&JsValue::from_str(link), &callback)).is_some()
}

pub fn haptic_success() {
    let haptics = web_app().and_then(|app| get_prop(&app, "HapticFeedback"));
    if let Some(haptics) = haptics {
        if call_method(&haptics, "notificationOccurred", &Array::of1(&JsValue::from_str("success"))).is_some() {
            return;
        }
    }

    if let Some(window) = web_sys::window() {
        let pattern: Array = WIN_VIBRATION_PATTERN.iter().map(|ms| JsValue::from(*ms)).collect();
        call_method(&window.navigator(), "vibrate", &Array::of1(&pattern));
    }
}

pub fn show_alert(message: &str) {
    if let Some(app) = web_app() {
        if call_method(&app, "showAlert", &Array::of1(&JsValue::from_str(message))).is_some() {
            return;
        }
    }
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}
