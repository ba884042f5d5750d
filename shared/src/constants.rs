// Spin timing
pub const SPIN_DURATION_MS: u32 = 5200;
pub const RESULT_DISMISS_GRACE_MS: u32 = 460;

// Ambient scroll speed in px per second
pub const AUTO_SCROLL_SPEED: f64 = 14.0;

// Extended track: the display order is repeated TRACK_CYCLES times and a spin
// always lands inside cycle LANDING_CYCLE (0-based).
pub const TRACK_CYCLES: usize = 10;
pub const LANDING_CYCLE: usize = 5;

const _: () = assert!(LANDING_CYCLE + 1 < TRACK_CYCLES);

// Card layout in px
pub const COMPACT_CARD_WIDTH: f64 = 154.0;
pub const REGULAR_CARD_WIDTH: f64 = 174.0;
pub const CARD_GAP: f64 = 12.0;
pub const DEFAULT_CONTAINER_WIDTH: f64 = 360.0;
/// Pushes the landing card slightly right so it sits under the drawn pointer.
/// Picked by eye, tune freely.
pub const POINTER_BIAS: f64 = 6.0;

// Haptic pattern played when a result is revealed (vibrate ms on/off/on)
pub const WIN_VIBRATION_PATTERN: [u32; 3] = [50, 30, 100];

// Payments
pub const ALLOWED_PRICES: [u32; 3] = [25, 50, 100];
pub const STARS_CURRENCY: &str = "XTR";
pub const INVOICE_TITLE: &str = "Random Gift";

// HTTP API
pub const INVOICE_ENDPOINT: &str = "/api/invoice";
pub const ROULETTE_WIN_ENDPOINT: &str = "/api/roulette/win";
pub const TELEGRAM_WEBHOOK_ENDPOINT: &str = "/api/telegram/webhook";
pub const INIT_DATA_HEADER: &str = "X-Telegram-Init-Data";

// User-facing notices
pub const PAYMENT_UNAVAILABLE_ERROR: &str = "Payments are not available in your version of Telegram.";
pub const PAYMENT_FAILED_ERROR: &str = "Payment did not go through. Please try again.";
pub const PAYMENT_CANCELLED_ERROR: &str = "Payment was cancelled.";
pub const PAYMENT_REQUEST_ERROR: &str = "Could not create the payment invoice.";
pub const DELIVERY_FAILED_ERROR: &str = "Could not send the won gift to Telegram.";
