pub mod constants;
pub mod error;
pub mod catalog;
pub mod selector;
pub mod track;
pub mod easing;
pub mod motion;
pub mod effects;
pub mod spin;
pub mod gateway;
pub mod driver;
pub mod payments;
pub mod api;

pub use catalog::{GiftId, PriceTier, PrizeDefinition, GIFTS_CATALOG};
pub use error::RouletteError;
pub use spin::{SpinState, SpinStateMachine};
