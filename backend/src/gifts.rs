use std::collections::HashMap;

use once_cell::sync::Lazy;
use roulette_shared::GiftId;

/// A catalog gift as the Bot API knows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelegramGift {
    pub name: &'static str,
    pub gift_id: &'static str,
}

static TELEGRAM_GIFTS: Lazy<HashMap<GiftId, TelegramGift>> = Lazy::new(|| {
    let gift = |name, gift_id| TelegramGift { name, gift_id };
    HashMap::from([
        (GiftId::HeartBox, gift("Heart", "5170145012310081615")),
        (GiftId::TeddyBear, gift("Teddy Bear", "5170233102089322756")),
        (GiftId::GiftBox, gift("Gift Box", "5170250947678437525")),
        (GiftId::Rose, gift("Rose", "5168103777563050263")),
        (GiftId::Elka, gift("Christmas Tree", "5956217000635139069")),
        // Telegram currently resolves both seasonal gifts to the same id
        (GiftId::Newteddy, gift("New Teddy", "5956217000635139069")),
        (GiftId::Cake, gift("Cake", "5170144170496491616")),
        (GiftId::Bouquet, gift("Bouquet", "5170314324215857265")),
        (GiftId::Rocket, gift("Rocket", "5170564780938756245")),
        (GiftId::Champagne, gift("Champagne", "6028601630662853006")),
        (GiftId::Trophy, gift("Trophy", "5168043875654172773")),
        (GiftId::Ring, gift("Ring", "5170690322832818290")),
        (GiftId::Diamond, gift("Diamond", "5170521118301225164")),
    ])
});

/// Looks up a gift by its catalog key, e.g. `heart-box`.
pub fn telegram_gift(key: &str) -> Option<(GiftId, TelegramGift)> {
    let id: GiftId = key.parse().ok()?;
    TELEGRAM_GIFTS.get(&id).map(|gift| (id, *gift))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_catalog_gift_is_deliverable() {
        for id in GiftId::ALL {
            let (found, gift) = telegram_gift(id.as_str()).unwrap();
            assert_eq!(found, id);
            assert!(gift.gift_id.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(telegram_gift("yacht"), None);
        assert_eq!(telegram_gift("Heart-Box"), None);
    }
}
