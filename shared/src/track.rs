use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::{roulette_prizes, ChanceTable, PriceTier, RoulettePrize, GIFTS_CATALOG};
use crate::constants::*;

/// Uniform random permutation of `catalog`. Only affects the visual layout;
/// odds come from the weights alone.
pub fn shuffle<T: Clone, R: Rng + ?Sized>(catalog: &[T], rng: &mut R) -> Vec<T> {
    let mut order = catalog.to_vec();
    order.shuffle(rng);
    order
}

/// Repeats `order` `cycles` times back to back.
pub fn extend<T: Clone>(order: &[T], cycles: usize) -> Vec<T> {
    let mut extended = Vec::with_capacity(order.len() * cycles);
    for _ in 0..cycles {
        extended.extend_from_slice(order);
    }
    extended
}

/// Shuffled arrangement of the catalog for one tier. Slot `i` here is both
/// the `i`-th card of every track cycle and the `i`-th entry of the draw.
#[derive(Debug, Clone)]
pub struct DisplayOrder {
    tier: PriceTier,
    prizes: Vec<RoulettePrize>,
}

impl DisplayOrder {
    pub fn build<R: Rng + ?Sized>(tier: PriceTier, table: &ChanceTable, rng: &mut R) -> Self {
        let base = roulette_prizes(&GIFTS_CATALOG, table);
        Self {
            tier,
            prizes: shuffle(&base, rng),
        }
    }

    pub fn for_tier<R: Rng + ?Sized>(tier: PriceTier, rng: &mut R) -> Self {
        Self::build(tier, ChanceTable::for_tier(tier), rng)
    }

    pub fn tier(&self) -> PriceTier {
        self.tier
    }

    pub fn prizes(&self) -> &[RoulettePrize] {
        &self.prizes
    }

    pub fn len(&self) -> usize {
        self.prizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prizes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RoulettePrize> {
        self.prizes.get(index)
    }
}

/// The display order repeated enough times that a spin never runs off the end.
#[derive(Debug, Clone)]
pub struct ExtendedTrack {
    cycle_len: usize,
    cycles: usize,
    items: Vec<RoulettePrize>,
}

impl ExtendedTrack {
    pub fn new(order: &DisplayOrder, cycles: usize) -> Self {
        Self {
            cycle_len: order.len(),
            cycles,
            items: extend(order.prizes(), cycles),
        }
    }

    pub fn items(&self) -> &[RoulettePrize] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cycle_len(&self) -> usize {
        self.cycle_len
    }

    pub fn cycles(&self) -> usize {
        self.cycles
    }
}

/// Card width presets for the two viewport size classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardSize {
    Compact,
    Regular,
}

impl CardSize {
    pub fn width(&self) -> f64 {
        match self {
            Self::Compact => COMPACT_CARD_WIDTH,
            Self::Regular => REGULAR_CARD_WIDTH,
        }
    }
}

/// Pixel layout of the track strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackGeometry {
    pub card_width: f64,
    pub gap: f64,
    pub container_width: f64,
    pub pointer_bias: f64,
}

impl Default for TrackGeometry {
    fn default() -> Self {
        Self::for_card_size(CardSize::Regular)
    }
}

impl TrackGeometry {
    pub fn for_card_size(size: CardSize) -> Self {
        Self {
            card_width: size.width(),
            gap: CARD_GAP,
            container_width: DEFAULT_CONTAINER_WIDTH,
            pointer_bias: POINTER_BIAS,
        }
    }

    pub fn item_stride(&self) -> f64 {
        self.card_width + self.gap
    }

    pub fn cycle_width(&self, item_count: usize) -> f64 {
        item_count as f64 * self.item_stride()
    }

    /// Distance between the strip's left edge and the left edge of the card
    /// sitting under the pointer.
    pub fn centering_offset(&self) -> f64 {
        self.container_width / 2.0 - self.card_width / 2.0 + self.pointer_bias
    }

    pub fn landing_slot(item_count: usize, landing_cycle: usize, winner_index: usize) -> usize {
        item_count * landing_cycle + winner_index
    }

    /// Track offset that puts `winner_index` of landing cycle `landing_cycle`
    /// under the pointer.
    pub fn target_offset(&self, item_count: usize, landing_cycle: usize, winner_index: usize) -> f64 {
        let slot = Self::landing_slot(item_count, landing_cycle, winner_index);
        slot as f64 * self.item_stride() - self.centering_offset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::GiftId;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_extend_repeats_every_prize_per_cycle() {
        let mut rng = StdRng::seed_from_u64(3);
        let order = DisplayOrder::for_tier(PriceTier::Stars50, &mut rng);
        for cycles in [1, 2, TRACK_CYCLES] {
            let track = ExtendedTrack::new(&order, cycles);
            assert_eq!(track.len(), GIFTS_CATALOG.len() * cycles);
            for id in GiftId::ALL {
                let count = track.items().iter().filter(|p| p.prize.id == id).count();
                assert_eq!(count, cycles, "{} appears {} times", id, count);
            }
        }
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(99);
        let order = DisplayOrder::for_tier(PriceTier::Stars25, &mut rng);
        let mut ids: Vec<_> = order.prizes().iter().map(|p| p.prize.id.as_str()).collect();
        ids.sort();
        let mut expected: Vec<_> = GiftId::ALL.iter().map(|id| id.as_str()).collect();
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_shuffled_slots_keep_their_weights() {
        let mut rng = StdRng::seed_from_u64(5);
        let table = ChanceTable::for_tier(PriceTier::Stars100);
        let order = DisplayOrder::build(PriceTier::Stars100, table, &mut rng);
        for slot in order.prizes() {
            assert_eq!(slot.weight, table.weight(slot.prize.id));
        }
    }

    #[test]
    fn test_target_offset_centers_winner() {
        let geometry = TrackGeometry::for_card_size(CardSize::Compact);
        assert_eq!(geometry.item_stride(), 166.0);
        // 360 / 2 - 154 / 2 + 6
        assert_eq!(geometry.centering_offset(), 109.0);
        // slot 13 * 5 + 4 = 69
        assert_eq!(geometry.target_offset(13, LANDING_CYCLE, 4), 69.0 * 166.0 - 109.0);
    }

    #[test]
    fn test_landing_slot_stays_before_last_cycle() {
        let n = GIFTS_CATALOG.len();
        for winner in 0..n {
            let slot = TrackGeometry::landing_slot(n, LANDING_CYCLE, winner);
            assert!(slot < n * (TRACK_CYCLES - 1));
            let geometry = TrackGeometry::default();
            // Forward-only from anywhere inside the first cycle
            assert!(geometry.target_offset(n, LANDING_CYCLE, winner) > geometry.cycle_width(n));
        }
    }
}
