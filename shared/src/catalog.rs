use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::RouletteError;

/// Identifier of a virtual gift that can be won on the roulette.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum GiftId {
    HeartBox,
    TeddyBear,
    GiftBox,
    Rose,
    Elka,
    Newteddy,
    Cake,
    Bouquet,
    Rocket,
    Champagne,
    Trophy,
    Ring,
    Diamond,
}

impl GiftId {
    pub const ALL: [GiftId; 13] = [
        GiftId::HeartBox,
        GiftId::TeddyBear,
        GiftId::GiftBox,
        GiftId::Rose,
        GiftId::Elka,
        GiftId::Newteddy,
        GiftId::Cake,
        GiftId::Bouquet,
        GiftId::Rocket,
        GiftId::Champagne,
        GiftId::Trophy,
        GiftId::Ring,
        GiftId::Diamond,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HeartBox => "heart-box",
            Self::TeddyBear => "teddy-bear",
            Self::GiftBox => "gift-box",
            Self::Rose => "rose",
            Self::Elka => "elka",
            Self::Newteddy => "newteddy",
            Self::Cake => "cake",
            Self::Bouquet => "bouquet",
            Self::Rocket => "rocket",
            Self::Champagne => "champagne",
            Self::Trophy => "trophy",
            Self::Ring => "ring",
            Self::Diamond => "diamond",
        }
    }
}

impl fmt::Display for GiftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GiftId {
    type Err = RouletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GiftId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| RouletteError::UnknownGift(s.to_string()))
    }
}

/// Static description of a prize. Loaded once, never mutated.
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct PrizeDefinition {
    pub id: GiftId,
    pub label: &'static str,
    pub icon: &'static str,
    /// Nominal value of the gift in stars
    pub price: u32,
}

pub static GIFTS_CATALOG: [PrizeDefinition; 13] = [
    PrizeDefinition { id: GiftId::HeartBox, label: "Heart", icon: "/static/gifts/heart-box.svg", price: 15 },
    PrizeDefinition { id: GiftId::TeddyBear, label: "Teddy Bear", icon: "/static/gifts/teddy-bear.svg", price: 15 },
    PrizeDefinition { id: GiftId::GiftBox, label: "Gift Box", icon: "/static/gifts/gift-box.svg", price: 25 },
    PrizeDefinition { id: GiftId::Rose, label: "Rose", icon: "/static/gifts/rose.svg", price: 25 },
    PrizeDefinition { id: GiftId::Elka, label: "Christmas Tree", icon: "/static/gifts/elka.svg", price: 50 },
    PrizeDefinition { id: GiftId::Newteddy, label: "New Teddy", icon: "/static/gifts/newteddy.svg", price: 50 },
    PrizeDefinition { id: GiftId::Cake, label: "Cake", icon: "/static/gifts/cake.svg", price: 50 },
    PrizeDefinition { id: GiftId::Bouquet, label: "Bouquet", icon: "/static/gifts/bouquet.svg", price: 50 },
    PrizeDefinition { id: GiftId::Rocket, label: "Rocket", icon: "/static/gifts/rocket.svg", price: 50 },
    PrizeDefinition { id: GiftId::Champagne, label: "Champagne", icon: "/static/gifts/champagne.svg", price: 50 },
    PrizeDefinition { id: GiftId::Trophy, label: "Trophy", icon: "/static/gifts/trophy.svg", price: 100 },
    PrizeDefinition { id: GiftId::Ring, label: "Ring", icon: "/static/gifts/ring.svg", price: 100 },
    PrizeDefinition { id: GiftId::Diamond, label: "Diamond", icon: "/static/gifts/diamond.svg", price: 100 },
];

pub fn prize(id: GiftId) -> &'static PrizeDefinition {
    // GIFTS_CATALOG lists every GiftId in declaration order
    &GIFTS_CATALOG[id as usize]
}

/// Entry price of a spin, in Telegram stars.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(try_from = "u32", into = "u32")]
pub enum PriceTier {
    Stars25,
    Stars50,
    Stars100,
}

impl PriceTier {
    pub const ALL: [PriceTier; 3] = [PriceTier::Stars25, PriceTier::Stars50, PriceTier::Stars100];

    pub fn stars(&self) -> u32 {
        match self {
            Self::Stars25 => 25,
            Self::Stars50 => 50,
            Self::Stars100 => 100,
        }
    }
}

impl Default for PriceTier {
    fn default() -> Self {
        PriceTier::Stars25
    }
}

impl TryFrom<u32> for PriceTier {
    type Error = RouletteError;

    fn try_from(stars: u32) -> Result<Self, Self::Error> {
        match stars {
            25 => Ok(Self::Stars25),
            50 => Ok(Self::Stars50),
            100 => Ok(Self::Stars100),
            other => Err(RouletteError::UnsupportedPrice(other)),
        }
    }
}

impl From<PriceTier> for u32 {
    fn from(tier: PriceTier) -> u32 {
        tier.stars()
    }
}

impl fmt::Display for PriceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.stars())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChanceEntry {
    pub weight: f64,
    pub label: &'static str,
}

/// Odds of every gift for one price tier. Weights are relative and are
/// normalised by their live sum when drawing.
#[derive(Debug, Clone, Default)]
pub struct ChanceTable {
    entries: HashMap<GiftId, ChanceEntry>,
}

pub const MISSING_CHANCE_LABEL: &str = "—";

impl ChanceTable {
    pub fn new(entries: impl IntoIterator<Item = (GiftId, f64, &'static str)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(id, weight, label)| (id, ChanceEntry { weight, label }))
                .collect(),
        }
    }

    pub fn for_tier(tier: PriceTier) -> &'static ChanceTable {
        &CHANCE_TABLES[&tier]
    }

    pub fn weight(&self, id: GiftId) -> f64 {
        self.entries.get(&id).map(|e| e.weight).unwrap_or(0.0)
    }

    pub fn label(&self, id: GiftId) -> &'static str {
        self.entries.get(&id).map(|e| e.label).unwrap_or(MISSING_CHANCE_LABEL)
    }

    pub fn total_weight(&self) -> f64 {
        self.entries.values().map(|e| e.weight.max(0.0)).sum()
    }

    /// A table whose weights sum to nothing can't drive a draw; the selector
    /// falls back to the first slot, which is a configuration bug.
    pub fn validate(&self, tier: PriceTier) -> Result<(), RouletteError> {
        let total = self.total_weight();
        if total.is_finite() && total > 0.0 {
            Ok(())
        } else {
            Err(RouletteError::DegenerateWeights(tier))
        }
    }
}

pub static CHANCE_TABLES: Lazy<HashMap<PriceTier, ChanceTable>> = Lazy::new(|| {
    use GiftId::*;

    let mut tables = HashMap::new();
    tables.insert(
        PriceTier::Stars25,
        ChanceTable::new([
            (HeartBox, 18.0, "18%"),
            (TeddyBear, 18.0, "18%"),
            (GiftBox, 26.0, "26%"),
            (Rose, 26.0, "26%"),
            (Elka, 2.0, "2%"),
            (Newteddy, 2.0, "2%"),
            (Cake, 2.0, "2%"),
            (Bouquet, 2.0, "2%"),
            (Rocket, 2.0, "2%"),
            (Champagne, 2.0, "2%"),
            (Trophy, 0.33, "0.33%"),
            (Ring, 0.33, "0.33%"),
            (Diamond, 0.34, "0.34%"),
        ]),
    );
    tables.insert(
        PriceTier::Stars50,
        ChanceTable::new([
            (HeartBox, 7.0, "7%"),
            (TeddyBear, 7.0, "7%"),
            (GiftBox, 24.0, "24%"),
            (Rose, 24.0, "24%"),
            (Elka, 5.5, "5.5%"),
            (Newteddy, 5.5, "5.5%"),
            (Cake, 5.5, "5.5%"),
            (Bouquet, 5.5, "5.5%"),
            (Rocket, 5.5, "5.5%"),
            (Champagne, 5.5, "5.5%"),
            (Trophy, 1.33, "1.33%"),
            (Ring, 1.33, "1.33%"),
            (Diamond, 1.34, "1.34%"),
        ]),
    );
    tables.insert(
        PriceTier::Stars100,
        ChanceTable::new([
            (HeartBox, 1.0, "1%"),
            (TeddyBear, 1.0, "1%"),
            (GiftBox, 2.0, "2%"),
            (Rose, 2.0, "2%"),
            (Elka, 12.0, "12%"),
            (Newteddy, 12.0, "12%"),
            (Cake, 12.0, "12%"),
            (Bouquet, 12.0, "12%"),
            (Rocket, 12.0, "12%"),
            (Champagne, 12.0, "12%"),
            (Trophy, 6.67, "6.67%"),
            (Ring, 6.67, "6.67%"),
            (Diamond, 6.66, "6.66%"),
        ]),
    );
    tables
});

/// A catalog prize joined with the odds of the active tier.
#[derive(Debug, Clone, PartialEq)]
pub struct RoulettePrize {
    pub prize: PrizeDefinition,
    pub weight: f64,
    pub chance_label: &'static str,
}

/// Joins the catalog with a chance table, keeping catalog order.
pub fn roulette_prizes(catalog: &[PrizeDefinition], table: &ChanceTable) -> Vec<RoulettePrize> {
    catalog
        .iter()
        .map(|prize| RoulettePrize {
            prize: *prize,
            weight: table.weight(prize.id),
            chance_label: table.label(prize.id),
        })
        .collect()
}
