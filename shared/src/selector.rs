use rand::Rng;

use crate::catalog::RoulettePrize;

/// Anything that carries a relative draw weight.
pub trait Weighted {
    fn weight(&self) -> f64;
}

impl<T> Weighted for (T, f64) {
    fn weight(&self) -> f64 {
        self.1
    }
}

impl Weighted for RoulettePrize {
    fn weight(&self) -> f64 {
        self.weight
    }
}

fn usable(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        0.0
    }
}

/// Picks an index by cumulative-weight sampling.
///
/// The draw `r` is uniform in `[0, total)` and the first item whose running
/// sum reaches `r` wins, so a draw landing exactly on a boundary goes to the
/// earlier item. Items with no usable weight never win. When nothing carries
/// weight the result is always index 0.
///
/// The index refers to `items` as given: pass the live display order, not the
/// catalog.
pub fn select_winner<W, R>(items: &[W], rng: &mut R) -> usize
where
    W: Weighted,
    R: Rng + ?Sized,
{
    let total: f64 = items.iter().map(|item| usable(item.weight())).sum();
    if !(total.is_finite() && total > 0.0) {
        log::warn!("Weighted draw over {} items has no usable weight, falling back to slot 0", items.len());
        return 0;
    }

    let r = rng.gen_range(0.0..total);
    let mut cumulative = 0.0;
    let mut last_positive = 0;
    for (index, item) in items.iter().enumerate() {
        let weight = usable(item.weight());
        if weight == 0.0 {
            continue;
        }
        cumulative += weight;
        last_positive = index;
        if cumulative >= r {
            return index;
        }
    }

    // Only reachable through float rounding of the running sum
    last_positive
}
