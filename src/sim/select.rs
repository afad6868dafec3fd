//! Weighted random selection over archetype lists

use rand::Rng;

use crate::config::{EnemyArchetype, ItemArchetype};

/// Anything that can be drawn proportionally to a weight
pub trait Weighted {
    fn weight(&self) -> f32;
}

impl Weighted for EnemyArchetype {
    fn weight(&self) -> f32 {
        self.weight
    }
}

impl Weighted for ItemArchetype {
    fn weight(&self) -> f32 {
        self.weight
    }
}

/// Pick an index with probability proportional to its weight.
///
/// Draws r in [0, total) and walks the list subtracting weights until r goes
/// negative, so ties resolve in list order. Returns `None` for an empty list
/// or a non-positive total.
pub fn weighted_index<T: Weighted>(entries: &[T], rng: &mut impl Rng) -> Option<usize> {
    let total: f32 = entries.iter().map(|e| e.weight().max(0.0)).sum();
    if total <= 0.0 {
        return None;
    }

    let mut remaining = rng.random::<f32>() * total;
    let mut last_positive = None;
    for (i, entry) in entries.iter().enumerate() {
        let weight = entry.weight().max(0.0);
        if weight <= 0.0 {
            continue;
        }
        remaining -= weight;
        if remaining < 0.0 {
            return Some(i);
        }
        last_positive = Some(i);
    }
    // Float rounding can leave r == 0 after the last subtraction
    last_positive
}

/// Like [`weighted_index`] but returns the entry
pub fn weighted_pick<'a, T: Weighted>(entries: &'a [T], rng: &mut impl Rng) -> Option<&'a T> {
    weighted_index(entries, rng).map(|i| &entries[i])
}
