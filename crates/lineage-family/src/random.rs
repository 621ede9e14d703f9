//! Seeded random helpers shared by the lifecycle and event crates.
//!
//! Every function takes the caller's RNG so whole runs replay from one seed.

use rand::Rng;

/// True with probability `p`. Values at or below 0 never fire, values at or
/// above 1 always fire, NaN never fires.
pub fn roll(rng: &mut (impl Rng + ?Sized), p: f64) -> bool {
    rng.random::<f64>() < p
}

/// A uniformly chosen element, or `None` for an empty slice.
pub fn pick<'a, T>(rng: &mut (impl Rng + ?Sized), items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(rng.random_range(0..items.len()))
}

/// A uniformly chosen token, or `fallback` when the pool is empty.
pub fn pick_token(rng: &mut (impl Rng + ?Sized), pool: &[String], fallback: &str) -> String {
    pick(rng, pool).map_or_else(|| fallback.to_owned(), Clone::clone)
}

/// A uniform integer offset in `[-spread, spread]`; zero for non-positive spread.
pub fn noise(rng: &mut (impl Rng + ?Sized), spread: i32) -> i32 {
    if spread <= 0 {
        return 0;
    }
    rng.random_range(spread.saturating_neg()..=spread)
}

/// A uniform integer in `[min, max]`; `min` when the range is empty.
pub fn between(rng: &mut (impl Rng + ?Sized), min: i32, max: i32) -> i32 {
    if max <= min {
        return min;
    }
    rng.random_range(min..=max)
}

/// A uniform float in `[min, max)`; `min` when the range is empty or
/// either bound is not finite.
pub fn between_f64(rng: &mut (impl Rng + ?Sized), min: f64, max: f64) -> f64 {
    if !min.is_finite() || !max.is_finite() || max <= min {
        return min;
    }
    rng.random_range(min..max)
}
