//! Seedable randomness for scenario and question generation.
//!
//! Everything that draws random numbers takes `&mut dyn RandomSource`, so a
//! session can run on a seeded `ChaCha8Rng` and tests can script exact draws.

use crate::HlError;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Default seed used when no explicit seed is provided.
pub const DEFAULT_SEED: u64 = 42;

/// A stream of uniform draws in `[0, 1)`.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

/// Deterministic source backed by `ChaCha8Rng`.
#[derive(Debug, Clone)]
pub struct SeededRng(pub ChaCha8Rng);

impl Default for SeededRng {
    fn default() -> Self {
        Self(ChaCha8Rng::seed_from_u64(DEFAULT_SEED))
    }
}

impl SeededRng {
    pub fn from_seed_u64(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Non-reproducible stream seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self(ChaCha8Rng::from_entropy())
    }
}

impl RandomSource for SeededRng {
    fn next_unit(&mut self) -> f64 {
        self.0.gen_range(0.0..1.0)
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
///
/// Values are clamped into `[0, 1)`. An empty list always yields 0.
#[derive(Debug, Clone, Default)]
pub struct SequenceSource {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceSource {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }
}

impl RandomSource for SequenceSource {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        if v.is_finite() {
            v.clamp(0.0, 1.0 - f64::EPSILON)
        } else {
            0.0
        }
    }
}

/// A candidate value with its relative weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weighted<T> {
    pub value: T,
    pub weight: f64,
}

impl<T> Weighted<T> {
    pub const fn new(value: T, weight: f64) -> Self {
        Self { value, weight }
    }
}

/// Roulette-wheel selection.
///
/// Draws `r` in `[0, sum)` and subtracts weights in order until `r <= 0`.
/// Non-finite or negative weights count as 0. When every weight is 0 the
/// pick is uniform over the entries.
pub fn weighted_pick<'a, T>(
    rng: &mut dyn RandomSource,
    items: &'a [Weighted<T>],
) -> Result<&'a T, HlError> {
    if items.is_empty() {
        return Err(HlError::EmptyChoice {
            what: "weighted candidates",
        });
    }

    let weight_of = |w: f64| if w.is_finite() && w > 0.0 { w } else { 0.0 };
    let total: f64 = items.iter().map(|item| weight_of(item.weight)).sum();
    let u = rng.next_unit();

    if total <= 0.0 {
        let idx = ((u * items.len() as f64) as usize).min(items.len() - 1);
        return Ok(&items[idx].value);
    }

    let mut r = u * total;
    for item in items {
        let w = weight_of(item.weight);
        if w == 0.0 {
            continue;
        }
        r -= w;
        if r <= 0.0 {
            return Ok(&item.value);
        }
    }

    // Float residue: fall back to the last entry that carries weight.
    let last = items
        .iter()
        .rev()
        .find(|item| weight_of(item.weight) > 0.0)
        .unwrap_or(&items[items.len() - 1]);
    Ok(&last.value)
}

/// Uniform pick from a slice.
pub fn pick_uniform<'a, T>(rng: &mut dyn RandomSource, items: &'a [T]) -> Result<&'a T, HlError> {
    if items.is_empty() {
        return Err(HlError::EmptyChoice {
            what: "uniform candidates",
        });
    }
    let idx = ((rng.next_unit() * items.len() as f64) as usize).min(items.len() - 1);
    Ok(&items[idx])
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABC: [Weighted<char>; 3] = [
        Weighted::new('a', 34.0),
        Weighted::new('b', 33.0),
        Weighted::new('c', 33.0),
    ];

    #[test]
    fn roulette_boundaries() {
        // r = u * 100
        let mut rng = SequenceSource::new([0.0, 0.33, 0.3399, 0.35, 0.66, 0.68, 0.999]);
        let picks: Vec<char> = (0..7)
            .map(|_| *weighted_pick(&mut rng, &ABC).unwrap())
            .collect();
        assert_eq!(picks, vec!['a', 'a', 'a', 'b', 'b', 'c', 'c']);
    }

    #[test]
    fn zero_weight_entries_are_skipped() {
        let items = [
            Weighted::new(1, 0.0),
            Weighted::new(2, 1.0),
            Weighted::new(3, f64::NAN),
        ];
        let mut rng = SequenceSource::new([0.0, 0.5, 0.99]);
        for _ in 0..3 {
            assert_eq!(*weighted_pick(&mut rng, &items).unwrap(), 2);
        }
    }

    #[test]
    fn all_zero_weights_pick_uniformly() {
        let items = [Weighted::new('x', 0.0), Weighted::new('y', 0.0)];
        let mut rng = SequenceSource::new([0.1, 0.9]);
        assert_eq!(*weighted_pick(&mut rng, &items).unwrap(), 'x');
        assert_eq!(*weighted_pick(&mut rng, &items).unwrap(), 'y');
    }

    #[test]
    fn empty_candidates_error() {
        let items: [Weighted<u8>; 0] = [];
        let mut rng = SequenceSource::new([0.5]);
        assert!(matches!(
            weighted_pick(&mut rng, &items),
            Err(HlError::EmptyChoice { .. })
        ));
        let none: [u8; 0] = [];
        assert!(pick_uniform(&mut rng, &none).is_err());
    }

    #[test]
    fn seeded_streams_repeat() {
        let mut a = SeededRng::from_seed_u64(7);
        let mut b = SeededRng::from_seed_u64(7);
        for _ in 0..32 {
            let (x, y) = (a.next_unit(), b.next_unit());
            assert_eq!(x, y);
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn sequence_source_clamps_and_cycles() {
        let mut rng = SequenceSource::new([1.5, -2.0]);
        assert!(rng.next_unit() < 1.0);
        assert_eq!(rng.next_unit(), 0.0);
        assert!(rng.next_unit() < 1.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn pick_always_returns_a_weighted_entry(
            weights in prop::collection::vec(0.0f64..10.0, 1..8),
            u in 0.0f64..1.0,
        ) {
            let items: Vec<Weighted<usize>> = weights
                .iter()
                .enumerate()
                .map(|(i, w)| Weighted::new(i, *w))
                .collect();
            let mut rng = SequenceSource::new([u]);
            let picked = *weighted_pick(&mut rng, &items).unwrap();
            prop_assert!(picked < items.len());
            if weights.iter().any(|w| *w > 0.0) {
                prop_assert!(weights[picked] > 0.0);
            }
        }
    }
}
