//! hl-core: shared foundation for hoseline.
//!
//! Contains:
//! - numeric (Real + tolerances + sanitizing/rounding helpers)
//! - units (uom constructors for psi, ft and gpm + water column head)
//! - rng (seedable random source + roulette-wheel weighted pick)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod rng;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{HlError, HlResult};
pub use numeric::*;
pub use rng::{DEFAULT_SEED, RandomSource, SeededRng, SequenceSource, Weighted, pick_uniform, weighted_pick};
