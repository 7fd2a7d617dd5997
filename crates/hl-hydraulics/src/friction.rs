//! Fireground friction loss: `FL = C × (Q/100)² × (L/100)`.

use crate::catalog::Catalog;
use hl_core::sanitize;
use serde::{Deserialize, Serialize};

/// One run of hose of a single diameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoseSegment {
    /// Diameter label as used in the coefficient table ("1.75", "2.5", ...)
    pub diameter: String,
    pub length_ft: f64,
}

impl HoseSegment {
    pub fn new(diameter: impl Into<String>, length_ft: f64) -> Self {
        Self {
            diameter: diameter.into(),
            length_ft,
        }
    }
}

/// Friction loss in psi for coefficient `c`, flow `gpm` and length `length_ft`.
///
/// Any missing, zero, negative or non-finite input yields 0.
pub fn friction_loss(c: f64, gpm: f64, length_ft: f64) -> f64 {
    let (c, gpm, length_ft) = (sanitize(c), sanitize(gpm), sanitize(length_ft));
    if c == 0.0 || gpm == 0.0 || length_ft == 0.0 {
        return 0.0;
    }
    let q = gpm / 100.0;
    c * q * q * (length_ft / 100.0)
}

/// Sum of friction loss over segments carrying the same flow.
pub fn friction_loss_total(catalog: &Catalog, gpm: f64, segments: &[HoseSegment]) -> f64 {
    segments
        .iter()
        .map(|seg| friction_loss(catalog.coefficient(&seg.diameter), gpm, seg.length_ft))
        .sum()
}
