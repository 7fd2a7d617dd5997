//! Practice mode configuration.

use crate::error::{PracticeError, PracticeResult};
use hl_hydraulics::ElevationRule;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_TOLERANCE_PSI: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PracticeConfig {
    /// Allowed distance between a numeric answer and the rounded expected value.
    pub tolerance_psi: f64,
    /// Limit stated in yes/no "can you pump this" questions.
    pub check_limit_psi: f64,
    /// Generated layouts above this PDP are rejected and redrawn.
    pub pdp_ceiling_psi: f64,
    /// Redraw budget; the last candidate is accepted when it runs out.
    pub max_attempts: usize,
    /// Chance of serving a bank question when a bank is loaded.
    pub multi_share: f64,
    pub elevation: ElevationRule,
    /// Fixed seed for reproducible sessions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for PracticeConfig {
    fn default() -> Self {
        Self {
            tolerance_psi: DEFAULT_TOLERANCE_PSI,
            check_limit_psi: 150.0,
            pdp_ceiling_psi: 270.0,
            max_attempts: 18,
            multi_share: 0.2,
            elevation: ElevationRule::LineEditor,
            seed: None,
        }
    }
}

impl PracticeConfig {
    pub fn validate(&self) -> PracticeResult<()> {
        let non_negative = |v: f64, what: &str| {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(PracticeError::Config {
                    what: format!("{what} must be a non-negative number (got {v})"),
                })
            }
        };
        non_negative(self.tolerance_psi, "tolerance_psi")?;
        non_negative(self.check_limit_psi, "check_limit_psi")?;
        non_negative(self.pdp_ceiling_psi, "pdp_ceiling_psi")?;
        if !(0.0..=1.0).contains(&self.multi_share) {
            return Err(PracticeError::Config {
                what: format!("multi_share must be within 0..=1 (got {})", self.multi_share),
            });
        }
        if self.max_attempts == 0 {
            return Err(PracticeError::Config {
                what: "max_attempts must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Load from YAML (`.yaml`/`.yml`) or JSON, then validate.
    pub fn load(path: &Path) -> PracticeResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: PracticeConfig = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            _ => serde_json::from_str(&content)?,
        };
        config.validate()?;
        Ok(config)
    }
}
