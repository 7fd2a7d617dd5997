//! hl-hydraulics: fireground hydraulics for hoseline.
//!
//! Provides:
//! - Catalog of hose friction coefficients and nozzles (injected, read-only)
//! - Friction loss `C × (Q/100)² × (L/100)`
//! - Pump discharge pressure for single lines, two-branch wyes and
//!   twin-line master streams
//! - Tender shuttle, foam proportioning and standpipe sub-models
//!
//! Arithmetic never fails: missing, negative or non-finite inputs contribute 0.
//!
//! # Example
//!
//! ```
//! use hl_hydraulics::{Calculator, Catalog, ElevationRule, HoseSegment, Nozzle};
//!
//! let catalog = Catalog::standard();
//! let calc = Calculator::new(&catalog, ElevationRule::LineEditor);
//! let nozzle = Nozzle::new("15/16\" smooth bore", 185.0, 50.0);
//!
//! let derived = calc.single_line(&nozzle, &[HoseSegment::new("1.75", 200.0)], 0.0);
//! assert_eq!(derived.pdp_rounded(), 156.0);
//! ```

pub mod calculator;
pub mod catalog;
pub mod elevation;
pub mod error;
pub mod foam;
pub mod friction;
pub mod nozzle;
pub mod scenario;
pub mod standpipe;
pub mod tender;

// Re-exports
pub use calculator::{BranchLine, BranchNeed, Calculator, Derived, DerivedDetail};
pub use catalog::{Catalog, NozzleDef, NozzleMount, normalize_diameter};
pub use elevation::{ElevationRule, HYDROSTATIC_PSI_PER_FT, LINE_EDITOR_PSI_PER_FT};
pub use error::{HydraulicsError, HydraulicsResult};
pub use foam::FoamProportioning;
pub use friction::{HoseSegment, friction_loss, friction_loss_total};
pub use nozzle::{MasterNozzle, Nozzle};
pub use scenario::{
    BRANCH_DIAMETER, Branch, BranchId, LineId, MASTER_SUPPLY_DIAMETER, MasterLayout, Scenario,
    ScenarioKind, SingleLine, SupplyLine, WYE_LOSS_PSI, WyeLayout,
};
pub use standpipe::{
    DEFAULT_PSI_PER_FLOOR, DEFAULT_STANDPIPE_APPLIANCE_LOSS_PSI, StandpipeBreakdown, StandpipeLayout,
};
pub use tender::TenderShuttle;
