//! Hose and nozzle catalog.
//!
//! The catalog is owned by department setup and injected read-only into every
//! calculation. `Catalog::standard()` is the stock table used when no
//! department file is supplied.

use crate::error::{HydraulicsError, HydraulicsResult};
use crate::nozzle::{MasterNozzle, Nozzle};
use hl_core::ensure_non_negative;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Hose diameter label -> friction coefficient C.
    pub coefficients: BTreeMap<String, f64>,
    #[serde(default)]
    pub nozzles: Vec<NozzleDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NozzleDef {
    pub id: String,
    pub label: String,
    pub gpm: f64,
    pub np_psi: f64,
    pub mount: NozzleMount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NozzleMount {
    /// Handline nozzle carried on a given hose size.
    Handline { diameter: String },
    /// Master stream device with its appliance loss.
    Master { appliance_loss_psi: f64 },
}

impl NozzleDef {
    pub fn nozzle(&self) -> Nozzle {
        Nozzle::new(self.label.clone(), self.gpm, self.np_psi)
    }

    pub fn master_nozzle(&self) -> Option<MasterNozzle> {
        match &self.mount {
            NozzleMount::Master { appliance_loss_psi } => Some(MasterNozzle {
                label: self.label.clone(),
                gpm: self.gpm,
                required_pressure: self.np_psi,
                appliance_loss_psi: *appliance_loss_psi,
            }),
            NozzleMount::Handline { .. } => None,
        }
    }

    pub fn fits_handline(&self, diameter: &str) -> bool {
        matches!(&self.mount, NozzleMount::Handline { diameter: d } if normalize_diameter(d) == normalize_diameter(diameter))
    }

    pub fn is_master(&self) -> bool {
        matches!(self.mount, NozzleMount::Master { .. })
    }
}

/// `1.75"`, ` 1.75 ` and `1.75` all name the same hose.
pub fn normalize_diameter(label: &str) -> &str {
    label.trim().trim_end_matches(['"', '″']).trim()
}

fn handline(id: &str, label: &str, gpm: f64, np_psi: f64, diameter: &str) -> NozzleDef {
    NozzleDef {
        id: id.to_string(),
        label: label.to_string(),
        gpm,
        np_psi,
        mount: NozzleMount::Handline {
            diameter: diameter.to_string(),
        },
    }
}

fn master(id: &str, label: &str, gpm: f64, np_psi: f64, appliance_loss_psi: f64) -> NozzleDef {
    NozzleDef {
        id: id.to_string(),
        label: label.to_string(),
        gpm,
        np_psi,
        mount: NozzleMount::Master { appliance_loss_psi },
    }
}

const STANDARD_COEFFICIENTS: [(&str, f64); 7] = [
    ("1.5", 24.0),
    ("1.75", 15.5),
    ("2", 8.0),
    ("2.5", 2.0),
    ("3", 0.8),
    ("4", 0.2),
    ("5", 0.08),
];

impl Catalog {
    /// Stock coefficients and a small nozzle set per line size.
    pub fn standard() -> Self {
        let coefficients = STANDARD_COEFFICIENTS
            .iter()
            .map(|(d, c)| (d.to_string(), *c))
            .collect();

        let nozzles = vec![
            handline("fog-150", "Fog 150 @ 75", 150.0, 75.0, "1.75"),
            handline("sb-7-8", "7/8\" smooth bore", 160.0, 50.0, "1.75"),
            handline("sb-15-16", "15/16\" smooth bore", 185.0, 50.0, "1.75"),
            handline("sb-1", "1\" smooth bore", 210.0, 50.0, "2.5"),
            handline("sb-1-1-8", "1 1/8\" smooth bore", 265.0, 50.0, "2.5"),
            handline("fog-250", "Fog 250 @ 100", 250.0, 100.0, "2.5"),
            master("ms-tip-500", "1 3/8\" master tip", 500.0, 80.0, 25.0),
            master("ms-750", "Master stream 750", 750.0, 80.0, 25.0),
            master("ms-fog-1000", "Master fog 1000", 1000.0, 100.0, 25.0),
        ];

        Self {
            coefficients,
            nozzles,
        }
    }

    /// Friction coefficient for a diameter label, 0 if the size is unknown.
    pub fn coefficient(&self, diameter: &str) -> f64 {
        let key = normalize_diameter(diameter);
        match self.coefficients.get(key) {
            Some(c) => hl_core::sanitize(*c),
            None => {
                tracing::debug!(diameter = key, "no friction coefficient; treating as 0");
                0.0
            }
        }
    }

    /// Whether the table carries a coefficient for this hose size.
    pub fn has_hose(&self, diameter: &str) -> bool {
        self.coefficients.contains_key(normalize_diameter(diameter))
    }

    pub fn nozzle(&self, id: &str) -> Option<&NozzleDef> {
        self.nozzles.iter().find(|n| n.id == id)
    }

    pub fn handline_nozzles<'a>(&'a self, diameter: &'a str) -> impl Iterator<Item = &'a NozzleDef> + 'a {
        self.nozzles.iter().filter(move |n| n.fits_handline(diameter))
    }

    pub fn master_nozzles(&self) -> impl Iterator<Item = &NozzleDef> {
        self.nozzles.iter().filter(|n| n.is_master())
    }

    /// Check every value the calculator will consume.
    pub fn validate(&self) -> HydraulicsResult<()> {
        if self.coefficients.is_empty() {
            return Err(HydraulicsError::Missing {
                what: "hose coefficients".to_string(),
            });
        }
        for c in self.coefficients.values() {
            ensure_non_negative(*c, "hose coefficient")?;
        }

        let mut ids = HashSet::new();
        for nozzle in &self.nozzles {
            if nozzle.id.trim().is_empty() {
                return Err(HydraulicsError::Missing {
                    what: format!("id for nozzle '{}'", nozzle.label),
                });
            }
            if !ids.insert(nozzle.id.as_str()) {
                return Err(HydraulicsError::DuplicateId {
                    id: nozzle.id.clone(),
                    context: "nozzles".to_string(),
                });
            }
            ensure_non_negative(nozzle.gpm, "nozzle gpm")?;
            ensure_non_negative(nozzle.np_psi, "nozzle pressure")?;
            match &nozzle.mount {
                NozzleMount::Handline { diameter } => {
                    if !self.coefficients.contains_key(normalize_diameter(diameter)) {
                        return Err(HydraulicsError::UnknownDiameter {
                            diameter: diameter.clone(),
                            context: format!("nozzle '{}'", nozzle.id),
                        });
                    }
                }
                NozzleMount::Master { appliance_loss_psi } => {
                    ensure_non_negative(*appliance_loss_psi, "appliance loss")?;
                }
            }
        }
        Ok(())
    }

    pub fn from_json_str(content: &str) -> HydraulicsResult<Self> {
        let catalog: Catalog = serde_json::from_str(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_yaml_str(content: &str) -> HydraulicsResult<Self> {
        let catalog: Catalog = serde_yaml::from_str(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a department catalog; `.yaml`/`.yml` parse as YAML, anything else as JSON.
    pub fn load(path: &Path) -> HydraulicsResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let catalog = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content)?,
            _ => Self::from_json_str(&content)?,
        };
        tracing::info!(
            path = %path.display(),
            hoses = catalog.coefficients.len(),
            nozzles = catalog.nozzles.len(),
            "loaded catalog"
        );
        Ok(catalog)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}
