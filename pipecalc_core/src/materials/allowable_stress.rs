//! Allowable Stress Tables (pressure-vessel plate)
//!
//! Design stress versus temperature for the plate grades offered by the
//! wall-thickness calculation. Values are in MPa, temperatures in °C, and
//! follow the ASME Section II Part D tabulation rounded to whole MPa.
//!
//! Tables are materialized once per material/grade key on first use and
//! shared afterwards.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::correlations::CorrelationTable;
use crate::errors::{CalcError, CalcResult};

/// Material families with allowable-stress data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VesselMaterial {
    #[serde(rename = "Carbon Steel")]
    CarbonSteel,
    #[serde(rename = "Stainless Steel")]
    StainlessSteel,
}

impl VesselMaterial {
    pub const ALL: [VesselMaterial; 2] = [VesselMaterial::CarbonSteel, VesselMaterial::StainlessSteel];

    pub fn display_name(&self) -> &'static str {
        match self {
            VesselMaterial::CarbonSteel => "Carbon Steel",
            VesselMaterial::StainlessSteel => "Stainless Steel",
        }
    }

    /// Parse the display name used in input forms
    pub fn from_name(s: &str) -> CalcResult<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.display_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CalcError::material_not_found(s))
    }

    /// Grades available for this material, in table order
    pub fn grades(&self) -> &'static [&'static str] {
        match self {
            VesselMaterial::CarbonSteel => &["SA-516 Gr.60", "SA-516 Gr.70"],
            VesselMaterial::StainlessSteel => &["SA-240 TP304", "SA-240 TP316"],
        }
    }
}

impl std::fmt::Display for VesselMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Raw rows: (material, grade, temperatures °C, allowable stress MPa)
type StressRow = (VesselMaterial, &'static str, &'static [f64], &'static [f64]);

const STRESS_DATA: [StressRow; 4] = [
    (
        VesselMaterial::CarbonSteel,
        "SA-516 Gr.60",
        &[-29.0, 20.0, 50.0, 100.0, 150.0, 200.0, 250.0, 300.0, 350.0, 400.0],
        &[117.0, 117.0, 117.0, 117.0, 115.0, 108.0, 98.0, 86.0, 71.0, 54.0],
    ),
    (
        VesselMaterial::CarbonSteel,
        "SA-516 Gr.70",
        &[-29.0, 20.0, 50.0, 100.0, 150.0, 200.0, 250.0, 300.0],
        &[138.0, 138.0, 138.0, 138.0, 136.0, 129.0, 118.0, 105.0],
    ),
    (
        VesselMaterial::StainlessSteel,
        "SA-240 TP304",
        &[-200.0, 20.0, 100.0, 200.0, 300.0, 400.0, 500.0],
        &[138.0, 138.0, 114.0, 103.0, 95.0, 89.0, 83.0],
    ),
    (
        VesselMaterial::StainlessSteel,
        "SA-240 TP316",
        &[-196.0, 20.0, 100.0, 200.0, 300.0, 400.0, 500.0],
        &[146.0, 146.0, 122.0, 111.0, 103.0, 97.0, 92.0],
    ),
];

static STRESS_TABLES: Lazy<HashMap<(VesselMaterial, &'static str), CalcResult<CorrelationTable>>> =
    Lazy::new(|| {
        STRESS_DATA
            .iter()
            .map(|(material, grade, temps, stress)| {
                (
                    (*material, *grade),
                    CorrelationTable::new(temps.to_vec(), stress.to_vec()),
                )
            })
            .collect()
    });

/// Allowable-stress table for a material/grade pair.
///
/// Unknown pairs are reported as [`CalcError::MaterialNotFound`]. A
/// malformed built-in table surfaces as [`CalcError::Internal`].
pub fn stress_table(material: VesselMaterial, grade: &str) -> CalcResult<&'static CorrelationTable> {
    let key = material
        .grades()
        .iter()
        .copied()
        .find(|g| g.eq_ignore_ascii_case(grade.trim()))
        .ok_or_else(|| CalcError::material_not_found(format!("{} {}", material, grade)))?;

    match STRESS_TABLES.get(&(material, key)) {
        Some(Ok(table)) => Ok(table),
        Some(Err(err)) => Err(err.clone()),
        None => Err(CalcError::internal(format!(
            "no stress table materialized for {} {}",
            material, key
        ))),
    }
}

/// Allowable stress (MPa) at `temperature_c`, clamped to the table range.
pub fn allowable_stress(material: VesselMaterial, grade: &str, temperature_c: f64) -> CalcResult<f64> {
    Ok(stress_table(material, grade)?.lookup(temperature_c))
}
