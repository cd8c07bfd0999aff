//! Pipe material densities for mass take-off.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Pipe materials with a tabulated density
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PipeMaterial {
    #[serde(rename = "Carbon Steel")]
    CarbonSteel,
    #[serde(rename = "Stainless Steel")]
    StainlessSteel,
    #[serde(rename = "Alloy Steel")]
    AlloySteel,
    #[serde(rename = "Copper")]
    Copper,
    #[serde(rename = "Aluminium")]
    Aluminium,
}

impl PipeMaterial {
    pub const ALL: [PipeMaterial; 5] = [
        PipeMaterial::CarbonSteel,
        PipeMaterial::StainlessSteel,
        PipeMaterial::AlloySteel,
        PipeMaterial::Copper,
        PipeMaterial::Aluminium,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            PipeMaterial::CarbonSteel => "Carbon Steel",
            PipeMaterial::StainlessSteel => "Stainless Steel",
            PipeMaterial::AlloySteel => "Alloy Steel",
            PipeMaterial::Copper => "Copper",
            PipeMaterial::Aluminium => "Aluminium",
        }
    }

    /// Density in kg/m³
    pub fn density(&self) -> f64 {
        match self {
            PipeMaterial::CarbonSteel | PipeMaterial::AlloySteel => 7850.0,
            PipeMaterial::StainlessSteel => 7900.0,
            PipeMaterial::Copper => 8960.0,
            PipeMaterial::Aluminium => 2700.0,
        }
    }

    pub fn from_name(s: &str) -> CalcResult<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.display_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CalcError::material_not_found(s))
    }
}

impl std::fmt::Display for PipeMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
