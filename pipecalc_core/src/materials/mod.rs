//! # Materials Database
//!
//! Material data used by the calculations.
//!
//! - [`allowable_stress`] - Temperature-indexed allowable stress for vessel plate grades
//! - [`pipe_materials`] - Densities for pipe mass take-off
//!
//! ## Example
//!
//! ```rust
//! use pipecalc_core::materials::{allowable_stress, VesselMaterial};
//!
//! let s = allowable_stress(VesselMaterial::CarbonSteel, "SA-516 Gr.60", 20.0).unwrap();
//! assert_eq!(s, 117.0);
//! ```

pub mod allowable_stress;
pub mod pipe_materials;

pub use allowable_stress::{allowable_stress, stress_table, VesselMaterial};
pub use pipe_materials::PipeMaterial;
