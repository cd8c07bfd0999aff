//! # Correlation Library
//!
//! Stateless numeric routines used by the calculation modules. Keeping the
//! formulas in one place makes them easy to check against their references
//! and keeps the modules themselves to input handling and packaging.
//!
//! ## Modules
//!
//! - [`interpolation`] - Piecewise-linear lookup over breakpoint tables
//! - [`fluids`] - Density and viscosity of water, air and diesel
//! - [`friction`] - Reynolds number, laminar/turbulent friction factor, Darcy–Weisbach
//! - [`pipe`] - Bore areas, mean velocity, standard diameters, velocity bands
//! - [`gas`] - Fuel-gas composition normalization and mixture properties
//!
//! ## Conventions
//!
//! - SI inside every formula (m, m³/s, Pa, kg/m³, Pa·s)
//! - Temperatures in °C at the boundary, converted to kelvin where a formula needs it
//! - No function here validates its arguments; modules do that first

pub mod fluids;
pub mod friction;
pub mod gas;
pub mod interpolation;
pub mod pipe;

pub use fluids::{fluid_properties, Fluid, FluidProperties};
pub use friction::{
    darcy_pressure_drop, friction_factor, laminar_friction_factor, reynolds_number,
    turbulent_friction_factor, FlowRegime, LAMINAR_LIMIT,
};
pub use gas::{Composition, GasComponent, NORMAL_MOLAR_VOLUME};
pub use interpolation::{interpolate, CorrelationTable};
pub use pipe::{
    annulus_area, circular_area, mean_velocity, Band, GAS_BAND, LIQUID_BAND, STANDARD_DIAMETERS_MM,
};
