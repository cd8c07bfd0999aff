//! # pipecalc_core - Piping and Process Calculation Engine
//!
//! `pipecalc_core` holds a catalog of self-contained engineering calculation
//! modules (hydraulics, pressure-part sizing, line sizing, fuel-gas
//! properties) behind one uniform contract. Every input and output is
//! JSON-serializable, so a web form, a terminal or another program can
//! drive the same modules.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Modules are pure; the registry's load-once cache is the only shared state
//! - **JSON-First**: Inputs, results, configs and reports implement Serialize/Deserialize
//! - **Rich Errors**: Domain violations come back as `{success: false}`, everything else as [`CalcError`]
//! - **Self-Testing**: Each module ships a smoke test and a named assertion suite
//!
//! ## Quick Start
//!
//! ```rust
//! use pipecalc_core::{CalculationModule, Inputs, Registry};
//!
//! let registry = Registry::builtin();
//! let module = registry.get("pipe_flow_resistance").unwrap();
//!
//! let inputs = Inputs::new()
//!     .with("flowRate", 100.0)
//!     .with("diameter", 0.1)
//!     .with("length", 100.0);
//! let result = module.calculate(&inputs).unwrap();
//! assert!(result.scalar("pressureDrop").unwrap() > 0.0);
//!
//! // Serialize to JSON for a renderer
//! let json = serde_json::to_string_pretty(&result).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - The calculation modules and their shared contract
//! - [`correlations`] - Interpolation, fluid properties, friction factor, gas mixtures
//! - [`materials`] - Allowable-stress tables and pipe material densities
//! - [`schema`] - Input/output declarations and the schema-driven input resolver
//! - [`inputs`] - Raw input maps as supplied by a form or file
//! - [`result`] - Result sets and validation outcomes
//! - [`registry`] - Id → module lookup with load-once caching
//! - [`harness`] - Batch execution of module test suites
//! - [`manifest`] - Manifest and catalog types
//! - [`units`] - Unit symbols and conversion constants
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod correlations;
pub mod errors;
pub mod harness;
pub mod inputs;
pub mod manifest;
pub mod materials;
pub mod registry;
pub mod result;
pub mod schema;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{CalculationModule, TestCaseResult};
pub use errors::{CalcError, CalcResult};
pub use harness::{ExecutionMode, HarnessConfig, TestHarness, TestReport, TestReportEntry};
pub use inputs::{InputValue, Inputs};
pub use manifest::{Catalog, Manifest};
pub use registry::Registry;
pub use result::{ResultSet, ValidationOutcome};
pub use schema::{CalculationConfig, InputSpec, OutputSpec};
