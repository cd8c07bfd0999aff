//! Piecewise-linear interpolation over ordered breakpoint tables.
//!
//! Lookups clamp at both ends: a target below the first breakpoint returns
//! the first value, a target above the last breakpoint returns the last
//! value. There is no extrapolation.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Interpolate `values` at `target` over ascending `breakpoints`.
///
/// Breakpoints must be strictly ascending and both slices must have the
/// same, non-zero length. [`CorrelationTable::new`] checks this; the free
/// function trusts its caller.
///
/// # Example
/// ```rust
/// use pipecalc_core::correlations::interpolate;
///
/// let temps = [20.0, 100.0, 200.0];
/// let stress = [117.0, 117.0, 108.0];
/// assert_eq!(interpolate(&temps, &stress, 150.0), 112.5);
/// assert_eq!(interpolate(&temps, &stress, -40.0), 117.0);
/// assert_eq!(interpolate(&temps, &stress, 500.0), 108.0);
/// ```
pub fn interpolate(breakpoints: &[f64], values: &[f64], target: f64) -> f64 {
    let last = breakpoints.len() - 1;
    if target <= breakpoints[0] {
        return values[0];
    }
    if target >= breakpoints[last] {
        return values[last];
    }

    // First breakpoint strictly greater than target; target sits in [i-1, i)
    let upper = breakpoints.partition_point(|&b| b <= target);
    let (t0, t1) = (breakpoints[upper - 1], breakpoints[upper]);
    let (v0, v1) = (values[upper - 1], values[upper]);
    let ratio = (target - t0) / (t1 - t0);
    v0 + ratio * (v1 - v0)
}

/// Breakpoint/value table with checked ordering.
///
/// Used for allowable stress by temperature, but nothing here is specific
/// to stress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationTable {
    breakpoints: Vec<f64>,
    values: Vec<f64>,
}

impl CorrelationTable {
    /// Build a table, rejecting empty, mismatched or non-ascending data.
    pub fn new(breakpoints: Vec<f64>, values: Vec<f64>) -> CalcResult<Self> {
        if breakpoints.is_empty() {
            return Err(CalcError::internal("correlation table is empty"));
        }
        if breakpoints.len() != values.len() {
            return Err(CalcError::internal(format!(
                "correlation table has {} breakpoints but {} values",
                breakpoints.len(),
                values.len()
            )));
        }
        if breakpoints.windows(2).any(|w| w[1] <= w[0]) {
            return Err(CalcError::internal(
                "correlation table breakpoints must be strictly ascending",
            ));
        }
        Ok(Self { breakpoints, values })
    }

    /// Interpolated value at `target`, clamped to the table ends.
    pub fn lookup(&self, target: f64) -> f64 {
        interpolate(&self.breakpoints, &self.values, target)
    }
}
