//! Equity estimation.
//!
//! ## Modules
//!
//! - `calculator`: Exact enumeration and parallel Monte Carlo sampling
//! - `result`: Equity results, method selection and outcome tallies

pub mod calculator;
pub mod result;

pub use calculator::{implied_pot_odds, pot_odds, EquityCalculator, EquityQuery, EquitySource};
pub use result::{EquityMethod, EquityResult, MethodPreference};
