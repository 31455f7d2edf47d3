pub mod cost;
pub mod energy;
pub mod rate;

use serde::{Deserialize, Serialize};

/// Dimensioned `f64`: `ENERGY` is the kilowatt-hour exponent, `COST` is the pence exponent.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    PartialEq,
    PartialOrd,
    Serialize,
    derive_more::Add,
    derive_more::AddAssign,
    derive_more::From,
    derive_more::FromStr,
    derive_more::Sub,
    derive_more::Sum,
)]
pub struct Quantity<const ENERGY: isize, const COST: isize>(pub f64);

impl<const ENERGY: isize, const COST: isize> Quantity<ENERGY, COST> {
    pub const ZERO: Self = Self(0.0);

    /// Round half away from zero to the given number of decimal places.
    #[must_use]
    pub fn round_to(self, decimals: i32) -> Self {
        let scale = 10_f64.powi(decimals);
        // Adding zero turns a negative zero into a positive one.
        Self((self.0 * scale).round() / scale + 0.0)
    }
}
