use std::fmt::{Display, Formatter};

use crate::quantity::Quantity;

pub type Pence = Quantity<0, 1>;

impl Pence {
    /// Round half-up to whole pence.
    #[must_use]
    pub fn round_to_pennies(self) -> Self {
        self.round_to(0)
    }

    pub fn in_pounds(self) -> f64 {
        self.0 / 100.0
    }
}

impl Display for Pence {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "£{:.2}", self.round_to_pennies().in_pounds())
    }
}
