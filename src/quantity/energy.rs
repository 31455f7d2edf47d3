use std::{
    fmt::{Display, Formatter},
    ops::Mul,
};

use crate::quantity::{Quantity, cost::Pence, rate::PencePerKilowattHour};

pub type KilowattHours = Quantity<1, 0>;

impl KilowattHours {
    /// Round to the meter resolution of one watt-hour.
    #[must_use]
    pub fn round_to_watt_hours(self) -> Self {
        self.round_to(3)
    }
}

impl Display for KilowattHours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}kWh", self.round_to_watt_hours().0)
    }
}

impl Mul<PencePerKilowattHour> for KilowattHours {
    type Output = Pence;

    fn mul(self, rhs: PencePerKilowattHour) -> Self::Output {
        Pence::from(self.0 * rhs.0)
    }
}
