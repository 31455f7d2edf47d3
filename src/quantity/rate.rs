use std::fmt::{Display, Formatter};

use crate::quantity::Quantity;

/// Pence per kilowatt-hour, the unit Octopus publishes its rates in.
pub type PencePerKilowattHour = Quantity<-1, 1>;

impl PencePerKilowattHour {
    pub fn in_pounds(self) -> f64 {
        self.round_to(0).0 / 100.0
    }
}

impl Display for PencePerKilowattHour {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "£{:.2}", self.in_pounds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(PencePerKilowattHour::from(20.0).to_string(), "£0.20");
        assert_eq!(PencePerKilowattHour::from(16.5375).to_string(), "£0.17");
        assert_eq!(PencePerKilowattHour::from(-2.1).to_string(), "£-0.02");
    }
}
