use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{unknown_vehicle_class_error, Error};

/// Service tier. Every tier carries its own base fare.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleClass {
    Economy,
    Comfort,
    Premium,
    Van,
}

impl VehicleClass {
    pub const ALL: [VehicleClass; 4] = [
        VehicleClass::Economy,
        VehicleClass::Comfort,
        VehicleClass::Premium,
        VehicleClass::Van,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Economy => "economy",
            Self::Comfort => "comfort",
            Self::Premium => "premium",
            Self::Van => "van",
        }
    }

    /// Base fare in EUR, before distance and surge are applied.
    pub fn base_fare(&self) -> f64 {
        match self {
            Self::Economy => 8.0,
            Self::Comfort => 11.0,
            Self::Premium => 17.0,
            Self::Van => 14.0,
        }
    }
}

impl FromStr for VehicleClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();

        Self::ALL
            .into_iter()
            .find(|class| class.name().eq_ignore_ascii_case(token))
            .ok_or_else(|| unknown_vehicle_class_error(token))
    }
}

#[test]
fn parse_known_classes() {
    assert_eq!("economy".parse::<VehicleClass>().unwrap(), VehicleClass::Economy);
    assert_eq!(" Van ".parse::<VehicleClass>().unwrap(), VehicleClass::Van);
    assert_eq!("PREMIUM".parse::<VehicleClass>().unwrap(), VehicleClass::Premium);
}

#[test]
fn parse_unknown_class_is_rejected() {
    let err = "limousine".parse::<VehicleClass>().unwrap_err();
    assert_eq!(err.code, 103);
}

#[test]
fn every_class_has_a_positive_base_fare() {
    for class in VehicleClass::ALL {
        assert!(class.base_fare() > 0.0, "{:?}", class);
    }
}
