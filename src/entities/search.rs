use serde::Serialize;

use crate::entities::VehicleClass;
use crate::error::{missing_parameter_error, Error};

/// A validated offer search. Built at the HTTP boundary; the engine trusts it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchParams {
    pub origin: String,
    pub destination: String,
    vehicle_classes: Vec<VehicleClass>,
}

impl SearchParams {
    pub fn new<I>(origin: String, destination: String, vehicle_classes: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = VehicleClass>,
    {
        if origin.trim().is_empty() {
            return Err(missing_parameter_error("origin"));
        }

        if destination.trim().is_empty() {
            return Err(missing_parameter_error("destination"));
        }

        let mut vehicle_classes: Vec<VehicleClass> = vehicle_classes.into_iter().collect();
        vehicle_classes.sort();
        vehicle_classes.dedup();

        Ok(Self {
            origin,
            destination,
            vehicle_classes,
        })
    }

    /// Parses raw class tokens, failing on the first unknown one.
    pub fn with_class_tokens<'a, I>(
        origin: String,
        destination: String,
        tokens: I,
    ) -> Result<Self, Error>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let classes = tokens
            .into_iter()
            .map(str::parse)
            .collect::<Result<Vec<VehicleClass>, Error>>()?;

        Self::new(origin, destination, classes)
    }

    pub fn requested_classes(&self) -> &[VehicleClass] {
        &self.vehicle_classes
    }
}

#[test]
fn empty_filter_requests_nothing_specific() {
    let params = SearchParams::new("a".into(), "b".into(), []).unwrap();
    assert!(params.requested_classes().is_empty());
}

#[test]
fn duplicate_classes_are_collapsed() {
    let params = SearchParams::with_class_tokens(
        "a".into(),
        "b".into(),
        ["van", "economy", "van"],
    )
    .unwrap();

    assert_eq!(
        params.requested_classes(),
        &[VehicleClass::Economy, VehicleClass::Van]
    );
}

#[test]
fn blank_origin_or_destination_is_rejected() {
    let err = SearchParams::new("  ".into(), "Gare du Nord".into(), []).unwrap_err();
    assert_eq!(err.code, 102);

    let err = SearchParams::new("10 Rue de Paris".into(), "".into(), []).unwrap_err();
    assert_eq!(err.code, 102);
}

#[test]
fn unknown_class_token_is_rejected() {
    let err = SearchParams::with_class_tokens("a".into(), "b".into(), ["economy", "tuk-tuk"])
        .unwrap_err();
    assert_eq!(err.code, 103);
}
