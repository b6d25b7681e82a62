use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{Provider, VehicleClass};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    #[serde(rename = "EUR")]
    Eur,
}

/// One synthesized quote for a (provider, vehicle class) pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub provider: Provider,
    pub vehicle_class: VehicleClass,
    pub estimated_price: f64,
    pub currency: Currency,
    pub eta_driver_sec: u32,
    pub generated_at: DateTime<Utc>,
}

impl Offer {
    pub fn new(
        provider: Provider,
        vehicle_class: VehicleClass,
        estimated_price: f64,
        eta_driver_sec: u32,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            provider,
            vehicle_class,
            estimated_price,
            currency: Currency::Eur,
            eta_driver_sec,
            generated_at,
        }
    }
}

/// A batch of offers, cheapest first, as returned to clients.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferSet {
    pub offers: Vec<Offer>,
    pub count: usize,
    pub generated_at: DateTime<Utc>,
}

impl OfferSet {
    /// Sorts by (price, eta) and derives `count` from the sorted list.
    pub fn new(mut offers: Vec<Offer>, generated_at: DateTime<Utc>) -> Self {
        offers.sort_by(|a, b| {
            a.estimated_price
                .total_cmp(&b.estimated_price)
                .then(a.eta_driver_sec.cmp(&b.eta_driver_sec))
        });

        Self {
            count: offers.len(),
            offers,
            generated_at,
        }
    }

    pub fn is_sorted(&self) -> bool {
        self.offers.windows(2).all(|pair| {
            let (a, b) = (&pair[0], &pair[1]);
            a.estimated_price < b.estimated_price
                || (a.estimated_price == b.estimated_price && a.eta_driver_sec <= b.eta_driver_sec)
        })
    }
}

#[test]
fn offer_set_orders_by_price_then_eta() {
    let now = Utc::now();
    let offers = vec![
        Offer::new(Provider::Uber, VehicleClass::Van, 20.0, 300, now),
        Offer::new(Provider::Bolt, VehicleClass::Economy, 12.5, 600, now),
        Offer::new(Provider::Heetch, VehicleClass::Comfort, 12.5, 180, now),
        Offer::new(Provider::Freenow, VehicleClass::Premium, 31.2, 120, now),
    ];

    let set = OfferSet::new(offers, now);

    assert_eq!(set.count, 4);
    assert!(set.is_sorted());
    assert_eq!(set.offers[0].provider, Provider::Heetch);
    assert_eq!(set.offers[1].provider, Provider::Bolt);
    assert_eq!(set.offers[3].provider, Provider::Freenow);
}

#[test]
fn offer_set_serializes_with_camel_case_fields() {
    use chrono::TimeZone;

    let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let set = OfferSet::new(
        vec![Offer::new(Provider::Freenow, VehicleClass::Comfort, 14.37, 240, now)],
        now,
    );

    let value = serde_json::to_value(&set).unwrap();

    assert_eq!(value["count"], 1);
    assert_eq!(value["generatedAt"], "2024-05-01T12:00:00Z");

    let offer = &value["offers"][0];
    assert_eq!(offer["provider"], "freenow");
    assert_eq!(offer["vehicleClass"], "comfort");
    assert_eq!(offer["estimatedPrice"], 14.37);
    assert_eq!(offer["currency"], "EUR");
    assert_eq!(offer["etaDriverSec"], 240);
    assert_eq!(offer["generatedAt"], "2024-05-01T12:00:00Z");
}
