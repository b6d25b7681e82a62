//! Offer synthesis: a fake distance, one seeded stream per (provider, class)
//! pair, and a price/ETA sample drawn from fixed bands.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};

use crate::entities::{Offer, OfferSet, Provider, VehicleClass};
use crate::error::{configuration_error, Error};

/// Closed interval used for every randomized or clamped quantity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Band {
    pub low: f64,
    pub high: f64,
}

impl Band {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    fn validate(&self, name: &str) -> Result<(), Error> {
        if !self.low.is_finite() || !self.high.is_finite() {
            return Err(configuration_error(&format!("{} band is not finite", name)));
        }

        if self.low < 0.0 || self.low >= self.high {
            return Err(configuration_error(&format!(
                "{} band [{}, {}] must satisfy 0 <= low < high",
                name, self.low, self.high
            )));
        }

        Ok(())
    }

    fn uniform(&self) -> Uniform<f64> {
        Uniform::new_inclusive(self.low, self.high)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PricingBands {
    /// Demand multiplier applied to the whole fare.
    pub surge: Band,
    /// EUR per distance unit.
    pub rate: Band,
    /// Driver ETA in minutes.
    pub eta_minutes: Band,
    /// Clamp for the synthetic distance.
    pub distance: Band,
}

impl Default for PricingBands {
    fn default() -> Self {
        Self {
            surge: Band::new(0.9, 1.6),
            rate: Band::new(0.8, 1.4),
            eta_minutes: Band::new(2.0, 12.0),
            distance: Band::new(1.0, 30.0),
        }
    }
}

impl PricingBands {
    pub fn validate(&self) -> Result<(), Error> {
        self.surge.validate("surge")?;
        self.rate.validate("rate")?;
        self.eta_minutes.validate("eta")?;
        self.distance.validate("distance")
    }

    /// Fake routing distance: combined character count over five, clamped.
    /// Depends on the two strings only.
    pub fn synthetic_distance(&self, origin: &str, destination: &str) -> f64 {
        let chars = origin.chars().count() + destination.chars().count();

        (chars as f64 / 5.0).clamp(self.distance.low, self.distance.high)
    }

    /// Cheapest and dearest price a class can be quoted at for `distance`.
    pub fn price_range(&self, class: VehicleClass, distance: f64) -> Band {
        let fare = |rate: f64, surge: f64| round_cents((class.base_fare() + distance * rate) * surge);

        Band::new(
            fare(self.rate.low, self.surge.low),
            fare(self.rate.high, self.surge.high),
        )
    }

    pub fn eta_range_sec(&self) -> (u32, u32) {
        (
            minutes_to_sec(self.eta_minutes.low),
            minutes_to_sec(self.eta_minutes.high),
        )
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn minutes_to_sec(minutes: f64) -> u32 {
    (minutes * 60.0) as u32
}

/// Process-level source of the per-call draw.
enum BaseEntropy {
    Thread,
    Seeded(Mutex<StdRng>),
}

impl BaseEntropy {
    fn draw(&self) -> u64 {
        match self {
            Self::Thread => rand::thread_rng().gen(),
            Self::Seeded(rng) => rng.lock().unwrap_or_else(PoisonError::into_inner).gen(),
        }
    }
}

/// Stable salt for one (origin, destination, provider, class) combination.
fn pair_salt(origin: &str, destination: &str, provider: Provider, class: VehicleClass) -> u64 {
    let mut hasher = DefaultHasher::new();
    (origin, destination, provider, class).hash(&mut hasher);
    hasher.finish()
}

pub struct OfferGenerator {
    providers: Vec<Provider>,
    bands: PricingBands,
    surge: Uniform<f64>,
    rate: Uniform<f64>,
    eta_minutes: Uniform<f64>,
    entropy: BaseEntropy,
}

impl OfferGenerator {
    /// Every known provider with the default bands.
    pub fn new(seed: Option<u64>) -> Result<Self, Error> {
        Self::with_config(Provider::ALL.to_vec(), PricingBands::default(), seed)
    }

    #[tracing::instrument(name = "OfferGenerator::with_config", skip(bands))]
    pub fn with_config(
        providers: Vec<Provider>,
        bands: PricingBands,
        seed: Option<u64>,
    ) -> Result<Self, Error> {
        if providers.is_empty() {
            return Err(configuration_error("provider list is empty"));
        }

        bands.validate()?;

        let entropy = match seed {
            Some(seed) => BaseEntropy::Seeded(Mutex::new(StdRng::seed_from_u64(seed))),
            None => BaseEntropy::Thread,
        };

        Ok(Self {
            providers,
            bands,
            surge: bands.surge.uniform(),
            rate: bands.rate.uniform(),
            eta_minutes: bands.eta_minutes.uniform(),
            entropy,
        })
    }

    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    pub fn bands(&self) -> &PricingBands {
        &self.bands
    }

    /// Quotes every provider for every effective class. `requested` is read as
    /// a set; an empty slice means all classes. Identical inputs keep the same
    /// shape across calls but not the same prices.
    #[tracing::instrument(skip(self))]
    pub fn generate(&self, origin: &str, destination: &str, requested: &[VehicleClass]) -> OfferSet {
        let classes: Vec<VehicleClass> = VehicleClass::ALL
            .into_iter()
            .filter(|class| requested.is_empty() || requested.contains(class))
            .collect();

        let distance = self.bands.synthetic_distance(origin, destination);
        let draw = self.entropy.draw();
        let generated_at = Utc::now();

        let mut offers = Vec::with_capacity(self.providers.len() * classes.len());

        for &provider in &self.providers {
            for &class in &classes {
                let seed = draw ^ pair_salt(origin, destination, provider, class);
                let mut rng = StdRng::seed_from_u64(seed);

                let surge = self.surge.sample(&mut rng);
                let rate = self.rate.sample(&mut rng);
                let price = round_cents((class.base_fare() + distance * rate) * surge);
                let eta = minutes_to_sec(self.eta_minutes.sample(&mut rng));

                offers.push(Offer::new(provider, class, price, eta, generated_at));
            }
        }

        let set = OfferSet::new(offers, generated_at);

        tracing::debug!(distance, count = set.count, "generated offers");

        set
    }
}

#[cfg(test)]
fn assert_offer_set_valid(generator: &OfferGenerator, set: &OfferSet, origin: &str, destination: &str) {
    let bands = generator.bands();
    let distance = bands.synthetic_distance(origin, destination);
    let (eta_min, eta_max) = bands.eta_range_sec();

    assert_eq!(set.count, set.offers.len());
    assert!(set.is_sorted());

    for offer in &set.offers {
        let range = bands.price_range(offer.vehicle_class, distance);
        assert!(offer.estimated_price >= 0.0);
        assert!(
            offer.estimated_price >= range.low - 0.01 && offer.estimated_price <= range.high + 0.01,
            "{:?} outside {:?}",
            offer,
            range
        );
        assert!(offer.eta_driver_sec >= eta_min && offer.eta_driver_sec <= eta_max);
        assert_eq!(offer.generated_at, set.generated_at);
    }
}

#[test]
fn full_market_for_paris_trip() {
    let generator = OfferGenerator::new(None).unwrap();
    let set = generator.generate("10 Rue de Paris", "Gare du Nord", &[]);

    assert_eq!(set.count, 16);
    assert_offer_set_valid(&generator, &set, "10 Rue de Paris", "Gare du Nord");

    for offer in &set.offers {
        assert!(offer.estimated_price > 5.0 && offer.estimated_price < 50.0);
    }

    for provider in Provider::ALL {
        for class in VehicleClass::ALL {
            assert!(set
                .offers
                .iter()
                .any(|o| o.provider == provider && o.vehicle_class == class));
        }
    }
}

#[test]
fn filter_to_a_single_class() {
    let generator = OfferGenerator::new(None).unwrap();

    let set = generator.generate("10 Rue de Paris", "Gare du Nord", &[VehicleClass::Van]);
    assert_eq!(set.count, Provider::ALL.len());
    assert!(set.offers.iter().all(|o| o.vehicle_class == VehicleClass::Van));

    let set = generator.generate("10 Rue de Paris", "Gare du Nord", &[VehicleClass::Economy]);
    assert_eq!(set.count, Provider::ALL.len());
    assert!(set.offers.iter().all(|o| o.vehicle_class == VehicleClass::Economy));
}

#[test]
fn duplicate_requested_classes_count_once() {
    let generator = OfferGenerator::new(None).unwrap();

    let set = generator.generate("a", "b", &[VehicleClass::Van, VehicleClass::Van]);
    assert_eq!(set.count, Provider::ALL.len());

    let set = generator.generate(
        "a",
        "b",
        &[VehicleClass::Premium, VehicleClass::Economy, VehicleClass::Premium],
    );
    assert_eq!(set.count, Provider::ALL.len() * 2);

    let mut pairs: Vec<_> = set
        .offers
        .iter()
        .map(|o| (o.provider, o.vehicle_class))
        .collect();
    pairs.sort();
    pairs.dedup();
    assert_eq!(pairs.len(), set.count);
}

#[test]
fn synthetic_distance_is_deterministic_and_clamped() {
    let bands = PricingBands::default();

    let a = bands.synthetic_distance("10 Rue de Paris", "Gare du Nord");
    let b = bands.synthetic_distance("10 Rue de Paris", "Gare du Nord");
    assert_eq!(a, b);
    assert!((a - 27.0 / 5.0).abs() < f64::EPSILON);

    assert_eq!(bands.synthetic_distance("", ""), 1.0);
    assert_eq!(bands.synthetic_distance(&"x".repeat(500), "y"), 30.0);
}

#[test]
fn repeated_calls_keep_shape_but_vary_prices() {
    let generator = OfferGenerator::new(Some(7)).unwrap();

    let pairs = |set: &OfferSet| {
        let mut pairs: Vec<_> = set
            .offers
            .iter()
            .map(|o| (o.provider, o.vehicle_class))
            .collect();
        pairs.sort();
        pairs
    };

    let first = generator.generate("Opéra", "Montmartre", &[]);
    let second = generator.generate("Opéra", "Montmartre", &[]);

    assert_eq!(first.count, second.count);
    assert_eq!(pairs(&first), pairs(&second));

    let prices = |set: &OfferSet| set.offers.iter().map(|o| o.estimated_price).collect::<Vec<_>>();
    assert_ne!(prices(&first), prices(&second));
}

#[test]
fn same_base_seed_reproduces_a_run() {
    let a = OfferGenerator::new(Some(42)).unwrap();
    let b = OfferGenerator::new(Some(42)).unwrap();

    for _ in 0..3 {
        let left = a.generate("Bastille", "La Défense", &[]);
        let right = b.generate("Bastille", "La Défense", &[]);
        assert_eq!(left.offers.len(), right.offers.len());

        for (l, r) in left.offers.iter().zip(right.offers.iter()) {
            assert_eq!(
                (l.provider, l.vehicle_class, l.estimated_price, l.eta_driver_sec),
                (r.provider, r.vehicle_class, r.estimated_price, r.eta_driver_sec)
            );
        }
    }
}

#[test]
fn offers_stay_in_bands_over_many_draws() {
    let generator = OfferGenerator::new(None).unwrap();
    let inputs = [("", ""), ("a", "b"), ("10 Rue de Paris", "Gare du Nord")];

    for (origin, destination) in inputs {
        for _ in 0..50 {
            let set = generator.generate(origin, destination, &[]);
            assert_offer_set_valid(&generator, &set, origin, destination);
        }
    }
}

#[test]
fn restricted_provider_list_limits_output() {
    let generator =
        OfferGenerator::with_config(vec![Provider::Bolt], PricingBands::default(), None).unwrap();
    let set = generator.generate("a", "b", &[]);

    assert_eq!(set.count, VehicleClass::ALL.len());
    assert!(set.offers.iter().all(|o| o.provider == Provider::Bolt));
}

#[test]
fn configuration_faults_fail_fast() {
    let err = OfferGenerator::with_config(vec![], PricingBands::default(), None).err().unwrap();
    assert_eq!(err.code, 2);

    let bands = PricingBands {
        surge: Band::new(1.6, 0.9),
        ..PricingBands::default()
    };
    let err = OfferGenerator::with_config(Provider::ALL.to_vec(), bands, None).err().unwrap();
    assert_eq!(err.code, 2);

    let bands = PricingBands {
        rate: Band::new(-1.0, 1.0),
        ..PricingBands::default()
    };
    assert!(OfferGenerator::with_config(Provider::ALL.to_vec(), bands, None).is_err());

    let bands = PricingBands {
        eta_minutes: Band::new(2.0, f64::INFINITY),
        ..PricingBands::default()
    };
    assert!(OfferGenerator::with_config(Provider::ALL.to_vec(), bands, None).is_err());
}
