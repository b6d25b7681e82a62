mod generator;
mod offer_api;
mod provider_api;

pub use generator::{Band, OfferGenerator, PricingBands};

use crate::{api::API, config::Config, error::Error};

pub struct Engine {
    generator: OfferGenerator,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub fn new(config: &Config) -> Result<Self, Error> {
        let generator = OfferGenerator::new(config.seed)?;

        tracing::info!(
            providers = generator.providers().len(),
            seeded = config.seed.is_some(),
            "offer generator ready"
        );

        Ok(Self::with_generator(generator))
    }

    pub fn with_generator(generator: OfferGenerator) -> Self {
        Self { generator }
    }
}

impl API for Engine {}
