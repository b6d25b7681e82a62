use super::Engine;

use async_trait::async_trait;

use crate::{api::ProviderAPI, entities::Provider, error::Error};

#[async_trait]
impl ProviderAPI for Engine {
    async fn list_providers(&self) -> Result<Vec<Provider>, Error> {
        Ok(self.generator.providers().to_vec())
    }
}

#[test]
fn lists_every_provider() {
    use crate::engine::OfferGenerator;
    use tokio_test::block_on;

    let engine = Engine::with_generator(OfferGenerator::new(None).unwrap());
    let providers = block_on(engine.list_providers()).unwrap();

    assert_eq!(providers, Provider::ALL.to_vec());
}
