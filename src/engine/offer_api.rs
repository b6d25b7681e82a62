use super::Engine;

use async_trait::async_trait;

use crate::{
    api::OfferAPI,
    entities::{OfferSet, SearchParams},
    error::Error,
};

#[async_trait]
impl OfferAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn search_offers(&self, params: SearchParams) -> Result<OfferSet, Error> {
        let offers = self.generator.generate(
            &params.origin,
            &params.destination,
            params.requested_classes(),
        );

        Ok(offers)
    }
}

#[test]
fn search_offers_honours_filter() {
    use crate::engine::OfferGenerator;
    use crate::entities::{Provider, VehicleClass};
    use tokio_test::block_on;

    let engine = Engine::with_generator(OfferGenerator::new(Some(1)).unwrap());
    let params = SearchParams::new(
        "10 Rue de Paris".into(),
        "Gare du Nord".into(),
        [VehicleClass::Comfort, VehicleClass::Premium],
    )
    .unwrap();

    let set = block_on(engine.search_offers(params)).unwrap();

    assert_eq!(set.count, Provider::ALL.len() * 2);
    assert!(set.is_sorted());
    assert!(set
        .offers
        .iter()
        .all(|o| matches!(o.vehicle_class, VehicleClass::Comfort | VehicleClass::Premium)));
}
