use std::time::Duration;

use futures::stream::{self, Stream};
use tokio::time::{self, Interval, MissedTickBehavior};

use crate::api::DynAPI;
use crate::entities::{OfferSet, SearchParams};

/// Regenerates offers for `params` once per `period`, first frame immediately.
/// Never ends by itself; dropping the stream stops it.
pub fn offer_ticks(
    api: DynAPI,
    params: SearchParams,
    period: Duration,
) -> impl Stream<Item = OfferSet> + Send + 'static {
    let state: (DynAPI, SearchParams, Option<Interval>, u64) = (api, params, None, 0);

    stream::unfold(state, move |(api, params, interval, tick)| async move {
        let mut interval = interval.unwrap_or_else(|| {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });

        interval.tick().await;

        match api.search_offers(params.clone()).await {
            Ok(offers) => {
                tracing::debug!(tick, count = offers.count, "streaming offers");
                Some((offers, (api, params, Some(interval), tick + 1)))
            }
            Err(err) => {
                tracing::warn!("stopping offer stream: {}", err);
                None
            }
        }
    })
}

#[tokio::test(start_paused = true)]
async fn emits_one_valid_frame_per_tick() {
    use futures::StreamExt;
    use std::sync::Arc;
    use tokio::time::Instant;

    use crate::engine::{Engine, OfferGenerator};
    use crate::entities::{Provider, VehicleClass};

    let api = Arc::new(Engine::with_generator(OfferGenerator::new(None).unwrap())) as DynAPI;
    let params = SearchParams::new(
        "10 Rue de Paris".into(),
        "Gare du Nord".into(),
        [VehicleClass::Van],
    )
    .unwrap();

    let start = Instant::now();
    let mut ticks = Box::pin(offer_ticks(api, params, Duration::from_secs(1)));

    let mut frames = Vec::new();
    for _ in 0..3 {
        frames.push(ticks.next().await.unwrap());
        if frames.len() == 1 {
            assert!(start.elapsed() < Duration::from_secs(1));
        }
    }

    assert!(start.elapsed() >= Duration::from_secs(2));

    for frame in &frames {
        assert_eq!(frame.count, Provider::ALL.len());
        assert!(frame.is_sorted());
        assert!(frame.offers.iter().all(|o| o.vehicle_class == VehicleClass::Van));
    }

    assert_ne!(frames[0], frames[1]);
    assert_ne!(frames[1], frames[2]);
    assert_ne!(frames[0], frames[2]);
}
