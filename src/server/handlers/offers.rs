use std::time::Duration;

use axum::extract::{Extension, Json, Query};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{Stream, StreamExt};
use serde::{Deserialize, Serialize};

use crate::api::DynAPI;
use crate::config::Config;
use crate::entities::{OfferSet, SearchParams};
use crate::error::{invalid_interval_error, missing_parameter_error, Error};
use crate::server::offer_ticks;

/// Query string of the GET endpoints. `vehicleClass` may repeat, so the raw
/// pairs are folded by hand instead of deserialized into a struct.
#[derive(Debug, Default)]
pub struct OfferQuery {
    origin: Option<String>,
    destination: Option<String>,
    vehicle_classes: Vec<String>,
    interval_sec: Option<String>,
}

impl OfferQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();

        for (key, value) in pairs {
            match key.as_str() {
                // legacy clients send `departure`
                "origin" | "departure" => query.origin = Some(value),
                "destination" => query.destination = Some(value),
                "vehicleClass" | "vehicle_class" => query.vehicle_classes.push(value),
                "interval_sec" | "intervalSec" => query.interval_sec = Some(value),
                _ => tracing::debug!("ignoring query parameter {}", key),
            }
        }

        query
    }

    pub fn search_params(&self) -> Result<SearchParams, Error> {
        let origin = self
            .origin
            .clone()
            .ok_or_else(|| missing_parameter_error("origin"))?;
        let destination = self
            .destination
            .clone()
            .ok_or_else(|| missing_parameter_error("destination"))?;

        SearchParams::with_class_tokens(
            origin,
            destination,
            self.vehicle_classes.iter().map(String::as_str),
        )
    }

    pub fn interval(&self, default: Duration) -> Result<Duration, Error> {
        match &self.interval_sec {
            None => Ok(default),
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
                _ => Err(invalid_interval_error(raw)),
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchBody {
    origin: String,
    destination: String,
    #[serde(default, alias = "vehicle_classes")]
    vehicle_classes: Option<Vec<String>>,
}

pub async fn search(
    Extension(api): Extension<DynAPI>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<OfferSet>, Error> {
    let params = OfferQuery::from_pairs(pairs).search_params()?;

    let offers = api.search_offers(params).await?;

    Ok(offers.into())
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Json(body): Json<SearchBody>,
) -> Result<Json<OfferSet>, Error> {
    let tokens = body.vehicle_classes.unwrap_or_default();
    let params = SearchParams::with_class_tokens(
        body.origin,
        body.destination,
        tokens.iter().map(String::as_str),
    )?;

    let offers = api.search_offers(params).await?;

    Ok(offers.into())
}

pub async fn stream(
    Extension(api): Extension<DynAPI>,
    Extension(config): Extension<Config>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Sse<impl Stream<Item = Result<Event, serde_json::Error>>>, Error> {
    let query = OfferQuery::from_pairs(pairs);
    let params = query.search_params()?;
    let period = query.interval(config.stream_interval)?;

    tracing::info!(
        origin = %params.origin,
        destination = %params.destination,
        period_sec = period.as_secs(),
        "opening offer stream"
    );

    let events = offer_ticks(api, params, period)
        .map(|offers| Event::default().event("offers").json_data(offers));

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

#[cfg(test)]
fn test_api() -> DynAPI {
    use crate::engine::{Engine, OfferGenerator};
    use std::sync::Arc;

    Arc::new(Engine::with_generator(OfferGenerator::new(None).unwrap()))
}

#[cfg(test)]
fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn search_with_repeated_class_filter() {
    use crate::entities::{Provider, VehicleClass};

    let query = pairs(&[
        ("origin", "10 Rue de Paris"),
        ("destination", "Gare du Nord"),
        ("vehicleClass", "van"),
        ("vehicleClass", "economy"),
    ]);

    let Json(set) = search(Extension(test_api()), Query(query)).await.unwrap();

    assert_eq!(set.count, Provider::ALL.len() * 2);
    assert!(set.is_sorted());
    assert!(set
        .offers
        .iter()
        .all(|o| matches!(o.vehicle_class, VehicleClass::Van | VehicleClass::Economy)));
}

#[tokio::test]
async fn search_accepts_legacy_departure_parameter() {
    let query = pairs(&[("departure", "Châtelet"), ("destination", "Orly")]);

    let Json(set) = search(Extension(test_api()), Query(query)).await.unwrap();

    assert_eq!(set.count, 16);
}

#[tokio::test]
async fn search_rejects_bad_input() {
    let missing = pairs(&[("origin", "Châtelet")]);
    let err = search(Extension(test_api()), Query(missing)).await.err().unwrap();
    assert_eq!(err.code, 102);

    let unknown = pairs(&[
        ("origin", "Châtelet"),
        ("destination", "Orly"),
        ("vehicleClass", "helicopter"),
    ]);
    let err = search(Extension(test_api()), Query(unknown)).await.err().unwrap();
    assert_eq!(err.code, 103);
}

#[tokio::test]
async fn create_reads_json_body() {
    use crate::entities::VehicleClass;

    let body: SearchBody = serde_json::from_value(serde_json::json!({
        "origin": "10 Rue de Paris",
        "destination": "Gare du Nord",
        "vehicleClasses": ["premium"],
    }))
    .unwrap();

    let Json(set) = create(Extension(test_api()), Json(body)).await.unwrap();

    assert_eq!(set.count, 4);
    assert!(set.offers.iter().all(|o| o.vehicle_class == VehicleClass::Premium));

    let body: SearchBody = serde_json::from_value(serde_json::json!({
        "origin": "10 Rue de Paris",
        "destination": "Gare du Nord",
        "vehicle_classes": ["comfort", "van"],
    }))
    .unwrap();

    let Json(set) = create(Extension(test_api()), Json(body)).await.unwrap();
    assert_eq!(set.count, 8);
}

#[tokio::test]
async fn create_without_classes_returns_full_market() {
    let body: SearchBody = serde_json::from_value(serde_json::json!({
        "origin": "A",
        "destination": "B",
    }))
    .unwrap();

    let Json(set) = create(Extension(test_api()), Json(body)).await.unwrap();
    assert_eq!(set.count, 16);
}

#[test]
fn interval_parsing() {
    let default = Duration::from_secs(15);

    let query = OfferQuery::from_pairs(pairs(&[("interval_sec", "3")]));
    assert_eq!(query.interval(default).unwrap(), Duration::from_secs(3));

    let query = OfferQuery::from_pairs(vec![]);
    assert_eq!(query.interval(default).unwrap(), default);

    for raw in ["0", "-2", "soon", "1.5"] {
        let query = OfferQuery::from_pairs(pairs(&[("interval_sec", raw)]));
        assert_eq!(query.interval(default).unwrap_err().code, 104);
    }
}

#[tokio::test]
async fn stream_rejects_invalid_interval() {
    let query = pairs(&[
        ("origin", "A"),
        ("destination", "B"),
        ("interval_sec", "0"),
    ]);

    let result = stream(
        Extension(test_api()),
        Extension(Config::default()),
        Query(query),
    )
    .await;

    assert_eq!(result.err().unwrap().code, 104);
}

#[tokio::test(start_paused = true)]
async fn stream_sends_named_offer_frames() {
    use axum::body::HttpBody;
    use axum::http::header::CONTENT_TYPE;
    use axum::response::IntoResponse;

    let query = pairs(&[
        ("origin", "10 Rue de Paris"),
        ("destination", "Gare du Nord"),
        ("interval_sec", "1"),
    ]);

    let sse = stream(
        Extension(test_api()),
        Extension(Config::default()),
        Query(query),
    )
    .await
    .ok()
    .unwrap();

    let response = sse.into_response();
    assert_eq!(response.headers()[CONTENT_TYPE], "text/event-stream");

    let mut body = response.into_body();
    let mut buffer = String::new();
    let mut payloads: Vec<String> = Vec::new();

    while payloads.len() < 3 {
        let chunk = body.data().await.unwrap().unwrap();
        buffer.push_str(std::str::from_utf8(&chunk).unwrap());

        while let Some(end) = buffer.find("\n\n") {
            let frame: String = buffer.drain(..end + 2).collect();

            // keep-alive comment
            if frame.starts_with(':') {
                continue;
            }

            let mut name = None;
            let mut data = None;
            for line in frame.lines() {
                if let Some(value) = line.strip_prefix("event:") {
                    name = Some(value.trim().to_string());
                } else if let Some(value) = line.strip_prefix("data:") {
                    data = Some(value.trim_start().to_string());
                }
            }

            assert_eq!(name.as_deref(), Some("offers"));
            payloads.push(data.unwrap());
        }
    }

    for payload in &payloads {
        let set: OfferSet = serde_json::from_str(payload).unwrap();
        assert_eq!(set.count, 16);
        assert_eq!(set.offers.len(), 16);
        assert!(set.is_sorted());
    }

    assert_ne!(payloads[0], payloads[1]);
    assert_ne!(payloads[1], payloads[2]);
    assert_ne!(payloads[0], payloads[2]);
}
