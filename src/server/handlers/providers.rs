use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::DynAPI;
use crate::entities::Provider;
use crate::error::Error;

#[derive(Debug, Serialize, Deserialize)]
pub struct ProvidersResponse {
    pub providers: Vec<Provider>,
}

pub async fn list(Extension(api): Extension<DynAPI>) -> Result<Json<ProvidersResponse>, Error> {
    let providers = api.list_providers().await?;

    Ok(ProvidersResponse { providers }.into())
}

#[tokio::test]
async fn lists_provider_identifiers() {
    use std::sync::Arc;

    use crate::engine::{Engine, OfferGenerator};

    let api = Arc::new(Engine::with_generator(OfferGenerator::new(None).unwrap())) as DynAPI;

    let Json(response) = list(Extension(api)).await.unwrap();

    assert_eq!(
        serde_json::to_value(response).unwrap(),
        serde_json::json!({"providers": ["uber", "bolt", "freenow", "heetch"]})
    );
}
