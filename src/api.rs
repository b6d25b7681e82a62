use async_trait::async_trait;
use std::sync::Arc;

use crate::entities::{OfferSet, Provider, SearchParams};
use crate::error::Error;

#[async_trait]
pub trait ProviderAPI {
    async fn list_providers(&self) -> Result<Vec<Provider>, Error>;
}

#[async_trait]
pub trait OfferAPI {
    async fn search_offers(&self, params: SearchParams) -> Result<OfferSet, Error>;
}

pub trait API: ProviderAPI + OfferAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
