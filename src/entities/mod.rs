mod offer;
mod provider;
mod search;
mod vehicle_class;

pub use offer::{Currency, Offer, OfferSet};
pub use provider::Provider;
pub use search::SearchParams;
pub use vehicle_class::VehicleClass;
