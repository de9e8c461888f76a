use crate::error::Result;

pub mod catalog;
pub mod history;
pub mod names;

pub use catalog::{spawn_catalog_fetch, AssetListing, CatalogReceiver};
pub use history::{spawn_history_fetch, HistoryReceiver, PricePoint, PriceSeries};

pub type FetchResult<T> = Result<T>;

/// Timeout applied to every provider request.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
