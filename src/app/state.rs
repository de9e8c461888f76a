use crate::config::SourceConfig;
use crate::fetch::AssetListing;
use crate::ui::CatalogOutcome;

/// Session data for one selected source. The catalog is fetched fresh every
/// time a source is entered and discarded when the session ends.
pub struct SourceState {
    config: SourceConfig,
    catalog: Vec<AssetListing>,
    catalog_error: Option<String>,
}

impl SourceState {
    pub fn new(config: SourceConfig, outcome: CatalogOutcome) -> Self {
        Self {
            config,
            catalog: outcome.listings,
            catalog_error: outcome.error,
        }
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    pub fn catalog(&self) -> &[AssetListing] {
        &self.catalog
    }

    pub fn catalog_error(&self) -> Option<&str> {
        self.catalog_error.as_deref()
    }
}
