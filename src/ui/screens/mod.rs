pub mod asset_picker;
pub mod chart;
pub mod loading;
pub mod source_picker;

pub use asset_picker::{run_asset_picker, AssetPickOutcome};
pub use chart::{run_chart_view, ChartOutcome};
pub use loading::{run_catalog_loader, CatalogOutcome};
pub use source_picker::run_source_picker;
