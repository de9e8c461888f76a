pub mod screens;
pub mod terminal;

pub use screens::{
    run_asset_picker, run_catalog_loader, run_chart_view, run_source_picker, AssetPickOutcome,
    CatalogOutcome, ChartOutcome,
};
pub use terminal::TerminalGuard;
