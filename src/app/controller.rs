use log::info;

use crate::app::state::SourceState;
use crate::config::{Config, SourceConfig};
use crate::error::{AppError, Result};
use crate::ui::{
    run_asset_picker, run_catalog_loader, run_chart_view, run_source_picker, AssetPickOutcome,
    ChartOutcome,
};

/// Coordinates the source picker, catalog load, asset picker and chart view.
pub struct AppController {
    config: Config,
}

enum ControllerOutcome {
    Exit,
    SwitchSource,
}

impl AppController {
    pub fn new(config: Config) -> Result<Self> {
        if config.sources.is_empty() {
            return Err(AppError::message(
                "No market-data sources configured in the application.",
            ));
        }
        Ok(Self { config })
    }

    pub fn run(self) -> Result<()> {
        loop {
            let sources = self.config.available_sources();
            let code = match run_source_picker(&sources) {
                Ok(code) => code,
                Err(AppError::Cancelled) => return Ok(()),
                Err(err) => return Err(err),
            };

            let source = self
                .config
                .get_source(&code)
                .ok_or_else(|| AppError::message(format!("Unknown source: {}", code)))?
                .clone();

            match self.drive_source(&source)? {
                ControllerOutcome::Exit => return Ok(()),
                ControllerOutcome::SwitchSource => continue,
            }
        }
    }

    fn drive_source(&self, source: &SourceConfig) -> Result<ControllerOutcome> {
        info!("Loading catalog for source {}", source.code);

        let outcome = match run_catalog_loader(source) {
            Ok(outcome) => outcome,
            Err(AppError::Cancelled) => return Ok(ControllerOutcome::SwitchSource),
            Err(err) => return Err(err),
        };
        let state = SourceState::new(source.clone(), outcome);

        loop {
            match run_asset_picker(state.catalog(), state.catalog_error())? {
                AssetPickOutcome::Selected(asset) => {
                    info!("Charting {} from {}", asset.key, state.config().code);
                    match run_chart_view(&state.config().provider, &asset)? {
                        ChartOutcome::Back => continue,
                        ChartOutcome::Quit => return Ok(ControllerOutcome::Exit),
                    }
                }
                AssetPickOutcome::Back => return Ok(ControllerOutcome::SwitchSource),
                AssetPickOutcome::Quit => return Ok(ControllerOutcome::Exit),
            }
        }
    }
}
