use std::sync::mpsc::TryRecvError;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use log::warn;
use ratatui::{prelude::*, widgets::*};

use crate::config::SourceConfig;
use crate::error::{AppError, Result};
use crate::fetch::{spawn_catalog_fetch, AssetListing};
use crate::ui::TerminalGuard;

/// Result of the catalog load. Fetch failures are absorbed here: the
/// listings come back empty and `error` carries the user-facing message, so
/// downstream screens render an empty state instead of propagating the
/// failure.
pub struct CatalogOutcome {
    pub listings: Vec<AssetListing>,
    pub error: Option<String>,
}

/// Show a loading screen while the catalog request is in flight.
pub fn run_catalog_loader(source: &SourceConfig) -> Result<CatalogOutcome> {
    let rx = spawn_catalog_fetch(&source.provider);
    let mut guard = TerminalGuard::new()?;
    let mut ticks = 0usize;

    loop {
        match rx.try_recv() {
            Ok(Ok(listings)) => {
                guard.restore()?;
                return Ok(CatalogOutcome {
                    listings,
                    error: None,
                });
            }
            Ok(Err(err)) => {
                warn!("Catalog fetch failed for {}: {}", source.code, err);
                guard.restore()?;
                return Ok(CatalogOutcome {
                    listings: Vec::new(),
                    error: Some(format!("Could not load the asset catalog: {}", err)),
                });
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                warn!("Catalog fetch task for {} ended unexpectedly", source.code);
                guard.restore()?;
                return Ok(CatalogOutcome {
                    listings: Vec::new(),
                    error: Some("Catalog fetch ended unexpectedly".to_string()),
                });
            }
        }

        ticks += 1;
        let dots = ".".repeat(ticks % 4);
        guard.terminal_mut().draw(|f| {
            let size = f.size();
            let message = Paragraph::new(format!("Loading catalog from {}{}", source.name, dots))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title(source.code.as_str()));
            f.render_widget(message, size);
        })?;

        if event::poll(Duration::from_millis(150))? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Esc => {
                        guard.restore()?;
                        return Err(AppError::Cancelled);
                    }
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        guard.restore()?;
                        return Err(AppError::Cancelled);
                    }
                    _ => {}
                }
            }
        }
    }
}
