use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use ratatui::{prelude::*, widgets::*};

use crate::error::Result;
use crate::fetch::AssetListing;
use crate::ui::TerminalGuard;
use crate::utils::truncate_label;

pub enum AssetPickOutcome {
    Selected(AssetListing),
    Back,
    Quit,
}

/// Scrollable, type-to-filter picker over the fetched catalog. An empty
/// catalog renders the empty-state message (optionally with the fetch error)
/// instead of failing.
pub fn run_asset_picker(
    catalog: &[AssetListing],
    catalog_error: Option<&str>,
) -> Result<AssetPickOutcome> {
    let mut guard = TerminalGuard::new()?;
    let mut filter = String::new();
    let mut selected = 0usize;
    let mut offset = 0usize;

    loop {
        let matches = filtered_indices(catalog, &filter);
        if selected >= matches.len() {
            selected = matches.len().saturating_sub(1);
        }

        let mut visible_rows = 0usize;
        guard.terminal_mut().draw(|f| {
            let size = f.size();
            let area = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(3),
                    Constraint::Length(1),
                ])
                .split(size);

            let header = Paragraph::new(vec![
                Line::from(Span::styled(
                    "Select a cryptocurrency",
                    Style::default().fg(Color::Rgb(230, 121, 0)),
                )),
                Line::from(format!("Filter: {}", filter)),
            ]);
            f.render_widget(header, area[0]);

            visible_rows = area[1].height.saturating_sub(2) as usize;
            if visible_rows > 0 {
                if selected < offset {
                    offset = selected;
                } else if selected >= offset + visible_rows {
                    offset = selected + 1 - visible_rows;
                }
            }

            if catalog.is_empty() {
                let message = catalog_error.unwrap_or("No assets available from this source.");
                f.render_widget(
                    Paragraph::new(message)
                        .alignment(Alignment::Center)
                        .wrap(Wrap { trim: true })
                        .block(Block::default().borders(Borders::ALL).title("Assets")),
                    area[1],
                );
            } else {
                let label_width = area[1].width.saturating_sub(4) as usize;
                let items: Vec<ListItem> = matches
                    .iter()
                    .enumerate()
                    .skip(offset)
                    .take(visible_rows.max(1))
                    .map(|(row, &idx)| {
                        let label = truncate_label(&catalog[idx].label, label_width.max(8));
                        let mut item = ListItem::new(Line::from(label));
                        if row == selected {
                            item = item.style(Style::default().add_modifier(Modifier::REVERSED));
                        }
                        item
                    })
                    .collect();

                let list = List::new(items).block(Block::default().borders(Borders::ALL).title(
                    format!("Assets ({} of {})", matches.len(), catalog.len()),
                ));
                f.render_widget(list, area[1]);
            }

            let help = Paragraph::new("Type to filter • ↑/↓ move • Enter chart • Esc back • Ctrl+C quit")
                .style(Style::default().fg(Color::Gray));
            f.render_widget(help, area[2]);
        })?;

        if event::poll(Duration::from_millis(150))? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Up => {
                        selected = selected.saturating_sub(1);
                    }
                    KeyCode::Down => {
                        if !matches.is_empty() && selected + 1 < matches.len() {
                            selected += 1;
                        }
                    }
                    KeyCode::PageUp => {
                        selected = selected.saturating_sub(visible_rows.max(1));
                    }
                    KeyCode::PageDown => {
                        if !matches.is_empty() {
                            selected = (selected + visible_rows.max(1)).min(matches.len() - 1);
                        }
                    }
                    KeyCode::Backspace => {
                        filter.pop();
                        selected = 0;
                        offset = 0;
                    }
                    KeyCode::Enter => {
                        if let Some(&idx) = matches.get(selected) {
                            let choice = catalog[idx].clone();
                            guard.restore()?;
                            return Ok(AssetPickOutcome::Selected(choice));
                        }
                    }
                    KeyCode::Esc => {
                        guard.restore()?;
                        return Ok(AssetPickOutcome::Back);
                    }
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        guard.restore()?;
                        return Ok(AssetPickOutcome::Quit);
                    }
                    KeyCode::Char(ch) => {
                        filter.push(ch);
                        selected = 0;
                        offset = 0;
                    }
                    _ => {}
                }
            }
        }
    }
}

fn filtered_indices(catalog: &[AssetListing], filter: &str) -> Vec<usize> {
    if filter.is_empty() {
        return (0..catalog.len()).collect();
    }

    let needle = filter.to_lowercase();
    catalog
        .iter()
        .enumerate()
        .filter(|(_, listing)| {
            listing.label.to_lowercase().contains(&needle)
                || listing.key.to_lowercase().contains(&needle)
        })
        .map(|(idx, _)| idx)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(key: &str, label: &str) -> AssetListing {
        AssetListing {
            key: key.to_string(),
            label: label.to_string(),
        }
    }

    #[test]
    fn empty_filter_keeps_provider_order() {
        let catalog = vec![
            listing("BTCUSDT", "Bitcoin (BTCUSDT)"),
            listing("ETHUSDT", "Ethereum (ETHUSDT)"),
        ];
        assert_eq!(filtered_indices(&catalog, ""), vec![0, 1]);
    }

    #[test]
    fn filter_matches_label_and_key_case_insensitively() {
        let catalog = vec![
            listing("bitcoin", "Bitcoin (btc)"),
            listing("ethereum", "Ethereum (eth)"),
            listing("dogecoin", "Dogecoin (doge)"),
        ];
        assert_eq!(filtered_indices(&catalog, "ETHER"), vec![1]);
        assert_eq!(filtered_indices(&catalog, "coin"), vec![0, 2]);
    }
}
