use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use ratatui::{prelude::*, widgets::*};

use crate::config::SourceConfig;
use crate::error::{AppError, Result};
use crate::ui::TerminalGuard;

/// Pick one of the configured market-data sources. Returns the source code,
/// or `AppError::Cancelled` when the user backs out.
pub fn run_source_picker(sources: &[&SourceConfig]) -> Result<String> {
    if sources.is_empty() {
        return Err(AppError::message("No market-data sources are configured"));
    }

    let mut guard = TerminalGuard::new()?;
    let mut selected = 0usize;

    loop {
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

            let title = Paragraph::new("Select a market-data source")
                .style(Style::default().fg(Color::Rgb(230, 121, 0)));
            f.render_widget(title, area[0]);

            let items: Vec<ListItem> = sources
                .iter()
                .enumerate()
                .map(|(idx, source)| {
                    let line = Line::from(vec![
                        Span::styled(
                            format!("{:<4}", source.code),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                        Span::raw("  "),
                        Span::raw(source.name.as_str()),
                    ]);
                    let mut item = ListItem::new(line);
                    if idx == selected {
                        item = item.style(Style::default().add_modifier(Modifier::REVERSED));
                    }
                    item
                })
                .collect();

            let list = List::new(items).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Sources (↑/↓ or j/k)"),
            );
            f.render_widget(list, area[1]);

            let help = Paragraph::new("Enter select • Esc cancel • Ctrl+C exit")
                .style(Style::default().fg(Color::Gray));
            f.render_widget(help, area[2]);
        })?;

        if event::poll(Duration::from_millis(150))? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Up | KeyCode::Char('k') => {
                        if selected == 0 {
                            selected = sources.len() - 1;
                        } else {
                            selected -= 1;
                        }
                    }
                    KeyCode::Down | KeyCode::Char('j') => {
                        selected = (selected + 1) % sources.len();
                    }
                    KeyCode::Enter => {
                        let choice = sources[selected].code.clone();
                        guard.restore()?;
                        return Ok(choice);
                    }
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
