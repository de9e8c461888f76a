use std::sync::mpsc::TryRecvError;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use log::warn;
use ratatui::{
    prelude::*,
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Line as CanvasLine},
        Block, Borders, Paragraph, Wrap,
    },
};

use crate::config::ProviderConfig;
use crate::error::Result;
use crate::fetch::{spawn_history_fetch, AssetListing, HistoryReceiver, PricePoint, PriceSeries};
use crate::ui::TerminalGuard;

const DATE_LABEL_FMT: &str = "%Y-%m-%d";
const DATE_LABEL_FMT_SHORT: &str = "%m-%d";

pub enum ChartOutcome {
    Back,
    Quit,
}

/// One fetch per view; selecting the same asset again starts a fresh
/// request. Nothing is cached across views.
enum FetchState {
    Pending(HistoryReceiver),
    Ready(PriceSeries),
    Failed(String),
}

impl FetchState {
    fn poll(&mut self, asset_key: &str) {
        let FetchState::Pending(rx) = self else {
            return;
        };

        match rx.try_recv() {
            Ok(Ok(series)) => *self = FetchState::Ready(series),
            Ok(Err(err)) => {
                warn!("History fetch failed for {}: {}", asset_key, err);
                *self = FetchState::Failed(err.to_string());
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                warn!("History fetch task for {} ended unexpectedly", asset_key);
                *self = FetchState::Failed("History fetch ended unexpectedly".to_string());
            }
        }
    }
}

/// Line chart of the 30-day price history plus the latest price. The fetch
/// runs on a background thread; the screen shows a loading state until it
/// resolves, an error state if it fails, and "No data available" for an
/// empty series.
pub fn run_chart_view(provider: &ProviderConfig, asset: &AssetListing) -> Result<ChartOutcome> {
    let mut state = FetchState::Pending(spawn_history_fetch(provider, &asset.key));
    let mut guard = TerminalGuard::new()?;

    loop {
        state.poll(&asset.key);

        guard.terminal_mut().draw(|f| render(f, asset, &state))?;

        if event::poll(Duration::from_millis(150))? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Esc | KeyCode::Char('b') => {
                        guard.restore()?;
                        return Ok(ChartOutcome::Back);
                    }
                    KeyCode::Char('q') => {
                        guard.restore()?;
                        return Ok(ChartOutcome::Quit);
                    }
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        guard.restore()?;
                        return Ok(ChartOutcome::Quit);
                    }
                    KeyCode::Char('r') => {
                        state = FetchState::Pending(spawn_history_fetch(provider, &asset.key));
                    }
                    _ => {}
                }
            }
        }
    }
}

fn render(f: &mut Frame<'_>, asset: &AssetListing, state: &FetchState) {
    let size = f.size();
    let area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(size);

    let current = match state {
        FetchState::Ready(series) => series
            .current_price()
            .map(format_price)
            .unwrap_or_else(|| "N/A".to_string()),
        _ => "N/A".to_string(),
    };
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            asset.label.clone(),
            Style::default().fg(Color::Rgb(230, 121, 0)),
        )),
        Line::from(format!("Current Price (USD): {}", current)),
    ]);
    f.render_widget(header, area[0]);

    match state {
        FetchState::Pending(_) => {
            f.render_widget(
                Paragraph::new("Loading historical prices…")
                    .alignment(Alignment::Center)
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .title(format!("{} — loading", asset.key)),
                    ),
                area[1],
            );
        }
        FetchState::Failed(message) => {
            f.render_widget(
                Paragraph::new(message.as_str())
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true })
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .title(format!("{} — error", asset.key)),
                    ),
                area[1],
            );
        }
        FetchState::Ready(series) if series.is_empty() => {
            f.render_widget(
                Paragraph::new("No data available.")
                    .alignment(Alignment::Center)
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .title(asset.key.as_str()),
                    ),
                area[1],
            );
        }
        FetchState::Ready(series) => {
            render_series(f, area[1], asset, series);
        }
    }

    let help = Paragraph::new("r refresh • Esc/b back • q quit")
        .style(Style::default().fg(Color::Gray));
    f.render_widget(help, area[2]);
}

fn render_series(f: &mut Frame<'_>, chart_area: Rect, asset: &AssetListing, series: &PriceSeries) {
    let draw_points = {
        let compressed = compress_to_width(series.points(), chart_area.width);
        if compressed.is_empty() {
            series.points().to_vec()
        } else {
            compressed
        }
    };

    let Some((y_min, y_max)) = series.price_bounds() else {
        return;
    };

    let series_len = draw_points.len().max(1);
    let width_px = chart_area.width.max(1) as f64;
    let height_px = chart_area.height.max(1) as f64;

    let left_margin = 10.0;
    let right_margin = 1.0;
    let top_margin = 1.0;
    let bottom_margin = 1.0;

    let axis_x = left_margin;
    let available_width = (width_px - left_margin - right_margin).max(1.0);
    let x_scale = if series_len > 1 {
        available_width / (series_len.saturating_sub(1) as f64)
    } else {
        0.0
    };
    let axis_x_end = axis_x + available_width;

    let axis_y = bottom_margin;
    let available_height = (height_px - bottom_margin - top_margin).max(1.0);
    let price_range = (y_max - y_min).max(f64::EPSILON);
    let price_scale = available_height / price_range;
    let axis_y_top = axis_y + available_height;

    let price_label_x = 0.2;
    let price_ticks = compute_price_ticks(y_min, y_max, 7)
        .into_iter()
        .filter(|value| value.is_finite())
        .map(|value| (value, format_price(value)))
        .collect::<Vec<_>>();

    let date_ticks = compute_date_ticks(&draw_points, 5)
        .into_iter()
        .map(|(idx, label)| (axis_x + idx as f64 * x_scale, label))
        .collect::<Vec<_>>();

    let points = draw_points;
    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title(format!(
            "{} — last 30 days",
            asset.key
        )))
        .marker(Marker::Braille)
        .x_bounds([0.0, width_px])
        .y_bounds([-1.0, height_px])
        .paint(move |ctx| {
            let axis_color = Color::DarkGray;

            ctx.draw(&CanvasLine {
                x1: axis_x,
                y1: axis_y,
                x2: axis_x_end,
                y2: axis_y,
                color: axis_color,
            });
            ctx.draw(&CanvasLine {
                x1: axis_x,
                y1: axis_y,
                x2: axis_x,
                y2: axis_y_top,
                color: axis_color,
            });

            for pair in points.windows(2).enumerate() {
                let (idx, window) = pair;
                let x1 = axis_x + idx as f64 * x_scale;
                let x2 = axis_x + (idx + 1) as f64 * x_scale;
                let y1 = axis_y + (window[0].price - y_min) * price_scale;
                let y2 = axis_y + (window[1].price - y_min) * price_scale;
                ctx.draw(&CanvasLine {
                    x1,
                    y1,
                    x2,
                    y2,
                    color: Color::Cyan,
                });
            }

            if points.len() == 1 {
                let y = axis_y + (points[0].price - y_min) * price_scale;
                ctx.draw(&CanvasLine {
                    x1: axis_x,
                    y1: y,
                    x2: axis_x_end,
                    y2: y,
                    color: Color::Cyan,
                });
            }

            ctx.layer();

            for (value, label) in price_ticks.iter() {
                let coord = axis_y + (value - y_min) * price_scale;
                if coord < axis_y - 0.001 || coord > axis_y_top + 0.001 {
                    continue;
                }
                ctx.print(price_label_x, coord, label.clone());
            }

            for (x_pos, label) in date_ticks.iter() {
                ctx.print(*x_pos, -1.0, label.clone());
            }
        });

    f.render_widget(canvas, chart_area);
}

/// Keep at most two samples per terminal column so wide intraday series
/// stay drawable; each kept sample is the last of its chunk.
fn compress_to_width(points: &[PricePoint], width: u16) -> Vec<PricePoint> {
    let max_points = usize::from(width.max(1)) * 2;
    if points.len() <= max_points || max_points == 0 {
        return points.to_vec();
    }

    let stride = (points.len() + max_points - 1) / max_points;
    let mut reduced = Vec::with_capacity(max_points);

    for chunk in points.chunks(stride) {
        if let Some(last) = chunk.last() {
            reduced.push(last.clone());
        }
    }

    if reduced.len() > max_points {
        reduced.truncate(max_points);
    }

    reduced
}

fn compute_price_ticks(min: f64, max: f64, desired: usize) -> Vec<f64> {
    let desired = desired.max(2);
    if !min.is_finite() || !max.is_finite() {
        return vec![0.0, 1.0];
    }

    let mut effective_min = min;
    let mut effective_max = max.max(effective_min + f64::EPSILON);

    if (effective_max - effective_min).abs() < 1e-12 {
        let span = if effective_min.abs() < 1.0 {
            1.0
        } else {
            effective_min.abs() * 0.05
        };
        effective_min -= span / 2.0;
        effective_max += span / 2.0;
    }

    let step = (effective_max - effective_min) / (desired as f64 - 1.0);
    (0..desired)
        .map(|i| effective_min + step * i as f64)
        .collect()
}

fn compute_date_ticks(points: &[PricePoint], desired: usize) -> Vec<(usize, String)> {
    if points.is_empty() {
        return Vec::new();
    }

    let last_index = points.len() - 1;
    if last_index == 0 {
        return vec![(0, points[0].timestamp.format(DATE_LABEL_FMT).to_string())];
    }

    let desired = desired.max(2).min(points.len());
    let step = (last_index as f64) / (desired.saturating_sub(1) as f64);
    let mut indices: Vec<usize> = (0..desired)
        .map(|i| ((i as f64 * step).round() as usize).min(last_index))
        .collect();
    indices.push(0);
    indices.push(last_index);
    indices.sort_unstable();
    indices.dedup();

    indices
        .into_iter()
        .map(|idx| {
            let ts = points[idx].timestamp;
            let label = if idx == 0 || idx == last_index {
                ts.format(DATE_LABEL_FMT).to_string()
            } else {
                ts.format(DATE_LABEL_FMT_SHORT).to_string()
            };
            (idx, label)
        })
        .collect()
}

fn format_price(value: f64) -> String {
    if value >= 1000.0 {
        format!("{:.0}", value)
    } else if value >= 1.0 {
        format!("{:.2}", value)
    } else {
        format!("{:.6}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn point(ts_ms: i64, price: f64) -> PricePoint {
        PricePoint {
            timestamp: Utc.timestamp_millis_opt(ts_ms).single().unwrap(),
            price,
        }
    }

    #[test]
    fn compress_preserves_short_series() {
        let points = vec![point(0, 1.0), point(1000, 2.0)];
        let reduced = compress_to_width(&points, 80);
        assert_eq!(reduced.len(), 2);
    }

    #[test]
    fn compress_bounds_long_series() {
        let points: Vec<PricePoint> = (0..1000)
            .map(|i| point(i as i64 * 1000, i as f64))
            .collect();
        let reduced = compress_to_width(&points, 100);
        assert!(reduced.len() <= 200);
        // The final sample survives compression.
        assert_eq!(reduced.last().unwrap().price, points.last().unwrap().price);
    }

    #[test]
    fn price_ticks_span_the_range() {
        let ticks = compute_price_ticks(10.0, 30.0, 5);
        assert_eq!(ticks.len(), 5);
        assert!((ticks[0] - 10.0).abs() < 1e-9);
        assert!((ticks[4] - 30.0).abs() < 1e-9);
        assert!(ticks.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn date_ticks_include_both_endpoints() {
        let points: Vec<PricePoint> = (0..30)
            .map(|i| point(1_700_000_000_000 + i * 86_400_000, 1.0))
            .collect();
        let ticks = compute_date_ticks(&points, 5);
        assert_eq!(ticks.first().unwrap().0, 0);
        assert_eq!(ticks.last().unwrap().0, 29);
    }

    #[test]
    fn price_formatting_tracks_magnitude() {
        assert_eq!(format_price(64123.4), "64123");
        assert_eq!(format_price(42.5), "42.50");
        assert_eq!(format_price(0.00012345), "0.000123");
    }
}
