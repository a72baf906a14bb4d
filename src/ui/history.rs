use itertools::Itertools;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table},
    Frame,
};

use crate::record::SessionRecord;
use crate::ui::charting::{band_coords, compute_bounds, format_label, progress_points, AccuracyBand};
use crate::view::{summary_line, HistoryPanel};

/// Pure presenter for a single history row
pub fn present_row(record: &SessionRecord) -> Row<'static> {
    let accuracy_color = AccuracyBand::of(record.accuracy_percent).color();

    let mistakes_style = if record.mistakes == 0 {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    Row::new(vec![
        Cell::from(record.timestamp.format("%Y.%m.%d %H:%M").to_string()),
        Cell::from(record.difficulty_label.clone())
            .style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from(format!("{}%", record.accuracy_percent))
            .style(Style::default().fg(accuracy_color)),
        Cell::from(record.mistakes.to_string()).style(mistakes_style),
        Cell::from(record.total_words.to_string()),
    ])
}

/// Render the session history screen
pub fn draw_history(f: &mut Frame, panel: &HistoryPanel) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3),      // Title
            Constraint::Percentage(40), // Progress chart
            Constraint::Min(0),         // Table
            Constraint::Length(3),      // Totals and instructions
        ])
        .split(f.area());

    let title = Paragraph::new("Finished sessions (newest first)")
        .block(Block::default().borders(Borders::ALL).title("History"))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    draw_progress_chart(f, &panel.records, chunks[1]);

    if panel.records.is_empty() {
        let empty = Paragraph::new("No finished sessions yet")
            .style(Style::default().add_modifier(Modifier::DIM))
            .alignment(Alignment::Center);
        f.render_widget(empty, chunks[2]);
    } else {
        let header = Row::new(vec![
            Cell::from("Date"),
            Cell::from("Difficulty"),
            Cell::from("Success"),
            Cell::from("Mistakes"),
            Cell::from("Words"),
        ])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

        // Leave room for borders and the header row
        let visible = chunks[2].height.saturating_sub(3) as usize;
        let start = panel.scroll_offset.min(panel.records.len().saturating_sub(visible.max(1)));
        let rows: Vec<Row> = panel
            .records
            .iter()
            .skip(start)
            .take(visible)
            .map(present_row)
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(18),
                Constraint::Length(11),
                Constraint::Length(9),
                Constraint::Length(9),
                Constraint::Length(7),
            ],
        )
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{} sessions", panel.records.len())),
        );
        f.render_widget(table, chunks[2]);
    }

    let footer = Paragraph::new(vec![
        ratatui::text::Line::from(summary_line(&panel.summary)),
        ratatui::text::Line::from("↑/↓ scroll  (b)ack"),
    ])
    .style(Style::default().add_modifier(Modifier::DIM))
    .alignment(Alignment::Center);
    f.render_widget(footer, chunks[3]);
}

/// Difficulty per session over time, one colour per accuracy band.
fn draw_progress_chart(f: &mut Frame, records: &[SessionRecord], area: Rect) {
    let points = progress_points(records);
    if points.is_empty() {
        return;
    }

    let bands: Vec<(AccuracyBand, Vec<(f64, f64)>)> = AccuracyBand::ALL
        .iter()
        .map(|&band| (band, band_coords(&points, band)))
        .filter(|(_, coords)| !coords.is_empty())
        .collect();
    let datasets = bands
        .iter()
        .map(|(band, coords)| {
            Dataset::default()
                .name(band.to_string())
                .marker(Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(band.color()))
                .data(coords)
        })
        .collect();

    let ([x_min, x_max], [y_min, y_max]) = compute_bounds(&points);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let (first, last) = match records.iter().map(|r| r.timestamp).minmax().into_option() {
        Some((first, last)) => (
            first.format("%Y.%m.%d").to_string(),
            last.format("%Y.%m.%d").to_string(),
        ),
        None => (format_label(x_min), format_label(x_max)),
    };

    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title("Progress"))
        .x_axis(
            Axis::default()
                .title("date")
                .bounds([x_min, x_max])
                .labels(vec![Span::styled(first, bold), Span::styled(last, bold)]),
        )
        .y_axis(
            Axis::default()
                .title("difficulty")
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::styled(format_label(y_min), bold),
                    Span::styled(format_label(y_max), bold),
                ]),
        );
    f.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    #[test]
    fn test_present_row_builds() {
        let record = SessionRecord {
            timestamp: Local::now(),
            difficulty_label: "25".into(),
            accuracy_percent: 95,
            mistakes: 0,
            total_words: 25,
        };
        let _row = present_row(&record);
    }

    #[test]
    fn test_history_screen_draws_chart_and_table() {
        use ratatui::{backend::TestBackend, Terminal};

        let now = Local::now();
        let records: Vec<SessionRecord> = [(10, 95), (20, 72), (30, 40)]
            .iter()
            .enumerate()
            .map(|(i, &(difficulty, accuracy))| SessionRecord {
                timestamp: now - chrono::Duration::days(i as i64),
                difficulty_label: difficulty.to_string(),
                accuracy_percent: accuracy,
                mistakes: 1,
                total_words: difficulty,
            })
            .collect();
        let panel = HistoryPanel {
            records,
            summary: Default::default(),
            scroll_offset: 0,
        };

        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| draw_history(f, &panel)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Progress"));
        assert!(text.contains("difficulty"));
        assert!(text.contains("3 sessions"));
        assert!(text.contains(&now.format("%Y.%m.%d").to_string()));
    }
}
