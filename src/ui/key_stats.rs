use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use typerank::analytics::{finger_analytics, key_analytics, FingerAnalytics, KeyAnalytics};
use typerank::report::key_label;

use crate::{ui::keyboard::finger_color, App};

fn delay_color(avg_delay_ms: u64) -> Color {
    match avg_delay_ms {
        0..=149 => Color::Green,
        150..=249 => Color::Yellow,
        _ => Color::Red,
    }
}

fn accuracy_color(accuracy: f64) -> Color {
    if accuracy >= 100.0 {
        Color::Green
    } else if accuracy >= 90.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// Pure presenter for one key row.
pub fn present_key_row(k: &KeyAnalytics) -> Row<'static> {
    Row::new(vec![
        Cell::from(key_label(k.key)).style(Style::default().fg(finger_color(k.finger))),
        Cell::from(k.count.to_string()),
        Cell::from(format!("{}%", k.accuracy))
            .style(Style::default().fg(accuracy_color(k.accuracy as f64))),
        Cell::from(k.avg_delay_ms.to_string()).style(Style::default().fg(delay_color(k.avg_delay_ms))),
        Cell::from(k.errors.to_string()),
    ])
}

pub fn present_finger_row(f: &FingerAnalytics) -> Row<'static> {
    Row::new(vec![
        Cell::from(f.finger.display_name()).style(Style::default().fg(finger_color(f.finger))),
        Cell::from(format!("{:.1}%", f.usage)),
        Cell::from(format!("{:.1}%", f.accuracy)).style(Style::default().fg(accuracy_color(f.accuracy))),
        Cell::from(f.avg_delay_ms.to_string()),
    ])
}

/// Key and finger breakdown of the test just finished.
pub fn render_key_stats(app: &mut App, f: &mut Frame) {
    let header_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = Paragraph::new("Key statistics for this test")
        .block(Block::default().borders(Borders::ALL).title("Keys"))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let events = app.scorer.keystrokes();
    if events.is_empty() {
        let no_data = Paragraph::new("No keystrokes recorded.")
            .block(Block::default().borders(Borders::ALL).title("No Data"))
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center);
        f.render_widget(no_data, chunks[1]);
    } else {
        let keys = key_analytics(events);
        let fingers = finger_analytics(events);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[1]);

        // borders plus header row
        let visible = columns[0].height.saturating_sub(3) as usize;
        app.key_stats_scroll = app.key_stats_scroll.min(keys.len().saturating_sub(visible));

        let rows: Vec<Row> = keys
            .iter()
            .skip(app.key_stats_scroll)
            .take(visible)
            .map(present_key_row)
            .collect();
        let key_table = Table::new(
            rows,
            [
                Constraint::Length(7),
                Constraint::Length(7),
                Constraint::Length(6),
                Constraint::Length(8),
                Constraint::Length(7),
            ],
        )
        .header(Row::new(vec!["Key", "Count", "Acc", "Avg ms", "Errors"]).style(header_style))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("By key ({} distinct)", keys.len())),
        );
        f.render_widget(key_table, columns[0]);

        let finger_table = Table::new(
            fingers.iter().map(present_finger_row).collect::<Vec<_>>(),
            [
                Constraint::Length(13),
                Constraint::Length(7),
                Constraint::Length(7),
                Constraint::Length(7),
            ],
        )
        .header(Row::new(vec!["Finger", "Usage", "Acc", "Avg ms"]).style(header_style))
        .block(Block::default().borders(Borders::ALL).title("By finger"));
        f.render_widget(finger_table, columns[1]);
    }

    let instructions = Paragraph::new("↑/↓ scroll | (b)ack (r)etry (n)ew (esc)ape")
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC))
        .alignment(Alignment::Center);
    f.render_widget(instructions, chunks[2]);
}
