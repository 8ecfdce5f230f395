pub mod charting;
pub mod key_stats;
pub mod keyboard;
pub mod screen;

use chrono::Local;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use typerank::analytics::typing_patterns;

use crate::{
    ui::keyboard::{Keyboard, KEYBOARD_HEIGHT},
    App,
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

pub fn draw(app: &mut App, f: &mut Frame) {
    screen::current_screen(app.state).render(app, f);
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.scorer.has_finished() {
            render_results(self, area, buf);
        } else {
            render_typing(self, area, buf);
        }
    }
}

fn render_typing(app: &App, area: Rect, buf: &mut Buffer) {
    let scorer = &app.scorer;
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
    let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);
    let dim_bold_style = Style::default()
        .patch(bold_style)
        .add_modifier(Modifier::DIM);
    let underlined_dim_bold_style = Style::default()
        .patch(dim_bold_style)
        .add_modifier(Modifier::UNDERLINED);

    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let prompt_width = scorer.target().width();
    let prompt_occupied_lines = if prompt_width <= max_chars_per_line as usize {
        1
    } else {
        ((prompt_width as f64 / max_chars_per_line as f64).ceil() + 1.0) as u16
    };
    let keyboard_lines = if area.height > prompt_occupied_lines + KEYBOARD_HEIGHT + 6 {
        KEYBOARD_HEIGHT
    } else {
        0
    };
    let filler = area
        .height
        .saturating_sub(prompt_occupied_lines + keyboard_lines + 3)
        / 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(filler),
            Constraint::Length(2), // live stats
            Constraint::Length(prompt_occupied_lines),
            Constraint::Length(1),
            Constraint::Length(keyboard_lines),
            Constraint::Min(0),
        ])
        .split(area);

    let target: Vec<char> = scorer.target().chars().collect();
    let typed: Vec<char> = scorer.input().chars().collect();

    let mut spans = typed
        .iter()
        .enumerate()
        .map(|(idx, &c)| match target.get(idx) {
            Some(&expected) if expected == c => Span::styled(expected.to_string(), green_bold_style),
            _ => Span::styled(
                match c {
                    ' ' => "·".to_owned(),
                    c => c.to_string(),
                },
                red_bold_style,
            ),
        })
        .collect::<Vec<Span>>();

    let cursor = typed.len();
    if let Some(c) = target.get(cursor) {
        spans.push(Span::styled(c.to_string(), underlined_dim_bold_style));
    }
    if cursor + 1 < target.len() {
        spans.push(Span::styled(
            target[cursor + 1..].iter().collect::<String>(),
            dim_bold_style,
        ));
    }

    Paragraph::new(Line::from(spans))
        .alignment(if prompt_occupied_lines == 1 {
            // a short prompt reads better centred
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: true })
        .render(chunks[2], buf);

    let status = if scorer.has_started() {
        let stats = scorer.stats();
        let mut line = format!(
            "{} wpm   {}% acc   streak {}   errors {}",
            stats.wpm, stats.accuracy, stats.streak, stats.errors
        );
        if let Some(left) = scorer.seconds_remaining(Local::now()) {
            line.push_str(&format!("   {left:.1}s"));
        }
        line
    } else {
        match scorer.seconds_remaining(Local::now()) {
            Some(left) => format!("{} mode   {left:.0}s   start typing", scorer.config().mode),
            None => format!("{} mode   start typing", scorer.config().mode),
        }
    };
    Paragraph::new(Span::styled(status, dim_bold_style))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    if keyboard_lines > 0 {
        Keyboard {
            next: target.get(cursor).copied(),
            last: typed.last().copied(),
        }
        .render(chunks[4], buf);
    }
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let scorer = &app.scorer;
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);
    let magenta_style = Style::default().fg(Color::Magenta);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(1),    // chart
            Constraint::Length(1), // result line
            Constraint::Length(1), // disqualification
            Constraint::Length(1), // save notice
            Constraint::Length(1), // padding
            Constraint::Length(1), // legend
        ])
        .split(area);

    let series = match scorer.started_at() {
        Some(start) => charting::wpm_series(&typing_patterns(scorer.keystrokes(), start)),
        None => Vec::new(),
    };
    let fallback = scorer.result().map(|r| r.duration_seconds as f64);
    let (overall_duration, highest_wpm) = charting::compute_chart_params(&series, fallback);

    let datasets = vec![Dataset::default()
        .marker(ratatui::symbols::Marker::Braille)
        .style(magenta_style)
        .graph_type(GraphType::Line)
        .data(&series)];

    Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title("seconds")
                .bounds([0.0, overall_duration])
                .labels(vec![
                    Span::styled("0", bold_style),
                    Span::styled(charting::format_label(overall_duration), bold_style),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("wpm")
                .bounds([0.0, highest_wpm.max(1.0)])
                .labels(vec![
                    Span::styled("0", bold_style),
                    Span::styled(charting::format_label(highest_wpm), bold_style),
                ]),
        )
        .render(chunks[0], buf);

    if let Some(result) = scorer.result() {
        Paragraph::new(Span::styled(
            format!(
                "{} wpm   {}% acc   {} adjusted   {} errors   {}s",
                result.wpm,
                result.accuracy,
                result.adjusted_wpm,
                result.errors,
                result.duration_seconds
            ),
            bold_style,
        ))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

        if result.disqualified {
            Paragraph::new(Span::styled(
                "disqualified: keystrokes arrived faster than a human can type",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);
        }
    }

    if let Some(notice) = &app.notice {
        Paragraph::new(Span::styled(
            notice.as_str(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);
    }

    Paragraph::new(Span::styled(
        "(r)etry / (n)ew / (k)ey stats / (esc)ape",
        italic_style,
    ))
    .render(chunks[5], buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AppState;
    use chrono::Duration;
    use ratatui::{backend::TestBackend, Terminal};
    use typerank::result::TestMode;
    use typerank::scorer::Transition;
    use typerank::text_source::{TextGenConfig, TextGenerator};

    fn app(prompt: &str, mode: TestMode) -> App {
        let generator = TextGenerator::new(TextGenConfig {
            mode,
            duration_secs: 30,
            word_count: 5,
            custom_prompt: Some(prompt.to_string()),
        })
        .unwrap();
        App::new(generator, None, None)
    }

    fn type_all(app: &mut App, text: &str, gap_ms: i64) {
        let mut now = Local::now();
        for c in text.chars() {
            now += Duration::milliseconds(gap_ms);
            if let Ok(Transition::Completed(_)) = app.scorer.type_char(c, now) {
                app.state = AppState::Results;
            }
        }
    }

    fn render(app: &App, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_idle_screen_shows_prompt_and_mode() {
        let app = app("hello world", TestMode::Words);
        let rendered = render(&app, 80, 24);
        assert!(rendered.contains("ello world"));
        assert!(rendered.contains("words mode"));
    }

    #[test]
    fn test_typing_screen_shows_live_stats_and_timer() {
        let mut app = app("hello world", TestMode::Time);
        type_all(&mut app, "hel", 150);
        let rendered = render(&app, 80, 24);
        assert!(rendered.contains("% acc"));
        assert!(rendered.contains("streak 3"));
        assert!(rendered.contains('s'));
    }

    #[test]
    fn test_typing_screen_shows_wrong_char() {
        let mut app = app("a bc", TestMode::Words);
        type_all(&mut app, "ax", 150);
        let rendered = render(&app, 80, 24);
        assert!(rendered.contains('x'));
    }

    #[test]
    fn test_results_screen() {
        let mut app = app("test", TestMode::Words);
        type_all(&mut app, "test", 200);
        let rendered = render(&app, 80, 24);
        assert!(rendered.contains("wpm"));
        assert!(rendered.contains("100% acc"));
        assert!(rendered.contains("(k)ey stats"));
        assert!(!rendered.contains("disqualified"));
    }

    #[test]
    fn test_results_screen_flags_disqualification() {
        let mut app = app("bot", TestMode::Words);
        type_all(&mut app, "bot", 5);
        let rendered = render(&app, 100, 24);
        assert!(rendered.contains("disqualified"));
    }

    #[test]
    fn test_tiny_and_huge_areas_do_not_panic() {
        let mut app = app("the quick brown fox jumps over the lazy dog", TestMode::Words);
        render(&app, 10, 3);
        render(&app, 300, 100);
        type_all(&mut app, "the quick brown fox jumps over the lazy dog", 120);
        render(&app, 10, 3);
    }

    #[test]
    fn test_draw_every_state() {
        let mut app = app("go", TestMode::Words);
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();

        terminal.draw(|f| draw(&mut app, f)).unwrap();
        type_all(&mut app, "go", 150);
        terminal.draw(|f| draw(&mut app, f)).unwrap();
        app.state = AppState::KeyStats;
        app.key_stats_scroll = 99;
        terminal.draw(|f| draw(&mut app, f)).unwrap();
        assert_eq!(app.key_stats_scroll, 0);
    }
}
