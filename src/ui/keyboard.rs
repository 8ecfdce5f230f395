use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};
use typerank::keystroke::{finger_for_key, Finger};

const ROWS: [&str; 4] = ["`1234567890-=", "qwertyuiop[]", "asdfghjkl;'", "zxcvbnm,./"];
/// Stagger of each row in key cells, like a physical board.
const ROW_OFFSETS: [u16; 4] = [0, 2, 3, 4];
const KEY_WIDTH: u16 = 4;
const SPACE_WIDTH: u16 = 24;

pub const KEYBOARD_HEIGHT: u16 = 5;

pub fn finger_color(finger: Finger) -> Color {
    match finger {
        Finger::LeftPinky => Color::Rgb(239, 68, 68),
        Finger::LeftRing => Color::Rgb(249, 115, 22),
        Finger::LeftMiddle => Color::Rgb(234, 179, 8),
        Finger::LeftIndex => Color::Rgb(34, 197, 94),
        Finger::RightIndex => Color::Rgb(6, 182, 212),
        Finger::RightMiddle => Color::Rgb(59, 130, 246),
        Finger::RightRing => Color::Rgb(168, 85, 247),
        Finger::RightPinky => Color::Rgb(236, 72, 153),
        Finger::Thumb => Color::Rgb(16, 185, 129),
        Finger::Unknown => Color::Rgb(107, 114, 128),
    }
}

/// QWERTY guide highlighting the next key and the one just typed.
pub struct Keyboard {
    pub next: Option<char>,
    pub last: Option<char>,
}

impl Keyboard {
    fn key_style(&self, key: char) -> Style {
        let same = |c: Option<char>| c.map(|c| c.to_ascii_lowercase()) == Some(key);
        if same(self.next) {
            Style::default()
                .bg(Color::Yellow)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD)
        } else if same(self.last) {
            Style::default()
                .bg(Color::Green)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(finger_color(finger_for_key(key)))
        }
    }
}

impl Widget for Keyboard {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let full_width = ROWS[0].len() as u16 * KEY_WIDTH;
        let left = area.x + area.width.saturating_sub(full_width) / 2;

        for (row_idx, row) in ROWS.iter().enumerate() {
            let y = area.y + row_idx as u16;
            if y >= area.bottom() {
                return;
            }
            let mut x = left + ROW_OFFSETS[row_idx];
            for key in row.chars() {
                if x + KEY_WIDTH > area.right() {
                    break;
                }
                buf.set_string(x, y, format!(" {key} "), self.key_style(key));
                x += KEY_WIDTH;
            }
        }

        let y = area.y + ROWS.len() as u16;
        if y < area.bottom() && area.width >= SPACE_WIDTH {
            let x = area.x + (area.width - SPACE_WIDTH) / 2;
            let label = format!("{:^width$}", "space", width = SPACE_WIDTH as usize);
            buf.set_string(x, y, label, self.key_style(' '));
        }
    }
}
