use ratatui::Frame;

use crate::{ui::key_stats::render_key_stats, App, AppState};

/// A UI screen boundary, one per [`AppState`].
pub trait Screen {
    fn render(&self, app: &mut App, f: &mut Frame);
}

/// Typing and results share the `&App` widget.
pub struct SessionScreen;

impl Screen for SessionScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        f.render_widget(&*app, f.area());
    }
}

pub struct KeyStatsScreen;

impl Screen for KeyStatsScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        render_key_stats(app, f);
    }
}

pub fn current_screen(state: AppState) -> Box<dyn Screen> {
    match state {
        AppState::Typing | AppState::Results => Box::new(SessionScreen),
        AppState::KeyStats => Box::new(KeyStatsScreen),
    }
}
