// Library surface shared by the binary and the integration tests.
// Terminal setup and screens stay in main.rs and ui.
pub mod analytics;
pub mod app_dirs;
pub mod auth;
pub mod config;
pub mod error;
pub mod keystroke;
pub mod leaderboard;
pub mod logging;
pub mod report;
pub mod result;
pub mod runtime;
pub mod scorer;
pub mod storage;
pub mod text_source;
pub mod util;

/// Interval between ticks of the TUI loop.
pub const TICK_RATE_MS: u64 = 100;
