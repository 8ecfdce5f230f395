pub mod ui;

use std::io::{self, stdin, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration as ChronoDuration, Local};
use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand, ValueEnum};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use typerank::{
    app_dirs::AppDirs,
    auth::{Authenticator, User},
    config::{Config, ConfigStore, FileConfigStore},
    error::TyperankError,
    leaderboard::{self, SortBy, Timeframe},
    logging::init_logging,
    report,
    result::{TestMode, TestResult},
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    scorer::{Scorer, SessionConfig, Transition},
    storage::{ResultStore, Store},
    text_source::{TextGenConfig, TextGenerator},
    analytics, TICK_RATE_MS,
};

/// typing practice tui with live wpm, finger analytics, streaks and leaderboards
#[derive(Parser, Debug, Clone)]
#[clap(version, about)]
pub struct Cli {
    /// directory holding the database, config and log file
    #[clap(long, global = true)]
    data_dir: Option<PathBuf>,

    /// log at debug level
    #[clap(short = 'v', long, global = true)]
    verbose: bool,

    /// test mode (defaults to the saved config)
    #[clap(short = 'm', long, value_enum)]
    mode: Option<TestMode>,

    /// seconds for time mode
    #[clap(short = 'd', long)]
    duration: Option<u32>,

    /// number of words for words mode
    #[clap(short = 'w', long)]
    words: Option<usize>,

    /// custom prompt to type instead of generated text
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// best scores per user
    Leaderboard {
        #[clap(long, value_enum, default_value_t = Board::Global)]
        mode: Board,
        #[clap(long, default_value_t = 10)]
        limit: usize,
        #[clap(long, value_enum, default_value_t = SortBy::Wpm)]
        sort_by: SortBy,
        #[clap(long, value_enum, default_value_t = Timeframe::All)]
        timeframe: Timeframe,
    },
    /// current and longest daily practice streak
    Streak,
    /// lifetime totals and a per-day breakdown for the logged in profile
    Stats {
        /// days covered by the daily breakdown
        #[clap(long, default_value_t = leaderboard::DEFAULT_DAILY_WINDOW_DAYS)]
        days: u32,
    },
    /// past tests, newest first
    History {
        #[clap(long, default_value_t = 20)]
        limit: usize,
        #[clap(long, default_value_t = 0)]
        skip: usize,
        /// write csv to stdout instead of a table
        #[clap(long)]
        csv: bool,
    },
    /// per-key (or per-finger) accuracy and speed
    Keys {
        /// restrict to one test id
        #[clap(long)]
        test: Option<i64>,
        /// group by finger instead of key
        #[clap(long)]
        fingers: bool,
        /// finger usage window in days, ignored with --test [default: 7]
        #[clap(long, requires = "fingers")]
        days: Option<u32>,
    },
    /// create a local profile and log in as it
    Register { username: String },
    /// log in to an existing local profile
    Login { username: String },
    /// forget the current session
    Logout,
    /// print the logged in profile
    Whoami,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Board {
    Time,
    Words,
    Quote,
    Global,
}

impl Cli {
    /// CLI flags win over the saved config for this run only.
    fn to_text_gen_config(&self, config: &Config) -> TextGenConfig {
        TextGenConfig {
            mode: self.mode.unwrap_or(config.test_mode),
            duration_secs: self.duration.unwrap_or(config.test_duration).max(1),
            word_count: self.words.unwrap_or(config.word_count).max(1),
            custom_prompt: self.prompt.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Typing,
    Results,
    KeyStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExitType {
    Stay,
    Restart,
    New,
    Quit,
}

pub struct App {
    pub scorer: Scorer,
    pub generator: TextGenerator,
    pub state: AppState,
    pub store: Option<Store>,
    pub user: Option<User>,
    /// one-line status shown under the results
    pub notice: Option<String>,
    pub key_stats_scroll: usize,
}

impl App {
    pub fn new(generator: TextGenerator, store: Option<Store>, user: Option<User>) -> Self {
        let cfg = generator.config();
        let session = SessionConfig {
            mode: cfg.mode,
            duration_secs: cfg.duration_secs,
        };
        Self {
            scorer: Scorer::new(generator.generate(), session),
            generator,
            state: AppState::Typing,
            store,
            user,
            notice: None,
            key_stats_scroll: 0,
        }
    }

    /// Same text again when `new_text` is false.
    pub fn reset(&mut self, new_text: bool) {
        if new_text {
            self.scorer.reset(self.generator.generate());
        } else {
            self.scorer.restart();
        }
        self.state = AppState::Typing;
        self.notice = None;
        self.key_stats_scroll = 0;
    }

    fn apply(&mut self, transition: Transition) {
        if let Transition::Completed(result) = transition {
            self.record(result);
        }
    }

    /// Show the results and persist them when a profile is logged in.
    fn record(&mut self, result: TestResult) {
        self.state = AppState::Results;

        let (Some(store), Some(user)) = (self.store.as_mut(), self.user.as_ref()) else {
            log::info!("test finished without a profile, result not saved");
            self.notice = Some("not logged in: result not saved".to_string());
            return;
        };

        match store.append_result_with_keystrokes(user.id, &result, self.scorer.keystrokes()) {
            Ok(test_id) => {
                self.notice = Some(format!("saved as test #{test_id}"));
            }
            Err(e) => {
                log::error!("could not save result: {e}");
                self.notice = Some("could not save result, see log".to_string());
            }
        }
    }

    /// Returns true when the screen needs redrawing.
    fn on_tick(&mut self, now: DateTime<Local>) -> bool {
        if self.state != AppState::Typing || !self.scorer.has_started() {
            return false;
        }
        let transition = self.scorer.on_tick(now);
        self.apply(transition);
        true
    }

    fn on_key(&mut self, key: KeyEvent, now: DateTime<Local>) -> ExitType {
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            return ExitType::Quit;
        }

        match self.state {
            AppState::Typing => {
                let typed = match key.code {
                    KeyCode::Left => return ExitType::Restart,
                    KeyCode::Right => return ExitType::New,
                    KeyCode::Backspace => self.scorer.backspace(now),
                    KeyCode::Char(c) => self.scorer.type_char(c, now),
                    _ => return ExitType::Stay,
                };
                match typed {
                    Ok(transition) => self.apply(transition),
                    Err(TyperankError::InvalidInput { .. }) => {}
                    Err(e) => log::error!("keystroke rejected: {e}"),
                }
                ExitType::Stay
            }
            AppState::Results => match key.code {
                KeyCode::Char('r') => ExitType::Restart,
                KeyCode::Char('n') => ExitType::New,
                KeyCode::Char('k') => {
                    self.state = AppState::KeyStats;
                    ExitType::Stay
                }
                _ => ExitType::Stay,
            },
            AppState::KeyStats => match key.code {
                KeyCode::Char('r') => ExitType::Restart,
                KeyCode::Char('n') => ExitType::New,
                KeyCode::Char('b') | KeyCode::Backspace => {
                    self.state = AppState::Results;
                    ExitType::Stay
                }
                KeyCode::Up => {
                    self.key_stats_scroll = self.key_stats_scroll.saturating_sub(1);
                    ExitType::Stay
                }
                KeyCode::Down => {
                    // clamped while rendering
                    self.key_stats_scroll += 1;
                    ExitType::Stay
                }
                KeyCode::Home => {
                    self.key_stats_scroll = 0;
                    ExitType::Stay
                }
                _ => ExitType::Stay,
            },
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let dirs = AppDirs::resolve(cli.data_dir.as_deref());
    init_logging(&dirs.log_path(), cli.verbose).context("initialising log file")?;

    let config_store = FileConfigStore::new(&dirs);
    let config = config_store.load();

    match cli.command.clone() {
        Some(command) => run_command(command, &dirs, &config_store, config),
        None => run_tui(&cli, &dirs, &config),
    }
}

fn open_store(dirs: &AppDirs) -> Result<Store> {
    let path = dirs.db_path();
    Store::open(&path).with_context(|| format!("opening database {}", path.display()))
}

fn require_user(store: &Store, config: &Config) -> Result<User> {
    store
        .resolve(config.session_token.as_deref(), Local::now())
        .context("not logged in, run `typerank login <name>` first")
}

fn run_command(
    command: Command,
    dirs: &AppDirs,
    config_store: &FileConfigStore,
    mut config: Config,
) -> Result<()> {
    let store = open_store(dirs)?;
    let now = Local::now();
    let mut out = io::stdout().lock();

    match command {
        Command::Leaderboard {
            mode,
            limit,
            sort_by,
            timeframe,
        } => {
            let entries = match mode {
                Board::Global => {
                    leaderboard::get_global_leaderboard(&store, limit, sort_by, timeframe, now)?
                }
                Board::Time => leaderboard::get_leaderboard(&store, TestMode::Time, limit, sort_by, timeframe, now)?,
                Board::Words => leaderboard::get_leaderboard(&store, TestMode::Words, limit, sort_by, timeframe, now)?,
                Board::Quote => leaderboard::get_leaderboard(&store, TestMode::Quote, limit, sort_by, timeframe, now)?,
            };
            let title = format!("{mode} leaderboard by {sort_by} ({timeframe})");
            report::write_leaderboard(&mut out, &title, &entries)?;
        }
        Command::Streak => {
            let user = require_user(&store, &config)?;
            let streak = leaderboard::compute_streak(&store, user.id, now.date_naive())?;
            report::write_streak(&mut out, &streak)?;
        }
        Command::Stats { days } => {
            let user = require_user(&store, &config)?;
            let stats = leaderboard::user_stats(&store, user.id, now.date_naive())?;
            let daily = leaderboard::daily_stats(&store, user.id, days, now.date_naive())?;
            report::write_user_stats(&mut out, &user.username, &stats)?;
            report::write_daily_stats(&mut out, days, &daily)?;
        }
        Command::History { limit, skip, csv } => {
            let user = require_user(&store, &config)?;
            let rows = leaderboard::history(&store, user.id, limit, skip)?;
            if csv {
                report::write_history_csv(&mut out, &rows)?;
            } else {
                report::write_history(&mut out, &rows, &leaderboard::history_metrics(&rows))?;
            }
        }
        Command::Keys {
            test,
            fingers: false,
            ..
        } => {
            let user = require_user(&store, &config)?;
            let keys = analytics::stored_key_analytics(&store, user.id, test)?;
            report::write_key_analytics(&mut out, &keys)?;
        }
        Command::Keys {
            test,
            fingers: true,
            days,
        } => {
            let user = require_user(&store, &config)?;
            let since = match test {
                Some(_) => None,
                None => {
                    let days = days.map_or(analytics::DEFAULT_FINGER_WINDOW_DAYS, i64::from);
                    Some(now - ChronoDuration::days(days))
                }
            };
            let fingers = analytics::stored_finger_analytics(&store, user.id, test, since)?;
            report::write_finger_analytics(&mut out, &fingers)?;
        }
        Command::Register { username } => {
            let user = store.create_user(&username, now)?;
            config.session_token = Some(store.login(&user.username, now)?);
            config_store.save(&config)?;
            writeln!(out, "registered and logged in as {}", user.username)?;
        }
        Command::Login { username } => {
            store.purge_expired_sessions(now)?;
            if let Some(old) = config.session_token.take() {
                store.logout(&old)?;
            }
            config.session_token = Some(store.login(&username, now)?);
            config_store.save(&config)?;
            writeln!(out, "logged in as {}", username.trim())?;
        }
        Command::Logout => {
            if let Some(token) = config.session_token.take() {
                store.logout(&token)?;
                config_store.save(&config)?;
            }
            writeln!(out, "logged out")?;
        }
        Command::Whoami => match store.resolve(config.session_token.as_deref(), now) {
            Ok(user) => writeln!(out, "{}", user.username)?,
            Err(TyperankError::Unauthenticated(_)) => writeln!(out, "not logged in")?,
            Err(e) => return Err(e.into()),
        },
    }

    Ok(())
}

fn run_tui(cli: &Cli, dirs: &AppDirs, config: &Config) -> Result<()> {
    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = match open_store(dirs) {
        Ok(store) => Some(store),
        Err(e) => {
            log::warn!("practising without persistence: {e:#}");
            None
        }
    };
    let user = store
        .as_ref()
        .and_then(|s| s.resolve(config.session_token.as_deref(), Local::now()).ok());
    match &user {
        Some(u) => log::info!("practising as {}", u.username),
        None => log::info!("practising as guest"),
    }

    let generator = TextGenerator::new(cli.to_text_gen_config(config))?;
    let mut app = App::new(generator, store, user);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let outcome = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    outcome
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    terminal.draw(|f| ui::draw(app, f))?;
    loop {
        let redraw = match runner.step() {
            AppEvent::Tick => app.on_tick(Local::now()),
            AppEvent::Resize => true,
            AppEvent::Closed => {
                log::warn!("terminal input closed, leaving");
                break;
            }
            AppEvent::Key(key) => {
                match app.on_key(key, Local::now()) {
                    ExitType::Quit => break,
                    ExitType::Restart => app.reset(false),
                    ExitType::New => app.reset(true),
                    ExitType::Stay => {}
                }
                true
            }
        };
        if redraw {
            terminal.draw(|f| ui::draw(app, f))?;
        }
    }

    Ok(())
}
