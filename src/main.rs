pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use flipdex::{
    config::{default_log_file, Settings},
    content::{PokeApi, DEFAULT_API_BASE, DEFAULT_CATALOG_LIMIT},
    controller::Controller,
    difficulty::Difficulty,
    fetch::{FetchCommand, Fetcher},
    game::GameEvent,
    logging,
    runtime::{AppEvent, CrosstermEventSource, EventSource, FixedTicker, Runner, Ticker},
    theme::Theme,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::{Duration, Instant},
};
use tracing::{info, warn};
use webbrowser::Browser;

const TICK_RATE_MS: u64 = 100;

/// memory-matching card game with creatures from PokeAPI
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Flip cards two at a time and find every pair of creatures before the clock runs out. Card faces are fetched from PokeAPI."
)]
pub struct Cli {
    /// difficulty of the first game
    #[clap(short = 'd', long, value_enum, default_value_t = Difficulty::Easy)]
    difficulty: Difficulty,

    /// colour theme
    #[clap(short = 't', long, value_enum, default_value_t = Theme::Dark)]
    theme: Theme,

    /// base url of the creature API
    #[clap(long, default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// number of creatures to draw pairs from
    #[clap(long, default_value_t = DEFAULT_CATALOG_LIMIT)]
    catalog_limit: usize,

    /// seed for repeatable shuffles
    #[clap(long)]
    seed: Option<u64>,

    /// where diagnostics are written (defaults to the temp dir)
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl From<&Cli> for Settings {
    fn from(cli: &Cli) -> Self {
        Self {
            difficulty: cli.difficulty,
            theme: cli.theme,
            api_base: cli.api_base.clone(),
            catalog_limit: cli.catalog_limit,
            seed: cli.seed,
            log_file: cli.log_file.clone().unwrap_or_else(default_log_file),
        }
    }
}

/// What the event loop should do after a key press
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Continue,
    Quit,
    Fetch(FetchCommand),
    Open(String),
}

#[derive(Debug)]
pub struct App {
    pub controller: Controller,
    pub theme: Theme,
    pub focus: usize,
    pub notice: Option<String>,
}

impl App {
    pub fn new(settings: &Settings) -> (Self, FetchCommand) {
        let (controller, cmd) =
            Controller::new(settings.difficulty, &settings.api_base, settings.seed);

        (
            Self {
                controller,
                theme: settings.theme,
                focus: 0,
                notice: None,
            },
            cmd,
        )
    }

    fn new_session(&mut self, cmd: FetchCommand) -> Flow {
        self.focus = 0;
        self.notice = None;
        Flow::Fetch(cmd)
    }

    fn move_focus(&mut self, code: KeyCode) {
        let board = self.controller.session().board();
        let len = board.len();
        let cols = board.columns();
        if len == 0 {
            return;
        }

        let focus = self.focus.min(len - 1);
        self.focus = match code {
            KeyCode::Left | KeyCode::Char('h') if focus % cols > 0 => focus - 1,
            KeyCode::Right | KeyCode::Char('l') if focus + 1 < len && (focus + 1) % cols != 0 => {
                focus + 1
            }
            KeyCode::Up | KeyCode::Char('k') if focus >= cols => focus - cols,
            KeyCode::Down | KeyCode::Char('j') if focus + cols < len => focus + cols,
            _ => focus,
        };
    }

    /// Turn game events into the message shown under the board
    pub fn on_events(&mut self, events: &[GameEvent]) {
        for event in events {
            let notice = match event {
                GameEvent::Matched { .. } => "It's a match!",
                GameEvent::Mismatched { .. } => "No match",
                GameEvent::PowerUpReady => "Power-up ready! Press p to reveal every card",
                GameEvent::RevealStarted => "Revealing...",
                GameEvent::Won => "Congratulations! You won!",
                GameEvent::TimedOut => "Game Over! Time's up!",
                _ => continue,
            };
            self.notice = Some(notice.to_string());
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if key.kind != KeyEventKind::Press {
            return Flow::Continue;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Flow::Quit,
            KeyCode::Char('s') => {
                let cmd = self.controller.start();
                self.new_session(cmd)
            }
            KeyCode::Char('r') => {
                let cmd = self.controller.reset();
                self.new_session(cmd)
            }
            KeyCode::Char('1') => {
                let cmd = self.controller.change_difficulty(Difficulty::Easy);
                self.new_session(cmd)
            }
            KeyCode::Char('2') => {
                let cmd = self.controller.change_difficulty(Difficulty::Medium);
                self.new_session(cmd)
            }
            KeyCode::Char('3') => {
                let cmd = self.controller.change_difficulty(Difficulty::Hard);
                self.new_session(cmd)
            }
            KeyCode::Char('t') => {
                self.theme = self.theme.toggled();
                Flow::Continue
            }
            KeyCode::Char('p') => {
                let events = self.controller.use_power_up();
                self.on_events(&events);
                Flow::Continue
            }
            KeyCode::Char('o') => {
                let session = self.controller.session();
                match session.card(self.focus) {
                    Some(card) if session.is_face_up(self.focus) => match &card.artwork {
                        Some(artwork) => Flow::Open(artwork.image_url.clone()),
                        None => Flow::Continue,
                    },
                    _ => Flow::Continue,
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                let events = self.controller.select(self.focus);
                self.on_events(&events);
                Flow::Continue
            }
            code => {
                self.move_focus(code);
                Flow::Continue
            }
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let settings = Settings::from(&cli);
    logging::init(&settings.log_file)?;

    let api = PokeApi::new(&settings.api_base, settings.catalog_limit)?;
    let event_source = CrosstermEventSource::new();
    let fetcher = Fetcher::spawn(api, event_source.sender());
    let runner = Runner::new(
        event_source,
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (mut app, first) = App::new(&settings);
    dispatch(&fetcher, first);
    let result = start_tui(&mut terminal, &mut app, &runner, &fetcher);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    info!("exiting");
    result
}

fn dispatch(fetcher: &Fetcher, cmd: FetchCommand) {
    if let Err(err) = fetcher.send(cmd) {
        warn!("could not queue request: {err}");
    }
}

fn open_artwork(url: &str) {
    if Browser::is_available() {
        if let Err(err) = webbrowser::open(url) {
            warn!(%url, "failed to open browser: {err}");
        }
    }
}

fn start_tui<B: Backend, E: EventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
    fetcher: &Fetcher,
) -> Result<(), Box<dyn Error>> {
    let mut last_step = Instant::now();
    terminal.draw(|f| ui(app, f))?;

    loop {
        let event = runner.step();

        let now = Instant::now();
        let events = app.controller.advance(now - last_step);
        last_step = now;
        app.on_events(&events);
        let mut redraw = !events.is_empty();

        match event {
            AppEvent::Tick => {}
            AppEvent::Resize => redraw = true,
            AppEvent::Roster { epoch, pool } => {
                for cmd in app.controller.on_roster(epoch, pool) {
                    dispatch(fetcher, cmd);
                }
                redraw = true;
            }
            AppEvent::Artwork {
                epoch,
                index,
                artwork,
            } => {
                redraw |= !app.controller.on_artwork(epoch, index, artwork).is_empty();
            }
            AppEvent::Key(key) => {
                match app.handle_key(key) {
                    Flow::Quit => break,
                    Flow::Fetch(cmd) => dispatch(fetcher, cmd),
                    Flow::Open(url) => open_artwork(&url),
                    Flow::Continue => {}
                }
                redraw = true;
            }
        }

        if redraw {
            terminal.draw(|f| ui(app, f))?;
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
