mod ui;

use std::{
    error::Error,
    io::{self, stdin, Write},
    path::{Path, PathBuf},
    time::Duration,
};

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::KeyEvent,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use sortscope::{
    runtime::{Command, CrosstermEventSource, Runner, SortEvent, FRAME},
    util::parse_values,
    Algorithm, Mode, Session, VisualizerConfig,
};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

const SPEED_STEP: u8 = 5;

/// watch bubble, quick and merge sort work, one comparison at a time
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal sorting visualizer. Runs bubble, quick or merge sort over a small array and pauses at every comparison, swap and merge so you can watch it work, either on a timer or one step at a time."
)]
pub struct Cli {
    /// algorithm selected at startup
    #[clap(short = 'a', long, value_enum, default_value_t = Algorithm::Bubble)]
    algorithm: Algorithm,

    /// auto plays on a timer, step waits for a key press per checkpoint
    #[clap(short = 'm', long, value_enum, default_value_t = Mode::Auto)]
    mode: Mode,

    /// playback speed, 1 (slowest) to 100 (fastest)
    #[clap(short = 's', long, default_value_t = 50, value_parser = clap::value_parser!(u8).range(1..=100))]
    speed: u8,

    /// number of elements in generated arrays
    #[clap(short = 'n', long, default_value_t = 20)]
    length: usize,

    /// smallest generated value
    #[clap(long, default_value_t = 1, allow_hyphen_values = true)]
    min: i32,

    /// largest generated value
    #[clap(long, default_value_t = 50, allow_hyphen_values = true)]
    max: i32,

    /// seed for reproducible arrays
    #[clap(long)]
    seed: Option<u64>,

    /// sort these values instead of a random array, e.g. "5,3,8,1"
    #[clap(short = 'v', long, allow_hyphen_values = true)]
    values: Option<String>,

    /// milliseconds per delay unit; a step waits (101 - speed) units
    #[clap(long, default_value_t = 1)]
    delay_unit_ms: u64,

    /// run headless and print one JSON snapshot per step to stdout
    #[clap(long)]
    trace: bool,

    /// write diagnostics to this file while the TUI is running
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn to_config(&self) -> VisualizerConfig {
        VisualizerConfig {
            array_length: self.length,
            min_value: self.min,
            max_value: self.max,
            default_speed: self.speed,
            delay_unit: Duration::from_millis(self.delay_unit_ms),
            seed: self.seed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub session: Session,
    pub last_error: Option<String>,
}

impl App {
    pub fn new(cli: &Cli) -> Result<Self, Box<dyn Error>> {
        let mut session = Session::new(cli.to_config())?;
        if let Some(values) = &cli.values {
            session.set_array(parse_values(values)?);
        }
        session.set_mode(cli.mode);
        session.select_algorithm(cli.algorithm);

        Ok(Self {
            session,
            last_error: None,
        })
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        match Command::from_key(key) {
            Some(Command::Quit) => return KeyOutcome::Quit,
            Some(command) => self.apply(command),
            None => {}
        }
        KeyOutcome::Continue
    }

    fn apply(&mut self, command: Command) {
        let state = self.session.state();
        match command {
            Command::Quit => {}
            Command::Select(algorithm) => {
                self.session.select_algorithm(algorithm);
            }
            Command::Start => {
                let algorithm = state.algorithm;
                if let Err(e) = self.session.start(algorithm) {
                    self.last_error = Some(e.to_string());
                }
            }
            Command::TogglePause => {
                self.session.toggle_pause();
            }
            Command::Advance => {
                self.session.advance_step();
            }
            Command::ToggleMode => {
                let next = match state.mode {
                    Mode::Auto => Mode::Step,
                    Mode::Step => Mode::Auto,
                };
                self.session.set_mode(next);
            }
            Command::Faster => {
                let speed = state.speed.saturating_add(SPEED_STEP);
                self.session.set_speed(speed);
            }
            Command::Slower => {
                let speed = state.speed.saturating_sub(SPEED_STEP);
                self.session.set_speed(speed);
            }
            Command::Stop => {
                self.session.stop();
            }
            Command::Reset => {
                self.session.reset();
                self.last_error = None;
            }
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(io::stderr)
            .init();
        let mut app = App::new(&cli)?;
        return run_trace(&mut app.session, cli.algorithm);
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = &cli.log_file {
        init_file_logging(path)?;
    }

    let mut app = App::new(&cli)?;

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_file_logging(path: &Path) -> Result<(), Box<dyn Error>> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .ok_or_else(|| format!("log file path {} has no file name", path.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name.to_string_lossy())
        .build(dir)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(appender)
        .with_ansi(false)
        .init();
    Ok(())
}

/// Headless run: one JSON snapshot per narrated step, then the final state.
fn run_trace(session: &mut Session, algorithm: Algorithm) -> Result<(), Box<dyn Error>> {
    let mut out = io::stdout().lock();
    let mut write_error: Option<io::Error> = None;

    session.run_to_completion(algorithm, |state| {
        if write_error.is_some() {
            return;
        }
        let line = serde_json::to_string(state).map_err(io::Error::from);
        if let Err(e) = line.and_then(|line| writeln!(out, "{line}")) {
            write_error = Some(e);
        }
    })?;

    if let Some(e) = write_error {
        return Err(e.into());
    }
    serde_json::to_writer(&mut out, session.state())?;
    writeln!(out)?;
    Ok(())
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FRAME);

    terminal.draw(|f| ui(app, f))?;

    loop {
        let event = runner.step();
        let mut dirty = app.session.pump();

        match event {
            SortEvent::Tick => {}
            SortEvent::Resize => dirty = true,
            SortEvent::Key(key) => {
                if app.handle_key(key) == KeyOutcome::Quit {
                    break;
                }
                dirty = true;
            }
        }

        if dirty {
            terminal.draw(|f| ui(app, f))?;
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
