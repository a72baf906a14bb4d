use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin, BufRead},
    path::PathBuf,
    time::Duration,
};

use tango::{
    app::{App, AppSettings},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    deck::{BuiltinDeck, CsvPoolLoader, PoolLoader},
    history::HistoryDb,
    logging::{init_tracing, resolve_level},
    record::{CsvRecordLog, RecordSink, RecordSinks},
    runtime::{CrosstermEventSource, QuizEvent, Runner, TICK_RATE_MS},
    ui::TuiView,
    view::{HistoryPanel, PlainView, QuizView},
};

const HISTORY_PRINT_LIMIT: usize = 50;

/// terminal vocabulary drill with difficulty windows and session history
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Drill a window of vocabulary words until every one of them has been answered correctly. Answers must match the written or the phonetic form exactly."
)]
pub struct Cli {
    /// built-in deck to drill
    #[clap(short = 'd', long)]
    deck: Option<String>,

    /// csv file with English,Japanese,Kana columns (overrides --deck)
    #[clap(short = 'f', long)]
    words_file: Option<PathBuf>,

    /// prefill for the "start from" field (0-based)
    #[clap(short = 's', long)]
    start: Option<usize>,

    /// prefill for the "up to" field (1-based)
    #[clap(short = 'u', long)]
    up_to: Option<usize>,

    /// how long the correct/wrong banner stays visible
    #[clap(long)]
    feedback_ms: Option<u64>,

    /// also append finished sessions to a csv log
    #[clap(long)]
    csv_log: bool,

    /// line-oriented mode: read answers from stdin, no full-screen ui
    #[clap(long)]
    plain: bool,

    /// print finished sessions and exit
    #[clap(long)]
    history: bool,

    /// list built-in decks and exit
    #[clap(long)]
    list_decks: bool,

    /// tracing filter, e.g. "debug" or "tango=trace"
    #[clap(long)]
    log_level: Option<String>,

    /// persist these options as the new defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Overlay command-line options on the stored config
    fn apply(&self, mut cfg: Config) -> Config {
        if let Some(deck) = &self.deck {
            cfg.deck = deck.clone();
            cfg.words_file = None;
        }
        if let Some(path) = &self.words_file {
            cfg.words_file = Some(path.clone());
        }
        if let Some(start) = self.start {
            cfg.default_start = start;
        }
        if let Some(up_to) = self.up_to {
            cfg.default_up_to = up_to;
        }
        if let Some(ms) = self.feedback_ms {
            cfg.feedback_ms = ms;
        }
        if self.csv_log {
            cfg.csv_log = true;
        }
        if let Some(level) = &self.log_level {
            cfg.log_level = level.clone();
        }
        cfg
    }
}

fn build_loader(cfg: &Config) -> Result<Box<dyn PoolLoader>, Box<dyn Error>> {
    let loader: Box<dyn PoolLoader> = match &cfg.words_file {
        Some(path) => Box::new(CsvPoolLoader::new(path)),
        None => Box::new(BuiltinDeck::new(cfg.deck.clone())?),
    };
    Ok(loader)
}

fn build_sinks(cfg: &Config) -> RecordSinks {
    let mut sinks = RecordSinks::new();
    match HistoryDb::new() {
        Ok(db) => sinks = sinks.with(db),
        Err(e) => tracing::warn!(error = %e, "history database unavailable"),
    }
    if cfg.csv_log {
        if let Some(path) = AppDirs::csv_log_path() {
            sinks = sinks.with(CsvRecordLog::new(path));
        }
    }
    sinks
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());

    let level = resolve_level(cli.log_level.as_deref(), &config.log_level);
    let _log_guard = AppDirs::log_dir().and_then(|dir| init_tracing(&level, &dir));

    if cli.save_config {
        store.save(&config)?;
        println!("saved config to {}", store.path().display());
    }

    if cli.list_decks {
        for name in BuiltinDeck::names() {
            println!("{name}");
        }
        return Ok(());
    }

    if cli.history {
        let db = HistoryDb::new()?;
        let mut view = PlainView::new(io::stdout());
        view.render_history(&HistoryPanel {
            records: db.recent(HISTORY_PRINT_LIMIT)?,
            summary: db.summary()?,
            scroll_offset: 0,
        })?;
        return Ok(());
    }

    if !cli.plain && !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty (or pass --plain)")
            .exit();
    }

    let loader = build_loader(&config)?;
    let tick = Duration::from_millis(TICK_RATE_MS);
    let settings = AppSettings::from_config(&config, tick);
    let mut app = App::new(loader, build_sinks(&config), settings)?;
    if let Ok(db) = HistoryDb::new() {
        app = app.with_history(db);
    }

    if cli.plain {
        return run_plain(&mut app);
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;

    let mut view = TuiView::new(terminal);
    let result = start_tui(&mut view, &mut app, tick);

    disable_raw_mode()?;
    execute!(view.terminal_mut().backend_mut(), LeaveAlternateScreen)?;
    view.terminal_mut().show_cursor()?;

    result
}

fn start_tui<B: Backend, S: RecordSink>(
    view: &mut TuiView<B>,
    app: &mut App<S>,
    tick: Duration,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), tick);

    app.render(view)?;

    while !app.should_quit {
        match runner.step() {
            QuizEvent::Tick => {
                if app.on_tick() {
                    app.render(view)?;
                }
            }
            QuizEvent::Resize => view.redraw()?,
            QuizEvent::Key(key) => {
                app.handle_key(key);
                if !app.should_quit {
                    app.render(view)?;
                }
            }
        }
    }

    Ok(())
}

fn run_plain<S: RecordSink>(app: &mut App<S>) -> Result<(), Box<dyn Error>> {
    let mut view = PlainView::new(io::stdout());
    app.render(&mut view)?;
    app.dismiss_feedback();

    for line in stdin().lock().lines() {
        let line = line?;
        app.handle_line(&line);
        if app.should_quit {
            break;
        }
        app.render(&mut view)?;
        app.dismiss_feedback();
    }

    Ok(())
}
