use std::io;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::Config;
use crate::deck::PoolLoader;
use crate::error::{DeckError, QuizError, RestartError};
use crate::history::{HistoryDb, HistorySummary};
use crate::quiz::{Phase, QuizSession};
use crate::record::{RecordSink, SessionRecord};
use crate::view::{
    ConfigForm, Feedback, FormField, HistoryPanel, PromptPanel, QuizView, SummaryPanel,
};

pub const HISTORY_LIMIT: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Screen {
    Configure,
    Quiz,
    Summary,
    History,
}

/// Knobs the controller needs from config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppSettings {
    pub default_start: usize,
    pub default_up_to: usize,
    /// Ticks the correct/wrong banner stays up.
    pub feedback_ticks: u32,
}

impl AppSettings {
    pub fn from_config(cfg: &Config, tick: Duration) -> Self {
        let tick_ms = tick.as_millis().max(1) as u64;
        Self {
            default_start: cfg.default_start,
            default_up_to: cfg.default_up_to,
            feedback_ticks: cfg.feedback_ms.div_ceil(tick_ms) as u32,
        }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_start: 0,
            default_up_to: 10,
            feedback_ticks: 30,
        }
    }
}

/// Toolkit-agnostic controller: owns the session and turns input into
/// session calls and view updates.
pub struct App<S: RecordSink, R: Rng = StdRng> {
    session: QuizSession<S, R>,
    loader: Box<dyn PoolLoader>,
    history: Option<HistoryDb>,
    settings: AppSettings,
    pub screen: Screen,
    pub form: ConfigForm,
    pub answer: String,
    pub previous: Option<Feedback>,
    pub banner_ticks: u32,
    pub status: Option<String>,
    pub last_record: Option<SessionRecord>,
    history_panel: Option<HistoryPanel>,
    pub should_quit: bool,
}

impl<S: RecordSink> App<S, StdRng> {
    pub fn new(
        loader: Box<dyn PoolLoader>,
        sink: S,
        settings: AppSettings,
    ) -> Result<Self, DeckError> {
        Self::with_rng(loader, sink, StdRng::from_entropy(), settings)
    }
}

impl<S: RecordSink, R: Rng> App<S, R> {
    pub fn with_rng(
        loader: Box<dyn PoolLoader>,
        sink: S,
        rng: R,
        settings: AppSettings,
    ) -> Result<Self, DeckError> {
        let pool = loader.load()?;
        tracing::info!(deck = %loader.describe(), words = pool.len(), "starting quiz app");
        let form = Self::fresh_form(&settings, pool.len(), loader.describe());
        Ok(Self {
            session: QuizSession::with_rng(pool, sink, rng),
            loader,
            history: None,
            settings,
            screen: Screen::Configure,
            form,
            answer: String::new(),
            previous: None,
            banner_ticks: 0,
            status: None,
            last_record: None,
            history_panel: None,
            should_quit: false,
        })
    }

    /// Attach a read handle used by the history screen.
    pub fn with_history(mut self, history: HistoryDb) -> Self {
        self.history = Some(history);
        self
    }

    fn fresh_form(settings: &AppSettings, pool_len: usize, deck: String) -> ConfigForm {
        ConfigForm {
            start: settings.default_start.to_string(),
            up_to: settings.default_up_to.to_string(),
            focus: FormField::Start,
            error: None,
            pool_len,
            deck,
        }
    }

    pub fn session(&self) -> &QuizSession<S, R> {
        &self.session
    }

    /// Apply the difficulty form.
    pub fn confirm_difficulty(&mut self) -> Result<(), QuizError> {
        match self
            .session
            .configure_from_input(&self.form.start, &self.form.up_to)
        {
            Ok(_) => {
                self.form.error = None;
                self.answer.clear();
                self.previous = None;
                self.banner_ticks = 0;
                self.status = None;
                self.screen = Screen::Quiz;
                Ok(())
            }
            Err(e) => {
                tracing::debug!(error = %e, "difficulty rejected");
                self.form.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Score the answer buffer. The buffer is used verbatim.
    pub fn submit(&mut self) -> Result<(), QuizError> {
        let text = std::mem::take(&mut self.answer);
        self.submit_text(&text)
    }

    pub fn submit_text(&mut self, text: &str) -> Result<(), QuizError> {
        let outcome = match self.session.submit_answer(text) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.status = Some(e.to_string());
                return Err(e);
            }
        };
        self.status = None;
        self.previous = Some(Feedback {
            matched: outcome.matched,
            asked: outcome.asked,
            answer: outcome.answer,
        });
        self.banner_ticks = self.settings.feedback_ticks;

        if let Some(record) = outcome.record {
            self.last_record = Some(record);
            self.screen = Screen::Summary;
        }
        Ok(())
    }

    /// Reload the deck and return to the difficulty form.
    ///
    /// Fails without touching the session while an answer window is still active.
    pub fn restart(&mut self) -> Result<(), RestartError> {
        let pool = self.loader.load()?;
        let pool_len = pool.len();
        self.session.reset(pool)?;
        self.form = Self::fresh_form(&self.settings, pool_len, self.loader.describe());
        self.answer.clear();
        self.previous = None;
        self.banner_ticks = 0;
        self.status = None;
        self.last_record = None;
        self.screen = Screen::Configure;
        Ok(())
    }

    pub fn show_history(&mut self) {
        let Some(db) = &self.history else {
            self.status = Some("history is not available".to_string());
            return;
        };
        let loaded = db
            .recent(HISTORY_LIMIT)
            .and_then(|records| db.summary().map(|summary| (records, summary)));
        match loaded {
            Ok((records, summary)) => {
                self.history_panel = Some(HistoryPanel {
                    records,
                    summary,
                    scroll_offset: 0,
                });
                self.screen = Screen::History;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read history");
                self.status = Some(e.to_string());
            }
        }
    }

    fn leave_history(&mut self) {
        self.history_panel = None;
        self.screen = match self.session.phase() {
            Phase::Complete => Screen::Summary,
            Phase::Active => Screen::Quiz,
            Phase::Unconfigured => Screen::Configure,
        };
    }

    fn scroll_history(&mut self, delta: isize) {
        if let Some(panel) = self.history_panel.as_mut() {
            let max = panel.records.len().saturating_sub(1);
            panel.scroll_offset = panel.scroll_offset.saturating_add_signed(delta).min(max);
        }
    }

    /// Returns true when the screen needs a redraw.
    pub fn on_tick(&mut self) -> bool {
        if self.banner_ticks > 0 {
            self.banner_ticks -= 1;
            return self.banner_ticks == 0;
        }
        false
    }

    /// Drop the banner now; line-oriented views show it once.
    pub fn dismiss_feedback(&mut self) {
        self.banner_ticks = 0;
    }

    pub fn banner_visible(&self) -> bool {
        self.banner_ticks > 0
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Configure => match key.code {
                KeyCode::Esc => self.should_quit = true,
                KeyCode::Enter => {
                    let _ = self.confirm_difficulty();
                }
                KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
                    self.form.toggle_focus()
                }
                KeyCode::Backspace => {
                    self.form.focused_mut().pop();
                }
                KeyCode::Char(c) => self.form.focused_mut().push(c),
                _ => {}
            },
            Screen::Quiz => match key.code {
                KeyCode::Esc => self.should_quit = true,
                KeyCode::Enter => {
                    let _ = self.submit();
                }
                KeyCode::Backspace => {
                    self.answer.pop();
                }
                KeyCode::Char(c) => self.answer.push(c),
                _ => {}
            },
            Screen::Summary => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('r') | KeyCode::Enter => self.restart_or_report(),
                KeyCode::Char('h') => self.show_history(),
                _ => {}
            },
            Screen::History => match key.code {
                KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => self.leave_history(),
                KeyCode::Up => self.scroll_history(-1),
                KeyCode::Down => self.scroll_history(1),
                KeyCode::PageUp => self.scroll_history(-10),
                KeyCode::PageDown => self.scroll_history(10),
                KeyCode::Home => self.scroll_history(isize::MIN),
                _ => {}
            },
        }
    }

    /// Line-oriented input for the plain adapter.
    pub fn handle_line(&mut self, line: &str) {
        match self.screen {
            Screen::Configure => {
                let mut parts = line.split_whitespace();
                if let Some(start) = parts.next() {
                    self.form.start = start.to_string();
                    self.form.up_to = parts.next().unwrap_or("").to_string();
                }
                let _ = self.confirm_difficulty();
            }
            Screen::Quiz => {
                let _ = self.submit_text(line);
            }
            Screen::Summary => match line.trim() {
                "q" => self.should_quit = true,
                "h" => self.show_history(),
                "r" | "" => self.restart_or_report(),
                _ => {}
            },
            Screen::History => self.leave_history(),
        }
    }

    fn restart_or_report(&mut self) {
        if let Err(e) = self.restart() {
            tracing::warn!(error = %e, "failed to restart");
            self.status = Some(e.to_string());
        }
    }

    fn prompt_panel(&self) -> PromptPanel {
        PromptPanel {
            snapshot: self.session.snapshot(),
            answer: self.answer.clone(),
            previous: self.previous.clone(),
            status: self.status.clone(),
        }
    }

    /// Push the current screen through the rendering port.
    pub fn render(&self, view: &mut dyn QuizView) -> io::Result<()> {
        match self.screen {
            Screen::Configure => view.request_configuration(&self.form),
            Screen::Quiz => {
                view.render_prompt(&self.prompt_panel())?;
                match (&self.previous, self.banner_visible()) {
                    (Some(feedback), true) => view.render_feedback(feedback),
                    _ => Ok(()),
                }
            }
            Screen::Summary => match &self.last_record {
                Some(record) => view.render_summary(&SummaryPanel {
                    record: record.clone(),
                    snapshot: self.session.snapshot(),
                    previous: self.previous.clone(),
                }),
                None => Ok(()),
            },
            Screen::History => match &self.history_panel {
                Some(panel) => view.render_history(panel),
                None => view.render_history(&HistoryPanel {
                    records: vec![],
                    summary: HistorySummary::default(),
                    scroll_offset: 0,
                }),
            },
        }
    }
}
