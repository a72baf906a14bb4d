use chrono::Local;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{QuizError, StateError, ValidationError};
use crate::record::{accuracy_percent, RecordSink, SessionRecord};
use crate::word::{WordEntry, WordPool};

/// Window a freshly constructed session starts with.
pub const INITIAL_WINDOW: (usize, usize) = (0, 10);
/// Window left behind by `reset` until the next `configure`.
pub const RESET_WINDOW: (usize, usize) = (0, 9);

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Unconfigured,
    Active,
    Complete,
}

/// Immutable view of the session handed to renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSnapshot {
    pub phase: Phase,
    pub current_word: Option<WordEntry>,
    pub current_index: Option<usize>,
    pub range_start: usize,
    pub range_end: usize,
    pub words_remaining: u32,
    pub words_total: u32,
    pub total_asked: u32,
    pub correct_count: u32,
    pub incorrect_count: u32,
    pub is_complete: bool,
    pub pool_len: usize,
}

impl QuizSnapshot {
    /// Correct answers still needed, counting the one that completes the session.
    pub fn words_to_go(&self) -> u32 {
        match self.phase {
            Phase::Active => self.words_remaining + 1,
            _ => 0,
        }
    }
}

/// Result of a single submission.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    pub matched: bool,
    pub is_complete: bool,
    /// The word that was on screen when the answer came in.
    pub asked: WordEntry,
    pub answer: String,
    pub snapshot: QuizSnapshot,
    /// Set only on the submission that completed the session.
    pub record: Option<SessionRecord>,
}

/// Vocabulary drill over a shrinking pool.
///
/// Drawing is uniform over the inclusive window `[range_start, range_end]`
/// against the pool as it is at draw time. A correct answer removes the
/// drawn entry by index; a wrong one leaves it in play.
pub struct QuizSession<S: RecordSink, R: Rng = StdRng> {
    pool: WordPool,
    range_start: usize,
    range_end: usize,
    words_remaining: u32,
    words_total: u32,
    current_index: Option<usize>,
    current_word: Option<WordEntry>,
    total_asked: u32,
    correct_count: u32,
    incorrect_count: u32,
    phase: Phase,
    difficulty_label: String,
    sink: S,
    rng: R,
}

impl<S: RecordSink> QuizSession<S, StdRng> {
    pub fn new(pool: WordPool, sink: S) -> Self {
        Self::with_rng(pool, sink, StdRng::from_entropy())
    }
}

impl<S: RecordSink, R: Rng> QuizSession<S, R> {
    pub fn with_rng(pool: WordPool, sink: S, rng: R) -> Self {
        Self {
            pool,
            range_start: INITIAL_WINDOW.0,
            range_end: INITIAL_WINDOW.1,
            words_remaining: 0,
            words_total: 0,
            current_index: None,
            current_word: None,
            total_asked: 0,
            correct_count: 0,
            incorrect_count: 0,
            phase: Phase::Unconfigured,
            difficulty_label: String::new(),
            sink,
            rng,
        }
    }

    /// Start a session over the inclusive window and draw the first word.
    pub fn configure(
        &mut self,
        range_start: usize,
        range_end: usize,
    ) -> Result<WordEntry, QuizError> {
        self.configure_labeled(range_start, range_end, None)
    }

    /// Text-form `configure`: a 0-based start and a 1-based "up to" word number.
    pub fn configure_from_input(
        &mut self,
        start_text: &str,
        up_to_text: &str,
    ) -> Result<WordEntry, QuizError> {
        if self.phase == Phase::Complete {
            return Err(StateError::AlreadyComplete.into());
        }
        let range_start = parse_field("start", start_text)?;
        let up_to = parse_field("up to", up_to_text)?;
        if up_to == 0 {
            return Err(ValidationError::ZeroUpTo.into());
        }
        let label = up_to_text.trim().to_string();
        self.configure_labeled(range_start, up_to - 1, Some(label))
    }

    fn configure_labeled(
        &mut self,
        range_start: usize,
        range_end: usize,
        label: Option<String>,
    ) -> Result<WordEntry, QuizError> {
        if self.phase == Phase::Complete {
            return Err(StateError::AlreadyComplete.into());
        }
        if range_end < range_start {
            return Err(ValidationError::Inverted {
                start: range_start,
                end: range_end,
            }
            .into());
        }
        if range_end >= self.pool.len() {
            return Err(ValidationError::OutOfRange {
                end: range_end,
                pool_len: self.pool.len(),
            }
            .into());
        }

        self.range_start = range_start;
        self.range_end = range_end;
        self.words_total = (range_end - range_start + 1) as u32;
        self.words_remaining = self.words_total - 1;
        self.total_asked = 0;
        self.correct_count = 0;
        self.incorrect_count = 0;
        // range_end < pool.len(), so the 1-based label cannot overflow.
        self.difficulty_label = label.unwrap_or_else(|| (range_end + 1).to_string());
        self.phase = Phase::Active;

        tracing::info!(
            start = range_start,
            end = range_end,
            words_total = self.words_total,
            "configured window"
        );
        self.draw_word().cloned().ok_or_else(|| StateError::NoWord.into())
    }

    /// Score `text` against the current word and advance.
    pub fn submit_answer(&mut self, text: &str) -> Result<AnswerOutcome, QuizError> {
        let asked = match (self.phase, self.current_word.as_ref()) {
            (Phase::Unconfigured, _) => return Err(StateError::NotConfigured.into()),
            (Phase::Complete, _) => return Err(StateError::AlreadyComplete.into()),
            (Phase::Active, None) => return Err(StateError::NoWord.into()),
            (Phase::Active, Some(word)) => word.clone(),
        };

        self.total_asked += 1;
        let matched = asked.accepts(text);
        if matched {
            self.correct_count += 1;
            self.consume_current_word();
        } else {
            self.incorrect_count += 1;
        }
        tracing::debug!(
            matched,
            asked = self.total_asked,
            remaining = self.words_remaining,
            "answer scored"
        );

        let record = if self.phase == Phase::Complete {
            Some(self.emit_record())
        } else {
            self.draw_word();
            None
        };

        Ok(AnswerOutcome {
            matched,
            is_complete: self.is_complete(),
            asked,
            answer: text.to_string(),
            snapshot: self.snapshot(),
            record,
        })
    }

    /// Swap in a fresh pool and go back to Unconfigured.
    pub fn reset(&mut self, fresh_pool: WordPool) -> Result<(), QuizError> {
        if self.phase == Phase::Active {
            return Err(StateError::StillActive.into());
        }
        self.pool = fresh_pool;
        self.range_start = RESET_WINDOW.0;
        self.range_end = RESET_WINDOW.1;
        self.words_remaining = 0;
        self.words_total = 0;
        self.current_index = None;
        self.current_word = None;
        self.total_asked = 0;
        self.correct_count = 0;
        self.incorrect_count = 0;
        self.difficulty_label.clear();
        self.phase = Phase::Unconfigured;
        tracing::info!(pool = self.pool.len(), "session reset");
        Ok(())
    }

    /// Leaves `current_word` empty if the pool no longer reaches the window start;
    /// `submit_answer` then refuses input instead of scoring a blank prompt.
    fn draw_word(&mut self) -> Option<&WordEntry> {
        // The window end stays fixed while the pool shrinks beneath it.
        let upper = self.range_end.min(self.pool.len().saturating_sub(1));
        if self.pool.is_empty() || self.range_start > upper {
            tracing::error!(
                start = self.range_start,
                pool = self.pool.len(),
                "window start is outside the pool"
            );
            self.current_index = None;
            self.current_word = None;
            return None;
        }
        let index = self.rng.gen_range(self.range_start..=upper);
        tracing::debug!(index, upper, "drew word");
        self.current_index = Some(index);
        self.current_word = self.pool.get(index).cloned();
        self.current_word.as_ref()
    }

    fn consume_current_word(&mut self) {
        if self.words_remaining == 0 {
            self.phase = Phase::Complete;
            return;
        }
        self.words_remaining -= 1;
        if let Some(index) = self.current_index {
            self.pool.remove(index);
        }
    }

    fn emit_record(&mut self) -> SessionRecord {
        let record = SessionRecord {
            timestamp: Local::now(),
            difficulty_label: self.difficulty_label.clone(),
            accuracy_percent: accuracy_percent(self.words_total, self.total_asked).unwrap_or(0),
            mistakes: self.incorrect_count,
            total_words: self.words_total,
        };
        tracing::info!(
            accuracy = record.accuracy_percent,
            mistakes = record.mistakes,
            total_words = record.total_words,
            "session complete"
        );
        if let Err(e) = self.sink.append(&record) {
            tracing::warn!(error = %e, "failed to persist session record");
        }
        record
    }

    pub fn snapshot(&self) -> QuizSnapshot {
        QuizSnapshot {
            phase: self.phase,
            current_word: self.current_word.clone(),
            current_index: self.current_index,
            range_start: self.range_start,
            range_end: self.range_end,
            words_remaining: self.words_remaining,
            words_total: self.words_total,
            total_asked: self.total_asked,
            correct_count: self.correct_count,
            incorrect_count: self.incorrect_count,
            is_complete: self.is_complete(),
            pool_len: self.pool.len(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    pub fn current_word(&self) -> Option<&WordEntry> {
        self.current_word.as_ref()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn window(&self) -> (usize, usize) {
        (self.range_start, self.range_end)
    }

    pub fn words_remaining(&self) -> u32 {
        self.words_remaining
    }

    pub fn words_total(&self) -> u32 {
        self.words_total
    }

    pub fn total_asked(&self) -> u32 {
        self.total_asked
    }

    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    pub fn incorrect_count(&self) -> u32 {
        self.incorrect_count
    }

    pub fn difficulty_label(&self) -> &str {
        &self.difficulty_label
    }

    pub fn pool(&self) -> &WordPool {
        &self.pool
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

fn parse_field(field: &'static str, input: &str) -> Result<usize, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Missing { field });
    }
    trimmed.parse::<usize>().map_err(|_| ValidationError::NotANumber {
        field,
        input: input.to_string(),
    })
}
