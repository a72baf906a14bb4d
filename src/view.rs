use std::io::{self, Write};

use itertools::Itertools;

use crate::history::HistorySummary;
use crate::quiz::QuizSnapshot;
use crate::record::SessionRecord;
use crate::word::WordEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum FormField {
    #[strum(to_string = "start from")]
    Start,
    #[strum(to_string = "up to")]
    UpTo,
}

/// The "select difficulty" form.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigForm {
    pub start: String,
    pub up_to: String,
    pub focus: FormField,
    pub error: Option<String>,
    pub pool_len: usize,
    pub deck: String,
}

impl ConfigForm {
    pub fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::Start => &mut self.start,
            FormField::UpTo => &mut self.up_to,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            FormField::Start => FormField::UpTo,
            FormField::UpTo => FormField::Start,
        };
    }
}

/// What happened to the last answer; drives the banner and the previous-word panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub matched: bool,
    pub asked: WordEntry,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PromptPanel {
    pub snapshot: QuizSnapshot,
    pub answer: String,
    pub previous: Option<Feedback>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryPanel {
    pub record: SessionRecord,
    pub snapshot: QuizSnapshot,
    pub previous: Option<Feedback>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPanel {
    pub records: Vec<SessionRecord>,
    pub summary: HistorySummary,
    pub scroll_offset: usize,
}

/// Rendering port. One adapter per target toolkit; the controller never
/// asks which one it is talking to.
pub trait QuizView {
    fn request_configuration(&mut self, form: &ConfigForm) -> io::Result<()>;
    fn render_prompt(&mut self, panel: &PromptPanel) -> io::Result<()>;
    /// Transient cue for the answer just scored.
    fn render_feedback(&mut self, feedback: &Feedback) -> io::Result<()>;
    fn render_summary(&mut self, panel: &SummaryPanel) -> io::Result<()>;
    fn render_history(&mut self, panel: &HistoryPanel) -> io::Result<()>;
}

pub fn summary_message(record: &SessionRecord) -> String {
    format!(
        "You have learned {} words with {}% accuracy. Congratulations!",
        record.total_words, record.accuracy_percent
    )
}

pub fn history_line(record: &SessionRecord) -> String {
    format!(
        "{}  difficulty {:>4}  {:>3}%  {:>3} mistakes  {:>4} words",
        record.timestamp.format("%Y.%m.%d %H:%M"),
        record.difficulty_label,
        record.accuracy_percent,
        record.mistakes,
        record.total_words
    )
}

pub fn summary_line(summary: &HistorySummary) -> String {
    let mean = summary
        .mean_accuracy
        .map_or("-".to_string(), |m| format!("{m:.1}%"));
    format!(
        "{} sessions, mean accuracy {}, {} words, {} mistakes",
        summary.sessions, mean, summary.total_words, summary.total_mistakes
    )
}

/// Line-oriented adapter over any writer.
pub struct PlainView<W: Write> {
    out: W,
}

impl<W: Write> PlainView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> QuizView for PlainView<W> {
    fn request_configuration(&mut self, form: &ConfigForm) -> io::Result<()> {
        if let Some(err) = &form.error {
            writeln!(self.out, "! {err}")?;
        }
        writeln!(
            self.out,
            "Select difficulty from {} ({} words). Enter \"<start from> <up to>\" [{} {}]:",
            form.deck, form.pool_len, form.start, form.up_to
        )?;
        self.out.flush()
    }

    fn render_prompt(&mut self, panel: &PromptPanel) -> io::Result<()> {
        if let Some(status) = &panel.status {
            writeln!(self.out, "! {status}")?;
        }
        if let Some(word) = &panel.snapshot.current_word {
            writeln!(
                self.out,
                "[{} to go | asked {} | correct {} | wrong {}] {}",
                panel.snapshot.words_to_go(),
                panel.snapshot.total_asked,
                panel.snapshot.correct_count,
                panel.snapshot.incorrect_count,
                word.english_prompt
            )?;
        }
        self.out.flush()
    }

    fn render_feedback(&mut self, feedback: &Feedback) -> io::Result<()> {
        if feedback.matched {
            writeln!(self.out, "Correct")?;
        } else {
            writeln!(
                self.out,
                "Wrong: {} is {}",
                feedback.asked.english_prompt,
                feedback.asked.answer_display()
            )?;
        }
        Ok(())
    }

    fn render_summary(&mut self, panel: &SummaryPanel) -> io::Result<()> {
        if let Some(feedback) = &panel.previous {
            self.render_feedback(feedback)?;
        }
        writeln!(self.out, "Congratulations")?;
        writeln!(self.out, "{}", summary_message(&panel.record))?;
        writeln!(
            self.out,
            "Total questions: {}, correct: {}, mistakes: {}",
            panel.snapshot.total_asked, panel.snapshot.correct_count, panel.record.mistakes
        )?;
        writeln!(self.out, "Type r to reset, h for history, q to quit.")?;
        self.out.flush()
    }

    fn render_history(&mut self, panel: &HistoryPanel) -> io::Result<()> {
        if panel.records.is_empty() {
            writeln!(self.out, "No finished sessions yet.")?;
        } else {
            let body = panel.records.iter().map(history_line).join("\n");
            writeln!(self.out, "{body}")?;
        }
        writeln!(self.out, "{}", summary_line(&panel.summary))?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::Phase;
    use chrono::Local;

    fn snapshot() -> QuizSnapshot {
        QuizSnapshot {
            phase: Phase::Active,
            current_word: Some(WordEntry::new("water", "水", "みず")),
            current_index: Some(0),
            range_start: 0,
            range_end: 2,
            words_remaining: 2,
            words_total: 3,
            total_asked: 0,
            correct_count: 0,
            incorrect_count: 0,
            is_complete: false,
            pool_len: 10,
        }
    }

    fn record() -> SessionRecord {
        SessionRecord {
            timestamp: Local::now(),
            difficulty_label: "10".into(),
            accuracy_percent: 83,
            mistakes: 2,
            total_words: 10,
        }
    }

    fn output(view: PlainView<Vec<u8>>) -> String {
        String::from_utf8(view.into_inner()).unwrap()
    }

    #[test]
    fn test_form_focus_toggles() {
        let mut form = ConfigForm {
            start: "0".into(),
            up_to: "10".into(),
            focus: FormField::Start,
            error: None,
            pool_len: 40,
            deck: "japanese".into(),
        };
        form.focused_mut().push('5');
        form.toggle_focus();
        form.focused_mut().pop();
        assert_eq!(form.start, "05");
        assert_eq!(form.up_to, "1");
        assert_eq!(form.focus.to_string(), "up to");
    }

    #[test]
    fn test_plain_prompt() {
        let mut view = PlainView::new(Vec::new());
        view.render_prompt(&PromptPanel {
            snapshot: snapshot(),
            answer: String::new(),
            previous: None,
            status: None,
        })
        .unwrap();
        assert_eq!(
            output(view),
            "[3 to go | asked 0 | correct 0 | wrong 0] water\n"
        );
    }

    #[test]
    fn test_plain_feedback_shows_answer_on_miss() {
        let mut view = PlainView::new(Vec::new());
        view.render_feedback(&Feedback {
            matched: false,
            asked: WordEntry::new("water", "水", "みず"),
            answer: "ひ".into(),
        })
        .unwrap();
        assert_eq!(output(view), "Wrong: water is 水 [みず]\n");
    }

    #[test]
    fn test_plain_summary() {
        let mut view = PlainView::new(Vec::new());
        view.render_summary(&SummaryPanel {
            record: record(),
            snapshot: snapshot(),
            previous: None,
        })
        .unwrap();
        let out = output(view);
        assert!(out.contains("You have learned 10 words with 83% accuracy"));
    }

    #[test]
    fn test_plain_history_empty() {
        let mut view = PlainView::new(Vec::new());
        view.render_history(&HistoryPanel {
            records: vec![],
            summary: HistorySummary::default(),
            scroll_offset: 0,
        })
        .unwrap();
        let out = output(view);
        assert!(out.starts_with("No finished sessions yet."));
        assert!(out.contains("0 sessions, mean accuracy -"));
    }

    #[test]
    fn test_history_line() {
        let line = history_line(&record());
        assert!(line.contains("difficulty   10"));
        assert!(line.contains(" 83%"));
    }
}
