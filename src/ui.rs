pub mod charting;
pub mod history;

use std::io;

use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use unicode_width::UnicodeWidthStr;

use crate::view::{
    summary_message, ConfigForm, Feedback, FormField, HistoryPanel, PromptPanel, QuizView,
    SummaryPanel,
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

#[derive(Debug, Clone)]
enum Content {
    Configure(ConfigForm),
    Prompt(PromptPanel),
    Summary(SummaryPanel),
    History(HistoryPanel),
}

/// ratatui adapter for the rendering port.
///
/// Each screen-level call replaces what is on screen and drops any banner;
/// `render_feedback` overlays the banner on the current screen.
pub struct TuiView<B: Backend> {
    terminal: Terminal<B>,
    content: Option<Content>,
    banner: Option<Feedback>,
}

impl<B: Backend> TuiView<B> {
    pub fn new(terminal: Terminal<B>) -> Self {
        Self {
            terminal,
            content: None,
            banner: None,
        }
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }

    /// Draw again from the retained content, e.g. after a resize.
    pub fn redraw(&mut self) -> io::Result<()> {
        let content = self.content.as_ref();
        let banner = self.banner.as_ref();
        self.terminal.draw(|f| match content {
            Some(Content::Configure(form)) => draw_configure(f, form),
            Some(Content::Prompt(panel)) => draw_prompt(f, panel, banner),
            Some(Content::Summary(panel)) => draw_summary(f, panel),
            Some(Content::History(panel)) => history::draw_history(f, panel),
            None => {}
        })?;
        Ok(())
    }

    fn show(&mut self, content: Content) -> io::Result<()> {
        self.content = Some(content);
        self.banner = None;
        self.redraw()
    }
}

impl<B: Backend> QuizView for TuiView<B> {
    fn request_configuration(&mut self, form: &ConfigForm) -> io::Result<()> {
        self.show(Content::Configure(form.clone()))
    }

    fn render_prompt(&mut self, panel: &PromptPanel) -> io::Result<()> {
        self.show(Content::Prompt(panel.clone()))
    }

    fn render_feedback(&mut self, feedback: &Feedback) -> io::Result<()> {
        self.banner = Some(feedback.clone());
        self.redraw()
    }

    fn render_summary(&mut self, panel: &SummaryPanel) -> io::Result<()> {
        self.show(Content::Summary(panel.clone()))
    }

    fn render_history(&mut self, panel: &HistoryPanel) -> io::Result<()> {
        self.show(Content::History(panel.clone()))
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

fn centered(text: impl Into<String>, style: Style) -> Paragraph<'static> {
    Paragraph::new(Span::styled(text.into(), style))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
}

fn draw_configure(f: &mut Frame, form: &ConfigForm) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(2), // description
            Constraint::Min(3),    // title
            Constraint::Length(3), // fields
            Constraint::Length(2), // error
            Constraint::Length(1), // legend
        ])
        .split(f.area());

    f.render_widget(
        centered(
            format!("{} - {} words", form.deck, form.pool_len),
            dim(),
        ),
        chunks[0],
    );
    f.render_widget(
        centered("Select Difficulty", bold().fg(Color::White)),
        chunks[1],
    );

    let fields = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);

    for (field, value, area) in [
        (FormField::Start, &form.start, fields[0]),
        (FormField::UpTo, &form.up_to, fields[1]),
    ] {
        let focused = form.focus == field;
        let border = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            dim()
        };
        let input = Paragraph::new(value.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(field.to_string()),
        );
        f.render_widget(input, area);
        if focused {
            f.set_cursor_position((area.x + 1 + value.width() as u16, area.y + 1));
        }
    }

    if let Some(err) = &form.error {
        f.render_widget(centered(err.clone(), Style::default().fg(Color::Red)), chunks[3]);
    }

    f.render_widget(
        centered(
            "(enter) confirm / (tab) switch field / (esc) quit",
            dim().add_modifier(Modifier::ITALIC),
        ),
        chunks[4],
    );
}

fn draw_prompt(f: &mut Frame, panel: &PromptPanel, banner: Option<&Feedback>) {
    let snapshot = &panel.snapshot;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(2), // description
            Constraint::Min(3),    // prompt
            Constraint::Length(1), // banner
            Constraint::Length(3), // answer input
            Constraint::Length(5), // previous word + counters
            Constraint::Length(1), // status
        ])
        .split(f.area());

    f.render_widget(
        centered("Write word in Japanese:", Style::default().fg(Color::Yellow)),
        chunks[0],
    );

    let prompt = snapshot
        .current_word
        .as_ref()
        .map_or("", |w| w.english_prompt.as_str());
    f.render_widget(centered(prompt, bold().fg(Color::White)), vertical_center(chunks[1]));

    if let Some(feedback) = banner {
        let (text, color) = if feedback.matched {
            ("Correct", Color::Green)
        } else {
            ("Wrong", Color::Red)
        };
        f.render_widget(centered(text, bold().fg(color)), chunks[2]);
    }

    let input = Paragraph::new(panel.answer.as_str())
        .block(Block::default().borders(Borders::ALL).border_style(dim()));
    f.render_widget(input, chunks[3]);
    f.set_cursor_position((
        chunks[3].x + 1 + panel.answer.width() as u16,
        chunks[3].y + 1,
    ));

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[4]);

    f.render_widget(previous_word_panel(panel.previous.as_ref()), bottom[0]);

    let counters = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("Total questions: {}", snapshot.total_asked),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(Span::styled(
            format!("Correct answers: {}", snapshot.correct_count),
            Style::default().fg(Color::Green),
        )),
        Line::from(Span::styled(
            format!("Incorrect answers: {}", snapshot.incorrect_count),
            Style::default().fg(Color::Red),
        )),
    ])
    .block(Block::default().borders(Borders::ALL).border_style(dim()));
    f.render_widget(counters, bottom[1]);

    let status = match &panel.status {
        Some(s) => Span::styled(s.clone(), Style::default().fg(Color::Red)),
        None => Span::styled(
            format!(
                "Words remaining: {}   window {}..={}",
                snapshot.words_to_go(),
                snapshot.range_start,
                snapshot.range_end
            ),
            dim(),
        ),
    };
    f.render_widget(Paragraph::new(status).alignment(Alignment::Right), chunks[5]);
}

fn previous_word_panel(previous: Option<&Feedback>) -> Paragraph<'static> {
    let lines = match previous {
        Some(fb) => vec![
            Line::from(format!("Previous word: {}", fb.asked.english_prompt)),
            Line::from(format!("Correct answer: {}", fb.asked.answer_display())),
            Line::from(Span::styled(
                format!("Input answer: {}", fb.answer),
                Style::default().fg(if fb.matched { Color::Green } else { Color::Red }),
            )),
        ],
        None => vec![
            Line::from("Previous word: -"),
            Line::from("Correct answer: -"),
            Line::from("Input answer: -"),
        ],
    };
    Paragraph::new(lines).block(Block::default().borders(Borders::ALL).border_style(dim()))
}

fn draw_summary(f: &mut Frame, panel: &SummaryPanel) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(3),    // title
            Constraint::Length(2), // message
            Constraint::Length(5), // previous word
            Constraint::Length(1), // padding
            Constraint::Length(1), // legend
        ])
        .split(f.area());

    f.render_widget(
        centered("Congratulations", bold().fg(Color::Green)),
        vertical_center(chunks[0]),
    );
    f.render_widget(centered(summary_message(&panel.record), bold()), chunks[1]);
    f.render_widget(previous_word_panel(panel.previous.as_ref()), chunks[2]);

    let legend = Paragraph::new(Line::from(vec![
        Span::styled("(r)eset", bold().fg(Color::Cyan)),
        Span::styled(" / ", dim()),
        Span::styled("(h)istory", bold().fg(Color::Cyan)),
        Span::styled(" / ", dim()),
        Span::styled("(esc)", bold().fg(Color::Cyan)),
        Span::styled(" quit", dim()),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(legend, chunks[4]);
}

fn vertical_center(area: Rect) -> Rect {
    let pad = area.height.saturating_sub(1) / 2;
    Rect {
        y: area.y + pad,
        height: area.height - pad,
        ..area
    }
}
