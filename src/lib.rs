// Library surface for the binary and for headless integration tests.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod deck;
pub mod error;
pub mod history;
pub mod logging;
pub mod quiz;
pub mod record;
pub mod runtime;
pub mod ui;
pub mod view;
pub mod word;

pub use error::{QuizError, StateError, ValidationError};
pub use quiz::{AnswerOutcome, Phase, QuizSession, QuizSnapshot};
pub use record::{RecordSink, SessionRecord};
pub use word::{WordEntry, WordPool};
