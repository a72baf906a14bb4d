use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use crate::error::RecordError;

/// Accuracy summary emitted once when a session completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub timestamp: DateTime<Local>,
    pub difficulty_label: String,
    pub accuracy_percent: u32,
    pub mistakes: u32,
    pub total_words: u32,
}

/// `round(words_total / total_asked * 100)`; `None` when nothing was asked.
pub fn accuracy_percent(words_total: u32, total_asked: u32) -> Option<u32> {
    if total_asked == 0 {
        return None;
    }
    Some(((words_total as f64 / total_asked as f64) * 100.0).round() as u32)
}

/// Append-only destination for completed-session records.
pub trait RecordSink {
    fn append(&mut self, record: &SessionRecord) -> Result<(), RecordError>;
}

/// Discards records.
impl RecordSink for () {
    fn append(&mut self, _record: &SessionRecord) -> Result<(), RecordError> {
        Ok(())
    }
}

/// Keeps records in memory.
impl RecordSink for Vec<SessionRecord> {
    fn append(&mut self, record: &SessionRecord) -> Result<(), RecordError> {
        self.push(record.clone());
        Ok(())
    }
}

/// Fans one record out to every configured sink.
///
/// Every sink is attempted; the first failure is returned.
#[derive(Default)]
pub struct RecordSinks {
    sinks: Vec<Box<dyn RecordSink>>,
}

impl RecordSinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl RecordSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl RecordSink for RecordSinks {
    fn append(&mut self, record: &SessionRecord) -> Result<(), RecordError> {
        let mut first_err = None;
        for sink in self.sinks.iter_mut() {
            if let Err(e) = sink.append(record) {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Difficulty")]
    difficulty: &'a str,
    #[serde(rename = "Success %")]
    success: u32,
    #[serde(rename = "Mistakes")]
    mistakes: u32,
    #[serde(rename = "Total words")]
    total_words: u32,
}

/// Appends records to a csv file, emitting the header only for a new file.
#[derive(Debug, Clone)]
pub struct CsvRecordLog {
    path: PathBuf,
}

impl CsvRecordLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSink for CsvRecordLog {
    fn append(&mut self, record: &SessionRecord) -> Result<(), RecordError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let needs_header = std::fs::metadata(&self.path)
            .map(|m| m.len() == 0)
            .unwrap_or(true);

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;

        let mut wtr = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);

        wtr.serialize(CsvRow {
            date: record.timestamp.format("%Y.%m.%d").to_string(),
            difficulty: &record.difficulty_label,
            success: record.accuracy_percent,
            mistakes: record.mistakes,
            total_words: record.total_words,
        })?;
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(label: &str, accuracy: u32) -> SessionRecord {
        SessionRecord {
            timestamp: Local::now(),
            difficulty_label: label.to_string(),
            accuracy_percent: accuracy,
            mistakes: 2,
            total_words: 3,
        }
    }

    struct FailingSink;

    impl RecordSink for FailingSink {
        fn append(&mut self, _record: &SessionRecord) -> Result<(), RecordError> {
            Err(RecordError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )))
        }
    }

    #[test]
    fn test_accuracy_percent() {
        assert_eq!(accuracy_percent(3, 3), Some(100));
        assert_eq!(accuracy_percent(3, 5), Some(60));
        assert_eq!(accuracy_percent(2, 3), Some(67));
        assert_eq!(accuracy_percent(1, 3), Some(33));
    }

    #[test]
    fn test_accuracy_percent_nothing_asked() {
        assert_eq!(accuracy_percent(3, 0), None);
    }

    #[test]
    fn test_vec_sink_keeps_records() {
        let mut sink: Vec<SessionRecord> = Vec::new();
        RecordSink::append(&mut sink, &record("10", 90)).unwrap();
        RecordSink::append(&mut sink, &record("20", 80)).unwrap();
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[1].difficulty_label, "20");
    }

    #[test]
    fn test_csv_log_writes_header_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("user_data.csv");
        let mut log = CsvRecordLog::new(&path);

        log.append(&record("10", 100)).unwrap();
        log.append(&record("25", 71)).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Date,Difficulty,Success %,Mistakes,Total words");
        assert!(lines[1].ends_with(",10,100,2,3"));
        assert!(lines[2].ends_with(",25,71,2,3"));
        assert_eq!(lines.iter().filter(|l| l.starts_with("Date")).count(), 1);
    }

    #[test]
    fn test_csv_log_date_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("user_data.csv");
        let mut log = CsvRecordLog::new(&path);
        let rec = record("10", 100);
        log.append(&rec).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let expected = rec.timestamp.format("%Y.%m.%d").to_string();
        assert!(contents.lines().nth(1).unwrap().starts_with(&expected));
    }

    #[test]
    fn test_fan_out_reaches_every_sink() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.csv");
        let mut sinks = RecordSinks::new()
            .with(FailingSink)
            .with(CsvRecordLog::new(&path));
        assert_eq!(sinks.len(), 2);

        let result = sinks.append(&record("10", 100));
        assert!(result.is_err());
        assert!(path.exists());
    }

    #[test]
    fn test_empty_fan_out_is_ok() {
        let mut sinks = RecordSinks::new();
        assert!(sinks.is_empty());
        sinks.append(&record("10", 100)).unwrap();
    }
}
