use ratatui::style::Color;

use crate::record::SessionRecord;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// One finished session placed on the progress chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressPoint {
    /// Days since the oldest plotted session.
    pub days: f64,
    pub difficulty: f64,
    pub accuracy: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum AccuracyBand {
    #[strum(to_string = ">=90%")]
    High,
    #[strum(to_string = "70-89%")]
    Mid,
    #[strum(to_string = "<70%")]
    Low,
}

impl AccuracyBand {
    pub const ALL: [Self; 3] = [Self::High, Self::Mid, Self::Low];

    pub fn of(accuracy: u32) -> Self {
        if accuracy >= 90 {
            AccuracyBand::High
        } else if accuracy >= 70 {
            AccuracyBand::Mid
        } else {
            AccuracyBand::Low
        }
    }

    pub fn color(self) -> Color {
        match self {
            AccuracyBand::High => Color::Green,
            AccuracyBand::Mid => Color::Yellow,
            AccuracyBand::Low => Color::Red,
        }
    }
}

/// Oldest first. Sessions whose difficulty label is not a number are skipped.
pub fn progress_points(records: &[SessionRecord]) -> Vec<ProgressPoint> {
    let Some(oldest) = records.iter().map(|r| r.timestamp).min() else {
        return vec![];
    };

    let mut points: Vec<ProgressPoint> = records
        .iter()
        .filter_map(|r| {
            let difficulty = r.difficulty_label.trim().parse::<f64>().ok()?;
            let days = (r.timestamp - oldest).num_seconds() as f64 / SECONDS_PER_DAY;
            Some(ProgressPoint {
                days,
                difficulty,
                accuracy: r.accuracy_percent,
            })
        })
        .collect();
    points.sort_by(|a, b| a.days.total_cmp(&b.days));
    points
}

/// `(x, y)` pairs for one accuracy band.
pub fn band_coords(points: &[ProgressPoint], band: AccuracyBand) -> Vec<(f64, f64)> {
    points
        .iter()
        .filter(|p| AccuracyBand::of(p.accuracy) == band)
        .map(|p| (p.days, p.difficulty))
        .collect()
}

/// X (days) and Y (difficulty) bounds. Both start at zero and span at least one unit.
pub fn compute_bounds(points: &[ProgressPoint]) -> ([f64; 2], [f64; 2]) {
    let max_days = points.iter().map(|p| p.days).fold(0.0, f64::max);
    let max_difficulty = points.iter().map(|p| p.difficulty).fold(0.0, f64::max);

    let x_max = max_days.max(1.0);
    // Headroom so the top point is not drawn on the border.
    let y_max = ((max_difficulty / 5.0).floor() + 1.0) * 5.0;
    ([0.0, x_max], [0.0, y_max])
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Local, TimeZone};

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap()
    }

    fn record(days_ago: i64, label: &str, accuracy: u32) -> SessionRecord {
        SessionRecord {
            timestamp: now() - Duration::days(days_ago),
            difficulty_label: label.to_string(),
            accuracy_percent: accuracy,
            mistakes: 0,
            total_words: 5,
        }
    }

    #[test]
    fn test_points_are_oldest_first_relative_to_oldest() {
        // Newest first, as the history store returns them.
        let records = vec![record(0, "30", 95), record(2, "20", 75), record(4, "10", 50)];
        let points = progress_points(&records);

        assert_eq!(points.len(), 3);
        assert_eq!(points[0].days, 0.0);
        assert_eq!(points[0].difficulty, 10.0);
        assert_eq!(points[1].days, 2.0);
        assert_eq!(points[2].days, 4.0);
        assert_eq!(points[2].accuracy, 95);
    }

    #[test]
    fn test_non_numeric_labels_are_skipped() {
        let records = vec![record(1, "ten", 100), record(0, " 12 ", 100)];
        let points = progress_points(&records);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].difficulty, 12.0);
    }

    #[test]
    fn test_no_records_no_points() {
        assert!(progress_points(&[]).is_empty());
    }

    #[test]
    fn test_accuracy_bands() {
        assert_eq!(AccuracyBand::of(100), AccuracyBand::High);
        assert_eq!(AccuracyBand::of(90), AccuracyBand::High);
        assert_eq!(AccuracyBand::of(89), AccuracyBand::Mid);
        assert_eq!(AccuracyBand::of(70), AccuracyBand::Mid);
        assert_eq!(AccuracyBand::of(69), AccuracyBand::Low);
        assert_eq!(AccuracyBand::High.to_string(), ">=90%");
    }

    #[test]
    fn test_band_coords_partition_points() {
        let records = vec![record(0, "30", 95), record(2, "20", 75), record(4, "10", 91)];
        let points = progress_points(&records);

        let total: usize = AccuracyBand::ALL
            .iter()
            .map(|&b| band_coords(&points, b).len())
            .sum();
        assert_eq!(total, 3);
        assert_eq!(band_coords(&points, AccuracyBand::High).len(), 2);
        assert!(band_coords(&points, AccuracyBand::Low).is_empty());
    }

    #[test]
    fn test_compute_bounds_empty() {
        let (x, y) = compute_bounds(&[]);
        assert_eq!(x, [0.0, 1.0]);
        assert_eq!(y, [0.0, 5.0]);
    }

    #[test]
    fn test_compute_bounds_headroom() {
        let points = [
            ProgressPoint {
                days: 3.5,
                difficulty: 10.0,
                accuracy: 80,
            },
            ProgressPoint {
                days: 0.0,
                difficulty: 7.0,
                accuracy: 80,
            },
        ];
        let (x, y) = compute_bounds(&points);
        assert_eq!(x, [0.0, 3.5]);
        assert_eq!(y, [0.0, 15.0]);
    }

    #[test]
    fn test_format_label() {
        assert_eq!(format_label(1.0), "1");
        assert_eq!(format_label(1.26), "1.3");
    }
}
