use crate::models::{MoodEntry, MoodScore, MOOD_GLYPHS};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use std::ops::RangeInclusive;

pub const INVALID_DATE: &str = "Invalid Date";
pub const SERIES_LABEL: &str = "Mood Score";

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const DEMO_SCORES: [u8; 7] = [3, 4, 2, 5, 4, 3, 4];

/// Line chart of mood scores over time. Labels and data always have the same
/// length and are only ever replaced as a whole.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoodChart {
    labels: Vec<String>,
    data: Vec<u8>,
    dates: Vec<Option<NaiveDate>>,
}

impl MoodChart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn y_range() -> RangeInclusive<u8> {
        MoodScore::MIN..=MoodScore::MAX
    }

    pub fn tick_label(value: u8) -> String {
        match MOOD_GLYPHS.get(value as usize) {
            Some(glyph) if !glyph.is_empty() => glyph.to_string(),
            _ => value.to_string(),
        }
    }

    /// Replaces both series with `entries`, in the order given.
    pub fn replace_series(&mut self, entries: &[MoodEntry]) {
        self.dates = entries
            .iter()
            .map(|entry| parse_local_date(&entry.timestamp))
            .collect();
        self.labels = self.dates.iter().map(|date| format_label(*date)).collect();
        self.data = entries.iter().map(|entry| entry.mood_score.value()).collect();
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Local calendar date of each point, `None` where the timestamp did not
    /// parse.
    pub fn dates(&self) -> &[Option<NaiveDate>] {
        &self.dates
    }
}

/// Local calendar date of a backend timestamp.
pub fn parse_local_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Local).date_naive());
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
        return Some(parsed.with_timezone(&Local).date_naive());
    }
    // Timestamps without an offset are already local.
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|parsed| parsed.date())
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
}

pub fn format_label(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => format!("{}/{}/{}", date.month(), date.day(), date.year()),
        None => INVALID_DATE.to_string(),
    }
}

/// A week of canned entries ending at `now`, one per day.
pub fn demo_entries(now: DateTime<Utc>) -> Vec<MoodEntry> {
    let last = DEMO_SCORES.len() as i64 - 1;
    DEMO_SCORES
        .iter()
        .enumerate()
        .filter_map(|(index, score)| {
            let timestamp = now - Duration::days(last - index as i64);
            Some(MoodEntry {
                mood_score: MoodScore::new(*score)?,
                notes: None,
                timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            })
        })
        .collect()
}
