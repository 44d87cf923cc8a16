use crate::chart::MoodChart;
use chrono::{Duration, Local, NaiveDate};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoodSummary {
    pub total_entries: usize,
    pub avg_mood_30_days: Option<f64>,
    pub last_week: Option<f64>,
    pub previous_week: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Improving,
    Declining,
    Steady,
}

impl MoodSummary {
    pub fn trend(&self) -> Option<Trend> {
        let (last, previous) = (self.last_week?, self.previous_week?);
        Some(if last > previous {
            Trend::Improving
        } else if last < previous {
            Trend::Declining
        } else {
            Trend::Steady
        })
    }
}

pub fn build_summary(chart: &MoodChart) -> MoodSummary {
    build_summary_at(Local::now().date_naive(), chart)
}

/// Averages over the 30 days, 7 days and the 7 days before that, counting
/// back from `today` inclusive. Points without a date only count towards the
/// total.
pub fn build_summary_at(today: NaiveDate, chart: &MoodChart) -> MoodSummary {
    let points: Vec<(NaiveDate, u8)> = chart
        .dates()
        .iter()
        .zip(chart.data())
        .filter_map(|(date, score)| date.map(|date| (date, *score)))
        .collect();

    let window = |from_days: i64, to_days: i64| {
        let start = today - Duration::days(from_days - 1);
        let end = today - Duration::days(to_days);
        average(
            points
                .iter()
                .filter(|(date, _)| *date >= start && *date <= end)
                .map(|(_, score)| *score),
        )
    };

    MoodSummary {
        total_entries: chart.data().len(),
        avg_mood_30_days: window(30, 0),
        last_week: window(7, 0),
        previous_week: window(14, 7),
    }
}

fn average(scores: impl Iterator<Item = u8>) -> Option<f64> {
    let (sum, count) = scores.fold((0u32, 0u32), |(sum, count), score| {
        (sum + u32::from(score), count + 1)
    });
    if count == 0 {
        return None;
    }
    Some(round_one(f64::from(sum) / f64::from(count)))
}

fn round_one(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
