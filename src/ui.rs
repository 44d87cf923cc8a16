use crate::chart::{MoodChart, SERIES_LABEL};
use crate::models::{MoodScore, Sender};
use crate::notify::Phase;
use crate::state::{AppState, Modal, Section, TranscriptItem, TYPING_TEXT};
use crate::stats::Trend;
use std::fmt::Write;

const TITLE: &str = "Well Mind";
const RULE: &str = "----------------------------------------";

/// Renders the whole screen, starting at the section last scrolled to.
pub fn render(state: &AppState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {TITLE} ==  [{}]", plain_text(&state.nav_label));
    render_modals(state, &mut out);

    let start = state.scroll_target.unwrap_or(Section::Home);
    for section in Section::ALL.iter().skip_while(|section| **section != start) {
        match section {
            Section::Home => render_home(&mut out),
            Section::Mood => render_mood(state, &mut out),
            Section::Progress => render_progress(state, &mut out),
            Section::Chat => render_chat(state, &mut out),
        }
    }

    render_notifications(state, &mut out);
    out
}

/// Strips control characters so message text cannot drive the terminal.
pub fn plain_text(text: &str) -> String {
    text.chars()
        .map(|c| if c == '\n' || c == '\t' { ' ' } else { c })
        .filter(|c| !c.is_control())
        .collect()
}

fn render_modals(state: &AppState, out: &mut String) {
    for (modal, title) in [(Modal::Login, "Login"), (Modal::Register, "Create account")] {
        if state.modals.is_open(modal) {
            let _ = writeln!(out, "[{title}] (close / backdrop to dismiss)");
        }
    }
}

fn render_home(out: &mut String) {
    let _ = writeln!(out, "{RULE}\nTrack your mood and talk things through with MindBot.");
}

fn render_mood(state: &AppState, out: &mut String) {
    let _ = writeln!(out, "{RULE}\nHow are you feeling today?");
    let buttons: Vec<String> = MoodScore::all()
        .map(|score| {
            if state.is_selected(score) {
                format!("[*{score} {}]", score.glyph())
            } else {
                format!("[ {score} {}]", score.glyph())
            }
        })
        .collect();
    let _ = writeln!(out, "{}", buttons.join(" "));
    if !state.forms.mood_notes.is_empty() {
        let _ = writeln!(out, "Notes: {}", plain_text(&state.forms.mood_notes));
    }
}

fn render_progress(state: &AppState, out: &mut String) {
    let _ = writeln!(out, "{RULE}\nYour mood over time");
    let scale: Vec<String> = MoodChart::y_range()
        .map(|value| format!("{value}={}", MoodChart::tick_label(value)))
        .collect();
    let _ = writeln!(out, "{SERIES_LABEL}: {}", scale.join(" "));
    let chart = &state.chart;
    if chart.is_empty() {
        let _ = writeln!(out, "(no entries yet)");
    }
    let width = chart.labels().iter().map(|l| l.len()).max().unwrap_or(0);
    for (label, score) in chart.labels().iter().zip(chart.data()) {
        let _ = writeln!(
            out,
            "{label:>width$} {} {}",
            MoodChart::tick_label(*score),
            "#".repeat(usize::from(*score) * 4)
        );
    }

    let summary = &state.summary;
    if summary.total_entries > 0 {
        let _ = write!(out, "{} entries", summary.total_entries);
        if let Some(avg) = summary.avg_mood_30_days {
            let _ = write!(out, ", 30-day average {avg:.1}");
        }
        match summary.trend() {
            Some(Trend::Improving) => out.push_str(", trending up"),
            Some(Trend::Declining) => out.push_str(", trending down"),
            Some(Trend::Steady) => out.push_str(", steady"),
            None => {}
        }
        out.push('\n');
    }
}

fn render_chat(state: &AppState, out: &mut String) {
    let _ = writeln!(out, "{RULE}\nChat with MindBot");
    for item in state.transcript.items() {
        match item {
            TranscriptItem::Message {
                sender: Sender::User,
                text,
            } => {
                let _ = writeln!(out, "you> {}", plain_text(text));
            }
            TranscriptItem::Message {
                sender: Sender::Bot,
                text,
            } => {
                let _ = writeln!(out, "bot> {}", plain_text(text));
            }
            TranscriptItem::Typing => {
                let _ = writeln!(out, "bot> {TYPING_TEXT}");
            }
        }
    }
}

fn render_notifications(state: &AppState, out: &mut String) {
    for notification in state.notifications.iter() {
        let marker = match notification.phase {
            Phase::Entering => ">>",
            Phase::Visible => "**",
            Phase::Leaving => "<<",
        };
        let _ = writeln!(
            out,
            "{marker} {}: {}",
            notification.severity.tag(),
            plain_text(&notification.message)
        );
    }
}
