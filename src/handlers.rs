use crate::app::{Command, Msg};
use crate::chart::demo_entries;
use crate::errors::ApiError;
use crate::models::{
    ChatRequest, ChatResponse, LoginRequest, LoginResponse, MoodEntry, MoodRequest, MoodScore,
    RegisterRequest, Sender,
};
use crate::notify::{Severity, Stage, DETACH_AFTER, SLIDE_IN_AFTER, SLIDE_OUT_AFTER};
use crate::state::{AppState, Modal, Section};
use crate::stats::build_summary;
use chrono::Utc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub const DEMO_FALLBACK_AFTER: Duration = Duration::from_secs(1);

pub const BUSY: &str = "Please wait for the current request to finish";
pub const LOGIN_REQUIRED: &str = "Please log in first";
pub const SELECT_MOOD_FIRST: &str = "Please select a mood first";
pub const CHAT_REJECTED: &str = "Sorry, I encountered an error. Please try again.";
pub const CHAT_UNREACHABLE: &str = "Connection error. Please check your internet connection.";

pub fn page_loaded(state: &mut AppState, cmds: &mut Vec<Command>) {
    if state.session.is_some() {
        request_history(state, cmds);
    }
    cmds.push(Command::Schedule {
        after: DEMO_FALLBACK_AFTER,
        msg: Msg::DemoFallbackDue,
    });
}

pub fn demo_fallback(state: &mut AppState) {
    if !state.chart.is_empty() {
        return;
    }
    debug!("no mood history loaded, showing demo data");
    state.chart.replace_series(&demo_entries(Utc::now()));
    state.summary = build_summary(&state.chart);
}

pub fn show_modal(state: &mut AppState, modal: Modal) {
    state.modals.set(modal, true);
}

pub fn hide_modal(state: &mut AppState, modal: Modal) {
    state.modals.set(modal, false);
}

pub fn switch_modal(state: &mut AppState, from: Modal, to: Modal) {
    hide_modal(state, from);
    show_modal(state, to);
}

pub fn scroll_to(state: &mut AppState, anchor: &str) {
    if let Some(section) = Section::from_anchor(anchor) {
        state.scroll_target = Some(section);
    }
}

pub fn nav_button(state: &mut AppState, cmds: &mut Vec<Command>) {
    if state.session.is_some() {
        logout(state, cmds);
    } else {
        show_modal(state, Modal::Login);
    }
}

/// Clears the session and the previous user's mood series. Bumping the
/// history generation drops any fetch still running for that user.
pub fn logout(state: &mut AppState, cmds: &mut Vec<Command>) {
    state.set_session(None);
    state.history_generation += 1;
    state.chart.replace_series(&[]);
    state.summary = build_summary(&state.chart);
    cmds.push(Command::PersistSession(None));
    notify(state, cmds, "Logged out successfully", Severity::Success);
}

pub fn submit_login(state: &mut AppState, cmds: &mut Vec<Command>) {
    if state.in_flight.login {
        notify(state, cmds, BUSY, Severity::Warning);
        return;
    }
    state.in_flight.login = true;
    cmds.push(Command::Login(LoginRequest {
        email: state.forms.login_email.clone(),
        password: state.forms.login_password.clone(),
    }));
}

pub fn login_finished(
    state: &mut AppState,
    cmds: &mut Vec<Command>,
    result: Result<LoginResponse, ApiError>,
) {
    state.in_flight.login = false;
    match result {
        Ok(LoginResponse { user }) => {
            info!(user_id = user.id, "logged in");
            state.set_session(Some(user.clone()));
            cmds.push(Command::PersistSession(Some(user)));
            hide_modal(state, Modal::Login);
            request_history(state, cmds);
            notify(state, cmds, "Welcome back!", Severity::Success);
        }
        Err(err) => report_failure(state, cmds, "login", &err, "Login failed"),
    }
}

pub fn submit_register(state: &mut AppState, cmds: &mut Vec<Command>) {
    if state.in_flight.register {
        notify(state, cmds, BUSY, Severity::Warning);
        return;
    }
    state.in_flight.register = true;
    cmds.push(Command::Register(RegisterRequest {
        username: state.forms.register_username.clone(),
        email: state.forms.register_email.clone(),
        password: state.forms.register_password.clone(),
    }));
}

pub fn register_finished(
    state: &mut AppState,
    cmds: &mut Vec<Command>,
    result: Result<(), ApiError>,
) {
    state.in_flight.register = false;
    match result {
        Ok(()) => {
            hide_modal(state, Modal::Register);
            notify(
                state,
                cmds,
                "Account created successfully! Please login.",
                Severity::Success,
            );
            show_modal(state, Modal::Login);
        }
        Err(err) => report_failure(state, cmds, "registration", &err, "Registration failed"),
    }
}

pub fn select_mood(state: &mut AppState, score: MoodScore) {
    state.selected_mood = Some(score);
}

pub fn save_mood(state: &mut AppState, cmds: &mut Vec<Command>) {
    let Some(mood_score) = state.selected_mood else {
        notify(state, cmds, SELECT_MOOD_FIRST, Severity::Error);
        return;
    };
    if state.in_flight.save_mood {
        notify(state, cmds, BUSY, Severity::Warning);
        return;
    }
    let Some(user_id) = state.acting_user() else {
        notify(state, cmds, LOGIN_REQUIRED, Severity::Error);
        return;
    };

    state.in_flight.save_mood = true;
    cmds.push(Command::SaveMood(MoodRequest {
        mood_score,
        notes: state.forms.mood_notes.clone(),
        user_id,
    }));
}

pub fn mood_saved(state: &mut AppState, cmds: &mut Vec<Command>, result: Result<(), ApiError>) {
    state.in_flight.save_mood = false;
    match result {
        Ok(()) => {
            notify(state, cmds, "Mood entry saved!", Severity::Success);
            state.forms.mood_notes.clear();
            state.selected_mood = None;
            request_history(state, cmds);
        }
        Err(err) => report_failure(state, cmds, "mood save", &err, "Failed to save mood"),
    }
}

/// Starts a history fetch that supersedes any fetch still running.
pub fn request_history(state: &mut AppState, cmds: &mut Vec<Command>) {
    let Some(user_id) = state.acting_user() else {
        debug!("no user to load mood history for");
        return;
    };
    state.history_generation += 1;
    cmds.push(Command::FetchHistory {
        user_id,
        generation: state.history_generation,
    });
}

pub fn history_loaded(
    state: &mut AppState,
    generation: u64,
    result: Result<Vec<MoodEntry>, ApiError>,
) {
    if generation != state.history_generation {
        debug!(generation, latest = state.history_generation, "dropping stale mood history");
        return;
    }
    match result {
        Ok(entries) => {
            state.chart.replace_series(&entries);
            state.summary = build_summary(&state.chart);
        }
        Err(err) => error!("error loading mood data: {err}"),
    }
}

pub fn send_chat(state: &mut AppState, cmds: &mut Vec<Command>) {
    let message = state.forms.chat_input.trim().to_string();
    if message.is_empty() {
        return;
    }
    let Some(user_id) = state.acting_user() else {
        notify(state, cmds, LOGIN_REQUIRED, Severity::Error);
        return;
    };

    // A new send supersedes a reply that never came.
    if state.in_flight.chat {
        debug!(generation = state.chat_generation, "superseding pending chat reply");
        state.transcript.remove_typing();
    }

    state.transcript.push_message(Sender::User, message.clone());
    state.forms.chat_input.clear();
    state.transcript.push_typing();
    state.in_flight.chat = true;
    state.chat_generation += 1;
    cmds.push(Command::Chat {
        request: ChatRequest { message, user_id },
        generation: state.chat_generation,
    });
}

pub fn chat_replied(
    state: &mut AppState,
    generation: u64,
    result: Result<ChatResponse, ApiError>,
) {
    if generation != state.chat_generation {
        debug!(generation, latest = state.chat_generation, "dropping superseded chat reply");
        return;
    }
    state.in_flight.chat = false;
    state.transcript.remove_typing();
    let reply = match result {
        Ok(ChatResponse { response }) => response,
        Err(ApiError::Rejected { status, .. }) => {
            warn!(status, "chat request rejected");
            CHAT_REJECTED.to_string()
        }
        Err(err) => {
            error!("chat error: {err}");
            CHAT_UNREACHABLE.to_string()
        }
    };
    state.transcript.push_message(Sender::Bot, reply);
}

/// Shows a notification and schedules its slide-in and slide-out.
pub fn notify(
    state: &mut AppState,
    cmds: &mut Vec<Command>,
    message: impl Into<String>,
    severity: Severity,
) {
    let id = state.notifications.push(message, severity);
    cmds.push(Command::Schedule {
        after: SLIDE_IN_AFTER,
        msg: Msg::Notification {
            id,
            stage: Stage::SlideIn,
        },
    });
    cmds.push(Command::Schedule {
        after: SLIDE_OUT_AFTER,
        msg: Msg::Notification {
            id,
            stage: Stage::SlideOut,
        },
    });
}

pub fn notification_stage(state: &mut AppState, cmds: &mut Vec<Command>, id: u64, stage: Stage) {
    if !state.notifications.advance(id, stage) {
        return;
    }
    if stage == Stage::SlideOut {
        cmds.push(Command::Schedule {
            after: DETACH_AFTER,
            msg: Msg::Notification {
                id,
                stage: Stage::Detach,
            },
        });
    }
}

fn report_failure(
    state: &mut AppState,
    cmds: &mut Vec<Command>,
    action: &str,
    err: &ApiError,
    fallback: &str,
) {
    if err.is_transport() {
        error!("{action} error: {err}");
    } else {
        warn!("{action} failed: {err}");
    }
    notify(state, cmds, err.user_message(fallback), Severity::Error);
}
