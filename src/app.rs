use crate::errors::ApiError;
use crate::handlers;
use crate::models::{
    ChatRequest, ChatResponse, LoginRequest, LoginResponse, MoodEntry, MoodRequest, MoodScore,
    RegisterRequest, User, UserId,
};
use crate::notify::Stage;
use crate::state::{AppState, Field, Modal};
use std::time::Duration;

/// Everything that can happen to the client: user input, backend responses
/// and timers.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    PageLoaded,
    DemoFallbackDue,
    NavButtonClicked,
    GetStartedClicked,
    ShowModal(Modal),
    CloseClicked(Modal),
    BackdropClicked(Modal),
    SwitchToRegister,
    SwitchToLogin,
    AnchorClicked(String),
    FieldEdited(Field, String),
    LoginSubmitted,
    RegisterSubmitted,
    MoodSelected(MoodScore),
    SaveMoodClicked,
    ChatSubmitted,
    LoginFinished(Result<LoginResponse, ApiError>),
    RegisterFinished(Result<(), ApiError>),
    MoodSaved(Result<(), ApiError>),
    HistoryLoaded {
        generation: u64,
        result: Result<Vec<MoodEntry>, ApiError>,
    },
    ChatReplied {
        generation: u64,
        result: Result<ChatResponse, ApiError>,
    },
    Notification { id: u64, stage: Stage },
}

impl Msg {
    /// Whether the rendered view should be refreshed after this message.
    pub fn redraws(&self) -> bool {
        !matches!(
            self,
            Msg::Notification {
                stage: Stage::SlideIn,
                ..
            }
        )
    }

    /// Whether this message carries the answer to a backend request.
    pub fn is_response(&self) -> bool {
        matches!(
            self,
            Msg::LoginFinished(_)
                | Msg::RegisterFinished(_)
                | Msg::MoodSaved(_)
                | Msg::HistoryLoaded { .. }
                | Msg::ChatReplied { .. }
        )
    }
}

/// Side effects requested by `update`, executed by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Login(LoginRequest),
    Register(RegisterRequest),
    SaveMood(MoodRequest),
    FetchHistory { user_id: UserId, generation: u64 },
    Chat { request: ChatRequest, generation: u64 },
    PersistSession(Option<User>),
    Schedule { after: Duration, msg: Msg },
}

pub fn update(state: &mut AppState, msg: Msg) -> Vec<Command> {
    let mut commands = Vec::new();
    let cmds = &mut commands;

    match msg {
        Msg::PageLoaded => handlers::page_loaded(state, cmds),
        Msg::DemoFallbackDue => handlers::demo_fallback(state),
        Msg::NavButtonClicked => handlers::nav_button(state, cmds),
        Msg::GetStartedClicked => handlers::show_modal(state, Modal::Register),
        Msg::ShowModal(modal) => handlers::show_modal(state, modal),
        Msg::CloseClicked(modal) | Msg::BackdropClicked(modal) => {
            handlers::hide_modal(state, modal)
        }
        Msg::SwitchToRegister => handlers::switch_modal(state, Modal::Login, Modal::Register),
        Msg::SwitchToLogin => handlers::switch_modal(state, Modal::Register, Modal::Login),
        Msg::AnchorClicked(anchor) => handlers::scroll_to(state, &anchor),
        Msg::FieldEdited(field, value) => *state.forms.field_mut(field) = value,
        Msg::LoginSubmitted => handlers::submit_login(state, cmds),
        Msg::RegisterSubmitted => handlers::submit_register(state, cmds),
        Msg::MoodSelected(score) => handlers::select_mood(state, score),
        Msg::SaveMoodClicked => handlers::save_mood(state, cmds),
        Msg::ChatSubmitted => handlers::send_chat(state, cmds),
        Msg::LoginFinished(result) => handlers::login_finished(state, cmds, result),
        Msg::RegisterFinished(result) => handlers::register_finished(state, cmds, result),
        Msg::MoodSaved(result) => handlers::mood_saved(state, cmds, result),
        Msg::HistoryLoaded { generation, result } => {
            handlers::history_loaded(state, generation, result)
        }
        Msg::ChatReplied { generation, result } => {
            handlers::chat_replied(state, generation, result)
        }
        Msg::Notification { id, stage } => handlers::notification_stage(state, cmds, id, stage),
    }

    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::{BUSY, CHAT_REJECTED, CHAT_UNREACHABLE, LOGIN_REQUIRED, SELECT_MOOD_FIRST};
    use crate::models::{Sender, MoodScore};
    use crate::notify::{total_lifetime, Severity};
    use crate::state::{Section, TranscriptItem};

    fn score(value: u8) -> MoodScore {
        MoodScore::new(value).unwrap()
    }

    fn entry(value: u8, timestamp: &str) -> MoodEntry {
        MoodEntry {
            mood_score: score(value),
            notes: None,
            timestamp: timestamp.to_string(),
        }
    }

    fn history_fetches(commands: &[Command]) -> Vec<(UserId, u64)> {
        commands
            .iter()
            .filter_map(|command| match command {
                Command::FetchHistory {
                    user_id,
                    generation,
                } => Some((*user_id, *generation)),
                _ => None,
            })
            .collect()
    }

    fn requests(commands: &[Command]) -> usize {
        commands
            .iter()
            .filter(|command| {
                !matches!(
                    command,
                    Command::Schedule { .. } | Command::PersistSession(_)
                )
            })
            .count()
    }

    fn last_notice(state: &AppState) -> Option<(String, Severity)> {
        state
            .notifications
            .last()
            .map(|n| (n.message.clone(), n.severity))
    }

    #[test]
    fn selecting_a_mood_marks_exactly_one() {
        let mut state = AppState::new(Some(1), None);
        for value in 1..=5 {
            update(&mut state, Msg::MoodSelected(score(value)));
            let selected: Vec<u8> = MoodScore::all()
                .filter(|s| state.is_selected(*s))
                .map(MoodScore::value)
                .collect();
            assert_eq!(selected, vec![value]);
        }
    }

    #[test]
    fn save_without_selection_issues_no_request() {
        let mut state = AppState::new(Some(1), None);
        let commands = update(&mut state, Msg::SaveMoodClicked);
        assert_eq!(requests(&commands), 0);
        assert_eq!(
            last_notice(&state),
            Some((SELECT_MOOD_FIRST.to_string(), Severity::Error))
        );
    }

    #[test]
    fn save_sends_score_notes_and_demo_user() {
        let mut state = AppState::new(Some(1), None);
        update(&mut state, Msg::MoodSelected(score(4)));
        update(&mut state, Msg::FieldEdited(Field::MoodNotes, "slept well".into()));
        let commands = update(&mut state, Msg::SaveMoodClicked);
        assert_eq!(
            commands,
            vec![Command::SaveMood(MoodRequest {
                mood_score: score(4),
                notes: "slept well".into(),
                user_id: 1,
            })]
        );
    }

    #[test]
    fn successful_save_clears_form_and_refetches_once() {
        let mut state = AppState::new(Some(1), None);
        update(&mut state, Msg::MoodSelected(score(2)));
        update(&mut state, Msg::FieldEdited(Field::MoodNotes, "tired".into()));
        update(&mut state, Msg::SaveMoodClicked);

        let commands = update(&mut state, Msg::MoodSaved(Ok(())));
        assert_eq!(state.forms.mood_notes, "");
        assert_eq!(state.selected_mood, None);
        assert_eq!(history_fetches(&commands), vec![(1, 1)]);
        assert_eq!(
            last_notice(&state),
            Some(("Mood entry saved!".to_string(), Severity::Success))
        );
    }

    #[test]
    fn failed_save_keeps_selection_and_shows_server_message() {
        let mut state = AppState::new(Some(1), None);
        update(&mut state, Msg::MoodSelected(score(2)));
        update(&mut state, Msg::SaveMoodClicked);
        let commands = update(
            &mut state,
            Msg::MoodSaved(Err(ApiError::rejected(
                400,
                Some("Valid mood score (1-5) is required".into()),
            ))),
        );
        assert!(history_fetches(&commands).is_empty());
        assert_eq!(state.selected_mood, Some(score(2)));
        assert_eq!(
            last_notice(&state),
            Some((
                "Valid mood score (1-5) is required".to_string(),
                Severity::Error
            ))
        );
    }

    #[test]
    fn duplicate_save_is_rejected_while_in_flight() {
        let mut state = AppState::new(Some(1), None);
        update(&mut state, Msg::MoodSelected(score(3)));
        assert_eq!(requests(&update(&mut state, Msg::SaveMoodClicked)), 1);
        assert_eq!(requests(&update(&mut state, Msg::SaveMoodClicked)), 0);
        assert_eq!(
            last_notice(&state),
            Some((BUSY.to_string(), Severity::Warning))
        );
    }

    #[test]
    fn anonymous_without_demo_user_cannot_save_or_chat() {
        let mut state = AppState::new(None, None);
        update(&mut state, Msg::MoodSelected(score(3)));
        assert_eq!(requests(&update(&mut state, Msg::SaveMoodClicked)), 0);
        assert_eq!(
            last_notice(&state),
            Some((LOGIN_REQUIRED.to_string(), Severity::Error))
        );

        update(&mut state, Msg::FieldEdited(Field::ChatInput, "hello".into()));
        assert_eq!(requests(&update(&mut state, Msg::ChatSubmitted)), 0);
        assert!(state.transcript.is_empty());
        assert!(update(&mut state, Msg::PageLoaded)
            .iter()
            .all(|command| matches!(command, Command::Schedule { .. })));
    }

    #[test]
    fn blank_chat_message_is_ignored() {
        let mut state = AppState::new(Some(1), None);
        update(&mut state, Msg::FieldEdited(Field::ChatInput, "   \t".into()));
        let commands = update(&mut state, Msg::ChatSubmitted);
        assert!(commands.is_empty());
        assert!(state.transcript.is_empty());
    }

    #[test]
    fn chat_appends_message_then_placeholder_then_reply() {
        let mut state = AppState::new(Some(1), None);
        update(&mut state, Msg::FieldEdited(Field::ChatInput, "  hi there ".into()));
        let commands = update(&mut state, Msg::ChatSubmitted);

        assert_eq!(
            commands,
            vec![Command::Chat {
                request: ChatRequest {
                    message: "hi there".into(),
                    user_id: 1,
                },
                generation: 1,
            }]
        );
        assert_eq!(state.forms.chat_input, "");
        assert_eq!(
            state.transcript.items(),
            [
                TranscriptItem::Message {
                    sender: Sender::User,
                    text: "hi there".into()
                },
                TranscriptItem::Typing,
            ]
        );

        update(
            &mut state,
            Msg::ChatReplied {
                generation: 1,
                result: Ok(ChatResponse {
                    response: "How are you feeling?".into(),
                }),
            },
        );
        assert_eq!(
            state.transcript.items(),
            [
                TranscriptItem::Message {
                    sender: Sender::User,
                    text: "hi there".into()
                },
                TranscriptItem::Message {
                    sender: Sender::Bot,
                    text: "How are you feeling?".into()
                },
            ]
        );
    }

    #[test]
    fn chat_failures_replace_placeholder_with_fixed_text() {
        for (error, expected) in [
            (ApiError::transport("connection refused"), CHAT_UNREACHABLE),
            (ApiError::rejected(500, Some("boom".into())), CHAT_REJECTED),
        ] {
            let mut state = AppState::new(Some(1), None);
            update(&mut state, Msg::FieldEdited(Field::ChatInput, "hello".into()));
            update(&mut state, Msg::ChatSubmitted);
            update(
                &mut state,
                Msg::ChatReplied {
                    generation: 1,
                    result: Err(error),
                },
            );

            assert_eq!(state.transcript.len(), 2);
            assert_eq!(
                state.transcript.items()[1],
                TranscriptItem::Message {
                    sender: Sender::Bot,
                    text: expected.into()
                }
            );
            assert!(!state.in_flight.chat);
        }
    }

    #[test]
    fn new_chat_send_supersedes_pending_reply() {
        let mut state = AppState::new(Some(1), None);
        update(&mut state, Msg::FieldEdited(Field::ChatInput, "first".into()));
        update(&mut state, Msg::ChatSubmitted);
        update(&mut state, Msg::FieldEdited(Field::ChatInput, "second".into()));
        let commands = update(&mut state, Msg::ChatSubmitted);
        assert_eq!(requests(&commands), 1);
        assert_eq!(state.chat_generation, 2);

        let typing = state
            .transcript
            .items()
            .iter()
            .filter(|item| **item == TranscriptItem::Typing)
            .count();
        assert_eq!(typing, 1);

        update(
            &mut state,
            Msg::ChatReplied {
                generation: 1,
                result: Ok(ChatResponse {
                    response: "late".into(),
                }),
            },
        );
        assert!(state.in_flight.chat);
        assert_eq!(state.transcript.len(), 3);

        update(
            &mut state,
            Msg::ChatReplied {
                generation: 2,
                result: Ok(ChatResponse {
                    response: "on time".into(),
                }),
            },
        );
        assert!(!state.in_flight.chat);
        assert_eq!(
            state.transcript.items(),
            [
                TranscriptItem::Message {
                    sender: Sender::User,
                    text: "first".into()
                },
                TranscriptItem::Message {
                    sender: Sender::User,
                    text: "second".into()
                },
                TranscriptItem::Message {
                    sender: Sender::Bot,
                    text: "on time".into()
                },
            ]
        );
    }

    #[test]
    fn login_success_sets_session_and_nav() {
        let mut state = AppState::new(Some(1), None);
        update(&mut state, Msg::NavButtonClicked);
        assert!(state.modals.login);

        update(&mut state, Msg::LoginSubmitted);
        let user = User {
            id: 7,
            username: "ana".into(),
            email: None,
        };
        let commands = update(
            &mut state,
            Msg::LoginFinished(Ok(LoginResponse { user: user.clone() })),
        );

        assert_eq!(state.session, Some(user.clone()));
        assert!(state.nav_label.contains("ana"));
        assert!(!state.modals.login);
        assert!(commands.contains(&Command::PersistSession(Some(user))));
        assert_eq!(history_fetches(&commands), vec![(7, 1)]);
        assert_eq!(
            last_notice(&state),
            Some(("Welcome back!".to_string(), Severity::Success))
        );
    }

    #[test]
    fn login_failure_leaves_session_untouched() {
        let mut state = AppState::new(Some(1), None);
        update(&mut state, Msg::LoginSubmitted);
        update(&mut state, Msg::LoginFinished(Err(ApiError::rejected(401, None))));
        assert_eq!(state.session, None);
        assert_eq!(
            last_notice(&state),
            Some(("Login failed".to_string(), Severity::Error))
        );

        update(&mut state, Msg::LoginSubmitted);
        update(
            &mut state,
            Msg::LoginFinished(Err(ApiError::transport("timed out"))),
        );
        assert_eq!(
            last_notice(&state),
            Some((crate::errors::CONNECTION_ERROR.to_string(), Severity::Error))
        );
    }

    #[test]
    fn nav_button_logs_out_when_logged_in() {
        let user = User {
            id: 7,
            username: "ana".into(),
            email: None,
        };
        let mut state = AppState::new(Some(1), Some(user));
        let commands = update(&mut state, Msg::NavButtonClicked);
        assert_eq!(state.session, None);
        assert_eq!(state.nav_label, "Login");
        assert!(!state.modals.login);
        assert!(commands.contains(&Command::PersistSession(None)));
    }

    #[test]
    fn logout_drops_pending_history_and_clears_chart() {
        let mut state = AppState::new(None, None);
        let user = User {
            id: 7,
            username: "ana".into(),
            email: None,
        };
        let commands = update(&mut state, Msg::LoginFinished(Ok(LoginResponse { user })));
        let fetches = history_fetches(&commands);
        assert_eq!(fetches, vec![(7, 1)]);
        let generation = fetches[0].1;

        update(&mut state, Msg::NavButtonClicked);
        update(
            &mut state,
            Msg::HistoryLoaded {
                generation,
                result: Ok(vec![entry(2, "2026-02-01T10:00:00")]),
            },
        );
        assert_eq!(state.session, None);
        assert!(state.chart.is_empty());
        assert_eq!(state.summary.total_entries, 0);
    }

    #[test]
    fn logout_clears_previously_loaded_series() {
        let user = User {
            id: 7,
            username: "ana".into(),
            email: None,
        };
        let mut state = AppState::new(Some(1), Some(user));
        state.chart.replace_series(&[entry(4, "2026-02-01T10:00:00")]);
        update(&mut state, Msg::NavButtonClicked);
        assert!(state.chart.is_empty());
    }

    #[test]
    fn register_success_swaps_to_login() {
        let mut state = AppState::new(Some(1), None);
        update(&mut state, Msg::GetStartedClicked);
        update(&mut state, Msg::FieldEdited(Field::RegisterUsername, "ana".into()));
        let commands = update(&mut state, Msg::RegisterSubmitted);
        assert_eq!(
            commands,
            vec![Command::Register(RegisterRequest {
                username: "ana".into(),
                email: String::new(),
                password: String::new(),
            })]
        );

        update(&mut state, Msg::RegisterFinished(Ok(())));
        assert!(!state.modals.register);
        assert!(state.modals.login);
    }

    #[test]
    fn modal_controls() {
        let mut state = AppState::new(Some(1), None);
        update(&mut state, Msg::ShowModal(Modal::Login));
        update(&mut state, Msg::SwitchToRegister);
        assert!(!state.modals.login && state.modals.register);
        update(&mut state, Msg::SwitchToLogin);
        assert!(state.modals.login && !state.modals.register);
        update(&mut state, Msg::BackdropClicked(Modal::Login));
        assert!(!state.modals.login);
        update(&mut state, Msg::ShowModal(Modal::Register));
        update(&mut state, Msg::CloseClicked(Modal::Register));
        assert!(!state.modals.register);
    }

    #[test]
    fn anchors_scroll_only_to_known_sections() {
        let mut state = AppState::new(Some(1), None);
        update(&mut state, Msg::AnchorClicked("#progress".into()));
        assert_eq!(state.scroll_target, Some(Section::Progress));
        update(&mut state, Msg::AnchorClicked("#missing".into()));
        assert_eq!(state.scroll_target, Some(Section::Progress));
    }

    #[test]
    fn history_replaces_series_and_drops_stale_responses() {
        let user = User {
            id: 7,
            username: "ana".into(),
            email: None,
        };
        let mut state = AppState::new(Some(1), Some(user));
        let first = history_fetches(&update(&mut state, Msg::PageLoaded));
        update(&mut state, Msg::MoodSelected(score(3)));
        update(&mut state, Msg::SaveMoodClicked);
        let second = history_fetches(&update(&mut state, Msg::MoodSaved(Ok(()))));
        assert_eq!(first, vec![(7, 1)]);
        assert_eq!(second, vec![(7, 2)]);

        update(
            &mut state,
            Msg::HistoryLoaded {
                generation: 2,
                result: Ok(vec![
                    entry(3, "2026-02-01T10:00:00"),
                    entry(5, "2026-02-02T10:00:00"),
                ]),
            },
        );
        update(
            &mut state,
            Msg::HistoryLoaded {
                generation: 1,
                result: Ok(vec![]),
            },
        );
        assert_eq!(state.chart.labels(), ["2/1/2026", "2/2/2026"]);
        assert_eq!(state.chart.data(), [3, 5]);
        assert_eq!(state.summary.total_entries, 2);

        update(
            &mut state,
            Msg::HistoryLoaded {
                generation: 2,
                result: Err(ApiError::transport("reset")),
            },
        );
        assert_eq!(state.chart.data(), [3, 5]);
    }

    #[test]
    fn demo_data_only_fills_an_empty_chart() {
        let mut state = AppState::new(Some(1), None);
        let commands = update(&mut state, Msg::PageLoaded);
        assert_eq!(
            commands,
            vec![Command::Schedule {
                after: crate::handlers::DEMO_FALLBACK_AFTER,
                msg: Msg::DemoFallbackDue,
            }]
        );
        update(&mut state, Msg::DemoFallbackDue);
        assert_eq!(state.chart.data(), [3, 4, 2, 5, 4, 3, 4]);

        let mut loaded = AppState::new(Some(1), None);
        loaded.chart.replace_series(&[entry(1, "2026-02-01T10:00:00")]);
        update(&mut loaded, Msg::DemoFallbackDue);
        assert_eq!(loaded.chart.data(), [1]);
    }

    #[test]
    fn notification_timers_detach_after_lifetime() {
        let mut state = AppState::new(Some(1), None);
        let commands = update(&mut state, Msg::SaveMoodClicked);
        let id = state.notifications.last().map(|n| n.id).unwrap();

        let mut pending: Vec<(Duration, Msg)> = commands
            .into_iter()
            .filter_map(|command| match command {
                Command::Schedule { after, msg } => Some((after, msg)),
                _ => None,
            })
            .collect();
        assert_eq!(pending.len(), 2);

        let mut elapsed = Duration::ZERO;
        while !pending.is_empty() {
            pending.sort_by_key(|(after, _)| *after);
            let (after, msg) = pending.remove(0);
            elapsed = after;
            assert!(state.notifications.get(id).is_some());
            for command in update(&mut state, msg) {
                if let Command::Schedule { after: delay, msg } = command {
                    pending.push((elapsed + delay, msg));
                }
            }
        }
        assert_eq!(elapsed, total_lifetime());
        assert!(state.notifications.get(id).is_none());
    }
}
