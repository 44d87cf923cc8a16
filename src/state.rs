use crate::chart::MoodChart;
use crate::models::{Identity, MoodScore, Sender, User, UserId};
use crate::notify::Notifications;
use crate::stats::MoodSummary;

pub const LOGIN_LABEL: &str = "Login";
pub const TYPING_TEXT: &str = "MindBot is typing...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    Login,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    LoginEmail,
    LoginPassword,
    RegisterUsername,
    RegisterEmail,
    RegisterPassword,
    MoodNotes,
    ChatInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Home,
    Mood,
    Progress,
    Chat,
}

impl Section {
    pub const ALL: [Section; 4] = [Self::Home, Self::Mood, Self::Progress, Self::Chat];

    /// Resolves an in-page anchor such as `#chat`.
    pub fn from_anchor(anchor: &str) -> Option<Self> {
        match anchor.strip_prefix('#')? {
            "home" => Some(Self::Home),
            "mood" => Some(Self::Mood),
            "progress" => Some(Self::Progress),
            "chat" => Some(Self::Chat),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Forms {
    pub login_email: String,
    pub login_password: String,
    pub register_username: String,
    pub register_email: String,
    pub register_password: String,
    pub mood_notes: String,
    pub chat_input: String,
}

impl Forms {
    pub fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::LoginEmail => &mut self.login_email,
            Field::LoginPassword => &mut self.login_password,
            Field::RegisterUsername => &mut self.register_username,
            Field::RegisterEmail => &mut self.register_email,
            Field::RegisterPassword => &mut self.register_password,
            Field::MoodNotes => &mut self.mood_notes,
            Field::ChatInput => &mut self.chat_input,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modals {
    pub login: bool,
    pub register: bool,
}

impl Modals {
    pub fn set(&mut self, modal: Modal, open: bool) {
        match modal {
            Modal::Login => self.login = open,
            Modal::Register => self.register = open,
        }
    }

    pub fn is_open(&self, modal: Modal) -> bool {
        match modal {
            Modal::Login => self.login,
            Modal::Register => self.register,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptItem {
    Message { sender: Sender, text: String },
    Typing,
}

/// Chat transcript in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    items: Vec<TranscriptItem>,
}

impl Transcript {
    pub fn push_message(&mut self, sender: Sender, text: impl Into<String>) {
        self.items.push(TranscriptItem::Message {
            sender,
            text: text.into(),
        });
    }

    pub fn push_typing(&mut self) {
        self.items.push(TranscriptItem::Typing);
    }

    /// Removes the first typing placeholder, if any.
    pub fn remove_typing(&mut self) -> bool {
        match self
            .items
            .iter()
            .position(|item| *item == TranscriptItem::Typing)
        {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn items(&self) -> &[TranscriptItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Requests awaiting a response. Login, register and mood save allow one at a
/// time; a new chat send supersedes a pending one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InFlight {
    pub login: bool,
    pub register: bool,
    pub save_mood: bool,
    pub chat: bool,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub demo_user: Option<UserId>,
    pub session: Option<User>,
    pub selected_mood: Option<MoodScore>,
    pub forms: Forms,
    pub modals: Modals,
    pub nav_label: String,
    pub chart: MoodChart,
    pub summary: MoodSummary,
    pub transcript: Transcript,
    pub notifications: Notifications,
    pub scroll_target: Option<Section>,
    pub in_flight: InFlight,
    /// Generation of the latest history request; older responses are stale.
    pub history_generation: u64,
    /// Generation of the latest chat send; replies to older sends are dropped.
    pub chat_generation: u64,
}

impl AppState {
    pub fn new(demo_user: Option<UserId>, session: Option<User>) -> Self {
        let mut state = Self {
            demo_user,
            session: None,
            selected_mood: None,
            forms: Forms::default(),
            modals: Modals::default(),
            nav_label: LOGIN_LABEL.to_string(),
            chart: MoodChart::new(),
            summary: MoodSummary::default(),
            transcript: Transcript::default(),
            notifications: Notifications::default(),
            scroll_target: None,
            in_flight: InFlight::default(),
            history_generation: 0,
            chat_generation: 0,
        };
        state.set_session(session);
        state
    }

    pub fn set_session(&mut self, session: Option<User>) {
        self.nav_label = match &session {
            Some(user) => format!("Hi, {}", user.username),
            None => LOGIN_LABEL.to_string(),
        };
        self.session = session;
    }

    pub fn identity(&self) -> Identity {
        match &self.session {
            Some(user) => Identity::Authenticated(user.id),
            None => Identity::Anonymous,
        }
    }

    /// The user id requests act as, if there is one.
    pub fn acting_user(&self) -> Option<UserId> {
        match self.identity() {
            Identity::Authenticated(id) => Some(id),
            Identity::Anonymous => self.demo_user,
        }
    }

    pub fn is_selected(&self, score: MoodScore) -> bool {
        self.selected_mood == Some(score)
    }
}
