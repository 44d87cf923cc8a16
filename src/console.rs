use crate::app::Msg;
use crate::models::MoodScore;
use crate::state::{Field, Modal};

pub const HELP: &str = "\
commands:
  login <email> <password>          log in
  register <username> <email> <pw>  create an account
  nav                               login button (logs out when logged in)
  start                             open the registration form
  open|close|backdrop login|register
  switch login|register             swap between the two forms
  mood <1-5>                        select a mood
  notes <text>                      set mood notes
  save                              save the selected mood
  say <text>                        send a chat message
  goto home|mood|progress|chat      scroll to a section
  help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Msgs(Vec<Msg>),
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_line(line: &str) -> Input {
    let line = line.trim();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };
    let args: Vec<&str> = rest.split_whitespace().collect();

    let msgs = match (command, args.as_slice()) {
        ("", _) => vec![],
        ("help", _) => return Input::Help,
        ("quit" | "exit", _) => return Input::Quit,
        ("login", [email, password]) => vec![
            Msg::FieldEdited(Field::LoginEmail, email.to_string()),
            Msg::FieldEdited(Field::LoginPassword, password.to_string()),
            Msg::LoginSubmitted,
        ],
        ("register", [username, email, password]) => vec![
            Msg::FieldEdited(Field::RegisterUsername, username.to_string()),
            Msg::FieldEdited(Field::RegisterEmail, email.to_string()),
            Msg::FieldEdited(Field::RegisterPassword, password.to_string()),
            Msg::RegisterSubmitted,
        ],
        ("nav", []) => vec![Msg::NavButtonClicked],
        ("start", []) => vec![Msg::GetStartedClicked],
        ("open", [name]) => match parse_modal(name) {
            Some(modal) => vec![Msg::ShowModal(modal)],
            None => return unknown(line),
        },
        ("close", [name]) => match parse_modal(name) {
            Some(modal) => vec![Msg::CloseClicked(modal)],
            None => return unknown(line),
        },
        ("backdrop", [name]) => match parse_modal(name) {
            Some(modal) => vec![Msg::BackdropClicked(modal)],
            None => return unknown(line),
        },
        ("switch", ["register"]) => vec![Msg::SwitchToRegister],
        ("switch", ["login"]) => vec![Msg::SwitchToLogin],
        ("mood", [value]) => match value.parse::<u8>().ok().and_then(MoodScore::new) {
            Some(score) => vec![Msg::MoodSelected(score)],
            None => return unknown(line),
        },
        ("notes", _) => vec![Msg::FieldEdited(Field::MoodNotes, rest.to_string())],
        ("save", []) => vec![Msg::SaveMoodClicked],
        ("say", _) => vec![
            Msg::FieldEdited(Field::ChatInput, rest.to_string()),
            Msg::ChatSubmitted,
        ],
        ("goto", [section]) => vec![Msg::AnchorClicked(format!("#{section}"))],
        _ => return unknown(line),
    };

    Input::Msgs(msgs)
}

fn parse_modal(name: &str) -> Option<Modal> {
    match name {
        "login" => Some(Modal::Login),
        "register" => Some(Modal::Register),
        _ => None,
    }
}

fn unknown(line: &str) -> Input {
    Input::Unknown(line.to_string())
}
