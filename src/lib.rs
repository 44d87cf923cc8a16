pub mod api;
pub mod app;
pub mod chart;
pub mod config;
pub mod console;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod notify;
pub mod runtime;
pub mod stats;
pub mod storage;
pub mod ui;
pub mod state;

pub use api::{HttpApi, MoodApi};
pub use app::{update, Command, Msg};
pub use config::ClientConfig;
pub use runtime::Runtime;
pub use state::AppState;
pub use storage::{load_session, persist_session};
