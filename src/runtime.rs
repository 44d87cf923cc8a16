use crate::api::MoodApi;
use crate::app::{update, Command, Msg};
use crate::models::User;
use crate::state::AppState;
use crate::storage::persist_session;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::error;

/// Owns the state, applies messages one at a time and runs the commands they
/// produce as background tasks that report back through a channel.
pub struct Runtime<A> {
    api: Arc<A>,
    state: AppState,
    tx: UnboundedSender<Msg>,
    rx: UnboundedReceiver<Msg>,
    persist_tx: UnboundedSender<Option<User>>,
    writer: JoinHandle<()>,
    /// Requests started whose response has not been applied yet.
    outstanding: usize,
}

impl<A: MoodApi + 'static> Runtime<A> {
    /// Must be called within a tokio runtime: starts the session writer.
    pub fn new(api: Arc<A>, session_path: PathBuf, state: AppState) -> Self {
        let (tx, rx) = unbounded_channel();
        let (persist_tx, persist_rx) = unbounded_channel();
        let writer = tokio::spawn(write_sessions(session_path, persist_rx));
        Self {
            api,
            state,
            tx,
            rx,
            persist_tx,
            writer,
            outstanding: 0,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Whether any backend request is still waiting for its response.
    pub fn has_outstanding(&self) -> bool {
        self.outstanding > 0
    }

    /// Applies `msg` and starts its commands.
    pub fn dispatch(&mut self, msg: Msg) {
        if msg.is_response() {
            self.outstanding = self.outstanding.saturating_sub(1);
        }
        for command in update(&mut self.state, msg) {
            self.execute(command);
        }
    }

    /// Waits for the next message produced by a finished task or timer.
    pub async fn next(&mut self) -> Option<Msg> {
        self.rx.recv().await
    }

    /// Waits for one message and applies it.
    pub async fn pump(&mut self) -> bool {
        match self.next().await {
            Some(msg) => {
                self.dispatch(msg);
                true
            }
            None => false,
        }
    }

    /// Waits until every queued session write has reached the file.
    pub async fn close(self) {
        let Self {
            persist_tx, writer, ..
        } = self;
        drop(persist_tx);
        if let Err(err) = writer.await {
            error!("session writer stopped: {err}");
        }
    }

    fn execute(&mut self, command: Command) {
        let tx = self.tx.clone();
        let api = Arc::clone(&self.api);

        match command {
            Command::Login(request) => {
                self.outstanding += 1;
                tokio::spawn(async move {
                    let _ = tx.send(Msg::LoginFinished(api.login(&request).await));
                });
            }
            Command::Register(request) => {
                self.outstanding += 1;
                tokio::spawn(async move {
                    let _ = tx.send(Msg::RegisterFinished(api.register(&request).await));
                });
            }
            Command::SaveMood(request) => {
                self.outstanding += 1;
                tokio::spawn(async move {
                    let _ = tx.send(Msg::MoodSaved(api.save_mood(&request).await));
                });
            }
            Command::FetchHistory {
                user_id,
                generation,
            } => {
                self.outstanding += 1;
                tokio::spawn(async move {
                    let result = api.mood_history(user_id).await;
                    let _ = tx.send(Msg::HistoryLoaded { generation, result });
                });
            }
            Command::Chat {
                request,
                generation,
            } => {
                self.outstanding += 1;
                tokio::spawn(async move {
                    let result = api.chat(&request).await;
                    let _ = tx.send(Msg::ChatReplied { generation, result });
                });
            }
            Command::PersistSession(user) => {
                if self.persist_tx.send(user).is_err() {
                    error!("session writer is gone, session not saved");
                }
            }
            Command::Schedule { after, msg } => {
                tokio::spawn(async move {
                    tokio::time::sleep(after).await;
                    let _ = tx.send(msg);
                });
            }
        }
    }
}

/// Applies session writes one after another, in the order they were queued.
async fn write_sessions(path: PathBuf, mut rx: UnboundedReceiver<Option<User>>) {
    while let Some(user) = rx.recv().await {
        if let Err(err) = persist_session(&path, user.as_ref()).await {
            error!("failed to persist session: {err}");
        }
    }
}
