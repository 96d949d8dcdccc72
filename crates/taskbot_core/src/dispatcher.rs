//! Routes inbound chat events to the task store and answers through a
//! [`Notifier`].

use crate::error::AppError;
use crate::model::{ChatId, MessageId, Task};
use crate::notify::Notifier;
use crate::render;
use crate::session::{Mode, SessionTracker};
use crate::task_api::TaskStore;
use crate::update::{Event, Update};

/// Texts recognised while a chat is idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Add,
    List,
    Delete,
    Help,
    Clear,
}

impl Command {
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "/start" => Some(Self::Start),
            "Add" => Some(Self::Add),
            "List" => Some(Self::List),
            "Delete" => Some(Self::Delete),
            "ℹ️Help" | "Help" | "/help" => Some(Self::Help),
            "/clear" => Some(Self::Clear),
            _ => None,
        }
    }
}

pub struct Dispatcher<N: Notifier> {
    store: TaskStore,
    sessions: SessionTracker,
    notifier: N,
}

impl<N: Notifier> Dispatcher<N> {
    pub fn new(store: TaskStore, notifier: N) -> Self {
        Self::with_sessions(store, SessionTracker::new(), notifier)
    }

    pub fn with_sessions(store: TaskStore, sessions: SessionTracker, notifier: N) -> Self {
        Self {
            store,
            sessions,
            notifier,
        }
    }

    pub fn sessions(&self) -> &SessionTracker {
        &self.sessions
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Handles one update. Failures are reported into the chat and logged;
    /// nothing is returned because the update is never retried.
    pub fn dispatch(&mut self, update: &Update) {
        let Some(event) = update.event.as_ref() else {
            tracing::debug!(sequence = update.sequence, "skipping unhandled update kind");
            return;
        };

        tracing::debug!(
            sequence = update.sequence,
            chat = event.chat(),
            "dispatching update"
        );

        match event {
            Event::Callback { id, chat, data } => self.handle_callback(id, *chat, data),
            Event::NonText { chat } => self.send_text(*chat, render::INVALID_INPUT),
            Event::Text { chat, text } => self.handle_text(*chat, text),
        }
    }

    fn handle_callback(&mut self, callback_id: &str, chat: ChatId, data: &str) {
        if let Err(err) = self.notifier.acknowledge_callback(callback_id) {
            tracing::debug!(chat, error = %err, "failed to acknowledge callback");
        }

        match render::parse_delete_payload(data) {
            Some(position) => {
                // A pending add survives a stale button press.
                if self.sessions.mode(chat) == Mode::AwaitingDeleteSelector {
                    self.sessions.reset(chat);
                }
                self.delete_and_refresh(chat, position);
            }
            None => tracing::warn!(chat, payload = data, "ignoring unknown callback payload"),
        }
    }

    fn handle_text(&mut self, chat: ChatId, text: &str) {
        let command = Command::parse(text);
        if command == Some(Command::Start) {
            self.handle_command(chat, Command::Start);
            return;
        }

        match self.sessions.mode(chat) {
            Mode::AwaitingTaskText => self.handle_task_text(chat, text),
            Mode::AwaitingDeleteSelector => self.handle_delete_selector(chat, text),
            Mode::Idle => match command {
                Some(command) => self.handle_command(chat, command),
                None => self.send_menu(chat, render::NOT_UNDERSTOOD),
            },
        }
    }

    fn handle_task_text(&mut self, chat: ChatId, text: &str) {
        self.sessions.reset(chat);

        match self.store.add_task(chat, text) {
            Ok(_) => self.send_list(chat, Some(render::TASK_ADDED)),
            Err(err) => self.report_error(chat, &err),
        }
    }

    fn handle_delete_selector(&mut self, chat: ChatId, text: &str) {
        let position = match text.trim().parse::<i64>() {
            Ok(position) => position,
            Err(_) => {
                let err = AppError::parse(render::INVALID_NUMBER);
                self.send_text(chat, err.user_message());
                return;
            }
        };

        self.sessions.reset(chat);
        self.delete_and_refresh(chat, position);
    }

    fn handle_command(&mut self, chat: ChatId, command: Command) {
        match command {
            Command::Start => {
                self.sessions.reset(chat);
                self.send_menu(chat, render::WELCOME);
            }
            Command::Add => {
                self.sessions.set_mode(chat, Mode::AwaitingTaskText);
                self.send_text(chat, render::ASK_TASK_TEXT);
            }
            Command::List => self.send_list(chat, None),
            Command::Delete => match self.store.list_tasks(chat) {
                Ok(tasks) if tasks.is_empty() => self.send_menu(chat, render::EMPTY_LIST_NOTICE),
                Ok(tasks) => {
                    self.sessions.set_mode(chat, Mode::AwaitingDeleteSelector);
                    self.send_deletion_menu(chat, &tasks);
                }
                Err(err) => self.report_error(chat, &err),
            },
            Command::Help => self.send_menu(chat, render::HELP),
            Command::Clear => match self.store.clear_tasks(chat) {
                Ok(removed) => {
                    self.retract_trail(chat);
                    self.send_menu(chat, &render::cleared(removed));
                }
                Err(err) => self.report_error(chat, &err),
            },
        }
    }

    fn delete_and_refresh(&mut self, chat: ChatId, position: i64) {
        match self.store.delete_task(chat, position) {
            Ok(_) => {
                self.retract_trail(chat);
                self.send_list(chat, Some(render::TASK_DELETED));
            }
            Err(err) => self.report_error(chat, &err),
        }
    }

    /// Sends the current list with the main menu, optionally headed by a
    /// confirmation line.
    fn send_list(&mut self, chat: ChatId, heading: Option<&str>) {
        let tasks = match self.store.list_tasks(chat) {
            Ok(tasks) => tasks,
            Err(err) => {
                self.report_error(chat, &err);
                return;
            }
        };

        let body = render::task_list(&tasks);
        let text = match heading {
            Some(heading) => format!("{heading}\n\n{body}"),
            None => body,
        };
        self.send_menu(chat, &text);
    }

    fn report_error(&mut self, chat: ChatId, err: &AppError) {
        if err.is_user_correctable() {
            tracing::info!(chat, error = %err, "rejected user input");
        } else {
            tracing::error!(chat, error = %err, "request failed");
        }
        self.send_menu(chat, err.user_message());
    }

    fn retract_trail(&mut self, chat: ChatId) {
        let trail = self.sessions.take_trail(chat);
        if trail.is_empty() {
            return;
        }

        if let Err(err) = self.notifier.retract_messages(chat, &trail) {
            tracing::warn!(chat, count = trail.len(), error = %err, "failed to retract messages");
        }
    }

    fn send_text(&mut self, chat: ChatId, text: &str) {
        let sent = self.notifier.send_text(chat, text);
        self.record(chat, sent);
    }

    fn send_menu(&mut self, chat: ChatId, text: &str) {
        let sent = self.notifier.send_menu(chat, text);
        self.record(chat, sent);
    }

    fn send_deletion_menu(&mut self, chat: ChatId, tasks: &[Task]) {
        let sent = self.notifier.send_deletion_menu(chat, tasks);
        self.record(chat, sent);
    }

    fn record(&mut self, chat: ChatId, sent: Result<MessageId, AppError>) {
        match sent {
            Ok(message) => self.sessions.record_message(chat, message),
            Err(err) => tracing::warn!(chat, error = %err, "failed to send message"),
        }
    }
}
