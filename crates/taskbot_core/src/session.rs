//! Per-chat conversation state.
//!
//! Sessions live only as long as the process. A restart puts every chat back
//! into [`Mode::Idle`] with an empty message trail.

use crate::model::{ChatId, MessageId};
use std::collections::HashMap;

/// How the next text message in a chat is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Idle,
    AwaitingTaskText,
    AwaitingDeleteSelector,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub mode: Mode,
    /// Ids of messages the bot sent into the chat, oldest first.
    pub trail: Vec<MessageId>,
}

#[derive(Debug, Default)]
pub struct SessionTracker {
    sessions: HashMap<ChatId, Session>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self, chat: ChatId) -> Mode {
        self.sessions
            .get(&chat)
            .map(|session| session.mode)
            .unwrap_or_default()
    }

    pub fn set_mode(&mut self, chat: ChatId, mode: Mode) {
        self.sessions.entry(chat).or_default().mode = mode;
    }

    pub fn reset(&mut self, chat: ChatId) {
        if let Some(session) = self.sessions.get_mut(&chat) {
            session.mode = Mode::Idle;
        }
    }

    pub fn record_message(&mut self, chat: ChatId, message: MessageId) {
        self.sessions.entry(chat).or_default().trail.push(message);
    }

    pub fn trail(&self, chat: ChatId) -> &[MessageId] {
        self.sessions
            .get(&chat)
            .map(|session| session.trail.as_slice())
            .unwrap_or_default()
    }

    /// Returns the recorded trail and forgets it.
    pub fn take_trail(&mut self, chat: ChatId) -> Vec<MessageId> {
        self.sessions
            .get_mut(&chat)
            .map(|session| std::mem::take(&mut session.trail))
            .unwrap_or_default()
    }
}
