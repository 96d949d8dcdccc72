use crate::error::AppError;
use crate::model::ChatId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Text {
        chat: ChatId,
        text: String,
    },
    /// A message without text, such as a photo or sticker.
    NonText {
        chat: ChatId,
    },
    /// An inline button press.
    Callback {
        id: String,
        chat: ChatId,
        data: String,
    },
}

impl Event {
    pub fn chat(&self) -> ChatId {
        match self {
            Self::Text { chat, .. } | Self::NonText { chat } | Self::Callback { chat, .. } => {
                *chat
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    /// Monotonically increasing; the next fetch starts at `sequence + 1`.
    pub sequence: i64,
    /// `None` for update kinds the bot does not handle.
    pub event: Option<Event>,
}

pub trait UpdateSource {
    /// Returns the updates with a sequence number at or after `cursor`, oldest
    /// first.
    fn fetch_updates(&mut self, cursor: i64) -> Result<Vec<Update>, AppError>;
}
