use crate::error::AppError;
use crate::model::{ChatId, MessageId, Task};

/// Outbound side of the chat platform. Every `send_*` call returns the id of
/// the message it created so callers can retract it later.
pub trait Notifier {
    fn send_text(&self, chat: ChatId, text: &str) -> Result<MessageId, AppError>;

    /// Sends `text` together with the main Add/List/Delete/Help keyboard.
    fn send_menu(&self, chat: ChatId, text: &str) -> Result<MessageId, AppError>;

    /// Sends one selectable entry per task; each entry carries its position.
    fn send_deletion_menu(&self, chat: ChatId, tasks: &[Task]) -> Result<MessageId, AppError>;

    fn acknowledge_callback(&self, callback_id: &str) -> Result<(), AppError>;

    fn retract_messages(&self, chat: ChatId, messages: &[MessageId]) -> Result<(), AppError>;
}
