//! Telegram Bot API transport: long-poll updates in, messages out.

mod types;

use crate::config::Config;
use crate::error::AppError;
use crate::model::{ChatId, MessageId, Task};
use crate::notify::Notifier;
use crate::render;
use crate::update::{Update, UpdateSource};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;
use types::{ApiResponse, RawMessage, RawUpdate};

pub const MENU_BUTTONS: [&str; 4] = ["Add", "List", "Delete", "ℹ️Help"];

/// `deleteMessages` accepts at most this many ids per call.
pub const MAX_RETRACT_BATCH: usize = 100;

#[derive(Clone)]
pub struct TelegramClient {
    agent: ureq::Agent,
    base_url: String,
    poll_timeout_secs: u64,
}

impl TelegramClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let token = config
            .token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                AppError::validation("bot token is not configured, set TELEGRAM_TOKEN")
            })?;

        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build();

        Ok(Self {
            agent,
            base_url: format!("{}/bot{}", config.api_base.trim_end_matches('/'), token),
            poll_timeout_secs: config.poll_timeout_secs,
        })
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }

    fn call<T: DeserializeOwned>(&self, method: &str, payload: &Value) -> Result<T, AppError> {
        let result = self.agent.post(&self.url(method)).send_json(payload);
        read_response(method, result)
    }

    fn send_message(&self, payload: &Value) -> Result<MessageId, AppError> {
        let message: RawMessage = self.call("sendMessage", payload)?;
        Ok(message.message_id)
    }
}

/// Unwraps the Bot API envelope. The token is part of the URL, so transport
/// errors are reported by kind only.
fn read_response<T: DeserializeOwned>(
    method: &str,
    result: Result<ureq::Response, ureq::Error>,
) -> Result<T, AppError> {
    let response = match result {
        Ok(response) => response,
        // Telegram reports API errors as 4xx with a JSON body.
        Err(ureq::Error::Status(_, response)) => response,
        Err(ureq::Error::Transport(transport)) => {
            let detail = transport.message().unwrap_or_default();
            return Err(AppError::transport(format!(
                "{method}: {} {detail}",
                transport.kind()
            )));
        }
    };

    let envelope: ApiResponse<T> = response
        .into_json()
        .map_err(|err| AppError::transport(format!("{method}: unreadable response: {err}")))?;

    if !envelope.ok {
        let description = envelope
            .description
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(AppError::transport(format!("{method}: {description}")));
    }

    envelope
        .result
        .ok_or_else(|| AppError::transport(format!("{method}: response has no result")))
}

/// One `deleteMessages` payload per batch of at most [`MAX_RETRACT_BATCH`] ids.
pub fn retract_payloads(chat: ChatId, messages: &[MessageId]) -> Vec<Value> {
    messages
        .chunks(MAX_RETRACT_BATCH)
        .map(|batch| json!({ "chat_id": chat, "message_ids": batch }))
        .collect()
}

pub fn main_keyboard() -> Value {
    let row: Vec<Value> = MENU_BUTTONS
        .iter()
        .map(|label| json!({ "text": label }))
        .collect();

    json!({
        "keyboard": [row],
        "resize_keyboard": true,
        "one_time_keyboard": false,
    })
}

pub fn deletion_keyboard(tasks: &[Task]) -> Value {
    let rows: Vec<Value> = tasks
        .iter()
        .map(|task| {
            json!([{
                "text": render::deletion_button_label(task),
                "callback_data": render::delete_payload(task.position),
            }])
        })
        .collect();

    json!({ "inline_keyboard": rows })
}

impl Notifier for TelegramClient {
    fn send_text(&self, chat: ChatId, text: &str) -> Result<MessageId, AppError> {
        self.send_message(&json!({
            "chat_id": chat,
            "text": text,
            "link_preview_options": { "is_disabled": true },
        }))
    }

    fn send_menu(&self, chat: ChatId, text: &str) -> Result<MessageId, AppError> {
        self.send_message(&json!({
            "chat_id": chat,
            "text": text,
            "reply_markup": main_keyboard(),
        }))
    }

    fn send_deletion_menu(&self, chat: ChatId, tasks: &[Task]) -> Result<MessageId, AppError> {
        self.send_message(&json!({
            "chat_id": chat,
            "text": render::DELETION_MENU_PROMPT,
            "reply_markup": deletion_keyboard(tasks),
        }))
    }

    fn acknowledge_callback(&self, callback_id: &str) -> Result<(), AppError> {
        let _: bool = self.call(
            "answerCallbackQuery",
            &json!({ "callback_query_id": callback_id }),
        )?;
        Ok(())
    }

    fn retract_messages(&self, chat: ChatId, messages: &[MessageId]) -> Result<(), AppError> {
        let mut first_error = None;

        for payload in retract_payloads(chat, messages) {
            if let Err(err) = self.call::<bool>("deleteMessages", &payload) {
                first_error.get_or_insert(err);
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl UpdateSource for TelegramClient {
    fn fetch_updates(&mut self, cursor: i64) -> Result<Vec<Update>, AppError> {
        let result = self
            .agent
            .get(&self.url("getUpdates"))
            .query("offset", &cursor.to_string())
            .query("timeout", &self.poll_timeout_secs.to_string())
            .call();

        let raw: Vec<RawUpdate> = read_response("getUpdates", result)?;
        Ok(raw.into_iter().map(Update::from).collect())
    }
}
