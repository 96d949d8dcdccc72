use thiserror::Error;

const GENERIC_FAILURE: &str = "Something went wrong on our side, please try again later.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("validation_error - {0}")]
    Validation(String),
    #[error("not_found - {0}")]
    NotFound(String),
    #[error("parse_error - {0}")]
    Parse(String),
    #[error("storage_error - {0}")]
    Storage(String),
    #[error("transport_error - {0}")]
    Transport(String),
}

impl AppError {
    pub fn validation<M: Into<String>>(message: M) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found<M: Into<String>>(message: M) -> Self {
        Self::NotFound(message.into())
    }

    pub fn parse<M: Into<String>>(message: M) -> Self {
        Self::Parse(message.into())
    }

    pub fn storage<M: Into<String>>(message: M) -> Self {
        Self::Storage(message.into())
    }

    pub fn transport<M: Into<String>>(message: M) -> Self {
        Self::Transport(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::NotFound(_) => "not_found",
            Self::Parse(_) => "parse_error",
            Self::Storage(_) => "storage_error",
            Self::Transport(_) => "transport_error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Validation(message)
            | Self::NotFound(message)
            | Self::Parse(message)
            | Self::Storage(message)
            | Self::Transport(message) => message,
        }
    }

    /// Whether the person chatting with the bot can fix this by sending
    /// different input.
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::NotFound(_) | Self::Parse(_)
        )
    }

    /// Text shown in the chat. Internal failures never leak their details.
    pub fn user_message(&self) -> &str {
        if self.is_user_correctable() {
            self.message()
        } else {
            GENERIC_FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AppError;

    #[test]
    fn display_includes_code_and_message() {
        let err = AppError::not_found("task 3 doesn't exist");
        assert_eq!(err.to_string(), "not_found - task 3 doesn't exist");
    }

    #[test]
    fn user_message_hides_storage_details() {
        let err = AppError::storage("permission denied (os error 13)");
        assert!(!err.is_user_correctable());
        assert!(!err.user_message().contains("os error"));
    }

    #[test]
    fn user_message_passes_validation_through() {
        let err = AppError::validation("task text is required");
        assert_eq!(err.user_message(), "task text is required");
    }
}
