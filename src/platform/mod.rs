pub mod telegram;

use async_trait::async_trait;

use crate::commands::CommandSpec;

/// The user who asked to join
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRef {
    pub id: u64,
    pub full_name: String,
}

/// The channel or group being joined
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRef {
    pub id: i64,
    pub title: String,
}

/// A pending membership request. Approving it consumes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRequest {
    pub user: UserRef,
    pub chat: ChatRef,
}

/// Everything the handlers react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    TextCommand { chat_id: i64, text: String },
    JoinRequest(JoinRequest),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    #[default]
    Html,
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub chat_id: i64,
    pub text: String,
    pub parse_mode: ParseMode,
}

impl OutboundMessage {
    pub fn new(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            parse_mode: ParseMode::default(),
        }
    }

    /// A private message; a user's private chat shares the user's id.
    pub fn direct(user_id: u64, text: impl Into<String>) -> Self {
        Self::new(user_id as i64, text)
    }

    pub fn with_parse_mode(mut self, parse_mode: ParseMode) -> Self {
        self.parse_mode = parse_mode;
        self
    }
}

/// Failure of a platform call, by kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    /// The API rejected the request as malformed or impossible,
    /// e.g. a private chat that does not exist yet
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("api error: {0}")]
    Api(String),
    #[error("transport error: {0}")]
    Transport(String),
}

impl PlatformError {
    pub fn is_bad_request(&self) -> bool {
        matches!(self, PlatformError::BadRequest(_))
    }

    /// Classify a Bot API error description ("Bad Request: ...", "Forbidden: ...").
    pub fn from_api_description(description: impl Into<String>) -> Self {
        let description = description.into();
        if description.starts_with("Bad Request") {
            PlatformError::BadRequest(description)
        } else if description.starts_with("Forbidden") {
            PlatformError::Forbidden(description)
        } else {
            PlatformError::Api(description)
        }
    }
}

/// The remote calls the bot makes.
#[async_trait]
pub trait Platform: Send + Sync {
    async fn approve_join_request(&self, request: &JoinRequest) -> Result<(), PlatformError>;

    async fn send_message(&self, message: OutboundMessage) -> Result<(), PlatformError>;

    async fn set_commands(&self, commands: &[CommandSpec]) -> Result<(), PlatformError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_bad_request() {
        let err = PlatformError::from_api_description("Bad Request: chat not found");
        assert_eq!(
            err,
            PlatformError::BadRequest("Bad Request: chat not found".to_string())
        );
        assert!(err.is_bad_request());
    }

    #[test]
    fn test_classify_forbidden() {
        let err = PlatformError::from_api_description(
            "Forbidden: bot can't initiate conversation with a user",
        );
        assert!(matches!(err, PlatformError::Forbidden(_)));
        assert!(!err.is_bad_request());
    }

    #[test]
    fn test_classify_other() {
        let err = PlatformError::from_api_description("Unauthorized");
        assert!(matches!(err, PlatformError::Api(_)));
    }

    #[test]
    fn test_direct_message_addresses_user() {
        let msg = OutboundMessage::direct(42, "hi");
        assert_eq!(msg.chat_id, 42);
        assert_eq!(msg.parse_mode, ParseMode::Html);
    }
}
