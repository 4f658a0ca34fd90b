use std::sync::Arc;

use async_trait::async_trait;
use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::{BotCommand, ChatId, ChatJoinRequest, UserId};
use teloxide::{ApiError, RequestError};
use tracing::{debug, info};

use crate::commands::CommandSpec;
use crate::config::AccessToken;
use crate::handlers;
use crate::platform::{
    ChatRef, InboundEvent, JoinRequest, OutboundMessage, ParseMode, Platform, PlatformError,
    UserRef,
};

impl From<RequestError> for PlatformError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::Api(ApiError::Unknown(description)) => {
                PlatformError::from_api_description(description)
            }
            RequestError::Api(api) => PlatformError::from_api_description(api.to_string()),
            other => PlatformError::Transport(other.to_string()),
        }
    }
}

/// Telegram Bot API backed by teloxide
pub struct TelegramPlatform {
    bot: Bot,
}

impl TelegramPlatform {
    pub fn new(token: &AccessToken) -> Self {
        Self {
            bot: Bot::new(token.as_str()),
        }
    }
}

#[async_trait]
impl Platform for TelegramPlatform {
    async fn approve_join_request(&self, request: &JoinRequest) -> Result<(), PlatformError> {
        self.bot
            .approve_chat_join_request(ChatId(request.chat.id), UserId(request.user.id))
            .await?;
        Ok(())
    }

    async fn send_message(&self, message: OutboundMessage) -> Result<(), PlatformError> {
        let mut request = self.bot.send_message(ChatId(message.chat_id), message.text);
        if message.parse_mode == ParseMode::Html {
            request = request.parse_mode(teloxide::types::ParseMode::Html);
        }
        request.await?;
        Ok(())
    }

    async fn set_commands(&self, commands: &[CommandSpec]) -> Result<(), PlatformError> {
        let commands: Vec<BotCommand> = commands
            .iter()
            .map(|c| BotCommand::new(c.trigger, c.description))
            .collect();
        self.bot.set_my_commands(commands).await?;
        Ok(())
    }
}

fn message_event(msg: &Message) -> Option<InboundEvent> {
    let text = msg.text()?;
    Some(InboundEvent::TextCommand {
        chat_id: msg.chat.id.0,
        text: text.to_string(),
    })
}

fn join_request_event(req: &ChatJoinRequest) -> InboundEvent {
    InboundEvent::JoinRequest(JoinRequest {
        user: UserRef {
            id: req.from.id.0,
            full_name: req.from.full_name(),
        },
        chat: ChatRef {
            id: req.chat.id.0,
            title: req.chat.title().unwrap_or_default().to_string(),
        },
    })
}

async fn on_message(msg: Message, platform: Arc<TelegramPlatform>) -> Result<(), PlatformError> {
    match message_event(&msg) {
        Some(event) => handlers::handle_event(platform.as_ref(), event).await,
        None => Ok(()),
    }
}

async fn on_join_request(
    req: ChatJoinRequest,
    platform: Arc<TelegramPlatform>,
) -> Result<(), PlatformError> {
    handlers::handle_event(platform.as_ref(), join_request_event(&req)).await
}

/// Long-poll Telegram and route updates until the process is stopped.
pub async fn run(platform: Arc<TelegramPlatform>) {
    let bot = platform.bot.clone();

    info!("Starting Telegram dispatcher...");

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(on_message))
        .branch(Update::filter_chat_join_request().endpoint(on_join_request));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![platform])
        .default_handler(|upd| async move {
            debug!("Unhandled update: {:?}", upd.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("telegram"))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_bad_request_is_classified() {
        let err = PlatformError::from(RequestError::Api(ApiError::ChatNotFound));
        assert!(err.is_bad_request());
    }

    #[test]
    fn test_unknown_bad_request_is_classified() {
        let err = PlatformError::from(RequestError::Api(ApiError::Unknown(
            "Bad Request: PEER_ID_INVALID".to_string(),
        )));
        assert_eq!(
            err,
            PlatformError::BadRequest("Bad Request: PEER_ID_INVALID".to_string())
        );
    }

    #[test]
    fn test_blocked_bot_is_forbidden() {
        let err = PlatformError::from(RequestError::Api(ApiError::BotBlocked));
        assert!(matches!(err, PlatformError::Forbidden(_)));
    }
}
