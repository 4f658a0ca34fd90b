use teloxide::utils::html;
use tracing::{debug, info, warn};

use crate::commands::{self, CommandSpec};
use crate::platform::{
    ChatRef, InboundEvent, JoinRequest, OutboundMessage, ParseMode, Platform, PlatformError,
    UserRef,
};

/// Route one inbound event to its handler.
pub async fn handle_event<P: Platform + ?Sized>(
    platform: &P,
    event: InboundEvent,
) -> Result<(), PlatformError> {
    match event {
        InboundEvent::TextCommand { chat_id, text } => {
            on_text_command(platform, chat_id, &text).await
        }
        InboundEvent::JoinRequest(request) => on_join_request(platform, request).await,
    }
}

async fn on_text_command<P: Platform + ?Sized>(
    platform: &P,
    chat_id: i64,
    text: &str,
) -> Result<(), PlatformError> {
    let Some(reply) = commands::reply_for(text) else {
        return Ok(());
    };

    debug!("Command {} in chat {}", text, chat_id);
    platform
        .send_message(OutboundMessage::new(chat_id, reply).with_parse_mode(ParseMode::Plain))
        .await
}

/// Approve the request, then try to greet the user privately.
///
/// Approval errors propagate. A "bad request" from the greeting is expected
/// when the user never opened a private chat with the bot and is ignored;
/// any other greeting failure propagates.
pub async fn on_join_request<P: Platform + ?Sized>(
    platform: &P,
    request: JoinRequest,
) -> Result<(), PlatformError> {
    info!(
        "Join request from {} ({}) for {} ({})",
        request.user.full_name, request.user.id, request.chat.title, request.chat.id
    );

    platform.approve_join_request(&request).await?;
    info!("Approved user {} in chat {}", request.user.id, request.chat.id);

    let welcome = OutboundMessage::direct(
        request.user.id,
        welcome_text(&request.user, &request.chat),
    );
    match platform.send_message(welcome).await {
        Ok(()) => Ok(()),
        Err(e) if e.is_bad_request() => {
            debug!("Could not greet user {}: {}", request.user.id, e);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// HTML welcome text naming the user and the chat.
pub fn welcome_text(user: &UserRef, chat: &ChatRef) -> String {
    format!(
        "Welcome {} 🎉\nYour request to join {} has been approved.",
        html::escape(&user.full_name),
        html::escape(&chat.title)
    )
}

/// Advertise the command list. Failures only affect auto-complete and are logged.
pub async fn publish_commands<P: Platform + ?Sized>(platform: &P, commands: &[CommandSpec]) {
    match platform.set_commands(commands).await {
        Ok(()) => info!("Published {} bot command(s)", commands.len()),
        Err(e) => warn!("Failed to publish bot commands: {}", e),
    }
}
