/// A command advertised to the platform's auto-complete menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    /// Trigger without the leading slash
    pub trigger: &'static str,
    pub description: &'static str,
}

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        trigger: "start",
        description: "Start / help",
    },
    CommandSpec {
        trigger: "ping",
        description: "Check the bot is alive",
    },
];

const START_REPLY: &str = "Hello 👋\n\
     I'm the join bot. I approve join requests for this channel/group automatically.\n\
     Try: /ping";

const PING_REPLY: &str = "pong ✅";

/// Canned reply for an exact command match, `None` for any other text.
pub fn reply_for(text: &str) -> Option<&'static str> {
    match text {
        "/start" => Some(START_REPLY),
        "/ping" => Some(PING_REPLY),
        _ => None,
    }
}
