//! Chat Command Parsing
//!
//! Commands arrive as ordinary text messages: /start, /help, /scan, /status.
//! In groups, Telegram clients append the bot's username ("/scan@SafeFolksBot");
//! a suffix naming a different bot means the command is not for us.

/// Chat command types
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Welcome message
    Start,

    /// Usage help
    Help,

    /// Register the group and record owner trust for visible members
    Scan,

    /// Show trust relationships for the current group
    Status,

    /// Not a command of ours (plain text, typo, another bot's command)
    Unknown(String),
}

impl Command {
    /// Get command syntax and description for help text
    ///
    /// Returns (command_syntax, description) tuple.
    /// Only includes user-facing commands (excludes Unknown).
    pub fn help_text(&self) -> Option<(&'static str, &'static str)> {
        match self {
            Command::Start => Some(("/start", "Welcome message")),
            Command::Help => Some(("/help", "How trust recording works")),
            Command::Scan => Some((
                "/scan",
                "Register this group and record the owner's trust in its members",
            )),
            Command::Status => Some(("/status", "Show trust relationships for this group")),
            Command::Unknown(_) => None,
        }
    }

    /// All user-facing commands for help listings
    pub fn all_commands() -> Vec<(&'static str, &'static str)> {
        vec![
            Command::Start.help_text().unwrap(),
            Command::Help.help_text().unwrap(),
            Command::Scan.help_text().unwrap(),
            Command::Status.help_text().unwrap(),
        ]
    }
}

/// Parse a command from message text.
///
/// `bot_username` is compared case-insensitively against any "@..." suffix.
pub fn parse_command(text: &str, bot_username: &str) -> Command {
    let text = text.trim();

    if !text.starts_with('/') {
        return Command::Unknown(text.to_string());
    }

    let parts: Vec<&str> = text.split_whitespace().collect();
    if parts.is_empty() {
        return Command::Unknown(text.to_string());
    }

    let name = match parts[0].split_once('@') {
        Some((command, target)) => {
            if !target.eq_ignore_ascii_case(bot_username) {
                return Command::Unknown(text.to_string());
            }
            command
        }
        None => parts[0],
    };

    match name {
        "/start" => Command::Start,
        "/help" => Command::Help,
        "/scan" => Command::Scan,
        "/status" => Command::Status,
        _ => Command::Unknown(text.to_string()),
    }
}
