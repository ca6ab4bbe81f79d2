//! Message parser - Parses raw messages into structured messages

use crate::domain::entities::{Message, Content, User};

/// Parses incoming messages into structured Message objects
pub struct MessageParser {
    command_prefix: String,
    bot_username: Option<String>,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            command_prefix: if prefix.is_empty() { "/".to_string() } else { prefix },
            bot_username: None,
        }
    }

    /// Username used to tell `/cmd@this_bot` from commands addressed to other bots
    pub fn with_bot_username(mut self, username: impl Into<String>) -> Self {
        self.bot_username = Some(username.into());
        self
    }

    pub fn set_bot_username(&mut self, username: impl Into<String>) {
        self.bot_username = Some(username.into());
    }

    /// Parse a text message
    pub fn parse(&self, chat_id: impl Into<String>, text: impl Into<String>, sender: Option<User>) -> Message {
        let text = text.into();
        let chat_id = chat_id.into();

        let trimmed = text.trim_start();
        if trimmed.is_empty() {
            return Message::new(chat_id, Content::Empty).with_sender_opt(sender);
        }

        if let Some(rest) = trimmed.strip_prefix(self.command_prefix.as_str()) {
            if let Some(content) = self.parse_command(rest) {
                return Message::new(chat_id, content).with_sender_opt(sender);
            }
        }

        Message::new(chat_id, Content::Text(text)).with_sender_opt(sender)
    }

    /// Parse the part after the prefix. `None` when the command targets another bot.
    fn parse_command(&self, cmd_text: &str) -> Option<Content> {
        // `/ ping`: the first token is the bare prefix, not a command name
        if cmd_text.starts_with(char::is_whitespace) {
            let args = cmd_text.split_whitespace().map(|s| s.to_string()).collect();
            return Some(Content::Command { name: String::new(), args });
        }

        let mut parts = cmd_text.split_whitespace();
        let head = parts.next().unwrap_or("");
        let args: Vec<String> = parts.map(|s| s.to_string()).collect();

        let name = match head.split_once('@') {
            Some((name, mention)) => {
                if let Some(own) = &self.bot_username {
                    if !mention.eq_ignore_ascii_case(own) {
                        return None;
                    }
                }
                name
            }
            None => head,
        };

        Some(Content::Command { name: name.to_lowercase(), args })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(msg: &Message) -> (&str, &[String]) {
        match &msg.content {
            Content::Command { name, args } => (name.as_str(), args.as_slice()),
            other => panic!("expected command, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_command_with_args() {
        let parser = MessageParser::new("/");
        let msg = parser.parse("100", "/prices now please", None);
        let (name, args) = command(&msg);
        assert_eq!(name, "prices");
        assert_eq!(args, ["now".to_string(), "please".to_string()]);
        assert_eq!(msg.chat_id, "100");
    }

    #[test]
    fn test_parse_plain_text() {
        let parser = MessageParser::new("/");
        let msg = parser.parse("100", "hello there", None);
        assert_eq!(msg.content, Content::Text("hello there".to_string()));
    }

    #[test]
    fn test_parse_empty_text() {
        let parser = MessageParser::new("/");
        assert_eq!(parser.parse("1", "   ", None).content, Content::Empty);
    }

    #[test]
    fn test_command_name_is_lowercased() {
        let parser = MessageParser::new("/");
        let msg = parser.parse("1", "/PING", None);
        assert_eq!(command(&msg).0, "ping");
    }

    #[test]
    fn test_mention_of_own_bot_is_stripped() {
        let parser = MessageParser::new("/").with_bot_username("meteorite_bot");
        let msg = parser.parse("-100", "/ping@Meteorite_Bot", None);
        assert_eq!(command(&msg).0, "ping");
    }

    #[test]
    fn test_mention_of_other_bot_is_plain_text() {
        let parser = MessageParser::new("/").with_bot_username("meteorite_bot");
        let msg = parser.parse("-100", "/ping@other_bot", None);
        assert!(!msg.content.is_command());
    }

    #[test]
    fn test_mention_without_known_username_is_accepted() {
        let parser = MessageParser::new("/");
        let msg = parser.parse("-100", "/start@whatever_bot", None);
        assert_eq!(command(&msg).0, "start");
    }

    #[test]
    fn test_bare_prefix_is_empty_command() {
        let parser = MessageParser::new("/");
        let msg = parser.parse("1", "/", None);
        assert_eq!(command(&msg).0, "");
    }

    #[test]
    fn test_space_after_prefix_is_not_the_command_name() {
        let parser = MessageParser::new("/");
        let msg = parser.parse("1", "/ ping", None);
        let (name, args) = command(&msg);
        assert_eq!(name, "");
        assert_eq!(args, ["ping".to_string()]);
    }

    #[test]
    fn test_custom_prefix() {
        let parser = MessageParser::new("!");
        assert_eq!(command(&parser.parse("1", "!ping", None)).0, "ping");
        assert!(!parser.parse("1", "/ping", None).content.is_command());
    }

    #[test]
    fn test_sender_is_kept() {
        let parser = MessageParser::new("/");
        let msg = parser.parse("1", "/ping", Some(User::new("7")));
        assert_eq!(msg.sender_id(), Some("7"));
    }
}
