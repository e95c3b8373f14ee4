//! Message types for LLM conversations
//!
//! `Message` is the typed form every backend consumes. `RawMessage` is what
//! arrives from JSON files and external callers; it is converted up front so
//! an unknown role fails before any network call is made.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role in a conversation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System message (instructions)
    System,
    /// User message
    User,
    /// Assistant message
    Assistant,
}

impl MessageRole {
    /// Returns the string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageRole {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "system" => Ok(Self::System),
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            other => Err(Error::UnknownRole(other.to_string())),
        }
    }
}

/// A message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: MessageRole,
    /// Message content
    pub content: String,
}

impl Message {
    /// Create a system message
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// Create a user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant message
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }

    /// Convert a raw conversation, failing on the first unknown role
    pub fn conversation_from_raw(raw: &[RawMessage]) -> Result<Vec<Self>> {
        raw.iter().map(Self::try_from).collect()
    }
}

/// Untyped `{role, content}` record as supplied by callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    /// Free-form role string
    pub role: String,
    /// Message content
    #[serde(default)]
    pub content: String,
}

impl RawMessage {
    /// Create a raw message
    #[must_use]
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

impl TryFrom<&RawMessage> for Message {
    type Error = Error;

    fn try_from(raw: &RawMessage) -> Result<Self> {
        Ok(Self {
            role: raw.role.parse()?,
            content: raw.content.clone(),
        })
    }
}

/// Concatenate message contents without separators (estimation input)
#[must_use]
pub fn joined_content(messages: &[Message]) -> String {
    messages.iter().map(|m| m.content.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_creation() {
        let system = Message::system("You are a helpful assistant");
        assert_eq!(system.role, MessageRole::System);

        let user = Message::user("Hello!");
        assert_eq!(user.role, MessageRole::User);

        let assistant = Message::assistant("Hi there!");
        assert_eq!(assistant.role, MessageRole::Assistant);
    }

    #[test]
    fn test_message_role_as_str() {
        assert_eq!(MessageRole::System.as_str(), "system");
        assert_eq!(MessageRole::User.as_str(), "user");
        assert_eq!(MessageRole::Assistant.as_str(), "assistant");
    }

    #[test]
    fn test_unknown_role_rejected() {
        let raw = vec![
            RawMessage::new("system", "rules"),
            RawMessage::new("tool", "{}"),
        ];
        let err = Message::conversation_from_raw(&raw).unwrap_err();
        assert!(matches!(err, Error::UnknownRole(ref r) if r == "tool"));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_raw_conversation_keeps_order() {
        let raw = vec![
            RawMessage::new("system", "a"),
            RawMessage::new("user", "b"),
            RawMessage::new("assistant", "c"),
        ];
        let messages = Message::conversation_from_raw(&raw).unwrap();
        let roles: Vec<_> = messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![MessageRole::System, MessageRole::User, MessageRole::Assistant]
        );
        assert_eq!(joined_content(&messages), "abc");
    }

    #[test]
    fn test_raw_message_missing_content_defaults_empty() {
        let raw: RawMessage = serde_json::from_str(r#"{"role": "user"}"#).unwrap();
        assert_eq!(raw.content, "");
    }
}
