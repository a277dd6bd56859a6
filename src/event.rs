//! Inbound chat events shared by both API dialects.
//!
//! Each dialect parses its own wire format into [`InboundEvent`], generic
//! over the dialect's button id type. Events are immutable once parsed.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of a chat, echoed back to the vendor unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatId {
    /// String identifier (UUID-like)
    Text(String),
    /// Numeric identifier, kept exactly as received
    Number(serde_json::Number),
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(id) => write!(f, "{id:?}"),
            Self::Number(id) => write!(f, "{id}"),
        }
    }
}

impl From<&str> for ChatId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self {
        Self::Number(id.into())
    }
}

/// A chat event delivered by the vendor webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent<B> {
    /// A visitor started a new chat with the bot.
    NewChat {
        /// Chat identifier
        chat_id: ChatId,
    },
    /// A new message arrived in a chat.
    NewMessage {
        /// Chat identifier
        chat_id: ChatId,
        /// The message itself
        message: InboundMessage<B>,
    },
    /// Any event the bot has no dedicated handling for.
    Other {
        /// Raw event name
        event: String,
        /// Chat identifier, if the event carried one
        chat_id: Option<ChatId>,
    },
}

impl<B> InboundEvent<B> {
    /// Returns the chat identifier of the event, if any.
    #[must_use]
    pub const fn chat_id(&self) -> Option<&ChatId> {
        match self {
            Self::NewChat { chat_id } | Self::NewMessage { chat_id, .. } => Some(chat_id),
            Self::Other { chat_id, .. } => chat_id.as_ref(),
        }
    }
}

/// The message carried by a `new_message` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage<B> {
    /// The visitor pressed a keyboard button.
    KeyboardResponse {
        /// Id of the pressed button
        button_id: B,
    },
    /// The visitor sent a file.
    FileVisitor {
        /// File description, if the vendor included one
        file: Option<serde_json::Value>,
    },
    /// The visitor typed free text.
    Visitor {
        /// Message text, if present
        text: Option<String>,
    },
    /// A message kind the bot does not handle.
    Unknown {
        /// Raw message kind
        kind: String,
    },
}

/// Message kinds as named on the wire.
pub mod kind {
    /// Button press.
    pub const KEYBOARD_RESPONSE: &str = "keyboard_response";
    /// File sent by the visitor.
    pub const FILE_VISITOR: &str = "file_visitor";
    /// Free text from the visitor.
    pub const VISITOR: &str = "visitor";
}

/// Event names as named on the wire.
pub mod event_name {
    /// Chat started.
    pub const NEW_CHAT: &str = "new_chat";
    /// Message received.
    pub const NEW_MESSAGE: &str = "new_message";
}

/// Error for inbound bodies that do not match the dialect's shape.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The body is not JSON or has fields of the wrong type.
    #[error("Invalid request body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A field required for this event is absent.
    #[error("Missing required field '{0}'")]
    MissingField(&'static str),
}
