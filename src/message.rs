//! Outbound messages posted into a chat by the bot.

use serde::Serialize;

use crate::keyboard::Keyboard;

/// A file the bot can send, referenced by URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FileRef {
    /// Public URL of the file
    pub url: &'static str,
    /// File name shown to the visitor
    pub name: &'static str,
    /// MIME type of the file
    pub media_type: &'static str,
}

/// A message in the vendor's envelope format, tagged by `kind`.
///
/// Borrows its content from the handler that owns the texts and keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutboundMessage<'a, B> {
    /// Plain text from the bot.
    Operator {
        /// Message text
        text: &'a str,
    },
    /// The button layout.
    Keyboard {
        /// Keyboard rows
        buttons: &'a Keyboard<B>,
    },
    /// A file attachment.
    FileOperator {
        /// File description
        data: &'a FileRef,
    },
}
