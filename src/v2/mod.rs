//! Bot API 2.0 dialect.
//!
//! This module provides:
//! - Button ids and the keyboard layout ([`ButtonId`], [`build_keyboard`])
//! - Update parsing and vendor request bodies ([`parse_update`], [`Ack`])
//! - The background scheduler ([`TaskScheduler`])
//! - The event dispatcher ([`Dispatcher`]) and the bot itself ([`ApiV2Bot`])

mod buttons;
mod dispatcher;
mod handler;
mod scheduler;
mod wire;


pub use buttons::{ButtonId, build_keyboard};
pub use dispatcher::{Dispatcher, SAMPLE_DOCUMENT, SAMPLE_IMAGE, forwarding_text, text};
pub use handler::{ApiV2Bot, DEFAULT_SHUTDOWN_GRACE, HandlerConfig, HandlerError};
pub use scheduler::{Processor, SchedulerClosed, TaskScheduler};
pub use wire::{
    Ack, CloseChatRequest, ForwardTarget, RedirectChatRequest, SendMessageRequest, parse_update,
};
