//! Bot API 1.0 dialect.
//!
//! This module provides:
//! - Button ids and the default layout ([`ButtonId`], [`default_keyboard`])
//! - Update parsing ([`parse_update`])
//! - The synchronous bot ([`ApiV1Bot`]) and its reply body ([`Reply`])

mod buttons;
mod handler;
mod wire;


pub use buttons::{ButtonId, DEFAULT_CUSTOM_BUTTON_TEXT, default_keyboard};
pub use handler::{ApiV1Bot, CustomButton, Reply, text};
pub use wire::parse_update;
