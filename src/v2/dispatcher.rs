//! Turns API 2.0 events into ordered sequences of vendor API calls.

use super::buttons::build_keyboard;
use super::scheduler::Processor;
use super::wire::{CloseChatRequest, ForwardTarget, RedirectChatRequest, SendMessageRequest};
use super::{ButtonId, HandlerConfig};
use crate::event::{ChatId, InboundEvent, InboundMessage};
use crate::keyboard::Keyboard;
use crate::message::{FileRef, OutboundMessage};
use crate::outbound::{ApiClient, ApiMethod, HttpClient};

/// Fixed texts of the API 2.0 bot.
pub mod text {
    /// Reply to a new chat and to "Say hi".
    pub const GREETING: &str = "Hi! I am External API 2.0 sample bot. What should I do?";
    /// Reply to free text from the visitor.
    pub const DO_NOT_UNDERSTAND: &str = "What do you mean? Here is what I can do:";
    /// Reply to anything the bot cannot handle.
    pub const UNEXPECTED: &str = "Oops, I couldn't understand you. Here is what I can do:";
    /// Sent after a sample file.
    pub const WHAT_NEXT: &str = "What should I do next?";
    /// Reply to a file from the visitor.
    pub const FILE_RECEIVED: &str = "Thanks for the file. What should I do next?";
    /// Sent before closing the chat.
    pub const FAREWELL: &str = "Bye!";
}

/// Sample image sent by the "Send image" button.
pub const SAMPLE_IMAGE: FileRef = FileRef {
    url: "https://i.pinimg.com/originals/90/0a/b7/900ab76cf0c3b2fe8683e0e2039beb00.png",
    name: "shlepa.png",
    media_type: "image/png",
};

/// Sample document sent by the "Send document" button.
pub const SAMPLE_DOCUMENT: FileRef = FileRef {
    url: "https://filesamples.com/samples/document/doc/sample2.doc",
    name: "sample.doc",
    media_type: "application/msword",
};

/// Text sent before redirecting a chat.
#[must_use]
pub fn forwarding_text(target: &ForwardTarget) -> String {
    format!("Bye! Forwarding the chat to {target}.")
}

/// Executes the bot's reaction to one event.
///
/// Calls for one event run strictly in order. A failed call is logged by
/// the [`ApiClient`] and the next call is still made.
#[derive(Debug)]
pub struct Dispatcher<H> {
    api: ApiClient<H>,
    keyboard: Keyboard<ButtonId>,
    agent: Option<ForwardTarget>,
    department: Option<ForwardTarget>,
}

impl<H> Dispatcher<H> {
    /// Creates a dispatcher using `api` for outbound calls.
    #[must_use]
    pub fn new(config: &HandlerConfig, api: ApiClient<H>) -> Self {
        let agent = config
            .forward_agent_id
            .map(|operator_id| ForwardTarget::Agent { operator_id });
        let department =
            config
                .forward_department_key
                .clone()
                .map(|dep_key| ForwardTarget::Department { dep_key });

        Self {
            api,
            keyboard: build_keyboard(agent.is_some(), department.is_some()),
            agent,
            department,
        }
    }

    /// Returns the keyboard sent to visitors.
    #[must_use]
    pub const fn keyboard(&self) -> &Keyboard<ButtonId> {
        &self.keyboard
    }

    /// Returns the vendor API client.
    #[must_use]
    pub const fn api(&self) -> &ApiClient<H> {
        &self.api
    }
}

impl<H: HttpClient> Dispatcher<H> {
    /// Reacts to an event.
    pub async fn dispatch(&self, event: InboundEvent<ButtonId>) {
        match event {
            InboundEvent::NewChat { chat_id } => {
                tracing::info!("New chat {chat_id}");
                self.send_text_and_keyboard(&chat_id, text::GREETING).await;
            }
            InboundEvent::NewMessage { chat_id, message } => {
                tracing::info!("New message in chat {chat_id}");
                self.dispatch_message(&chat_id, message).await;
            }
            InboundEvent::Other {
                event,
                chat_id: Some(chat_id),
            } => {
                tracing::warn!("Unsupported event {event:?} in chat {chat_id}");
                self.send_text_and_keyboard(&chat_id, text::UNEXPECTED).await;
            }
            InboundEvent::Other {
                event,
                chat_id: None,
            } => {
                tracing::warn!("Unsupported event {event:?} without chat, skipping");
            }
        }
    }

    async fn dispatch_message(&self, chat_id: &ChatId, message: InboundMessage<ButtonId>) {
        match message {
            InboundMessage::KeyboardResponse { button_id } => {
                self.dispatch_button(chat_id, &button_id).await;
            }
            InboundMessage::FileVisitor { .. } => {
                self.send_text_and_keyboard(chat_id, text::FILE_RECEIVED)
                    .await;
            }
            InboundMessage::Visitor { .. } => {
                self.send_text_and_keyboard(chat_id, text::DO_NOT_UNDERSTAND)
                    .await;
            }
            InboundMessage::Unknown { kind } => {
                tracing::warn!("Unsupported message kind {kind:?}");
                self.send_text_and_keyboard(chat_id, text::UNEXPECTED).await;
            }
        }
    }

    async fn dispatch_button(&self, chat_id: &ChatId, button_id: &ButtonId) {
        match button_id {
            ButtonId::SayHi => self.send_text_and_keyboard(chat_id, text::GREETING).await,
            ButtonId::SendImage => self.send_file_and_keyboard(chat_id, &SAMPLE_IMAGE).await,
            ButtonId::SendDocument => {
                self.send_file_and_keyboard(chat_id, &SAMPLE_DOCUMENT)
                    .await;
            }
            ButtonId::CloseChat => {
                self.send_text(chat_id, text::FAREWELL).await;
                self.close_chat(chat_id).await;
            }
            ButtonId::ForwardToAgent => {
                self.forward_or_fallback(chat_id, button_id, self.agent.as_ref())
                    .await;
            }
            ButtonId::ForwardToDepartment => {
                self.forward_or_fallback(chat_id, button_id, self.department.as_ref())
                    .await;
            }
            ButtonId::Unrecognized(id) => {
                tracing::warn!("Unexpected button id {id:?}");
                self.send_text_and_keyboard(chat_id, text::UNEXPECTED).await;
            }
        }
    }

    async fn forward_or_fallback(
        &self,
        chat_id: &ChatId,
        button_id: &ButtonId,
        target: Option<&ForwardTarget>,
    ) {
        if let Some(target) = target {
            self.send_text(chat_id, &forwarding_text(target)).await;
            self.forward_chat(chat_id, target).await;
        } else {
            tracing::warn!(
                "Button {:?} pressed but its forward target is not configured",
                button_id.as_str()
            );
            self.send_text_and_keyboard(chat_id, text::UNEXPECTED).await;
        }
    }

    async fn send_file_and_keyboard(&self, chat_id: &ChatId, file: &FileRef) {
        self.send_file(chat_id, file).await;
        self.send_text_and_keyboard(chat_id, text::WHAT_NEXT).await;
    }

    async fn send_text_and_keyboard(&self, chat_id: &ChatId, text: &str) {
        self.send_text(chat_id, text).await;
        self.send_keyboard(chat_id).await;
    }

    /// Posts a text message into the chat.
    pub async fn send_text(&self, chat_id: &ChatId, text: &str) {
        self.send_message(chat_id, OutboundMessage::Operator { text })
            .await;
    }

    /// Posts the bot keyboard into the chat.
    pub async fn send_keyboard(&self, chat_id: &ChatId) {
        self.send_message(
            chat_id,
            OutboundMessage::Keyboard {
                buttons: &self.keyboard,
            },
        )
        .await;
    }

    /// Posts a file into the chat.
    pub async fn send_file(&self, chat_id: &ChatId, file: &FileRef) {
        self.send_message(chat_id, OutboundMessage::FileOperator { data: file })
            .await;
    }

    async fn send_message(&self, chat_id: &ChatId, message: OutboundMessage<'_, ButtonId>) {
        let request = SendMessageRequest { chat_id, message };
        self.api.call(ApiMethod::SendMessage, &request).await;
    }

    /// Closes the chat.
    pub async fn close_chat(&self, chat_id: &ChatId) {
        tracing::info!("Closing chat {chat_id}");
        self.api
            .call(ApiMethod::CloseChat, &CloseChatRequest { chat_id })
            .await;
    }

    /// Redirects the chat to an agent or department.
    pub async fn forward_chat(&self, chat_id: &ChatId, target: &ForwardTarget) {
        tracing::info!("Forwarding chat {chat_id} to {target}");
        self.api
            .call(
                ApiMethod::RedirectChat,
                &RedirectChatRequest { chat_id, target },
            )
            .await;
    }
}

impl<H: HttpClient + 'static> Processor<InboundEvent<ButtonId>> for Dispatcher<H> {
    async fn process(&self, event: InboundEvent<ButtonId>) {
        self.dispatch(event).await;
    }
}
