use tracing::{debug, error, info_span, Instrument};

use crate::constants::APOLOGY_MESSAGE;
use crate::controller::ChatController;
use crate::models::{ChatRequest, Message};
use crate::session::{lock, SendTicket};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input, or another send was still outstanding.
    Ignored,
    Replied,
    /// The apology was appended in place of a reply.
    Failed,
}

impl ChatController {
    /// Sends one user message.
    ///
    /// The user's message appears in the transcript before the request goes
    /// out and is never taken back. A failed request adds the apology reply
    /// instead. Only one send can be outstanding; a second call while the
    /// first is pending is ignored.
    ///
    /// A conversation id in the reply is adopted only when the request went
    /// out without one. A reply for a conversation the user has since left
    /// never re-binds the current chat.
    pub async fn send(&self, text: &str) -> SendOutcome {
        let message = text.trim();
        if message.is_empty() {
            return SendOutcome::Ignored;
        }
        let Some(ticket) = SendTicket::acquire(&self.state) else {
            debug!("A message is already being sent, ignoring");
            return SendOutcome::Ignored;
        };

        let (request, fresh) = {
            let mut state = lock(&self.state);
            state.clear_input();
            state.push_message(Message::user(message));
            let request = ChatRequest {
                message: message.to_string(),
                conversation_id: if state.is_authenticated() {
                    state.active_conversation().map(str::to_string)
                } else {
                    None
                },
                personality: state.persona(),
            };
            let fresh = state.is_authenticated() && request.conversation_id.is_none();
            (request, fresh)
        };

        let span = info_span!("send", request = ticket.request());
        let result = self.api.chat(&request).instrument(span).await;

        let (outcome, adopted) = {
            let mut state = lock(&self.state);
            match result {
                Ok(response) => {
                    state.push_message(Message::assistant(response.reply));
                    if response.guest_mode {
                        state.mark_guest();
                    }
                    let adopted = match response.conversation_id {
                        Some(id) if fresh && state.is_authenticated() => {
                            state.adopt_conversation(id)
                        }
                        _ => false,
                    };
                    (SendOutcome::Replied, adopted)
                }
                Err(e) => {
                    error!(request = ticket.request(), error = %e, "Chat error");
                    state.push_message(Message::assistant(APOLOGY_MESSAGE));
                    (SendOutcome::Failed, false)
                }
            }
        };
        drop(ticket);

        if adopted {
            self.refresh().await;
        }
        outcome
    }

    /// Sends whatever is in the input buffer.
    pub async fn submit(&self) -> SendOutcome {
        let text = lock(&self.state).input().to_string();
        self.send(&text).await
    }
}
