// Plain-text rendering of the chat view.

use std::fmt::Write as _;

use crate::constants::{EMPTY_TRANSCRIPT_GREETING, GUEST_BANNER, PRODUCT_NAME};
use crate::models::{Message, Role};
use crate::persona::Persona;
use crate::session::SessionState;

pub fn render_message(message: &Message) -> String {
    let speaker = match message.role {
        Role::User => "You",
        Role::Assistant => PRODUCT_NAME,
    };
    let mut out = String::new();
    let mut lines = message.content.lines();
    let first = lines.next().unwrap_or_default();
    let _ = writeln!(out, "{}: {}", speaker, first);
    // Continuation lines line up under the first one.
    let indent = " ".repeat(speaker.len() + 2);
    for line in lines {
        let _ = writeln!(out, "{}{}", indent, line);
    }
    out
}

pub fn render_transcript(state: &SessionState) -> String {
    if state.messages().is_empty() {
        let mut out = format!("{}\n", EMPTY_TRANSCRIPT_GREETING);
        if !state.is_authenticated() {
            out.push_str("You can chat right away without logging in!\n");
        }
        return out;
    }
    state.messages().iter().map(render_message).collect()
}

/// Header line: product name plus who is chatting.
pub fn render_header(state: &SessionState) -> String {
    match state.user() {
        Some(user) => match user.email.as_deref() {
            Some(email) if user.display_name() != email => {
                format!("{} - {} <{}>", PRODUCT_NAME, user.display_name(), email)
            }
            _ => format!("{} - {}", PRODUCT_NAME, user.display_name()),
        },
        None => format!("{} - guest", PRODUCT_NAME),
    }
}

pub fn render_guest_banner() -> String {
    format!("💡 {}", GUEST_BANNER)
}

/// Numbered conversation list; the active one is marked with `*`.
pub fn render_conversations(state: &SessionState) -> String {
    if !state.is_authenticated() {
        return "Log in to see your chat history.\n".to_string();
    }
    if state.conversations().is_empty() {
        return "No saved conversations yet.\n".to_string();
    }
    let mut out = String::new();
    for (index, conversation) in state.conversations().iter().enumerate() {
        let marker = if state.active_conversation() == Some(conversation.id.as_str()) {
            '*'
        } else {
            ' '
        };
        let _ = writeln!(
            out,
            "{} #{:<3} {}  ({} messages)  [{}]",
            marker,
            index + 1,
            conversation.title,
            conversation.message_count,
            conversation.id
        );
    }
    out
}

pub fn render_personas(current: Persona) -> String {
    let mut out = String::new();
    for persona in Persona::ALL {
        let marker = if persona == current { '>' } else { ' ' };
        let _ = writeln!(out, "{} {:<8} {}", marker, persona.tag(), persona.label());
    }
    out
}
