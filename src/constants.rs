// Defaults loaded from the environment, plus the fixed strings shown to the user.

use std::env;

use crate::persona::Persona;

lazy_static::lazy_static! {
    pub static ref SERVER_URL: String = env::var("FOOTBALLGPT_URL").unwrap_or_else(|_| "http://127.0.0.1:5000".to_string());
    pub static ref DEFAULT_PERSONA: Persona = env::var("FOOTBALLGPT_PERSONA")
        .ok()
        .and_then(|tag| tag.parse().ok())
        .unwrap_or_default();
}

/// Shown in place of a reply whenever a chat request fails.
pub const APOLOGY_MESSAGE: &str = "Sorry, something went wrong. Please try again.";

pub const DELETE_CONFIRM_PROMPT: &str = "Are you sure you want to delete this conversation?";

pub const GUEST_BANNER: &str =
    "You are chatting as a guest. Log in to save your chat history and revisit past conversations.";

pub const EMPTY_TRANSCRIPT_GREETING: &str = "Hello! How can I help you? Type a question below to start chatting.";

pub const PRODUCT_NAME: &str = "FootballGPT";
