use crate::constants;
use crate::persona::Persona;

/// Connection settings for the chat server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Root of the server, e.g. `http://127.0.0.1:5000`.
    pub base_url: String,
    /// Raw `name=value` session cookie from a logged-in browser session.
    pub session_cookie: Option<String>,
    /// Persona selected when the session starts.
    pub persona: Persona,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            session_cookie: None,
            persona: Persona::default(),
        }
    }

    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    pub fn with_persona(mut self, persona: Persona) -> Self {
        self.persona = persona;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: constants::SERVER_URL.clone(),
            session_cookie: None,
            persona: *constants::DEFAULT_PERSONA,
        }
    }
}
