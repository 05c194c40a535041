use std::sync::{Arc, Mutex};

use tracing::{info, instrument, warn};

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::error::ApiResult;
use crate::persona::Persona;
use crate::session::{lock, SessionState, SharedState};

/// Owns the HTTP client and the session state, and exposes the user-facing
/// operations. Conversation management lives in `conversations.rs`, sending
/// in `dispatcher.rs`.
///
/// Cloning is cheap and every clone drives the same session.
#[derive(Debug, Clone)]
pub struct ChatController {
    pub(crate) api: ApiClient,
    pub(crate) state: SharedState,
}

impl ChatController {
    /// An anonymous session; call [`ChatController::identify`] to pick up a
    /// logged-in user.
    pub fn new(api: ApiClient, persona: Persona) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(SessionState::new(persona))),
        }
    }

    /// Builds the client, asks the server who we are and, for a logged-in
    /// user, loads the conversation list.
    pub async fn connect(config: &ClientConfig) -> ApiResult<Self> {
        let controller = Self::new(ApiClient::new(config)?, config.persona);
        if controller.identify().await {
            controller.refresh().await;
        }
        Ok(controller)
    }

    /// Returns whether the session is authenticated afterwards. Any failure,
    /// a 401 included, leaves the session anonymous.
    #[instrument(skip(self))]
    pub async fn identify(&self) -> bool {
        match self.api.whoami().await {
            Ok(user) => {
                info!(user = user.display_name(), "Authenticated session");
                lock(&self.state).set_user(Some(user));
                true
            }
            Err(e) if e.is_unauthorized() => {
                info!("No authenticated session, continuing as guest");
                lock(&self.state).set_user(None);
                false
            }
            Err(e) => {
                warn!(error = %e, "Failed to look up current user, continuing as guest");
                lock(&self.state).set_user(None);
                false
            }
        }
    }

    /// Ends the server session. Locally the user is always logged out
    /// afterwards, even if the request failed.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> bool {
        let result = self.api.logout().await;
        if let Err(e) = &result {
            warn!(error = %e, "Logout request failed");
        }
        let mut state = lock(&self.state);
        state.set_user(None);
        state.set_conversations(Vec::new());
        state.start_new();
        result.is_ok()
    }

    /// Copy of the current state, for rendering.
    pub fn snapshot(&self) -> SessionState {
        lock(&self.state).clone()
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn is_authenticated(&self) -> bool {
        lock(&self.state).is_authenticated()
    }

    /// Changes the tag sent with future messages. No request is made and the
    /// transcript is untouched.
    pub fn select_persona(&self, persona: Persona) {
        lock(&self.state).set_persona(persona);
    }

    pub fn persona(&self) -> Persona {
        lock(&self.state).persona()
    }

    pub fn set_input(&self, text: impl Into<String>) {
        lock(&self.state).set_input(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Message;

    fn controller() -> ChatController {
        let api = ApiClient::new(&ClientConfig::new("http://127.0.0.1:9")).unwrap();
        ChatController::new(api, Persona::Neutral)
    }

    #[test]
    fn test_select_persona_leaves_transcript_alone() {
        let controller = controller();
        lock(&controller.state).push_message(Message::user("hi"));

        controller.select_persona(Persona::ManUtd);

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.persona(), Persona::ManUtd);
        assert_eq!(snapshot.messages(), &[Message::user("hi")]);
    }

    #[test]
    fn test_new_controller_is_anonymous() {
        let controller = controller();
        assert!(!controller.is_authenticated());
        assert!(!controller.snapshot().guest_mode());
    }
}
