use std::sync::{Arc, Mutex, MutexGuard};

use crate::models::{ConversationSummary, Message, UserProfile};
use crate::persona::Persona;

/// Everything the chat view shows, in one place.
///
/// Mutations are plain synchronous methods; the controller calls them while
/// holding the lock and never across an `.await`.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    messages: Vec<Message>,
    active_conversation: Option<String>,
    persona: Persona,
    guest_mode: bool,
    input: String,
    in_flight: bool,
    user: Option<UserProfile>,
    conversations: Vec<ConversationSummary>,
    requests_issued: u64,
}

impl SessionState {
    pub fn new(persona: Persona) -> Self {
        Self {
            persona,
            ..Self::default()
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn active_conversation(&self) -> Option<&str> {
        self.active_conversation.as_deref()
    }

    pub fn persona(&self) -> Persona {
        self.persona
    }

    pub fn guest_mode(&self) -> bool {
        self.guest_mode
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn conversations(&self) -> &[ConversationSummary] {
        &self.conversations
    }

    /// Drops the transcript and forgets the active conversation.
    pub fn start_new(&mut self) {
        self.messages.clear();
        self.active_conversation = None;
    }

    /// Replaces the transcript wholesale with a loaded conversation.
    pub fn load_conversation(&mut self, id: String, messages: Vec<Message>) {
        self.messages = messages;
        self.active_conversation = Some(id);
    }

    pub fn push_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    pub fn set_persona(&mut self, persona: Persona) {
        self.persona = persona;
    }

    /// Guest mode is sticky: nothing in a session turns it back off.
    pub fn mark_guest(&mut self) {
        self.guest_mode = true;
    }

    /// Takes `id` as the active conversation only if none is active yet.
    pub fn adopt_conversation(&mut self, id: String) -> bool {
        if self.active_conversation.is_some() {
            return false;
        }
        self.active_conversation = Some(id);
        true
    }

    pub fn set_conversations(&mut self, conversations: Vec<ConversationSummary>) {
        self.conversations = conversations;
    }

    pub fn set_user(&mut self, user: Option<UserProfile>) {
        self.user = user;
    }

    /// Atomically claims the single send slot. Returns the request number,
    /// or `None` when a send is already outstanding.
    pub(crate) fn begin_send(&mut self) -> Option<u64> {
        if self.in_flight {
            return None;
        }
        self.in_flight = true;
        self.requests_issued += 1;
        Some(self.requests_issued)
    }

    pub(crate) fn finish_send(&mut self) {
        self.in_flight = false;
    }
}

pub type SharedState = Arc<Mutex<SessionState>>;

/// Locks the session, ignoring poisoning: every mutation is a single
/// assignment or push and cannot be left half-done.
pub fn lock(state: &SharedState) -> MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Proof that the holder owns the send slot. Dropping it frees the slot on
/// every exit path, success or failure.
#[derive(Debug)]
pub struct SendTicket {
    state: SharedState,
    request: u64,
}

impl SendTicket {
    pub fn acquire(state: &SharedState) -> Option<Self> {
        let request = lock(state).begin_send()?;
        Some(Self {
            state: Arc::clone(state),
            request,
        })
    }

    pub fn request(&self) -> u64 {
        self.request
    }
}

impl Drop for SendTicket {
    fn drop(&mut self) {
        lock(&self.state).finish_send();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared() -> SharedState {
        Arc::new(Mutex::new(SessionState::default()))
    }

    #[test]
    fn test_start_new_clears_everything_active() {
        let mut state = SessionState::default();
        state.load_conversation(
            "c1".to_string(),
            vec![Message::user("hi"), Message::assistant("hello")],
        );
        state.start_new();
        assert!(state.messages().is_empty());
        assert!(state.active_conversation().is_none());
    }

    #[test]
    fn test_load_replaces_transcript() {
        let mut state = SessionState::default();
        state.push_message(Message::user("old"));
        state.load_conversation("c2".to_string(), vec![Message::assistant("new")]);
        assert_eq!(state.messages(), &[Message::assistant("new")]);
        assert_eq!(state.active_conversation(), Some("c2"));
    }

    #[test]
    fn test_adopt_only_when_none_active() {
        let mut state = SessionState::default();
        assert!(state.adopt_conversation("c1".to_string()));
        assert!(!state.adopt_conversation("c2".to_string()));
        assert_eq!(state.active_conversation(), Some("c1"));
    }

    #[test]
    fn test_guest_mode_is_sticky() {
        let mut state = SessionState::default();
        state.mark_guest();
        state.start_new();
        state.set_user(None);
        assert!(state.guest_mode());
    }

    #[test]
    fn test_only_one_ticket_at_a_time() {
        let state = shared();
        let first = SendTicket::acquire(&state).expect("slot is free");
        assert!(lock(&state).in_flight());
        assert!(SendTicket::acquire(&state).is_none());

        drop(first);
        assert!(!lock(&state).in_flight());

        let second = SendTicket::acquire(&state).expect("slot freed on drop");
        assert_eq!(second.request(), 2);
    }
}
