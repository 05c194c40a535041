// Conversation list management: refresh, open, remove, start over.

use tracing::{debug, error, info, instrument};

use crate::confirm::Confirm;
use crate::constants::DELETE_CONFIRM_PROMPT;
use crate::controller::ChatController;
use crate::session::lock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The user said no; nothing was sent.
    Declined,
    Removed,
    /// The server refused or could not be reached; state is unchanged.
    Failed,
}

impl ChatController {
    /// Reloads the conversation list. Skipped entirely for anonymous
    /// sessions; on failure the previous list stays.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> bool {
        if !self.is_authenticated() {
            debug!("Not logged in, skipping conversation refresh");
            return false;
        }
        match self.api.list_conversations().await {
            Ok(conversations) => {
                debug!(count = conversations.len(), "Loaded conversations");
                lock(&self.state).set_conversations(conversations);
                true
            }
            Err(e) => {
                error!(error = %e, "Failed to load conversations");
                false
            }
        }
    }

    /// Loads a conversation and makes it the active one.
    #[instrument(skip(self))]
    pub async fn open(&self, id: &str) -> bool {
        if !self.is_authenticated() {
            debug!("Not logged in, ignoring open");
            return false;
        }
        match self.api.get_conversation(id).await {
            Ok(detail) => {
                debug!(messages = detail.messages.len(), "Loaded conversation");
                lock(&self.state).load_conversation(id.to_string(), detail.messages);
                true
            }
            Err(e) => {
                error!(error = %e, "Failed to load conversation");
                false
            }
        }
    }

    /// Deletes a conversation after the user confirms. Removing the active
    /// conversation also starts a new chat.
    #[instrument(skip(self, confirm))]
    pub async fn remove<C: Confirm>(&self, id: &str, confirm: &mut C) -> RemoveOutcome {
        if !confirm.confirm(DELETE_CONFIRM_PROMPT).await {
            debug!("Deletion declined");
            return RemoveOutcome::Declined;
        }
        if let Err(e) = self.api.delete_conversation(id).await {
            error!(error = %e, "Failed to delete conversation");
            return RemoveOutcome::Failed;
        }

        info!("Conversation deleted");
        {
            let mut state = lock(&self.state);
            if state.active_conversation() == Some(id) {
                state.start_new();
            }
        }
        self.refresh().await;
        RemoveOutcome::Removed
    }

    /// Empties the transcript and forgets the active conversation. Purely
    /// local.
    pub fn start_new(&self) {
        lock(&self.state).start_new();
    }
}
