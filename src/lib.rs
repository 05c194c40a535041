//! Terminal client for the FootballGPT chat service.
//!
//! [`ChatController`] holds the whole chat view: the transcript, the active
//! conversation, the saved-conversation list, the selected [`Persona`] and
//! the guest flag. Its operations talk to the server through [`ApiClient`]
//! and never fail outward; problems are logged and folded into the state.

pub mod api;
pub mod chat;
pub mod config;
pub mod confirm;
pub mod constants;
pub mod controller;
pub mod conversations;
pub mod dispatcher;
pub mod error;
pub mod models;
pub mod persona;
pub mod session;
pub mod ui;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use confirm::{Answered, AssumeYes, Confirm};
pub use controller::ChatController;
pub use conversations::RemoveOutcome;
pub use dispatcher::SendOutcome;
pub use error::{ApiError, ApiResult};
pub use models::{ChatRequest, ChatResponse, ConversationDetail, ConversationSummary, Message, Role, UserProfile};
pub use persona::Persona;
pub use session::SessionState;
