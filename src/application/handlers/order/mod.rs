//! Order-taking use cases: starting a conversation and taking turns.

mod start_conversation;
mod take_turn;

pub use start_conversation::{StartConversationError, StartConversationHandler, StartConversationResult};
pub use take_turn::{TakeTurnCommand, TakeTurnError, TakeTurnHandler, TakeTurnResult};
