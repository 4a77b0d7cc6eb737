//! Utterance Interpreter Port - pluggable intent/item extraction.
//!
//! The keyword interpreter is the default implementation; an LLM-backed
//! adapter may substitute it. Implementations must return the empty
//! interpretation on any internal failure so the state machine only ever
//! sees the same `{intent, items}` shape, never an error.

use async_trait::async_trait;

use crate::domain::dialogue::Interpretation;

/// Port for turning one raw utterance into an interpretation.
#[async_trait]
pub trait UtteranceInterpreter: Send + Sync {
    /// Interprets one utterance. Infallible by contract: failures inside an
    /// implementation degrade to `Interpretation::empty()`.
    async fn interpret(&self, text: &str) -> Interpretation;
}
