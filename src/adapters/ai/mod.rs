//! Interpreter adapters: the default keyword interpreter behind the port,
//! and the optional LLM-backed alternative.

mod keyword_interpreter;
mod llm_interpreter;

pub use keyword_interpreter::KeywordInterpreter;
pub use llm_interpreter::{LlmConfig, LlmInterpreter};
