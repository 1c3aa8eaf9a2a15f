//! Request orchestration: fresh generation and conversational modification.
//!
//! Both pipelines share the same shape (build a prompt, invoke the LLM call
//! contract, recover a file mapping with [`crate::extract`], then touch the
//! store) and both guarantee that a failure anywhere leaves the stored
//! project exactly as it was.

pub mod chat;
pub mod generator;
mod prompts;

pub use chat::ChatService;
pub use generator::{GenerateError, GeneratedProject, ProjectGenerator};
