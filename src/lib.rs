//! AppForge: an LLM-backed service that generates front-end application
//! source trees from natural-language descriptions and edits them through
//! conversation.
//!
//! The crate is organized around a small number of seams:
//!
//! - [`llm`]: the call contract for the model provider (trait + OpenAI-compatible
//!   client + scripted mock).
//! - [`extract`]: recovery of a structured file mapping from free-form model text.
//! - [`store`]: per-project versioned state and the chat ledger, behind an
//!   injectable trait with an in-memory default.
//! - [`pipeline`]: the generation and modification orchestration.
//! - [`eval`]: the LLM-as-judge adapter and the batch evaluation harness.
//! - [`api`]: the axum HTTP surface.

pub mod api;
pub mod eval;
pub mod extract;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod store;
