//! Domain and wire models for AppForge.
//!
//! # Core Concepts
//!
//! ## Stored State
//!
//! - [`FileMap`]: a complete project snapshot, path -> full file text. Partial
//!   or diff-shaped updates are never stored.
//! - [`ChatMessage`]: immutable role-tagged entry in a project's append-only
//!   conversation ledger.
//!
//! ## Ephemeral Values
//!
//! These exist only for the duration of a request:
//!
//! - [`ProjectRequest`] / [`ChatRequest`]: inbound generation and modification
//!   requests.
//! - [`EvaluationResult`]: judge scores for one generated project, clamped to
//!   [1, 10] per criterion.
//! - [`TestCase`] / [`AggregateMetrics`]: batch evaluation inputs and rollup.

mod chat;
mod evaluation;
mod project;

pub use chat::*;
pub use evaluation::*;
pub use project::*;
