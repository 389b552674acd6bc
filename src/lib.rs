//! # Workflow
//!
//! Task assignment and AI plan ingestion for a project workflow tracker.
//!
//! This library provides:
//! - Candidate scoring and best-assignee selection over a team roster
//! - Plan generation from a project goal, with tolerant parsing of model output
//! - An HTTP API exposing both
//!
//! ## Modules
//! - `assign`: skill aliases, scoring, selection and workload analytics
//! - `plan`: prompt, extraction, repair, validation and the retry orchestrator
//! - `llm`: chat-completion client abstraction with an OpenRouter implementation
//! - `api`: axum router and handlers
//! - `config`: environment-driven configuration

pub mod api;
pub mod assign;
pub mod config;
pub mod llm;
pub mod plan;

pub use config::Config;
