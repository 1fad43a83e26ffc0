//! # reactloop core
//!
//! Domain types, traits, and error definitions for the reactloop agent.
//! This crate has **no framework dependencies**: it defines the domain model
//! that the provider, tool, and agent crates implement against.
//!
//! ## Layout
//!
//! - [`message`]: the append-only Message Log and its entries
//! - [`tool`]: the `Tool` capability trait and the `ToolRegistry`
//! - [`schema`]: argument validation against a tool's JSON schema
//! - [`provider`]: the `Provider` trait (model backend boundary)
//! - [`agent`]: agent configuration and per-run state

pub mod agent;
pub mod error;
pub mod message;
pub mod provider;
pub mod schema;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use agent::{AgentConfig, AgentState};
pub use error::{Error, ProviderError, Result, ToolError};
pub use message::{Message, MessageLog, ToolOutcome, ToolRequest};
pub use provider::{Provider, ProviderRequest, ProviderResponse, ToolDefinition, Usage};
pub use tool::{Tool, ToolOutput, ToolRegistry};
