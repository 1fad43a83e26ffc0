//! Model backend implementations for reactloop.
//!
//! All providers implement the `reactloop_core::Provider` trait.
//! `build_from_config` picks the backend the configuration names.

pub mod openai_compat;
pub mod router;

pub use openai_compat::OpenAiCompatProvider;
pub use router::build_from_config;
