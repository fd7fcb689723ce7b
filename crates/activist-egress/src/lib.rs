//! Activist Egress Connectors
//!
//! This crate provides outbound HTTP connectors:
//! - Shared HTTP client construction
//! - The chat assistant collaborator used by tenant sites

pub mod chat;
pub mod client;
pub mod error;

pub use chat::{ChatAssistant, ChatConfig, FALLBACK_REPLY, HttpChatAssistant, system_instruction_for};
pub use client::{HttpClientConfig, create_client};
pub use error::{EgressError, Result};
