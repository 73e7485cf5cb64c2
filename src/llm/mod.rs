//! The natural-language-to-intent collaborator.
//!
//! The engine consumes interpretation as a black box behind [`CommandParser`];
//! [`client::OpenAiParser`] is the shipped chat-completions implementation.

pub mod client;
pub mod prompts;

use crate::error::Result;
use crate::intent::ParsedCommand;
use async_trait::async_trait;

#[async_trait]
pub trait CommandParser: Send + Sync {
    /// Interprets one free-text command into a typed intent. The parser never
    /// executes anything itself.
    async fn parse(&self, command: &str) -> Result<ParsedCommand>;
}

pub use client::OpenAiParser;
