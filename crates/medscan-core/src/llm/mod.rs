//! LLM integration for enhanced descriptions and precautions.
//!
//! Provides a provider abstraction over multiple LLM backends (OpenAI and
//! compatible APIs, Anthropic, Ollama) and the fixed prompt templates.

pub(crate) mod anthropic;
pub(crate) mod ollama;
pub(crate) mod openai;
pub mod prompts;
pub(crate) mod provider;

pub use provider::{
    resolve_env_var, ChatMessage, LlmProvider, LlmProviderFactory, LlmRequest, LlmResponse, Role,
};
