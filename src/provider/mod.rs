//! Model provider configuration: which backend the agents run on and what it can do.

pub mod ollama;
pub mod profile;

pub use ollama::OllamaCatalogue;
pub use profile::{supports_multi_agent, ModelProviderConfig, ProviderType};
