pub mod config;

pub use config::{supports_multi_agent, ModelProviderConfig, ProviderType};
