//! Built-in defaults every load starts from.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("store.base_url", "http://localhost:8000")?
        .set_default("store.timeout_secs", 30)?
        .set_default("feature_gate.stale_after_secs", 300)?
        .set_default("feature_gate.expire_after_secs", 600)?
        .set_default("logging.level", "warn")?
        .set_default("logging.output", "stderr")
}
