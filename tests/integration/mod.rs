//! Integration tests for the agent console

mod cli_parse;
mod concurrency;
mod config_loading;
mod engine_scenarios;
mod feature_gate;
mod http_store;
mod roster_properties;
mod support;
mod switch_guard;
