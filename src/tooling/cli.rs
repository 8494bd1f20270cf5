//! CLI Tooling
//!
//! Operator command line for the agent console. Every command loads the
//! roster from the configuration store first, then acts through the console.

use crate::agent::domain::{AgentConfig, KNOWN_TOOLS};
use crate::agent::selection::SwitchOutcome;
use crate::config::{ConfigLoader, ConsoleConfig, LoggingConfig};
use crate::console::{AgentConsole, AgentView};
use crate::error::SyncError;
use crate::notice::{Notice, NoticeLevel};
use crate::provider::{OllamaCatalogue, ProviderType};
use crate::store::{ConfigStoreClient, HttpConfigStore, ModelCatalog};
use clap::{Parser, Subcommand};
use comfy_table::Table;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing::debug;

/// Agentdeck CLI - manage the agents of a RAG deployment
#[derive(Parser)]
#[command(name = "agentdeck")]
#[command(about = "Manage agent configurations against a remote configuration store")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (layered over the global config)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Configuration store base URL (overrides config)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Enable verbose logging (info level)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Load configuration and apply command-line overrides.
    pub fn resolve_config(&self) -> Result<ConsoleConfig, SyncError> {
        let mut config = ConfigLoader::load(self.config.as_deref())?;
        if let Some(base_url) = &self.base_url {
            config.store.base_url = base_url.clone();
            config.store.validate()?;
        }
        self.apply_logging_overrides(&mut config.logging);
        Ok(config)
    }

    fn apply_logging_overrides(&self, logging: &mut LoggingConfig) {
        if self.verbose {
            logging.level = "info".to_string();
        }
        if let Some(level) = &self.log_level {
            logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            logging.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            logging.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            logging.file = Some(file.clone());
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List agents in creation order
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show one agent
    Show {
        agent_id: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Add a new agent from the template and select it
    Add,
    /// Rename an agent
    Rename { agent_id: String, name: String },
    /// Set an agent's role
    SetRole { agent_id: String, role: String },
    /// Enable or disable a tool for an agent
    Tool {
        agent_id: String,
        /// Tool name (DuckDuckGo, Wikipedia, OpenAPI, Interpreter, ImageGenerator, QueryEngine)
        tool: String,
        /// Disable instead of enable
        #[arg(long)]
        disable: bool,
    },
    /// Remove an agent
    Remove {
        agent_id: String,
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Save the currently selected agent, then check that AGENT_ID can take over.
    ///
    /// The selection only lasts for this run; the next invocation starts on
    /// the first agent again.
    Switch { agent_id: String },
    /// Check whether the configured model supports multiple agents
    Support,
    /// List models available from a provider
    Models { provider: String },
}

/// CLI context holding the console and the runtime it is driven on
pub struct CliContext {
    runtime: Runtime,
    console: AgentConsole,
    catalog: Arc<dyn ModelCatalog>,
}

impl CliContext {
    /// Create a context talking to the configured HTTP store
    pub fn new(config: &ConsoleConfig) -> Result<Self, SyncError> {
        let store = Arc::new(HttpConfigStore::new(&config.store)?);
        Self::with_store(store, config)
    }

    /// Create a context over any store implementation
    pub fn with_store<S>(store: Arc<S>, config: &ConsoleConfig) -> Result<Self, SyncError>
    where
        S: ConfigStoreClient + ModelCatalog + 'static,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SyncError::Config(format!("Failed to start async runtime: {}", e)))?;
        let client: Arc<dyn ConfigStoreClient> = store.clone();
        Ok(Self {
            runtime,
            console: AgentConsole::new(client, &config.feature_gate),
            catalog: store,
        })
    }

    pub fn console(&self) -> &AgentConsole {
        &self.console
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, SyncError> {
        let result = self.runtime.block_on(self.execute_inner(command));
        for notice in self.console.take_notices() {
            eprintln!("{}", format_notice(&notice));
        }
        result
    }

    async fn execute_inner(&self, command: &Commands) -> Result<String, SyncError> {
        if !matches!(command, Commands::Models { .. }) {
            self.console.load().await?;
        }
        match command {
            Commands::List { format } => self.handle_list(format),
            Commands::Show { agent_id, format } => self.handle_show(agent_id, format),
            Commands::Add => {
                let created = self.console.add_agent().await?;
                Ok(format!(
                    "Created agent: {} ({})",
                    created.name, created.agent_id
                ))
            }
            Commands::Rename { agent_id, name } => {
                let name = name.clone();
                let saved = self.console.apply(agent_id, |c| c.name = name).await?;
                Ok(format!("Renamed agent {} to {}", saved.agent_id, saved.name))
            }
            Commands::SetRole { agent_id, role } => {
                let role = role.clone();
                let saved = self.console.apply(agent_id, |c| c.payload.role = role).await?;
                Ok(format!(
                    "Set role of agent {} to {}",
                    saved.agent_id, saved.payload.role
                ))
            }
            Commands::Tool {
                agent_id,
                tool,
                disable,
            } => self.handle_tool(agent_id, tool, !disable).await,
            Commands::Remove { agent_id, yes } => self.handle_remove(agent_id, *yes).await,
            Commands::Switch { agent_id } => {
                let previous = self.console.selection().selection();
                match self.console.switch_to(agent_id).await? {
                    SwitchOutcome::Unchanged => {
                        Ok(format!("Agent {} is already active", agent_id))
                    }
                    SwitchOutcome::Switched(to) => Ok(match previous {
                        Some(from) => format!(
                            "Saved agent {}\nSwitch to {} accepted (selection is not kept between runs)",
                            from, to
                        ),
                        None => format!(
                            "Switch to {} accepted (selection is not kept between runs)",
                            to
                        ),
                    }),
                }
            }
            Commands::Support => {
                let supported = self.console.refresh_capability().await;
                Ok(if supported {
                    format!("Multi-agent mode: {}", "available".green())
                } else {
                    format!(
                        "Multi-agent mode: {} (the selected model does not support multiple agents)",
                        "unavailable".yellow()
                    )
                })
            }
            Commands::Models { provider } => self.handle_models(provider).await,
        }
    }

    fn handle_list(&self, format: &str) -> Result<String, SyncError> {
        let snapshot = self.console.snapshot();
        match format {
            "json" => to_json(&snapshot),
            "text" => Ok(format_agent_table(&snapshot.agents)),
            other => Err(invalid_format(other)),
        }
    }

    fn handle_show(&self, agent_id: &str, format: &str) -> Result<String, SyncError> {
        let agent = self
            .console
            .engine()
            .agent(agent_id)
            .ok_or_else(|| SyncError::NotFound(format!("Agent not found: {}", agent_id)))?;
        match format {
            "json" => to_json(&agent),
            "text" => Ok(format_agent_detail(&agent)),
            other => Err(invalid_format(other)),
        }
    }

    async fn handle_tool(
        &self,
        agent_id: &str,
        tool: &str,
        enabled: bool,
    ) -> Result<String, SyncError> {
        let Some(tool) = KNOWN_TOOLS.iter().find(|t| t.eq_ignore_ascii_case(tool)) else {
            return Err(SyncError::Validation(format!(
                "Unknown tool '{}' (known tools: {})",
                tool,
                KNOWN_TOOLS.join(", ")
            )));
        };
        let saved = self
            .console
            .apply(agent_id, |c| {
                c.payload.fill_missing_tools();
                if let Some(entry) = c.payload.tools.get_mut(*tool) {
                    entry.enabled = enabled;
                }
            })
            .await?;
        Ok(format!(
            "{} {} for agent {}",
            if enabled { "Enabled" } else { "Disabled" },
            tool,
            saved.agent_id
        ))
    }

    async fn handle_remove(&self, agent_id: &str, yes: bool) -> Result<String, SyncError> {
        if let Some(reason) = self.console.engine().removal_blocker(agent_id) {
            return Err(SyncError::Conflict(reason));
        }
        if !yes {
            use dialoguer::Confirm;
            let confirmed = Confirm::new()
                .with_prompt(format!("Remove agent '{}'?", agent_id))
                .default(false)
                .interact()
                .map_err(|e| SyncError::Config(format!("Failed to get user input: {}", e)))?;
            if !confirmed {
                return Ok("Removal cancelled".to_string());
            }
        }
        self.console.remove_agent(agent_id).await?;
        let active = self
            .console
            .selection()
            .selection()
            .unwrap_or_else(|| "none".to_string());
        Ok(format!("Removed agent: {}\nActive agent: {}", agent_id, active))
    }

    async fn handle_models(&self, provider: &str) -> Result<String, SyncError> {
        let provider_type: ProviderType = provider.parse()?;
        let models = self.catalog.fetch_models(provider_type.slug()).await?;
        debug!(provider = provider_type.slug(), count = models.len(), "Fetched models");

        if provider_type != ProviderType::Ollama {
            if models.is_empty() {
                return Ok(format!("No models available from {}", provider_type));
            }
            return Ok(models.join("\n"));
        }

        let catalogue = OllamaCatalogue::from_models(&models);
        let mut table = Table::new();
        table.load_preset(comfy_table::presets::UTF8_FULL);
        table.set_header(vec!["Model", "Kind"]);
        for model in &catalogue.llm {
            table.add_row(vec![model.as_str(), "llm"]);
        }
        for model in &catalogue.embedding {
            table.add_row(vec![model.as_str(), "embedding"]);
        }
        let mut output = table.to_string();
        for warning in catalogue.warnings() {
            output.push_str(&format!("\n{} {}", "warning:".yellow(), warning));
        }
        Ok(output)
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, SyncError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| SyncError::Validation(format!("Failed to serialize output: {}", e)))
}

fn invalid_format(format: &str) -> SyncError {
    SyncError::Config(format!(
        "Invalid format: {} (must be 'text' or 'json')",
        format
    ))
}

fn format_notice(notice: &Notice) -> String {
    match notice.level {
        NoticeLevel::Error => format!("{} {}", notice.title.red(), notice.description),
        NoticeLevel::Info => format!("{} {}", notice.title.cyan(), notice.description),
    }
}

/// Render agents as a table, active agent marked with `*`
pub fn format_agent_table(agents: &[AgentView]) -> String {
    if agents.is_empty() {
        return "No agents configured.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["", "Agent ID", "Name", "Role", "Created", "Flags"]);
    for agent in agents {
        let mut flags = Vec::new();
        if agent.is_default {
            flags.push("default");
        }
        if agent.primary {
            flags.push("primary");
        }
        if agent.pending {
            flags.push("pending");
        }
        table.add_row(vec![
            if agent.active { "*" } else { "" }.to_string(),
            agent.agent_id.clone(),
            agent.name.clone(),
            agent.role.clone(),
            agent.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            flags.join(", "),
        ]);
    }
    table.to_string()
}

/// Render one agent with its tools
pub fn format_agent_detail(agent: &AgentConfig) -> String {
    let mut output = format!("Agent: {}\n", agent.name);
    output.push_str(&format!("ID: {}\n", agent.agent_id));
    output.push_str(&format!("Role: {}\n", agent.payload.role));
    if let Some(goal) = &agent.payload.goal {
        output.push_str(&format!("Goal: {}\n", goal));
    }
    if let Some(backstory) = &agent.payload.backstory {
        output.push_str(&format!("Backstory: {}\n", backstory));
    }
    if let Some(prompt) = &agent.payload.system_prompt {
        output.push_str(&format!("System prompt: {}\n", prompt));
    }
    output.push_str(&format!(
        "Created: {}\n",
        agent.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if agent.is_default {
        output.push_str("Default: yes\n");
    }

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Tool", "Enabled"]);
    for (name, tool) in &agent.payload.tools {
        table.add_row(vec![name.as_str(), if tool.enabled { "yes" } else { "no" }]);
    }
    output.push_str(&table.to_string());
    output
}
