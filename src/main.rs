use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use agentry::config::{AgentryToml, CONFIG_FILE};

mod cmd;

#[derive(Parser)]
#[command(name = "agentry")]
#[command(version, about = "Dependency-ordered agent scheduling and LLM response extraction")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to agentry.toml. Defaults to ./agentry.toml
    #[arg(long, global = true, env = "AGENTRY_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract a structured document from an LLM response
    Extract {
        /// File holding the response (reads stdin when omitted)
        file: Option<PathBuf>,

        /// Print {} instead of the original text when nothing is found
        #[arg(long)]
        no_fallback: bool,

        /// Print every document found
        #[arg(long)]
        all: bool,

        /// Prefer the first document containing this key (repeatable)
        #[arg(long = "prefer", value_name = "KEY")]
        prefer: Vec<String>,

        /// Only look for a YAML mapping
        #[arg(long, conflicts_with_all = ["all", "prefer", "wrap"])]
        yaml_only: bool,

        /// Wrap a textual fallback as {"content": ...} (default extraction options)
        #[arg(long, conflicts_with_all = ["all", "prefer", "no_fallback"])]
        wrap: bool,
    },
    /// Print the execution order for a set of agents
    Order {
        /// Agents to run
        #[arg(required = true)]
        agents: Vec<String>,

        /// Group agents into waves that can run concurrently
        #[arg(long)]
        waves: bool,
    },
    /// List the agents triggered by a change category
    Affected {
        category: String,
    },
    /// Analyse the impact of a change
    Impact {
        category: String,

        /// Affected business rule ID (repeatable)
        #[arg(long = "rule", value_name = "ID")]
        rules: Vec<String>,

        /// Affected agent (repeatable). Defaults to the agents the category triggers
        #[arg(long = "agent", value_name = "AGENT")]
        agents: Vec<String>,
    },
    /// List every agent and its dependencies
    Agents,
    /// View or validate configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show the current configuration
    Show,
    /// Validate the configuration
    Validate,
    /// Write agentry.toml with the built-in catalog
    Init,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "agentry=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
    let load_config = || {
        AgentryToml::load_or_default(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))
    };

    match &cli.command {
        Commands::Extract {
            file,
            no_fallback,
            all,
            prefer,
            yaml_only,
            wrap,
        } => {
            let mut options = load_config()?.extract_options();
            if *no_fallback {
                options.fallback_to_text = false;
            }
            if *all {
                options.allow_multiple = true;
            }
            if !prefer.is_empty() {
                options.preferred_keys = prefer.clone();
            }

            let mode = if *yaml_only {
                cmd::ExtractMode::YamlOnly
            } else if *wrap {
                cmd::ExtractMode::Wrapped
            } else {
                cmd::ExtractMode::Document
            };
            cmd::cmd_extract(file.as_deref(), &options, mode)?;
        }
        Commands::Order { agents, waves } => cmd::cmd_order(&load_config()?, agents, *waves)?,
        Commands::Affected { category } => cmd::cmd_affected(&load_config()?, category)?,
        Commands::Impact {
            category,
            rules,
            agents,
        } => cmd::cmd_impact(&load_config()?, category, rules, agents)?,
        Commands::Agents => cmd::cmd_agents(&load_config()?)?,
        Commands::Config { command } => cmd::cmd_config(&config_path, command.clone())?,
    }

    Ok(())
}
