//! casbin-rules Binary Entry Point
//!
//! Operator tool for the rule table: initialize it, dump stored rules,
//! import a policy file, and add or remove individual rules.
//! Core functionality is provided by the `casbin_rule_adapter` library crate.

use std::path::PathBuf;
use std::time::Duration;

use casbin_rule_adapter::{
    PolicyModel, RuleAdapter,
    config::{AppConfig, parse_timeout},
    model::section_of,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// casbin-rules - Policy rule storage tool
#[derive(Parser, Debug)]
#[command(name = "casbin-rules", version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        default_value = "configs/adapter.yaml",
        env = "CASBIN_RULES_CONFIG"
    )]
    config: String,

    /// Database URL (overrides config file)
    #[arg(long, env = "CASBIN_RULES_DB_URL")]
    db_url: Option<String>,

    /// Database driver identity (overrides config file)
    #[arg(long, env = "CASBIN_RULES_DB_DRIVER")]
    driver: Option<String>,

    /// Connection timeout, e.g. "10s" (overrides config file)
    #[arg(long, value_parser = parse_timeout)]
    connect_timeout: Option<Duration>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the database (if configured) and the rule table
    Init,

    /// Print every stored rule
    Dump {
        /// Print rule records as JSON instead of policy lines
        #[arg(long)]
        json: bool,
    },

    /// Replace all stored rules with the rules of a policy file
    Import {
        /// Policy file with one `ptype, v0, v1, ...` line per rule
        file: PathBuf,
    },

    /// Add one rule
    Add {
        /// Rule type, e.g. "p" or "g"
        ptype: String,
        /// Rule fields in order
        #[arg(required = true)]
        fields: Vec<String>,
    },

    /// Remove rules matching a positional filter
    Remove {
        /// Rule type, e.g. "p" or "g"
        ptype: String,
        /// Column the first value is matched against (0 = v0)
        #[arg(long, default_value_t = 0)]
        field_index: usize,
        /// Values to match, starting at `field_index`
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Delete every stored rule
    Clear,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,casbin_rule_adapter=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration from file
    tracing::info!("Loading configuration from: {}", cli.config);
    let mut config = AppConfig::load(&cli.config)?;

    // Apply CLI/env overrides (CLI > ENV > config file)
    if let Some(url) = cli.db_url {
        config.database.url = url;
    }
    if let Some(driver) = cli.driver {
        config.database.driver = driver;
    }
    if let Some(timeout) = cli.connect_timeout {
        config.database.connect_timeout = timeout;
    }
    config.validate()?;

    tracing::info!(
        "Database: {} ({}), table: {}",
        config.database.url,
        config.database.driver,
        config.database.table_name,
    );

    let adapter = config.database.adapter_builder().build().await?;
    let result = run(&adapter, cli.command).await;
    adapter.close().await;
    result
}

async fn run(adapter: &RuleAdapter, command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Init => {
            tracing::info!("Rule table '{}' is ready", adapter.table_name());
        }
        Command::Dump { json } => {
            let rules = adapter.load_rules().await?;
            for rule in &rules {
                if json {
                    println!("{}", serde_json::to_string(rule)?);
                } else {
                    println!("{}", rule.to_policy_line());
                }
            }
            tracing::info!("Dumped {} rule(s)", rules.len());
        }
        Command::Import { file } => {
            let text = std::fs::read_to_string(&file)?;
            let model = PolicyModel::from_text(&text);
            let count = adapter.save_policy(&model).await?;
            tracing::info!("Imported {} rule(s) from {}", count, file.display());
        }
        Command::Add { ptype, fields } => {
            let sec = section_of(&ptype).ok_or("ptype cannot be empty")?;
            adapter.add_policy(sec, &ptype, &fields).await?;
            tracing::info!("Added {} rule", ptype);
        }
        Command::Remove {
            ptype,
            field_index,
            values,
        } => {
            let sec = section_of(&ptype).ok_or("ptype cannot be empty")?;
            let removed = adapter
                .remove_filtered_policy(sec, &ptype, field_index, &values)
                .await?;
            if removed {
                tracing::info!("Removed matching {} rule(s)", ptype);
            } else {
                tracing::warn!("No {} rule matched", ptype);
            }
        }
        Command::Clear => {
            adapter.clear_policy().await?;
        }
    }

    Ok(())
}
