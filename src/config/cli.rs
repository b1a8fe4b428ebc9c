use crate::config::toml_config::{StoreKind, TomlConfig};
use crate::domain::model::{Day, PeriodPreference};
use crate::utils::error::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "meet-tally.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SummaryMode {
    All,
    Availability,
    Final,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "meet-tally")]
#[command(about = "Collect meeting availability and find the slot that suits the group")]
pub struct CliConfig {
    /// Path to a TOML configuration file (defaults to ./meet-tally.toml when present)
    #[arg(short, long, global = true, env = "MEET_TALLY_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, value_enum)]
    pub store: Option<StoreKind>,

    /// Base URL of the REST store, e.g. https://<project>.supabase.co
    #[arg(long, global = true, env = "MEET_TALLY_ENDPOINT")]
    pub endpoint: Option<String>,

    #[arg(long, global = true, env = "MEET_TALLY_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Directory for the file store
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    #[arg(long, global = true)]
    pub output_path: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Record which days and time suit you
    Submit {
        #[arg(long, default_value = "")]
        name: String,

        /// weekday or weekend
        #[arg(long)]
        period: Option<PeriodPreference>,

        /// Available day; repeat or separate with commas
        #[arg(long = "day", value_delimiter = ',')]
        days: Vec<Day>,

        /// Preferred time, e.g. 21:00
        #[arg(long, default_value = "")]
        time: String,
    },
    /// Cast a final vote for one available and one unavailable day
    Vote {
        #[arg(long, default_value = "")]
        name: String,

        #[arg(long)]
        available: Option<Day>,

        #[arg(long)]
        unavailable: Option<Day>,
    },
    /// Print the current statistics and suggestions
    Summary {
        #[arg(long, value_enum, default_value_t = SummaryMode::All)]
        mode: SummaryMode,
    },
    /// Write the statistics as report files
    Report,
}

impl CliConfig {
    /// Loads the configuration file (if any) and applies command line overrides.
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => TomlConfig::from_file(DEFAULT_CONFIG_FILE)?,
            None => TomlConfig::default(),
        };

        if let Some(store) = self.store {
            config.store.r#type = store;
        }
        if let Some(endpoint) = &self.endpoint {
            config.store.endpoint = Some(endpoint.clone());
        }
        if let Some(api_key) = &self.api_key {
            config.store.api_key = Some(api_key.clone());
        }
        if let Some(data_dir) = &self.data_dir {
            config.store.data_dir = data_dir.clone();
        }
        if let Some(output_path) = &self.output_path {
            config.report.output_path = output_path.clone();
        }

        Ok(config)
    }
}
