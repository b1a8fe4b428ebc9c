use crate::domain::model::Day;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, TallyError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

pub const OUTPUT_FORMATS: [&str; 3] = ["csv", "json", "txt"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Rest,
    File,
    Memory,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub store: StoreConfig,
    pub report: ReportConfig,
    pub consensus: ConsensusConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub r#type: StoreKind,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
    pub data_dir: String,
    pub tables: TableConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            r#type: StoreKind::File,
            endpoint: None,
            api_key: None,
            timeout_seconds: 10,
            data_dir: "./data".to_string(),
            tables: TableConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub availability: String,
    pub final_votes: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            availability: "meeting_times".to_string(),
            final_votes: "final_votes".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub top_n: usize,
    pub compress: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_path: "./report".to_string(),
            output_formats: vec!["csv".to_string(), "json".to_string()],
            top_n: crate::core::recommend::DEFAULT_TOP_N,
            compress: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsensusConfig {
    pub candidate_days: Vec<Day>,
    /// Shown next to the suggested day; final votes collect no time of their own.
    pub display_time: Option<String>,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            candidate_days: Day::ALL.to_vec(),
            display_time: None,
        }
    }
}

impl TomlConfig {
    /// Loads a configuration file; see `from_toml_str` for substitution rules.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| TallyError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| TallyError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        match self.store.r#type {
            StoreKind::Rest => {
                let endpoint = validation::validate_required_field("store.endpoint", &self.store.endpoint)?;
                validation::validate_url("store.endpoint", endpoint)?;
                let api_key = validation::validate_required_field("store.api_key", &self.store.api_key)?;
                validation::validate_non_empty_string("store.api_key", api_key)?;
                if api_key.starts_with("${") {
                    return Err(TallyError::InvalidConfigValueError {
                        field: "store.api_key".to_string(),
                        value: api_key.clone(),
                        reason: "environment variable is not set".to_string(),
                    });
                }
                validation::validate_positive_number("store.timeout_seconds", self.store.timeout_seconds as usize, 1)?;
            }
            StoreKind::File => validation::validate_path("store.data_dir", &self.store.data_dir)?,
            StoreKind::Memory => {}
        }

        validation::validate_non_empty_string("store.tables.availability", &self.store.tables.availability)?;
        validation::validate_non_empty_string("store.tables.final_votes", &self.store.tables.final_votes)?;

        validation::validate_path("report.output_path", &self.report.output_path)?;
        validation::validate_allowed_values("report.output_formats", &self.report.output_formats, &OUTPUT_FORMATS)?;
        validation::validate_positive_number("report.top_n", self.report.top_n, 1)?;

        if self.consensus.candidate_days.is_empty() {
            return Err(TallyError::ConfigValidationError {
                field: "consensus.candidate_days".to_string(),
                message: "at least one candidate day is required".to_string(),
            });
        }
        let unique: HashSet<Day> = self.consensus.candidate_days.iter().copied().collect();
        if unique.len() != self.consensus.candidate_days.len() {
            return Err(TallyError::ConfigValidationError {
                field: "consensus.candidate_days".to_string(),
                message: "candidate days must not repeat".to_string(),
            });
        }

        if let Some(time) = &self.consensus.display_time {
            chrono::NaiveTime::parse_from_str(time, "%H:%M").map_err(|e| {
                TallyError::InvalidConfigValueError {
                    field: "consensus.display_time".to_string(),
                    value: time.clone(),
                    reason: format!("expected HH:MM ({})", e),
                }
            })?;
        }

        Ok(())
    }

    pub fn store_kind(&self) -> StoreKind {
        self.store.r#type
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.store.timeout_seconds)
    }
}

impl ConfigProvider for TomlConfig {
    fn availability_table(&self) -> &str {
        &self.store.tables.availability
    }

    fn final_vote_table(&self) -> &str {
        &self.store.tables.final_votes
    }

    fn output_path(&self) -> &str {
        &self.report.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.report.output_formats
    }

    fn compress_output(&self) -> bool {
        self.report.compress
    }

    fn top_n(&self) -> usize {
        self.report.top_n
    }

    fn candidate_days(&self) -> &[Day] {
        &self.consensus.candidate_days
    }

    fn display_time(&self) -> Option<&str> {
        self.consensus.display_time.as_deref()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
