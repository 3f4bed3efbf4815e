pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use clap::Parser;

/// Path value meaning stdin for input and stdout for output.
pub const STDIO: &str = "-";

/// Settings after merging the TOML file and command-line flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub input: String,
    pub output: String,
    pub report: Option<String>,
    pub log_level: String,
    pub json_logs: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input: STDIO.to_string(),
            output: STDIO.to_string(),
            report: None,
            log_level: "warn".to_string(),
            json_logs: false,
        }
    }
}

impl RunConfig {
    pub fn apply_toml(&mut self, config: &TomlConfig) {
        if let Some(io) = &config.io {
            if let Some(input) = &io.input {
                self.input = input.clone();
            }
            if let Some(output) = &io.output {
                self.output = output.clone();
            }
        }
        if let Some(report) = &config.report {
            self.report = Some(report.path.clone());
        }
        if let Some(logging) = &config.logging {
            if let Some(level) = &logging.level {
                self.log_level = level.clone();
            }
            if let Some(json) = logging.json {
                self.json_logs = json;
            }
        }
    }
}

impl ConfigProvider for RunConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output
    }

    fn report_path(&self) -> Option<&str> {
        self.report.as_deref()
    }

    fn json_logs(&self) -> bool {
        self.json_logs
    }
}

impl Validate for RunConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input", &self.input)?;
        validation::validate_path("output", &self.output)?;
        if let Some(report) = &self.report {
            validation::validate_path("report", report)?;
            validation::validate_file_extension("report", report, &["json"])?;
        }
        validation::validate_log_level("log_level", &self.log_level)
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "csv-normalizer")]
#[command(about = "Normalize timestamp, ZIP, name and duration columns of a CSV stream")]
pub struct CliConfig {
    #[arg(short, long, help = "Input CSV path, or - for stdin")]
    pub input: Option<String>,

    #[arg(short, long, help = "Output CSV path, or - for stdout")]
    pub output: Option<String>,

    #[arg(short, long, help = "TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, help = "Write a JSON run report to this path")]
    pub report: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Flags given on the command line win over the TOML file.
    pub fn resolve(&self) -> Result<RunConfig> {
        let mut config = RunConfig::default();

        if let Some(path) = &self.config {
            let file = TomlConfig::from_file(path)?;
            file.validate()?;
            config.apply_toml(&file);
        }
        if let Some(input) = &self.input {
            config.input = input.clone();
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(report) = &self.report {
            config.report = Some(report.clone());
        }
        if self.verbose {
            config.log_level = "debug".to_string();
        }
        if self.json_logs {
            config.json_logs = true;
        }

        Ok(config)
    }
}
