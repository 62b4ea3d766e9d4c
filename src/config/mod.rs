pub mod cli;
pub mod settings;
pub mod toml_config;

use crate::utils::error::Result;
use crate::utils::validation::{validate_required_field, Validate};
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Operation {
    /// Add domains from a file to a project
    Add,
    /// Print every domain of a project
    Print,
    /// List all projects
    List,
    /// Delete a project
    Delete,
    /// Save a project's domains to <date>_<project>.txt
    Save,
}

impl Operation {
    pub fn needs_project(self) -> bool {
        !matches!(self, Operation::List)
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "subbud")]
#[command(about = "Manage bug bounty targets")]
#[command(version)]
pub struct CliConfig {
    #[arg(short = 'o', long, value_enum, help = "Operation to perform")]
    pub operation: Operation,

    #[arg(short, long, help = "The project name")]
    pub project: Option<String>,

    #[arg(short, long, help = "The file containing domains")]
    pub file: Option<String>,

    #[arg(short, long, help = "TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, env = "SUBBUD_REDIS_HOST", help = "Redis host")]
    pub host: Option<String>,

    #[arg(long, env = "SUBBUD_REDIS_PORT", help = "Redis port")]
    pub port: Option<u16>,

    #[arg(long, env = "SUBBUD_REDIS_DB", help = "Redis logical database index")]
    pub db: Option<i64>,

    #[arg(long, help = "Connect with TLS (rediss://)")]
    pub tls: bool,

    #[arg(long, env = "SUBBUD_REDIS_USERNAME")]
    pub username: Option<String>,

    #[arg(long, env = "SUBBUD_REDIS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[arg(long, help = "Concurrent commit workers (defaults to CPU count)")]
    pub workers: Option<usize>,

    #[arg(long, help = "Directory for saved exports")]
    pub output_dir: Option<String>,

    #[arg(long, help = "Print the add summary as JSON")]
    pub json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Project name, required for every operation except `list`.
    pub fn project_name(&self) -> Result<Option<&str>> {
        if !self.operation.needs_project() {
            return Ok(None);
        }
        validate_required_field("project name", &self.project).map(|p| Some(p.as_str()))
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        self.project_name()?;

        if self.operation == Operation::Add {
            validate_required_field("file with the 'add' operation", &self.file)?;
        }

        Ok(())
    }
}
