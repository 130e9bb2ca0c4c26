//! CLI command definitions using clap.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use playdeck_core::Frequency;
use url::Url;

/// Playdeck - console for an Ansible-style automation backend
#[derive(Parser, Debug)]
#[command(name = "playdeck")]
#[command(version)]
#[command(about = "Inspect servers, templates, logs and schedules; run commands and terminals")]
pub struct Cli {
    /// Config file (.toml or .json)
    #[arg(short, long, global = true, env = "PLAYDECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Backend API base URL, overrides config and PLAYDECK_API_URL
    #[arg(long, global = true)]
    pub api_url: Option<Url>,

    /// Enable debug logging
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List managed servers
    Servers {
        /// Environment tab (production, staging, development or "all")
        #[arg(long)]
        env: Option<String>,

        /// Status tab (online, offline or "all")
        #[arg(long)]
        status: Option<String>,

        /// Case-insensitive search over name, IP address and OS
        #[arg(short, long)]
        search: Option<String>,

        /// Refresh every SECS seconds until Ctrl+C
        #[arg(short, long, value_name = "SECS")]
        watch: Option<u64>,
    },

    /// List templates
    Templates {
        /// Case-insensitive search over name and description
        #[arg(short, long)]
        search: Option<String>,
    },

    /// List execution logs with template names resolved
    Logs {
        /// Status tab (success, failed or "all")
        #[arg(long)]
        status: Option<String>,

        /// Case-insensitive search over template, server and output
        #[arg(short, long)]
        search: Option<String>,
    },

    /// List schedules
    Schedules {
        /// Status tab (active, paused or "all")
        #[arg(long)]
        status: Option<String>,
    },

    /// List saved command configurations
    Configs,

    /// Open an interactive terminal on a server; stdin lines are commands
    Terminal(TerminalArgs),

    /// Upload an Ansible playbook as a template
    Upload {
        /// Template name
        #[arg(short, long)]
        name: String,

        /// Template description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Playbook file (.yml or .yaml)
        file: PathBuf,
    },

    /// Execute a command on one or more servers
    Exec {
        /// Target server id (repeatable)
        #[arg(short, long = "server", value_name = "ID", required = true)]
        servers: Vec<i64>,

        /// Command line to run
        #[arg(required = true, trailing_var_arg = true)]
        command: Vec<String>,
    },

    /// Create a recurring schedule
    ScheduleCreate(ScheduleArgs),

    /// Create a template from saved configurations
    TemplateCreate {
        #[arg(short, long)]
        name: String,

        #[arg(short, long, default_value = "")]
        description: String,

        /// Configuration id, in execution order (repeatable)
        #[arg(long = "step", value_name = "ID", required = true)]
        configs: Vec<i64>,
    },

    /// Delete a template
    TemplateDelete {
        id: i64,
    },

    /// Save a command configuration
    ConfigCreate {
        #[arg(short, long)]
        name: String,

        /// Ansible module (shell, command, apt, ...)
        #[arg(short, long, default_value = "shell")]
        module: String,

        /// Module arguments or command line
        #[arg(short = 'a', long = "args")]
        configuration: String,

        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Delete a command configuration
    ConfigDelete {
        id: i64,
    },

    /// Register a server
    ServerCreate(ServerArgs),
}

#[derive(Args, Debug)]
pub struct ServerArgs {
    #[arg(short, long)]
    pub name: String,

    #[arg(long)]
    pub ip_address: String,

    /// SSH login
    #[arg(short, long, default_value = "root")]
    pub username: String,

    /// SSH password
    #[arg(short, long, env = "PLAYDECK_SERVER_PASSWORD", hide_env_values = true, default_value = "")]
    pub password: String,

    #[arg(long, default_value = "22")]
    pub ssh_port: String,

    /// production, staging, development or a custom label
    #[arg(short, long, default_value = "development")]
    pub environment: String,

    #[arg(long, default_value = "")]
    pub os: String,

    #[arg(long, default_value = "")]
    pub project: String,
}

#[derive(Args, Debug)]
pub struct TerminalArgs {
    /// IP address of the target server
    #[arg(long)]
    pub server_ip: String,

    /// Login on the target server
    #[arg(short, long)]
    pub username: String,

    /// Password on the target server
    #[arg(short, long, env = "PLAYDECK_TERMINAL_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct ScheduleArgs {
    #[arg(short, long)]
    pub name: String,

    /// Playbook to run
    #[arg(short, long)]
    pub playbook: String,

    /// Target server or group
    #[arg(short, long)]
    pub target: String,

    /// daily, weekly or monthly
    #[arg(short, long, default_value = "daily")]
    pub frequency: Frequency,

    /// Time of day, HH:MM (24h)
    #[arg(long, default_value = "00:00")]
    pub time: String,

    /// Day of week for weekly schedules, 0 = Sunday
    #[arg(long, default_value_t = 1)]
    pub day_of_week: u8,

    /// Day of month for monthly schedules
    #[arg(long, default_value_t = 1)]
    pub day_of_month: u8,

    /// Create the schedule paused
    #[arg(long, default_value_t = false)]
    pub paused: bool,
}
