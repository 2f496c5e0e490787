use anyhow::Result;
use clap::{Parser, Subcommand};

use folio::catalog::Catalog;
use folio::{cli, config, web};

#[derive(Debug, Parser)]
#[command(name = "folio")]
#[command(about = "Portfolio terminal, coding stats and assistant")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Interactive simulated terminal (help, whoami, stack, contact, ...)
    Shell,
    /// Load judge and source-host stats and print the card
    Stats {
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
        /// Skip the source-host language breakdown
        #[arg(long)]
        no_source_host: bool,
        /// Abandon the load if it takes longer than this many milliseconds
        #[arg(long)]
        deadline_ms: Option<u64>,
    },
    /// Ask the assistant a single question
    Ask {
        /// The question to send
        #[arg(trailing_var_arg = true, required = true)]
        question: Vec<String>,
    },
    /// Interactive assistant session (/reset, /exit)
    Chat,
    /// List portfolio projects, or show one by id
    Projects {
        /// Project id, e.g. `giftint`
        id: Option<String>,
        /// Show only the first N projects
        #[arg(long)]
        limit: Option<usize>,
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// List work experience
    Experience {
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Show recent event log entries
    Events {
        /// Number of entries to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Check config, credentials, upstream settings and the event log
    Health,
    /// Serve the JSON API locally
    Serve {
        /// Address to bind
        #[arg(long, default_value = web::DEFAULT_ADDR)]
        addr: String,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a default ~/.folio/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a dotted key, e.g. `folio config set judge.timeout_ms 5000`
    Set { key: String, value: String },
    /// Reset ~/.folio/config.toml to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();
    let mut cfg = config::load();
    let catalog = Catalog::builtin();

    match app.command {
        Commands::Shell => cli::run_shell(&cfg, &catalog),
        Commands::Stats {
            format,
            no_source_host,
            deadline_ms,
        } => {
            if no_source_host {
                cfg.source_host.enabled = false;
            }
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_stats(&cfg, fmt, deadline_ms)
        }
        Commands::Ask { question } => cli::run_ask(&cfg, &catalog, &question.join(" ")),
        Commands::Chat => cli::run_chat(&cfg, &catalog),
        Commands::Projects { id, limit, format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_projects(&catalog, id.as_deref(), limit, fmt)
        }
        Commands::Experience { format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_experience(&catalog, fmt)
        }
        Commands::Events { limit } => cli::run_events(&cfg, limit),
        Commands::Health => cli::run_health(&cfg),
        Commands::Serve { addr } => cli::run_serve(&cfg, &catalog, &addr),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(&cfg),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
