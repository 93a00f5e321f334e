pub mod commands;
pub mod context;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

pub use context::CliContext;

#[derive(Parser)]
#[command(name = "aware")]
#[command(about = "Aware CLI - Command-line client for the security awareness training platform")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(
        long,
        global = true,
        help = "Client session name; each session keeps its own login (defaults to AWARE_SESSION or 'default')"
    )]
    pub session: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Login, logout and session status")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Show the dashboard for the logged-in role")]
    Dashboard,

    #[command(about = "Take quizzes (Staff) or manage the quiz bank (SuperAdmin)")]
    Quiz {
        #[command(subcommand)]
        cmd: commands::quiz::QuizCommands,
    },

    #[command(about = "Awareness reports, filtering and export")]
    Reports {
        #[command(subcommand)]
        cmd: commands::reports::ReportCommands,
    },

    #[command(about = "Staff directory management")]
    Staff {
        #[command(subcommand)]
        cmd: commands::staff::StaffCommands,
    },

    #[command(about = "Awareness topics")]
    Topics {
        #[command(subcommand)]
        cmd: commands::topics::TopicCommands,
    },

    #[command(about = "Security awareness tips")]
    Tips {
        #[command(subcommand)]
        cmd: commands::tips::TipCommands,
    },

    #[command(about = "Training modules and assignments")]
    Training {
        #[command(subcommand)]
        cmd: commands::training::TrainingCommands,
    },

    #[command(about = "Security policy documents")]
    Policies {
        #[command(subcommand)]
        cmd: commands::policies::PolicyCommands,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let ctx = CliContext::open(cli.session.as_deref(), output_format)?;

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, &ctx).await,
        Commands::Dashboard => commands::dashboard::handle(&ctx).await,
        Commands::Quiz { cmd } => commands::quiz::handle(cmd, &ctx).await,
        Commands::Reports { cmd } => commands::reports::handle(cmd, &ctx).await,
        Commands::Staff { cmd } => commands::staff::handle(cmd, &ctx).await,
        Commands::Topics { cmd } => commands::topics::handle(cmd, &ctx).await,
        Commands::Tips { cmd } => commands::tips::handle(cmd, &ctx).await,
        Commands::Training { cmd } => commands::training::handle(cmd, &ctx).await,
        Commands::Policies { cmd } => commands::policies::handle(cmd, &ctx).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommands() {
        let cli = Cli::try_parse_from(["aware", "reports", "list", "--json", "--session", "admin-tab"]).unwrap();
        assert_eq!(OutputFormat::from_cli(&cli), OutputFormat::Json);
        assert_eq!(cli.session.as_deref(), Some("admin-tab"));
    }
}
