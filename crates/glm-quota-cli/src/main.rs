//! glm-quota - GLM Coding Plan usage CLI
//!
//! Prints a usage and quota report for the configured coding plan, or
//! serves a local viewer page that proxies the usage API.

mod commands;
mod output;
mod server;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "glm-quota")]
#[command(author, version, about = "GLM Coding Plan usage and quota report", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output format: table (default) or json
    #[arg(long, global = true, default_value = "table")]
    format: output::OutputFormat,

    /// Suppress progress messages
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Override settings file path (default ~/.claude/settings.json)
    #[arg(long, env = "GLM_QUOTA_SETTINGS", global = true)]
    settings: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the usage report (default)
    Report,

    /// Serve the browser viewer on localhost
    Serve(commands::serve::ServeArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    // Create context for commands
    let ctx = commands::Context::new(cli.format, cli.quiet, cli.settings.as_deref());

    // Execute command
    let result = match cli.command.unwrap_or(Commands::Report) {
        Commands::Report => commands::report::execute(&ctx).await,
        Commands::Serve(args) => commands::serve::execute(&ctx, args).await,
    };

    match result {
        Ok(outcome) => outcome.into(),
        Err(e) => {
            println!("\n错误: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
