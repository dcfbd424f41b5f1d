pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "taskapp")]
#[command(about = "Task tracking API - users, projects, tasks and comments over HAL/JSON")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve,

    #[command(about = "Apply pending database migrations and exit")]
    Migrate,

    #[command(about = "Insert sample users, project and tasks into empty tables")]
    Seed,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => commands::serve::handle().await,
        Commands::Migrate => commands::migrate::handle().await,
        Commands::Seed => commands::seed::handle().await,
    }
}
