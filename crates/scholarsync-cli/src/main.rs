use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "scholarsync", version, about = "ScholarSync study planner CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Exam management and study-plan generation
    Exam {
        #[command(subcommand)]
        action: commands::exam::ExamAction,
    },
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Study sessions
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Day, week or month calendar
    Calendar(commands::calendar::CalendarArgs),
    /// Focus timer
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Progress statistics
    Stats,
    /// Today's agenda and progress
    Dashboard(commands::dashboard::DashboardArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Exam { action } => commands::exam::run(action).await,
        Commands::Task { action } => commands::task::run(action).await,
        Commands::Session { action } => commands::session::run(action).await,
        Commands::Calendar(args) => commands::calendar::run(args).await,
        Commands::Timer { action } => commands::timer::run(action).await,
        Commands::Stats => commands::stats::run().await,
        Commands::Dashboard(args) => commands::dashboard::run(args).await,
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
