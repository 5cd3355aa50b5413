use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "worktrack-cli", version, about = "Worktrack CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Performance report for a profile over a time range
    Report {
        /// Profile ID
        #[arg(long)]
        profile: String,
        /// Range start (Unix seconds or milliseconds, inclusive)
        #[arg(long)]
        from: String,
        /// Range end (Unix seconds or milliseconds, inclusive)
        #[arg(long)]
        to: String,
    },
    /// Check employee earnings against last month's role minimums
    MinimumCheck,
    /// Escalate priorities of unassigned tasks nearing their due date
    BumpPriorities,
    /// Task inspection and delivery
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Profile and XP ledger management
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// Rate and minimum configuration
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Report { profile, from, to } => commands::report::run(&profile, &from, &to),
        Commands::MinimumCheck => commands::minimum::run(),
        Commands::BumpPriorities => commands::priority::run(),
        Commands::Task { action } => commands::task::run(action),
        Commands::Profile { action } => commands::profile::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
