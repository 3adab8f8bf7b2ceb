use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "momentum-cli", version, about = "Momentum CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Week identity
    Week {
        #[command(subcommand)]
        action: commands::week::WeekAction,
    },
    /// Weekly outcome management
    Outcome {
        #[command(subcommand)]
        action: commands::outcome::OutcomeAction,
    },
    /// Daily micro-action management
    Action {
        #[command(subcommand)]
        action: commands::action::ActionAction,
    },
    /// Weekly review management
    Review {
        #[command(subcommand)]
        action: commands::review::ReviewAction,
    },
    /// Daily habit checklist
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Evening wind-down ritual
    Ritual {
        #[command(subcommand)]
        action: commands::ritual::RitualAction,
    },
    /// Streaks, rings and weekly rollups
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Countdown timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Run the clock loop in the foreground, printing events
    Watch {
        /// Stop after this many ticks
        #[arg(long)]
        ticks: Option<u64>,
    },
    /// One-screen summary of today and this week
    Dashboard,
    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Week { action } => commands::week::run(action),
        Commands::Outcome { action } => commands::outcome::run(action),
        Commands::Action { action } => commands::action::run(action),
        Commands::Review { action } => commands::review::run(action),
        Commands::Habit { action } => commands::habit::run(action),
        Commands::Ritual { action } => commands::ritual::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Watch { ticks } => commands::watch::run(ticks),
        Commands::Dashboard => commands::dashboard::run(),
        Commands::Completions { shell } => commands::completions::run(shell),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
