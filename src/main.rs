use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use finwise::backend::SupabaseBackend;
use finwise::cli::{
    handle_auth_command, handle_expense_command, handle_goal_command, handle_summary_command,
};
use finwise::config::{BackendConfig, FinwisePaths, Settings};
use finwise::session::AppContext;
use finwise::storage::SessionStore;

#[derive(Parser)]
#[command(
    name = "finwise",
    version,
    about = "Track your spending against a monthly savings goal",
    long_about = "FinWise records expenses with receipt photos in your Supabase \
                  project and shows how much of your monthly savings goal you \
                  have spent."
)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive dashboard
    #[command(alias = "ui")]
    Tui,

    /// Sign up, sign in and sign out
    #[command(subcommand)]
    Auth(finwise::cli::AuthCommands),

    /// Record and inspect expenses
    #[command(subcommand)]
    Expense(finwise::cli::ExpenseCommands),

    /// Show or change the monthly savings goal
    #[command(subcommand)]
    Goal(finwise::cli::GoalCommands),

    /// Show goal progress and recent expenses
    Summary,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let paths = FinwisePaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let command = match cli.command {
        Some(Commands::Config) => {
            print_config(&paths, &settings);
            return Ok(());
        }
        None => {
            println!("FinWise - expenses against a monthly savings goal");
            println!();
            println!("Run 'finwise --help' for usage information.");
            println!("Run 'finwise auth signin <email>' to get started.");
            return Ok(());
        }
        Some(command) => command,
    };

    let config = BackendConfig::resolve(&settings)?;
    let backend = SupabaseBackend::new(config.clone())?;
    let ctx = AppContext::with_session_store(
        Arc::new(backend),
        SessionStore::new(paths.session_file()),
    )
    .with_default_goal(settings.default_savings_goal)
    .with_bills_bucket(config.bills_bucket);
    ctx.initialize()?;

    let result = match command {
        Commands::Tui => finwise::tui::run_tui(&ctx, &settings),
        Commands::Auth(cmd) => handle_auth_command(&ctx, &settings, cmd).map_err(Into::into),
        Commands::Expense(cmd) => handle_expense_command(&ctx, &settings, cmd).map_err(Into::into),
        Commands::Goal(cmd) => handle_goal_command(&ctx, &settings, cmd).map_err(Into::into),
        Commands::Summary => handle_summary_command(&ctx, &settings).map_err(Into::into),
        Commands::Config => Ok(()),
    };

    ctx.teardown();
    result
}

/// Log to stderr; RUST_LOG takes precedence over --verbose
fn init_logging(verbose: bool) {
    let default = if verbose { "finwise=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_config(paths: &FinwisePaths, settings: &Settings) {
    println!("FinWise Configuration");
    println!("=====================");
    println!("Config directory: {}", paths.base_dir().display());
    println!("Settings file:    {}", paths.settings_file().display());
    println!("Session file:     {}", paths.session_file().display());
    println!();
    println!("Settings:");
    println!(
        "  Backend URL:      {}",
        settings.backend_url.as_deref().unwrap_or("(from environment)")
    );
    println!(
        "  Anon key:         {}",
        if settings.anon_key.is_some() { "set" } else { "(from environment)" }
    );
    println!("  Bills bucket:     {}", settings.bills_bucket);
    println!("  Request timeout:  {}s", settings.request_timeout_secs);
    println!(
        "  Default goal:     {}",
        settings.format_money(settings.default_savings_goal)
    );
    println!("  Date format:      {}", settings.date_format);
}
