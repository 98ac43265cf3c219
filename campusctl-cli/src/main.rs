//! campusctl CLI - university housing and staffing data access
//!
//! Every operation is one stored-procedure call against the university
//! database:
//! - Buildings and classrooms (`buildings`, `classrooms` subcommands)
//! - Teacher positions (`positions` subcommand)
//! - Input validation rules (`validate` subcommand, no database needed)
//! - Configuration and error-code catalog (`config` subcommand)

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use campusctl_core::CampusConfig;
use clap::{Parser, Subcommand, ValueEnum};

mod commands;
mod config;
mod tracing_setup;

use commands::{CodedFailure, Context, CODED_FAILURE_EXIT};

#[derive(Parser, Debug)]
#[command(
    name = "campusctl",
    author,
    version,
    about = "Classroom, building and teacher position records via stored procedures",
    long_about = "Call the university database's housing and staffing procedures. \
                  Results print as JSON; input and connection failures print a \
                  numeric error code from the configured catalog."
)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    /// Config file (default: ~/.campusctl/config.toml)
    #[arg(long, global = true, env = "CAMPUSCTL_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Database URL (overrides config)
    #[arg(long, global = true, env = "DATABASE_URL", hide_env_values = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Building operations (list, delete)
    Buildings(commands::classrooms::BuildingsArgs),
    /// Classroom operations (list, in-building, add, delete, locate, id)
    Classrooms(commands::classrooms::ClassroomsArgs),
    /// Teacher position operations (list, add, delete, get)
    Positions(commands::positions::PositionsArgs),
    /// Run validation rules against values
    Validate(commands::validate::ValidateArgs),
    /// Manage campusctl configuration (init, get, show, path)
    Config(config::ConfigArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

fn load_env() {
    if let Some(home) = dirs::home_dir() {
        let _ = dotenvy::from_path(home.join(".campusctl/.env"));
    }
    let _ = dotenvy::dotenv();
}

fn load_config(path: &Path) -> Result<CampusConfig> {
    CampusConfig::load_or_default(path)
        .with_context(|| format!("Failed to load config: {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    load_env();
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }).ok();

    let config_path = cli.config.clone().unwrap_or_else(CampusConfig::config_path);
    let ctx = Context {
        config: load_config(&config_path)?,
        database_url: cli.database_url.clone(),
    };

    let result = match cli.command {
        Commands::Buildings(args) => commands::run_buildings(args, &ctx).await,
        Commands::Classrooms(args) => commands::run_classrooms(args, &ctx).await,
        Commands::Positions(args) => commands::run_positions(args, &ctx).await,
        Commands::Validate(args) => commands::run_validate(args, &ctx),
        Commands::Config(args) => config::run_config(args, &ctx.config, &config_path),
        Commands::Completions(args) => run_completions(args),
    };

    match result {
        Err(err) => match err.downcast_ref::<CodedFailure>() {
            Some(failure) => {
                tracing::warn!(code = %failure.code, kind = %failure.kind, "{}", failure.message);
                commands::print_json(failure)?;
                std::process::exit(CODED_FAILURE_EXIT);
            }
            None => Err(err),
        },
        Ok(()) => Ok(()),
    }
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
