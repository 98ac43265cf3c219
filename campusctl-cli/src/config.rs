use anyhow::{Context, Result};
use campusctl_core::config::CONFIG_TEMPLATE;
use campusctl_core::CampusConfig;
use clap::{Parser, Subcommand};
use std::path::Path;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a config file with the default error-code catalog
    Init(InitArgs),
    /// Get a config value by dot-notation key
    Get(GetArgs),
    /// Show the effective config as TOML
    Show,
    /// Show config file path
    Path,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(long, short)]
    pub force: bool,
}

#[derive(Parser, Debug)]
pub struct GetArgs {
    /// Dot-notation key (e.g., "errors.token.invalid_token")
    pub key: String,
}

pub fn run_config(args: ConfigArgs, config: &CampusConfig, path: &Path) -> Result<()> {
    match args.command {
        ConfigCommands::Init(args) => run_init(args, path),
        ConfigCommands::Get(args) => {
            println!("{}", config.get(&args.key)?);
            Ok(())
        }
        ConfigCommands::Show => {
            print!("{}", config.to_toml().context("Failed to render config")?);
            Ok(())
        }
        ConfigCommands::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn run_init(args: InitArgs, path: &Path) -> Result<()> {
    if path.exists() && !args.force {
        return Err(anyhow::anyhow!(
            "Config already exists at {:?}\n\nUse --force to overwrite",
            path
        ));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .context(format!("Failed to create {}", parent.display()))?;
    }

    std::fs::write(path, CONFIG_TEMPLATE)
        .context(format!("Failed to write config file: {:?}", path))?;

    eprintln!("Created config at: {}", path.display());
    Ok(())
}
