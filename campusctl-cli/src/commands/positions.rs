//! Teacher position commands

use anyhow::Result;
use campusctl_db::PositionRepo;
use clap::{Parser, Subcommand};

use super::{db_failure, print_json, Context};

#[derive(Parser, Debug)]
pub struct PositionsArgs {
    #[command(subcommand)]
    pub command: PositionsCommand,
}

#[derive(Subcommand, Debug)]
pub enum PositionsCommand {
    /// List all teacher positions
    List,
    /// Add a teacher position
    Add {
        /// Position name
        name: String,
    },
    /// Delete a teacher position by name
    Delete {
        /// Position name
        name: String,
    },
    /// Show a teacher position by id
    Get {
        /// Position id
        id: i32,
    },
}

pub async fn run_positions(args: PositionsArgs, ctx: &Context) -> Result<()> {
    let executor = ctx.executor()?;
    let repo = PositionRepo::new(&executor);
    let db = |e| db_failure(e, ctx.errors());

    match args.command {
        PositionsCommand::List => {
            print_json(&repo.get_all_teacher_positions().await.map_err(db)?)
        }
        PositionsCommand::Add { name } => print_json(&repo.add_position(&name).await.map_err(db)?),
        PositionsCommand::Delete { name } => {
            print_json(&repo.delete_teacher_position(&name).await.map_err(db)?)
        }
        PositionsCommand::Get { id } => print_json(&repo.get_position_by_id(id).await.map_err(db)?),
    }
}
