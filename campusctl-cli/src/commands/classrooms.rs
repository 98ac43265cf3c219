//! Buildings and classrooms commands

use anyhow::Result;
use campusctl_db::{validate_building_number, ClassroomRepo};
use clap::{Parser, Subcommand};

use super::{db_failure, print_json, repo_failure, Context};

#[derive(Parser, Debug)]
pub struct BuildingsArgs {
    #[command(subcommand)]
    pub command: BuildingsCommand,
}

#[derive(Subcommand, Debug)]
pub enum BuildingsCommand {
    /// List all buildings
    List,
    /// Delete a building by number
    Delete {
        /// Building number
        building: i32,
    },
}

#[derive(Parser, Debug)]
pub struct ClassroomsArgs {
    #[command(subcommand)]
    pub command: ClassroomsCommand,
}

#[derive(Subcommand, Debug)]
pub enum ClassroomsCommand {
    /// List all classrooms
    List,
    /// List classrooms of one building (value is validated before querying)
    InBuilding {
        /// Building number, passed through as given
        building: Option<String>,
    },
    /// Add a classroom to a building
    Add {
        /// Building number
        building: i32,
        /// Classroom number
        class: i32,
    },
    /// Delete a classroom from a building
    Delete {
        /// Building number
        building: i32,
        /// Classroom number
        class: i32,
    },
    /// Show building and classroom numbers for a classroom id
    Locate {
        /// Classroom id
        id: i32,
    },
    /// Look up the id of a building/classroom pair
    Id {
        /// Building number
        building: i32,
        /// Classroom number
        class: i32,
    },
}

pub async fn run_buildings(args: BuildingsArgs, ctx: &Context) -> Result<()> {
    let executor = ctx.executor()?;
    let repo = ClassroomRepo::new(&executor, ctx.errors());

    let rows = match args.command {
        BuildingsCommand::List => repo.get_all_buildings().await,
        BuildingsCommand::Delete { building } => repo.delete_building(building).await,
    }
    .map_err(|e| db_failure(e, ctx.errors()))?;

    print_json(&rows)
}

pub async fn run_classrooms(args: ClassroomsArgs, ctx: &Context) -> Result<()> {
    // Reject bad input before resolving a connection.
    if let ClassroomsCommand::InBuilding { building } = &args.command {
        validate_building_number(building.as_deref(), ctx.errors())
            .map_err(|e| repo_failure(e, ctx.errors()))?;
    }

    let executor = ctx.executor()?;
    let repo = ClassroomRepo::new(&executor, ctx.errors());
    let db = |e| db_failure(e, ctx.errors());

    match args.command {
        ClassroomsCommand::List => print_json(&repo.get_all_classrooms().await.map_err(db)?),
        ClassroomsCommand::InBuilding { building } => {
            let rows = repo
                .get_all_classrooms_in_building(building.as_deref())
                .await
                .map_err(|e| repo_failure(e, ctx.errors()))?;
            print_json(&rows)
        }
        ClassroomsCommand::Add { building, class } => {
            print_json(&repo.add_classroom(building, class).await.map_err(db)?)
        }
        ClassroomsCommand::Delete { building, class } => {
            print_json(&repo.delete_classroom(building, class).await.map_err(db)?)
        }
        ClassroomsCommand::Locate { id } => {
            print_json(&repo.get_building_and_class_by_id(id).await.map_err(db)?)
        }
        ClassroomsCommand::Id { building, class } => {
            print_json(&repo.get_classroom_id(building, class).await.map_err(db)?)
        }
    }
}
