pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod mapping;
pub mod parser;
pub mod points;
pub mod services;
pub mod standings;
pub mod wizard;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

use crate::cli::Command;
use crate::config::AppConfig;
use crate::errors::EngineError;
use crate::services::locks::LeagueLocks;
use crate::services::server::ServerService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_setup() -> Result<()> {
    let pool = database::create_pool(&config::database_path())?;
    let conn = database::get_connection(&pool)?;
    database::setup::reset_database(&conn)
}

pub fn handle_recalculate(league_slug: &str) -> Result<()> {
    let config = AppConfig::new();
    let pool = database::create_pool(&config::database_path())?;

    let league = {
        let conn = database::get_connection(&pool)?;
        database::leagues::find_by_slug(&conn, league_slug)?.ok_or_else(|| {
            EngineError::UnknownLeague {
                slug: league_slug.to_string(),
            }
        })?
    };

    let locks = LeagueLocks::new();
    let summary = standings::rebuild(&pool, &locks, &config, league.id)?;
    log::info!(
        "Rebuilt league '{league_slug}': {} standings from {} result(s)",
        summary.standings,
        summary.results_replayed
    );
    Ok(())
}
