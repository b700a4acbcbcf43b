use std::process::ExitCode;

use clap::Parser;

use boardlens::cli::{Cli, Commands, ConfigAction};
use boardlens::commands::{
    cmd_config_set, cmd_config_show, cmd_defect_types, cmd_delete, cmd_export, cmd_ls, cmd_stats,
    cmd_suggest, open_session,
};
use boardlens::config::Config;
use boardlens::error::Result;
use boardlens::query::QueryPatch;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = run(cli).await;
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;

    match cli.command {
        Commands::Ls {
            search,
            defect_type,
            since,
            defects,
            sort_by,
            sort_order,
            page,
            json,
        } => {
            let session = open_session(&config)?;
            let patch = QueryPatch {
                search,
                defect_type,
                date_range: since,
                has_defects: defects,
                sort_by: Some(sort_by),
                sort_order: Some(sort_order),
            };
            cmd_ls(&session, patch, page, json).await
        }
        Commands::Suggest { text, json } => {
            let session = open_session(&config)?;
            cmd_suggest(&session, &text, json).await
        }
        Commands::Stats { json } => {
            let session = open_session(&config)?;
            cmd_stats(&session, json).await
        }
        Commands::DefectTypes { json } => {
            let session = open_session(&config)?;
            cmd_defect_types(&session, json).await
        }
        Commands::Delete { ids, yes } => {
            let session = open_session(&config)?;
            cmd_delete(&session, &ids, yes).await
        }
        Commands::Export { ids, output } => {
            let session = open_session(&config)?;
            cmd_export(&session, &ids, output).await
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => cmd_config_show(&config),
            ConfigAction::Set { key, value } => cmd_config_set(&key, &value),
        },
    }
}
