//! # Quizmaster
//!
//! Generates multiple-choice quizzes on any topic with an open-source language model,
//! repairs and validates the model's JSON, and plays them in the terminal.
//!
//! ## Features
//! - Interactive play with score summary and saved history when signed in
//! - `generate` for a single quiz as JSON
//! - `serve` for a chat-completion proxy that keeps the API key server-side

mod cli;
mod core;
mod play;
mod run;
mod server;

use std::io;

use clap::{CommandFactory, Parser};
use dotenv::dotenv;

use cli::{Args, Commands, ConfigSubcommand, HistorySubcommand};

fn load_config_or_exit() -> core::config::Config {
    core::config::load().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let args = Args::parse();
    run::init_logger(&args);

    match args.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = Args::command();
            cli::generate(shell, &mut cmd, core::app::NAME, &mut io::stdout());
        }
        Some(Commands::Config { subcommand }) => match subcommand {
            Some(ConfigSubcommand::SetApiKey { key }) => core::cli::run_config_set_api_key(key),
            None => core::cli::run_config(),
        },
        Some(Commands::Login { name }) => core::cli::run_login(&name),
        Some(Commands::Logout) => core::cli::run_logout(),
        Some(Commands::Whoami) => core::cli::run_whoami(),
        Some(Commands::History { subcommand }) => match subcommand {
            HistorySubcommand::List { limit, query } => {
                core::cli::run_history_list(limit, query.as_deref())
            }
            HistorySubcommand::Prune { keep } => {
                let config = core::config::load_lenient()?;
                core::cli::run_history_prune(&config, keep)
            }
        },
        Some(Commands::Generate { topic, difficulty }) => {
            let config = load_config_or_exit();
            if let Err(e) = run::run_generate(&config, &topic, difficulty).await {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Serve { port }) => {
            let config = load_config_or_exit();
            run::run_serve(&config, port).await?;
        }
        Some(Commands::Play { topic, difficulty }) => {
            let config = load_config_or_exit();
            run::run_play(&config, topic, difficulty).await?;
        }
        None => {
            let config = load_config_or_exit();
            run::run_play(&config, None, None).await?;
        }
    }

    Ok(())
}
