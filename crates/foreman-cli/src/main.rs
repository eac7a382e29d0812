// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use foreman_engine::{ResetService, SystemClock};
use foreman_store::JsonFileStore;
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "foreman")]
#[command(about = "Foreman todo service operations CLI")]
struct Cli {
    /// Directory holding todo.json and todotype.json.
    #[arg(long, global = true, default_value = "data")]
    data_dir: PathBuf,
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Restore collections to seed data with dates rebased to now.
    Reset {
        #[command(subcommand)]
        command: ResetCommand,
    },
}

#[derive(Subcommand)]
enum ResetCommand {
    /// Reset todo types, then todos.
    All,
    /// Reset only the todos collection.
    Todos,
    /// Reset only the todo types collection.
    TodoTypes,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let store = Arc::new(JsonFileStore::new(cli.data_dir.clone()));
    let reset = ResetService::new(store, Arc::new(SystemClock));

    match cli.command {
        Commands::Reset { command } => {
            let (target, todos, types) = match command {
                ResetCommand::All => {
                    reset.reset_all().map_err(|e| e.to_string())?;
                    ("all", true, true)
                }
                ResetCommand::Todos => {
                    reset.reset_todos().map_err(|e| e.to_string())?;
                    ("todos", true, false)
                }
                ResetCommand::TodoTypes => {
                    reset.reset_todo_types().map_err(|e| e.to_string())?;
                    ("todo-types", false, true)
                }
            };
            if cli.json {
                let out = json!({
                    "reset": target,
                    "todos": todos,
                    "todoTypes": types,
                    "dataDir": cli.data_dir,
                });
                println!(
                    "{}",
                    serde_json::to_string_pretty(&out).map_err(|e| e.to_string())?
                );
            } else {
                println!("reset {target} in {}", cli.data_dir.display());
            }
            Ok(())
        }
    }
}
