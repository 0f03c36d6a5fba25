mod approval;
mod builders;
mod categories;
mod cli;
mod db;
mod error;
mod fmt;
mod models;
mod normalize;
mod parsers;
mod settings;
mod summary;
mod upsert;
mod workbook;

use clap::{CommandFactory, Parser};

use cli::{Cli, Commands, SeedCommands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Seed { command } => match command {
            SeedCommands::Expenses { args, sheet } => cli::seed::expenses(&args, sheet),
            SeedCommands::Income { args, sheet } => cli::seed::income(&args, sheet),
            SeedCommands::Assets { args, sheet } => cli::seed::assets(&args, sheet),
        },
        Commands::Categories => cli::categories::run(),
        Commands::Status => cli::status::run(),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
