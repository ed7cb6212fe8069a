use clap::Parser;
use color_eyre::Result;
use std::io::{self, Write};
use std::path::PathBuf;

use biblioteca::cli::{self, Cli, Commands};
use biblioteca::{Config, Database, Library, Profile};

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    // --config replaces the config file only; the profile still picks the default database
    let config = match &cli.config {
        Some(path) => Config::load_from_path(&biblioteca::utils::expand_path(path), profile)?,
        None => Config::load_with_profile(profile)?,
    };

    biblioteca::logging::init_logging(&config.log_filter)?;

    let db_path: PathBuf = config.get_database_path();
    let db = Database::new(
        db_path
            .to_str()
            .ok_or_else(|| color_eyre::eyre::eyre!("Database path contains invalid UTF-8"))?,
    )?;
    let mut library = Library::open(db, config.result_limit)?;

    let mut stdout = io::stdout().lock();
    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => {
            cli::run_shell(&mut library, &config, io::stdin().lock(), &mut stdout)?;
        }
        command => {
            if let Some(message) = cli::execute(command, &mut library, &config, &mut stdout)? {
                writeln!(stdout, "{message}")?;
            }
        }
    }

    Ok(())
}
