use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Arg, Command};
use tabula::{Config, Error, Session, config::DEFAULT_BASE_PATH};
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

const HELP: &str = "\
=== Tabula Help ===
Commands:
  CREATE DATABASE <name>     - Create new database
  OPEN DATABASE <name>       - Open existing database
  SAVE                       - Save current database
  HELP                       - Show this help
  EXIT                       - Exit the program

SQL Commands:
  CREATE TABLE <name> (<columns>)
  INSERT INTO <table> VALUES (<values>)
  SELECT * FROM <table> [WHERE <column> = <value>]
  DELETE FROM <table> WHERE <column> = <value>
  SHOW TABLES

Example:
  CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL)
  INSERT INTO users VALUES (1, 'John Doe')
  SELECT * FROM users WHERE id = 1
===================";

/// Interactive shell over a [Session].
///
/// # Arguments
/// - `--data-dir DIR`: base directory for databases (default `data`, env `TABULA_DATA_DIR`)
///
/// Logging goes to stderr and is filtered with `RUST_LOG` (default `warn`).
fn main() -> tabula::Result<()> {
    let matches = Command::new("tabula")
        .about("Small in-memory relational database with a SQL shell")
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .value_name("DIR")
                .env("TABULA_DATA_DIR")
                .default_value(DEFAULT_BASE_PATH)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Directory holding one folder per database"),
        )
        .get_matches();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let base_path = matches
        .get_one::<PathBuf>("data-dir")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_BASE_PATH));
    let mut session = Session::new(Config::new(base_path));

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();

    println!("=== Tabula ===");
    println!("Type 'HELP' for commands or 'EXIT' to quit\n");

    loop {
        print!("db> ");
        stdout.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let upper = input.to_uppercase();
        if upper == "EXIT" || upper == "QUIT" {
            break;
        } else if upper == "HELP" {
            println!("{HELP}");
        } else if upper == "SAVE" {
            match session.save() {
                Ok(()) => println!("Database saved successfully"),
                Err(err) => println!("Error: Failed to save database: {err}"),
            }
        } else if upper.starts_with("CREATE DATABASE") {
            match database_name(input) {
                Some(name) => match session.create_database(name) {
                    Ok(()) => println!("Database '{name}' created successfully"),
                    Err(err) => println!("Error: Failed to create database: {err}"),
                },
                None => println!("Error: Database name required"),
            }
        } else if upper.starts_with("OPEN DATABASE") {
            match database_name(input) {
                Some(name) => match session.open_database(name) {
                    Ok(_) => println!("Database '{name}' opened successfully"),
                    Err(err) => println!("Error: Failed to open database '{name}': {err}"),
                },
                None => println!("Error: Database name required"),
            }
        } else {
            println!("{}", session.execute(input));
        }
        println!();
    }

    match session.save() {
        Ok(()) | Err(Error::NoDatabase) => {}
        Err(err) => error!(%err, "autosave failed"),
    }
    println!("Goodbye!");
    Ok(())
}

/// Third word of `CREATE DATABASE <name>` / `OPEN DATABASE <name>`.
fn database_name(input: &str) -> Option<&str> {
    input.split_whitespace().nth(2)
}
