use tracing::info;

use crate::config::Config;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::executor;

/// Holds the database statements currently run against.
///
/// Creating or opening another database replaces the current one without
/// saving it; call [Session::save] first to keep its changes.
#[derive(Debug)]
pub struct Session {
    config: Config,
    current: Option<Database>,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            current: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Makes an empty database called `name` the current one.
    ///
    /// Tables already stored under that name stay on disk but are not read.
    pub fn create_database(&mut self, name: &str) -> Result<()> {
        let db = Database::with_config(name, &self.config)?;
        info!(database = name, "created database");
        self.current = Some(db);
        Ok(())
    }

    /// Makes `name` the current database, loading every table stored for it.
    pub fn open_database(&mut self, name: &str) -> Result<usize> {
        let mut db = Database::with_config(name, &self.config)?;
        let tables = db.load_from_file()?;
        info!(database = name, tables, "opened database");
        self.current = Some(db);
        Ok(tables)
    }

    /// Writes every table of the current database to disk.
    ///
    /// # Errors
    /// Returns [Error::NoDatabase] if no database is open.
    pub fn save(&self) -> Result<()> {
        self.current.as_ref().ok_or(Error::NoDatabase)?.save_to_file()
    }

    /// Runs one statement against the current database; see [executor::execute].
    pub fn execute(&mut self, sql: &str) -> String {
        match self.current.as_mut() {
            Some(db) => executor::execute(db, sql),
            None => format!("Error: {}", Error::NoDatabase),
        }
    }

    pub fn database(&self) -> Option<&Database> {
        self.current.as_ref()
    }

    pub fn database_mut(&mut self) -> Option<&mut Database> {
        self.current.as_mut()
    }
}
