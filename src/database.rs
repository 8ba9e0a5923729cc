use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use allocative::Allocative;
use tracing::{info, warn};

use crate::column::Column;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::table::Table;

/// File extension of persisted tables.
pub const TABLE_EXTENSION: &str = "tbl";

/// A named collection of tables backed by one directory.
///
/// Tables live in memory; [Database::save_to_file] writes each of them to
/// `<data_dir>/<table>.tbl` and [Database::load_from_file] reads them back.
#[derive(Debug, Allocative)]
pub struct Database {
    name: String,
    /// A map of table names to their respective [Table] structures.
    tables: HashMap<String, Table>,
    #[allocative(skip)]
    data_dir: PathBuf,
}

impl Database {
    /// Creates an empty database stored under `<base_path>/<name>/`.
    ///
    /// The directory is created if needed; an existing directory is reused
    /// but not read, see [Database::open] for that.
    ///
    /// # Errors
    /// Returns [Error::Io] if the directory cannot be created.
    pub fn new(name: impl Into<String>, base_path: impl AsRef<Path>) -> Result<Self> {
        let name = name.into();
        let data_dir = base_path.as_ref().join(&name);
        Self::in_dir(name, data_dir)
    }

    /// Creates an empty database under the configured base path.
    pub fn with_config(name: impl Into<String>, config: &Config) -> Result<Self> {
        let name = name.into();
        let data_dir = config.database_dir(&name);
        Self::in_dir(name, data_dir)
    }

    fn in_dir(name: String, data_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&data_dir)?;
        info!(database = %name, dir = %data_dir.display(), "database ready");

        Ok(Self {
            name,
            tables: HashMap::new(),
            data_dir,
        })
    }

    /// Creates the database and loads every table already stored in its directory.
    ///
    /// # Example
    /// ```
    /// use tabula::{Column, DataType, Database, Value};
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let mut db = Database::new("shop", dir.path()).unwrap();
    /// db.create_table("items", vec![Column::new("name", DataType::Text)]).unwrap();
    /// db.get_table_mut("items").unwrap().insert_row(vec![Value::from("pen")]).unwrap();
    /// db.save_to_file().unwrap();
    ///
    /// let db = Database::open("shop", dir.path()).unwrap();
    /// assert_eq!(db.get_table("items").unwrap().row_count(), 1);
    /// ```
    pub fn open(name: impl Into<String>, base_path: impl AsRef<Path>) -> Result<Self> {
        let mut db = Self::new(name, base_path)?;
        db.load_from_file()?;
        Ok(db)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory holding this database's table files.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the file backing table `name`.
    pub fn table_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{name}.{TABLE_EXTENSION}"))
    }

    /// Creates a new table in the database.
    ///
    /// # Errors
    /// Returns [Error::AlreadyExists] if a table with the same name already
    /// exists, or [Error::DuplicateColumn] if two columns share a name.
    pub fn create_table(&mut self, name: impl Into<String>, columns: Vec<Column>) -> Result<()> {
        let name = name.into();
        if self.tables.contains_key(&name) {
            return Err(Error::AlreadyExists(name));
        }
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|other| other.name == column.name) {
                return Err(Error::DuplicateColumn(column.name.clone()));
            }
        }

        info!(database = %self.name, table = %name, columns = columns.len(), "created table");
        let table = Table::with_columns(name.clone(), columns);
        self.tables.insert(name, table);
        Ok(())
    }

    /// Retrieves a reference to a table by name.
    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Retrieves a mutable reference to a table by name.
    pub fn get_table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.get_mut(name)
    }

    /// Removes a table and its file.
    ///
    /// # Errors
    /// Returns [Error::TableNotFound] if the table does not exist, or
    /// [Error::Io] if its file exists but cannot be removed. A table that was
    /// never saved has no file, which is fine.
    pub fn drop_table(&mut self, name: &str) -> Result<()> {
        if !self.tables.contains_key(name) {
            return Err(Error::TableNotFound(name.to_string()));
        }

        match fs::remove_file(self.table_path(name)) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        self.tables.remove(name);
        info!(database = %self.name, table = %name, "dropped table");
        Ok(())
    }

    /// Returns a list of all table names, in no particular order.
    pub fn list_tables(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }

    /// Writes every table to its file.
    ///
    /// Stops at the first failure; tables already written stay written.
    pub fn save_to_file(&self) -> Result<()> {
        for (name, table) in &self.tables {
            table.save_to_file(self.table_path(name))?;
        }
        info!(database = %self.name, tables = self.tables.len(), "saved database");
        Ok(())
    }

    /// Loads every `*.tbl` file of the data directory, naming each table after
    /// its file stem, and returns how many tables were loaded.
    ///
    /// Files that cannot be parsed are skipped with a warning. Loaded tables
    /// replace in-memory tables of the same name.
    ///
    /// # Errors
    /// Only a failure to read the directory itself is reported.
    pub fn load_from_file(&mut self) -> Result<usize> {
        let mut loaded = 0;

        for entry in fs::read_dir(&self.data_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(TABLE_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                warn!(path = %path.display(), "skipping table file with a non UTF-8 name");
                continue;
            };

            match Table::open(&path) {
                Ok(mut table) => {
                    if table.name() != stem {
                        warn!(stored = table.name(), file = stem, "table renamed after its file");
                        table.set_name(stem);
                    }
                    self.tables.insert(stem.to_string(), table);
                    loaded += 1;
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable table file");
                }
            }
        }

        info!(database = %self.name, tables = loaded, "loaded database");
        Ok(loaded)
    }

    /// Approximate memory used by all tables, in bytes.
    pub fn memory_usage(&self) -> usize {
        allocative::size_of_unique(self)
    }
}
