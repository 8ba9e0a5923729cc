use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use allocative::Allocative;
use tracing::{debug, info};

use crate::codec;
use crate::column::Column;
use crate::error::{ConstraintViolation, Error, Result};
use crate::index::Index;
use crate::row_store::{Row, RowId, RowStore};
use crate::value::Value;

/// A named table: schema, rows, and the indexes kept over them.
///
/// Primary-key columns are indexed automatically. Indexes refer to rows by
/// [RowId], so deleting rows never invalidates the entries of the rows that
/// remain.
#[derive(Debug, Clone, Allocative)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    rows: RowStore,
    /// Column name -> index over that column's values.
    indexes: HashMap<String, Index>,
    /// Next value handed to auto-increment columns. Starts at 1, never goes back.
    next_auto_increment: i64,
}

impl Table {
    /// Creates an empty table without columns.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            rows: RowStore::new(),
            indexes: HashMap::new(),
            next_auto_increment: 1,
        }
    }

    /// Creates an empty table with the given columns.
    pub fn with_columns(name: impl Into<String>, columns: Vec<Column>) -> Self {
        let mut table = Self::new(name);
        for column in columns {
            table.add_column(column);
        }
        table
    }

    /// Appends a column to the schema, creating an index for primary keys.
    pub fn add_column(&mut self, column: Column) {
        if column.primary_key {
            self.indexes.insert(column.name.clone(), Index::new());
        }
        self.columns.push(column);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|col| col.name == name)
    }

    /// Number of rows currently stored.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if lookups on `column` go through an index.
    pub fn is_indexed(&self, column: &str) -> bool {
        self.indexes.contains_key(column)
    }

    /// Approximate heap and inline size of the table, in bytes.
    pub fn memory_usage(&self) -> usize {
        allocative::size_of_unique(self)
    }

    /// Inserts a new row.
    ///
    /// Auto-increment columns always receive the table counter, whatever was
    /// supplied for them. Nothing changes when the row is refused.
    ///
    /// # Errors
    /// - [ConstraintViolation::Arity] if the row does not have one value per column.
    /// - [ConstraintViolation::NotNull] if a `NOT NULL` column gets a null or empty value.
    ///
    /// # Example
    /// ```
    /// # use tabula::{Column, DataType, Table, Value};
    /// let mut table = Table::with_columns(
    ///     "users",
    ///     vec![
    ///         Column::new("id", DataType::Integer).primary_key().auto_increment(),
    ///         Column::new("name", DataType::Text).not_null(),
    ///     ],
    /// );
    /// table.insert_row(vec![Value::Integer(99), Value::from("Ann")]).unwrap();
    ///
    /// let rows = table.select_where("id", &Value::Integer(1)).unwrap();
    /// assert_eq!(rows, vec![vec![Value::Integer(1), Value::from("Ann")]]);
    /// assert!(table.insert_row(vec![Value::Integer(0), Value::Null]).is_err());
    /// ```
    pub fn insert_row(&mut self, mut values: Vec<Value>) -> Result<RowId> {
        if self.columns.is_empty() {
            return Err(ConstraintViolation::NoColumns.into());
        }
        if values.len() != self.columns.len() {
            return Err(ConstraintViolation::Arity {
                expected: self.columns.len(),
                actual: values.len(),
            }
            .into());
        }

        if let Some(column) = self
            .columns
            .iter()
            .zip(&values)
            .find(|(column, value)| column.not_null && value.is_missing())
            .map(|(column, _)| column)
        {
            return Err(ConstraintViolation::NotNull {
                column: column.name.clone(),
            }
            .into());
        }

        for (column, value) in self.columns.iter().zip(values.iter_mut()) {
            if column.auto_increment {
                *value = Value::Integer(self.next_auto_increment);
                self.next_auto_increment += 1;
            }
        }

        let id = self.rows.push(values);
        if let Some(row) = self.rows.get(id) {
            Self::index_row(&self.columns, &mut self.indexes, id, row);
        }
        debug!(table = %self.name, row_id = id.0, "inserted row");
        Ok(id)
    }

    /// Returns a copy of every row, in insertion order.
    pub fn select_all(&self) -> Vec<Row> {
        self.rows.iter().map(|(_, row)| row.clone()).collect()
    }

    /// Returns the rows whose `column` equals `value`, in insertion order.
    ///
    /// Uses the column's index when there is one, a full scan otherwise.
    /// Values of a different kind never match (`1` does not equal `1.0`).
    ///
    /// # Errors
    /// Returns [Error::ColumnNotFound] if the table has no such column.
    pub fn select_where(&self, column: &str, value: &Value) -> Result<Vec<Row>> {
        Ok(self
            .matching_ids(column, value)?
            .into_iter()
            .filter_map(|id| self.rows.get(id).cloned())
            .collect())
    }

    /// Deletes every row whose `column` equals `value` and returns how many
    /// were removed.
    ///
    /// # Errors
    /// Returns [Error::ColumnNotFound] if the table has no such column.
    pub fn delete_where(&mut self, column: &str, value: &Value) -> Result<usize> {
        let ids = self.matching_ids(column, value)?;

        let mut deleted = 0;
        for id in ids {
            let Some(row) = self.rows.remove(id) else {
                continue;
            };
            for (col, value) in self.columns.iter().zip(&row) {
                if let Some(index) = self.indexes.get_mut(&col.name) {
                    index.remove(value, id);
                }
            }
            deleted += 1;
        }

        debug!(table = %self.name, column, deleted, "deleted rows");
        Ok(deleted)
    }

    fn column_position(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|col| col.name == name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    /// Ids of the rows whose `column` equals `value`, in insertion order.
    fn matching_ids(&self, column: &str, value: &Value) -> Result<Vec<RowId>> {
        let position = self.column_position(column)?;

        if let Some(index) = self.indexes.get(column) {
            // ids may outlive their row only if the index drifted; skip those
            return Ok(index
                .find(value)
                .iter()
                .copied()
                .filter(|id| self.rows.get(*id).is_some())
                .collect());
        }

        Ok(self
            .rows
            .iter()
            .filter(|(_, row)| row[position] == *value)
            .map(|(id, _)| id)
            .collect())
    }

    fn index_row(columns: &[Column], indexes: &mut HashMap<String, Index>, id: RowId, row: &Row) {
        for (column, value) in columns.iter().zip(row) {
            if let Some(index) = indexes.get_mut(&column.name) {
                index.insert(value.clone(), id);
            }
        }
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Writes the schema, then every row, in the table file format.
    pub fn write_to(&self, w: &mut impl Write) -> Result<()> {
        codec::write_str(w, &self.name)?;

        codec::write_u64(w, self.columns.len() as u64)?;
        for column in &self.columns {
            codec::write_column(w, column)?;
        }

        codec::write_u64(w, self.rows.len() as u64)?;
        for (_, row) in self.rows.iter() {
            for value in row {
                codec::write_value(w, value)?;
            }
        }
        Ok(())
    }

    /// Replaces the table's contents with a table read from `r`.
    ///
    /// Rows go straight into storage: `NOT NULL` and auto-increment are not
    /// applied to stored data. Indexes are rebuilt from the loaded rows and the
    /// auto-increment counter resumes after the largest stored value.
    /// On error the table is left unchanged.
    pub fn read_from(&mut self, r: &mut impl Read) -> Result<()> {
        let mut table = Self::new(codec::read_str(r)?);

        let column_count = codec::read_len(r)?;
        for _ in 0..column_count {
            table.add_column(codec::read_column(r)?);
        }

        // rows of zero fields take no input, so the count alone can't be trusted
        let row_count = codec::read_len(r)?;
        if column_count == 0 && row_count > 0 {
            return Err(Error::Corrupt(format!("{row_count} rows but no columns")));
        }
        for _ in 0..row_count {
            let row = (0..column_count)
                .map(|_| codec::read_value(r))
                .collect::<Result<Row>>()?;
            let id = table.rows.push(row);
            if let Some(row) = table.rows.get(id) {
                Self::index_row(&table.columns, &mut table.indexes, id, row);
            }
        }

        table.next_auto_increment = table.resume_auto_increment();
        *self = table;
        Ok(())
    }

    fn resume_auto_increment(&self) -> i64 {
        let positions: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, col)| col.auto_increment)
            .map(|(i, _)| i)
            .collect();

        self.rows
            .iter()
            .flat_map(|(_, row)| positions.iter().filter_map(move |&i| row[i].as_int()))
            .max()
            .map_or(1, |max| max.saturating_add(1).max(1))
    }

    /// Writes the table to `path`, replacing any existing file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        info!(table = %self.name, path = %path.display(), rows = self.rows.len(), "saved table");
        Ok(())
    }

    /// Replaces the table's contents with the table stored at `path`.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut reader = BufReader::new(File::open(path)?);
        self.read_from(&mut reader)?;
        info!(table = %self.name, path = %path.display(), rows = self.rows.len(), "loaded table");
        Ok(())
    }

    /// Reads a whole table from `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut table = Self::new(String::new());
        table.load_from_file(path)?;
        Ok(table)
    }
}
