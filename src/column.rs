use allocative::Allocative;

use crate::data_type::DataType;

/// Represents a column within a table schema.
/// It combines metadata (name, type) with the constraints declared for it.
#[derive(Debug, Clone, PartialEq, Eq, Allocative)]
pub struct Column {
    /// The name of the column, unique within its table.
    pub name: String,
    /// The declared data type of the column.
    pub data_type: DataType,
    /// The column receives an automatic index. Uniqueness is not enforced.
    pub primary_key: bool,
    /// Null or empty values are refused on insert.
    pub not_null: bool,
    /// The table counter replaces whatever value is supplied on insert.
    pub auto_increment: bool,
}

impl Column {
    /// Creates a new column without any constraint.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            primary_key: false,
            not_null: false,
            auto_increment: false,
        }
    }

    /// Marks the column as the primary key.
    ///
    /// # Example
    /// ```
    /// # use tabula::{Column, DataType};
    /// let id = Column::new("id", DataType::Integer).primary_key().auto_increment();
    ///
    /// assert!(id.primary_key);
    /// assert!(id.auto_increment);
    /// assert!(!id.not_null);
    /// ```
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Marks the column as `NOT NULL`.
    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Marks the column as auto-incremented.
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }
}
