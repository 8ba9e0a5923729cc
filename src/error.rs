use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Why a row was refused by [crate::Table::insert_row].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintViolation {
    /// The row does not have one value per column.
    Arity { expected: usize, actual: usize },
    /// A `NOT NULL` column received a null or empty value.
    NotNull { column: String },
    /// The table has no columns to hold a row.
    NoColumns,
}

impl std::fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Arity { expected, actual } => {
                write!(f, "expected {expected} values, got {actual}")
            }
            Self::NotNull { column } => write!(f, "column '{column}' cannot be null"),
            Self::NoColumns => f.write_str("table has no columns"),
        }
    }
}

/// Every failure the engine can report.
///
/// Nothing in the crate panics on bad input; the executor turns each of these
/// into a single `Error: ...` line.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid {statement} syntax: {reason}")]
    Syntax {
        statement: &'static str,
        reason: String,
    },

    #[error("{0}")]
    Tokenize(String),

    #[error("Table '{0}' not found")]
    TableNotFound(String),

    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    #[error("Table '{0}' already exists")]
    AlreadyExists(String),

    #[error("Column '{0}' is defined more than once")]
    DuplicateColumn(String),

    #[error("{0}")]
    Constraint(ConstraintViolation),

    #[error("Unsupported query type")]
    Unsupported,

    #[error("No database selected")]
    NoDatabase,

    #[error("Integer {0} does not fit in a 32-bit table field")]
    IntegerOutOfRange(i64),

    #[error("Corrupt table file: {0}")]
    Corrupt(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ConstraintViolation> for Error {
    fn from(violation: ConstraintViolation) -> Self {
        Self::Constraint(violation)
    }
}
