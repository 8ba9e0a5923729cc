use crate::{Column, Value};

/// The statements the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    CreateTable,
    Insert,
    Select,
    Delete,
    ShowTables,
}

impl StatementKind {
    /// Name used in `Invalid ... syntax` messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::CreateTable => "CREATE TABLE",
            Self::Insert => "INSERT",
            Self::Select => "SELECT",
            Self::Delete => "DELETE",
            Self::ShowTables => "SHOW TABLES",
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Statement {
    CreateTable(CreateTable),
    InsertInto(InsertInto),
    Select(Select),
    Delete(Delete),
    ShowTables,
}

#[derive(Debug, PartialEq)]
pub struct CreateTable {
    pub name: String,
    pub columns: Vec<Column>,
}

#[derive(Debug, PartialEq)]
pub struct InsertInto {
    pub table: String,
    pub values: Vec<Value>,
}

/// A single `column = value` filter.
#[derive(Debug, PartialEq)]
pub struct WhereClause {
    pub column: String,
    pub value: Value,
}

/// `SELECT` always returns every column; the listed columns are not kept.
#[derive(Debug, PartialEq)]
pub struct Select {
    pub table: String,
    pub where_clause: Option<WhereClause>,
}

#[derive(Debug, PartialEq)]
pub struct Delete {
    pub table: String,
    pub where_clause: WhereClause,
}
