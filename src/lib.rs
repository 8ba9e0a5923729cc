pub mod ast;
pub mod codec;
pub mod column;
pub mod config;
pub mod data_type;
pub mod database;
pub mod error;
pub mod executor;
pub mod index;
pub mod parser;
pub mod row_store;
pub mod session;
pub mod table;
pub mod tokenizer;
pub mod value;

pub use column::Column;
pub use config::Config;
pub use data_type::DataType;
pub use database::Database;
pub use error::{ConstraintViolation, Error, Result};
pub use executor::{Output, QueryResult, execute};
pub use index::Index;
pub use row_store::{Row, RowId, RowStore};
pub use session::Session;
pub use table::Table;
pub use value::Value;
