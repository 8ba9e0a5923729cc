use tracing::warn;

use crate::ast::*;
use crate::error::{Error, Result};
use crate::tokenizer::{Token, Tokenizer};
use crate::{Column, DataType, Value};

/// Label for syntax errors raised before the statement kind is known.
const UNKNOWN_STATEMENT: &str = "SQL";

/// Recursive-descent parser with one token of lookahead.
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    kind: Option<StatementKind>,
}

/// Tokenizes and parses a single statement.
///
/// ```
/// # use tabula::parser::parse_sql;
/// # use tabula::ast::Statement;
/// let statement = parse_sql("SHOW TABLES;").unwrap();
/// assert_eq!(statement, Statement::ShowTables);
/// ```
pub fn parse_sql(sql: &str) -> Result<Statement> {
    let tokens = Tokenizer::new(sql).tokenize().map_err(Error::Tokenize)?;
    Parser::new(tokens).parse()
}

/// Converts the text of a literal into a [Value].
///
/// - one pair of matching single or double quotes is stripped and the rest is text;
/// - text containing `.` is read as a real, or kept as text if that fails;
/// - otherwise it is read as a 32-bit integer (the width of a table field),
///   then as `true`/`TRUE`/`false`/`FALSE`;
/// - anything else is text.
///
/// ```
/// # use tabula::{parser::parse_value, Value};
/// assert_eq!(parse_value("'42'"), Value::from("42"));
/// assert_eq!(parse_value("42"), Value::Integer(42));
/// assert_eq!(parse_value("4.5"), Value::Real(4.5));
/// assert_eq!(parse_value("TRUE"), Value::Boolean(true));
/// assert_eq!(parse_value("True"), Value::from("True"));
/// ```
pub fn parse_value(raw: &str) -> Value {
    for quote in ['\'', '"'] {
        if raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote) {
            return Value::Text(raw[1..raw.len() - 1].to_string());
        }
    }

    if raw.contains('.') {
        if let Ok(real) = raw.parse::<f64>() {
            return Value::Real(real);
        }
    } else if let Ok(int) = raw.parse::<i32>() {
        return Value::Integer(int.into());
    }

    match raw {
        "true" | "TRUE" => Value::Boolean(true),
        "false" | "FALSE" => Value::Boolean(false),
        _ => Value::Text(raw.to_string()),
    }
}

impl Parser {
    /// Creates a parser over `tokens`, adding the closing [Token::Eof] if it is missing.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last() != Some(&Token::Eof) {
            tokens.push(Token::Eof);
        }
        Self {
            tokens,
            position: 0,
            kind: None,
        }
    }

    /// Parses one statement, picking the grammar from the leading keyword.
    pub fn parse(&mut self) -> Result<Statement> {
        let kind = match self.current_token() {
            Token::Create => StatementKind::CreateTable,
            Token::Insert => StatementKind::Insert,
            Token::Select => StatementKind::Select,
            Token::Delete => StatementKind::Delete,
            Token::Show => StatementKind::ShowTables,
            _ => return Err(self.error(format!("Unexpected token: {:?}", self.current_token()))),
        };
        self.parse_as(kind)
    }

    /// Parses one statement with the grammar of `kind`.
    pub fn parse_as(&mut self, kind: StatementKind) -> Result<Statement> {
        self.kind = Some(kind);
        let statement = match kind {
            StatementKind::CreateTable => self.parse_create_table(),
            StatementKind::Insert => self.parse_insert(),
            StatementKind::Select => self.parse_select(),
            StatementKind::Delete => self.parse_delete(),
            StatementKind::ShowTables => self.parse_show_tables(),
        }?;

        // semicolon is optional in SQL so skip it
        if matches!(self.current_token(), Token::Semicolon) {
            self.advance();
        }

        // Check we are at the end of the statement
        if !self.is_at_end() {
            return Err(self.error(format!(
                "Unexpected token after statement: {:?}",
                self.current_token()
            )));
        }

        Ok(statement)
    }

    //helpers
    fn error(&self, reason: impl Into<String>) -> Error {
        Error::Syntax {
            statement: self.kind.map_or(UNKNOWN_STATEMENT, StatementKind::label),
            reason: reason.into(),
        }
    }

    fn current_token(&self) -> &Token {
        &self.tokens[self.position]
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.current_token(), Token::Eof)
    }

    fn consume(&mut self, expected: Token) -> Result<()> {
        if *self.current_token() == expected {
            self.advance();
            Ok(())
        } else {
            Err(self.error(format!(
                "Expected {:?}, found {:?}",
                expected,
                self.current_token()
            )))
        }
    }

    /// Reads a table or column name. Keywords are accepted as names, in lowercase.
    fn consume_ident(&mut self) -> Result<String> {
        let name = match self.current_token() {
            Token::Ident(string) => Some(string.clone()),
            token => token.keyword().map(String::from),
        };
        match name {
            Some(name) => {
                self.advance();
                Ok(name)
            }
            None => Err(self.error(format!(
                "Expected identifier, found {:?}",
                self.current_token()
            ))),
        }
    }

    /// Reads a type name. Unknown names fall back to TEXT.
    fn consume_data_type(&mut self, column: &str) -> Result<DataType> {
        let name = match self.current_token() {
            Token::Ident(name) => name.clone(),
            _ => {
                return Err(self.error(format!(
                    "Expected a type for column {column:?}, found {:?}",
                    self.current_token()
                )));
            }
        };
        self.advance();

        Ok(DataType::from_name(&name).unwrap_or_else(|| {
            warn!(column, type_name = %name, "unknown column type, using TEXT");
            DataType::Text
        }))
    }

    /// Reads one literal value, see [parse_value].
    fn consume_value(&mut self) -> Result<Value> {
        let value = match self.current_token() {
            Token::String(s) => Value::Text(s.clone()),
            Token::Number(n) => parse_value(n),
            Token::Ident(word) => parse_value(word),
            Token::Null => Value::Null,
            Token::Minus => {
                self.advance();
                match self.current_token() {
                    Token::Number(n) => parse_value(&format!("-{n}")),
                    other => {
                        return Err(self.error(format!("Expected a number after '-', found {other:?}")));
                    }
                }
            }
            other => return Err(self.error(format!("Expected a value, found {other:?}"))),
        };
        self.advance();
        Ok(value)
    }

    fn parse_column_def(&mut self) -> Result<Column> {
        let name = self.consume_ident()?;
        let data_type = self.consume_data_type(&name)?;
        let mut column = Column::new(name, data_type);

        loop {
            match self.current_token() {
                Token::Comma | Token::RightParen => break,
                Token::Eof => return Err(self.error("Expected ',' or ')'")),
                Token::Primary => {
                    self.advance();
                    if matches!(self.current_token(), Token::Key) {
                        self.advance();
                        column.primary_key = true;
                    } else {
                        warn!(column = %column.name, "PRIMARY without KEY ignored");
                    }
                }
                Token::Not => {
                    self.advance();
                    if matches!(self.current_token(), Token::Null) {
                        self.advance();
                        column.not_null = true;
                    } else {
                        warn!(column = %column.name, "NOT without NULL ignored");
                    }
                }
                Token::AutoIncrement => {
                    self.advance();
                    column.auto_increment = true;
                }
                other => {
                    warn!(column = %column.name, token = ?other, "unrecognized column constraint skipped");
                    self.advance();
                }
            }
        }

        Ok(column)
    }

    fn parse_create_table(&mut self) -> Result<Statement> {
        self.consume(Token::Create)?; // advance if CREATE
        self.consume(Token::Table)?; // advance if TABLE
        let name = self.consume_ident()?;
        self.consume(Token::LeftParen)?;
        if matches!(self.current_token(), Token::RightParen) {
            return Err(self.error("a table needs at least one column"));
        }

        let mut columns = vec![];
        loop {
            columns.push(self.parse_column_def()?);
            match self.current_token() {
                Token::RightParen => {
                    self.advance();
                    break;
                }
                Token::Comma => {
                    self.advance();
                    continue;
                }
                _ => return Err(self.error("Expected ',' or ')'")),
            }
        }
        Ok(Statement::CreateTable(CreateTable { name, columns }))
    }

    fn parse_insert(&mut self) -> Result<Statement> {
        self.consume(Token::Insert)?;
        self.consume(Token::Into)?;
        let table = self.consume_ident()?;
        self.consume(Token::Values)?;
        self.consume(Token::LeftParen)?;

        let mut values = vec![];
        if matches!(self.current_token(), Token::RightParen) {
            self.advance();
            return Ok(Statement::InsertInto(InsertInto { table, values }));
        }
        loop {
            values.push(self.consume_value()?);
            match self.current_token() {
                Token::RightParen => {
                    self.advance();
                    break;
                }
                Token::Comma => self.advance(),
                _ => return Err(self.error("Expected ',' or ')'")),
            }
        }
        Ok(Statement::InsertInto(InsertInto { table, values }))
    }

    fn parse_where(&mut self) -> Result<WhereClause> {
        let column = self.consume_ident()?;
        match self.current_token() {
            Token::Comparison(op) if op == "=" => self.advance(),
            other => {
                return Err(self.error(format!(
                    "only `column = value` filters are supported, found {other:?}"
                )));
            }
        }
        let value = self.consume_value()?;
        Ok(WhereClause { column, value })
    }

    fn parse_select(&mut self) -> Result<Statement> {
        self.consume(Token::Select)?;

        // the column list is not used: every column is returned
        while !matches!(self.current_token(), Token::From | Token::Eof) {
            self.advance();
        }
        self.consume(Token::From)?;
        let table = self.consume_ident()?;

        let where_clause = if matches!(self.current_token(), Token::Where) {
            self.advance();
            Some(self.parse_where()?)
        } else {
            None
        };
        Ok(Statement::Select(Select {
            table,
            where_clause,
        }))
    }

    fn parse_delete(&mut self) -> Result<Statement> {
        self.consume(Token::Delete)?;
        self.consume(Token::From)?;
        let table = self.consume_ident()?;
        self.consume(Token::Where)?;
        let where_clause = self.parse_where()?;
        Ok(Statement::Delete(Delete {
            table,
            where_clause,
        }))
    }

    fn parse_show_tables(&mut self) -> Result<Statement> {
        self.consume(Token::Show)?;
        self.consume(Token::Tables)?;
        Ok(Statement::ShowTables)
    }
}
