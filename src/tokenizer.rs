/// Represents the smallest meaningful units (atoms) of the SQL language.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // --- SQL Keywords ---
    Create,
    Table,
    Insert,
    Into,
    Values,
    Select,
    From,
    Where,
    Delete,
    Show,
    Tables,
    Primary,
    Key,
    Not,
    Null,
    /// `AUTO_INCREMENT` or `AUTOINCREMENT`.
    AutoIncrement,

    // --- Identifiers & Literals ---
    /// A name representing a table, a column or a type (e.g., `users`, `INTEGER`).
    /// Bare words that are not keywords also end up here.
    Ident(String),
    /// A numeric literal exactly as written (e.g., `42`, `3.14`, `7.`).
    /// Conversion is left to the parser.
    Number(String),
    /// A string literal without its quotes (e.g., `'Alice'` or `"Alice"`).
    String(String),

    // --- Symbols ---
    /// Left parenthesis `(`
    LeftParen,
    /// Right parenthesis `)`
    RightParen,
    /// Comma `,`
    Comma,
    /// Semicolon `;`
    Semicolon,
    /// A run of comparison characters: `=`, `<`, `>`, `<=`, `!=`, `<>`, ...
    Comparison(String),
    /// Plus `+`
    Plus,
    /// Minus `-`
    Minus,
    /// Multiplication or wildcard symbol `*`
    Star,
    /// Slash `/`
    Slash,

    // --- Special ---
    /// Represents the End Of File/Input.
    Eof,
}

impl Token {
    /// The keyword's name in lowercase, or `None` if the token is not a keyword.
    pub fn keyword(&self) -> Option<&'static str> {
        let word = match self {
            Self::Create => "create",
            Self::Table => "table",
            Self::Insert => "insert",
            Self::Into => "into",
            Self::Values => "values",
            Self::Select => "select",
            Self::From => "from",
            Self::Where => "where",
            Self::Delete => "delete",
            Self::Show => "show",
            Self::Tables => "tables",
            Self::Primary => "primary",
            Self::Key => "key",
            Self::Not => "not",
            Self::Null => "null",
            Self::AutoIncrement => "auto_increment",
            _ => return None,
        };
        Some(word)
    }
}

/// A lexical scanner (lexer) that converts a raw SQL string into a sequence of [Token]s.
pub struct Tokenizer {
    /// The input string stored as a vector of characters for easy iteration.
    input: Vec<char>,
    /// The current position in the character vector.
    position: usize,
}

impl Tokenizer {
    /// Creates a new Tokenizer for the given input string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Processes the entire input and returns a vector of tokens, always
    /// terminated by [Token::Eof].
    ///
    /// # Errors
    /// Returns an error if an unsupported character is encountered or if a
    /// literal (like a string) is malformed.
    ///
    /// # Example
    /// ```
    /// # use tabula::tokenizer::{Tokenizer, Token};
    /// let mut t = Tokenizer::new("select * from users");
    /// let tokens = t.tokenize().unwrap();
    /// assert_eq!(tokens[0], Token::Select);
    /// assert_eq!(tokens[3], Token::Ident("users".into()));
    /// ```
    pub fn tokenize(&mut self) -> Result<Vec<Token>, String> {
        let mut tokens = Vec::new();

        while !self.is_at_end() {
            self.skip_whitespace();

            if self.is_at_end() {
                break;
            }

            let token = self.next_token()?;
            tokens.push(token);
        }

        tokens.push(Token::Eof);
        Ok(tokens)
    }

    /// Identifies the next token based on the character at the current position.
    fn next_token(&mut self) -> Result<Token, String> {
        let ch = self.current_char();

        let single = match ch {
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            ',' => Some(Token::Comma),
            ';' => Some(Token::Semicolon),
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Star),
            '/' => Some(Token::Slash),
            _ => None,
        };
        if let Some(token) = single {
            self.advance();
            return Ok(token);
        }

        match ch {
            '=' | '<' | '>' | '!' => Ok(self.read_comparison()),
            c if c.is_ascii_alphabetic() || c == '_' => Ok(self.read_identifier()),
            c if c.is_ascii_digit() => self.read_number(),
            '\'' | '"' => self.read_string(ch),
            _ => Err(format!("character: {:?} is not supported", ch)),
        }
    }

    // --- Navigation Helpers ---

    /// Returns the character at the current position.
    fn current_char(&self) -> char {
        self.input[self.position]
    }

    /// Moves the cursor forward by one character.
    fn advance(&mut self) {
        self.position += 1;
    }

    /// Checks if the cursor has reached the end of the input.
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Consumes any whitespace characters (spaces, tabs, newlines).
    fn skip_whitespace(&mut self) {
        while !self.is_at_end() && self.current_char().is_whitespace() {
            self.advance();
        }
    }

    /// Consumes characters while `pred` holds and returns them.
    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while !self.is_at_end() && pred(self.current_char()) {
            out.push(self.current_char());
            self.advance();
        }
        out
    }

    // --- Extraction Logic ---

    /// Reads a sequence of alphanumeric characters and determines if it's
    /// a reserved SQL keyword or a user-defined identifier.
    ///
    /// Keywords are matched case-insensitively; identifiers keep their case.
    fn read_identifier(&mut self) -> Token {
        let ident = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');

        match ident.to_uppercase().as_str() {
            "CREATE" => Token::Create,
            "TABLE" => Token::Table,
            "INSERT" => Token::Insert,
            "INTO" => Token::Into,
            "VALUES" => Token::Values,
            "SELECT" => Token::Select,
            "FROM" => Token::From,
            "WHERE" => Token::Where,
            "DELETE" => Token::Delete,
            "SHOW" => Token::Show,
            "TABLES" => Token::Tables,
            "PRIMARY" => Token::Primary,
            "KEY" => Token::Key,
            "NOT" => Token::Not,
            "NULL" => Token::Null,
            "AUTO_INCREMENT" | "AUTOINCREMENT" => Token::AutoIncrement,
            _ => Token::Ident(ident),
        }
    }

    /// Reads digits with at most one `.`, keeping the text as written.
    fn read_number(&mut self) -> Result<Token, String> {
        let mut number = self.take_while(|c| c.is_ascii_digit());

        if !self.is_at_end() && self.current_char() == '.' {
            number.push('.');
            self.advance();
            number.push_str(&self.take_while(|c| c.is_ascii_digit()));
        }

        if !self.is_at_end() && self.current_char() == '.' {
            return Err("multiple dots are not allowed in a number".into());
        }

        Ok(Token::Number(number))
    }

    /// Reads a string literal enclosed in `quote` characters.
    fn read_string(&mut self, quote: char) -> Result<Token, String> {
        self.advance(); // Skip the opening quote

        let string = self.take_while(|c| c != quote);

        if self.is_at_end() {
            return Err("Unterminated string".into());
        }

        // Skip the closing quote
        self.advance();

        Ok(Token::String(string))
    }

    /// Reads a run of comparison characters as one operator.
    fn read_comparison(&mut self) -> Token {
        Token::Comparison(self.take_while(|c| matches!(c, '=' | '<' | '>' | '!')))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(sql: &str) -> Vec<Token> {
        Tokenizer::new(sql).tokenize().unwrap()
    }

    #[test]
    fn test_tokenize_simple() {
        assert_eq!(
            tokenize("CREATE TABLE users"),
            vec![
                Token::Create,
                Token::Table,
                Token::Ident("users".into()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_ignore_case_identifiers_keep_it() {
        assert_eq!(
            tokenize("insert Into MyTable values"),
            vec![
                Token::Insert,
                Token::Into,
                Token::Ident("MyTable".into()),
                Token::Values,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_with_parens() {
        assert_eq!(
            tokenize("(id, name);"),
            vec![
                Token::LeftParen,
                Token::Ident("id".into()),
                Token::Comma,
                Token::Ident("name".into()),
                Token::RightParen,
                Token::Semicolon,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_create_table() {
        assert_eq!(
            tokenize("CREATE TABLE t (id INTEGER PRIMARY KEY AUTO_INCREMENT, name TEXT NOT NULL)"),
            vec![
                Token::Create,
                Token::Table,
                Token::Ident("t".into()),
                Token::LeftParen,
                Token::Ident("id".into()),
                Token::Ident("INTEGER".into()),
                Token::Primary,
                Token::Key,
                Token::AutoIncrement,
                Token::Comma,
                Token::Ident("name".into()),
                Token::Ident("TEXT".into()),
                Token::Not,
                Token::Null,
                Token::RightParen,
                Token::Eof,
            ]
        );
        assert_eq!(tokenize("autoincrement"), vec![Token::AutoIncrement, Token::Eof]);
    }

    #[test]
    fn test_tokenize_numbers() {
        assert_eq!(
            tokenize("42, 3.14, 7."),
            vec![
                Token::Number("42".into()),
                Token::Comma,
                Token::Number("3.14".into()),
                Token::Comma,
                Token::Number("7.".into()),
                Token::Eof,
            ]
        );
        assert!(Tokenizer::new("1.2.3").tokenize().is_err());
    }

    #[test]
    fn test_tokenize_strings() {
        assert_eq!(
            tokenize(r#"'Alice', "Bob Dylan", '', 'say "hi"'"#),
            vec![
                Token::String("Alice".into()),
                Token::Comma,
                Token::String("Bob Dylan".into()),
                Token::Comma,
                Token::String(String::new()),
                Token::Comma,
                Token::String("say \"hi\"".into()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_string() {
        assert!(Tokenizer::new("'hello").tokenize().is_err());
        assert!(Tokenizer::new("\"hello'").tokenize().is_err());
    }

    #[test]
    fn test_comparison_runs_and_operators() {
        assert_eq!(
            tokenize("a = 1 b<>2 c>=-3 * /"),
            vec![
                Token::Ident("a".into()),
                Token::Comparison("=".into()),
                Token::Number("1".into()),
                Token::Ident("b".into()),
                Token::Comparison("<>".into()),
                Token::Number("2".into()),
                Token::Ident("c".into()),
                Token::Comparison(">=".into()),
                Token::Minus,
                Token::Number("3".into()),
                Token::Star,
                Token::Slash,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_keyword_names() {
        assert_eq!(tokenize("Key")[0].keyword(), Some("key"));
        assert_eq!(tokenize("AUTOINCREMENT")[0].keyword(), Some("auto_increment"));
        assert_eq!(Token::Ident("id".into()).keyword(), None);
        assert_eq!(Token::Comma.keyword(), None);
    }

    #[test]
    fn test_unsupported_character() {
        assert!(Tokenizer::new("SELECT @x").tokenize().is_err());
    }
}
