//! Lexer for query string syntax
//!
//! Tokenizes Lucene-style query strings into a stream of tokens. The
//! lexer never fails: every input produces a token stream ending in `Eof`.

/// Token types for query string parsing
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A term (unquoted word, may end with `*`)
    Term(String),
    /// A quoted string (phrase); an unterminated quote runs to end of input
    QuotedString(String),

    /// Colon separator (field:value)
    Colon,
    /// Tilde with optional edit distance
    Tilde(Option<u32>),
    /// Caret for boosting with optional boost value
    Caret(Option<f32>),

    /// Plus sign (required clause)
    Plus,
    /// Minus sign (prohibited clause)
    Minus,

    /// End of input
    Eof,
}

/// Lexer for tokenizing query strings
pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    /// Create a new lexer for the given input string
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Get the next token from the input
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        if self.is_eof() {
            return Token::Eof;
        }

        match self.current_char() {
            ':' => {
                self.advance();
                Token::Colon
            }
            '~' => {
                self.advance();
                Token::Tilde(self.read_unsigned_int())
            }
            '^' => {
                self.advance();
                Token::Caret(self.read_float())
            }
            '+' => {
                self.advance();
                Token::Plus
            }
            '-' => {
                self.advance();
                Token::Minus
            }
            '"' => {
                self.advance();
                self.read_quoted_string()
            }
            _ => self.read_term(),
        }
    }

    /// Check if the lexer has reached the end of input
    pub fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Collect all remaining tokens, including the final `Eof`
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token == Token::Eof;
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    fn read_term(&mut self) -> Token {
        let mut term = String::new();

        while !self.is_eof() {
            let ch = self.current_char();
            if Self::is_term_char(ch) {
                term.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        Token::Term(term)
    }

    fn read_quoted_string(&mut self) -> Token {
        let mut s = String::new();

        while !self.is_eof() {
            let ch = self.current_char();
            self.advance();
            if ch == '"' {
                return Token::QuotedString(s);
            }
            if ch == '\\' && !self.is_eof() {
                s.push(self.current_char());
                self.advance();
            } else {
                s.push(ch);
            }
        }

        Token::QuotedString(s)
    }

    fn read_unsigned_int(&mut self) -> Option<u32> {
        let mut num_str = String::new();

        while !self.is_eof() {
            let ch = self.current_char();
            if ch.is_ascii_digit() {
                num_str.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        num_str.parse().ok()
    }

    fn read_float(&mut self) -> Option<f32> {
        let mut num_str = String::new();
        let mut has_dot = false;

        while !self.is_eof() {
            let ch = self.current_char();
            if ch.is_ascii_digit() {
                num_str.push(ch);
                self.advance();
            } else if ch == '.' && !has_dot {
                has_dot = true;
                num_str.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        num_str.parse().ok()
    }

    fn current_char(&self) -> char {
        self.input[self.position]
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while !self.is_eof() && self.current_char().is_whitespace() {
            self.advance();
        }
    }

    /// Check if a character can be part of a term
    ///
    /// `+` and `-` only act as operators at the start of a term, so
    /// `bert-base` stays one term.
    fn is_term_char(ch: char) -> bool {
        !ch.is_whitespace() && !matches!(ch, '"' | ':' | '~' | '^')
    }
}
