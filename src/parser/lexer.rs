//! Lexer (scanner) for C-minus source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! The scanner is a small deterministic state machine that reads one character
//! at a time and keeps a single character of pushback for operators that need
//! to look one character past their end (`<` vs `<=`, `/` vs `/*`, ...).
//!
//! Lexical errors are not recovered from. The scanner reports them as an
//! [`TokenKind::Exception`] token whose lexeme is the diagnostic code, and
//! [`tokenize`] turns the first such token into a [`LexError`].

use super::stream::TokenStream;
use crate::error::Error;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// All token kinds produced by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Words and literals
    Id,
    Int,
    Type,

    // Keywords
    Return,
    If,
    Else,
    While,

    // Punctuation
    Semi,  // ;
    Comma, // ,
    Lp,    // (
    Rp,    // )
    Lb,    // [
    Rb,    // ]
    Lc,    // {
    Rc,    // }

    // Arithmetic
    Plus,  // +
    Minus, // -
    Star,  // *
    Div,   // /

    // Comparison
    Less,  // <
    Great, // >
    Leq,   // <=
    Geq,   // >=
    Equal, // ==
    Neq,   // !=

    Assign, // =

    /// Synthetic end marker appended after the last real token.
    Eot,
    /// Lexical error; the lexeme carries the diagnostic code.
    Exception,
}

impl TokenKind {
    /// The name used for this kind in token and tree dumps.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Id => "ID",
            TokenKind::Int => "INT",
            TokenKind::Type => "TYPE",
            TokenKind::Return => "RETURN",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::While => "WHILE",
            TokenKind::Semi => "SEMI",
            TokenKind::Comma => "COMMA",
            TokenKind::Lp => "LP",
            TokenKind::Rp => "RP",
            TokenKind::Lb => "LB",
            TokenKind::Rb => "RB",
            TokenKind::Lc => "LC",
            TokenKind::Rc => "RC",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Star => "STAR",
            TokenKind::Div => "DIV",
            TokenKind::Less => "LESS",
            TokenKind::Great => "GREAT",
            TokenKind::Leq => "LEQ",
            TokenKind::Geq => "GEQ",
            TokenKind::Equal => "EQUAL",
            TokenKind::Neq => "NEQ",
            TokenKind::Assign => "ASSIGN",
            TokenKind::Eot => "EOT",
            TokenKind::Exception => "EXCEPTION",
        }
    }

    /// Kind of a one-character token that is complete as soon as it is read.
    fn single(ch: char) -> Option<TokenKind> {
        let kind = match ch {
            ';' => TokenKind::Semi,
            ',' => TokenKind::Comma,
            '(' => TokenKind::Lp,
            ')' => TokenKind::Rp,
            '[' => TokenKind::Lb,
            ']' => TokenKind::Rb,
            '{' => TokenKind::Lc,
            '}' => TokenKind::Rc,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            _ => return None,
        };
        Some(kind)
    }

    /// Reclassify a completed word as a keyword or an identifier.
    fn word(word: &str) -> TokenKind {
        match word {
            "int" | "void" => TokenKind::Type,
            "return" => TokenKind::Return,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            _ => TokenKind::Id,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single lexeme with its kind and the line it was read on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token {{name: {}, line: {}, value: {}}}",
            self.kind, self.line, self.lexeme
        )
    }
}

/// Diagnostic codes for lexical errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexErrorCode {
    /// A character no rule starts with.
    BadChar,
    /// A `!` not followed by `=`.
    BadSharp,
    /// A number running into a letter, or a word running into a digit.
    InvalidToken,
    UnterminatedComment,
    UnexpectedEof,
}

impl LexErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            LexErrorCode::BadChar => "BAD_CHAR",
            LexErrorCode::BadSharp => "BAD_SHARP",
            LexErrorCode::InvalidToken => "INVALID_TOKEN",
            LexErrorCode::UnterminatedComment => "UNTERMINATED_COMMENT",
            LexErrorCode::UnexpectedEof => "UNEXPECTED_EOF",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let code = match code {
            "BAD_CHAR" => LexErrorCode::BadChar,
            "BAD_SHARP" => LexErrorCode::BadSharp,
            "INVALID_TOKEN" => LexErrorCode::InvalidToken,
            "UNTERMINATED_COMMENT" => LexErrorCode::UnterminatedComment,
            "UNEXPECTED_EOF" => LexErrorCode::UnexpectedEof,
            _ => return None,
        };
        Some(code)
    }
}

impl fmt::Display for LexErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lexer error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("lexical error at line {line}, type {code}")]
pub struct LexError {
    pub code: LexErrorCode,
    pub line: usize,
}

impl LexError {
    /// Recover the error carried by an [`TokenKind::Exception`] token.
    pub fn from_token(token: &Token) -> Option<Self> {
        if !token.is(TokenKind::Exception) {
            return None;
        }
        LexErrorCode::from_code(&token.lexeme).map(|code| LexError {
            code,
            line: token.line,
        })
    }
}

/// Scanner states. Every state except `Start` holds a partially read token
/// or sits inside a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    /// Saw `<` or `>`.
    Relational(char),
    Slash,
    Assign,
    Bang,
    Number,
    Word,
    Comment,
    /// Saw `*` inside a comment.
    CommentStar,
}

/// Character-at-a-time scanner over any `char` source.
pub struct Scanner<I: Iterator<Item = char>> {
    chars: I,
    pushback: Option<char>,
    line: usize,
}

impl<'a> Scanner<std::str::Chars<'a>> {
    /// Create a scanner over a source string, starting at line 1.
    pub fn new(source: &'a str) -> Self {
        Scanner::from_chars(source.chars())
    }
}

impl<I: Iterator<Item = char>> Scanner<I> {
    pub fn from_chars(chars: I) -> Self {
        Self {
            chars,
            pushback: None,
            line: 1,
        }
    }

    /// Current value of the line counter.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Scan the next token. Returns `None` once the input ends cleanly.
    pub fn next_token(&mut self) -> Option<Token> {
        let mut state = State::Start;
        let mut lexeme = String::new();

        while let Some(ch) = self.read() {
            match state {
                State::Start => match ch {
                    '\n' => self.line += 1,
                    ' ' | '\t' | '\r' | '\x0b' | '\x0c' => {}
                    '/' => state = State::Slash,
                    '<' | '>' => state = State::Relational(ch),
                    '=' => state = State::Assign,
                    '!' => state = State::Bang,
                    '0'..='9' => {
                        lexeme.push(ch);
                        state = State::Number;
                    }
                    'a'..='z' | 'A'..='Z' => {
                        lexeme.push(ch);
                        state = State::Word;
                    }
                    _ => {
                        return Some(match TokenKind::single(ch) {
                            Some(kind) => self.token(kind, ch.to_string()),
                            None => self.error(LexErrorCode::BadChar),
                        });
                    }
                },
                State::Bang => {
                    // The character after `!` is consumed either way.
                    return Some(if ch == '=' {
                        self.token(TokenKind::Neq, "!=")
                    } else {
                        self.error(LexErrorCode::BadSharp)
                    });
                }
                State::Slash => {
                    if ch == '*' {
                        state = State::Comment;
                    } else {
                        self.unread(ch);
                        return Some(self.token(TokenKind::Div, "/"));
                    }
                }
                State::Relational(first) => {
                    if ch == '=' {
                        let kind = if first == '<' {
                            TokenKind::Leq
                        } else {
                            TokenKind::Geq
                        };
                        return Some(self.token(kind, format!("{first}=")));
                    }
                    self.unread(ch);
                    return Some(self.relational(first));
                }
                State::Assign => {
                    if ch == '=' {
                        return Some(self.token(TokenKind::Equal, "=="));
                    }
                    self.unread(ch);
                    return Some(self.token(TokenKind::Assign, "="));
                }
                State::Number => {
                    if ch.is_ascii_digit() {
                        lexeme.push(ch);
                    } else if ch.is_ascii_alphabetic() {
                        return Some(self.error(LexErrorCode::InvalidToken));
                    } else {
                        self.unread(ch);
                        return Some(self.token(TokenKind::Int, lexeme));
                    }
                }
                State::Word => {
                    if ch.is_ascii_alphabetic() {
                        lexeme.push(ch);
                    } else if ch.is_ascii_digit() {
                        return Some(self.error(LexErrorCode::InvalidToken));
                    } else {
                        self.unread(ch);
                        return Some(self.token(TokenKind::word(&lexeme), lexeme));
                    }
                }
                State::Comment => match ch {
                    '*' => state = State::CommentStar,
                    '\n' => self.line += 1,
                    _ => {}
                },
                State::CommentStar => match ch {
                    '/' => state = State::Start,
                    '*' => {}
                    '\n' => {
                        self.line += 1;
                        state = State::Comment;
                    }
                    _ => state = State::Comment,
                },
            }
        }

        // A token is only complete once the character after it has been seen,
        // so input may end cleanly only between tokens.
        match state {
            State::Start => None,
            State::Comment | State::CommentStar => {
                Some(self.error(LexErrorCode::UnterminatedComment))
            }
            _ => Some(self.error(LexErrorCode::UnexpectedEof)),
        }
    }

    /// Scan the next token, turning an error token into a [`LexError`].
    pub fn try_next(&mut self) -> Result<Option<Token>, LexError> {
        let Some(token) = self.next_token() else {
            return Ok(None);
        };
        match LexError::from_token(&token) {
            Some(err) => {
                debug!(code = %err.code, line = err.line, "lexing aborted");
                Err(err)
            }
            None => Ok(Some(token)),
        }
    }

    fn relational(&self, first: char) -> Token {
        if first == '<' {
            self.token(TokenKind::Less, "<")
        } else {
            self.token(TokenKind::Great, ">")
        }
    }

    fn token(&self, kind: TokenKind, lexeme: impl Into<String>) -> Token {
        Token::new(kind, lexeme, self.line)
    }

    fn error(&self, code: LexErrorCode) -> Token {
        Token::new(TokenKind::Exception, code.as_str(), self.line)
    }

    fn read(&mut self) -> Option<char> {
        self.pushback.take().or_else(|| self.chars.next())
    }

    fn unread(&mut self, ch: char) {
        debug_assert!(self.pushback.is_none(), "only one character of pushback");
        self.pushback = Some(ch);
    }
}

impl<I: Iterator<Item = char>> Iterator for Scanner<I> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

/// Drain a scanner over `source` into a [`TokenStream`], stopping at the
/// first lexical error.
pub fn tokenize(source: &str) -> Result<TokenStream, LexError> {
    let mut scanner = Scanner::new(source);
    let mut tokens = Vec::new();

    while let Some(token) = scanner.try_next()? {
        tokens.push(token);
    }

    debug!(tokens = tokens.len(), lines = scanner.line(), "lexing finished");
    Ok(TokenStream::new(tokens, scanner.line()))
}

/// Like [`tokenize`], but stops scanning as soon as the stream would hold
/// more than `limit` tokens.
pub fn tokenize_with_limit(source: &str, limit: usize) -> Result<TokenStream, Error> {
    let mut scanner = Scanner::new(source);
    let mut tokens = Vec::new();

    while let Some(token) = scanner.try_next()? {
        if tokens.len() == limit {
            debug!(limit, line = token.line, "token limit reached");
            return Err(Error::TooManyTokens { limit });
        }
        tokens.push(token);
    }

    debug!(tokens = tokens.len(), lines = scanner.line(), "lexing finished");
    Ok(TokenStream::new(tokens, scanner.line()))
}
