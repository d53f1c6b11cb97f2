//! # Introduction
//!
//! `cminus` is the front end of a compiler for C-minus, a small C-like
//! teaching language. It turns source text into a concrete syntax tree and
//! reports the first lexical or syntax error with its line number.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Scanner → TokenStream → Parser → SyntaxNode → Printer
//! ```
//!
//! 1. [`parser::lexer`]: a character-at-a-time state machine producing
//!    [`parser::Token`]s; the whole source is scanned before parsing.
//! 2. [`parser::stream`]: the immutable token sequence plus an end marker,
//!    read through a movable [`parser::Cursor`].
//! 3. [`parser::parse`]: backtracking recursive descent, one method per
//!    grammar rule, each run in commit or try [`parser::Mode`].
//! 4. [`printer`]: token and tree dumps.
//! 5. [`driver`]: wires the stages together for the binary.
//!
//! ## Example
//!
//! ```
//! use cminus::parser::{tokenize, Parser, Rule};
//!
//! let stream = tokenize("int main(void) { return 0; }").unwrap();
//! let tree = Parser::new(&stream).parse_program().unwrap();
//! assert!(tree.is(Rule::Program));
//! ```

pub mod driver;
pub mod error;
pub mod parser;
pub mod printer;

pub use error::{Error, Result};
