//! C-minus source code parser
//!
//! This module transforms C-minus source text into a syntax tree:
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`stream`]: The scanned token sequence and the cursor moved over it
//! - [`parse`]: Parser core (tokens → syntax tree), split into
//!   `declarations`, `statements` and `expressions`
//! - [`ast`]: Syntax tree node definitions
//!
//! # Supported Language
//!
//! - Types: `int`, `void`, one-dimensional arrays
//! - Declarations: global and local variables, functions
//! - Statements: `if`/`else`, `while`, `return`, blocks, expression statements
//! - Expressions: assignment, `+ - * /`, comparisons, calls, indexing
//! - Block comments `/* ... */`
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with speculative backtracking.
//! Each rule runs either committed (mismatch is fatal) or speculatively
//! (mismatch rewinds the cursor). No external parser generator dependencies.

pub mod ast;
mod declarations;
mod expressions;
pub mod lexer;
pub mod parse;
mod statements;
pub mod stream;

pub use ast::{NonTerminal, Rule, SyntaxNode};
pub use lexer::{tokenize, tokenize_with_limit, LexError, LexErrorCode, Scanner, Token, TokenKind};
pub use parse::{Expectation, Mode, Parser, RuleResult, SyntaxError, DEFAULT_MAX_DEPTH};
pub use stream::{Cursor, TokenStream};
