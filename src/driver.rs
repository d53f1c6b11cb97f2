//! Pipeline driver
//!
//! Runs the front end end to end: scan the whole source into a token stream,
//! optionally dump the tokens, parse from the requested start rule, check
//! that nothing is left over, and dump the tree.

use crate::error::{Error, Result};
use crate::parser::ast::{Rule, SyntaxNode};
use crate::parser::lexer::tokenize_with_limit;
use crate::parser::parse::{Parser, DEFAULT_MAX_DEPTH};
use crate::parser::stream::TokenStream;
use crate::printer::{self, TreePrinter, DEFAULT_INDENT_WIDTH};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// Default cap on the number of tokens in one source file.
pub const DEFAULT_MAX_TOKENS: usize = 1 << 20;

/// Which grammar rule parsing starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartRule {
    #[default]
    Program,
    /// A single expression, for exercising the expression grammar.
    Expression,
}

impl StartRule {
    pub fn rule(self) -> Rule {
        match self {
            StartRule::Program => Rule::Program,
            StartRule::Expression => Rule::Expression,
        }
    }
}

/// What a run does and how it prints.
#[derive(Debug, Clone)]
pub struct Options {
    /// Stop after scanning and dump the tokens.
    pub lex_only: bool,
    /// Dump the tokens before parsing.
    pub dump_tokens: bool,
    pub start: StartRule,
    /// Indentation level of the tree root.
    pub indent: usize,
    /// Spaces per indentation level.
    pub indent_width: usize,
    pub max_tokens: usize,
    /// How deeply statements and expressions may nest.
    pub max_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            lex_only: false,
            dump_tokens: false,
            start: StartRule::Program,
            indent: 0,
            indent_width: DEFAULT_INDENT_WIDTH,
            max_tokens: DEFAULT_MAX_TOKENS,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Read a source file. Bytes that are not valid UTF-8 become U+FFFD, which
/// the scanner rejects as a bad character on the line it appears.
pub fn load(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Scan `source`, enforcing the token limit.
pub fn scan(source: &str, options: &Options) -> Result<TokenStream> {
    tokenize_with_limit(source, options.max_tokens)
}

/// Parse a scanned stream from the configured start rule.
pub fn parse(stream: &TokenStream, options: &Options) -> Result<SyntaxNode> {
    let mut parser = Parser::new(stream).with_max_depth(options.max_depth);
    parser.parse_from(options.start.rule())
}

/// Run the whole pipeline on `source`, writing dumps to `out`.
pub fn run<W: Write>(source: &str, options: &Options, out: &mut W) -> Result<()> {
    let stream = scan(source, options)?;
    debug!(tokens = stream.len(), "scanned");

    if options.lex_only || options.dump_tokens {
        printer::write_tokens(out, stream.tokens())?;
    }
    if options.lex_only {
        return Ok(());
    }

    let tree = parse(&stream, options)?;
    info!(start = %options.start.rule(), "parsed");

    TreePrinter::new(options.indent_width).write(out, &tree, options.indent)?;
    out.flush()?;
    Ok(())
}
