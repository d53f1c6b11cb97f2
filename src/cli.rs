//! Command line arguments.

use clap::{ArgAction, Parser};
use cminus::driver::{Options, StartRule, DEFAULT_MAX_TOKENS};
use cminus::parser::DEFAULT_MAX_DEPTH;
use cminus::printer::DEFAULT_INDENT_WIDTH;
use std::path::PathBuf;

/// Scan and parse a C-minus source file, printing its tokens or syntax tree.
#[derive(Parser, Debug)]
#[command(name = "cminus")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Source file to read
    pub source: Option<PathBuf>,

    /// Only tokenize and dump the tokens
    #[arg(short, long)]
    pub lex_only: bool,

    /// Dump the tokens before the syntax tree
    #[arg(short, long)]
    pub debug_lexicon: bool,

    /// Parse a single expression instead of a program
    #[arg(short, long)]
    pub expression: bool,

    /// Indentation level of the tree root
    #[arg(short, long, default_value_t = 0)]
    pub indent: usize,

    /// Spaces per indentation level
    #[arg(long, default_value_t = DEFAULT_INDENT_WIDTH)]
    pub indent_width: usize,

    /// Maximum number of tokens accepted from one file
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: usize,

    /// Maximum nesting depth of statements and expressions
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Log more to stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn options(&self) -> Options {
        Options {
            lex_only: self.lex_only,
            dump_tokens: self.debug_lexicon,
            start: if self.expression {
                StartRule::Expression
            } else {
                StartRule::Program
            },
            indent: self.indent,
            indent_width: self.indent_width,
            max_tokens: self.max_tokens,
            max_depth: self.max_depth,
        }
    }

    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}
