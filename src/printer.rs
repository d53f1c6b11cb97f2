//! Text dumps of token streams and syntax trees.
//!
//! Tokens print one per line as `Token {name: KIND, line: N, value: lexeme}`.
//! Trees print depth first: a terminal as `KIND: lexeme`, a rule node as
//! `name (line)` followed by its children one level deeper.

use crate::parser::ast::SyntaxNode;
use crate::parser::lexer::Token;
use std::io::{self, Write};

/// Spaces per indentation level unless configured otherwise.
pub const DEFAULT_INDENT_WIDTH: usize = 2;

pub fn write_tokens<W: Write>(out: &mut W, tokens: &[Token]) -> io::Result<()> {
    for token in tokens {
        writeln!(out, "{}", token)?;
    }
    Ok(())
}

/// Indented tree writer.
#[derive(Debug, Clone, Copy)]
pub struct TreePrinter {
    indent_width: usize,
}

impl Default for TreePrinter {
    fn default() -> Self {
        Self::new(DEFAULT_INDENT_WIDTH)
    }
}

impl TreePrinter {
    pub fn new(indent_width: usize) -> Self {
        Self { indent_width }
    }

    /// Write `node` starting at indentation level `level`.
    pub fn write<W: Write>(&self, out: &mut W, node: &SyntaxNode, level: usize) -> io::Result<()> {
        write!(out, "{:width$}", "", width = level * self.indent_width)?;

        match node {
            SyntaxNode::Terminal(token) => writeln!(out, "{}: {}", token.kind, token.lexeme),
            SyntaxNode::NonTerminal(node) => {
                writeln!(out, "{} ({})", node.rule, node.line)?;
                for child in &node.children {
                    self.write(out, child, level + 1)?;
                }
                Ok(())
            }
        }
    }

    pub fn render(&self, node: &SyntaxNode, level: usize) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write(&mut buf, node, level);
        String::from_utf8_lossy(&buf).into_owned()
    }
}
