//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, cursor helpers, and the parse entry points.
//!
//! # Parser Architecture
//!
//! The Parser is a backtracking recursive descent parser with one method per
//! grammar rule:
//! - This module: Parser struct, helper methods, and coordination
//! - `declarations`: program, declarations, parameters
//! - `statements`: compound statements and the four statement forms
//! - `expressions`: assignment, comparison, arithmetic, calls
//!
//! # Commit and try
//!
//! Every rule takes a [`Mode`]. In [`Mode::Commit`] a mismatch is fatal and
//! comes back as `Err(SyntaxError)`. In [`Mode::Try`] a mismatch restores the
//! cursor to where the rule started and returns `Ok(None)`, so the caller can
//! try another production. `Ok(None)` is never an error; only commit-mode
//! mismatches are.
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared cursor.

use super::ast::{Rule, SyntaxNode};
use super::lexer::{Token, TokenKind};
use super::stream::{Cursor, TokenStream};
use crate::error::Error;
use std::fmt;
use thiserror::Error;
use tracing::{debug, trace};

/// How a rule reacts to input it cannot match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Mismatch is a reported syntax error.
    Commit,
    /// Mismatch rewinds the cursor and yields `None`.
    Try,
}

/// What a failing rule was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    Token(TokenKind),
    /// No production of the rule applies.
    Malformed,
    /// Statements or expressions nest deeper than the parser allows.
    TooDeep,
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::Token(kind) => write!(f, "expected {}", kind),
            Expectation::Malformed => f.write_str("malformed"),
            Expectation::TooDeep => f.write_str("nesting too deep"),
        }
    }
}

/// Parser error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Syntax error at line {line} ({expectation} in {rule})")]
pub struct SyntaxError {
    pub line: usize,
    pub expectation: Expectation,
    pub rule: Rule,
}

/// Result of a single grammar rule: a node, absence (try mode only), or a
/// fatal error (commit mode only).
pub type RuleResult = Result<Option<SyntaxNode>, SyntaxError>;

/// Default bound on how deeply statements and expressions may nest.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Backtracking recursive descent parser over a [`TokenStream`]
pub struct Parser<'a> {
    pub(crate) stream: &'a TokenStream,
    pub(crate) cursor: Cursor,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(stream: &'a TokenStream) -> Self {
        Self {
            stream,
            cursor: Cursor::default(),
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set how many statements or expressions may enclose one another.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parse a whole program and require that it consumes every token.
    pub fn parse_program(&mut self) -> Result<SyntaxNode, Error> {
        self.parse_from(Rule::Program)
    }

    /// Parse a single expression and require that it consumes every token.
    pub fn parse_expression(&mut self) -> Result<SyntaxNode, Error> {
        self.parse_from(Rule::Expression)
    }

    /// Parse starting at `rule` in commit mode, then check that the cursor
    /// sits on the end-of-input token.
    pub fn parse_from(&mut self, rule: Rule) -> Result<SyntaxNode, Error> {
        debug!(start = %rule, tokens = self.stream.len(), "parsing");
        let tree = match self.parse_rule(rule, Mode::Commit)? {
            Some(tree) => tree,
            // Commit mode reports mismatches itself; treat a silent miss the same way.
            None => return Err(self.error(Expectation::Malformed, rule).into()),
        };

        if self.cursor != self.stream.end() {
            let line = self.peek().line;
            debug!(at = self.cursor.index(), end = self.stream.end().index(), "tokens left over");
            return Err(Error::ExtraTokens { line });
        }

        Ok(tree)
    }

    /// Run a single grammar rule at the current cursor.
    pub fn parse_rule(&mut self, rule: Rule, mode: Mode) -> RuleResult {
        match rule {
            Rule::Program => self.program(mode),
            Rule::DeclarationList => self.declaration_list(mode),
            Rule::Declaration => self.declaration(mode),
            Rule::VarDeclaration => self.var_declaration(mode),
            Rule::FunDeclaration => self.fun_declaration(mode),
            Rule::Params => self.params(mode),
            Rule::ParamList => self.param_list(mode),
            Rule::Param => self.param(mode),
            Rule::CompoundStmt => self.compound_stmt(mode),
            Rule::LocalDeclarations => self.local_declarations(mode),
            Rule::StatementList => self.statement_list(mode),
            Rule::Statement => self.statement(mode),
            Rule::ExpressionStmt => self.expression_stmt(mode),
            Rule::SelectionStmt => self.selection_stmt(mode),
            Rule::IterationStmt => self.iteration_stmt(mode),
            Rule::ReturnStmt => self.return_stmt(mode),
            Rule::Expression => self.expression(mode),
            Rule::Var => self.var(mode),
            Rule::SimpleExpression => self.simple_expression(mode),
            Rule::AdditiveExpression => self.additive_expression(mode),
            Rule::Relop => self.relop(mode),
            Rule::Addop => self.addop(mode),
            Rule::Mulop => self.mulop(mode),
            Rule::Term => self.term(mode),
            Rule::Factor => self.factor(mode),
            Rule::Call => self.call(mode),
            Rule::Args => self.args(mode),
            Rule::ArgList => self.arg_list(mode),
        }
    }

    /// Current cursor; pass it to [`Parser::restore`] to backtrack.
    pub fn position(&self) -> Cursor {
        self.cursor
    }

    pub fn restore(&mut self, cursor: Cursor) {
        debug_assert!(cursor <= self.stream.end());
        self.cursor = cursor;
    }

    // ===== Helper methods =====

    pub(crate) fn peek(&self) -> &'a Token {
        self.stream.get(self.cursor)
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> &'a Token {
        self.stream.get(self.cursor.offset(n))
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek().is(kind)
    }

    pub(crate) fn check_ahead(&self, n: usize, kind: TokenKind) -> bool {
        self.peek_ahead(n).is(kind)
    }

    pub(crate) fn line(&self) -> usize {
        self.peek().line
    }

    /// Consume the current token as a terminal node. The cursor never moves
    /// past the end-of-input token.
    pub(crate) fn advance(&mut self) -> SyntaxNode {
        let token = self.peek();
        if self.cursor < self.stream.end() {
            self.cursor = self.cursor.next();
        }
        SyntaxNode::Terminal(token.clone())
    }

    /// Consume a token of `kind`. On mismatch, commit mode reports the
    /// expectation; try mode yields `None` and leaves rewinding to the caller.
    pub(crate) fn expect(&mut self, kind: TokenKind, mode: Mode, rule: Rule) -> RuleResult {
        if self.check(kind) {
            return Ok(Some(self.advance()));
        }
        match mode {
            Mode::Commit => Err(self.error(Expectation::Token(kind), rule)),
            Mode::Try => Ok(None),
        }
    }

    /// Fail `rule` at the current token: report in commit mode, rewind to
    /// `start` in try mode.
    pub(crate) fn fail(
        &mut self,
        start: Cursor,
        mode: Mode,
        expectation: Expectation,
        rule: Rule,
    ) -> RuleResult {
        match mode {
            Mode::Commit => Err(self.error(expectation, rule)),
            Mode::Try => self.rewind(start, rule),
        }
    }

    /// No production of `rule` applies at the current token.
    pub(crate) fn malformed(&mut self, start: Cursor, mode: Mode, rule: Rule) -> RuleResult {
        self.fail(start, mode, Expectation::Malformed, rule)
    }

    /// Abandon `rule`: put the cursor back where it started and report absence.
    pub(crate) fn rewind(&mut self, start: Cursor, rule: Rule) -> RuleResult {
        trace!(%rule, from = self.cursor.index(), to = start.index(), "rewind");
        self.restore(start);
        Ok(None)
    }

    /// Run `body` one nesting level deeper. Exceeding the depth bound is
    /// fatal in either mode.
    pub(crate) fn nested<F>(&mut self, rule: Rule, body: F) -> RuleResult
    where
        F: FnOnce(&mut Self) -> RuleResult,
    {
        if self.depth >= self.max_depth {
            debug!(%rule, depth = self.depth, "nesting limit reached");
            return Err(self.error(Expectation::TooDeep, rule));
        }
        self.depth += 1;
        let result = body(self);
        self.depth -= 1;
        result
    }

    /// Return the separator just consumed to the stream.
    pub(crate) fn give_back(&mut self, rule: Rule) {
        trace!(%rule, at = self.cursor.index(), "give back separator");
        self.cursor = self.cursor.prev();
    }

    pub(crate) fn error(&self, expectation: Expectation, rule: Rule) -> SyntaxError {
        SyntaxError {
            line: self.line(),
            expectation,
            rule,
        }
    }

    /// Fold `first (separator element)*` into a left-associative `rule` node.
    ///
    /// The loop stops at the first separator or element that does not match.
    /// A separator whose element fails is given back. When nothing was folded
    /// the result is `rule(first)`.
    pub(crate) fn fold_left<S, E>(
        &mut self,
        rule: Rule,
        first: SyntaxNode,
        mut separator: S,
        mut element: E,
    ) -> Result<SyntaxNode, SyntaxError>
    where
        S: FnMut(&mut Self) -> RuleResult,
        E: FnMut(&mut Self) -> RuleResult,
    {
        let mut left = first;
        let mut folded = false;

        while let Some(sep) = separator(self)? {
            let Some(next) = element(self)? else {
                self.give_back(rule);
                break;
            };
            left = SyntaxNode::node(rule, vec![left, sep, next]);
            folded = true;
        }

        if folded {
            Ok(left)
        } else {
            Ok(SyntaxNode::node(rule, vec![left]))
        }
    }

    /// Fold `items` into a right-nested list: `rule(head)` for the last item,
    /// `rule(head, rest)` before it, and the ε node when there are none.
    pub(crate) fn nest_right(
        &self,
        rule: Rule,
        items: Vec<SyntaxNode>,
        empty_line: usize,
    ) -> SyntaxNode {
        let mut items = items.into_iter().rev();
        let Some(last) = items.next() else {
            return SyntaxNode::empty(rule, empty_line);
        };
        items.fold(SyntaxNode::node(rule, vec![last]), |rest, head| {
            SyntaxNode::node(rule, vec![head, rest])
        })
    }
}
