//! Statement parsing implementation
//!
//! This module handles parsing of all C-minus statement types:
//!
//! - Compound statements: `{ local declarations, statements }`
//! - Control flow: `if`/`else`, `while`
//! - `return` with or without a value
//! - Expression statements, including the empty statement `;`
//!
//! # Grammar
//!
//! ```text
//! compound_stmt      ::= "{" local_declarations statement_list "}"
//! local_declarations ::= var_declaration local_declarations | ε
//! statement_list     ::= statement statement_list | ε
//! statement          ::= expression_stmt | compound_stmt | selection_stmt
//!                      | iteration_stmt | return_stmt
//! selection_stmt     ::= "if" "(" expression ")" statement [ "else" statement ]
//! iteration_stmt     ::= "while" "(" expression ")" statement
//! return_stmt        ::= "return" [ expression ] ";"
//! expression_stmt    ::= [ expression ] ";"
//! ```
//!
//! An `else` always binds to the nearest `if`: `selection_stmt` takes it as
//! soon as its first branch is done.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::{Rule, SyntaxNode};
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{Mode, Parser, RuleResult};

impl Parser<'_> {
    pub(crate) fn compound_stmt(&mut self, mode: Mode) -> RuleResult {
        let start = self.position();
        let rule = Rule::CompoundStmt;

        let Some(lc) = self.expect(TokenKind::Lc, mode, rule)? else {
            return self.rewind(start, rule);
        };
        let Some(locals) = self.local_declarations(mode)? else {
            return self.rewind(start, rule);
        };
        let Some(statements) = self.statement_list(mode)? else {
            return self.rewind(start, rule);
        };
        let Some(rc) = self.expect(TokenKind::Rc, mode, rule)? else {
            return self.rewind(start, rule);
        };

        Ok(Some(SyntaxNode::node(rule, vec![lc, locals, statements, rc])))
    }

    /// Variable declarations are tried speculatively; the first miss ends
    /// the list. Never absent.
    pub(crate) fn local_declarations(&mut self, _mode: Mode) -> RuleResult {
        let mut declarations = Vec::new();
        while let Some(declaration) = self.var_declaration(Mode::Try)? {
            declarations.push(declaration);
        }
        Ok(Some(self.nest_right(Rule::LocalDeclarations, declarations, self.line())))
    }

    /// The first statement is only optional when the block is already at
    /// its closing `}`; after it, statements are tried speculatively.
    pub(crate) fn statement_list(&mut self, mode: Mode) -> RuleResult {
        let start = self.position();
        let first_mode = if self.check(TokenKind::Rc) { Mode::Try } else { mode };

        let Some(first) = self.statement(first_mode)? else {
            if self.check(TokenKind::Rc) {
                return Ok(Some(SyntaxNode::empty(Rule::StatementList, self.line())));
            }
            return self.rewind(start, Rule::StatementList);
        };

        let mut statements = vec![first];
        while let Some(statement) = self.statement(Mode::Try)? {
            statements.push(statement);
        }
        Ok(Some(self.nest_right(Rule::StatementList, statements, self.line())))
    }

    pub(crate) fn statement(&mut self, mode: Mode) -> RuleResult {
        self.nested(Rule::Statement, |p| p.statement_kind(mode))
    }

    /// Dispatch on the leading keyword; anything else is an expression statement.
    fn statement_kind(&mut self, mode: Mode) -> RuleResult {
        let inner = match self.peek().kind {
            TokenKind::Return => self.return_stmt(mode)?,
            TokenKind::While => self.iteration_stmt(mode)?,
            TokenKind::Lc => self.compound_stmt(mode)?,
            TokenKind::If => self.selection_stmt(mode)?,
            _ => self.expression_stmt(mode)?,
        };

        Ok(inner.map(|inner| SyntaxNode::node(Rule::Statement, vec![inner])))
    }

    pub(crate) fn expression_stmt(&mut self, mode: Mode) -> RuleResult {
        let start = self.position();
        let rule = Rule::ExpressionStmt;

        if self.check(TokenKind::Semi) {
            let semi = self.advance();
            return Ok(Some(SyntaxNode::node(rule, vec![semi])));
        }

        let Some(expression) = self.expression(mode)? else {
            return self.rewind(start, rule);
        };
        let Some(semi) = self.expect(TokenKind::Semi, mode, rule)? else {
            return self.rewind(start, rule);
        };
        Ok(Some(SyntaxNode::node(rule, vec![expression, semi])))
    }

    pub(crate) fn selection_stmt(&mut self, mode: Mode) -> RuleResult {
        let start = self.position();
        let rule = Rule::SelectionStmt;

        let Some(if_kw) = self.expect(TokenKind::If, mode, rule)? else {
            return self.rewind(start, rule);
        };
        let Some(lp) = self.expect(TokenKind::Lp, mode, rule)? else {
            return self.rewind(start, rule);
        };
        let Some(condition) = self.expression(mode)? else {
            return self.rewind(start, rule);
        };
        let Some(rp) = self.expect(TokenKind::Rp, mode, rule)? else {
            return self.rewind(start, rule);
        };
        let Some(then_branch) = self.statement(mode)? else {
            return self.rewind(start, rule);
        };

        if !self.check(TokenKind::Else) {
            return Ok(Some(SyntaxNode::node(
                rule,
                vec![if_kw, lp, condition, rp, then_branch],
            )));
        }

        let else_kw = self.advance();
        let Some(else_branch) = self.statement(mode)? else {
            return self.rewind(start, rule);
        };
        Ok(Some(SyntaxNode::node(
            rule,
            vec![if_kw, lp, condition, rp, then_branch, else_kw, else_branch],
        )))
    }

    pub(crate) fn iteration_stmt(&mut self, mode: Mode) -> RuleResult {
        let start = self.position();
        let rule = Rule::IterationStmt;

        let Some(while_kw) = self.expect(TokenKind::While, mode, rule)? else {
            return self.rewind(start, rule);
        };
        let Some(lp) = self.expect(TokenKind::Lp, mode, rule)? else {
            return self.rewind(start, rule);
        };
        let Some(condition) = self.expression(mode)? else {
            return self.rewind(start, rule);
        };
        let Some(rp) = self.expect(TokenKind::Rp, mode, rule)? else {
            return self.rewind(start, rule);
        };
        let Some(body) = self.statement(mode)? else {
            return self.rewind(start, rule);
        };

        Ok(Some(SyntaxNode::node(rule, vec![while_kw, lp, condition, rp, body])))
    }

    pub(crate) fn return_stmt(&mut self, mode: Mode) -> RuleResult {
        let start = self.position();
        let rule = Rule::ReturnStmt;

        let Some(return_kw) = self.expect(TokenKind::Return, mode, rule)? else {
            return self.rewind(start, rule);
        };

        if self.check(TokenKind::Semi) {
            let semi = self.advance();
            return Ok(Some(SyntaxNode::node(rule, vec![return_kw, semi])));
        }

        let Some(value) = self.expression(mode)? else {
            return self.rewind(start, rule);
        };
        let Some(semi) = self.expect(TokenKind::Semi, mode, rule)? else {
            return self.rewind(start, rule);
        };
        Ok(Some(SyntaxNode::node(rule, vec![return_kw, value, semi])))
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::{Rule, SyntaxNode};
    use crate::parser::lexer::tokenize;
    use crate::parser::parse::{Mode, Parser};
    use crate::parser::stream::Cursor;

    fn statement(source: &str) -> SyntaxNode {
        let stream = tokenize(source).unwrap();
        let mut parser = Parser::new(&stream);
        let node = parser.parse_rule(Rule::Statement, Mode::Commit).unwrap().unwrap();
        assert_eq!(parser.position(), stream.end(), "statement should consume {source:?}");
        node
    }

    #[test]
    fn test_empty_block() {
        let block = statement("{ }").child(0).unwrap().clone();

        assert!(block.is(Rule::CompoundStmt));
        assert_eq!(block.children().len(), 4);
        assert!(block.child(1).unwrap().children().is_empty());
        assert!(block.child(2).unwrap().children().is_empty());
    }

    #[test]
    fn test_block_with_locals_and_statements() {
        let block = statement("{ int x; int y[3]; x = 1; ; return x; }");
        let compound = block.child(0).unwrap();

        let locals = compound.child(1).unwrap();
        assert_eq!(locals.children().len(), 2);
        assert_eq!(locals.child(1).unwrap().children().len(), 1);

        let statements = compound.child(2).unwrap();
        assert_eq!(statements.children().len(), 2);
        let rest = statements.child(1).unwrap();
        assert_eq!(rest.children().len(), 2);
        let last = rest.child(1).unwrap();
        assert_eq!(last.children().len(), 1);
        assert!(last.child(0).unwrap().child(0).unwrap().is(Rule::ReturnStmt));
    }

    #[test]
    fn test_if_else() {
        let stmt = statement("if (x) return; else return 1;");
        let selection = stmt.child(0).unwrap();

        assert!(selection.is(Rule::SelectionStmt));
        assert_eq!(selection.children().len(), 7);
    }

    #[test]
    fn test_dangling_else_binds_inner() {
        let stmt = statement("if (x) if (y) return; else return;");
        let outer = stmt.child(0).unwrap();
        assert_eq!(outer.children().len(), 5);

        let inner = outer.child(4).unwrap().child(0).unwrap();
        assert!(inner.is(Rule::SelectionStmt));
        assert_eq!(inner.children().len(), 7);
    }

    #[test]
    fn test_while() {
        let stmt = statement("while (i < 10) i = i + 1;");
        let iteration = stmt.child(0).unwrap();

        assert!(iteration.is(Rule::IterationStmt));
        assert_eq!(iteration.children().len(), 5);
    }

    #[test]
    fn test_return_forms() {
        assert_eq!(statement("return;").child(0).unwrap().children().len(), 2);
        assert_eq!(statement("return a[1];").child(0).unwrap().children().len(), 3);
    }

    #[test]
    fn test_empty_statement() {
        let stmt = statement(";");
        assert_eq!(stmt.child(0).unwrap().children().len(), 1);
    }

    #[test]
    fn test_failed_statement_rewinds() {
        let stream = tokenize("if (x) y = ;").unwrap();
        let mut parser = Parser::new(&stream);

        let result = parser.parse_rule(Rule::Statement, Mode::Try).unwrap();
        assert!(result.is_none());
        assert_eq!(parser.position(), Cursor::new(0));
    }

    #[test]
    fn test_statement_errors() {
        let cases = [
            (
                "int main(void) { if x) ; }",
                "Syntax error at line 1 (expected LP in selection_stmt)",
            ),
            (
                "int main(void) { while (x ; }",
                "Syntax error at line 1 (expected RP in iteration_stmt)",
            ),
            (
                "int main(void) {\nx = 1\n}",
                "Syntax error at line 3 (expected SEMI in expression_stmt)",
            ),
            (
                "int main(void) { x = 1; y = ; }",
                "Syntax error at line 1 (expected RC in compound_stmt)",
            ),
            ("int main(void) { x = 1;", "Syntax error at line 1 (expected RC in compound_stmt)"),
        ];

        for (source, message) in cases {
            let stream = tokenize(source).unwrap();
            let mut parser = Parser::new(&stream);
            let err = parser.parse_program().unwrap_err();
            assert_eq!(err.to_string(), message, "source: {source:?}");
        }
    }

    #[test]
    fn test_nested_blocks_are_bounded() {
        let stream = tokenize("{ { { ; } } }").unwrap();

        let mut parser = Parser::new(&stream).with_max_depth(3);
        let err = parser.parse_rule(Rule::Statement, Mode::Commit).unwrap_err();
        assert_eq!(err.to_string(), "Syntax error at line 1 (nesting too deep in statement)");

        let mut parser = Parser::new(&stream).with_max_depth(4);
        assert!(parser.parse_rule(Rule::Statement, Mode::Commit).unwrap().is_some());
        assert_eq!(parser.position(), stream.end());
    }
}
