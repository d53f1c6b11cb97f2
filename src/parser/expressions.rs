//! Expression parsing implementation
//!
//! This module handles parsing of C-minus expressions. Precedence is encoded
//! in the rule structure rather than in a table:
//!
//! ```text
//! expression          ::= var "=" expression | simple_expression
//! var                 ::= ID | ID "[" expression "]"
//! simple_expression   ::= additive_expression [ relop additive_expression ]
//! additive_expression ::= additive_expression addop term | term
//! term                ::= term mulop factor | factor
//! factor              ::= "(" expression ")" | var | call | INT
//! call                ::= ID "(" args ")"
//! args                ::= arg_list | ε
//! arg_list            ::= arg_list "," expression | expression
//! ```
//!
//! # Ambiguities
//!
//! - Assignment vs. expression: `expression` speculatively reads a `var`;
//!   unless `=` follows, it rewinds and parses a `simple_expression` from the
//!   same position.
//! - Call vs. variable: an identifier directly followed by `(` is a call.
//! - The left-recursive lists are folded iteratively, see
//!   [`Parser::fold_left`]. A trailing operator with no operand after it is
//!   given back to the caller.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::{Rule, SyntaxNode};
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{Mode, Parser, RuleResult};

impl Parser<'_> {
    pub(crate) fn expression(&mut self, mode: Mode) -> RuleResult {
        self.nested(Rule::Expression, |p| p.assignment_or_simple(mode))
    }

    fn assignment_or_simple(&mut self, mode: Mode) -> RuleResult {
        let start = self.position();
        let rule = Rule::Expression;

        if self.check(TokenKind::Id) && !self.check_ahead(1, TokenKind::Lp) {
            let Some(target) = self.var(mode)? else {
                return self.rewind(start, rule);
            };

            if self.check(TokenKind::Assign) {
                let assign = self.advance();
                let Some(value) = self.expression(mode)? else {
                    return self.rewind(start, rule);
                };
                return Ok(Some(SyntaxNode::node(rule, vec![target, assign, value])));
            }

            // Not an assignment: the variable belongs to a larger expression.
            self.restore(start);
        }

        let Some(simple) = self.simple_expression(mode)? else {
            return self.rewind(start, rule);
        };
        Ok(Some(SyntaxNode::node(rule, vec![simple])))
    }

    pub(crate) fn var(&mut self, mode: Mode) -> RuleResult {
        let start = self.position();
        let rule = Rule::Var;

        let Some(id) = self.expect(TokenKind::Id, mode, rule)? else {
            return self.rewind(start, rule);
        };

        if !self.check(TokenKind::Lb) {
            return Ok(Some(SyntaxNode::node(rule, vec![id])));
        }

        let lb = self.advance();
        let Some(index) = self.expression(mode)? else {
            return self.rewind(start, rule);
        };
        let Some(rb) = self.expect(TokenKind::Rb, mode, rule)? else {
            return self.rewind(start, rule);
        };
        Ok(Some(SyntaxNode::node(rule, vec![id, lb, index, rb])))
    }

    /// At most one comparison. A relop without a right operand is given back.
    pub(crate) fn simple_expression(&mut self, mode: Mode) -> RuleResult {
        let start = self.position();
        let rule = Rule::SimpleExpression;

        let Some(left) = self.additive_expression(mode)? else {
            return self.rewind(start, rule);
        };

        let Some(relop) = self.relop(Mode::Try)? else {
            return Ok(Some(SyntaxNode::node(rule, vec![left])));
        };
        let Some(right) = self.additive_expression(Mode::Try)? else {
            self.give_back(rule);
            return Ok(Some(SyntaxNode::node(rule, vec![left])));
        };
        Ok(Some(SyntaxNode::node(rule, vec![left, relop, right])))
    }

    pub(crate) fn additive_expression(&mut self, mode: Mode) -> RuleResult {
        let start = self.position();
        let Some(first) = self.term(mode)? else {
            return self.rewind(start, Rule::AdditiveExpression);
        };

        let sum = self.fold_left(
            Rule::AdditiveExpression,
            first,
            |p| p.addop(Mode::Try),
            |p| p.term(Mode::Try),
        )?;
        Ok(Some(sum))
    }

    pub(crate) fn term(&mut self, mode: Mode) -> RuleResult {
        let start = self.position();
        let Some(first) = self.factor(mode)? else {
            return self.rewind(start, Rule::Term);
        };

        let product = self.fold_left(
            Rule::Term,
            first,
            |p| p.mulop(Mode::Try),
            |p| p.factor(Mode::Try),
        )?;
        Ok(Some(product))
    }

    pub(crate) fn relop(&mut self, mode: Mode) -> RuleResult {
        self.operator(
            Rule::Relop,
            &[
                TokenKind::Neq,
                TokenKind::Equal,
                TokenKind::Less,
                TokenKind::Great,
                TokenKind::Geq,
                TokenKind::Leq,
            ],
            mode,
        )
    }

    pub(crate) fn addop(&mut self, mode: Mode) -> RuleResult {
        self.operator(Rule::Addop, &[TokenKind::Plus, TokenKind::Minus], mode)
    }

    pub(crate) fn mulop(&mut self, mode: Mode) -> RuleResult {
        self.operator(Rule::Mulop, &[TokenKind::Div, TokenKind::Star], mode)
    }

    /// Wrap a single operator token from `kinds` in a `rule` node.
    fn operator(&mut self, rule: Rule, kinds: &[TokenKind], mode: Mode) -> RuleResult {
        let start = self.position();
        if kinds.contains(&self.peek().kind) {
            let op = self.advance();
            return Ok(Some(SyntaxNode::node(rule, vec![op])));
        }
        self.malformed(start, mode, rule)
    }

    pub(crate) fn factor(&mut self, mode: Mode) -> RuleResult {
        let start = self.position();
        let rule = Rule::Factor;

        match self.peek().kind {
            TokenKind::Int => {
                let number = self.advance();
                Ok(Some(SyntaxNode::node(rule, vec![number])))
            }
            TokenKind::Lp => {
                let lp = self.advance();
                let Some(inner) = self.expression(mode)? else {
                    return self.rewind(start, rule);
                };
                let Some(rp) = self.expect(TokenKind::Rp, mode, rule)? else {
                    return self.rewind(start, rule);
                };
                Ok(Some(SyntaxNode::node(rule, vec![lp, inner, rp])))
            }
            TokenKind::Id => {
                let inner = if self.check_ahead(1, TokenKind::Lp) {
                    self.call(mode)?
                } else {
                    self.var(mode)?
                };
                let Some(inner) = inner else {
                    return self.rewind(start, rule);
                };
                Ok(Some(SyntaxNode::node(rule, vec![inner])))
            }
            _ => self.malformed(start, mode, rule),
        }
    }

    pub(crate) fn call(&mut self, mode: Mode) -> RuleResult {
        let start = self.position();
        let rule = Rule::Call;

        let Some(id) = self.expect(TokenKind::Id, mode, rule)? else {
            return self.rewind(start, rule);
        };
        let Some(lp) = self.expect(TokenKind::Lp, mode, rule)? else {
            return self.rewind(start, rule);
        };
        let Some(args) = self.args(mode)? else {
            return self.rewind(start, rule);
        };
        let Some(rp) = self.expect(TokenKind::Rp, mode, rule)? else {
            return self.rewind(start, rule);
        };
        Ok(Some(SyntaxNode::node(rule, vec![id, lp, args, rp])))
    }

    /// Empty when the closing `)` is already current.
    pub(crate) fn args(&mut self, mode: Mode) -> RuleResult {
        let start = self.position();

        if self.check(TokenKind::Rp) {
            return Ok(Some(SyntaxNode::empty(Rule::Args, self.line())));
        }

        let Some(list) = self.arg_list(mode)? else {
            return self.rewind(start, Rule::Args);
        };
        Ok(Some(SyntaxNode::node(Rule::Args, vec![list])))
    }

    /// Every argument after a `,` is required, so a trailing comma is fatal.
    pub(crate) fn arg_list(&mut self, mode: Mode) -> RuleResult {
        let start = self.position();
        let Some(first) = self.expression(mode)? else {
            return self.rewind(start, Rule::ArgList);
        };

        let list = self.fold_left(
            Rule::ArgList,
            first,
            |p| p.expect(TokenKind::Comma, Mode::Try, Rule::ArgList),
            |p| p.expression(Mode::Commit),
        )?;
        Ok(Some(list))
    }
}
