//! Declaration parsing implementation
//!
//! This module handles the top of the grammar:
//!
//! - The program and its declaration list
//! - Variable declarations: `int x;`, `int a[10];`
//! - Function declarations: `int f(int a, int b[]) { ... }`
//! - Parameter lists, including the `(void)` form
//!
//! # Grammar
//!
//! ```text
//! program          ::= declaration_list
//! declaration_list ::= declaration declaration_list | declaration
//! declaration      ::= var_declaration | fun_declaration
//! var_declaration  ::= TYPE ID ";" | TYPE ID "[" INT "]" ";"
//! fun_declaration  ::= TYPE ID "(" params ")" compound_stmt
//! params           ::= "void" | param_list
//! param_list       ::= param_list "," param | param
//! param            ::= TYPE ID | TYPE ID "[" "]"
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::{Rule, SyntaxNode};
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{Expectation, Mode, Parser, RuleResult};

impl Parser<'_> {
    pub(crate) fn program(&mut self, mode: Mode) -> RuleResult {
        let start = self.position();
        let Some(list) = self.declaration_list(mode)? else {
            return self.rewind(start, Rule::Program);
        };
        Ok(Some(SyntaxNode::node(Rule::Program, vec![list])))
    }

    /// One or more declarations, nested to the right. The list goes on while
    /// the next token is a type keyword.
    pub(crate) fn declaration_list(&mut self, mode: Mode) -> RuleResult {
        let start = self.position();
        let mut declarations = Vec::new();

        loop {
            let Some(declaration) = self.declaration(mode)? else {
                return self.rewind(start, Rule::DeclarationList);
            };
            declarations.push(declaration);

            if !self.check(TokenKind::Type) {
                break;
            }
        }

        Ok(Some(self.nest_right(Rule::DeclarationList, declarations, self.line())))
    }

    /// Pick the declaration form from the third token: `(` starts a
    /// function, `[` or `;` a variable.
    pub(crate) fn declaration(&mut self, mode: Mode) -> RuleResult {
        let start = self.position();
        let rule = Rule::Declaration;

        if !self.check(TokenKind::Type) {
            return self.fail(start, mode, Expectation::Token(TokenKind::Type), rule);
        }
        if !self.check_ahead(1, TokenKind::Id) {
            // Reported at the type keyword, which is still current.
            return self.fail(start, mode, Expectation::Token(TokenKind::Id), rule);
        }

        let inner = if self.check_ahead(2, TokenKind::Lp) {
            self.fun_declaration(mode)?
        } else if self.check_ahead(2, TokenKind::Lb) || self.check_ahead(2, TokenKind::Semi) {
            self.var_declaration(mode)?
        } else {
            return self.malformed(start, mode, rule);
        };

        let Some(inner) = inner else {
            return self.rewind(start, rule);
        };
        Ok(Some(SyntaxNode::node(rule, vec![inner])))
    }

    pub(crate) fn var_declaration(&mut self, mode: Mode) -> RuleResult {
        let start = self.position();
        let rule = Rule::VarDeclaration;

        let Some(ty) = self.expect(TokenKind::Type, mode, rule)? else {
            return self.rewind(start, rule);
        };
        let Some(id) = self.expect(TokenKind::Id, mode, rule)? else {
            return self.rewind(start, rule);
        };

        if self.check(TokenKind::Lb)
            && self.check_ahead(1, TokenKind::Int)
            && self.check_ahead(2, TokenKind::Rb)
            && self.check_ahead(3, TokenKind::Semi)
        {
            let lb = self.advance();
            let size = self.advance();
            let rb = self.advance();
            let semi = self.advance();
            return Ok(Some(SyntaxNode::node(rule, vec![ty, id, lb, size, rb, semi])));
        }

        if self.check(TokenKind::Semi) {
            let semi = self.advance();
            return Ok(Some(SyntaxNode::node(rule, vec![ty, id, semi])));
        }

        self.malformed(start, mode, rule)
    }

    pub(crate) fn fun_declaration(&mut self, mode: Mode) -> RuleResult {
        let start = self.position();
        let rule = Rule::FunDeclaration;

        let Some(ty) = self.expect(TokenKind::Type, mode, rule)? else {
            return self.rewind(start, rule);
        };
        let Some(id) = self.expect(TokenKind::Id, mode, rule)? else {
            return self.rewind(start, rule);
        };
        let Some(lp) = self.expect(TokenKind::Lp, mode, rule)? else {
            return self.rewind(start, rule);
        };
        let Some(params) = self.params(mode)? else {
            return self.rewind(start, rule);
        };
        let Some(rp) = self.expect(TokenKind::Rp, mode, rule)? else {
            return self.rewind(start, rule);
        };
        let Some(body) = self.compound_stmt(mode)? else {
            return self.rewind(start, rule);
        };

        Ok(Some(SyntaxNode::node(rule, vec![ty, id, lp, params, rp, body])))
    }

    /// `void` is the empty parameter list only when `)` follows it;
    /// `void x` is an ordinary parameter.
    pub(crate) fn params(&mut self, mode: Mode) -> RuleResult {
        let start = self.position();

        if self.check(TokenKind::Type)
            && self.peek().lexeme == "void"
            && self.check_ahead(1, TokenKind::Rp)
        {
            let void = self.advance();
            return Ok(Some(SyntaxNode::node(Rule::Params, vec![void])));
        }

        let Some(list) = self.param_list(mode)? else {
            return self.rewind(start, Rule::Params);
        };
        Ok(Some(SyntaxNode::node(Rule::Params, vec![list])))
    }

    pub(crate) fn param_list(&mut self, mode: Mode) -> RuleResult {
        let start = self.position();
        let Some(first) = self.param(mode)? else {
            return self.rewind(start, Rule::ParamList);
        };

        let list = self.fold_left(
            Rule::ParamList,
            first,
            |p| p.expect(TokenKind::Comma, Mode::Try, Rule::ParamList),
            |p| p.param(mode),
        )?;
        Ok(Some(list))
    }

    pub(crate) fn param(&mut self, mode: Mode) -> RuleResult {
        let start = self.position();
        let rule = Rule::Param;

        let Some(ty) = self.expect(TokenKind::Type, mode, rule)? else {
            return self.rewind(start, rule);
        };
        let Some(id) = self.expect(TokenKind::Id, mode, rule)? else {
            return self.rewind(start, rule);
        };

        if self.check(TokenKind::Lb) && self.check_ahead(1, TokenKind::Rb) {
            let lb = self.advance();
            let rb = self.advance();
            return Ok(Some(SyntaxNode::node(rule, vec![ty, id, lb, rb])));
        }

        Ok(Some(SyntaxNode::node(rule, vec![ty, id])))
    }
}
