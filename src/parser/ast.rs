// Syntax tree definitions for the C-minus front end

use super::lexer::Token;
use std::fmt;

/// Grammar rules, one per non-terminal. Every non-terminal node is tagged
/// with the rule that built it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    Program,
    DeclarationList,
    Declaration,
    VarDeclaration,
    FunDeclaration,
    Params,
    ParamList,
    Param,
    CompoundStmt,
    LocalDeclarations,
    StatementList,
    Statement,
    ExpressionStmt,
    SelectionStmt,
    IterationStmt,
    ReturnStmt,
    Expression,
    Var,
    SimpleExpression,
    AdditiveExpression,
    Relop,
    Addop,
    Mulop,
    Term,
    Factor,
    Call,
    Args,
    ArgList,
}

impl Rule {
    pub const ALL: [Rule; 28] = [
        Rule::Program,
        Rule::DeclarationList,
        Rule::Declaration,
        Rule::VarDeclaration,
        Rule::FunDeclaration,
        Rule::Params,
        Rule::ParamList,
        Rule::Param,
        Rule::CompoundStmt,
        Rule::LocalDeclarations,
        Rule::StatementList,
        Rule::Statement,
        Rule::ExpressionStmt,
        Rule::SelectionStmt,
        Rule::IterationStmt,
        Rule::ReturnStmt,
        Rule::Expression,
        Rule::Var,
        Rule::SimpleExpression,
        Rule::AdditiveExpression,
        Rule::Relop,
        Rule::Addop,
        Rule::Mulop,
        Rule::Term,
        Rule::Factor,
        Rule::Call,
        Rule::Args,
        Rule::ArgList,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Rule::Program => "program",
            Rule::DeclarationList => "declaration_list",
            Rule::Declaration => "declaration",
            Rule::VarDeclaration => "var_declaration",
            Rule::FunDeclaration => "fun_declaration",
            Rule::Params => "params",
            Rule::ParamList => "param_list",
            Rule::Param => "param",
            Rule::CompoundStmt => "compound_stmt",
            Rule::LocalDeclarations => "local_declarations",
            Rule::StatementList => "statement_list",
            Rule::Statement => "statement",
            Rule::ExpressionStmt => "expression_stmt",
            Rule::SelectionStmt => "selection_stmt",
            Rule::IterationStmt => "iteration_stmt",
            Rule::ReturnStmt => "return_stmt",
            Rule::Expression => "expression",
            Rule::Var => "var",
            Rule::SimpleExpression => "simple_expression",
            Rule::AdditiveExpression => "additive_expression",
            Rule::Relop => "relop",
            Rule::Addop => "addop",
            Rule::Mulop => "mulop",
            Rule::Term => "term",
            Rule::Factor => "factor",
            Rule::Call => "call",
            Rule::Args => "args",
            Rule::ArgList => "arg_list",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A node of the syntax tree: either a token or a rule application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxNode {
    Terminal(Token),
    NonTerminal(NonTerminal),
}

/// A rule application with its children in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonTerminal {
    pub rule: Rule,
    /// Line of the first token covered by this node.
    pub line: usize,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    /// Build a rule node. `children` must not be empty; the node's line is
    /// taken from the first child.
    pub fn node(rule: Rule, children: Vec<SyntaxNode>) -> Self {
        debug_assert!(!children.is_empty(), "use SyntaxNode::empty for ε");
        let line = children.first().map(SyntaxNode::line).unwrap_or_default();
        SyntaxNode::NonTerminal(NonTerminal {
            rule,
            line,
            children,
        })
    }

    /// Build an ε node for an emptiable list, positioned at `line`.
    pub fn empty(rule: Rule, line: usize) -> Self {
        SyntaxNode::NonTerminal(NonTerminal {
            rule,
            line,
            children: Vec::new(),
        })
    }

    pub fn line(&self) -> usize {
        match self {
            SyntaxNode::Terminal(token) => token.line,
            SyntaxNode::NonTerminal(node) => node.line,
        }
    }

    /// The rule that built this node, `None` for terminals.
    pub fn rule(&self) -> Option<Rule> {
        match self {
            SyntaxNode::Terminal(_) => None,
            SyntaxNode::NonTerminal(node) => Some(node.rule),
        }
    }

    pub fn token(&self) -> Option<&Token> {
        match self {
            SyntaxNode::Terminal(token) => Some(token),
            SyntaxNode::NonTerminal(_) => None,
        }
    }

    pub fn children(&self) -> &[SyntaxNode] {
        match self {
            SyntaxNode::Terminal(_) => &[],
            SyntaxNode::NonTerminal(node) => &node.children,
        }
    }

    pub fn child(&self, index: usize) -> Option<&SyntaxNode> {
        self.children().get(index)
    }

    /// True for rule nodes built by `rule`.
    pub fn is(&self, rule: Rule) -> bool {
        self.rule() == Some(rule)
    }

    /// The leftmost token under this node, if any.
    pub fn first_token(&self) -> Option<&Token> {
        match self {
            SyntaxNode::Terminal(token) => Some(token),
            SyntaxNode::NonTerminal(node) => node.children.iter().find_map(SyntaxNode::first_token),
        }
    }

    /// All tokens under this node, left to right.
    pub fn tokens(&self) -> Vec<&Token> {
        let mut tokens = Vec::new();
        self.collect_tokens(&mut tokens);
        tokens
    }

    fn collect_tokens<'a>(&'a self, out: &mut Vec<&'a Token>) {
        match self {
            SyntaxNode::Terminal(token) => out.push(token),
            SyntaxNode::NonTerminal(node) => {
                for child in &node.children {
                    child.collect_tokens(out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::TokenKind;

    #[test]
    fn test_line_comes_from_first_child() {
        let id = SyntaxNode::Terminal(Token::new(TokenKind::Id, "x", 7));
        let var = SyntaxNode::node(Rule::Var, vec![id]);
        let factor = SyntaxNode::node(Rule::Factor, vec![var]);

        assert_eq!(factor.line(), 7);
        assert!(factor.is(Rule::Factor));
        assert_eq!(factor.first_token().map(|t| t.lexeme.as_str()), Some("x"));
    }

    #[test]
    fn test_empty_node() {
        let args = SyntaxNode::empty(Rule::Args, 3);

        assert_eq!(args.line(), 3);
        assert!(args.children().is_empty());
        assert!(args.first_token().is_none());
    }

    #[test]
    fn test_rule_names_are_distinct() {
        let mut names: Vec<&str> = Rule::ALL.iter().map(|r| r.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Rule::ALL.len());
    }
}
