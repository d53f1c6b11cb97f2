//! Token stream and cursor
//!
//! The scanner is drained completely before parsing starts. The resulting
//! [`TokenStream`] is immutable; parsing only ever moves a [`Cursor`] over it,
//! so backtracking is a matter of saving and restoring that cursor.

use super::lexer::{Token, TokenKind};

/// A position in a [`TokenStream`].
///
/// Valid cursors range over `0..=len`, where `len` is the index of the
/// end-of-input token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Cursor(usize);

impl Cursor {
    pub fn new(index: usize) -> Self {
        Cursor(index)
    }

    pub fn index(self) -> usize {
        self.0
    }

    pub(crate) fn offset(self, n: usize) -> Cursor {
        Cursor(self.0 + n)
    }

    pub(crate) fn next(self) -> Cursor {
        self.offset(1)
    }

    pub(crate) fn prev(self) -> Cursor {
        Cursor(self.0.saturating_sub(1))
    }
}

/// Tokens `0..len` followed by a single `EOT` marker at index `len`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Build a stream from scanned tokens; `end_line` is the line the
    /// end-of-input marker is reported on.
    pub fn new(mut tokens: Vec<Token>, end_line: usize) -> Self {
        tokens.push(Token::new(TokenKind::Eot, "EOT", end_line));
        Self { tokens }
    }

    /// Number of real tokens, excluding the end marker.
    pub fn len(&self) -> usize {
        self.tokens.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The real tokens, excluding the end marker.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens[..self.len()]
    }

    /// Cursor at the end-of-input token.
    pub fn end(&self) -> Cursor {
        Cursor(self.len())
    }

    /// Token at `cursor`; positions past the end read as the end marker.
    pub fn get(&self, cursor: Cursor) -> &Token {
        let index = cursor.0.min(self.len());
        &self.tokens[index]
    }

    pub fn eot(&self) -> &Token {
        &self.tokens[self.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_marker() {
        let stream = TokenStream::new(vec![Token::new(TokenKind::Id, "x", 1)], 4);

        assert_eq!(stream.len(), 1);
        assert_eq!(stream.tokens().len(), 1);
        assert_eq!(stream.end(), Cursor::new(1));
        assert_eq!(stream.eot(), &Token::new(TokenKind::Eot, "EOT", 4));
    }

    #[test]
    fn test_reads_past_end_clamp() {
        let stream = TokenStream::new(Vec::new(), 1);

        assert!(stream.is_empty());
        assert!(stream.get(Cursor::new(0)).is(TokenKind::Eot));
        assert!(stream.get(Cursor::new(3)).is(TokenKind::Eot));
    }
}
