//! Token source abstraction and lexical helpers
//!
//! The parser pulls tokens through [`TokenSource`] and never names a concrete
//! tokenizer, so grammar tests can feed hand-built token sequences.

use super::error::ParseResult;
use super::span::{Position, Spanned};
use super::tokenizer::Token;

/// Check if a character can start an identifier
pub fn is_identifier_start(c: char) -> bool {
    unicode_xid::UnicodeXID::is_xid_start(c) || c == '_' || c == '@'
}

/// Check if a character can continue an identifier
pub fn is_identifier_continue(c: char) -> bool {
    unicode_xid::UnicodeXID::is_xid_continue(c) || c == '@' || c == '-'
}

/// Pull-based supplier of tokens
pub trait TokenSource<'input> {
    /// Get the next token, or `None` once the input is exhausted
    fn next_token(&mut self) -> ParseResult<Option<Spanned<Token<'input>>>>;
}

impl<'input, S: TokenSource<'input> + ?Sized> TokenSource<'input> for &mut S {
    #[inline]
    fn next_token(&mut self) -> ParseResult<Option<Spanned<Token<'input>>>> {
        (**self).next_token()
    }
}

impl<'input, S: TokenSource<'input> + ?Sized> TokenSource<'input> for Box<S> {
    #[inline]
    fn next_token(&mut self) -> ParseResult<Option<Spanned<Token<'input>>>> {
        (**self).next_token()
    }
}

/// Adapts an iterator of already scanned tokens into a [`TokenSource`]
#[derive(Debug, Clone)]
pub struct TokenIter<I> {
    tokens: I,
}

impl<I> TokenIter<I> {
    /// Wrap an iterator of spanned tokens
    pub fn new(tokens: I) -> Self {
        Self { tokens }
    }
}

impl<'input> TokenIter<std::vec::IntoIter<Spanned<Token<'input>>>> {
    /// Build a source from bare tokens, assigning each a one-column span on
    /// the first line in sequence
    pub fn from_tokens(tokens: impl IntoIterator<Item = Token<'input>>) -> Self {
        let spanned: Vec<_> = tokens
            .into_iter()
            .enumerate()
            .map(|(i, token)| {
                let start = Position::new(1, i as u32 + 1, i);
                let end = Position::new(1, i as u32 + 2, i + 1);
                Spanned::new(token, start, end)
            })
            .collect();
        Self::new(spanned.into_iter())
    }
}

impl<'input, I> TokenSource<'input> for TokenIter<I>
where
    I: Iterator<Item = Spanned<Token<'input>>>,
{
    #[inline]
    fn next_token(&mut self) -> ParseResult<Option<Spanned<Token<'input>>>> {
        Ok(self.tokens.next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_character_classes() {
        assert!(is_identifier_start('a'));
        assert!(is_identifier_start('_'));
        assert!(is_identifier_start('@'));
        assert!(is_identifier_start('é'));
        assert!(!is_identifier_start('1'));
        assert!(!is_identifier_start('-'));
        assert!(is_identifier_continue('1'));
        assert!(is_identifier_continue('-'));
        assert!(!is_identifier_continue('.'));
    }

    #[test]
    fn test_token_iter_assigns_sequential_positions() {
        let mut source = TokenIter::from_tokens([Token::Dollar, Token::Dot]);
        let first = source.next_token().unwrap().unwrap();
        let second = source.next_token().unwrap().unwrap();
        assert_eq!(first.start, Position::new(1, 1, 0));
        assert_eq!(second.start, Position::new(1, 2, 1));
        assert_eq!(second.value, Token::Dot);
        assert!(source.next_token().unwrap().is_none());
    }

    #[test]
    fn test_mutable_reference_is_a_source() {
        fn drain<'a>(mut source: impl TokenSource<'a>) -> usize {
            let mut count = 0;
            while let Ok(Some(_)) = source.next_token() {
                count += 1;
            }
            count
        }

        let mut source = TokenIter::from_tokens([Token::Star]);
        assert_eq!(drain(&mut source), 1);
        assert_eq!(drain(&mut source), 0);
    }
}
