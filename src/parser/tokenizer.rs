//! Tokenizer for path expressions
//!
//! Scans the input bytes directly and hands out zero-copy slices for
//! identifiers and named operators. Quoted identifiers only allocate when
//! they contain escape sequences.

use super::error::{ParseError, ParseResult};
use super::lexer::{TokenSource, is_identifier_continue, is_identifier_start};
use super::span::{Position, Spanned};
use std::borrow::Cow;
use std::cell::Cell;
use std::fmt;

/// A lexical token of the path language
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'input> {
    /// Field name, bare (`name`) or quoted (`'some name'`)
    Identifier(Cow<'input, str>),
    /// Integer literal (e.g. `3`, `-1`)
    Number(i64),
    /// Named operator (`` `this` ``, `` `parent` ``, or the bare words)
    NamedOperator(Cow<'input, str>),
    /// Child operator (.)
    Dot,
    /// Descendants operator (..)
    DoubleDot,
    /// Filter operator (where keyword)
    Where,
    /// Union operator (|)
    Pipe,
    /// Intersection operator (&)
    Ampersand,
    /// Wildcard or full slice (*)
    Star,
    /// Root marker ($)
    Dollar,
    /// Left square bracket [
    LeftBracket,
    /// Right square bracket ]
    RightBracket,
    /// Left parenthesis (
    LeftParen,
    /// Right parenthesis )
    RightParen,
    /// Field list separator (,)
    Comma,
    /// Slice separator (:)
    Colon,
}

/// Token categories, as reported in parse errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    /// Field name
    Identifier,
    /// Integer literal
    Number,
    /// Named operator
    NamedOperator,
    /// `.`
    Dot,
    /// `..`
    DoubleDot,
    /// `where`
    Where,
    /// `|`
    Pipe,
    /// `&`
    Ampersand,
    /// `*`
    Star,
    /// `$`
    Dollar,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `,`
    Comma,
    /// `:`
    Colon,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Identifier => "ID",
            TokenKind::Number => "NUMBER",
            TokenKind::NamedOperator => "NAMED_OPERATOR",
            TokenKind::Dot => "'.'",
            TokenKind::DoubleDot => "DOUBLEDOT",
            TokenKind::Where => "WHERE",
            TokenKind::Pipe => "'|'",
            TokenKind::Ampersand => "'&'",
            TokenKind::Star => "'*'",
            TokenKind::Dollar => "'$'",
            TokenKind::LeftBracket => "'['",
            TokenKind::RightBracket => "']'",
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::Comma => "','",
            TokenKind::Colon => "':'",
        };
        f.write_str(name)
    }
}

impl<'input> Token<'input> {
    /// Get the category of this token
    #[inline]
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Identifier(_) => TokenKind::Identifier,
            Token::Number(_) => TokenKind::Number,
            Token::NamedOperator(_) => TokenKind::NamedOperator,
            Token::Dot => TokenKind::Dot,
            Token::DoubleDot => TokenKind::DoubleDot,
            Token::Where => TokenKind::Where,
            Token::Pipe => TokenKind::Pipe,
            Token::Ampersand => TokenKind::Ampersand,
            Token::Star => TokenKind::Star,
            Token::Dollar => TokenKind::Dollar,
            Token::LeftBracket => TokenKind::LeftBracket,
            Token::RightBracket => TokenKind::RightBracket,
            Token::LeftParen => TokenKind::LeftParen,
            Token::RightParen => TokenKind::RightParen,
            Token::Comma => TokenKind::Comma,
            Token::Colon => TokenKind::Colon,
        }
    }

    /// Create an identifier token
    pub fn identifier(name: impl Into<Cow<'input, str>>) -> Self {
        Token::Identifier(name.into())
    }

    /// Create a named operator token
    pub fn named_operator(name: impl Into<Cow<'input, str>>) -> Self {
        Token::NamedOperator(name.into())
    }

    /// Get the token for a reserved word
    ///
    /// `where` is the filter operator; `this` and `parent` are named
    /// operators even without backticks. Quote them to use them as fields.
    #[inline]
    pub fn from_keyword(s: &str) -> Option<Token<'static>> {
        match s {
            "where" => Some(Token::Where),
            "this" => Some(Token::NamedOperator(Cow::Borrowed("this"))),
            "parent" => Some(Token::NamedOperator(Cow::Borrowed("parent"))),
            _ => None,
        }
    }

    /// Detach the token from the input it was scanned from
    pub fn into_owned(self) -> Token<'static> {
        match self {
            Token::Identifier(name) => Token::Identifier(Cow::Owned(name.into_owned())),
            Token::NamedOperator(name) => Token::NamedOperator(Cow::Owned(name.into_owned())),
            Token::Number(value) => Token::Number(value),
            Token::Dot => Token::Dot,
            Token::DoubleDot => Token::DoubleDot,
            Token::Where => Token::Where,
            Token::Pipe => Token::Pipe,
            Token::Ampersand => Token::Ampersand,
            Token::Star => Token::Star,
            Token::Dollar => Token::Dollar,
            Token::LeftBracket => Token::LeftBracket,
            Token::RightBracket => Token::RightBracket,
            Token::LeftParen => Token::LeftParen,
            Token::RightParen => Token::RightParen,
            Token::Comma => Token::Comma,
            Token::Colon => Token::Colon,
        }
    }
}

impl fmt::Display for Token<'_> {
    /// The token value as reported in diagnostics
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Identifier(name) | Token::NamedOperator(name) => f.write_str(name),
            Token::Number(value) => write!(f, "{value}"),
            Token::Dot => f.write_str("."),
            Token::DoubleDot => f.write_str(".."),
            Token::Where => f.write_str("where"),
            Token::Pipe => f.write_str("|"),
            Token::Ampersand => f.write_str("&"),
            Token::Star => f.write_str("*"),
            Token::Dollar => f.write_str("$"),
            Token::LeftBracket => f.write_str("["),
            Token::RightBracket => f.write_str("]"),
            Token::LeftParen => f.write_str("("),
            Token::RightParen => f.write_str(")"),
            Token::Comma => f.write_str(","),
            Token::Colon => f.write_str(":"),
        }
    }
}

/// Tokenizer over a path expression string
#[derive(Debug, Clone)]
pub struct Tokenizer<'input> {
    input: &'input str,
    bytes: &'input [u8],
    pos: usize,
    line: u32,
    line_start: usize,
    /// Last computed (offset, column) pair, so columns are counted incrementally
    column_cache: Cell<(usize, u32)>,
}

impl<'input> Tokenizer<'input> {
    /// Create a new tokenizer
    #[inline]
    pub fn new(input: &'input str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            line: 1,
            line_start: 0,
            column_cache: Cell::new((0, 1)),
        }
    }

    /// Current position in the input
    pub fn current_position(&self) -> Position {
        let (cached_offset, cached_column) = self.column_cache.get();
        let (from, base) = if (self.line_start..=self.pos).contains(&cached_offset) {
            (cached_offset, cached_column)
        } else {
            (self.line_start, 1)
        };
        let column = base + self.input[from..self.pos].chars().count() as u32;
        self.column_cache.set((self.pos, column));
        Position::new(self.line, column, self.pos)
    }

    #[inline(always)]
    fn peek_byte(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    #[inline(always)]
    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Advance past one character, keeping line bookkeeping current
    #[inline]
    fn bump_char(&mut self, ch: char) {
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.line_start = self.pos;
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(byte) = self.peek_byte(0) {
            match byte {
                b' ' | b'\t' | b'\r' | b'\n' => self.bump_char(byte as char),
                _ => break,
            }
        }
    }

    fn scan_number(&mut self, start: Position) -> ParseResult<Token<'input>> {
        let begin = self.pos;
        if self.peek_byte(0) == Some(b'-') {
            self.pos += 1;
        }
        while self.peek_byte(0).is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        let text = &self.input[begin..self.pos];
        text.parse::<i64>()
            .map(Token::Number)
            .map_err(|_| ParseError::InvalidNumber {
                value: text.to_string(),
                position: start,
            })
    }

    fn scan_identifier(&mut self) -> Token<'input> {
        let begin = self.pos;
        while let Some(ch) = self.peek_char() {
            if !is_identifier_continue(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
        let text = &self.input[begin..self.pos];
        Token::from_keyword(text).unwrap_or(Token::Identifier(Cow::Borrowed(text)))
    }

    /// Scan a quoted identifier; the opening quote has not been consumed
    fn scan_quoted(&mut self, quote: char, start: Position) -> ParseResult<Token<'input>> {
        self.bump_char(quote);
        let begin = self.pos;
        let mut unescaped: Option<String> = None;

        loop {
            let Some(ch) = self.peek_char() else {
                return Err(ParseError::UnclosedString { position: start });
            };

            if ch == quote {
                let raw = &self.input[begin..self.pos];
                self.bump_char(ch);
                let value = match unescaped {
                    Some(buffer) => Cow::Owned(buffer),
                    None => Cow::Borrowed(raw),
                };
                return Ok(Token::Identifier(value));
            }

            if ch == '\\' {
                let escape_position = self.current_position();
                let buffer = unescaped.get_or_insert_with(|| self.input[begin..self.pos].to_string());
                self.pos += 1;
                let Some(escaped) = self.peek_char() else {
                    return Err(ParseError::UnclosedString { position: start });
                };
                self.bump_char(escaped);
                match escaped {
                    'n' => buffer.push('\n'),
                    't' => buffer.push('\t'),
                    'r' => buffer.push('\r'),
                    'u' => {
                        let decoded = Self::decode_unicode(&self.input[self.pos..])
                            .ok_or_else(|| ParseError::InvalidEscape {
                                sequence: format!(
                                    "\\u{}",
                                    self.input[self.pos..].chars().take(4).collect::<String>()
                                ),
                                position: escape_position,
                            })?;
                        buffer.push(decoded);
                        self.pos += 4;
                    }
                    '\\' | '\'' | '"' => buffer.push(escaped),
                    other => {
                        return Err(ParseError::InvalidEscape {
                            sequence: format!("\\{other}"),
                            position: escape_position,
                        });
                    }
                }
                continue;
            }

            if let Some(buffer) = unescaped.as_mut() {
                buffer.push(ch);
            }
            self.bump_char(ch);
        }
    }

    /// Decode the four hex digits of a `\uXXXX` escape
    fn decode_unicode(rest: &str) -> Option<char> {
        let digits = rest.get(..4)?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().and_then(char::from_u32)
    }

    /// Scan a backtick-delimited named operator
    fn scan_named_operator(&mut self, start: Position) -> ParseResult<Token<'input>> {
        self.pos += 1;
        let begin = self.pos;
        let Some(length) = self.input[begin..].find('`') else {
            return Err(ParseError::UnclosedNamedOperator { position: start });
        };
        for ch in self.input[begin..begin + length].chars() {
            self.bump_char(ch);
        }
        let name = &self.input[begin..self.pos];
        self.pos += 1;
        Ok(Token::NamedOperator(Cow::Borrowed(name)))
    }

    fn scan_token(&mut self) -> ParseResult<Option<Spanned<Token<'input>>>> {
        self.skip_whitespace();

        let Some(byte) = self.peek_byte(0) else {
            return Ok(None);
        };
        let start = self.current_position();

        let token = match byte {
            b'.' if self.peek_byte(1) == Some(b'.') => {
                self.pos += 2;
                Token::DoubleDot
            }
            b'.' | b'*' | b'$' | b'[' | b']' | b'(' | b')' | b',' | b':' | b'|' | b'&' => {
                self.pos += 1;
                match byte {
                    b'.' => Token::Dot,
                    b'*' => Token::Star,
                    b'$' => Token::Dollar,
                    b'[' => Token::LeftBracket,
                    b']' => Token::RightBracket,
                    b'(' => Token::LeftParen,
                    b')' => Token::RightParen,
                    b',' => Token::Comma,
                    b':' => Token::Colon,
                    b'|' => Token::Pipe,
                    _ => Token::Ampersand,
                }
            }
            b'0'..=b'9' => self.scan_number(start)?,
            b'-' if self.peek_byte(1).is_some_and(|b| b.is_ascii_digit()) => {
                self.scan_number(start)?
            }
            b'\'' | b'"' => self.scan_quoted(byte as char, start)?,
            b'`' => self.scan_named_operator(start)?,
            _ => match self.peek_char() {
                Some(ch) if is_identifier_start(ch) => self.scan_identifier(),
                Some(ch) => {
                    return Err(ParseError::UnexpectedCharacter {
                        character: ch,
                        position: start,
                    });
                }
                None => return Ok(None),
            },
        };

        Ok(Some(Spanned::new(token, start, self.current_position())))
    }

    /// Tokenize the whole input
    pub fn tokenize_all(&mut self) -> ParseResult<Vec<Spanned<Token<'input>>>> {
        let mut tokens = Vec::with_capacity(self.input.len() / 2 + 1);
        while let Some(token) = self.scan_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }
}

impl<'input> TokenSource<'input> for Tokenizer<'input> {
    #[inline]
    fn next_token(&mut self) -> ParseResult<Option<Spanned<Token<'input>>>> {
        self.scan_token()
    }
}

impl<'input> Iterator for Tokenizer<'input> {
    type Item = ParseResult<Spanned<Token<'input>>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.scan_token().transpose()
    }
}

/// Tokenize a complete input string
pub fn tokenize(input: &str) -> ParseResult<Vec<Spanned<Token<'_>>>> {
    Tokenizer::new(input).tokenize_all()
}
