// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! SQL lexer.
//!
//! Handles:
//! - Case-insensitive keywords (kept as [`TokenKind::Word`], matched by the parser)
//! - `[bracketed]` and `"double-quoted"` identifiers, never treated as keywords
//! - Single-quoted strings with `''` escapes
//! - Line comments (`--`) and block comments (`/* */`)
//! - Comparison operators `= <> != < <= > >=`

use crate::error::{ParseError, ParseErrorKind, ParseResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Bare word: keyword or identifier, source case preserved
    Word(String),
    /// Quoted identifier, brackets/quotes stripped
    QuotedIdent(String),
    /// Numeric literal as written (`42`, `10.5`)
    Number(String),
    /// String literal with escapes resolved
    StringLit(String),
    Comma,
    Dot,
    Star,
    LParen,
    RParen,
    Semicolon,
    Minus,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Eof,
}

impl TokenKind {
    /// Source-like rendering for error messages
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Word(w) => w.clone(),
            TokenKind::QuotedIdent(w) => format!("[{}]", w),
            TokenKind::Number(n) => n.clone(),
            TokenKind::StringLit(s) => format!("'{}'", s),
            TokenKind::Comma => ",".to_string(),
            TokenKind::Dot => ".".to_string(),
            TokenKind::Star => "*".to_string(),
            TokenKind::LParen => "(".to_string(),
            TokenKind::RParen => ")".to_string(),
            TokenKind::Semicolon => ";".to_string(),
            TokenKind::Minus => "-".to_string(),
            TokenKind::Eq => "=".to_string(),
            TokenKind::NotEq => "<>".to_string(),
            TokenKind::Lt => "<".to_string(),
            TokenKind::LtEq => "<=".to_string(),
            TokenKind::Gt => ">".to_string(),
            TokenKind::GtEq => ">=".to_string(),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
}

impl Token {
    /// Whether this is the bare word `keyword` (case-insensitive)
    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(&self.kind, TokenKind::Word(w) if w.eq_ignore_ascii_case(keyword))
    }
}

/// Single-pass tokenizer over a SQL string
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
        }
    }

    /// Tokenize the whole input; the last token is always [`TokenKind::Eof`]
    pub fn tokenize(mut self) -> ParseResult<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        tokens.push(Token {
            kind: TokenKind::Eof,
            start: self.source.len(),
            end: self.source.len(),
        });
        Ok(tokens)
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn offset(&mut self) -> usize {
        self.chars
            .peek()
            .map(|&(i, _)| i)
            .unwrap_or(self.source.len())
    }

    fn next_token(&mut self) -> ParseResult<Option<Token>> {
        self.skip_trivia()?;

        let Some((start, c)) = self.chars.next() else {
            return Ok(None);
        };

        let kind = match c {
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            '*' => TokenKind::Star,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ';' => TokenKind::Semicolon,
            '-' => TokenKind::Minus,
            '=' => TokenKind::Eq,
            '<' => match self.peek_char() {
                Some('=') => {
                    self.chars.next();
                    TokenKind::LtEq
                }
                Some('>') => {
                    self.chars.next();
                    TokenKind::NotEq
                }
                _ => TokenKind::Lt,
            },
            '>' => {
                if self.peek_char() == Some('=') {
                    self.chars.next();
                    TokenKind::GtEq
                } else {
                    TokenKind::Gt
                }
            }
            '!' => {
                if self.peek_char() == Some('=') {
                    self.chars.next();
                    TokenKind::NotEq
                } else {
                    return Err(ParseError::at(ParseErrorKind::UnexpectedCharacter('!'), start));
                }
            }
            '\'' => TokenKind::StringLit(self.read_string(start)?),
            '[' => TokenKind::QuotedIdent(self.read_delimited(start, ']')?),
            '"' => TokenKind::QuotedIdent(self.read_delimited(start, '"')?),
            c if c.is_ascii_digit() => TokenKind::Number(self.read_number(start)),
            c if is_ident_start(c) => TokenKind::Word(self.read_word(start)),
            other => {
                return Err(ParseError::at(
                    ParseErrorKind::UnexpectedCharacter(other),
                    start,
                ));
            }
        };

        let end = self.offset();
        Ok(Some(Token { kind, start, end }))
    }

    fn skip_trivia(&mut self) -> ParseResult<()> {
        loop {
            match self.peek_char() {
                Some(c) if c.is_whitespace() => {
                    self.chars.next();
                }
                Some('-') if self.source[self.offset()..].starts_with("--") => {
                    while let Some(c) = self.peek_char() {
                        if c == '\n' {
                            break;
                        }
                        self.chars.next();
                    }
                }
                Some('/') if self.source[self.offset()..].starts_with("/*") => {
                    let start = self.offset();
                    match self.source[start + 2..].find("*/") {
                        Some(rel) => {
                            let close = start + 2 + rel + 2;
                            while self.offset() < close {
                                self.chars.next();
                            }
                        }
                        None => {
                            return Err(ParseError::at(
                                ParseErrorKind::UnterminatedComment,
                                start,
                            ));
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn read_string(&mut self, start: usize) -> ParseResult<String> {
        let mut value = String::new();
        loop {
            match self.chars.next() {
                Some((_, '\'')) => {
                    if self.peek_char() == Some('\'') {
                        self.chars.next();
                        value.push('\'');
                    } else {
                        return Ok(value);
                    }
                }
                Some((_, c)) => value.push(c),
                None => {
                    return Err(ParseError::at(ParseErrorKind::UnterminatedString, start));
                }
            }
        }
    }

    fn read_delimited(&mut self, start: usize, close: char) -> ParseResult<String> {
        let mut value = String::new();
        loop {
            match self.chars.next() {
                Some((_, c)) if c == close => return Ok(value),
                Some((_, c)) => value.push(c),
                None => {
                    return Err(ParseError::at(
                        ParseErrorKind::UnterminatedIdentifier,
                        start,
                    ));
                }
            }
        }
    }

    fn read_number(&mut self, start: usize) -> String {
        let mut seen_dot = false;
        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                self.chars.next();
            } else if c == '.' && !seen_dot {
                seen_dot = true;
                self.chars.next();
            } else {
                break;
            }
        }
        let end = self.offset();
        self.source[start..end].to_string()
    }

    fn read_word(&mut self, start: usize) -> String {
        while let Some(c) = self.peek_char() {
            if is_ident_continue(c) {
                self.chars.next();
            } else {
                break;
            }
        }
        let end = self.offset();
        self.source[start..end].to_string()
    }
}

pub(crate) fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '@' || c == '#'
}

pub(crate) fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$' || c == '@' || c == '#'
}
