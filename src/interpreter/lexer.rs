use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::ops::Range;
use std::str::Chars;
use lazy_static::lazy_static;
use crate::util;

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenType> = HashMap::from([
        ("if", TokenType::If),
    ]);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenPos {
    pub line: i32,
    pub column: i32,
}

impl TokenPos {
    pub fn new(line: i32, column: i32) -> TokenPos {
        TokenPos { line, column }
    }

    pub fn begin() -> TokenPos {
        TokenPos::new(1, 1)
    }
}

impl Display for TokenPos {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[line {} column {}]", self.line, self.column)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenType {
    Semicolon, Colon,

    Identifier,

    // Keywords
    If,

    // EOF
    Eof,
}

impl TokenType {
    /// How the token type is named in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenType::Semicolon => "';'",
            TokenType::Colon => "':'",
            TokenType::Identifier => "variable name",
            TokenType::If => "'if'",
            TokenType::Eof => "end of input",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    token_type: TokenType,
    source: String,
    start: TokenPos, end: TokenPos,
    span: Range<usize>,
}

impl Token {
    pub fn new(token_type: TokenType, source: String, start: TokenPos, end: TokenPos, span: Range<usize>) -> Token {
        Token {
            token_type, source,
            start, end,
            span,
        }
    }

    pub fn token_type(&self) -> TokenType { self.token_type }
    pub fn source(&self) -> &str { &self.source }
    pub fn start(&self) -> &TokenPos { &self.start }
    pub fn end(&self) -> &TokenPos { &self.end }
    /// Byte range of the token in the lexed input.
    pub fn span(&self) -> Range<usize> { self.span.clone() }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.token_type {
            TokenType::Eof => f.write_str("end of input"),
            _ => write!(f, "'{}'", self.source),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexerError {
    UnexpectedCharacter(TokenPos, char),
}

impl LexerError {
    pub fn get_pos(&self) -> TokenPos {
        match self {
            LexerError::UnexpectedCharacter(pos, _) => *pos,
        }
    }
}

impl Display for LexerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LexerError::UnexpectedCharacter(pos, c) => write!(f, "{} Unexpected character '{}'", pos, c),
        }
    }
}

impl std::error::Error for LexerError {}

type LexerResult<T> = Result<T, LexerError>;

pub struct Lexer<'source> {
    input: &'source str,

    chars: Chars<'source>,
    peek_1: Option<char>,

    start_index: usize,
    current_index: usize,

    start_pos: TokenPos,
    current_pos: TokenPos,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str) -> Lexer<'source> {
        Lexer {
            input: source,

            chars: source.chars(),
            peek_1: None,

            start_index: 0,
            current_index: 0,

            start_pos: TokenPos::begin(),
            current_pos: TokenPos::begin(),
        }
    }

    /// Scans the whole input. The returned tokens always end with a single [`TokenType::Eof`].
    pub fn tokenize(mut self) -> LexerResult<Vec<Token>> {
        let mut tokens = Vec::new();

        loop {
            let token = self.scan_token()?;
            let eof = token.token_type() == TokenType::Eof;
            tokens.push(token);

            if eof {
                return Ok(tokens);
            }
        }
    }

    pub fn scan_token(&mut self) -> LexerResult<Token> {
        self.skip_whitespace();
        self.start_index = self.current_index;
        self.start_pos = self.current_pos;

        let c = match self.consume() {
            Some(c) => c,
            None => return Ok(self.make_token(TokenType::Eof)),
        };

        match c {
            ';' => Ok(self.make_token(TokenType::Semicolon)),
            ':' => Ok(self.make_token(TokenType::Colon)),

            c if util::is_identifier_start(c) => Ok(self.scan_identifier()),

            _ => Err(LexerError::UnexpectedCharacter(self.start_pos, c)),
        }
    }

    fn scan_identifier(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if !util::is_identifier_part(c) {
                break;
            }

            self.consume();
        }

        let name = &self.input[self.start_index..self.current_index];
        let token_type = KEYWORDS.get(name).copied().unwrap_or(TokenType::Identifier);

        self.make_token(token_type)
    }

    fn make_token(&self, token_type: TokenType) -> Token {
        Token {
            token_type,
            source: self.input[self.start_index..self.current_index].to_owned(),

            start: self.start_pos, end: self.current_pos,
            span: self.start_index..self.current_index,
        }
    }

    fn consume(&mut self) -> Option<char> {
        self.peek_1.take().or_else(|| self.chars.next()).map(|c| {
            self.current_index += c.len_utf8();

            if c == '\n' {
                self.current_pos.line += 1;
                self.current_pos.column = 1;
            } else {
                self.current_pos.column += 1;
            }

            c
        })
    }

    fn peek(&mut self) -> Option<char> {
        if self.peek_1.is_none() {
            self.peek_1 = self.chars.next();
        }

        self.peek_1
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                return;
            }

            self.consume();
        }
    }
}

/// Converts `input` into tokens, terminated by an end-of-input token.
pub fn tokenize(input: &str) -> LexerResult<Vec<Token>> {
    Lexer::new(input).tokenize()
}
