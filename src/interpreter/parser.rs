use std::fmt::{Display, Formatter};
use std::vec::IntoIter;
use crate::interpreter::ast::Expr;
use crate::interpreter::lexer::{Token, TokenPos, TokenType};

/// Deepest allowed chain of conditionals nested in branches.
pub const MAX_NESTING: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Input does not start with `if` or a variable name.
    ExpectedExpression { found: Token },
    /// `if` is not followed by a variable name.
    ExpectedCondition { found: Token },
    /// The condition is not followed by `;`.
    ExpectedSemicolon { condition: Token, found: Token },
    /// Nothing to evaluate after `;`.
    ExpectedThenBranch { found: Token },
    /// Nothing to evaluate after `:`.
    ExpectedElseBranch { found: Token },
    TrailingInput { found: Token },
    /// `found` is the first `if` beyond [`MAX_NESTING`].
    NestingTooDeep { found: Token },
}

impl ParseError {
    pub fn found(&self) -> &Token {
        match self {
            ParseError::ExpectedExpression { found } => found,
            ParseError::ExpectedCondition { found } => found,
            ParseError::ExpectedSemicolon { found, .. } => found,
            ParseError::ExpectedThenBranch { found } => found,
            ParseError::ExpectedElseBranch { found } => found,
            ParseError::TrailingInput { found } => found,
            ParseError::NestingTooDeep { found } => found,
        }
    }

    pub fn get_pos(&self) -> TokenPos {
        *self.found().start()
    }

    pub fn expected(&self) -> &'static str {
        match self {
            ParseError::ExpectedExpression { .. } => "'if' or variable name",
            ParseError::ExpectedCondition { .. } => TokenType::Identifier.describe(),
            ParseError::ExpectedSemicolon { .. } => TokenType::Semicolon.describe(),
            ParseError::ExpectedThenBranch { .. } | ParseError::ExpectedElseBranch { .. } => "expression",
            ParseError::TrailingInput { .. } => TokenType::Eof.describe(),
            ParseError::NestingTooDeep { .. } => "variable name",
        }
    }

    /// A corrected version of `source`, if there is an obvious one.
    pub fn suggestion(&self, source: &str) -> Option<String> {
        match self {
            ParseError::ExpectedSemicolon { condition, .. } => {
                let end = condition.span().end;
                source.get(..end).zip(source.get(end..))
                    .map(|(head, tail)| format!("{};{}", head, tail))
            },
            _ => None,
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let pos = self.get_pos();
        let found = self.found();

        match self {
            ParseError::ExpectedExpression { .. } =>
                write!(f, "{} Expected {} at start of expression, found {}", pos, self.expected(), found),
            ParseError::ExpectedCondition { .. } =>
                write!(f, "{} Expected {} after 'if', found {}", pos, self.expected(), found),
            ParseError::ExpectedSemicolon { condition, .. } =>
                write!(f, "{} Expected {} after condition '{}', found {}", pos, self.expected(), condition.source(), found),
            ParseError::ExpectedThenBranch { .. } =>
                write!(f, "{} Expected {} after ';', found {}", pos, self.expected(), found),
            ParseError::ExpectedElseBranch { .. } =>
                write!(f, "{} Expected {} after ':', found {}", pos, self.expected(), found),
            ParseError::TrailingInput { .. } =>
                write!(f, "{} Expected {}, found {}", pos, self.expected(), found),
            ParseError::NestingTooDeep { .. } =>
                write!(f, "{} Conditionals nested deeper than {} levels; expected {}, found {}", pos, MAX_NESTING, self.expected(), found),
        }
    }
}

impl std::error::Error for ParseError {}

type ParseResult<T> = Result<T, ParseError>;

pub struct Parser {
    tokens: IntoIter<Token>,
    previous: Option<Token>, current: Token,

    depth: usize,
}

impl Parser {
    /// `tokens` must end with an end-of-input token, as produced by the lexer.
    pub fn new(tokens: Vec<Token>) -> Parser {
        let mut tokens = tokens.into_iter();
        let current = tokens.next()
            .unwrap_or_else(|| Token::new(TokenType::Eof, String::new(), TokenPos::begin(), TokenPos::begin(), 0..0));

        Parser {
            tokens,
            previous: None, current,
            depth: 0,
        }
    }

    pub fn parse(&mut self) -> ParseResult<Expr> {
        let expr = self.parse_expression(|found| ParseError::ExpectedExpression { found })?;

        if !self.is_eof() {
            return Err(ParseError::TrailingInput { found: self.current.clone() });
        }

        Ok(expr)
    }

    // `missing` builds the error reported when no expression starts at the current token
    fn parse_expression(&mut self, missing: fn(Token) -> ParseError) -> ParseResult<Expr> {
        if self.matches(TokenType::If) {
            self.parse_conditional()
        } else if self.matches(TokenType::Identifier) {
            Ok(Expr::Variable(self.previous()))
        } else {
            Err(missing(self.current.clone()))
        }
    }

    fn parse_conditional(&mut self) -> ParseResult<Expr> {
        let token = self.previous();

        if self.depth >= MAX_NESTING {
            return Err(ParseError::NestingTooDeep { found: token });
        }

        self.depth += 1;
        let result = self.parse_conditional_body(token);
        self.depth -= 1;

        result
    }

    fn parse_conditional_body(&mut self, token: Token) -> ParseResult<Expr> {
        self.expect(TokenType::Identifier, |found| ParseError::ExpectedCondition { found })?;
        let condition = self.previous();

        if !self.matches(TokenType::Semicolon) {
            return Err(ParseError::ExpectedSemicolon { condition, found: self.current.clone() });
        }

        let then = self.parse_expression(|found| ParseError::ExpectedThenBranch { found })?;

        let otherwise = if self.matches(TokenType::Colon) {
            Some(Box::new(self.parse_expression(|found| ParseError::ExpectedElseBranch { found })?))
        } else {
            None
        };

        Ok(Expr::Conditional { token, condition, then: Box::new(then), otherwise })
    }

    fn consume(&mut self) {
        // The lexer guarantees a trailing Eof; stay on it once reached
        if let Some(next) = self.tokens.next() {
            self.previous = Some(std::mem::replace(&mut self.current, next));
        } else {
            self.previous = Some(self.current.clone());
        }
    }

    fn expect(&mut self, token_type: TokenType, error: fn(Token) -> ParseError) -> ParseResult<()> {
        if self.matches(token_type) {
            return Ok(());
        }

        Err(error(self.current.clone()))
    }

    fn matches(&mut self, token_type: TokenType) -> bool { // Should be called "match", but that's a keyword
        if !self.check(token_type) {
            return false;
        }

        self.consume();
        true
    }

    #[inline]
    fn check(&self, token_type: TokenType) -> bool {
        self.current.token_type() == token_type
    }

    fn previous(&self) -> Token {
        self.previous.clone().unwrap_or_else(|| self.current.clone())
    }

    fn is_eof(&self) -> bool {
        self.current.token_type() == TokenType::Eof
    }
}

/// Builds one expression from a complete token stream.
pub fn parse(tokens: Vec<Token>) -> ParseResult<Expr> {
    Parser::new(tokens).parse()
}
