use crate::span::FreeSpan;
use logos::{self, skip, Logos};
use std::fmt::{self, Debug, Display};
use std::iter;


#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenKind {
    #[token("true")] True,
    #[token("false")] False,

    #[regex(r"-?[0-9][0-9_]*i32")]
    Int32,
    #[regex(r"-?[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9]+)?f32")]
    #[regex(r"-?(inf|nan)f32")]
    Float32,
    #[regex(r"-?[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9]+)?(f64)?")]
    #[regex(r"-?(inf|nan)(f64)?")]
    Double,
    #[regex(r"0[xX][0-9a-fA-F_]+")]
    Hex,

    Eof,

    #[error]
    #[regex(r"[ \t\n\r,]+", skip)] // whitespace and separators
    #[regex(r"#[^\n]*", skip)] // comments
    Error,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenKind::True => "`true`",
            TokenKind::False => "`false`",

            TokenKind::Int32 => "i32 literal",
            TokenKind::Float32 => "f32 literal",
            TokenKind::Double => "double literal",
            TokenKind::Hex => "raw word literal",

            TokenKind::Eof => "EOF",
            TokenKind::Error => "invalid token",
        })
    }
}


#[derive(Debug, Clone, Copy)]
pub struct Token {
    pub kind: TokenKind,
    pub span: FreeSpan,
}


/// Lexer for word literals
///
/// Wraps the [`logos`] lexer as a "peekable" adapter which yields [`TokenKind::Eof`] instead of
/// `None`. [`next`](Lexer::next) keeps yielding EOF once the input is exhausted.
///
/// ```rust
/// # use nanword::lexer::{Lexer, TokenKind};
/// let mut lex = Lexer::new("true, -7i32 # trailing comment\n 0x7ff8");
///
/// assert_eq!(lex.next().kind, TokenKind::True);
/// assert_eq!(lex.peek().kind, TokenKind::Int32);
/// assert_eq!(lex.next().kind, TokenKind::Int32);
/// assert_eq!(lex.next().kind, TokenKind::Hex);
/// assert_eq!(lex.next().kind, TokenKind::Eof);
/// assert_eq!(lex.next().kind, TokenKind::Eof);
/// ```
#[derive(Clone)]
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, TokenKind>,
    current: TokenKind,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Lexer<'src> {
        let mut inner = logos::Lexer::new(source);
        let current = inner.next().unwrap_or(TokenKind::Eof);
        Lexer { inner, current }
    }

    /// Returns the current token
    pub fn peek(&self) -> Token {
        Token {
            kind: self.current,
            span: self.inner.span().into(),
        }
    }

    /// Returns the current token and advance the lexer
    #[allow(clippy::should_implement_trait)] // Iterator returns an Option we always return a Token
    pub fn next(&mut self) -> Token {
        let last = self.peek();
        self.current = self.inner.next().unwrap_or(TokenKind::Eof);
        last
    }

    pub fn source(&self) -> &'src str {
        self.inner.source()
    }
}

impl<'src> Debug for Lexer<'src> {
    /// Shows up to 5 next tokens that would be lexed
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const SHOW_NEXT: usize = 5;

        let mut lex = self.clone();
        let tokens = iter::from_fn(|| {
            let token = lex.next();
            (token.kind != TokenKind::Eof).then(|| (token.kind, token.span.slice(lex.source())))
        })
        .take(SHOW_NEXT);

        f.debug_list().entries(tokens).finish()
    }
}
