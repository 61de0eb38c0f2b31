//! Textual notation for words
//!
//! Literals are separated by whitespace or commas, `#` starts a comment running to the end of
//! the line.
//!
//! | Literal                                 | Word                        |
//! |-----------------------------------------|-----------------------------|
//! | `true`, `false`                         | boxed `bool`                |
//! | `-42i32`                                | boxed `i32`                 |
//! | `4.25f32`, `nanf32`, `-inff32`          | boxed `f32`                 |
//! | `1.5`, `42`, `1e3f64`, `nan`, `-inf`    | double                      |
//! | `0x7ff8_0400_0000_002a`                 | raw bits, taken as they are |
//!
//! ```rust
//! # use nanword::literal::{self, LiteralKind};
//! # use nanword::Word;
//! let literals = literal::parse("true, -1i32 # comment\n0x7ff8_0000_0800_0001").unwrap();
//!
//! assert_eq!(literals[1].kind, LiteralKind::Int32);
//! assert_eq!(literals[1].word, Word::from(-1i32));
//! assert_eq!(literals[0].word, literals[2].word);
//! ```
use std::any::{Any, TypeId};
use std::fmt::{self, Debug};
use std::num::IntErrorKind;

use tracing::debug;

use crate::diagnostic::{Diagnostic, Label};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::span::FreeSpan;
use crate::Word;


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LiteralKind {
    Bool,
    Int32,
    Float32,
    Double,
    Raw,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Literal {
    pub kind: LiteralKind,
    pub word: Word,
    pub span: FreeSpan,
}

/// Parses every literal in `source`
///
/// Parsing continues past errors, all of them are returned at the end.
pub fn parse(source: &str) -> Result<Vec<Literal>, Vec<LiteralError>> {
    let mut lexer = Lexer::new(source);
    let mut literals = Vec::new();
    let mut errors = Vec::new();

    loop {
        let mut token = lexer.next();
        if token.kind == TokenKind::Eof {
            break;
        }

        // logos yields each unmatched character as its own error token
        if token.kind == TokenKind::Error {
            while lexer.peek().kind == TokenKind::Error && lexer.peek().span.start == token.span.end {
                token.span = FreeSpan::join(token.span, lexer.next().span);
            }
        }

        match parse_literal(token, token.span.slice(source)) {
            Ok(literal) => literals.push(literal),
            Err(err) => {
                debug!(?err, "invalid literal");
                errors.push(err);
            },
        }
    }

    if errors.is_empty() {
        Ok(literals)
    } else {
        Err(errors)
    }
}

fn parse_literal(token: Token, text: &str) -> Result<Literal, LiteralError> {
    let span = token.span;
    let (kind, word) = match token.kind {
        TokenKind::True => (LiteralKind::Bool, Word::from(true)),
        TokenKind::False => (LiteralKind::Bool, Word::from(false)),
        TokenKind::Int32 => (LiteralKind::Int32, Word::from(parse_int32(text, span)?)),
        TokenKind::Float32 => (LiteralKind::Float32, Word::from(parse_float32(text, span)?)),
        TokenKind::Double => (LiteralKind::Double, Word::from_f64(parse_double(text, span)?)),
        TokenKind::Hex => (LiteralKind::Raw, Word::from_bits(parse_hex(text, span)?)),
        TokenKind::Error | TokenKind::Eof => {
            return Err(LiteralError::new(InvalidToken { span }));
        },
    };

    Ok(Literal { kind, word, span })
}

fn strip_digits(text: &str) -> String {
    text.chars().filter(|&c| c != '_').collect()
}

fn parse_int32(text: &str, span: FreeSpan) -> Result<i32, LiteralError> {
    let digits = strip_digits(text.strip_suffix("i32").unwrap_or(text));
    digits.parse::<i32>().map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            LiteralError::new(IntOutOfRange { span })
        },
        _ => LiteralError::new(MalformedNumber { span }),
    })
}

/// Spelled out `inf` and `nan` with an optional sign
fn parse_special(text: &str) -> Option<f64> {
    let (negative, text) = match text.strip_prefix('-') {
        Some(text) => (true, text),
        None => (false, text),
    };
    let n = match text {
        "inf" => f64::INFINITY,
        "nan" => f64::NAN,
        _ => return None,
    };
    Some(if negative { -n } else { n })
}

fn parse_float32(text: &str, span: FreeSpan) -> Result<f32, LiteralError> {
    let text = text.strip_suffix("f32").unwrap_or(text);
    if let Some(n) = parse_special(text) {
        return Ok(n as f32);
    }
    strip_digits(text)
        .parse::<f32>()
        .map_err(|_| LiteralError::new(MalformedNumber { span }))
}

fn parse_double(text: &str, span: FreeSpan) -> Result<f64, LiteralError> {
    let text = text.strip_suffix("f64").unwrap_or(text);
    if let Some(n) = parse_special(text) {
        return Ok(n);
    }
    strip_digits(text)
        .parse::<f64>()
        .map_err(|_| LiteralError::new(MalformedNumber { span }))
}

fn parse_hex(text: &str, span: FreeSpan) -> Result<u64, LiteralError> {
    let digits = strip_digits(&text[2..]);
    u64::from_str_radix(&digits, 16).map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow => LiteralError::new(HexOutOfRange { span }),
        _ => LiteralError::new(MalformedNumber { span }),
    })
}


pub trait Error: Debug + Any {
    fn message(&self) -> String;

    fn labels(&self) -> Vec<Label>;

    fn notes(&self) -> Vec<String>;
}


pub struct LiteralError(Box<dyn Error>);

impl LiteralError {
    fn new(inner: impl Error) -> LiteralError {
        LiteralError(Box::new(inner))
    }

    pub fn is<E: Error>(&self) -> bool {
        // Propagate the type_id() method call down to the `dyn Error`
        (*self.0).type_id() == TypeId::of::<E>()
    }
}

impl Debug for LiteralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Diagnostic for LiteralError {
    fn message(&self) -> String {
        self.0.message()
    }

    fn labels(&self) -> Vec<Label> {
        self.0.labels()
    }

    fn notes(&self) -> Vec<String> {
        self.0.notes()
    }
}


macro_rules! define_error {
    (
        $name:ident {
            $( $field:ident : $field_ty:ident ),* $(,)?
        },
        message: $message:expr,
        labels: [ $( $label:expr ),* $(,)? ],
        $( notes: [ $( $note:expr ),* $(,)? ], )?
    ) => {
        #[derive(Debug)]
        pub struct $name {
            $( pub $field : $field_ty ),*
        }

        impl Error for $name {
            fn message(&self) -> String {
                #[allow(unused_variables)]
                let $name { $($field),* } = self;
                $message.to_string()
            }

            fn labels(&self) -> Vec<Label> {
                #[allow(unused_variables)]
                let $name { $($field),* } = self;
                vec![ $($label),* ]
            }

            fn notes(&self) -> Vec<String> {
                #[allow(unused_variables)]
                let $name { $($field),* } = self;
                vec![ $($($note.to_string()),*)? ]
            }
        }
    };
}


define_error! {
    InvalidToken {
        span: FreeSpan,
    },
    message: "invalid token",
    labels: [
        Label::primary(*span, "not a word literal"),
    ],
    notes: [
        "help: literals look like `true`, `-42i32`, `4.25f32`, `1.5` or `0x7ff8_0000_0000_0001`",
    ],
}

define_error! {
    IntOutOfRange {
        span: FreeSpan,
    },
    message: "integer literal out of range",
    labels: [
        Label::primary(*span, "does not fit an i32"),
    ],
    notes: [
        format!("note: i32 values range from {} to {}", i32::MIN, i32::MAX),
    ],
}

define_error! {
    HexOutOfRange {
        span: FreeSpan,
    },
    message: "raw word literal out of range",
    labels: [
        Label::primary(*span, "wider than 64 bits"),
    ],
}

define_error! {
    MalformedNumber {
        span: FreeSpan,
    },
    message: "malformed number literal",
    labels: [
        Label::primary(*span, "cannot be parsed"),
    ],
}


#[cfg(test)]
mod test {
    use termcolor::NoColor;
    use unindent::unindent;

    use super::*;
    use crate::diagnostic::Report;
    use crate::layout::NAN_VALUE;

    fn words(source: &str) -> Vec<Word> {
        match parse(source) {
            Ok(literals) => literals.into_iter().map(|literal| literal.word).collect(),
            Err(errors) => panic!("unexpected errors: {:?}", errors),
        }
    }

    fn render(error: &LiteralError, source: &str) -> String {
        let mut writer = NoColor::new(Vec::new());
        error.report_to("test", source, &mut writer).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn all_kinds() {
        crate::test::init();

        let source = unindent(
            "
            # one of each
            true, false
            -42i32 4.25f32 nanf32
            1.5 42 1e3f64 -inf
            0x7ff8_0400_0000_002a
            ",
        );
        let literals = parse(&source).unwrap();
        let kinds = literals.iter().map(|literal| literal.kind).collect::<Vec<_>>();

        use LiteralKind::*;
        assert_eq!(
            kinds,
            [Bool, Bool, Int32, Float32, Float32, Double, Double, Double, Double, Raw],
        );

        let words = literals.iter().map(|literal| literal.word).collect::<Vec<_>>();
        assert_eq!(words[0].downcast::<bool>(), Some(true));
        assert_eq!(words[2].downcast::<i32>(), Some(-42));
        assert_eq!(words[3].downcast::<f32>(), Some(4.25));
        assert!(words[4].downcast::<f32>().map_or(false, f32::is_nan));
        assert_eq!(words[5].to_f64(), Some(1.5));
        assert_eq!(words[6].to_f64(), Some(42.0));
        assert_eq!(words[7].to_f64(), Some(1000.0));
        assert_eq!(words[8].to_f64(), Some(f64::NEG_INFINITY));
        assert_eq!(words[9], Word::from(42i32));

        assert_eq!(literals[2].span.slice(&source), "-42i32");
    }

    #[test]
    fn int_edges() {
        assert_eq!(
            words("-2147483648i32 2_147_483_647i32"),
            [Word::from(i32::MIN), Word::from(i32::MAX)],
        );
    }

    #[test]
    fn double_nan_stays_double() {
        let words = words("nan -nan");
        assert_eq!(words[0].to_bits(), NAN_VALUE);
        assert!(words.iter().all(|word| word.is_double()));
    }

    #[test]
    fn raw_words_are_verbatim() {
        assert_eq!(words("0xFFFF_FFFF_FFFF_FFFF")[0].to_bits(), u64::MAX);
        assert_eq!(words("0x0")[0].to_f64(), Some(0.0));
    }

    #[test]
    fn collects_all_errors() {
        crate::test::init();

        let errors = parse("2147483648i32 true 0x1_0000_0000_0000_0000 maybe").unwrap_err();
        assert!(errors[0].is::<IntOutOfRange>());
        assert!(errors[1].is::<HexOutOfRange>());
        assert!(errors[2].is::<InvalidToken>());
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn invalid_text_is_one_error() {
        let source = "maybe 1i32 so";
        let errors = parse(source).unwrap_err();
        assert_eq!(errors.len(), 2);

        let report = render(&errors[0], source);
        assert_eq!(report.matches("not a word literal").count(), 1, "{}", report);
        assert!(report.contains("^^^^^"), "{}", report);
        assert!(!report.contains("^^^^^^"), "{}", report);
    }

    #[test]
    fn malformed() {
        let errors = parse("0x_ 1_i32").unwrap_err();
        assert!(errors[0].is::<MalformedNumber>());
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn report_int_out_of_range() {
        let source = "1i32 3000000000i32";
        let errors = parse(source).unwrap_err();
        let report = render(&errors[0], source);

        assert!(report.contains("error: integer literal out of range"), "{}", report);
        assert!(report.contains("does not fit an i32"), "{}", report);
        assert!(report.contains("note: i32 values range from -2147483648 to 2147483647"));
        assert!(report.contains("test:1:6"), "{}", report);
    }
}
