//! # Lexer
//!
//! Turns uxncle source text into a flat token stream. Built on `logos` for
//! the pattern matching; the wrapping [`tokenize`] function layers line
//! tracking and the numeric/character-literal payload decoding on top, since
//! numeric conversion is deliberately deferred to the parser and character
//! escapes need a bit more than a single regex can express.
//!
//! Tokens borrow from the source buffer they were scanned from — nothing is
//! copied except the decoded byte value of a character literal.

use std::ops::Range;

use logos::Logos;

use crate::compiler::error::{CompileError, LexError};
use crate::debug;

/// The raw categories `logos` recognizes directly. `Eof` has no pattern of
/// its own — it is synthesized by [`tokenize`] once the scanner is spent —
/// so it lives on [`TokenKind`] instead of here.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = LexError)]
#[logos(skip r"[ \t\r\n]+")]
enum RawToken<'src> {
    #[token("char")]
    Char,
    #[token("int")]
    Int,
    #[token("bool")]
    Bool,
    #[token("void")]
    Void,
    #[token("prntint")]
    PrintInt,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("for")]
    For,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice())]
    Identifier(&'src str),

    #[regex(r"0[xX][0-9a-fA-F]+", |lex| lex.slice())]
    Hex(&'src str),

    #[regex(r"[0-9]+", |lex| lex.slice())]
    Number(&'src str),

    #[regex(r"'(\\.|[^'\\\n])*'?", char_literal)]
    CharLit(u8),

    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("{")]
    LeftBrace,
    #[token("}")]
    RightBrace,
    #[token("[")]
    LeftBracket,
    #[token("]")]
    RightBracket,
    #[token(";")]
    Semicolon,
    #[token("#")]
    Hash,

    #[token("==")]
    EqualEqual,
    #[token("!=")]
    BangEqual,
    #[token("<=")]
    LessEqual,
    #[token(">=")]
    GreaterEqual,
    #[token("=")]
    Equal,
    #[token("!")]
    Bang,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
}

/// Decodes a `'...'` literal's body into its single byte value. The regex is
/// deliberately lenient about the closing quote (it is optional in the
/// pattern) so a missing-close literal still reaches this callback and gets
/// a proper diagnostic instead of silently falling through as "unrecognized".
fn char_literal<'src>(lex: &mut logos::Lexer<'src, RawToken<'src>>) -> Result<u8, LexError> {
    let slice = lex.slice();
    if slice.len() < 2 || !slice.ends_with('\'') {
        return Err(LexError::UnterminatedCharLiteral);
    }
    let inner = &slice[1..slice.len() - 1];
    let mut chars = inner.chars();
    let value = match chars.next() {
        Some('\\') => match chars.next() {
            Some('\\') => b'\\',
            Some('\'') => b'\'',
            Some('n') => b'\n',
            Some('t') => b'\t',
            Some('r') => b'\r',
            Some(other) => return Err(LexError::UnknownEscape(other)),
            None => return Err(LexError::UnterminatedCharLiteral),
        },
        Some(c) if c.is_ascii() => c as u8,
        Some(c) => return Err(LexError::NonAsciiChar(c)),
        None => return Err(LexError::UnterminatedCharLiteral),
    };
    if chars.next().is_some() {
        return Err(LexError::MalformedCharLiteral);
    }
    Ok(value)
}

/// The full token kind taxonomy, including the two kinds `logos` itself
/// never produces: end-of-file (synthesized once scanning is done) and the
/// "unrecognized character" case logos reports via its default error value.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind<'src> {
    Char,
    Int,
    Bool,
    Void,
    PrintInt,
    If,
    Else,
    While,
    For,
    Identifier(&'src str),
    Hex(&'src str),
    Number(&'src str),
    CharLit(u8),
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Semicolon,
    Hash,
    EqualEqual,
    BangEqual,
    LessEqual,
    GreaterEqual,
    Equal,
    Bang,
    Less,
    Greater,
    Plus,
    Minus,
    Star,
    Slash,
    Eof,
    Unrecognized(&'src str),
    Error(LexError),
}

impl<'src> TokenKind<'src> {
    fn from_raw(raw: RawToken<'src>) -> Self {
        match raw {
            RawToken::Char => TokenKind::Char,
            RawToken::Int => TokenKind::Int,
            RawToken::Bool => TokenKind::Bool,
            RawToken::Void => TokenKind::Void,
            RawToken::PrintInt => TokenKind::PrintInt,
            RawToken::If => TokenKind::If,
            RawToken::Else => TokenKind::Else,
            RawToken::While => TokenKind::While,
            RawToken::For => TokenKind::For,
            RawToken::Identifier(s) => TokenKind::Identifier(s),
            RawToken::Hex(s) => TokenKind::Hex(s),
            RawToken::Number(s) => TokenKind::Number(s),
            RawToken::CharLit(b) => TokenKind::CharLit(b),
            RawToken::LeftParen => TokenKind::LeftParen,
            RawToken::RightParen => TokenKind::RightParen,
            RawToken::LeftBrace => TokenKind::LeftBrace,
            RawToken::RightBrace => TokenKind::RightBrace,
            RawToken::LeftBracket => TokenKind::LeftBracket,
            RawToken::RightBracket => TokenKind::RightBracket,
            RawToken::Semicolon => TokenKind::Semicolon,
            RawToken::Hash => TokenKind::Hash,
            RawToken::EqualEqual => TokenKind::EqualEqual,
            RawToken::BangEqual => TokenKind::BangEqual,
            RawToken::LessEqual => TokenKind::LessEqual,
            RawToken::GreaterEqual => TokenKind::GreaterEqual,
            RawToken::Equal => TokenKind::Equal,
            RawToken::Bang => TokenKind::Bang,
            RawToken::Less => TokenKind::Less,
            RawToken::Greater => TokenKind::Greater,
            RawToken::Plus => TokenKind::Plus,
            RawToken::Minus => TokenKind::Minus,
            RawToken::Star => TokenKind::Star,
            RawToken::Slash => TokenKind::Slash,
        }
    }

    /// A short human-readable label, used in parse-error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Char => "'char'".into(),
            TokenKind::Int => "'int'".into(),
            TokenKind::Bool => "'bool'".into(),
            TokenKind::Void => "'void'".into(),
            TokenKind::PrintInt => "'prntint'".into(),
            TokenKind::If => "'if'".into(),
            TokenKind::Else => "'else'".into(),
            TokenKind::While => "'while'".into(),
            TokenKind::For => "'for'".into(),
            TokenKind::Identifier(s) => format!("identifier '{s}'"),
            TokenKind::Hex(s) => format!("hex literal '{s}'"),
            TokenKind::Number(s) => format!("number '{s}'"),
            TokenKind::CharLit(b) => format!("character literal '{}'", *b as char),
            TokenKind::LeftParen => "'('".into(),
            TokenKind::RightParen => "')'".into(),
            TokenKind::LeftBrace => "'{'".into(),
            TokenKind::RightBrace => "'}'".into(),
            TokenKind::LeftBracket => "'['".into(),
            TokenKind::RightBracket => "']'".into(),
            TokenKind::Semicolon => "';'".into(),
            TokenKind::Hash => "'#'".into(),
            TokenKind::EqualEqual => "'=='".into(),
            TokenKind::BangEqual => "'!='".into(),
            TokenKind::LessEqual => "'<='".into(),
            TokenKind::GreaterEqual => "'>='".into(),
            TokenKind::Equal => "'='".into(),
            TokenKind::Bang => "'!'".into(),
            TokenKind::Less => "'<'".into(),
            TokenKind::Greater => "'>'".into(),
            TokenKind::Plus => "'+'".into(),
            TokenKind::Minus => "'-'".into(),
            TokenKind::Star => "'*'".into(),
            TokenKind::Slash => "'/'".into(),
            TokenKind::Eof => "end of file".into(),
            TokenKind::Unrecognized(s) => format!("unrecognized character '{s}'"),
            TokenKind::Error(e) => format!("malformed token ({e})"),
        }
    }
}

/// A single scanned token: its kind, the exact source slice it came from,
/// its byte span, and its 1-indexed line.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'src> {
    pub kind: TokenKind<'src>,
    pub lexeme: &'src str,
    pub span: Range<usize>,
    pub line: u32,
}

impl<'src> Token<'src> {
    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}

/// Scans the whole source buffer up front and returns its token stream,
/// terminated by a single `Eof` token. Fails fast on the first malformed or
/// unrecognized character, matching the rest of the compiler's one-shot,
/// no-recovery error discipline.
pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, CompileError> {
    debug::log_lexer(&format!("tokenizing {} bytes", source.len()));

    let mut lexer = RawToken::lexer(source);
    let mut tokens = Vec::new();
    let mut line: u32 = 1;
    let mut prev_end = 0usize;

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        line += source[prev_end..span.start].matches('\n').count() as u32;
        prev_end = span.end;
        let slice = lexer.slice();

        let kind = match result {
            Ok(raw) => TokenKind::from_raw(raw),
            Err(LexError::UnexpectedCharacter) => TokenKind::Unrecognized(slice),
            Err(other) => TokenKind::Error(other),
        };

        match kind {
            TokenKind::Unrecognized(_) => {
                return Err(CompileError::lex(line, LexError::UnexpectedCharacter));
            }
            TokenKind::Error(e) => return Err(CompileError::lex(line, e)),
            _ => {}
        }

        debug::log_lexer(&format!("{line}: {slice:?} -> {kind:?}"));
        tokens.push(Token {
            kind,
            lexeme: slice,
            span,
            line,
        });
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        lexeme: "",
        span: prev_end..prev_end,
        line,
    });

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind<'_>> {
        tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn scans_keywords_and_punctuation() {
        let k = kinds("int x = 5;");
        assert_eq!(
            k,
            vec![
                TokenKind::Int,
                TokenKind::Identifier("x"),
                TokenKind::Equal,
                TokenKind::Number("5"),
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn two_char_operators_take_priority_over_one_char() {
        let k = kinds("a <= b >= c == d != e");
        assert!(k.contains(&TokenKind::LessEqual));
        assert!(k.contains(&TokenKind::GreaterEqual));
        assert!(k.contains(&TokenKind::EqualEqual));
        assert!(k.contains(&TokenKind::BangEqual));
        assert!(!k.contains(&TokenKind::Less));
        assert!(!k.contains(&TokenKind::Greater));
    }

    #[test]
    fn hex_literal_wins_over_decimal_prefix() {
        let k = kinds("0xFF");
        assert_eq!(k, vec![TokenKind::Hex("0xFF"), TokenKind::Eof]);
    }

    #[test]
    fn char_literal_decodes_escapes() {
        let k = kinds(r"'a' '\n' '\\'");
        assert_eq!(
            k,
            vec![
                TokenKind::CharLit(b'a'),
                TokenKind::CharLit(b'\n'),
                TokenKind::CharLit(b'\\'),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn tracks_line_numbers_across_newlines() {
        let tokens = tokenize("int x;\nint y;\n").unwrap();
        let lines: Vec<u32> = tokens.iter().map(|t| t.line).collect();
        assert_eq!(lines[0], 1); // int
        assert_eq!(lines[3], 2); // second int, after one newline
    }

    #[test]
    fn unknown_escape_is_a_lex_error() {
        let err = tokenize(r"'\z'").unwrap_err();
        assert!(matches!(err, CompileError::LexError { .. }));
    }

    #[test]
    fn unterminated_char_literal_is_a_lex_error() {
        let err = tokenize("'a").unwrap_err();
        assert!(matches!(err, CompileError::LexError { .. }));
    }

    /// `!`, `[`, `]`, and `#` are lexed like any other single-char
    /// punctuation even though no grammar rule in the parser consumes them
    /// yet — the same "lexed but not yet wired into a statement/expression
    /// form" precedent already used for character literals.
    #[test]
    fn lone_punctuation_not_yet_consumed_by_the_grammar_still_tokenizes() {
        let k = kinds("! [ ] #");
        assert_eq!(
            k,
            vec![
                TokenKind::Bang,
                TokenKind::LeftBracket,
                TokenKind::RightBracket,
                TokenKind::Hash,
                TokenKind::Eof,
            ]
        );
    }

    // ------------------------------------------------------------------
    // Property-based tests — tokenize() is pure in the source buffer: a
    // given byte sequence always scans to the same token stream, and
    // re-tokenizing that stream's own lexemes reproduces it.
    // ------------------------------------------------------------------

    #[test]
    fn property_tokenizing_is_a_pure_function_of_the_source_buffer() {
        use proptest::prelude::*;

        proptest!(|(source in "[a-zA-Z_][a-zA-Z0-9_]{0,16}( [0-9]{1,6})?")| {
            let a = kinds(&source);
            let b = kinds(&source);
            prop_assert_eq!(a, b);
        });
    }

    #[test]
    fn property_arbitrary_identifiers_scan_as_one_token() {
        use proptest::prelude::*;

        // Exclude the reserved-word spellings, which scan as keywords instead.
        let reserved = [
            "char", "int", "bool", "void", "prntint", "if", "else", "while", "for",
        ];
        proptest!(|(ident in "[a-zA-Z_][a-zA-Z0-9_]{0,20}")| {
            prop_assume!(!reserved.contains(&ident.as_str()));
            let k = kinds(&ident);
            prop_assert_eq!(k.len(), 2); // identifier + Eof
            prop_assert!(matches!(k[0], TokenKind::Identifier(_)));
        });
    }

    #[test]
    fn property_arbitrary_decimal_digits_scan_as_one_number_token() {
        use proptest::prelude::*;

        proptest!(|(digits in "[0-9]{1,9}")| {
            let k = kinds(&digits);
            prop_assert_eq!(k.len(), 2);
            prop_assert!(matches!(k[0], TokenKind::Number(_)));
        });
    }

    #[test]
    fn property_arbitrary_hex_digits_scan_as_one_hex_token() {
        use proptest::prelude::*;

        proptest!(|(digits in "[0-9a-fA-F]{1,8}")| {
            let source = format!("0x{digits}");
            let k = kinds(&source);
            prop_assert_eq!(k.len(), 2);
            prop_assert!(matches!(k[0], TokenKind::Hex(_)));
        });
    }
}
