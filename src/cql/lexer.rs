// SPDX-FileCopyrightText: 2023 Jonathan Haigh <jonathanhaigh@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Types and functions related to lexing (tokenizing) CQL filter text.
use fancy_regex::Regex;
use miette::SourceSpan;
use once_cell::sync::Lazy;

use crate::error::{Error, Result};

/// Enumeration of the kinds of tokens recognized by the lexer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub enum TokenKind {
    /// `AND`
    And,
    /// `BBOX`
    BBox,
    /// `BETWEEN`
    Between,
    /// `,`
    Comma,
    /// End of the filter text
    Eof,
    /// `=`
    Equal,
    /// `FALSE`
    False,
    /// A float literal
    Float,
    /// A WKT geometry keyword, e.g. `POINT`
    Geometry,
    /// `>`
    Greater,
    /// `>=`
    GreaterOrEqual,
    /// An unquoted property name
    Ident,
    /// `ILIKE`
    ILike,
    /// An integer literal
    Int,
    /// `IS`
    Is,
    /// `<`
    Less,
    /// `<=`
    LessOrEqual,
    /// `LIKE`
    Like,
    /// `(`
    LParen,
    /// `NOT`
    Not,
    /// `<>`
    NotEqual,
    /// `NULL`
    Null,
    /// `OR`
    Or,
    /// A double quoted property name
    QuotedIdent,
    /// `)`
    RParen,
    /// A spatial predicate other than `BBOX`, e.g. `INTERSECTS`
    Spatial,
    /// A single quoted string literal
    Str,
    /// `TRUE`
    True,
    /// A string of whitespace
    Whitespace,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A token from the filter text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct Token {
    /// The region of the text that the token covers.
    pub span: SourceSpan,
    /// The kind of token.
    pub kind: TokenKind,
}

impl Token {
    #[must_use]
    /// Get the substring of the filter text that the token represents.
    ///
    /// # Parameters
    /// - `cql`: the filter text. This is required because `Token`s only contain indices into the
    ///   text, not the text itself.
    pub fn text<'q>(&self, cql: &'q str) -> &'q str {
        let start = self.span.offset();
        let end = start + self.span.len();
        &cql[start..end]
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{:?}({}, {})",
            self.kind,
            self.span.offset(),
            self.span.len(),
        )
    }
}

/// Compile the regex for a given kind of token.
///
/// # Panics
/// - If the regex can't be compiled.
fn token_regex_or_panic(kind: TokenKind, regex_str: &str) -> (TokenKind, Regex) {
    match Regex::new(regex_str) {
        Ok(r) => (kind, r),
        Err(e) => panic!("failed to compile regex for token kind {}: {}", kind, e),
    }
}

/// Compile a case insensitive regex matching a whole keyword (not the start of a longer
/// identifier).
fn keyword_regex_or_panic(kind: TokenKind, alternatives: &str) -> (TokenKind, Regex) {
    token_regex_or_panic(
        kind,
        &format!("(?i)^(?:{})(?![A-Za-z_0-9])", alternatives),
    )
}

/// Compile a case insensitive regex matching a keyword that starts a parenthesized list, like
/// `BBOX(` or `POINT(`. Without the parenthesis the word lexes as an identifier.
fn call_keyword_regex_or_panic(kind: TokenKind, alternatives: &str) -> (TokenKind, Regex) {
    token_regex_or_panic(kind, &format!(r"(?i)^(?:{})(?=\s*[(])", alternatives))
}

/// Match the next token in the filter text.
///
/// # Parameters
/// - `remaining`: the remaining unlexed part of the text.
///
/// # Returns
/// - `None` if a token could not be matched.
/// - `Some(kind, len)` where `kind` is kind of token matched and `len` is the length of the match.
///
/// # Panics
/// - If executing a regex for a token kind fails.
fn match_token(remaining: &str) -> Option<(TokenKind, usize)> {
    static REGEX_MAP: Lazy<Vec<(TokenKind, Regex)>> = Lazy::new(|| {
        vec![
            token_regex_or_panic(TokenKind::LParen, r"^[(]"),
            token_regex_or_panic(TokenKind::RParen, r"^[)]"),
            token_regex_or_panic(TokenKind::Comma, r"^,"),
            token_regex_or_panic(TokenKind::Str, r"^'(?:[^']|'')*'"),
            token_regex_or_panic(TokenKind::QuotedIdent, r#"^"[^"]+""#),
            // Order matters here:
            // * Prefer to match "<>" and "<=" than "<".
            // * Prefer to match ">=" than ">".
            token_regex_or_panic(TokenKind::NotEqual, r"^<>"),
            token_regex_or_panic(TokenKind::LessOrEqual, r"^<="),
            token_regex_or_panic(TokenKind::Less, r"^<"),
            token_regex_or_panic(TokenKind::GreaterOrEqual, r"^>="),
            token_regex_or_panic(TokenKind::Greater, r"^>"),
            token_regex_or_panic(TokenKind::Equal, r"^="),
            // Order matters here: keywords must be tried before identifiers.
            keyword_regex_or_panic(TokenKind::And, "AND"),
            keyword_regex_or_panic(TokenKind::Or, "OR"),
            keyword_regex_or_panic(TokenKind::Not, "NOT"),
            keyword_regex_or_panic(TokenKind::Like, "LIKE"),
            keyword_regex_or_panic(TokenKind::ILike, "ILIKE"),
            keyword_regex_or_panic(TokenKind::Between, "BETWEEN"),
            keyword_regex_or_panic(TokenKind::Is, "IS"),
            keyword_regex_or_panic(TokenKind::Null, "NULL"),
            keyword_regex_or_panic(TokenKind::True, "TRUE"),
            keyword_regex_or_panic(TokenKind::False, "FALSE"),
            call_keyword_regex_or_panic(TokenKind::BBox, "BBOX"),
            call_keyword_regex_or_panic(
                TokenKind::Spatial,
                "INTERSECTS|DISJOINT|CONTAINS|WITHIN|TOUCHES|CROSSES|OVERLAPS|EQUALS|DWITHIN|BEYOND",
            ),
            call_keyword_regex_or_panic(
                TokenKind::Geometry,
                "POINT|LINESTRING|POLYGON|MULTIPOINT|MULTILINESTRING|MULTIPOLYGON|GEOMETRYCOLLECTION|ENVELOPE",
            ),
            token_regex_or_panic(TokenKind::Ident, r"^[A-Za-z_][A-Za-z_0-9]*"),
            // Order matters here:
            // * Prefer to match an Int to a Float, but only if there's no "." or exponent after
            //   the int.
            token_regex_or_panic(TokenKind::Int, r"^[-]?[0-9]+(?![0-9.Ee])"),
            token_regex_or_panic(
                TokenKind::Float,
                r"^[-]?(?:[0-9]+[.][0-9]*|[.][0-9]+|[0-9]+(?=[Ee]))(?:[Ee][+-]?[0-9]+)?",
            ),
            token_regex_or_panic(TokenKind::Whitespace, r"^\s+"),
        ]
    });

    for (kind, regex) in &*REGEX_MAP {
        match regex.find(remaining) {
            Ok(Some(m)) => return Some((*kind, m.end())),
            Ok(None) => continue,
            Err(e) => panic!("failed to run regex match for token kind {}: {}", *kind, e),
        }
    }

    None
}

/// Generate an `Error::Lex` for unexpected text at a given offset in the filter text.
fn lex_error(cql: &str, offset: usize) -> Box<Error> {
    Box::new(Error::Lex {
        cql: cql.to_owned(),
        span: (offset, 0).into(),
    })
}

/// Lex CQL filter text into tokens.
///
/// # Parameters
/// - `cql`: the text to lex.
///
/// # Returns
/// - A `Vec<Token>` of tokens making up the text on success, always ending with an `Eof` token.
/// - An `Error::Lex` if lexing fails.
///
/// # Panics
/// - If regexes couldn't be compiled or executed.
pub fn lex(cql: &str) -> Result<Vec<Token>> {
    let mut offset = 0;
    let mut tokens = Vec::<Token>::new();

    loop {
        if offset == cql.len() {
            tokens.push(Token {
                span: (offset, 0).into(),
                kind: TokenKind::Eof,
            });
            return Ok(tokens);
        }

        assert!(offset < cql.len());

        match match_token(&cql[offset..]) {
            Some((TokenKind::Whitespace, len)) => {
                offset += len;
                continue;
            }
            Some((kind, len)) => {
                tokens.push(Token {
                    span: (offset, len).into(),
                    kind,
                });
                offset += len;
                continue;
            }
            None => return Err(lex_error(cql, offset)),
        }
    }
}
