// SPDX-FileCopyrightText: 2023 Jonathan Haigh <jonathanhaigh@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Error types.
use miette::{Diagnostic, SourceSpan};
use thiserror::Error as ThisError;

use crate::cql::lexer::TokenKind;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Lex,
    UnexpectedToken,
    ParseValue,
    UnsupportedGeometry,
    InvalidDescriptor,
    UnsupportedConversion,
    MissingConverter,
    FormatMismatch,
    Input,
    Serialize,
}

/// Type of error used throughout the crate.
///
/// Errors raised while reading CQL text carry the text as their source code and a
/// `span: SourceSpan` pointing to the offending part of it.
#[derive(Debug, Diagnostic, ThisError)]
#[must_use]
pub enum Error {
    /// A lexing error in CQL text.
    #[error("unrecognized token in CQL filter")]
    Lex {
        #[source_code]
        cql: String,

        #[label("unrecognized token")]
        span: SourceSpan,
    },

    /// A token that is not valid in its position in the CQL text.
    #[error("unexpected {kind} token expecting {}", itertools::join(expecting.iter(), ", "))]
    #[diagnostic()]
    UnexpectedToken {
        #[source_code]
        cql: String,

        #[label("unexpected token")]
        span: SourceSpan,

        kind: TokenKind,
        expecting: Vec<TokenKind>,
    },

    /// A literal that is grammatically correct but doesn't fit its destination type.
    #[error("{desc}")]
    #[diagnostic()]
    ParseValue {
        #[source_code]
        cql: String,

        #[label("failed to parse this")]
        span: SourceSpan,

        desc: String,
    },

    /// A WKT geometry literal in a spatial predicate.
    ///
    /// E.g. `INTERSECTS(the_geom, POINT(1 2))`.
    #[error("{geometry} geometry literals are not supported in CQL filters")]
    #[diagnostic(help("use BBOX(property, minx, miny, maxx, maxy) for spatial filtering"))]
    UnsupportedGeometry {
        #[source_code]
        cql: String,

        #[label("geometry literal")]
        span: SourceSpan,

        geometry: String,
    },

    /// A filter descriptor that could not be deserialized.
    #[error("invalid filter descriptor: {source}")]
    #[diagnostic()]
    InvalidDescriptor {
        #[source]
        source: serde_json::Error,
    },

    /// No converter is registered for a pair of formats.
    #[error("no converter from {from} to {to}")]
    #[diagnostic()]
    UnsupportedConversion { from: String, to: String },

    /// A child of a logic filter has no converter to the requested format.
    #[error("logic filter child with format {from} cannot be converted to {to}")]
    #[diagnostic(help("set the missing converter policy to skip or placeholder to ignore it"))]
    MissingConverter { from: String, to: String },

    /// A converter was given a filter of a format it does not handle.
    #[error("converter for {expected} filters called with a {got} filter")]
    #[diagnostic()]
    FormatMismatch { expected: String, got: String },

    /// An error reading the input filter.
    #[error("failed to read filter from {origin}")]
    #[diagnostic()]
    Input {
        origin: String,

        #[source]
        source: std::io::Error,
    },

    /// An error when the output serializer fails.
    #[error("internal error: failed to serialize output: {msg}")]
    #[diagnostic()]
    Serialize { msg: String },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Lex { .. } => ErrorKind::Lex,
            Error::UnexpectedToken { .. } => ErrorKind::UnexpectedToken,
            Error::ParseValue { .. } => ErrorKind::ParseValue,
            Error::UnsupportedGeometry { .. } => ErrorKind::UnsupportedGeometry,
            Error::InvalidDescriptor { .. } => ErrorKind::InvalidDescriptor,
            Error::UnsupportedConversion { .. } => ErrorKind::UnsupportedConversion,
            Error::MissingConverter { .. } => ErrorKind::MissingConverter,
            Error::FormatMismatch { .. } => ErrorKind::FormatMismatch,
            Error::Input { .. } => ErrorKind::Input,
            Error::Serialize { .. } => ErrorKind::Serialize,
        }
    }
}

/// A value or an `Error`
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// A value, `None` or an `Error`
pub type OptResult<T> = Result<Option<T>>;
