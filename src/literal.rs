// SPDX-FileCopyrightText: 2023 Jonathan Haigh <jonathanhaigh@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Literal values compared against feature properties.

use std::fmt;

use serde::Serialize;

use crate::util::escape_xml;

/// The kind of a literal value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LiteralKind {
    Str,
    Int,
    Float,
    Bool,
}

impl LiteralKind {
    /// Get the name of the kind of literal.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Str => "str",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
        }
    }
}

impl fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A literal value in a filter.
///
/// Serializes to the bare JSON value, which is how literals appear inside GeoStyler expressions.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Literal {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Literal {
    /// Get the kind of the literal.
    pub fn kind(&self) -> LiteralKind {
        match self {
            Self::Str(_) => LiteralKind::Str,
            Self::Int(_) => LiteralKind::Int,
            Self::Float(_) => LiteralKind::Float,
            Self::Bool(_) => LiteralKind::Bool,
        }
    }

    /// Build a literal from a JSON value.
    ///
    /// # Returns
    /// - `None` if the value is not a string, number or boolean.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Some(Self::Str(s.clone())),
            serde_json::Value::Bool(b) => Some(Self::Bool(*b)),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Self::Int(i)),
                None => n.as_f64().map(Self::Float),
            },
            _ => None,
        }
    }

    /// Render the literal as CQL text.
    ///
    /// Strings are single quoted with embedded quotes doubled, booleans are `TRUE` or `FALSE`
    /// and numbers are written as they would be displayed.
    pub fn to_cql(&self) -> String {
        match self {
            Self::Str(s) => format!("'{}'", s.replace('\'', "''")),
            Self::Bool(true) => "TRUE".to_owned(),
            Self::Bool(false) => "FALSE".to_owned(),
            Self::Int(_) | Self::Float(_) => self.to_string(),
        }
    }

    /// Render the literal as the XML-escaped text content of an OGC `Literal` element.
    pub fn to_ogc(&self) -> String {
        match self {
            Self::Str(s) => escape_xml(s),
            _ => self.to_string(),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{}", s),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => write_float(f, *x),
            Self::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Write a float in plain decimal notation, switching to exponent notation (`1e+21`, `1e-7`)
/// for magnitudes of at least 1e21 or below 1e-6.
fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    let magnitude = x.abs();
    if magnitude == 0.0 {
        return write!(f, "0");
    }
    if !(1e-6..1e21).contains(&magnitude) {
        let exp = format!("{:e}", x);
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => {
                write!(f, "{}e+{}", mantissa, power)
            }
            _ => write!(f, "{}", exp),
        };
    }
    write!(f, "{}", x)
}
