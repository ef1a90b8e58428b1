// SPDX-FileCopyrightText: 2023 Jonathan Haigh <jonathanhaigh@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The converter registry: which format can be converted to which, and how.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::cql;
use crate::descriptor::FilterDescriptor;
use crate::error::{Error, Result};
use crate::format::{AsFormat, Format};
use crate::geostyler::{self, Expression};
use crate::logic;
use crate::ogc::FilterBuilder;
use crate::options::ConvertOptions;

/// The result of a conversion.
#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Output {
    Cql(String),
    Ogc(String),
    GeoStyler(Expression),
}

impl Output {
    /// Get the format of the output.
    pub fn format(&self) -> Format {
        match self {
            Self::Cql(_) => Format::Cql,
            Self::Ogc(_) => Format::Ogc,
            Self::GeoStyler(_) => Format::GeoStyler,
        }
    }

    /// Check whether the output is an empty filter: empty text or an empty expression.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Cql(text) | Self::Ogc(text) => text.is_empty(),
            Self::GeoStyler(expr) => *expr == Expression::Empty,
        }
    }

    /// Get the output as text, with GeoStyler expressions serialized as JSON.
    pub fn into_text(self) -> String {
        match self {
            Self::Cql(text) | Self::Ogc(text) => text,
            Self::GeoStyler(expr) => expression_json(&expr),
        }
    }

    /// Get the output as a GeoStyler expression, with text kept as an unsupported string node.
    pub fn into_expression(self) -> Expression {
        match self {
            Self::GeoStyler(expr) => expr,
            Self::Cql(text) | Self::Ogc(text) => Expression::Unsupported(Value::String(text)),
        }
    }
}

fn expression_json(expr: &Expression) -> String {
    // Serializing an Expression to a string can't fail: it has no non-string map keys.
    serde_json::to_string(expr).unwrap_or_default()
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cql(text) | Self::Ogc(text) => write!(f, "{}", text),
            Self::GeoStyler(expr) => write!(f, "{}", expression_json(expr)),
        }
    }
}

/// A function converting a filter descriptor to another format.
///
/// The registry is passed in so that converters for composite filters can convert the filters
/// they contain.
pub type Converter = fn(&Registry, &FilterDescriptor, &ConvertOptions) -> Result<Output>;

/// A table of converters indexed by source and target format.
#[must_use]
#[derive(Clone, Default)]
pub struct Registry {
    converters: HashMap<Format, HashMap<Format, Converter>>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<(Format, Format)> = self
            .converters
            .iter()
            .flat_map(|(from, targets)| targets.keys().map(move |to| (*from, *to)))
            .collect();
        f.debug_struct("Registry").field("converters", &pairs).finish()
    }
}

impl Registry {
    /// Create a registry with no converters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the standard converters.
    ///
    /// | from \ to | cql | ogc | geostyler |
    /// |-----------|-----|-----|-----------|
    /// | logic     | yes | yes | yes       |
    /// | cql       | yes | yes | no        |
    /// | geostyler | yes | yes | yes       |
    pub fn standard() -> Self {
        Self::new()
            .with(Format::Logic, Format::Cql, logic_to_cql)
            .with(Format::Logic, Format::Ogc, logic_to_ogc)
            .with(Format::Logic, Format::GeoStyler, logic_to_geostyler)
            .with(Format::Cql, Format::Cql, cql_to_cql)
            .with(Format::Cql, Format::Ogc, cql_to_ogc)
            .with(Format::GeoStyler, Format::Cql, geostyler_to_cql)
            .with(Format::GeoStyler, Format::Ogc, geostyler_to_ogc)
            .with(Format::GeoStyler, Format::GeoStyler, geostyler_to_geostyler)
    }

    /// Add a converter, replacing any existing converter for the same formats.
    pub fn with(mut self, from: Format, to: Format, converter: Converter) -> Self {
        self.converters
            .entry(from)
            .or_default()
            .insert(to, converter);
        self
    }

    /// Get the converter between two formats.
    ///
    /// # Parameters
    /// - `from`: the source format: a `Format`, a format name or a filter descriptor.
    /// - `to`: the target format: a `Format` or a format name.
    ///
    /// # Returns
    /// - `None` if either format is unknown or there is no converter between them.
    pub fn get_converter<F: AsFormat, T: AsFormat>(&self, from: F, to: T) -> Option<Converter> {
        let from = from.as_format()?;
        let to = to.as_format()?;
        self.converters.get(&from)?.get(&to).copied()
    }

    /// Check whether there is a converter between two formats.
    pub fn can_convert<F: AsFormat, T: AsFormat>(&self, from: F, to: T) -> bool {
        self.get_converter(from, to).is_some()
    }

    /// Convert a filter descriptor to another format.
    pub fn convert(
        &self,
        filter: &FilterDescriptor,
        to: Format,
        opts: &ConvertOptions,
    ) -> Result<Output> {
        let converter = self.get_converter(filter, to).ok_or_else(|| {
            Box::new(Error::UnsupportedConversion {
                from: filter.format_name().to_owned(),
                to: to.name().to_owned(),
            })
        })?;
        debug!(from = filter.format_name(), to = to.name(), "converting filter");
        converter(self, filter, opts)
    }
}

static STANDARD: Lazy<Registry> = Lazy::new(Registry::standard);

/// Get the registry with the standard converters.
pub fn standard() -> &'static Registry {
    &STANDARD
}

/// Get a converter from the standard registry.
pub fn get_converter<F: AsFormat, T: AsFormat>(from: F, to: T) -> Option<Converter> {
    standard().get_converter(from, to)
}

/// Check whether the standard registry has a converter between two formats.
///
/// # Examples
/// ```
/// use ogcfilter::can_convert;
///
/// assert!(can_convert("cql", "ogc"));
/// assert!(!can_convert("ogc", "logic"));
/// ```
pub fn can_convert<F: AsFormat, T: AsFormat>(from: F, to: T) -> bool {
    standard().can_convert(from, to)
}

/// Convert a filter descriptor using the standard registry.
pub fn convert(filter: &FilterDescriptor, to: Format, opts: &ConvertOptions) -> Result<Output> {
    standard().convert(filter, to, opts)
}

/// Create the error for a converter given a descriptor of the wrong format.
pub(crate) fn format_mismatch(expected: Format, got: &FilterDescriptor) -> Box<Error> {
    Box::new(Error::FormatMismatch {
        expected: expected.name().to_owned(),
        got: got.format_name().to_owned(),
    })
}

fn logic_to_cql(
    registry: &Registry,
    filter: &FilterDescriptor,
    opts: &ConvertOptions,
) -> Result<Output> {
    logic::to_cql(registry, filter, opts).map(Output::Cql)
}

fn logic_to_ogc(
    registry: &Registry,
    filter: &FilterDescriptor,
    opts: &ConvertOptions,
) -> Result<Output> {
    logic::to_ogc(registry, filter, opts).map(Output::Ogc)
}

fn logic_to_geostyler(
    registry: &Registry,
    filter: &FilterDescriptor,
    opts: &ConvertOptions,
) -> Result<Output> {
    logic::to_geostyler(registry, filter, opts).map(Output::GeoStyler)
}

fn cql_body(filter: &FilterDescriptor) -> Result<&str> {
    match filter {
        FilterDescriptor::Cql { body } => Ok(body),
        other => Err(format_mismatch(Format::Cql, other)),
    }
}

fn cql_to_cql(_: &Registry, filter: &FilterDescriptor, _: &ConvertOptions) -> Result<Output> {
    cql_body(filter).map(|body| Output::Cql(body.to_owned()))
}

fn cql_to_ogc(_: &Registry, filter: &FilterDescriptor, opts: &ConvertOptions) -> Result<Output> {
    let body = cql_body(filter)?;
    if body.trim().is_empty() {
        return Ok(Output::Ogc(String::new()));
    }
    let parsed = cql::read(body)?;
    Ok(Output::Ogc(FilterBuilder::new(&opts.filter_ns).build(&parsed)))
}

fn geostyler_body(filter: &FilterDescriptor) -> Result<&Expression> {
    match filter {
        FilterDescriptor::GeoStyler { body } => Ok(body),
        other => Err(format_mismatch(Format::GeoStyler, other)),
    }
}

fn geostyler_to_cql(
    _: &Registry,
    filter: &FilterDescriptor,
    _: &ConvertOptions,
) -> Result<Output> {
    geostyler_body(filter).map(|body| Output::Cql(geostyler::to_cql(body)))
}

fn geostyler_to_ogc(
    _: &Registry,
    filter: &FilterDescriptor,
    opts: &ConvertOptions,
) -> Result<Output> {
    let body = geostyler_body(filter)?;
    Ok(Output::Ogc(geostyler::to_ogc(
        body,
        &FilterBuilder::new(&opts.filter_ns),
    )))
}

fn geostyler_to_geostyler(
    _: &Registry,
    filter: &FilterDescriptor,
    _: &ConvertOptions,
) -> Result<Output> {
    geostyler_body(filter).map(|body| Output::GeoStyler(body.clone()))
}
