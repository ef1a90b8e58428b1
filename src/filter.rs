// SPDX-FileCopyrightText: 2023 Jonathan Haigh <jonathanhaigh@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Structured filter model.
//!
//! This is the tree produced when reading CQL text or a GeoStyler expression and consumed when
//! building OGC filter XML. It has no knowledge of the text it was read from.

use crate::literal::Literal;

/// An enumeration of the binary comparison operators.
#[must_use]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl ComparisonOperator {
    /// Get the CQL spelling of the operator.
    pub fn cql_symbol(&self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "<>",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
        }
    }

    /// Get the local name of the OGC element for the operator.
    pub fn ogc_element(&self) -> &'static str {
        match self {
            Self::Equal => "PropertyIsEqualTo",
            Self::NotEqual => "PropertyIsNotEqualTo",
            Self::Less => "PropertyIsLessThan",
            Self::LessOrEqual => "PropertyIsLessThanOrEqualTo",
            Self::Greater => "PropertyIsGreaterThan",
            Self::GreaterOrEqual => "PropertyIsGreaterThanOrEqualTo",
        }
    }
}

/// A binary comparison between a property and a literal.
///
/// E.g. `population > 1000`.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    pub property: String,
    pub op: ComparisonOperator,
    pub value: Literal,
}

/// A pattern match on a property.
///
/// E.g. `name LIKE 'Fl%'` or `name ILIKE 'fl%'`.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct Like {
    pub property: String,
    pub pattern: String,
    pub match_case: bool,
}

/// An inclusive range check on a property.
///
/// E.g. `depth BETWEEN 10 AND 20`.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct Between {
    pub property: String,
    pub lower: Literal,
    pub upper: Literal,
}

/// A bounding box test on a geometry property.
///
/// E.g. `BBOX(the_geom, -10, 40, 5, 52, 'EPSG:4326')`.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct BBox {
    pub property: String,
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub crs: Option<String>,
}

/// A filter predicate.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
    Comparison(Comparison),
    Like(Like),
    Between(Between),
    IsNull(String),
    BBox(BBox),
}

impl Filter {
    /// Combine filters with AND, merging operands that are themselves ANDs.
    ///
    /// A single operand is returned as is.
    pub fn and(operands: Vec<Filter>) -> Self {
        Self::flatten(operands, Self::And, |f| match f {
            Self::And(inner) => Ok(inner),
            other => Err(other),
        })
    }

    /// Combine filters with OR, merging operands that are themselves ORs.
    ///
    /// A single operand is returned as is.
    pub fn or(operands: Vec<Filter>) -> Self {
        Self::flatten(operands, Self::Or, |f| match f {
            Self::Or(inner) => Ok(inner),
            other => Err(other),
        })
    }

    /// Negate a filter.
    pub fn not(operand: Filter) -> Self {
        Self::Not(Box::new(operand))
    }

    fn flatten(
        operands: Vec<Filter>,
        combine: fn(Vec<Filter>) -> Filter,
        split: fn(Filter) -> Result<Vec<Filter>, Filter>,
    ) -> Self {
        let mut flat = Vec::with_capacity(operands.len());
        for operand in operands {
            match split(operand) {
                Ok(inner) => flat.extend(inner),
                Err(other) => flat.push(other),
            }
        }
        if flat.len() == 1 {
            flat.remove(0)
        } else {
            combine(flat)
        }
    }
}
