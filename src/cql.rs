// SPDX-FileCopyrightText: 2023 Jonathan Haigh <jonathanhaigh@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Reading CQL filter text.
//!
//! The reader is used to turn CQL bodies into OGC filter XML. CQL is otherwise treated as opaque
//! text and passed through unchanged.

use crate::error::Result;
use crate::filter::Filter;

pub mod lexer;
pub mod parser;

/// Read CQL filter text into a `Filter`.
///
/// # Examples
/// ```
/// use ogcfilter::cql;
/// use ogcfilter::filter::{Comparison, ComparisonOperator, Filter};
/// use ogcfilter::literal::Literal;
///
/// let filter = cql::read("prop = 1").unwrap();
/// assert_eq!(
///     filter,
///     Filter::Comparison(Comparison {
///         property: "prop".to_owned(),
///         op: ComparisonOperator::Equal,
///         value: Literal::Int(1),
///     })
/// );
/// ```
pub fn read(cql: &str) -> Result<Filter> {
    let tokens = lexer::lex(cql)?;
    parser::Parser::new(cql, &tokens).parse()
}
