// SPDX-FileCopyrightText: 2023 Jonathan Haigh <jonathanhaigh@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Converting logic filters.
//!
//! A logic filter combines other filters, of any format, with `AND`, `OR` or `NOT`. Each child is
//! converted with the converter the registry has for the child's own format.

use serde_json::Value;
use tracing::{trace, warn};

use crate::descriptor::{FilterDescriptor, LogicOperator};
use crate::error::{Error, OptResult, Result};
use crate::format::Format;
use crate::geostyler::Expression;
use crate::ogc::FilterBuilder;
use crate::options::{ConvertOptions, MissingConverter};
use crate::registry::{format_mismatch, Output, Registry};

/// The shape of a logic filter once its children have been converted.
enum Arrangement<T> {
    Empty,
    Negated(T),
    Single(T),
    Many(LogicOperator, Vec<T>),
}

impl<T> Arrangement<T> {
    fn new(logic: LogicOperator, mut children: Vec<T>) -> Self {
        if children.is_empty() {
            return Self::Empty;
        }
        if logic == LogicOperator::Not {
            if children.len() > 1 {
                warn!(
                    ignored = children.len() - 1,
                    "NOT filter has more than one operand, using the first"
                );
            }
            return Self::Negated(children.swap_remove(0));
        }
        if children.len() == 1 {
            return Self::Single(children.swap_remove(0));
        }
        Self::Many(logic, children)
    }
}

/// Get the operator and children of a logic filter.
///
/// # Returns
/// - `None` if the filter has no operator. It converts to an empty filter.
fn logic_parts(filter: &FilterDescriptor) -> OptResult<(LogicOperator, &[FilterDescriptor])> {
    match filter {
        FilterDescriptor::Logic {
            logic: Some(logic),
            filters,
        } => Ok(Some((*logic, filters))),
        FilterDescriptor::Logic {
            logic: None,
            filters,
        } => {
            warn!(
                ignored = filters.len(),
                "logic filter has no operator, converting to an empty filter"
            );
            Ok(None)
        }
        other => Err(format_mismatch(Format::Logic, other)),
    }
}

/// Convert each child of a logic filter to `to`.
///
/// Children without a converter are handled according to the missing converter policy: `None`
/// in the result marks a placeholder.
fn convert_children(
    registry: &Registry,
    filters: &[FilterDescriptor],
    to: Format,
    opts: &ConvertOptions,
) -> Result<Vec<Option<Output>>> {
    let mut children = Vec::with_capacity(filters.len());
    for (index, child) in filters.iter().enumerate() {
        trace!(index, format = child.format_name(), "converting logic filter child");
        if registry.can_convert(child, to) {
            children.push(Some(registry.convert(child, to, opts)?));
            continue;
        }
        match opts.missing_converter {
            MissingConverter::Fail => {
                return Err(Box::new(Error::MissingConverter {
                    from: child.format_name().to_owned(),
                    to: to.name().to_owned(),
                }))
            }
            MissingConverter::Skip => {
                warn!(
                    index,
                    format = child.format_name(),
                    to = to.name(),
                    "skipping logic filter child with no converter"
                );
            }
            MissingConverter::Placeholder => {
                warn!(
                    index,
                    format = child.format_name(),
                    to = to.name(),
                    "rendering logic filter child with no converter as null"
                );
                children.push(None);
            }
        }
    }
    Ok(children)
}

fn text_children(
    registry: &Registry,
    filters: &[FilterDescriptor],
    to: Format,
    opts: &ConvertOptions,
) -> Result<Vec<String>> {
    Ok(convert_children(registry, filters, to, opts)?
        .into_iter()
        .map(|child| child.map_or_else(|| "null".to_owned(), Output::into_text))
        .collect())
}

/// Convert a logic filter to CQL.
///
/// - no operator or no children: an empty string.
/// - one child: the child's CQL, or `(NOT (child))` for `NOT`.
/// - more children: `((child1) AND (child2))`.
pub fn to_cql(
    registry: &Registry,
    filter: &FilterDescriptor,
    opts: &ConvertOptions,
) -> Result<String> {
    let (logic, filters) = match logic_parts(filter)? {
        Some(parts) => parts,
        None => return Ok(String::new()),
    };
    let children = text_children(registry, filters, Format::Cql, opts)?;
    Ok(match Arrangement::new(logic, children) {
        Arrangement::Empty => String::new(),
        Arrangement::Negated(child) => format!("(NOT ({}))", child),
        Arrangement::Single(child) => child,
        Arrangement::Many(logic, children) => {
            format!("(({}))", children.join(&format!(") {} (", logic.name())))
        }
    })
}

/// Convert a logic filter to OGC filter XML.
///
/// - no operator or no children: an empty string.
/// - one child: the child's XML, or `<ns:Not>child</ns:Not>` for `NOT`.
/// - more children: `<ns:And>child1child2</ns:And>`.
pub fn to_ogc(
    registry: &Registry,
    filter: &FilterDescriptor,
    opts: &ConvertOptions,
) -> Result<String> {
    let (logic, filters) = match logic_parts(filter)? {
        Some(parts) => parts,
        None => return Ok(String::new()),
    };
    let children = text_children(registry, filters, Format::Ogc, opts)?;
    let builder = FilterBuilder::new(&opts.filter_ns);
    Ok(match Arrangement::new(logic, children) {
        Arrangement::Empty => String::new(),
        Arrangement::Negated(child) => builder.logic(LogicOperator::Not, &child),
        Arrangement::Single(child) => child,
        Arrangement::Many(logic, children) => builder.logic(logic, &children.concat()),
    })
}

/// Convert a logic filter to a GeoStyler expression.
///
/// - no operator or no children: `[]`.
/// - one child: the child's expression, or `["!", child]` for `NOT`.
/// - more children: `["AND", child1, child2]` or `["OR", ...]`.
pub fn to_geostyler(
    registry: &Registry,
    filter: &FilterDescriptor,
    opts: &ConvertOptions,
) -> Result<Expression> {
    let (logic, filters) = match logic_parts(filter)? {
        Some(parts) => parts,
        None => return Ok(Expression::Empty),
    };
    let children: Vec<Expression> = convert_children(registry, filters, Format::GeoStyler, opts)?
        .into_iter()
        .map(|child| child.map_or(Expression::Unsupported(Value::Null), Output::into_expression))
        .collect();
    Ok(match Arrangement::new(logic, children) {
        Arrangement::Empty => Expression::Empty,
        Arrangement::Negated(child) => Expression::Negation(Box::new(child)),
        Arrangement::Single(child) => child,
        Arrangement::Many(logic, operands) => Expression::Logic { logic, operands },
    })
}
