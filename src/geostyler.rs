// SPDX-FileCopyrightText: 2023 Jonathan Haigh <jonathanhaigh@gmail.com>
//
// SPDX-License-Identifier: MIT

//! GeoStyler filter expressions.
//!
//! GeoStyler encodes filters as nested JSON arrays whose first element is an operator, e.g.
//! `["&&", ["==", "prop", 1], ["<", "depth", 10.5]]`.

use phf::phf_map;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::descriptor::LogicOperator;
use crate::filter::{Comparison, ComparisonOperator, Filter};
use crate::literal::Literal;
use crate::ogc::FilterBuilder;

/// Operator of a combination expression.
#[must_use]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
pub enum Combinator {
    And,
    Or,
}

impl Combinator {
    /// Get the GeoStyler spelling of the operator.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::And => "&&",
            Self::Or => "||",
        }
    }

    /// Get the CQL keyword for the operator.
    pub fn cql_keyword(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Operator {
    Comparison(ComparisonOperator),
    Combination(Combinator),
    Negation,
}

impl Operator {
    fn cql(&self) -> &'static str {
        match self {
            Self::Comparison(op) => op.cql_symbol(),
            Self::Combination(op) => op.cql_keyword(),
            Self::Negation => "NOT",
        }
    }
}

static OPERATORS: phf::Map<&'static str, Operator> = phf_map! {
    "==" => Operator::Comparison(ComparisonOperator::Equal),
    "!=" => Operator::Comparison(ComparisonOperator::NotEqual),
    "<>" => Operator::Comparison(ComparisonOperator::NotEqual),
    "<" => Operator::Comparison(ComparisonOperator::Less),
    "<=" => Operator::Comparison(ComparisonOperator::LessOrEqual),
    ">" => Operator::Comparison(ComparisonOperator::Greater),
    ">=" => Operator::Comparison(ComparisonOperator::GreaterOrEqual),
    "&&" => Operator::Combination(Combinator::And),
    "||" => Operator::Combination(Combinator::Or),
    "!" => Operator::Negation,
};

/// Get the CQL equivalent of a GeoStyler operator.
///
/// # Examples
/// ```
/// use ogcfilter::geostyler::cql_operator;
///
/// assert_eq!(cql_operator("=="), Some("="));
/// assert_eq!(cql_operator("||"), Some("OR"));
/// assert_eq!(cql_operator("~="), None);
/// ```
pub fn cql_operator(geostyler_op: &str) -> Option<&'static str> {
    OPERATORS.get(geostyler_op).map(Operator::cql)
}

/// Get the GeoStyler spelling of a comparison operator.
pub fn comparison_symbol(op: ComparisonOperator) -> &'static str {
    match op {
        ComparisonOperator::Equal => "==",
        ComparisonOperator::NotEqual => "!=",
        ComparisonOperator::Less => "<",
        ComparisonOperator::LessOrEqual => "<=",
        ComparisonOperator::Greater => ">",
        ComparisonOperator::GreaterOrEqual => ">=",
    }
}

/// A GeoStyler filter expression.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    /// `[op, property, value]`
    Comparison {
        op: ComparisonOperator,
        property: String,
        value: Literal,
    },

    /// `["&&" | "||", operand, ...]`
    Combination {
        op: Combinator,
        operands: Vec<Expression>,
    },

    /// `["!", operand]`
    Negation(Box<Expression>),

    /// `["AND" | "OR" | "NOT", operand, ...]`
    ///
    /// The tags used when a logic filter is converted to GeoStyler. They are not GeoStyler
    /// operators and are not understood by the CQL or OGC conversions.
    Logic {
        logic: LogicOperator,
        operands: Vec<Expression>,
    },

    /// `[]`
    Empty,

    /// Any other JSON value, kept as is.
    Unsupported(Value),
}

impl Expression {
    /// Build an expression from a JSON value.
    ///
    /// This never fails: values that aren't recognised expressions become `Unsupported`. An
    /// object with a `body` member is treated as a wrapper around the expression in `body`.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::from_items(items),
            Value::Object(mut object) if object.contains_key("body") => {
                Self::from_value(object.remove("body").unwrap_or(Value::Null))
            }
            other => Self::Unsupported(other),
        }
    }

    fn from_items(items: Vec<Value>) -> Self {
        let head = match items.first() {
            None => return Self::Empty,
            Some(Value::String(head)) => head.as_str(),
            Some(_) => return Self::Unsupported(Value::Array(items)),
        };

        if let Some(logic) = legacy_logic_tag(head) {
            return Self::Logic {
                logic,
                operands: items.into_iter().skip(1).map(Self::from_value).collect(),
            };
        }

        match OPERATORS.get(head).copied() {
            Some(Operator::Comparison(op)) if items.len() == 3 => {
                let property = items[1].as_str().map(str::to_owned);
                let value = Literal::from_json(&items[2]);
                match (property, value) {
                    (Some(property), Some(value)) => Self::Comparison {
                        op,
                        property,
                        value,
                    },
                    _ => Self::Unsupported(Value::Array(items)),
                }
            }
            Some(Operator::Combination(op)) => Self::Combination {
                op,
                operands: items.into_iter().skip(1).map(Self::from_value).collect(),
            },
            Some(Operator::Negation) if items.len() == 2 => {
                let operand = items.into_iter().nth(1).unwrap_or(Value::Null);
                Self::Negation(Box::new(Self::from_value(operand)))
            }
            _ => Self::Unsupported(Value::Array(items)),
        }
    }

    /// Convert the expression to a structured filter.
    ///
    /// # Returns
    /// - `None` if the expression, or any expression within it, has no filter equivalent.
    pub fn to_filter(&self) -> Option<Filter> {
        match self {
            Self::Comparison {
                op,
                property,
                value,
            } => Some(Filter::Comparison(Comparison {
                property: property.clone(),
                op: *op,
                value: value.clone(),
            })),
            Self::Combination { operands, .. } if operands.is_empty() => None,
            Self::Combination { op, operands } => {
                let filters = operands
                    .iter()
                    .map(Self::to_filter)
                    .collect::<Option<Vec<_>>>()?;
                Some(match op {
                    Combinator::And => Filter::and(filters),
                    Combinator::Or => Filter::or(filters),
                })
            }
            Self::Negation(operand) => operand.to_filter().map(Filter::not),
            Self::Logic { .. } | Self::Empty | Self::Unsupported(_) => None,
        }
    }
}

fn legacy_logic_tag(head: &str) -> Option<LogicOperator> {
    match head {
        "AND" => Some(LogicOperator::And),
        "OR" => Some(LogicOperator::Or),
        "NOT" => Some(LogicOperator::Not),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for Expression {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

impl Serialize for Expression {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Comparison {
                op,
                property,
                value,
            } => {
                let mut seq = serializer.serialize_seq(Some(3))?;
                seq.serialize_element(comparison_symbol(*op))?;
                seq.serialize_element(property)?;
                seq.serialize_element(value)?;
                seq.end()
            }
            Self::Combination { op, operands } => {
                serialize_tagged(serializer, op.symbol(), operands)
            }
            Self::Negation(operand) => {
                serialize_tagged(serializer, "!", std::slice::from_ref(operand.as_ref()))
            }
            Self::Logic { logic, operands } => serialize_tagged(serializer, logic.name(), operands),
            Self::Empty => serializer.serialize_seq(Some(0))?.end(),
            Self::Unsupported(value) => value.serialize(serializer),
        }
    }
}

fn serialize_tagged<S: Serializer>(
    serializer: S,
    tag: &str,
    operands: &[Expression],
) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(operands.len() + 1))?;
    seq.serialize_element(tag)?;
    for operand in operands {
        seq.serialize_element(operand)?;
    }
    seq.end()
}

/// Render an expression as CQL text.
///
/// Combinations are wrapped in a single pair of parentheses, comparisons are not. Expressions
/// with no CQL equivalent, including the tags produced when converting logic filters to
/// GeoStyler, render as an empty string.
///
/// # Examples
/// ```
/// use ogcfilter::geostyler::{to_cql, Expression};
/// use serde_json::json;
///
/// let expr = Expression::from_value(json!(["&&", ["==", "prop1", 1], ["==", "prop2", "x"]]));
/// assert_eq!(to_cql(&expr), "(prop1 = 1 AND prop2 = 'x')");
/// ```
pub fn to_cql(expr: &Expression) -> String {
    match expr {
        Expression::Comparison {
            op,
            property,
            value,
        } => format!("{} {} {}", property, op.cql_symbol(), value.to_cql()),
        Expression::Combination { op, operands } => {
            let separator = format!(" {} ", op.cql_keyword());
            let operands: Vec<String> = operands.iter().map(to_cql).collect();
            format!("({})", operands.join(&separator))
        }
        Expression::Negation(operand) => format!("NOT ({})", to_cql(operand)),
        Expression::Logic { .. } | Expression::Empty | Expression::Unsupported(_) => String::new(),
    }
}

/// Render an expression as OGC filter XML.
///
/// Expressions with no filter equivalent render as an empty string.
pub fn to_ogc(expr: &Expression, builder: &FilterBuilder) -> String {
    expr.to_filter()
        .map(|filter| builder.build(&filter))
        .unwrap_or_default()
}
