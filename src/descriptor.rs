// SPDX-FileCopyrightText: 2023 Jonathan Haigh <jonathanhaigh@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Filter descriptors: the JSON objects, tagged by `format`, that hold a filter in one of the
//! supported representations.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::format::Format;
use crate::geostyler::Expression;

/// A logical operator of a logic filter.
#[must_use]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
pub enum LogicOperator {
    And,
    Or,
    Not,
}

impl LogicOperator {
    /// Get the canonical, uppercase, name of the operator.
    pub fn name(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
        }
    }
}

impl fmt::Display for LogicOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error returned when a string doesn't name a logical operator.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unknown logical operator {0:?}")]
pub struct UnknownLogicOperator(pub String);

impl FromStr for LogicOperator {
    type Err = UnknownLogicOperator;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AND" => Ok(Self::And),
            "OR" => Ok(Self::Or),
            "NOT" => Ok(Self::Not),
            _ => Err(UnknownLogicOperator(s.to_owned())),
        }
    }
}

/// A filter in one of the supported representations.
///
/// Descriptors with a `format` that isn't a known source format are kept as `Other` so that
/// converting a logic filter containing them can decide what to do with them.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub enum FilterDescriptor {
    /// `{"format": "logic", "logic": "AND", "filters": [...]}`
    ///
    /// `logic` is `None` when the JSON has no operator: a missing, `null` or `""` `logic`.
    Logic {
        logic: Option<LogicOperator>,
        filters: Vec<FilterDescriptor>,
    },

    /// `{"format": "cql", "body": "prop = 1"}`
    Cql { body: String },

    /// `{"format": "geostyler", "body": ["==", "prop", 1]}`
    GeoStyler { body: Expression },

    /// Any other `format`.
    Other { format: String, body: Value },
}

impl FilterDescriptor {
    /// Create a logic filter descriptor.
    pub fn logic(logic: LogicOperator, filters: Vec<FilterDescriptor>) -> Self {
        Self::Logic {
            logic: Some(logic),
            filters,
        }
    }

    /// Create a CQL filter descriptor.
    pub fn cql<S: Into<String>>(body: S) -> Self {
        Self::Cql { body: body.into() }
    }

    /// Create a GeoStyler filter descriptor.
    pub fn geostyler(body: Expression) -> Self {
        Self::GeoStyler { body }
    }

    /// Get the format of the descriptor.
    ///
    /// # Returns
    /// - `None` for an `Other` descriptor whose format string isn't a known format.
    pub fn format(&self) -> Option<Format> {
        match self {
            Self::Logic { .. } => Some(Format::Logic),
            Self::Cql { .. } => Some(Format::Cql),
            Self::GeoStyler { .. } => Some(Format::GeoStyler),
            Self::Other { format, .. } => format.parse().ok(),
        }
    }

    /// Get the format string of the descriptor, as it appears in its JSON form.
    pub fn format_name(&self) -> &str {
        match self {
            Self::Other { format, .. } => format,
            Self::Logic { .. } => Format::Logic.name(),
            Self::Cql { .. } => Format::Cql.name(),
            Self::GeoStyler { .. } => Format::GeoStyler.name(),
        }
    }

    /// Parse a descriptor from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| Box::new(Error::InvalidDescriptor { source }))
    }

    /// Build a descriptor from a JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|source| Box::new(Error::InvalidDescriptor { source }))
    }

    fn try_from_value(value: Value) -> std::result::Result<Self, String> {
        let mut object = match value {
            Value::Array(_) => {
                return Ok(Self::GeoStyler {
                    body: Expression::from_value(value),
                })
            }
            Value::Object(object) => object,
            other => {
                return Err(format!(
                    "expected a filter descriptor object or a GeoStyler array, found {}",
                    other
                ))
            }
        };

        let format = match object.remove("format") {
            Some(Value::String(format)) => format,
            Some(other) => return Err(format!("expected a string format, found {}", other)),
            None => return Err("missing field `format`".to_owned()),
        };

        match format.as_str() {
            "logic" => {
                let logic = match object.remove("logic") {
                    Some(Value::String(logic)) if logic.is_empty() => None,
                    Some(Value::String(logic)) => Some(
                        logic
                            .parse::<LogicOperator>()
                            .map_err(|e| e.to_string())?,
                    ),
                    Some(Value::Null) | None => None,
                    Some(other) => {
                        return Err(format!("expected a string logic operator, found {}", other))
                    }
                };
                let filters = match object.remove("filters") {
                    Some(Value::Array(filters)) => filters
                        .into_iter()
                        .map(Self::try_from_value)
                        .collect::<std::result::Result<Vec<_>, _>>()?,
                    Some(Value::Null) | None => Vec::new(),
                    Some(other) => return Err(format!("expected a filters array, found {}", other)),
                };
                Ok(Self::Logic { logic, filters })
            }
            "cql" => match object.remove("body") {
                Some(Value::String(body)) => Ok(Self::Cql { body }),
                Some(other) => Err(format!("expected a string CQL body, found {}", other)),
                None => Err("missing field `body`".to_owned()),
            },
            "geostyler" => Ok(Self::GeoStyler {
                body: Expression::from_value(object.remove("body").unwrap_or(Value::Null)),
            }),
            _ => Ok(Self::Other {
                format,
                body: object.remove("body").unwrap_or(Value::Null),
            }),
        }
    }
}

impl<'de> Deserialize<'de> for FilterDescriptor {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::try_from_value(value).map_err(D::Error::custom)
    }
}

impl Serialize for FilterDescriptor {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let len = match self {
            Self::Logic { .. } => 3,
            _ => 2,
        };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("format", self.format_name())?;
        match self {
            Self::Logic { logic, filters } => {
                map.serialize_entry("logic", &logic.map(|logic| logic.name()))?;
                map.serialize_entry("filters", filters)?;
            }
            Self::Cql { body } => map.serialize_entry("body", body)?,
            Self::GeoStyler { body } => map.serialize_entry("body", body)?,
            Self::Other { body, .. } => map.serialize_entry("body", body)?,
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;
    use strum::IntoEnumIterator;

    use crate::error::ErrorKind;

    #[rstest]
    #[case::upper("AND", LogicOperator::And)]
    #[case::lower("or", LogicOperator::Or)]
    #[case::mixed("Not", LogicOperator::Not)]
    fn test_logic_operator_case_insensitive(#[case] name: &str, #[case] expected: LogicOperator) {
        assert_eq!(name.parse::<LogicOperator>(), Ok(expected));
    }

    #[test]
    fn test_logic_operator_name_round_trips() {
        for op in LogicOperator::iter() {
            assert_eq!(op.name().parse::<LogicOperator>(), Ok(op));
        }
    }

    #[test]
    fn test_parse_logic() {
        let descriptor = FilterDescriptor::from_json(
            r#"{
                "format": "logic",
                "logic": "or",
                "filters": [
                    {"format": "cql", "body": "prop = 1"},
                    {"format": "geostyler", "body": ["==", "prop", 2]}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(
            descriptor,
            FilterDescriptor::logic(
                LogicOperator::Or,
                vec![
                    FilterDescriptor::cql("prop = 1"),
                    FilterDescriptor::geostyler(Expression::from_value(json!(["==", "prop", 2]))),
                ]
            )
        );
        assert_eq!(descriptor.format(), Some(Format::Logic));
    }

    #[test]
    fn test_logic_without_filters() {
        assert_eq!(
            FilterDescriptor::from_json(r#"{"format": "logic", "logic": "AND"}"#).unwrap(),
            FilterDescriptor::logic(LogicOperator::And, vec![])
        );
    }

    #[rstest]
    #[case::missing(json!({"format": "logic", "filters": [{"format": "cql", "body": "a = 1"}]}))]
    #[case::null(json!({"format": "logic", "logic": null, "filters": [{"format": "cql", "body": "a = 1"}]}))]
    #[case::empty(json!({"format": "logic", "logic": "", "filters": [{"format": "cql", "body": "a = 1"}]}))]
    fn test_logic_without_operator(#[case] value: Value) {
        assert_eq!(
            FilterDescriptor::from_value(value).unwrap(),
            FilterDescriptor::Logic {
                logic: None,
                filters: vec![FilterDescriptor::cql("a = 1")],
            }
        );
    }

    #[test]
    fn test_bare_array_is_geostyler() {
        assert_eq!(
            FilterDescriptor::from_json(r#"["==", "prop", 1]"#).unwrap(),
            FilterDescriptor::geostyler(Expression::from_value(json!(["==", "prop", 1])))
        );
    }

    #[test]
    fn test_wrapped_geostyler_body() {
        assert_eq!(
            FilterDescriptor::from_json(
                r#"{"format": "geostyler", "body": {"body": ["==", "prop", 1]}}"#
            )
            .unwrap(),
            FilterDescriptor::from_json(r#"{"format": "geostyler", "body": ["==", "prop", 1]}"#)
                .unwrap(),
        );
    }

    #[rstest]
    #[case::ogc("ogc", Some(Format::Ogc))]
    #[case::unknown("wkt", None)]
    fn test_other_format(#[case] format: &str, #[case] expected: Option<Format>) {
        let descriptor =
            FilterDescriptor::from_value(json!({"format": format, "body": "<x/>"})).unwrap();
        assert_eq!(
            descriptor,
            FilterDescriptor::Other {
                format: format.to_owned(),
                body: json!("<x/>"),
            }
        );
        assert_eq!(descriptor.format(), expected);
        assert_eq!(descriptor.format_name(), format);
    }

    #[rstest]
    #[case::not_json("{")]
    #[case::missing_format(r#"{"body": "prop = 1"}"#)]
    #[case::number_format(r#"{"format": 1}"#)]
    #[case::bad_logic(r#"{"format": "logic", "logic": "XOR", "filters": []}"#)]
    #[case::bad_filters(r#"{"format": "logic", "logic": "AND", "filters": "x"}"#)]
    #[case::bad_child(r#"{"format": "logic", "logic": "AND", "filters": [1]}"#)]
    #[case::cql_number_body(r#"{"format": "cql", "body": 1}"#)]
    #[case::cql_missing_body(r#"{"format": "cql"}"#)]
    #[case::scalar("42")]
    fn test_invalid(#[case] json: &str) {
        assert_eq!(
            FilterDescriptor::from_json(json).unwrap_err().kind(),
            ErrorKind::InvalidDescriptor
        );
    }

    #[test]
    fn test_serialize() {
        let descriptor = FilterDescriptor::logic(
            LogicOperator::Not,
            vec![FilterDescriptor::cql("prop = 1")],
        );
        assert_eq!(
            serde_json::to_value(&descriptor).unwrap(),
            json!({
                "format": "logic",
                "logic": "NOT",
                "filters": [{"format": "cql", "body": "prop = 1"}],
            })
        );
    }

    #[test]
    fn test_serialize_without_operator() {
        let descriptor = FilterDescriptor::Logic {
            logic: None,
            filters: vec![],
        };
        assert_eq!(
            serde_json::to_value(&descriptor).unwrap(),
            json!({"format": "logic", "logic": null, "filters": []})
        );
    }
}
