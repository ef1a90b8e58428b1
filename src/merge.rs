// SPDX-FileCopyrightText: 2023 Jonathan Haigh <jonathanhaigh@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Converting and merging lists of filters.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::descriptor::{FilterDescriptor, LogicOperator};
use crate::error::Result;
use crate::format::Format;
use crate::ogc::FilterBuilder;
use crate::options::ConvertOptions;
use crate::registry::{Output, Registry};

/// One of the filters to merge: raw CQL text or a filter descriptor.
#[must_use]
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterPart {
    Cql(String),
    Descriptor(FilterDescriptor),
}

impl From<&str> for FilterPart {
    fn from(cql: &str) -> Self {
        Self::Cql(cql.to_owned())
    }
}

impl From<FilterDescriptor> for FilterPart {
    fn from(descriptor: FilterDescriptor) -> Self {
        Self::Descriptor(descriptor)
    }
}

fn convert_non_empty(
    registry: &Registry,
    filters: &[FilterDescriptor],
    to: Format,
    opts: &ConvertOptions,
) -> Result<Vec<String>> {
    let mut converted = Vec::with_capacity(filters.len());
    for filter in filters {
        let output = registry.convert(filter, to, opts)?;
        if !output.is_empty() {
            converted.push(output.into_text());
        }
    }
    Ok(converted)
}

/// Convert filters to CQL, leaving out filters that convert to nothing.
pub fn convert_filters_to_cql(
    registry: &Registry,
    filters: &[FilterDescriptor],
) -> Result<Vec<String>> {
    convert_non_empty(registry, filters, Format::Cql, &ConvertOptions::default())
}

/// Convert filters to OGC filter XML fragments, leaving out filters that convert to nothing.
pub fn convert_filters_to_ogc(
    registry: &Registry,
    filters: &[FilterDescriptor],
    opts: &ConvertOptions,
) -> Result<Vec<String>> {
    convert_non_empty(registry, filters, Format::Ogc, opts)
}

/// Merge filters into a single OGC `Filter` document, combining them with `And`.
///
/// # Parameters
/// - `registry`: converters for the descriptors in `parts`.
/// - `opts`: conversion options. `filter_ns` is also the namespace of the document.
/// - `xmlns`: attributes to add to the root element.
/// - `parts`: the filters to merge.
///
/// # Returns
/// - `<ns:Filter></ns:Filter>` if no part converts to anything.
pub fn merge_filters_to_ogc(
    registry: &Registry,
    opts: &ConvertOptions,
    xmlns: &[String],
    parts: &[FilterPart],
) -> Result<String> {
    let mut fragments = Vec::with_capacity(parts.len());
    for part in parts {
        let output = match part {
            FilterPart::Cql(body) => {
                registry.convert(&FilterDescriptor::cql(body.as_str()), Format::Ogc, opts)?
            }
            FilterPart::Descriptor(descriptor) => registry.convert(descriptor, Format::Ogc, opts)?,
        };
        if let Output::Ogc(fragment) = output {
            if !fragment.is_empty() {
                fragments.push(fragment);
            }
        }
    }
    debug!(parts = parts.len(), merged = fragments.len(), "merging filters");

    let builder = FilterBuilder::new(&opts.filter_ns);
    if fragments.is_empty() {
        return Ok(builder.document("", xmlns));
    }
    Ok(builder.document(
        &builder.logic(LogicOperator::And, &fragments.concat()),
        xmlns,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use crate::registry;

    const PROP_1: &str = "<ogc:PropertyIsEqualTo><ogc:PropertyName>prop</ogc:PropertyName><ogc:Literal>1</ogc:Literal></ogc:PropertyIsEqualTo>";
    const PROP_2: &str = "<ogc:PropertyIsEqualTo><ogc:PropertyName>prop</ogc:PropertyName><ogc:Literal>2</ogc:Literal></ogc:PropertyIsEqualTo>";

    fn descriptors(value: serde_json::Value) -> Vec<FilterDescriptor> {
        serde_json::from_value(value).unwrap()
    }

    #[rstest]
    #[case::none(json!([]), vec![], vec![])]
    #[case::one(json!([{"format": "cql", "body": "prop = 1"}]), vec!["prop = 1"], vec![PROP_1])]
    #[case::two(
        json!([{"format": "cql", "body": "prop = 1"}, {"format": "cql", "body": "prop = 2"}]),
        vec!["prop = 1", "prop = 2"],
        vec![PROP_1, PROP_2]
    )]
    #[case::empty_and(json!([{"format": "logic", "logic": "AND", "filters": []}]), vec![], vec![])]
    #[case::empty_or(json!([{"format": "logic", "logic": "OR", "filters": []}]), vec![], vec![])]
    fn test_convert_filters(
        #[case] filters: serde_json::Value,
        #[case] cql: Vec<&str>,
        #[case] ogc: Vec<&str>,
    ) {
        let filters = descriptors(filters);
        assert_eq!(
            convert_filters_to_cql(registry::standard(), &filters).unwrap(),
            cql
        );
        assert_eq!(
            convert_filters_to_ogc(registry::standard(), &filters, &ConvertOptions::default())
                .unwrap(),
            ogc
        );
    }

    #[test]
    fn test_merge() {
        let parts = vec![
            FilterPart::from("prop = 1"),
            FilterPart::from(FilterDescriptor::logic(LogicOperator::And, vec![])),
            FilterPart::from(FilterDescriptor::cql("prop = 2")),
        ];
        let xmlns = vec![
            r#"xmlns:ogc="http://www.opengis.net/ogc""#.to_owned(),
            r#"xmlns:gml="http://www.opengis.net/gml""#.to_owned(),
        ];
        assert_eq!(
            merge_filters_to_ogc(
                registry::standard(),
                &ConvertOptions::default(),
                &xmlns,
                &parts
            )
            .unwrap(),
            format!(
                r#"<ogc:Filter xmlns:ogc="http://www.opengis.net/ogc" xmlns:gml="http://www.opengis.net/gml"><ogc:And>{}{}</ogc:And></ogc:Filter>"#,
                PROP_1, PROP_2
            )
        );
    }

    #[test]
    fn test_merge_nothing() {
        assert_eq!(
            merge_filters_to_ogc(
                registry::standard(),
                &ConvertOptions::default().with_filter_ns("fes"),
                &[],
                &[]
            )
            .unwrap(),
            "<fes:Filter></fes:Filter>"
        );
    }

    #[test]
    fn test_parts_deserialize() {
        let parts: Vec<FilterPart> =
            serde_json::from_value(json!(["a = 1", {"format": "cql", "body": "b = 2"}])).unwrap();
        assert_eq!(
            parts,
            vec![
                FilterPart::Cql("a = 1".to_owned()),
                FilterPart::Descriptor(FilterDescriptor::cql("b = 2")),
            ]
        );
    }
}
