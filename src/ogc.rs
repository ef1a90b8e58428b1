// SPDX-FileCopyrightText: 2023 Jonathan Haigh <jonathanhaigh@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Building OGC Filter Encoding XML fragments.
//!
//! Output has no XML declaration and no whitespace between elements.

use itertools::Itertools;

use crate::descriptor::LogicOperator;
use crate::filter::{BBox, Between, Comparison, Filter, Like};
use crate::literal::Literal;
use crate::util::{capitalize, escape_xml};

/// Namespace prefix of Filter Encoding 2.0, which names properties with `ValueReference`.
pub const FES_NS: &str = "fes";

/// Renders filters as OGC XML using a given namespace prefix.
#[must_use]
#[derive(Clone, Copy, Debug)]
pub struct FilterBuilder<'a> {
    ns: &'a str,
}

impl<'a> FilterBuilder<'a> {
    /// Create a builder emitting elements with the namespace prefix `ns`, e.g. `ogc` or `fes`.
    pub fn new(ns: &'a str) -> Self {
        Self { ns }
    }

    /// Get the namespace prefix.
    pub fn ns(&self) -> &str {
        self.ns
    }

    /// Wrap content in an element of the builder's namespace.
    pub fn element(&self, local_name: &str, content: &str) -> String {
        format!(
            "<{ns}:{name}>{content}</{ns}:{name}>",
            ns = self.ns,
            name = local_name,
            content = content,
        )
    }

    /// Wrap content in the element for a logical operator: `And`, `Or` or `Not`.
    pub fn logic(&self, op: LogicOperator, content: &str) -> String {
        self.element(&capitalize(op.name()), content)
    }

    /// Wrap content in a `Filter` root element.
    ///
    /// # Parameters
    /// - `content`: the filter body.
    /// - `xmlns`: attributes added verbatim to the root element, e.g.
    ///   `xmlns:ogc="http://www.opengis.net/ogc"`.
    pub fn document(&self, content: &str, xmlns: &[String]) -> String {
        let attrs: String = xmlns.iter().map(|a| format!(" {}", a)).collect();
        format!(
            "<{ns}:Filter{attrs}>{content}</{ns}:Filter>",
            ns = self.ns,
            attrs = attrs,
            content = content,
        )
    }

    /// Render a property reference.
    ///
    /// The `fes` namespace uses `ValueReference`, any other uses `PropertyName`.
    pub fn property(&self, name: &str) -> String {
        let local_name = if self.ns == FES_NS {
            "ValueReference"
        } else {
            "PropertyName"
        };
        self.element(local_name, &escape_xml(name))
    }

    /// Render a literal value.
    pub fn literal(&self, value: &Literal) -> String {
        self.element("Literal", &value.to_ogc())
    }

    /// Render a structured filter.
    pub fn build(&self, filter: &Filter) -> String {
        match filter {
            Filter::And(operands) => self.logic(LogicOperator::And, &self.build_all(operands)),
            Filter::Or(operands) => self.logic(LogicOperator::Or, &self.build_all(operands)),
            Filter::Not(operand) => self.logic(LogicOperator::Not, &self.build(operand)),
            Filter::Comparison(comparison) => self.comparison(comparison),
            Filter::Like(like) => self.like(like),
            Filter::Between(between) => self.between(between),
            Filter::IsNull(property) => self.element("PropertyIsNull", &self.property(property)),
            Filter::BBox(bbox) => self.bbox(bbox),
        }
    }

    fn build_all(&self, filters: &[Filter]) -> String {
        filters.iter().map(|f| self.build(f)).join("")
    }

    fn comparison(&self, comparison: &Comparison) -> String {
        self.element(
            comparison.op.ogc_element(),
            &format!(
                "{}{}",
                self.property(&comparison.property),
                self.literal(&comparison.value)
            ),
        )
    }

    fn like(&self, like: &Like) -> String {
        format!(
            r#"<{ns}:PropertyIsLike matchCase="{case}" wildCard="%" singleChar="_" escapeChar="\">{prop}{lit}</{ns}:PropertyIsLike>"#,
            ns = self.ns,
            case = like.match_case,
            prop = self.property(&like.property),
            lit = self.literal(&Literal::Str(like.pattern.clone())),
        )
    }

    fn between(&self, between: &Between) -> String {
        self.element(
            "PropertyIsBetween",
            &format!(
                "{}{}{}",
                self.property(&between.property),
                self.element("LowerBoundary", &self.literal(&between.lower)),
                self.element("UpperBoundary", &self.literal(&between.upper)),
            ),
        )
    }

    fn bbox(&self, bbox: &BBox) -> String {
        let srs_name = match &bbox.crs {
            Some(crs) => format!(r#" srsName="{}""#, escape_xml(crs)),
            None => String::new(),
        };
        self.element(
            "BBOX",
            &format!(
                "{}<gml:Envelope{}><gml:lowerCorner>{} {}</gml:lowerCorner><gml:upperCorner>{} {}</gml:upperCorner></gml:Envelope>",
                self.property(&bbox.property),
                srs_name,
                bbox.min_x,
                bbox.min_y,
                bbox.max_x,
                bbox.max_y,
            ),
        )
    }
}
