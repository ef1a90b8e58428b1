// SPDX-FileCopyrightText: 2023 Jonathan Haigh <jonathanhaigh@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Conversion options.

use serde::{Deserialize, Serialize};

/// What to do with a child of a logic filter that can't be converted to the target format.
#[must_use]
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum MissingConverter {
    /// Fail the whole conversion.
    #[default]
    Fail,

    /// Leave the child out, as if the logic filter didn't contain it.
    Skip,

    /// Render the child as `null`.
    Placeholder,
}

/// Options passed to every converter.
#[must_use]
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConvertOptions {
    /// Namespace prefix for OGC filter elements.
    #[serde(rename = "filterNS")]
    pub filter_ns: String,

    pub missing_converter: MissingConverter,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            filter_ns: "ogc".to_owned(),
            missing_converter: MissingConverter::default(),
        }
    }
}

impl ConvertOptions {
    /// Set the namespace prefix for OGC filter elements.
    pub fn with_filter_ns<S: Into<String>>(mut self, filter_ns: S) -> Self {
        self.filter_ns = filter_ns.into();
        self
    }

    /// Set the policy for logic filter children that can't be converted.
    pub fn with_missing_converter(mut self, policy: MissingConverter) -> Self {
        self.missing_converter = policy;
        self
    }
}
