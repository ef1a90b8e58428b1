// SPDX-FileCopyrightText: 2023 Jonathan Haigh <jonathanhaigh@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Names of the filter formats known to the converter registry.

use std::fmt;
use std::str::FromStr;

use crate::descriptor::FilterDescriptor;

/// A filter representation.
///
/// `Logic`, `Cql` and `GeoStyler` can be the source of a conversion. `Ogc` is only ever produced.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, clap::ValueEnum)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
pub enum Format {
    Logic,
    Cql,
    #[value(name = "geostyler")]
    GeoStyler,
    Ogc,
}

impl Format {
    /// Get the name of the format as it appears in the `format` member of a filter descriptor.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Logic => "logic",
            Self::Cql => "cql",
            Self::GeoStyler => "geostyler",
            Self::Ogc => "ogc",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error returned when a string doesn't name a known format.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unknown filter format {0:?}")]
pub struct UnknownFormat(pub String);

impl FromStr for Format {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "logic" => Ok(Self::Logic),
            "cql" => Ok(Self::Cql),
            "geostyler" => Ok(Self::GeoStyler),
            "ogc" => Ok(Self::Ogc),
            other => Err(UnknownFormat(other.to_owned())),
        }
    }
}

/// Something that names a filter format: a `Format`, a format name or a filter descriptor.
///
/// Names that aren't known formats (and descriptors of unknown formats) yield `None`.
pub trait AsFormat {
    fn as_format(&self) -> Option<Format>;
}

impl AsFormat for Format {
    fn as_format(&self) -> Option<Format> {
        Some(*self)
    }
}

impl AsFormat for &str {
    fn as_format(&self) -> Option<Format> {
        self.parse().ok()
    }
}

impl AsFormat for &String {
    fn as_format(&self) -> Option<Format> {
        self.parse().ok()
    }
}

impl AsFormat for &FilterDescriptor {
    fn as_format(&self) -> Option<Format> {
        self.format()
    }
}
