// SPDX-FileCopyrightText: 2023 Jonathan Haigh <jonathanhaigh@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Types and methods related to parsing the command line.

use std::io::Read;
use std::path::PathBuf;

use clap::Parser;

use crate::error::{Error, Result};
use crate::format::Format;
use crate::options::{ConvertOptions, MissingConverter};

/// Convert a filter descriptor to CQL, OGC filter XML or GeoStyler.
#[derive(Parser)]
#[command(author, version, about, long_about=None)]
#[must_use]
pub struct Cli {
    /// The JSON filter descriptor. Read from stdin when absent or "-"
    #[arg(conflicts_with = "file")]
    pub filter: Option<String>,

    /// Read the filter descriptor from a file
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// The format to convert to
    #[arg(long, value_enum, required_unless_present = "merge")]
    pub to: Option<Format>,

    /// Namespace prefix for OGC filter elements
    #[arg(long, default_value = "ogc")]
    pub filter_ns: String,

    /// What to do with logic filter children that can't be converted
    #[arg(long, value_enum, default_value_t = MissingConverter::Fail)]
    pub on_missing: MissingConverter,

    /// Merge a JSON array of CQL strings and filter descriptors into one OGC Filter document
    #[arg(long, conflicts_with = "to")]
    pub merge: bool,

    /// An xmlns attribute to add to the root of a merged document
    #[arg(long, requires = "merge")]
    pub xmlns: Vec<String>,
}

impl Cli {
    /// Get the conversion options given on the command line.
    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions::default()
            .with_filter_ns(self.filter_ns.as_str())
            .with_missing_converter(self.on_missing)
    }

    /// Get the format to convert to. Merging always produces OGC filter XML.
    pub fn target(&self) -> Format {
        self.to.unwrap_or(Format::Ogc)
    }

    /// Read the filter input from the command line argument, the file or stdin.
    pub fn read_input(&self) -> Result<String> {
        if let Some(path) = &self.file {
            return std::fs::read_to_string(path).map_err(|source| {
                Box::new(Error::Input {
                    origin: path.display().to_string(),
                    source,
                })
            });
        }
        match self.filter.as_deref() {
            Some(filter) if filter != "-" => Ok(filter.to_owned()),
            _ => {
                let mut input = String::new();
                std::io::stdin()
                    .read_to_string(&mut input)
                    .map_err(|source| {
                        Box::new(Error::Input {
                            origin: "stdin".to_owned(),
                            source,
                        })
                    })?;
                Ok(input)
            }
        }
    }
}

/// Parse the command line.
///
/// # Returns
/// - a `Cli` struct containing the command line arguments.
pub fn parse() -> Cli {
    Cli::parse()
}
