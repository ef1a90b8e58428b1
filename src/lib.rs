// SPDX-FileCopyrightText: 2023 Jonathan Haigh <jonathanhaigh@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Conversion of feature filters between logic, CQL and GeoStyler representations, and rendering
//! of them as OGC filter XML.

pub mod cli;
pub mod cql;
pub mod descriptor;
pub mod error;
pub mod filter;
pub mod format;
pub mod geostyler;
pub mod literal;
pub mod logic;
pub mod merge;
pub mod ogc;
pub mod options;
pub mod registry;
pub mod util;

pub use descriptor::FilterDescriptor;
pub use format::Format;
pub use options::{ConvertOptions, MissingConverter};
pub use registry::{can_convert, convert, get_converter, Output, Registry};
