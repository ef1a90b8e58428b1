// SPDX-FileCopyrightText: 2023 Jonathan Haigh <jonathanhaigh@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Convert a filter.

use ogcfilter::cli;
use ogcfilter::descriptor::FilterDescriptor;
use ogcfilter::error::{self, Error};
use ogcfilter::merge::{self, FilterPart};
use ogcfilter::registry::{self, Output};
use tracing_subscriber::EnvFilter;

fn run(args: &cli::Cli) -> error::Result<String> {
    let input = args.read_input()?;
    let opts = args.convert_options();
    let registry = registry::standard();

    if args.merge {
        let parts: Vec<FilterPart> = serde_json::from_str(&input)
            .map_err(|source| Box::new(Error::InvalidDescriptor { source }))?;
        return merge::merge_filters_to_ogc(registry, &opts, &args.xmlns, &parts);
    }

    let filter = FilterDescriptor::from_json(&input)?;
    match registry.convert(&filter, args.target(), &opts)? {
        Output::GeoStyler(expr) => serde_json::to_string_pretty(&expr)
            .map_err(|e| Box::new(Error::Serialize { msg: e.to_string() })),
        other => Ok(other.into_text()),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> miette::Result<()> {
    init_logging();
    let args = cli::parse();
    let output = run(&args).map_err(|e| miette::Report::new_boxed(e))?;
    println!("{}", output);
    Ok(())
}
