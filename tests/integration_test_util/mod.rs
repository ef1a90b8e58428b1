// SPDX-FileCopyrightText: 2023 Jonathan Haigh <jonathanhaigh@gmail.com>
//
// SPDX-License-Identifier: MIT

use pretty_assertions::assert_eq;
use serde_json::Value as JsonValue;

use ogcfilter::error::{ErrorKind, Result};
use ogcfilter::{registry, ConvertOptions, FilterDescriptor, Format, Output};

pub fn run_conversion(filter: JsonValue, to: Format, opts: &ConvertOptions) -> Result<Output> {
    let filter = FilterDescriptor::from_value(filter)?;
    registry::convert(&filter, to, opts)
}

// Rust doesn't seem to see that this function is actually used.
#[allow(dead_code)]
pub fn test_conversion_ok(filter: JsonValue, to: Format, expected: &str) {
    assert_eq!(
        run_conversion(filter, to, &ConvertOptions::default())
            .unwrap()
            .into_text(),
        expected,
    );
}

// Rust doesn't seem to see that this function is actually used.
#[allow(dead_code)]
pub fn test_geostyler_ok(filter: JsonValue, expected: JsonValue) {
    let output = run_conversion(filter, Format::GeoStyler, &ConvertOptions::default()).unwrap();
    assert_eq!(serde_json::to_value(&output).unwrap(), expected);
}

// Rust doesn't seem to see that this macro is actually used.
#[allow(unused_macros)]
macro_rules! test_simple_conversion_ok {
    ($name:ident, $to:ident, $($case_name:ident, $filter:expr, $expected:expr;)*) => {
        // Put the test function in a new module to avoid "use" statements polluting the caller's
        // namespace
        mod $name {
            use ogcfilter::Format;
            use rstest::rstest;
            use serde_json::Value as JsonValue;
            use serde_json::json;
            #[rstest]
            $(#[case::$case_name($filter, $expected)])*
            fn test_conversion_ok(#[case] filter: JsonValue, #[case] expected: &str) {
                $crate::integration_test_util::test_conversion_ok(filter, Format::$to, expected);
            }
        }
    }
}
#[allow(unused_imports)]
pub(crate) use test_simple_conversion_ok;

// Rust doesn't seem to see that this function is actually used.
#[allow(dead_code)]
pub fn test_conversion_err(filter: JsonValue, to: Format, kind: ErrorKind) {
    assert_eq!(
        run_conversion(filter, to, &ConvertOptions::default())
            .unwrap_err()
            .kind(),
        kind
    );
}

// Rust doesn't seem to see that this macro is actually used.
#[allow(unused_macros)]
macro_rules! test_simple_conversion_err {
    ($name:ident, $to:ident, $($case_name:ident, $filter:expr, $expected:ident;)*) => {
        // Put the test function in a new module to avoid "use" statements polluting the caller's
        // namespace
        mod $name {
            use ogcfilter::error::ErrorKind;
            use ogcfilter::Format;
            use rstest::rstest;
            use serde_json::Value as JsonValue;
            use serde_json::json;
            #[rstest]
            $(#[case::$case_name($filter, ErrorKind::$expected)])*
            fn test_conversion_err(#[case] filter: JsonValue, #[case] expected: ErrorKind) {
                $crate::integration_test_util::test_conversion_err(filter, Format::$to, expected);
            }
        }
    }
}

#[allow(unused_imports)]
pub(crate) use test_simple_conversion_err;
