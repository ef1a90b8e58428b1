// SPDX-FileCopyrightText: 2023 Jonathan Haigh <jonathanhaigh@gmail.com>
//
// SPDX-License-Identifier: MIT

mod integration_test_util;

use integration_test_util::test_simple_conversion_err;

test_simple_conversion_err!(
    to_ogc,
    Ogc,
    lex, json!({"format": "cql", "body": "a = 1 & b = 2"}), Lex;
    unexpected_token, json!({"format": "cql", "body": "a = = 1"}), UnexpectedToken;
    unclosed_paren, json!({"format": "cql", "body": "(a = 1"}), UnexpectedToken;
    float_too_big, json!({"format": "cql", "body": "a = 10.0E+308"}), ParseValue;
    geometry, json!({"format": "cql", "body": "INTERSECTS(the_geom, POINT(1 2))"}), UnsupportedGeometry;
    invalid_descriptor, json!({"format": "cql"}), InvalidDescriptor;
    from_ogc, json!({"format": "ogc", "body": "<ogc:Filter/>"}), UnsupportedConversion;
    missing_converter, json!({"format": "logic", "logic": "AND", "filters": [{"format": "wkt"}]}), MissingConverter;
    nested_error, json!({"format": "logic", "logic": "OR", "filters": [{"format": "cql", "body": "a ="}]}), UnexpectedToken;
);

test_simple_conversion_err!(
    to_geostyler,
    GeoStyler,
    from_cql, json!({"format": "cql", "body": "a = 1"}), UnsupportedConversion;
    logic_with_cql_child, json!({"format": "logic", "logic": "NOT", "filters": [{"format": "cql", "body": "a = 1"}]}), MissingConverter;
);

test_simple_conversion_err!(
    to_logic,
    Logic,
    from_logic, json!({"format": "logic", "logic": "AND", "filters": []}), UnsupportedConversion;
    from_cql, json!({"format": "cql", "body": "a = 1"}), UnsupportedConversion;
);
