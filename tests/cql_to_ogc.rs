// SPDX-FileCopyrightText: 2023 Jonathan Haigh <jonathanhaigh@gmail.com>
//
// SPDX-License-Identifier: MIT

mod integration_test_util;

use integration_test_util::test_simple_conversion_ok;

test_simple_conversion_ok!(
    cql_to_ogc,
    Ogc,
    equal,
    json!({"format": "cql", "body": "prop = 1"}),
    "<ogc:PropertyIsEqualTo><ogc:PropertyName>prop</ogc:PropertyName><ogc:Literal>1</ogc:Literal></ogc:PropertyIsEqualTo>";
    string,
    json!({"format": "cql", "body": "name <> 'O''Brien'"}),
    "<ogc:PropertyIsNotEqualTo><ogc:PropertyName>name</ogc:PropertyName><ogc:Literal>O&apos;Brien</ogc:Literal></ogc:PropertyIsNotEqualTo>";
    and_or,
    json!({"format": "cql", "body": "a = 1 AND b < 2 OR c >= 3.5"}),
    "<ogc:Or><ogc:And>\
        <ogc:PropertyIsEqualTo><ogc:PropertyName>a</ogc:PropertyName><ogc:Literal>1</ogc:Literal></ogc:PropertyIsEqualTo>\
        <ogc:PropertyIsLessThan><ogc:PropertyName>b</ogc:PropertyName><ogc:Literal>2</ogc:Literal></ogc:PropertyIsLessThan>\
    </ogc:And>\
    <ogc:PropertyIsGreaterThanOrEqualTo><ogc:PropertyName>c</ogc:PropertyName><ogc:Literal>3.5</ogc:Literal></ogc:PropertyIsGreaterThanOrEqualTo>\
    </ogc:Or>";
    not,
    json!({"format": "cql", "body": "NOT (flag = TRUE)"}),
    "<ogc:Not><ogc:PropertyIsEqualTo><ogc:PropertyName>flag</ogc:PropertyName><ogc:Literal>true</ogc:Literal></ogc:PropertyIsEqualTo></ogc:Not>";
    ilike,
    json!({"format": "cql", "body": "name ILIKE 'fl%'"}),
    r#"<ogc:PropertyIsLike matchCase="false" wildCard="%" singleChar="_" escapeChar="\"><ogc:PropertyName>name</ogc:PropertyName><ogc:Literal>fl%</ogc:Literal></ogc:PropertyIsLike>"#;
    between,
    json!({"format": "cql", "body": "depth BETWEEN 10 AND 20"}),
    "<ogc:PropertyIsBetween><ogc:PropertyName>depth</ogc:PropertyName>\
        <ogc:LowerBoundary><ogc:Literal>10</ogc:Literal></ogc:LowerBoundary>\
        <ogc:UpperBoundary><ogc:Literal>20</ogc:Literal></ogc:UpperBoundary>\
    </ogc:PropertyIsBetween>";
    is_not_null,
    json!({"format": "cql", "body": "name IS NOT NULL"}),
    "<ogc:Not><ogc:PropertyIsNull><ogc:PropertyName>name</ogc:PropertyName></ogc:PropertyIsNull></ogc:Not>";
    bbox,
    json!({"format": "cql", "body": "BBOX(the_geom, -10, 40, 5, 52)"}),
    "<ogc:BBOX><ogc:PropertyName>the_geom</ogc:PropertyName><gml:Envelope><gml:lowerCorner>-10 40</gml:lowerCorner><gml:upperCorner>5 52</gml:upperCorner></gml:Envelope></ogc:BBOX>";
    int_too_big_for_i64,
    json!({"format": "cql", "body": "a = 10000000000000000000"}),
    "<ogc:PropertyIsEqualTo><ogc:PropertyName>a</ogc:PropertyName><ogc:Literal>10000000000000000000</ogc:Literal></ogc:PropertyIsEqualTo>";
    exponent,
    json!({"format": "cql", "body": "a < 1e+300"}),
    "<ogc:PropertyIsLessThan><ogc:PropertyName>a</ogc:PropertyName><ogc:Literal>1e+300</ogc:Literal></ogc:PropertyIsLessThan>";
    keyword_named_properties,
    json!({"format": "cql", "body": "point = 1 AND within = 2"}),
    "<ogc:And>\
        <ogc:PropertyIsEqualTo><ogc:PropertyName>point</ogc:PropertyName><ogc:Literal>1</ogc:Literal></ogc:PropertyIsEqualTo>\
        <ogc:PropertyIsEqualTo><ogc:PropertyName>within</ogc:PropertyName><ogc:Literal>2</ogc:Literal></ogc:PropertyIsEqualTo>\
    </ogc:And>";
);

test_simple_conversion_ok!(
    cql_to_cql,
    Cql,
    passthrough, json!({"format": "cql", "body": "a = 1 AND b = 2"}), "a = 1 AND b = 2";
    not_parsed, json!({"format": "cql", "body": "INTERSECTS(g, POINT(1 2))"}), "INTERSECTS(g, POINT(1 2))";
);
