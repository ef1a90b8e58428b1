// SPDX-FileCopyrightText: 2023 Jonathan Haigh <jonathanhaigh@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Types and methods for parsing a stream of CQL tokens into a `Filter`.

use std::num::IntErrorKind;

use miette::SourceSpan;

use crate::cql::lexer::{Token, TokenKind};
use crate::error::{Error, OptResult, Result};
use crate::filter::{BBox, Between, Comparison, ComparisonOperator, Filter, Like};
use crate::literal::Literal;
use crate::util::return_none_or_err;

/// A CQL filter parser.
#[must_use]
pub struct Parser<'q> {
    cql: &'q str,
    tokens: &'q [Token],
    offset: usize,
    expecting: Vec<TokenKind>,
}

impl<'q> Parser<'q> {
    /// Create a new `Parser`.
    ///
    /// # Parameters
    /// - `cql`: the filter text.
    /// - `tokens`: the tokens that make up the text (produced by the `lexer` module).
    pub fn new(cql: &'q str, tokens: &'q [Token]) -> Self {
        Self {
            cql,
            tokens,
            offset: 0,
            expecting: Vec::<TokenKind>::new(),
        }
    }

    /// Parse the tokens into a `Filter`.
    pub fn parse(&mut self) -> Result<Filter> {
        match self.parse_filter()? {
            Some(f) => Ok(f),
            None => Err(self.unexpected_token_error()),
        }
    }

    /// GRAMMAR: filter: or_expression Eof
    ///
    /// # Examples
    /// ```plaintext
    /// a = 1 OR b = 2
    /// ╰─────┬──────╯│
    ///  or_expression Eof
    /// ```
    fn parse_filter(&mut self) -> OptResult<Filter> {
        let filter = return_none_or_err!(self.parse_or_expression());
        let _ = self.expect_token(TokenKind::Eof)?;
        Ok(Some(filter))
    }

    /// GRAMMAR: or_expression: and_expression (Or and_expression)*
    ///
    /// # Examples
    /// ```plaintext
    /// a = 1 AND b = 2 OR c = 3
    /// ╰──────┬──────╯ │  ╰─┬─╯
    ///  and_expression Or and_expression
    /// ```
    fn parse_or_expression(&mut self) -> OptResult<Filter> {
        let mut operands = vec![return_none_or_err!(self.parse_and_expression())];

        while self.accept_token(TokenKind::Or)?.is_some() {
            operands.push(
                self.parse_and_expression()?
                    .ok_or_else(|| self.unexpected_token_error())?,
            );
        }

        Ok(Some(Filter::or(operands)))
    }

    /// GRAMMAR: and_expression: not_expression (And not_expression)*
    ///
    /// # Examples
    /// ```plaintext
    /// a = 1 AND NOT b = 2
    /// ╰─┬─╯ │   ╰───┬───╯
    ///   │  And not_expression
    /// not_expression
    /// ```
    fn parse_and_expression(&mut self) -> OptResult<Filter> {
        let mut operands = vec![return_none_or_err!(self.parse_not_expression())];

        while self.accept_token(TokenKind::And)?.is_some() {
            operands.push(
                self.parse_not_expression()?
                    .ok_or_else(|| self.unexpected_token_error())?,
            );
        }

        Ok(Some(Filter::and(operands)))
    }

    /// GRAMMAR: not_expression: Not not_expression | primary
    fn parse_not_expression(&mut self) -> OptResult<Filter> {
        if self.accept_token(TokenKind::Not)?.is_some() {
            let operand = self
                .parse_not_expression()?
                .ok_or_else(|| self.unexpected_token_error())?;
            return Ok(Some(Filter::not(operand)));
        }
        self.parse_primary()
    }

    /// GRAMMAR: primary: LParen or_expression RParen | bbox | spatial | predicate
    fn parse_primary(&mut self) -> OptResult<Filter> {
        if self.accept_token(TokenKind::LParen)?.is_some() {
            let inner = self
                .parse_or_expression()?
                .ok_or_else(|| self.unexpected_token_error())?;
            let _ = self.expect_token(TokenKind::RParen)?;
            return Ok(Some(inner));
        }
        if let Some(bbox) = self.parse_bbox()? {
            return Ok(Some(bbox));
        }
        if let Some(spatial) = self.parse_spatial()? {
            return Ok(Some(spatial));
        }
        self.parse_predicate()
    }

    /// GRAMMAR:
    /// - predicate: property (comparison | Not? like | Not? between | is_null)
    /// - comparison: comparison_operator literal
    /// - is_null: Is Not? Null
    ///
    /// # Examples
    /// ```plaintext
    /// name NOT LIKE 'Fl%'
    /// ╰┬─╯ │   ╰───┬────╯
    /// property│   like
    ///        Not
    /// ```
    ///
    /// ```plaintext
    /// name IS NOT NULL
    /// ╰┬─╯ ╰────┬────╯
    /// property is_null
    /// ```
    fn parse_predicate(&mut self) -> OptResult<Filter> {
        let property = return_none_or_err!(self.parse_property());

        if let Some(op) = self.parse_comparison_operator()? {
            let value = self
                .parse_literal()?
                .ok_or_else(|| self.unexpected_token_error())?
                .1;
            return Ok(Some(Filter::Comparison(Comparison {
                property,
                op,
                value,
            })));
        }

        let negated = self.accept_token(TokenKind::Not)?.is_some();

        if !negated && self.accept_token(TokenKind::Is)?.is_some() {
            let is_not = self.accept_token(TokenKind::Not)?.is_some();
            let _ = self.expect_token(TokenKind::Null)?;
            let is_null = Filter::IsNull(property);
            return Ok(Some(if is_not {
                Filter::not(is_null)
            } else {
                is_null
            }));
        }

        let filter = match self.parse_like(&property)? {
            Some(like) => like,
            None => self
                .parse_between(&property)?
                .ok_or_else(|| self.unexpected_token_error())?,
        };

        Ok(Some(if negated { Filter::not(filter) } else { filter }))
    }

    /// GRAMMAR: like: (Like | ILike) Str
    fn parse_like(&mut self, property: &str) -> OptResult<Filter> {
        let match_case = if self.accept_token(TokenKind::Like)?.is_some() {
            true
        } else if self.accept_token(TokenKind::ILike)?.is_some() {
            false
        } else {
            return Ok(None);
        };
        let (_, pattern) = self
            .parse_str()?
            .ok_or_else(|| self.unexpected_token_error())?;
        Ok(Some(Filter::Like(Like {
            property: property.to_owned(),
            pattern,
            match_case,
        })))
    }

    /// GRAMMAR: between: Between literal And literal
    ///
    /// # Examples
    /// ```plaintext
    /// BETWEEN 10 AND 20
    /// ╰──┬──╯ ├╯ ╰┬╯ ├╯
    /// Between │ And literal
    ///       literal
    /// ```
    fn parse_between(&mut self, property: &str) -> OptResult<Filter> {
        let _ = return_none_or_err!(self.accept_token(TokenKind::Between));
        let (_, lower) = self
            .parse_literal()?
            .ok_or_else(|| self.unexpected_token_error())?;
        let _ = self.expect_token(TokenKind::And)?;
        let (_, upper) = self
            .parse_literal()?
            .ok_or_else(|| self.unexpected_token_error())?;
        Ok(Some(Filter::Between(Between {
            property: property.to_owned(),
            lower,
            upper,
        })))
    }

    /// GRAMMAR: bbox: BBox LParen property (Comma number){4} (Comma Str)? RParen
    ///
    /// # Examples
    /// ```plaintext
    /// BBOX(the_geom, -10, 40.5, 5, 52, 'EPSG:4326')
    /// ```
    fn parse_bbox(&mut self) -> OptResult<Filter> {
        let _ = return_none_or_err!(self.accept_token(TokenKind::BBox));
        let _ = self.expect_token(TokenKind::LParen)?;
        let property = self
            .parse_property()?
            .ok_or_else(|| self.unexpected_token_error())?;

        let mut coords = [0.0_f64; 4];
        for coord in coords.iter_mut() {
            let _ = self.expect_token(TokenKind::Comma)?;
            *coord = self
                .parse_number()?
                .ok_or_else(|| self.unexpected_token_error())?;
        }

        let crs = match self.accept_token(TokenKind::Comma)? {
            Some(_) => Some(
                self.parse_str()?
                    .ok_or_else(|| self.unexpected_token_error())?
                    .1,
            ),
            None => None,
        };
        let _ = self.expect_token(TokenKind::RParen)?;

        let [min_x, min_y, max_x, max_y] = coords;
        Ok(Some(Filter::BBox(BBox {
            property,
            min_x,
            min_y,
            max_x,
            max_y,
            crs,
        })))
    }

    /// GRAMMAR: spatial: Spatial LParen property Comma Geometry ...
    ///
    /// Geometry literals aren't supported, so a spatial predicate other than `BBOX` is always an
    /// error once its geometry is reached.
    fn parse_spatial(&mut self) -> OptResult<Filter> {
        let _ = return_none_or_err!(self.accept_token(TokenKind::Spatial));
        let _ = self.expect_token(TokenKind::LParen)?;
        let _ = self
            .parse_property()?
            .ok_or_else(|| self.unexpected_token_error())?;
        let _ = self.expect_token(TokenKind::Comma)?;
        let geometry = self.expect_token(TokenKind::Geometry)?;
        Err(Box::new(Error::UnsupportedGeometry {
            cql: self.cql.to_owned(),
            span: geometry.span,
            geometry: geometry.text(self.cql).to_uppercase(),
        }))
    }

    /// GRAMMAR: comparison_operator: (Equal | NotEqual | Less | LessOrEqual | Greater |
    /// GreaterOrEqual)
    fn parse_comparison_operator(&mut self) -> OptResult<ComparisonOperator> {
        const OPERATORS: [(TokenKind, ComparisonOperator); 6] = [
            (TokenKind::Equal, ComparisonOperator::Equal),
            (TokenKind::NotEqual, ComparisonOperator::NotEqual),
            (TokenKind::Less, ComparisonOperator::Less),
            (TokenKind::LessOrEqual, ComparisonOperator::LessOrEqual),
            (TokenKind::Greater, ComparisonOperator::Greater),
            (TokenKind::GreaterOrEqual, ComparisonOperator::GreaterOrEqual),
        ];
        for (kind, op) in OPERATORS {
            if self.accept_token(kind)?.is_some() {
                return Ok(Some(op));
            }
        }
        Ok(None)
    }

    /// GRAMMAR: property: (Ident | QuotedIdent)
    ///
    /// # Examples
    /// ```plaintext
    /// population
    /// ╰───┬────╯
    ///   Ident
    /// ```
    ///
    /// ```plaintext
    /// "place name"
    /// ╰────┬─────╯
    ///  QuotedIdent
    /// ```
    fn parse_property(&mut self) -> OptResult<String> {
        if let Some(tok) = self.accept_token(TokenKind::Ident)? {
            return Ok(Some(tok.text(self.cql).to_owned()));
        }
        let tok = return_none_or_err!(self.accept_token(TokenKind::QuotedIdent));
        let text = tok.text(self.cql);
        Ok(Some(text[1..text.len() - 1].to_owned()))
    }

    /// GRAMMAR: literal: (Int | Float | Str | True | False)
    fn parse_literal(&mut self) -> OptResult<(SourceSpan, Literal)> {
        if let Some(int) = self.parse_int()? {
            return Ok(Some(int));
        }
        if let Some((span, f)) = self.parse_float()? {
            return Ok(Some((span, Literal::Float(f))));
        }
        if let Some((span, s)) = self.parse_str()? {
            return Ok(Some((span, Literal::Str(s))));
        }
        if let Some(tok) = self.accept_token(TokenKind::True)? {
            return Ok(Some((tok.span, Literal::Bool(true))));
        }
        if let Some(tok) = self.accept_token(TokenKind::False)? {
            return Ok(Some((tok.span, Literal::Bool(false))));
        }
        Ok(None)
    }

    /// GRAMMAR: number: (Int | Float)
    fn parse_number(&mut self) -> OptResult<f64> {
        match self.parse_int()? {
            Some((_, Literal::Int(i))) => return Ok(Some(i as f64)),
            Some((_, Literal::Float(f))) => return Ok(Some(f)),
            _ => (),
        }
        let (_, f) = return_none_or_err!(self.parse_float());
        Ok(Some(f))
    }

    // Float
    fn parse_float(&mut self) -> OptResult<(SourceSpan, f64)> {
        let tok = return_none_or_err!(self.accept_token(TokenKind::Float));
        Ok(Some((tok.span, self.float_value(tok)?)))
    }

    // Int
    //
    // Integers that don't fit in an i64 are read as floats.
    fn parse_int(&mut self) -> OptResult<(SourceSpan, Literal)> {
        let tok = return_none_or_err!(self.accept_token(TokenKind::Int));
        match tok.text(self.cql).parse::<i64>() {
            Ok(i) => Ok(Some((tok.span, Literal::Int(i)))),
            Err(e) => match e.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                    Ok(Some((tok.span, Literal::Float(self.float_value(tok)?))))
                }
                _ => Err(self.parse_value_error(
                    tok.span,
                    format!("failed to parse integer literal: {}", e),
                )),
            },
        }
    }

    fn float_value(&self, tok: Token) -> Result<f64> {
        match tok.text(self.cql).parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(f),
            Ok(_) => Err(self.parse_value_error(
                tok.span,
                "number does not fit in 64-bit float data type".to_owned(),
            )),
            Err(e) => Err(self.parse_value_error(
                tok.span,
                format!("failed to parse float literal: {}", e),
            )),
        }
    }

    // Str
    fn parse_str(&mut self) -> OptResult<(SourceSpan, String)> {
        let tok = return_none_or_err!(self.accept_token(TokenKind::Str));
        let text = tok.text(self.cql);
        Ok(Some((tok.span, text[1..text.len() - 1].replace("''", "'"))))
    }

    /// Get the next token in the token stream and increment the cursor.
    ///
    /// # Return
    /// - The next token if it exists.
    /// - `None` if there are no more tokens.
    fn shift_token(&mut self) -> Option<Token> {
        self.expecting.clear();
        let opt_tok = self.tokens.get(self.offset).copied();
        self.offset += 1;
        opt_tok
    }

    /// Get a copy of the next token in the stream without changing the cursor position.
    fn peek_token(&self) -> Option<Token> {
        self.tokens.get(self.offset).copied()
    }

    /// If the next token in the stream has the given kind, return it and increment the cursor.
    ///
    /// # Return
    /// - The next token if it exists and matches the given kind.
    /// - `None` if there are no more tokens or the next token is not of the given kind.
    fn accept_token(&mut self, kind: TokenKind) -> OptResult<Token> {
        match self.peek_token() {
            Some(token) if token.kind == kind => Ok(self.shift_token()),
            _ => {
                self.expecting.push(kind);
                Ok(None)
            }
        }
    }

    /// Like `accept_token()`, but returns an error when `accept_token()` would return `None`.
    fn expect_token(&mut self, kind: TokenKind) -> Result<Token> {
        match self.accept_token(kind)? {
            Some(x) => Ok(x),
            None => Err(self.unexpected_token_error()),
        }
    }

    fn parse_value_error(&self, span: SourceSpan, desc: String) -> Box<Error> {
        Box::new(Error::ParseValue {
            cql: self.cql.to_owned(),
            span,
            desc,
        })
    }

    /// Create an `UnexpectedToken` error with information about the current token and the list of
    /// token kinds that would have been accepted.
    fn unexpected_token_error(&self) -> Box<Error> {
        let (span, kind) = match self.peek_token() {
            Some(t) => (t.span, t.kind),
            None => ((self.cql.len(), 0).into(), TokenKind::Eof),
        };
        Box::new(Error::UnexpectedToken {
            cql: self.cql.to_owned(),
            span,
            kind,
            expecting: self.expecting.clone(),
        })
    }
}

#[cfg(test)]
mod tests {

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::cql::lexer::lex;
    use crate::error::ErrorKind;
    use ComparisonOperator::*;

    fn parse(cql: &str) -> Result<Filter> {
        let tokens = lex(cql)?;
        Parser::new(cql, &tokens).parse()
    }

    fn comparison(property: &str, op: ComparisonOperator, value: Literal) -> Filter {
        Filter::Comparison(Comparison {
            property: property.to_owned(),
            op,
            value,
        })
    }

    fn int_eq(property: &str, value: i64) -> Filter {
        comparison(property, Equal, Literal::Int(value))
    }

    #[rstest]
    #[case::equal("prop = 1", int_eq("prop", 1))]
    #[case::not_equal("prop <> 1", comparison("prop", NotEqual, Literal::Int(1)))]
    #[case::less("prop < 1.5", comparison("prop", Less, Literal::Float(1.5)))]
    #[case::less_or_equal("prop <= -2", comparison("prop", LessOrEqual, Literal::Int(-2)))]
    #[case::greater("prop > 'b'", comparison("prop", Greater, Literal::Str("b".to_owned())))]
    #[case::greater_or_equal("prop >= 0", comparison("prop", GreaterOrEqual, Literal::Int(0)))]
    #[case::bool("flag = TRUE", comparison("flag", Equal, Literal::Bool(true)))]
    #[case::str_with_quote("name = 'it''s'", comparison("name", Equal, Literal::Str("it's".to_owned())))]
    #[case::quoted_property("\"place name\" = 'Rome'", comparison("place name", Equal, Literal::Str("Rome".to_owned())))]
    #[case::int_too_big("a = 9223372036854775808", comparison("a", Equal, Literal::Float(9223372036854775808.0)))]
    #[case::int_too_small("a = -10000000000000000000", comparison("a", Equal, Literal::Float(-1e19)))]
    #[case::exponent("a = 1e+300", comparison("a", Equal, Literal::Float(1e300)))]
    #[case::geometry_name_property("point = 1", int_eq("point", 1))]
    #[case::spatial_name_property("within = 1", int_eq("within", 1))]
    #[case::bbox_name_property("bbox <> 1", comparison("bbox", NotEqual, Literal::Int(1)))]
    fn test_parse_comparison(#[case] cql: &str, #[case] expected: Filter) {
        assert_eq!(parse(cql).unwrap(), expected);
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        assert_eq!(
            parse("a = 1 OR b = 2 AND c = 3").unwrap(),
            Filter::Or(vec![
                int_eq("a", 1),
                Filter::And(vec![int_eq("b", 2), int_eq("c", 3)]),
            ])
        );
    }

    #[test]
    fn test_parentheses_override_precedence() {
        assert_eq!(
            parse("(a = 1 OR b = 2) AND c = 3").unwrap(),
            Filter::And(vec![
                Filter::Or(vec![int_eq("a", 1), int_eq("b", 2)]),
                int_eq("c", 3),
            ])
        );
    }

    #[test]
    fn test_chains_are_flattened() {
        assert_eq!(
            parse("a = 1 AND (b = 2 AND c = 3) AND d = 4").unwrap(),
            Filter::And(vec![
                int_eq("a", 1),
                int_eq("b", 2),
                int_eq("c", 3),
                int_eq("d", 4),
            ])
        );
    }

    #[test]
    fn test_redundant_parentheses() {
        assert_eq!(parse("((prop = 1))").unwrap(), int_eq("prop", 1));
    }

    #[rstest]
    #[case::not("NOT a = 1", Filter::not(int_eq("a", 1)))]
    #[case::not_not("NOT NOT a = 1", Filter::not(Filter::not(int_eq("a", 1))))]
    #[case::not_group("NOT (a = 1 OR a = 2)", Filter::not(Filter::Or(vec![int_eq("a", 1), int_eq("a", 2)])))]
    #[case::is_null("a IS NULL", Filter::IsNull("a".to_owned()))]
    #[case::is_not_null("a is not null", Filter::not(Filter::IsNull("a".to_owned())))]
    #[case::like("name LIKE 'Fl%'", Filter::Like(Like {
        property: "name".to_owned(),
        pattern: "Fl%".to_owned(),
        match_case: true,
    }))]
    #[case::not_ilike("name NOT ILIKE 'fl%'", Filter::not(Filter::Like(Like {
        property: "name".to_owned(),
        pattern: "fl%".to_owned(),
        match_case: false,
    })))]
    #[case::between("depth BETWEEN 10 AND 20.5", Filter::Between(Between {
        property: "depth".to_owned(),
        lower: Literal::Int(10),
        upper: Literal::Float(20.5),
    }))]
    #[case::between_in_and("depth BETWEEN 1 AND 2 AND a = 1", Filter::And(vec![
        Filter::Between(Between {
            property: "depth".to_owned(),
            lower: Literal::Int(1),
            upper: Literal::Int(2),
        }),
        int_eq("a", 1),
    ]))]
    #[case::bbox("BBOX(the_geom, -10, 40.5, 5, 52)", Filter::BBox(BBox {
        property: "the_geom".to_owned(),
        min_x: -10.0,
        min_y: 40.5,
        max_x: 5.0,
        max_y: 52.0,
        crs: None,
    }))]
    #[case::bbox_with_crs("bbox(geom, 0, 1, 2, 3, 'EPSG:3857')", Filter::BBox(BBox {
        property: "geom".to_owned(),
        min_x: 0.0,
        min_y: 1.0,
        max_x: 2.0,
        max_y: 3.0,
        crs: Some("EPSG:3857".to_owned()),
    }))]
    #[case::bbox_huge_coord("BBOX(g, 0, 0, 10000000000000000000, 1)", Filter::BBox(BBox {
        property: "g".to_owned(),
        min_x: 0.0,
        min_y: 0.0,
        max_x: 1e19,
        max_y: 1.0,
        crs: None,
    }))]
    fn test_parse_predicates(#[case] cql: &str, #[case] expected: Filter) {
        assert_eq!(parse(cql).unwrap(), expected);
    }

    #[rstest]
    #[case::empty("", ErrorKind::UnexpectedToken)]
    #[case::missing_value("a =", ErrorKind::UnexpectedToken)]
    #[case::missing_operator("a 1", ErrorKind::UnexpectedToken)]
    #[case::dangling_and("a = 1 AND", ErrorKind::UnexpectedToken)]
    #[case::unbalanced("(a = 1", ErrorKind::UnexpectedToken)]
    #[case::extra_rparen("a = 1)", ErrorKind::UnexpectedToken)]
    #[case::not_is_null("a NOT IS NULL", ErrorKind::UnexpectedToken)]
    #[case::like_number("a LIKE 1", ErrorKind::UnexpectedToken)]
    #[case::bbox_missing_coord("BBOX(g, 1, 2, 3)", ErrorKind::UnexpectedToken)]
    #[case::float_too_big("a = 10.0E+308", ErrorKind::ParseValue)]
    #[case::intersects("INTERSECTS(geom, POINT(1 2))", ErrorKind::UnsupportedGeometry)]
    #[case::dwithin("DWITHIN(geom, POINT(1 2), 10, meters)", ErrorKind::UnsupportedGeometry)]
    #[case::lex("a = #", ErrorKind::Lex)]
    fn test_parse_errors(#[case] cql: &str, #[case] kind: ErrorKind) {
        assert_eq!(parse(cql).unwrap_err().kind(), kind);
    }

    #[test]
    fn test_unexpected_token_reports_expectations() {
        let err = parse("a = 1 b").unwrap_err();
        match *err {
            Error::UnexpectedToken {
                span,
                kind,
                expecting,
                ..
            } => {
                assert_eq!(span, (6, 1).into());
                assert_eq!(kind, TokenKind::Ident);
                assert!(expecting.contains(&TokenKind::Eof));
                assert!(expecting.contains(&TokenKind::And));
                assert!(expecting.contains(&TokenKind::Or));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_geometry_span() {
        let err = parse("INTERSECTS(geom, point(1 2))").unwrap_err();
        match *err {
            Error::UnsupportedGeometry { span, geometry, .. } => {
                assert_eq!(span, (17, 5).into());
                assert_eq!(geometry, "POINT");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
