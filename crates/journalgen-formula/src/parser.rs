//! Formula parser implementation.
//!
//! Uses chumsky for parser combinators. Precedence climbs from `factor`
//! (literals, identifiers, parentheses, negation) through `term` (`*`, `/`)
//! to `expression` (`+`, `-`); both binary levels are left-associative.

use chumsky::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::ast::{BinaryOperator, Expr};
use crate::error::{ParseError, ParseErrorKind};

type ParserInput<'a> = &'a str;
type ParserExtra<'a> = extra::Err<Rich<'a, char>>;

const IDENT_START: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_";
const IDENT_CONTINUE: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_0123456789";

/// Parse a formula string.
///
/// # Errors
///
/// Returns a `ParseError` carrying the character offset of the first
/// offending token if the formula is malformed or blank.
pub fn parse(source: &str) -> Result<Expr, ParseError> {
    if source.trim().is_empty() {
        return Err(ParseError::new(ParseErrorKind::Empty, 0));
    }

    let (result, errs) = ws()
        .ignore_then(expr())
        .then_ignore(ws())
        .then_ignore(end())
        .parse(source)
        .into_output_errors();

    if let (Some(expr), true) = (result, errs.is_empty()) {
        Ok(expr)
    } else {
        let err = errs.first().map(|e| {
            let kind = if e.found().is_none() {
                ParseErrorKind::UnexpectedEof
            } else {
                ParseErrorKind::SyntaxError(e.to_string())
            };
            ParseError::new(kind, char_offset(source, e.span().start))
        });
        Err(err.unwrap_or_else(|| {
            ParseError::new(ParseErrorKind::UnexpectedEof, source.chars().count())
        }))
    }
}

/// Convert a byte offset into a character offset.
fn char_offset(source: &str, byte_offset: usize) -> usize {
    source
        .get(..byte_offset)
        .map_or(byte_offset, |prefix| prefix.chars().count())
}

/// Parse whitespace (spaces, tabs, newlines).
fn ws<'a>() -> impl Parser<'a, ParserInput<'a>, (), ParserExtra<'a>> + Clone {
    one_of(" \t\r\n").repeated().ignored()
}

/// Parse digits.
fn digits<'a>() -> impl Parser<'a, ParserInput<'a>, &'a str, ParserExtra<'a>> + Clone {
    one_of("0123456789").repeated().at_least(1).to_slice()
}

/// Parse an expression (with precedence climbing).
fn expr<'a>() -> impl Parser<'a, ParserInput<'a>, Expr, ParserExtra<'a>> {
    recursive(|expr| {
        let primary = choice((
            just('(')
                .ignore_then(ws())
                .ignore_then(expr)
                .then_ignore(ws())
                .then_ignore(just(')')),
            number().map(Expr::Number),
            identifier().map(Expr::Variable),
        ));

        // '-' factor, any depth
        let factor = just('-')
            .then_ignore(ws())
            .ignored()
            .repeated()
            .collect::<Vec<_>>()
            .then(primary)
            .map(|(negs, e)| negs.into_iter().fold(e, |acc, ()| Expr::neg(acc)));

        // Multiplicative: * /
        let term = factor.clone().foldl(
            ws().ignore_then(choice((
                just('*').to(BinaryOperator::Mul),
                just('/').to(BinaryOperator::Div),
            )))
            .then_ignore(ws())
            .then(factor)
            .repeated(),
            |left, (op, right)| Expr::binary(left, op, right),
        );

        // Additive: + -
        term.clone().foldl(
            ws().ignore_then(choice((
                just('+').to(BinaryOperator::Add),
                just('-').to(BinaryOperator::Sub),
            )))
            .then_ignore(ws())
            .then(term)
            .repeated(),
            |left, (op, right)| Expr::binary(left, op, right),
        )
    })
}

/// Parse an identifier.
fn identifier<'a>() -> impl Parser<'a, ParserInput<'a>, String, ParserExtra<'a>> + Clone {
    one_of(IDENT_START)
        .then(one_of(IDENT_CONTINUE).repeated())
        .to_slice()
        .map(|s: &str| s.to_string())
}

/// Parse an unsigned decimal literal.
fn number<'a>() -> impl Parser<'a, ParserInput<'a>, Decimal, ParserExtra<'a>> + Clone {
    digits()
        .then(just('.').then(digits()).or_not())
        .to_slice()
        .try_map(|s: &str, span| {
            Decimal::from_str(s).map_err(|_| Rich::custom(span, "invalid number"))
        })
}
