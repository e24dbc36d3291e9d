//! Low-level nom parser functions for CSS-like style values.
//!
//! Covers lengths, colours, border shorthands and margin shorthands.

use crate::border::{Border, BorderStyle};
use crate::dimension::{Margins, PageSize};
use nom::branch::alt;
use nom::bytes::complete::{tag_no_case, take_while_m_n};
use nom::character::complete::{char, space0, space1};
use nom::combinator::{map, map_res, opt, recognize};
use nom::multi::separated_list1;
use nom::sequence::{delimited, pair, preceded};
use nom::{IResult, Parser};
use tabula_types::Color;
use thiserror::Error;

/// Errors that can occur during style parsing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleParseError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid value for '{property}': {value}")]
    InvalidValue { property: String, value: String },
}

// --- Helper Parsers ---

fn ws<'a, F, O>(inner: F) -> impl Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>
where
    F: Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>,
{
    delimited(space0, inner, space0)
}

fn digits(input: &str) -> IResult<&str, &str> {
    take_while_m_n(1, 10, |c: char| c.is_ascii_digit()).parse(input)
}

fn parse_f32(input: &str) -> IResult<&str, f32> {
    map_res(
        recognize(pair(
            opt(alt((char('+'), char('-')))),
            alt((
                recognize((digits, opt((char('.'), digits)))),
                recognize((char('.'), digits)),
            )),
        )),
        |s: &str| s.parse::<f32>(),
    )
    .parse(input)
}

fn parse_unit(input: &str) -> IResult<&str, f32> {
    alt((
        map(tag_no_case("pt"), |_| 1.0),
        map(tag_no_case("px"), |_| 1.0),
        map(tag_no_case("in"), |_| 72.0),
        map(tag_no_case("cm"), |_| 28.35),
        map(tag_no_case("mm"), |_| 2.835),
    ))
    .parse(input)
}

/// Parses a length value with optional unit (e.g., "12pt", "1in", "10mm").
pub fn parse_length(input: &str) -> IResult<&str, f32> {
    let (input, value) = parse_f32(input)?;
    let (input, unit_multiplier) = opt(parse_unit).parse(input)?;
    Ok((input, value * unit_multiplier.unwrap_or(1.0)))
}

/// Parses CSS shorthand margins (1, 2, or 4 values).
pub fn parse_shorthand_margins(input: &str) -> Result<Margins, StyleParseError> {
    let parts = match separated_list1(space1, parse_length).parse(input.trim()) {
        Ok(("", parts)) => parts,
        _ => {
            return Err(StyleParseError::Parse(format!(
                "Failed to parse margins value: '{}'",
                input
            )));
        }
    };

    match parts.as_slice() {
        [all] => Ok(Margins::all(*all)),
        [y, x] => Ok(Margins {
            top: *y,
            right: *x,
            bottom: *y,
            left: *x,
        }),
        [top, right, bottom, left] => Ok(Margins {
            top: *top,
            right: *right,
            bottom: *bottom,
            left: *left,
        }),
        _ => Err(StyleParseError::Parse(format!(
            "Invalid number of values for margin shorthand: got {}, expected 1, 2, or 4.",
            parts.len()
        ))),
    }
}

// --- Color & Border Parsers ---

fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

fn hex_primary(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(2, 2, is_hex_digit), |s| u8::from_str_radix(s, 16)).parse(input)
}

fn hex_short(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(1, 1, is_hex_digit), |s: &str| {
        u8::from_str_radix(s, 16).map(|v| v * 17)
    })
    .parse(input)
}

/// Parses a hex color (e.g., "#FF0000" or "#F00").
pub fn parse_color(input: &str) -> IResult<&str, Color> {
    preceded(
        char('#'),
        alt((
            map((hex_primary, hex_primary, hex_primary), |(r, g, b)| {
                Color::rgb(r, g, b)
            }),
            map((hex_short, hex_short, hex_short), |(r, g, b)| {
                Color::rgb(r, g, b)
            }),
        )),
    )
    .parse(input)
}

/// Parses a border style keyword.
pub fn parse_border_style(input: &str) -> IResult<&str, BorderStyle> {
    alt((
        map(tag_no_case("solid"), |_| BorderStyle::Solid),
        map(tag_no_case("dashed"), |_| BorderStyle::Dashed),
        map(tag_no_case("dotted"), |_| BorderStyle::Dotted),
        map(tag_no_case("double"), |_| BorderStyle::Double),
    ))
    .parse(input)
}

/// Parses a CSS border shorthand (e.g., "2pt solid #00ff00"). The colour is optional
/// and defaults to black.
pub fn parse_border(input: &str) -> IResult<&str, Border> {
    map(
        (
            ws(parse_length),
            ws(parse_border_style),
            opt(ws(parse_color)),
        ),
        |(width, style, color)| Border::new(width, style, color.unwrap_or_default()),
    )
    .parse(input)
}

/// Parses a border shorthand where `none` means "no border on this side".
pub fn parse_border_side(input: &str) -> Result<Option<Border>, StyleParseError> {
    if input.trim().eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    input.parse::<Border>().map(Some)
}

/// Parses a page size name (e.g., "A4", "Letter", "Legal").
pub fn parse_page_size(s: &str) -> Result<PageSize, StyleParseError> {
    match s.trim().to_lowercase().as_str() {
        "a4" => Ok(PageSize::A4),
        "letter" => Ok(PageSize::Letter),
        "legal" => Ok(PageSize::Legal),
        _ => Err(StyleParseError::InvalidValue {
            property: "page-size".to_string(),
            value: s.to_string(),
        }),
    }
}

/// Runs a nom parser and converts its result to a `Result<T, StyleParseError>`.
pub fn run_parser<'a, T, F>(mut parser: F, input: &'a str) -> Result<T, StyleParseError>
where
    F: Parser<&'a str, Output = T, Error = nom::error::Error<&'a str>>,
{
    match parser.parse(input.trim()) {
        Ok(("", result)) => Ok(result),
        Ok((rem, _)) => Err(StyleParseError::Parse(format!(
            "Parser did not consume all input. Remainder: '{}'",
            rem
        ))),
        Err(e) => Err(StyleParseError::Parse(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_length() {
        assert_eq!(run_parser(parse_length, "12").unwrap(), 12.0);
        assert_eq!(run_parser(parse_length, "12pt").unwrap(), 12.0);
        assert_eq!(run_parser(parse_length, "1in").unwrap(), 72.0);
        assert_eq!(run_parser(parse_length, ".5").unwrap(), 0.5);
        assert!(run_parser(parse_length, "abc").is_err());
    }

    #[test]
    fn test_parse_shorthand_margins() {
        assert_eq!(parse_shorthand_margins("10").unwrap(), Margins::all(10.0));
        let m = parse_shorthand_margins("10pt 20pt").unwrap();
        assert_eq!((m.top, m.right, m.bottom, m.left), (10.0, 20.0, 10.0, 20.0));
        let m = parse_shorthand_margins("1 2 3 4").unwrap();
        assert_eq!((m.top, m.right, m.bottom, m.left), (1.0, 2.0, 3.0, 4.0));
        assert!(parse_shorthand_margins("1 2 3").is_err());
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(run_parser(parse_color, "#00ff00").unwrap(), Color::rgb(0, 255, 0));
        assert_eq!(run_parser(parse_color, "#f00").unwrap(), Color::rgb(255, 0, 0));
        assert!(run_parser(parse_color, "00ff00").is_err());
    }

    #[test]
    fn test_parse_border() {
        let border = run_parser(parse_border, "2pt solid #00ff00").unwrap();
        assert_eq!(border.width, 2.0);
        assert_eq!(border.style, BorderStyle::Solid);
        assert_eq!(border.color, Color::rgb(0, 255, 0));

        let border = run_parser(parse_border, "0.5 dashed").unwrap();
        assert_eq!(border.style, BorderStyle::Dashed);
        assert_eq!(border.color, Color::BLACK);
    }

    #[test]
    fn test_parse_border_side_none() {
        assert_eq!(parse_border_side("none").unwrap(), None);
        assert!(parse_border_side("1pt wavy").is_err());
    }

    #[test]
    fn test_parse_page_size() {
        assert_eq!(parse_page_size("a4").unwrap(), PageSize::A4);
        assert!(parse_page_size("tabloid-ish").is_err());
    }
}
