// Lexer utilities for the event-script language

use nom::{
    bytes::complete::take_while1,
    character::complete::{digit1, space0},
    combinator::{map_res, recognize},
    number::complete::double,
    sequence::delimited,
    IResult,
};

/// Parse and consume surrounding spaces (scripts are line based, so no newlines)
pub fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(space0, inner, space0)
}

/// Parse an identifier (column key, abbreviation)
/// Format: [a-zA-Z_][a-zA-Z0-9_]*
pub fn identifier(input: &str) -> IResult<&str, String> {
    let (rest, ident) = recognize(take_while1(|c: char| c.is_alphanumeric() || c == '_'))(input)?;

    if let Some(first) = ident.chars().next() {
        if !first.is_alphabetic() && first != '_' {
            return Err(nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Alpha)));
        }
    }

    Ok((rest, ident.to_string()))
}

/// Parse an unsigned integer
pub fn index_literal(input: &str) -> IResult<&str, usize> {
    map_res(digit1, str::parse::<usize>)(input)
}

/// Parse a number literal (integer or float)
pub fn number_literal(input: &str) -> IResult<&str, f64> {
    double(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nom::bytes::complete::tag;

    #[test]
    fn test_identifier() {
        assert_eq!(identifier("poverty"), Ok(("", "poverty".to_string())));
        assert_eq!(identifier("healthcareLow"), Ok(("", "healthcareLow".to_string())));
        assert_eq!(identifier("OH rest"), Ok((" rest", "OH".to_string())));
    }

    #[test]
    fn test_identifier_invalid_start_with_number() {
        assert!(identifier("123abc").is_err());
        assert!(identifier("1test").is_err());
    }

    #[test]
    fn test_index_literal() {
        assert_eq!(index_literal("42"), Ok(("", 42)));
        assert!(index_literal("-1").is_err());
    }

    #[test]
    fn test_number_literal() {
        assert_eq!(number_literal("42"), Ok(("", 42.0)));
        assert_eq!(number_literal("3.5,"), Ok((",", 3.5)));
        assert_eq!(number_literal("-0.1"), Ok(("", -0.1)));
    }

    #[test]
    fn test_ws() {
        let mut parser = ws(tag("click"));
        assert_eq!(parser("  click  "), Ok(("", "click")));
        assert_eq!(parser("click"), Ok(("", "click")));
        assert_eq!(parser("\tclick\t"), Ok(("", "click")));
    }
}
