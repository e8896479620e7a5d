// Parser for one line of an event script

use super::lexer::{identifier, index_literal, number_literal, ws};
use crate::criteria::{Axis, Column};
use crate::interaction::{ChartEvent, PointRef};
use anyhow::{anyhow, Result};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, space1},
    combinator::{eof, map, map_res, value},
    sequence::{preceded, separated_pair},
    IResult,
};

/// Parse a complete event
/// Format: select (x|y) <column> | click <point> | mouseout <point> | render
pub fn parse_event(input: &str) -> IResult<&str, ChartEvent> {
    let (input, event) = ws(alt((parse_select, parse_click, parse_mouseout, parse_render)))(input)?;
    let (input, _) = eof(input)?;
    Ok((input, event))
}

/// Parse a script line. Blank lines and `#` comments yield `None`.
pub fn parse_event_line(line: &str) -> Result<Option<ChartEvent>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    match parse_event(trimmed) {
        Ok((_, event)) => Ok(Some(event)),
        Err(e) => Err(anyhow!("Parse error in '{}': {}", trimmed, e)),
    }
}

fn parse_select(input: &str) -> IResult<&str, ChartEvent> {
    let (input, _) = tag("select")(input)?;
    let (input, _) = space1(input)?;
    let (input, axis) = alt((value(Axis::X, tag("x")), value(Axis::Y, tag("y"))))(input)?;
    let (input, _) = space1(input)?;
    let (input, column) = map_res(identifier, |key| Column::from_key(&key))(input)?;
    Ok((input, ChartEvent::Select { axis, column }))
}

fn parse_click(input: &str) -> IResult<&str, ChartEvent> {
    let (input, _) = tag("click")(input)?;
    let (input, _) = space1(input)?;
    map(parse_point_ref, ChartEvent::Click)(input)
}

fn parse_mouseout(input: &str) -> IResult<&str, ChartEvent> {
    let (input, _) = tag("mouseout")(input)?;
    let (input, _) = space1(input)?;
    map(parse_point_ref, ChartEvent::MouseOut)(input)
}

fn parse_render(input: &str) -> IResult<&str, ChartEvent> {
    value(ChartEvent::Render, tag("render"))(input)
}

/// Format: ABBR | #index | @x,y
fn parse_point_ref(input: &str) -> IResult<&str, PointRef> {
    alt((
        map(preceded(char('#'), index_literal), PointRef::Index),
        map(
            preceded(char('@'), separated_pair(number_literal, ws(char(',')), number_literal)),
            |(x, y)| PointRef::At(x, y),
        ),
        map(identifier, PointRef::Abbr),
    ))(input)
}
