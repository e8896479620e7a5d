// User input events and the selector-click rule

use crate::criteria::{Axis, Column, Criteria};
use crate::csv_reader::Dataset;
use crate::ir::{RenderSession, Target, Trigger};
use anyhow::{anyhow, Result};
use std::fmt;

/// How a script names a point
#[derive(Debug, Clone, PartialEq)]
pub enum PointRef {
    Abbr(String),
    Index(usize),
    /// Canvas coordinates, resolved by hit test
    At(f64, f64),
}

impl PointRef {
    /// Resolve against the live session. Abbreviations and indices address the marker.
    pub fn resolve(&self, session: &RenderSession, data: &Dataset) -> Result<Target> {
        match self {
            PointRef::Abbr(abbr) => data
                .position_of_abbr(abbr)
                .map(Target::Marker)
                .ok_or_else(|| anyhow!("No point labelled '{}'", abbr)),
            PointRef::Index(i) if *i < data.len() => Ok(Target::Marker(*i)),
            PointRef::Index(i) => Err(anyhow!(
                "Point index {} out of bounds ({} points drawn)",
                i,
                data.len()
            )),
            PointRef::At(x, y) => session
                .hit_test((*x, *y))
                .ok_or_else(|| anyhow!("Nothing drawn at ({}, {})", x, y)),
        }
    }
}

impl fmt::Display for PointRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointRef::Abbr(a) => f.write_str(a),
            PointRef::Index(i) => write!(f, "#{}", i),
            PointRef::At(x, y) => write!(f, "@{},{}", x, y),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartEvent {
    /// Click on the selector caption for `column` on `axis`
    Select { axis: Axis, column: Column },
    Click(PointRef),
    MouseOut(PointRef),
    /// Redraw with the current selection
    Render,
}

impl ChartEvent {
    /// Element and trigger this event is delivered to
    pub fn route(&self, session: &RenderSession, data: &Dataset) -> Result<Option<(Target, Trigger)>> {
        Ok(match self {
            ChartEvent::Select { axis, column } => {
                Some((Target::Selector(*axis, *column), Trigger::Click))
            }
            ChartEvent::Click(point) => Some((point.resolve(session, data)?, Trigger::Click)),
            ChartEvent::MouseOut(point) => Some((point.resolve(session, data)?, Trigger::MouseOut)),
            ChartEvent::Render => None,
        })
    }
}

impl fmt::Display for ChartEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartEvent::Select { axis, column } => write!(f, "select {} {}", axis, column),
            ChartEvent::Click(p) => write!(f, "click {}", p),
            ChartEvent::MouseOut(p) => write!(f, "mouseout {}", p),
            ChartEvent::Render => f.write_str("render"),
        }
    }
}

/// New selection after a click on a selector caption. Only the clicked axis changes.
pub fn on_selector_click(current: Criteria, session: &RenderSession, target: Target) -> Result<Criteria> {
    match target {
        Target::Selector(axis, column) => {
            let label = session.selector(axis, column).ok_or_else(|| {
                anyhow!("No '{}' selector on the {} axis", column, axis)
            })?;
            Ok(current.with(label.axis, label.column))
        }
        other => Err(anyhow!("{:?} is not an axis selector", other)),
    }
}
