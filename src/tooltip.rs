// Per-point annotation shown on click and hidden on mouse-out

use crate::criteria::{Column, Criteria};
use crate::csv_reader::{Dataset, Record};
use crate::ir::{RenderSession, Target, Tooltip};
use anyhow::{anyhow, Result};

/// Tooltip body: state name, then the Y pair, then the X pair
pub fn tooltip_lines(record: &Record, criteria: Criteria) -> Result<Vec<String>> {
    let value = |column: Column| {
        record.value(column).ok_or_else(|| {
            anyhow!("Record '{}' has no numeric value for '{}'", record.abbr, column)
        })
    };

    Ok(vec![
        record.state.clone(),
        format!("{} : {}", criteria.y.tooltip_label(), value(criteria.y)?),
        format!("{} : {}", criteria.x.tooltip_label(), value(criteria.x)?),
    ])
}

/// Show the annotation for `target`, replacing any visible one
pub fn show(session: &mut RenderSession, data: &Dataset, target: Target) -> Result<()> {
    let index = target
        .record()
        .ok_or_else(|| anyhow!("Tooltips attach to points, not {:?}", target))?;

    let anchor = match target {
        Target::Marker(_) => {
            let marker = session
                .markers
                .iter()
                .find(|m| m.record == index)
                .ok_or_else(|| anyhow!("No marker drawn for record {}", index))?;
            (marker.center.0, marker.center.1 - marker.radius)
        }
        Target::PointLabel(_) => {
            let label = session
                .point_labels
                .iter()
                .find(|l| l.record == index)
                .ok_or_else(|| anyhow!("No label drawn for record {}", index))?;
            (label.anchor.0, label.anchor.1 - session.layout.label_font_size() / 2.0)
        }
        Target::Selector(..) => return Err(anyhow!("No tooltip anchor on {:?}", target)),
    };
    let record = data
        .get(index)
        .ok_or_else(|| anyhow!("No record at index {}", index))?;

    let tooltip = Tooltip { target, lines: tooltip_lines(record, session.criteria)?, anchor };
    log::debug!("Tooltip shown for {}: {:?}", record.abbr, tooltip.text());
    session.tooltip = Some(tooltip);
    Ok(())
}

pub fn hide(session: &mut RenderSession) {
    if session.tooltip.take().is_some() {
        log::debug!("Tooltip hidden");
    }
}
