use crate::criteria::{Axis, Criteria};
use crate::csv_reader::Dataset;
use crate::ir::{
    AxisElement, Binding, Handler, Layout, Marker, PointLabel, RenderSession, SelectorLabel, Target,
    Trigger,
};
use crate::scale::{x_scale, y_scale};
use anyhow::{Context, Result};

const TICK_COUNT: usize = 10;

/// Build a complete session for `criteria`. Nothing from an earlier session is consulted.
pub fn compile_chart(
    data: &mut Dataset,
    criteria: Criteria,
    layout: &Layout,
    generation: u64,
) -> Result<RenderSession> {
    // 1. Parse the two selected columns
    data.coerce(criteria.x)
        .with_context(|| format!("Failed to prepare X column '{}'", criteria.x))?;
    data.coerce(criteria.y)
        .with_context(|| format!("Failed to prepare Y column '{}'", criteria.y))?;

    // 2. Scales
    let sx = x_scale(data, criteria.x, layout.plot_width())?;
    let sy = y_scale(data, criteria.y, layout.plot_height())?;
    log::debug!("Scale domains: x={:?} y={:?}", sx.domain, sy.domain);

    // 3. Axes
    let x_axis = AxisElement { axis: Axis::X, scale: sx, ticks: sx.ticks(TICK_COUNT) };
    let y_axis = AxisElement { axis: Axis::Y, scale: sy, ticks: sy.ticks(TICK_COUNT) };

    // 4. Points and their abbreviations
    let xs = data.values(criteria.x)?;
    let ys = data.values(criteria.y)?;
    let mut markers = Vec::with_capacity(data.len());
    let mut point_labels = Vec::with_capacity(data.len());
    for (i, ((record, x), y)) in data.records().iter().zip(xs).zip(ys).enumerate() {
        let center = (sx.apply(x), sy.apply(y));
        markers.push(Marker { record: i, center, radius: layout.point_radius });
        point_labels.push(PointLabel {
            record: i,
            text: record.abbr.clone(),
            anchor: (center.0, center.1 + layout.label_offset),
        });
    }

    // 5. Axis selectors, with the active set derived from criteria
    let selectors = selector_labels(layout, criteria);

    // 6. Listeners
    let bindings = bind(&markers, &selectors);

    Ok(RenderSession {
        generation,
        criteria,
        layout: *layout,
        x_axis,
        y_axis,
        markers,
        point_labels,
        selectors,
        bindings,
        tooltip: None,
    })
}

/// The six captions at their fixed positions
fn selector_labels(layout: &Layout, criteria: Criteria) -> Vec<SelectorLabel> {
    let mut labels = Vec::with_capacity(6);

    // X captions stack downward below the axis
    for (column, dy) in Axis::X.selector_group().into_iter().zip([30.0, 50.0, 70.0]) {
        labels.push(SelectorLabel {
            axis: Axis::X,
            column,
            caption: column.caption(),
            anchor: (
                layout.plot_width() / 2.0,
                layout.plot_height() + layout.margin.top + dy,
            ),
            rotated: false,
            active: criteria.x == column,
        });
    }

    // Y captions are rotated and stack leftward; the em shift moves the baseline inward
    for (column, dx) in Axis::Y.selector_group().into_iter().zip([40.0, 20.0, 0.0]) {
        labels.push(SelectorLabel {
            axis: Axis::Y,
            column,
            caption: column.caption(),
            anchor: (
                -layout.margin.left + dx + layout.font_size,
                layout.plot_height() / 2.0,
            ),
            rotated: true,
            active: criteria.y == column,
        });
    }

    labels
}

fn bind(markers: &[Marker], selectors: &[SelectorLabel]) -> Vec<Binding> {
    let mut bindings = Vec::with_capacity(selectors.len() + markers.len() * 4);

    for selector in selectors {
        bindings.push(Binding {
            target: Target::Selector(selector.axis, selector.column),
            trigger: Trigger::Click,
            handler: Handler::SelectCriteria,
        });
    }

    for marker in markers {
        for target in [Target::Marker(marker.record), Target::PointLabel(marker.record)] {
            bindings.push(Binding { target, trigger: Trigger::Click, handler: Handler::ShowTooltip });
            bindings.push(Binding { target, trigger: Trigger::MouseOut, handler: Handler::HideTooltip });
        }
    }

    bindings
}
