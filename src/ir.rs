use crate::criteria::{Axis, Column, Criteria};
use crate::scale::{LinearScale, Tick};

// =============================================================================
// Canvas geometry
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Fixed drawing surface. The plot area is the canvas minus the margins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
    pub point_radius: f64,
    pub label_offset: f64,
    pub font_size: f64,
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            width: 800.0,
            height: 500.0,
            margin: Margin { top: 20.0, right: 40.0, bottom: 100.0, left: 100.0 },
            point_radius: 15.0,
            label_offset: 6.0,
            font_size: 16.0,
        }
    }
}

impl Layout {
    pub fn plot_width(&self) -> f64 {
        self.width - self.margin.left - self.margin.right
    }

    pub fn plot_height(&self) -> f64 {
        self.height - self.margin.top - self.margin.bottom
    }

    /// Plot-area coordinates to canvas coordinates
    pub fn to_canvas(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (x + self.margin.left, y + self.margin.top)
    }

    pub fn to_plot(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (x - self.margin.left, y - self.margin.top)
    }

    /// Point labels and tooltip text are set smaller than the selector captions
    pub fn label_font_size(&self) -> f64 {
        self.font_size * 0.75
    }
}

// =============================================================================
// Drawn elements (all positions in plot-area coordinates)
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct AxisElement {
    pub axis: Axis,
    pub scale: LinearScale,
    pub ticks: Vec<Tick>,
}

/// The circle drawn for one record
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub record: usize,
    pub center: (f64, f64),
    pub radius: f64,
}

/// The abbreviation drawn over a marker
#[derive(Debug, Clone, PartialEq)]
pub struct PointLabel {
    pub record: usize,
    pub text: String,
    pub anchor: (f64, f64),
}

/// One of the clickable axis captions
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorLabel {
    pub axis: Axis,
    pub column: Column,
    pub caption: &'static str,
    /// Text centre; for rotated labels this is the centre after rotation
    pub anchor: (f64, f64),
    pub rotated: bool,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Marker(usize),
    PointLabel(usize),
    Selector(Axis, Column),
}

impl Target {
    pub fn record(&self) -> Option<usize> {
        match self {
            Target::Marker(i) | Target::PointLabel(i) => Some(*i),
            Target::Selector(..) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Click,
    MouseOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    SelectCriteria,
    ShowTooltip,
    HideTooltip,
}

/// An event listener attached to a drawn element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub target: Target,
    pub trigger: Trigger,
    pub handler: Handler,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub target: Target,
    pub lines: Vec<String>,
    /// Bottom-centre of the box, just above the element
    pub anchor: (f64, f64),
}

impl Tooltip {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

// =============================================================================
// Render session
// =============================================================================

/// Everything one render drew, plus the listeners bound to it.
/// Replacing the session drops all of it at once.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSession {
    pub generation: u64,
    pub criteria: Criteria,
    pub layout: Layout,
    pub x_axis: AxisElement,
    pub y_axis: AxisElement,
    pub markers: Vec<Marker>,
    pub point_labels: Vec<PointLabel>,
    pub selectors: Vec<SelectorLabel>,
    pub bindings: Vec<Binding>,
    pub tooltip: Option<Tooltip>,
}

impl RenderSession {
    pub fn handler_for(&self, target: Target, trigger: Trigger) -> Option<Handler> {
        self.bindings
            .iter()
            .find(|b| b.target == target && b.trigger == trigger)
            .map(|b| b.handler)
    }

    pub fn selector(&self, axis: Axis, column: Column) -> Option<&SelectorLabel> {
        self.selectors
            .iter()
            .find(|s| s.axis == axis && s.column == column)
    }

    pub fn active_selectors(&self) -> impl Iterator<Item = &SelectorLabel> {
        self.selectors.iter().filter(|s| s.active)
    }

    /// Topmost clickable element under a canvas coordinate
    pub fn hit_test(&self, canvas: (f64, f64)) -> Option<Target> {
        let (px, py) = self.layout.to_plot(canvas);

        // Labels are drawn after markers, so they win ties
        for label in self.point_labels.iter().rev() {
            let (w, h) = text_extent(&label.text, self.layout.label_font_size());
            let (cx, cy) = label.anchor;
            if (px - cx).abs() <= w / 2.0 && (py - cy).abs() <= h / 2.0 {
                return Some(Target::PointLabel(label.record));
            }
        }

        for marker in self.markers.iter().rev() {
            let (cx, cy) = marker.center;
            let d2 = (px - cx).powi(2) + (py - cy).powi(2);
            if d2 <= marker.radius.powi(2) {
                return Some(Target::Marker(marker.record));
            }
        }

        for selector in &self.selectors {
            let (w, h) = text_extent(selector.caption, self.layout.font_size);
            let (w, h) = if selector.rotated { (h, w) } else { (w, h) };
            let (cx, cy) = selector.anchor;
            if (px - cx).abs() <= w / 2.0 && (py - cy).abs() <= h / 2.0 {
                return Some(Target::Selector(selector.axis, selector.column));
            }
        }

        None
    }
}

/// Approximate text box from the glyph count
pub fn text_extent(text: &str, font_size: f64) -> (f64, f64) {
    (text.chars().count() as f64 * font_size * 0.55, font_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_plot_area() {
        let layout = Layout::default();
        assert_eq!(layout.plot_width(), 660.0);
        assert_eq!(layout.plot_height(), 380.0);
    }

    #[test]
    fn test_canvas_round_trip() {
        let layout = Layout::default();
        assert_eq!(layout.to_canvas((0.0, 0.0)), (100.0, 20.0));
        assert_eq!(layout.to_plot((100.0, 20.0)), (0.0, 0.0));
    }

    #[test]
    fn test_target_record() {
        assert_eq!(Target::Marker(3).record(), Some(3));
        assert_eq!(Target::PointLabel(1).record(), Some(1));
        assert_eq!(Target::Selector(Axis::X, Column::Age).record(), None);
    }

    #[test]
    fn test_tooltip_text_joins_lines() {
        let tip = Tooltip {
            target: Target::Marker(0),
            lines: vec!["Ohio".to_string(), "Smokes : 23".to_string()],
            anchor: (0.0, 0.0),
        };
        assert_eq!(tip.text(), "Ohio\nSmokes : 23");
    }
}
