use crate::criteria::Axis;
use crate::ir::{AxisElement, Layout, RenderSession, SelectorLabel, Tooltip};
use anyhow::{anyhow, Context, Result};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle, FontTransform};

const MARKER_FILL: RGBColor = RGBColor(137, 189, 211);
const MARKER_TEXT: RGBColor = RGBColor(255, 255, 255);
const ACTIVE_TEXT: RGBColor = RGBColor(0, 0, 0);
const INACTIVE_TEXT: RGBColor = RGBColor(201, 201, 201);
const TOOLTIP_FILL: RGBColor = RGBColor(0, 0, 0);
const TICK_SIZE: f64 = 6.0;
const TICK_FONT: f64 = 10.0;
const TOOLTIP_PADDING: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
}

impl OutputFormat {
    /// Pick a format from a file extension; anything but `.png` is SVG
    pub fn from_path(path: &std::path::Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("png") => OutputFormat::Png,
            _ => OutputFormat::Svg,
        }
    }
}

pub fn render_session(session: &RenderSession, format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Svg => render_svg(session).map(String::into_bytes),
        OutputFormat::Png => render_png(session),
    }
}

pub fn render_svg(session: &RenderSession) -> Result<String> {
    let (width, height) = canvas_size(&session.layout);
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
        draw_session(&root, session)?;
        root.present()
            .map_err(|e| anyhow!("Failed to present drawing: {}", e))?;
    }
    Ok(svg)
}

pub fn render_png(session: &RenderSession) -> Result<Vec<u8>> {
    let (width, height) = canvas_size(&session.layout);
    let mut buffer = vec![0u8; (width * height * 3) as usize];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw_session(&root, session)?;
        root.present()
            .map_err(|e| anyhow!("Failed to present drawing: {}", e))?;
    }

    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(&buffer, width, height, image::ColorType::Rgb8)
            .context("Failed to encode PNG")?;
    }

    Ok(png_bytes)
}

fn canvas_size(layout: &Layout) -> (u32, u32) {
    (layout.width.round() as u32, layout.height.round() as u32)
}

/// Draw a whole session onto a cleared canvas
pub fn draw_session<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    session: &RenderSession,
) -> Result<()> {
    let layout = &session.layout;

    root.fill(&WHITE)
        .map_err(|e| anyhow!("Failed to fill background: {}", e))?;

    draw_axis(root, layout, &session.x_axis)?;
    draw_axis(root, layout, &session.y_axis)?;

    for marker in &session.markers {
        root.draw(&Circle::new(
            px(layout.to_canvas(marker.center)),
            marker.radius.round() as i32,
            MARKER_FILL.mix(0.5).filled(),
        ))
        .map_err(|e| anyhow!("Failed to draw point: {}", e))?;
    }

    let label_style = TextStyle::from(("sans-serif", layout.label_font_size()).into_font())
        .color(&MARKER_TEXT)
        .pos(Pos::new(HPos::Center, VPos::Center));
    for label in &session.point_labels {
        root.draw(&Text::new(
            label.text.clone(),
            px(layout.to_canvas(label.anchor)),
            label_style.clone(),
        ))
        .map_err(|e| anyhow!("Failed to draw point label: {}", e))?;
    }

    for selector in &session.selectors {
        draw_selector(root, layout, selector)?;
    }

    if let Some(tooltip) = &session.tooltip {
        draw_tooltip(root, layout, tooltip)?;
    }

    Ok(())
}

fn draw_axis<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    layout: &Layout,
    axis: &AxisElement,
) -> Result<()> {
    let (r0, r1) = axis.scale.range;
    let tick_style = TextStyle::from(("sans-serif", TICK_FONT).into_font()).color(&BLACK);

    // Domain line along the range, then one tick per value
    let (line, ticks): (Vec<(f64, f64)>, Vec<((f64, f64), (f64, f64), (f64, f64))>) = match axis.axis {
        Axis::X => {
            let y = layout.plot_height();
            (
                vec![(r0, y), (r1, y)],
                axis.ticks
                    .iter()
                    .map(|t| {
                        let x = axis.scale.apply(t.value);
                        ((x, y), (x, y + TICK_SIZE), (x, y + TICK_SIZE + 3.0))
                    })
                    .collect(),
            )
        }
        Axis::Y => (
            vec![(0.0, r0), (0.0, r1)],
            axis.ticks
                .iter()
                .map(|t| {
                    let y = axis.scale.apply(t.value);
                    ((0.0, y), (-TICK_SIZE, y), (-TICK_SIZE - 3.0, y))
                })
                .collect(),
        ),
    };

    root.draw(&PathElement::new(
        line.into_iter().map(|p| px(layout.to_canvas(p))).collect::<Vec<_>>(),
        &BLACK,
    ))
    .map_err(|e| anyhow!("Failed to draw axis: {}", e))?;

    let pos = match axis.axis {
        Axis::X => Pos::new(HPos::Center, VPos::Top),
        Axis::Y => Pos::new(HPos::Right, VPos::Center),
    };
    for (tick, (start, end, text_at)) in axis.ticks.iter().zip(ticks) {
        root.draw(&PathElement::new(
            vec![px(layout.to_canvas(start)), px(layout.to_canvas(end))],
            &BLACK,
        ))
        .map_err(|e| anyhow!("Failed to draw tick: {}", e))?;
        root.draw(&Text::new(
            tick.label.clone(),
            px(layout.to_canvas(text_at)),
            tick_style.clone().pos(pos),
        ))
        .map_err(|e| anyhow!("Failed to draw tick label: {}", e))?;
    }

    Ok(())
}

fn draw_selector<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    layout: &Layout,
    selector: &SelectorLabel,
) -> Result<()> {
    let (font_style, color) = if selector.active {
        (FontStyle::Bold, &ACTIVE_TEXT)
    } else {
        (FontStyle::Normal, &INACTIVE_TEXT)
    };

    let mut font = FontDesc::new(FontFamily::SansSerif, layout.font_size, font_style);
    if selector.rotated {
        font = font.transform(FontTransform::Rotate270);
    }
    let style = TextStyle::from(font)
        .color(color)
        .pos(Pos::new(HPos::Center, VPos::Center));

    root.draw(&Text::new(
        selector.caption,
        px(layout.to_canvas(selector.anchor)),
        style,
    ))
    .map_err(|e| anyhow!("Failed to draw selector '{}': {}", selector.caption, e))?;
    Ok(())
}

fn draw_tooltip<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    layout: &Layout,
    tooltip: &Tooltip,
) -> Result<()> {
    let font_size = layout.label_font_size();
    let line_height = font_size * 1.3;
    let width = tooltip
        .lines
        .iter()
        .map(|l| crate::ir::text_extent(l, font_size).0)
        .fold(0.0, f64::max)
        + TOOLTIP_PADDING * 2.0;
    let height = line_height * tooltip.lines.len() as f64 + TOOLTIP_PADDING * 2.0;

    let (ax, ay) = tooltip.anchor;
    let top_left = (ax - width / 2.0, ay - height - 4.0);
    let bottom_right = (ax + width / 2.0, ay - 4.0);

    root.draw(&Rectangle::new(
        [px(layout.to_canvas(top_left)), px(layout.to_canvas(bottom_right))],
        TOOLTIP_FILL.mix(0.8).filled(),
    ))
    .map_err(|e| anyhow!("Failed to draw tooltip: {}", e))?;

    let style = TextStyle::from(("sans-serif", font_size).into_font())
        .color(&WHITE)
        .pos(Pos::new(HPos::Center, VPos::Top));
    for (i, line) in tooltip.lines.iter().enumerate() {
        let at = (ax, top_left.1 + TOOLTIP_PADDING + line_height * i as f64);
        root.draw(&Text::new(line.clone(), px(layout.to_canvas(at)), style.clone()))
            .map_err(|e| anyhow!("Failed to draw tooltip text: {}", e))?;
    }

    Ok(())
}

fn px((x, y): (f64, f64)) -> (i32, i32) {
    (x.round() as i32, y.round() as i32)
}
