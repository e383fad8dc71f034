// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal SVG dump of a [`VennLayout`].

use kurbo::{Point, Rect};
use peniko::Color;
use peniko::color::palette::css;
use vizir_venn::{DISJOINT_ANCHOR, EMPTY_PATH, VennLayout};

const PALETTE: [Color; 6] = [
    css::STEEL_BLUE,
    css::DARK_ORANGE,
    css::SEA_GREEN,
    css::CRIMSON,
    css::MEDIUM_PURPLE,
    css::SADDLE_BROWN,
];

/// Presentation settings for [`render_svg`].
#[derive(Clone, Copy, Debug)]
pub(crate) struct SvgStyle {
    pub(crate) font_size: f64,
    pub(crate) fill_opacity: f32,
    pub(crate) stroke_width: f64,
    pub(crate) label_color: Color,
}

impl Default for SvgStyle {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            fill_opacity: 0.25,
            stroke_width: 2.0,
            label_color: css::BLACK,
        }
    }
}

/// Renders circles, intersection outlines and labels.
pub(crate) fn render_svg(layout: &VennLayout, view: Rect, style: &SvgStyle) -> String {
    let mut out = String::new();
    out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" "#);
    out.push_str(&format!(
        r#"viewBox="{} {} {} {}" width="{}" height="{}">"#,
        view.x0,
        view.y0,
        view.width(),
        view.height(),
        view.width(),
        view.height()
    ));
    out.push('\n');

    for (i, circle) in layout.circles.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        out.push_str(&format!(
            r#"<circle cx="{}" cy="{}" r="{}""#,
            circle.x,
            circle.y,
            circle.radius()
        ));
        write_paint_attr(&mut out, "fill", color.with_alpha(style.fill_opacity));
        write_paint_attr(&mut out, "stroke", color);
        out.push_str(&format!(r#" stroke-width="{}"/>"#, style.stroke_width));
        out.push('\n');
    }

    for region in &layout.intersections {
        if region.path == EMPTY_PATH {
            continue;
        }
        out.push_str(&format!(r#"<path d="{}" fill="none""#, region.path));
        write_paint_attr(&mut out, "stroke", style.label_color.with_alpha(0.5));
        out.push_str(r#" stroke-dasharray="4 3"/>"#);
        out.push('\n');
    }

    let labels = layout
        .circles
        .iter()
        .map(|c| (c.text_x, c.text_y, c.label.as_str()))
        .chain(
            layout
                .intersections
                .iter()
                .map(|r| (r.text_x, r.text_y, r.label.as_str())),
        );
    for (x, y, text) in labels {
        if Point::new(x, y) == DISJOINT_ANCHOR {
            continue;
        }
        out.push_str(&format!(
            r#"<text x="{x}" y="{y}" font-size="{}" text-anchor="middle" dominant-baseline="middle""#,
            style.font_size
        ));
        write_paint_attr(&mut out, "fill", style.label_color);
        out.push('>');
        out.push_str(&escape_xml(text));
        out.push_str("</text>\n");
    }

    out.push_str("</svg>\n");
    out
}

fn svg_paint(color: Color) -> (String, Option<f64>) {
    let rgba = color.to_rgba8();
    let value = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
    let opacity = if rgba.a == 255 {
        None
    } else {
        Some(f64::from(rgba.a) / 255.0)
    };
    (value, opacity)
}

fn write_paint_attr(out: &mut String, name: &str, color: Color) {
    let (value, opacity) = svg_paint(color);
    out.push_str(&format!(r#" {name}="{value}""#));
    if let Some(o) = opacity {
        out.push_str(&format!(r#" {name}-opacity="{o}""#));
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
