use super::model::{MenuView, WedgeSlot};
use super::{
    ACTION_FONT_SIZE, BORDER_WIDTH, FONT_FAMILY, ICON_GAP, LABEL_MAX_WIDTH, LINE_SPACING,
    SHORTCUT_FONT_SIZE,
};
use crate::gui::theme::ThemeColors;
use cairo::{Context, FontSlant, FontWeight};
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use palette::Srgba;
use std::f64::consts::PI;
use wedge::geometry::Point;

fn set_color(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

/// Greedy word wrap: words are appended to the current line while `fits`
/// accepts the result. A single word that never fits gets a line of its own.
pub fn wrap_words(text: &str, fits: impl Fn(&str) -> bool) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }
        let candidate = format!("{line} {word}");
        if fits(&candidate) {
            line = candidate;
        } else {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

struct TextBlock {
    lines: Vec<String>,
    font_size: f64,
    weight: FontWeight,
    color: Srgba<f64>,
}

impl TextBlock {
    fn layout(cr: &Context, text: &str, font_size: f64, weight: FontWeight, color: Srgba<f64>) -> Self {
        cr.select_font_face(FONT_FAMILY, FontSlant::Normal, weight);
        cr.set_font_size(font_size);
        let lines = wrap_words(text, |candidate| {
            cr.text_extents(candidate)
                .map(|ext| ext.width() <= LABEL_MAX_WIDTH)
                .unwrap_or(true)
        });
        Self {
            lines,
            font_size,
            weight,
            color,
        }
    }

    fn line_height(&self) -> f64 {
        self.font_size * LINE_SPACING
    }

    fn height(&self) -> f64 {
        self.lines.len() as f64 * self.line_height()
    }

    /// Draws the block centered on `x` below `top`, returning the new top.
    fn draw(&self, cr: &Context, x: f64, top: f64) -> Result<f64, cairo::Error> {
        cr.select_font_face(FONT_FAMILY, FontSlant::Normal, self.weight);
        cr.set_font_size(self.font_size);
        set_color(cr, self.color);

        let mut baseline = top;
        for line in &self.lines {
            baseline += self.line_height();
            let ext = cr.text_extents(line)?;
            cr.move_to(x - ext.width() / 2.0 - ext.x_bearing(), baseline);
            cr.show_text(line)?;
        }
        Ok(baseline)
    }
}

struct WedgeRenderer<'a> {
    view: &'a MenuView,
    slot: &'a WedgeSlot,
    selected: bool,
}

impl<'a> WedgeRenderer<'a> {
    fn new(view: &'a MenuView, slot: &'a WedgeSlot) -> Self {
        Self {
            view,
            slot,
            selected: view.is_selected(slot.geometry.index),
        }
    }

    fn draw(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        self.draw_sector(cr, colors)?;
        self.draw_content(cr, colors)
    }

    fn draw_sector(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let c = self.view.anchor;
        let ring = &self.view.ring;
        let (start, end) = self.slot.geometry.screen_arc();

        cr.new_path();
        cr.arc(c.x, c.y, ring.outer_radius, start, end);
        cr.arc_negative(c.x, c.y, ring.inner_radius, end, start);
        cr.close_path();

        if self.selected {
            set_color(cr, colors.hovered);
            cr.fill_preserve()?;
            set_color(cr, colors.border);
            cr.set_line_width(BORDER_WIDTH);
            cr.stroke()
        } else {
            set_color(cr, colors.slice);
            cr.fill()
        }
    }

    fn draw_content(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let center = self.view.label_position(self.slot);

        let title = TextBlock::layout(
            cr,
            &self.slot.title,
            ACTION_FONT_SIZE,
            FontWeight::Bold,
            colors.text,
        );
        let shortcut = TextBlock::layout(
            cr,
            &self.slot.shortcut,
            SHORTCUT_FONT_SIZE,
            FontWeight::Normal,
            colors.shortcut,
        );

        let icon_height = self
            .slot
            .icon
            .as_ref()
            .map_or(0.0, |p| p.height() as f64 + ICON_GAP);
        let total = icon_height + title.height() + shortcut.height();
        let top = center.y - total / 2.0;

        if let Some(pixbuf) = &self.slot.icon {
            self.draw_icon(cr, pixbuf, Point::new(center.x, top))?;
        }
        let top = title.draw(cr, center.x, top + icon_height)?;
        shortcut.draw(cr, center.x, top)?;
        Ok(())
    }

    fn draw_icon(&self, cr: &Context, pixbuf: &Pixbuf, top_center: Point) -> Result<(), cairo::Error> {
        let (w, h) = (pixbuf.width() as f64, pixbuf.height() as f64);
        cr.save()?;
        cr.rectangle(top_center.x - w / 2.0, top_center.y, w, h);
        cr.clip();
        cr.set_source_pixbuf(pixbuf, top_center.x - w / 2.0, top_center.y);
        cr.paint()?;
        cr.restore()
    }
}

pub fn draw(cr: &Context, view: &MenuView, colors: &ThemeColors) -> Result<(), cairo::Error> {
    if !view.visible {
        return Ok(());
    }

    for slot in &view.slots {
        WedgeRenderer::new(view, slot).draw(cr, colors)?;
    }
    draw_center_circle(cr, view, colors)
}

fn draw_center_circle(cr: &Context, view: &MenuView, colors: &ThemeColors) -> Result<(), cairo::Error> {
    let color = if view.selection.is_some() {
        colors.center_selected
    } else {
        colors.center
    };
    set_color(cr, color);
    cr.new_path();
    cr.arc(
        view.anchor.x,
        view.anchor.y,
        view.ring.inner_radius,
        0.0,
        2.0 * PI,
    );
    cr.fill()
}
