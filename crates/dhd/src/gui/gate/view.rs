use super::model::{Layout, Session};
use super::{
    CHEVRON_COUNT, CHEVRON_SIZE, GLYPH_MARKER_RADIUS, SPARKLE_COUNT, TEXT_LINE_HEIGHT,
    WORMHOLE_LAYERS,
};
use crate::gui::theme::ThemeColors;
use cairo::Context;
use chevron::engine::{Snapshot, TOP_ANGLE};
use chevron::{Control, GateState, Point, Sector, Symbol, WheelLayout};
use palette::Srgba;
use std::f64::consts::PI;

fn set_color(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

fn fill_circle(
    cr: &Context,
    center: Point,
    radius: f64,
    color: Srgba<f64>,
) -> Result<(), cairo::Error> {
    set_color(cr, color);
    cr.new_path();
    cr.arc(center.x, center.y, radius, 0.0, 2.0 * PI);
    cr.fill()
}

/// Converts a clockwise-from-up wheel angle into cairo's clockwise-from-east radians.
fn wheel_radians(deg: f64) -> f64 {
    (deg - 90.0).to_radians()
}

fn show_text_centered(
    cr: &Context,
    text: &str,
    at: Point,
    size: f64,
    color: Srgba<f64>,
) -> Result<(), cairo::Error> {
    set_color(cr, color);
    cr.select_font_face("Monospace", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
    cr.set_font_size(size);
    let ext = cr.text_extents(text)?;
    cr.move_to(
        at.x - ext.width() / 2.0 - ext.x_bearing(),
        at.y - ext.height() / 2.0 - ext.y_bearing(),
    );
    cr.show_text(text)
}

fn show_text(
    cr: &Context,
    text: &str,
    at: Point,
    size: f64,
    color: Srgba<f64>,
) -> Result<(), cairo::Error> {
    set_color(cr, color);
    cr.select_font_face("Monospace", cairo::FontSlant::Normal, cairo::FontWeight::Normal);
    cr.set_font_size(size);
    cr.move_to(at.x, at.y);
    cr.show_text(text)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectorState {
    Hovered,
    Entered,
    Idle,
}

impl SectorState {
    /// Hover wins over membership in the entered address.
    fn resolve(symbol: Symbol, snapshot: &Snapshot<'_>) -> Self {
        if snapshot.hovered == Some(symbol) {
            Self::Hovered
        } else if snapshot.entered.contains(&symbol) {
            Self::Entered
        } else {
            Self::Idle
        }
    }

    fn color(&self, colors: &ThemeColors) -> Srgba<f64> {
        match self {
            Self::Hovered => colors.sector_hovered,
            Self::Entered => colors.sector_entered,
            Self::Idle => colors.sector,
        }
    }
}

struct SectorRenderer<'a> {
    sector: &'a Sector,
    center: Point,
    state: SectorState,
}

impl<'a> SectorRenderer<'a> {
    fn new(sector: &'a Sector, center: Point, snapshot: &Snapshot<'_>) -> Self {
        Self {
            sector,
            center,
            state: SectorState::resolve(sector.symbol, snapshot),
        }
    }

    fn draw(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        self.draw_wedge(cr, colors)?;
        self.draw_label(cr, colors)
    }

    fn wedge_path(&self, cr: &Context) {
        let s = self.sector;
        let end = if s.wraps() { s.end_angle + 360.0 } else { s.end_angle };
        let (start, end) = (wheel_radians(s.start_angle), wheel_radians(end));
        cr.new_path();
        cr.arc(self.center.x, self.center.y, s.outer_radius, start, end);
        cr.arc_negative(self.center.x, self.center.y, s.inner_radius, end, start);
        cr.close_path();
    }

    fn draw_wedge(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        self.wedge_path(cr);
        set_color(cr, self.state.color(colors));
        cr.fill_preserve()?;
        set_color(cr, colors.sector_outline);
        cr.set_line_width(2.0);
        cr.stroke()
    }

    fn draw_label(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let s = self.sector;
        let band = s.outer_radius - s.inner_radius;
        let dist = s.inner_radius + band / 2.0;
        let rad = wheel_radians(s.mid_angle());
        let at = Point::new(
            self.center.x + dist * rad.cos(),
            self.center.y + dist * rad.sin(),
        );
        show_text_centered(cr, &s.symbol.to_string(), at, band * 0.22, colors.text)
    }
}

fn draw_wheel(
    cr: &Context,
    wheel: &WheelLayout,
    snapshot: &Snapshot<'_>,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    for sector in &wheel.sectors {
        SectorRenderer::new(sector, wheel.center, snapshot).draw(cr, colors)?;
    }
    fill_circle(cr, wheel.center, wheel.center_radius, colors.dial_button)?;
    show_text_centered(
        cr,
        "DIAL",
        wheel.center,
        wheel.center_radius * 0.4,
        colors.text,
    )
}

fn draw_chevrons(
    cr: &Context,
    center: Point,
    radius: f64,
    locked: usize,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    for i in 0..CHEVRON_COUNT {
        let rad = (TOP_ANGLE + i as f64 * 360.0 / CHEVRON_COUNT as f64).to_radians();
        let (x, y) = (center.x + rad.cos() * radius, center.y + rad.sin() * radius);

        cr.save()?;
        cr.translate(x, y);
        // point the tip at the gate center
        cr.rotate(rad + PI / 2.0);
        cr.new_path();
        cr.move_to(0.0, CHEVRON_SIZE);
        cr.line_to(-CHEVRON_SIZE, -CHEVRON_SIZE * 0.8);
        cr.line_to(CHEVRON_SIZE, -CHEVRON_SIZE * 0.8);
        cr.close_path();
        set_color(
            cr,
            if i < locked {
                colors.chevron_lit
            } else {
                colors.chevron_dim
            },
        );
        cr.fill()?;
        cr.restore()?;
    }
    Ok(())
}

fn draw_wormhole(
    cr: &Context,
    center: Point,
    radius: f64,
    time: f64,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let base = colors.wormhole;
    for layer in 0..WORMHOLE_LAYERS {
        let warp = (time * 2.2 + layer as f64 * 0.8).sin() * radius * 0.04;
        let r = radius * (1.0 - layer as f64 * 0.09) + warp;
        if r <= 1.0 {
            continue;
        }
        let lift = layer as f64 * 0.04;
        let color = Srgba::new(
            (base.red + lift).min(1.0),
            (base.green + lift).min(1.0),
            (base.blue + lift).min(1.0),
            base.alpha,
        );
        fill_circle(cr, center, r, color)?;
    }

    for i in 0..SPARKLE_COUNT {
        let a = i as f64 * (2.0 * PI / SPARKLE_COUNT as f64) + time * 0.8;
        let dist = radius * 0.8 * (0.3 + 0.7 * ((i % 5) as f64 / 4.0));
        let at = Point::new(center.x + a.cos() * dist, center.y + a.sin() * dist);
        fill_circle(cr, at, 2.0, Srgba::new(0.75, 0.91, 1.0, 0.9))?;
    }
    Ok(())
}

fn draw_gate(
    cr: &Context,
    layout: &Layout,
    snapshot: &Snapshot<'_>,
    time: f64,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let center = layout.gate_center;
    let r = layout.gate_radius;
    let ring_radius = r * 0.85;

    fill_circle(cr, center, r, colors.gate_frame)?;

    set_color(cr, colors.gate_ring);
    cr.set_line_width(r * 0.1);
    cr.new_path();
    cr.arc(center.x, center.y, ring_radius, 0.0, 2.0 * PI);
    cr.stroke()?;

    fill_circle(cr, center, r * 0.68, colors.background)?;

    // the stored angle is unwrapped; only the drawn one is reduced
    let ring_angle = snapshot.display_angle();
    for symbol in Symbol::all() {
        let rad = (symbol.angle() + ring_angle).to_radians();
        let at = Point::new(
            center.x + rad.cos() * ring_radius,
            center.y + rad.sin() * ring_radius,
        );
        fill_circle(cr, at, GLYPH_MARKER_RADIUS, colors.gate_glyph)?;
    }

    draw_chevrons(cr, center, r * 0.95, snapshot.locked_count, colors)?;

    if matches!(snapshot.state, GateState::Opening | GateState::Connected) {
        draw_wormhole(cr, center, r * 0.66, time, colors)?;
    }
    Ok(())
}

fn draw_controls(
    cr: &Context,
    controls: &[Control],
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    for control in controls {
        let r = control.rect;
        cr.new_path();
        cr.rectangle(r.x, r.y, r.width, r.height);
        set_color(cr, colors.control);
        cr.fill_preserve()?;
        set_color(cr, colors.sector_outline);
        cr.set_line_width(2.0);
        cr.stroke()?;
        show_text_centered(cr, &control.label, r.center(), 16.0, colors.text)?;
    }
    Ok(())
}

fn draw_panel_text(
    cr: &Context,
    layout: &Layout,
    snapshot: &Snapshot<'_>,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let x = layout.panel_origin.x;
    let line = |n: f64| Point::new(x, layout.panel_origin.y + n * TEXT_LINE_HEIGHT);

    show_text(cr, "DIALING COMPUTER + DHD", line(1.0), 22.0, colors.text)?;
    show_text(
        cr,
        &format!("Address: {}", snapshot.entered),
        line(2.0),
        18.0,
        colors.chevron_lit,
    )?;
    show_text(
        cr,
        &format!("Status: {}", snapshot.status),
        line(3.0),
        15.0,
        colors.status_text,
    )
}

pub fn draw(cr: &Context, session: &Session, colors: &ThemeColors) -> Result<(), cairo::Error> {
    let snapshot = session.engine.snapshot();
    let time = session.engine.now().as_secs_f64();

    set_color(cr, colors.background);
    cr.paint()?;

    draw_gate(cr, &session.layout, &snapshot, time, colors)?;
    draw_wheel(cr, &session.dispatcher.wheel, &snapshot, colors)?;
    draw_controls(cr, &session.dispatcher.controls, colors)?;
    draw_panel_text(cr, &session.layout, &snapshot, colors)
}
