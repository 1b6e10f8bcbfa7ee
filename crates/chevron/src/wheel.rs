//! Sector table of the DHD wheel and pointer classification against it.

use crate::address::Symbol;
use crate::geometry::{Point, angle_clockwise_from_up, angle_in_span, normalize_degrees};

pub const OUTER_RING_SECTORS: usize = 27;
pub const INNER_RING_SECTORS: usize = 12;

// Band bounds as fractions of the wheel's outer radius.
pub const OUTER_RING_INNER_RATIO: f64 = 0.69;
pub const INNER_RING_OUTER_RATIO: f64 = 0.64;
pub const INNER_RING_INNER_RATIO: f64 = 0.43;
pub const CENTER_RATIO: f64 = 0.30;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sector {
    pub symbol: Symbol,
    pub start_angle: f64,
    pub end_angle: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
}

impl Sector {
    pub fn wraps(&self) -> bool {
        self.start_angle > self.end_angle
    }

    pub fn contains(&self, angle: f64, dist: f64) -> bool {
        dist >= self.inner_radius
            && dist <= self.outer_radius
            && angle_in_span(angle, self.start_angle, self.end_angle)
    }

    /// Clockwise angular width, accounting for wrap.
    pub fn span(&self) -> f64 {
        if self.wraps() {
            360.0 - self.start_angle + self.end_angle
        } else {
            self.end_angle - self.start_angle
        }
    }

    pub fn mid_angle(&self) -> f64 {
        normalize_degrees(self.start_angle + self.span() / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelHit {
    Center,
    Symbol(Symbol),
}

fn ring(
    first_index: usize,
    count: usize,
    offset: f64,
    inner_radius: f64,
    outer_radius: f64,
) -> impl Iterator<Item = Sector> {
    let width = 360.0 / count as f64;
    (0..count).filter_map(move |k| {
        let start_angle = normalize_degrees(offset + k as f64 * width);
        // the last sector closes the ring exactly, whatever width * count rounds to
        let end = if k + 1 == count {
            offset + 360.0
        } else {
            offset + (k + 1) as f64 * width
        };
        // an exact 360 end stays a plain span instead of becoming a wrapping one
        let end_angle = if end == 360.0 { end } else { normalize_degrees(end) };
        Symbol::new(first_index + k).map(|symbol| Sector {
            symbol,
            start_angle,
            end_angle,
            inner_radius,
            outer_radius,
        })
    })
}

/// Lays out the two glyph rings for a wheel of `outer_radius`.
///
/// The outer ring holds symbols 0..27 starting at 0°, the inner ring holds 27..39 offset by half
/// a sector so the wedges of the two rings never line up.
pub fn build_sectors(outer_radius: f64) -> Vec<Sector> {
    let inner_width = 360.0 / INNER_RING_SECTORS as f64;
    ring(
        0,
        OUTER_RING_SECTORS,
        0.0,
        outer_radius * OUTER_RING_INNER_RATIO,
        outer_radius,
    )
    .chain(ring(
        OUTER_RING_SECTORS,
        INNER_RING_SECTORS,
        inner_width / 2.0,
        outer_radius * INNER_RING_INNER_RATIO,
        outer_radius * INNER_RING_OUTER_RATIO,
    ))
    .collect()
}

pub fn hit_test(
    pointer: Point,
    center: Point,
    sectors: &[Sector],
    center_radius: f64,
) -> Option<WheelHit> {
    let dist = pointer.distance_to(center);
    if dist <= center_radius {
        return Some(WheelHit::Center);
    }

    let (dx, dy) = pointer.offset_from(center);
    let angle = angle_clockwise_from_up(dx, dy);

    sectors
        .iter()
        .find(|s| s.contains(angle, dist))
        .map(|s| WheelHit::Symbol(s.symbol))
}

#[derive(Debug, Clone)]
pub struct WheelLayout {
    pub center: Point,
    pub outer_radius: f64,
    pub center_radius: f64,
    pub sectors: Vec<Sector>,
}

impl WheelLayout {
    pub fn new(center: Point, outer_radius: f64) -> Self {
        Self {
            center,
            outer_radius,
            center_radius: outer_radius * CENTER_RATIO,
            sectors: build_sectors(outer_radius),
        }
    }

    pub fn resize(&mut self, center: Point, outer_radius: f64) {
        self.center = center;
        if outer_radius != self.outer_radius {
            *self = Self::new(center, outer_radius);
        }
    }

    pub fn hit_test(&self, pointer: Point) -> Option<WheelHit> {
        hit_test(pointer, self.center, &self.sectors, self.center_radius)
    }

    pub fn sector(&self, symbol: Symbol) -> Option<&Sector> {
        self.sectors.iter().find(|s| s.symbol == symbol)
    }
}
