pub mod model;
pub mod view;

pub use model::{Layout, Session};
pub use view::draw;

pub const DEFAULT_WIDTH: i32 = 1280;
pub const DEFAULT_HEIGHT: i32 = 800;
pub const CHEVRON_COUNT: usize = 9;
pub const GLYPH_MARKER_RADIUS: f64 = 4.0;
pub const CHEVRON_SIZE: f64 = 12.0;
pub const WORMHOLE_LAYERS: usize = 9;
pub const SPARKLE_COUNT: usize = 36;
pub const TEXT_LINE_HEIGHT: f64 = 26.0;
pub const PANEL_MARGIN: f64 = 24.0;

// Layout fractions of the drawing area.
pub const GATE_CENTER_X: f64 = 0.28;
pub const GATE_RADIUS: f64 = 0.34; // of height
pub const PANEL_LEFT: f64 = 0.56;
pub const WHEEL_RADIUS: f64 = 0.24; // of height
