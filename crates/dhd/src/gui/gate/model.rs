use super::{
    DEFAULT_HEIGHT, DEFAULT_WIDTH, GATE_CENTER_X, GATE_RADIUS, PANEL_LEFT, PANEL_MARGIN,
    TEXT_LINE_HEIGHT, WHEEL_RADIUS,
};
use chevron::input::{self, layout_controls};
use chevron::{Action, Dispatcher, Engine, Intent, Key, Point, PresetBook, WheelLayout};
use std::time::Duration;

/// Where everything sits for a given drawing-area size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
    pub gate_center: Point,
    pub gate_radius: f64,
    pub panel_origin: Point,
    pub panel_width: f64,
    pub wheel_center: Point,
    pub wheel_radius: f64,
    pub controls_origin: Point,
}

impl Layout {
    pub fn compute(width: f64, height: f64) -> Self {
        let gate_center = Point::new(width * GATE_CENTER_X, height / 2.0);
        let gate_radius = (height * GATE_RADIUS)
            .min(gate_center.x - PANEL_MARGIN)
            .max(1.0);

        let panel_origin = Point::new(width * PANEL_LEFT, PANEL_MARGIN);
        let panel_width = (width - panel_origin.x - PANEL_MARGIN).max(1.0);

        // status lines sit above the wheel, buttons below it
        let wheel_radius = (height * WHEEL_RADIUS).min(panel_width / 2.0).max(1.0);
        let text_bottom = panel_origin.y + 3.0 * TEXT_LINE_HEIGHT;
        let wheel_center = Point::new(
            panel_origin.x + panel_width / 2.0,
            text_bottom + PANEL_MARGIN + wheel_radius,
        );
        let controls_origin = Point::new(
            panel_origin.x,
            wheel_center.y + wheel_radius + PANEL_MARGIN,
        );

        Self {
            width,
            height,
            gate_center,
            gate_radius,
            panel_origin,
            panel_width,
            wheel_center,
            wheel_radius,
            controls_origin,
        }
    }

    fn dispatcher(&self, presets: &PresetBook) -> Dispatcher {
        Dispatcher::new(
            WheelLayout::new(self.wheel_center, self.wheel_radius),
            layout_controls(self.controls_origin, self.panel_width, presets),
        )
    }
}

/// Everything the window needs between frames: the engine plus the input geometry built around it.
pub struct Session {
    pub engine: Engine,
    pub dispatcher: Dispatcher,
    pub layout: Layout,
    pub mute: bool,
    origin: Option<Duration>,
}

impl Session {
    pub fn new(presets: PresetBook, mute: bool) -> Self {
        let layout = Layout::compute(DEFAULT_WIDTH as f64, DEFAULT_HEIGHT as f64);
        Self {
            dispatcher: layout.dispatcher(&presets),
            engine: Engine::new(presets),
            layout,
            mute,
            origin: None,
        }
    }

    /// Returns whether the layout changed.
    pub fn resize(&mut self, width: f64, height: f64) -> bool {
        if self.layout.width == width && self.layout.height == height {
            return false;
        }
        self.layout = Layout::compute(width, height);
        self.dispatcher
            .wheel
            .resize(self.layout.wheel_center, self.layout.wheel_radius);
        self.dispatcher.controls = layout_controls(
            self.layout.controls_origin,
            self.layout.panel_width,
            self.engine.presets(),
        );
        true
    }

    pub fn set_presets(&mut self, presets: PresetBook) {
        self.dispatcher.controls = layout_controls(
            self.layout.controls_origin,
            self.layout.panel_width,
            &presets,
        );
        self.engine.set_presets(presets);
    }

    pub fn pointer_moved(&mut self, pointer: Point) -> bool {
        self.dispatcher.pointer_moved(&mut self.engine, pointer)
    }

    pub fn pointer_pressed(&mut self, pointer: Point) -> Option<Action> {
        self.dispatcher.pointer_pressed(&mut self.engine, pointer)
    }

    pub fn key_pressed(&mut self, key: Key) -> Option<Action> {
        self.dispatcher.key_pressed(&mut self.engine, key)
    }

    pub fn remote(&mut self, action: &Action) {
        input::perform(&mut self.engine, action);
    }

    /// Feeds one frame-clock reading to the engine. The first reading becomes time zero.
    pub fn tick(&mut self, frame_time: Duration) {
        let origin = *self.origin.get_or_insert(frame_time);
        self.engine.advance_to(frame_time.saturating_sub(origin));
    }

    pub fn drain_intents(&mut self) -> Vec<Intent> {
        self.engine.drain_intents()
    }
}
