//! Translates pointer and keyboard input into engine commands.

use crate::address::{PresetBook, PresetName, Symbol};
use crate::engine::{Engine, Rejection};
use crate::geometry::{Point, Rect};
use crate::wheel::{WheelHit, WheelLayout};

pub const PRESET_BUTTON_WIDTH: f64 = 116.0;
pub const PRESET_BUTTON_HEIGHT: f64 = 38.0;
pub const CONTROL_BUTTON_HEIGHT: f64 = 54.0;
pub const BUTTON_GAP: f64 = 8.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Glyph(Symbol),
    Dial,
    Back,
    Clear,
    Close,
    Preset(PresetName),
}

impl Action {
    pub fn apply(&self, engine: &mut Engine) -> Result<(), Rejection> {
        match self {
            Action::Glyph(symbol) => engine.append(symbol.index()),
            Action::Dial => engine.start(),
            Action::Back => engine.remove_last(),
            Action::Clear => engine.clear(),
            Action::Close => engine.close(),
            Action::Preset(name) => engine.load_preset(name),
        }
    }
}

/// Keys the dispatcher understands. Hosts map their native key codes onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// The digit row, `1..=9`.
    Digit(u8),
    Enter,
    Backspace,
    Delete,
    Escape,
}

impl Key {
    pub fn action(self) -> Option<Action> {
        match self {
            Key::Digit(d @ 1..=9) => Symbol::new(d as usize - 1).map(Action::Glyph),
            Key::Digit(_) => None,
            Key::Enter => Some(Action::Dial),
            Key::Backspace => Some(Action::Back),
            Key::Delete => Some(Action::Clear),
            Key::Escape => Some(Action::Close),
        }
    }
}

/// A fixed clickable region outside the wheel.
#[derive(Debug, Clone, PartialEq)]
pub struct Control {
    pub rect: Rect,
    pub label: String,
    pub action: Action,
}

impl Control {
    pub fn new(rect: Rect, label: impl Into<String>, action: Action) -> Self {
        Self {
            rect,
            label: label.into(),
            action,
        }
    }
}

/// Preset buttons in rows, then DIAL / BACK / CLEAR, then a full-width CLOSE GATE.
pub fn layout_controls(origin: Point, width: f64, presets: &PresetBook) -> Vec<Control> {
    let per_row =
        (((width + BUTTON_GAP) / (PRESET_BUTTON_WIDTH + BUTTON_GAP)).floor() as usize).max(1);
    let mut controls: Vec<Control> = presets
        .iter()
        .enumerate()
        .map(|(i, preset)| {
            let (row, col) = (i / per_row, i % per_row);
            let rect = Rect::new(
                origin.x + col as f64 * (PRESET_BUTTON_WIDTH + BUTTON_GAP),
                origin.y + row as f64 * (PRESET_BUTTON_HEIGHT + BUTTON_GAP),
                PRESET_BUTTON_WIDTH,
                PRESET_BUTTON_HEIGHT,
            );
            Control::new(rect, preset.name.to_string(), Action::Preset(preset.name.clone()))
        })
        .collect();

    let preset_rows = presets.len().div_ceil(per_row);
    let y = origin.y + preset_rows as f64 * (PRESET_BUTTON_HEIGHT + BUTTON_GAP) + BUTTON_GAP;
    let third = (width - 2.0 * BUTTON_GAP) / 3.0;

    let row = [("DIAL", Action::Dial), ("BACK", Action::Back), ("CLEAR", Action::Clear)];
    controls.extend(row.into_iter().enumerate().map(|(i, (label, action))| {
        let x = origin.x + i as f64 * (third + BUTTON_GAP);
        Control::new(Rect::new(x, y, third, CONTROL_BUTTON_HEIGHT), label, action)
    }));

    controls.push(Control::new(
        Rect::new(
            origin.x,
            y + CONTROL_BUTTON_HEIGHT + BUTTON_GAP,
            width,
            CONTROL_BUTTON_HEIGHT,
        ),
        "CLOSE GATE",
        Action::Close,
    ));
    controls
}

/// Thin mapping from raw input to [`Action`]s. Validation is left to the engine.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    pub wheel: WheelLayout,
    pub controls: Vec<Control>,
}

impl Dispatcher {
    pub fn new(wheel: WheelLayout, controls: Vec<Control>) -> Self {
        Self { wheel, controls }
    }

    pub fn control_at(&self, pointer: Point) -> Option<&Control> {
        self.controls.iter().find(|c| c.rect.contains(pointer))
    }

    pub fn action_at(&self, pointer: Point) -> Option<Action> {
        if let Some(control) = self.control_at(pointer) {
            return Some(control.action.clone());
        }
        match self.wheel.hit_test(pointer)? {
            WheelHit::Symbol(symbol) => Some(Action::Glyph(symbol)),
            WheelHit::Center => Some(Action::Dial),
        }
    }

    /// Updates the highlighted glyph. Returns whether a redraw is needed.
    pub fn pointer_moved(&self, engine: &mut Engine, pointer: Point) -> bool {
        let hovered = match self.wheel.hit_test(pointer) {
            Some(WheelHit::Symbol(symbol)) => Some(symbol),
            _ => None,
        };
        engine.set_hovered(hovered)
    }

    pub fn pointer_pressed(&self, engine: &mut Engine, pointer: Point) -> Option<Action> {
        let action = self.action_at(pointer)?;
        perform(engine, &action);
        Some(action)
    }

    pub fn key_pressed(&self, engine: &mut Engine, key: Key) -> Option<Action> {
        let action = key.action()?;
        perform(engine, &action);
        Some(action)
    }
}

pub fn perform(engine: &mut Engine, action: &Action) {
    if let Err(e) = action.apply(engine) {
        log::debug!("{:?} rejected: {}", action, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Cue, GateState, Intent};

    fn dispatcher() -> Dispatcher {
        let wheel = WheelLayout::new(Point::new(300.0, 300.0), 200.0);
        let controls = layout_controls(Point::new(600.0, 40.0), 500.0, &PresetBook::builtin());
        Dispatcher::new(wheel, controls)
    }

    fn sector_center(dispatcher: &Dispatcher, index: usize) -> Point {
        let sector = dispatcher.wheel.sector(Symbol::new(index).unwrap()).unwrap();
        let dist = (sector.inner_radius + sector.outer_radius) / 2.0;
        let rad = sector.mid_angle().to_radians();
        let c = dispatcher.wheel.center;
        Point::new(c.x + dist * rad.sin(), c.y - dist * rad.cos())
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(Key::Digit(1).action(), Some(Action::Glyph(Symbol::new(0).unwrap())));
        assert_eq!(Key::Digit(9).action(), Some(Action::Glyph(Symbol::new(8).unwrap())));
        assert_eq!(Key::Digit(0).action(), None);
        assert_eq!(Key::Enter.action(), Some(Action::Dial));
        assert_eq!(Key::Backspace.action(), Some(Action::Back));
        assert_eq!(Key::Delete.action(), Some(Action::Clear));
        assert_eq!(Key::Escape.action(), Some(Action::Close));
    }

    #[test]
    fn test_layout_controls() {
        let controls = layout_controls(Point::new(0.0, 0.0), 500.0, &PresetBook::builtin());
        let labels: Vec<&str> = controls.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Abydos",
                "Chulak",
                "Dakara",
                "Earth",
                "DIAL",
                "BACK",
                "CLEAR",
                "CLOSE GATE"
            ]
        );

        for (i, a) in controls.iter().enumerate() {
            for b in &controls[i + 1..] {
                let overlap = a.rect.contains(b.rect.center()) || b.rect.contains(a.rect.center());
                assert!(!overlap, "{} overlaps {}", a.label, b.label);
            }
        }
        assert_eq!(controls.last().unwrap().rect.width, 500.0);
    }

    #[test]
    fn test_layout_wraps_presets() {
        let controls = layout_controls(Point::new(0.0, 0.0), 250.0, &PresetBook::builtin());
        assert_eq!(controls[0].rect.y, controls[1].rect.y);
        assert!(controls[2].rect.y > controls[1].rect.y);
    }

    #[test]
    fn test_click_on_sector_appends() {
        let dispatcher = dispatcher();
        let mut engine = Engine::default();

        for index in [0, 26, 27, 38] {
            let action = dispatcher.pointer_pressed(&mut engine, sector_center(&dispatcher, index));
            assert_eq!(action, Some(Action::Glyph(Symbol::new(index).unwrap())));
        }
        let indices: Vec<usize> = engine.entered().iter().map(Symbol::index).collect();
        assert_eq!(indices, vec![0, 26, 27, 38]);
    }

    #[test]
    fn test_click_on_center_starts_dialing() {
        let dispatcher = dispatcher();
        let mut engine = Engine::default();
        let center = dispatcher.wheel.center;

        assert_eq!(dispatcher.pointer_pressed(&mut engine, center), Some(Action::Dial));
        assert_eq!(engine.state(), GateState::Idle);
        assert!(engine.drain_intents().contains(&Intent::Cue(Cue::Error)));

        let abydos = dispatcher.controls[0].rect.center();
        assert_eq!(
            dispatcher.pointer_pressed(&mut engine, abydos),
            Some(Action::Preset(PresetName::new("Abydos")))
        );
        dispatcher.pointer_pressed(&mut engine, center);
        assert_eq!(engine.state(), GateState::Dialing);
    }

    #[test]
    fn test_click_outside_everything_is_ignored() {
        let dispatcher = dispatcher();
        let mut engine = Engine::default();
        assert_eq!(dispatcher.pointer_pressed(&mut engine, Point::new(5.0, 790.0)), None);
        assert!(engine.drain_intents().is_empty());
    }

    #[test]
    fn test_control_buttons() {
        let dispatcher = dispatcher();
        let mut engine = Engine::default();
        let press = |label: &str| {
            dispatcher
                .controls
                .iter()
                .find(|c| c.label == label)
                .map(|c| c.rect.center())
                .unwrap()
        };

        dispatcher.pointer_pressed(&mut engine, press("Earth"));
        dispatcher.pointer_pressed(&mut engine, press("BACK"));
        assert_eq!(engine.entered().len(), 6);
        dispatcher.pointer_pressed(&mut engine, press("CLEAR"));
        assert!(engine.entered().is_empty());

        dispatcher.pointer_pressed(&mut engine, press("Chulak"));
        dispatcher.pointer_pressed(&mut engine, press("DIAL"));
        assert_eq!(engine.state(), GateState::Dialing);
        dispatcher.pointer_pressed(&mut engine, press("CLOSE GATE"));
        assert_eq!(engine.state(), GateState::Idle);
    }

    #[test]
    fn test_keys_drive_engine() {
        let dispatcher = dispatcher();
        let mut engine = Engine::default();
        for d in 1..=7 {
            dispatcher.key_pressed(&mut engine, Key::Digit(d));
        }
        dispatcher.key_pressed(&mut engine, Key::Backspace);
        assert_eq!(engine.entered().len(), 6);
        dispatcher.key_pressed(&mut engine, Key::Digit(9));
        dispatcher.key_pressed(&mut engine, Key::Enter);
        assert_eq!(engine.state(), GateState::Dialing);
        dispatcher.key_pressed(&mut engine, Key::Escape);
        assert_eq!(engine.state(), GateState::Idle);
        dispatcher.key_pressed(&mut engine, Key::Delete);
        assert!(engine.entered().is_empty());
    }

    #[test]
    fn test_hover_tracks_wheel() {
        let dispatcher = dispatcher();
        let mut engine = Engine::default();

        assert!(dispatcher.pointer_moved(&mut engine, sector_center(&dispatcher, 30)));
        assert_eq!(engine.hovered(), Symbol::new(30));
        assert!(!dispatcher.pointer_moved(&mut engine, sector_center(&dispatcher, 30)));
        assert!(dispatcher.pointer_moved(&mut engine, dispatcher.wheel.center));
        assert_eq!(engine.hovered(), None);
        assert_eq!(engine.state(), GateState::Idle);
        assert!(engine.drain_intents().is_empty());
    }
}
