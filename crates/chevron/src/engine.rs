//! The dialing state machine.
//!
//! The engine owns the composed address, the snapshot being dialed and the ring kinematics. It
//! never reads a clock of its own: the host calls [`Engine::advance`] once per frame with the
//! elapsed time, and every deadline is an absolute point on that injected timeline.

use crate::address::{Address, AddressError, PresetBook, PresetName, Symbol};
use crate::{MAX_ADDRESS_LENGTH, MIN_ADDRESS_LENGTH};
use std::fmt;
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumIter, IntoStaticStr};
use thiserror::Error;

/// Ring orientation that puts a glyph under the top chevron.
pub const TOP_ANGLE: f64 = -90.0;
/// Degrees per second.
pub const BASE_SPEED: f64 = 150.0;
pub const STEP_SPEED_INCREMENT: f64 = 20.0;
pub const SPEED_CAP: f64 = 120.0;
pub const CHEVRON_ACTUATE_MS: u64 = 380;
pub const OPEN_DURATION_MS: u64 = 1100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, StrumDisplay, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum GateState {
    #[default]
    Idle,
    Dialing,
    Opening,
    Connected,
}

/// Sub-phase of [`GateState::Dialing`]; `Idle` in every other state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum DialPhase {
    #[default]
    Idle,
    Spinning,
    Actuating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum Cue {
    Press,
    Engage,
    RingLoopStart,
    RingLoopStop,
    Lock,
    Error,
    Close,
    Kawoosh,
    Connected,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Gate busy ({0}); command ignored.")]
    Busy(GateState),
    #[error("Address full (max {} symbols).", MAX_ADDRESS_LENGTH)]
    AddressFull,
    #[error("Unknown symbol {0}.")]
    UnknownSymbol(usize),
    #[error("Need at least {} symbols to dial.", MIN_ADDRESS_LENGTH)]
    TooShort(usize),
    #[error("Address too long (max {} symbols).", MAX_ADDRESS_LENGTH)]
    TooLong(usize),
    #[error("Unknown preset '{0}'.")]
    UnknownPreset(String),
}

impl From<AddressError> for Rejection {
    fn from(err: AddressError) -> Self {
        match err {
            AddressError::Full => Rejection::AddressFull,
            AddressError::UnknownSymbol(i) => Rejection::UnknownSymbol(i),
            AddressError::Length(len) if len < MIN_ADDRESS_LENGTH => Rejection::TooShort(len),
            AddressError::Length(len) => Rejection::TooLong(len),
        }
    }
}

/// The human-readable status line.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Ready,
    Selected(usize),
    PresetLoaded(PresetName),
    Rejected(Rejection),
    DialingStep {
        step: usize,
        total: usize,
        symbol: Symbol,
    },
    Encoding(usize),
    ChevronLocked {
        locked: usize,
        total: usize,
    },
    Opening,
    Established,
    Active(Duration),
    Closed,
    AlreadyIdle,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ready => write!(
                f,
                "Idle. Select {MIN_ADDRESS_LENGTH}-{MAX_ADDRESS_LENGTH} symbols then press DIAL."
            ),
            Status::Selected(n) => write!(f, "Selected {n} symbols."),
            Status::PresetLoaded(name) => write!(f, "Loaded preset: {name}."),
            Status::Rejected(r) => write!(f, "{r}"),
            Status::DialingStep {
                step,
                total,
                symbol,
            } => write!(f, "Dialing symbol {step}/{total}: {symbol}."),
            Status::Encoding(k) => write!(f, "Encoding chevron {k}..."),
            Status::ChevronLocked { locked, total } => {
                write!(f, "Chevron {locked} locked of {total}.")
            }
            Status::Opening => f.write_str("Chevron lock complete. Opening wormhole..."),
            Status::Established => f.write_str("Wormhole established. Gate is active."),
            Status::Active(elapsed) => {
                write!(f, "Wormhole active for {:04.1}s.", elapsed.as_secs_f64())
            }
            Status::Closed => f.write_str("Gate closed."),
            Status::AlreadyIdle => f.write_str("Gate already idle."),
        }
    }
}

/// Something the presentation layer should react to.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Cue(Cue),
    Status(Status),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumIter)]
pub enum Command {
    Append,
    RemoveLast,
    Clear,
    LoadPreset,
    Start,
    Close,
}

impl Command {
    pub fn permitted_in(self, state: GateState) -> bool {
        match self {
            Command::Close => true,
            Command::Append
            | Command::RemoveLast
            | Command::Clear
            | Command::LoadPreset
            | Command::Start => state == GateState::Idle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinDirection {
    Clockwise,
    CounterClockwise,
}

impl SpinDirection {
    /// Even steps spin clockwise, odd steps counter-clockwise.
    pub fn for_step(step: usize) -> Self {
        if step % 2 == 0 {
            SpinDirection::Clockwise
        } else {
            SpinDirection::CounterClockwise
        }
    }
}

/// Unwrapped destination for a spin leg starting at `from`.
///
/// Always at least one full turn past the shortest arc in `direction`, so a glyph that is
/// already in place still gets a visible revolution.
pub fn spin_target(from: f64, desired: f64, direction: SpinDirection) -> f64 {
    match direction {
        SpinDirection::Clockwise => from + (desired - from).rem_euclid(360.0) + 360.0,
        SpinDirection::CounterClockwise => from - (from - desired).rem_euclid(360.0) - 360.0,
    }
}

pub fn step_speed(step: usize) -> f64 {
    BASE_SPEED + SPEED_CAP.min(step as f64 * STEP_SPEED_INCREMENT)
}

/// Read-only view handed to the renderer each frame.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub state: GateState,
    pub phase: DialPhase,
    /// Unwrapped; see [`Snapshot::display_angle`].
    pub ring_angle: f64,
    pub locked_count: usize,
    pub current: &'a Address,
    pub entered: &'a Address,
    pub hovered: Option<Symbol>,
    pub status: &'a Status,
}

impl Snapshot<'_> {
    pub fn display_angle(&self) -> f64 {
        crate::geometry::normalize_degrees(self.ring_angle)
    }
}

#[derive(Debug)]
pub struct Engine {
    state: GateState,
    phase: DialPhase,
    entered: Address,
    current: Address,
    locked_count: usize,
    step_index: usize,
    ring_angle: f64,
    ring_target_angle: f64,
    ring_speed: f64,
    clock: Duration,
    deadline: Option<Duration>,
    connected_since: Option<Duration>,
    hovered: Option<Symbol>,
    status: Status,
    presets: PresetBook,
    intents: Vec<Intent>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(PresetBook::builtin())
    }
}

impl Engine {
    pub fn new(presets: PresetBook) -> Self {
        Self {
            state: GateState::Idle,
            phase: DialPhase::Idle,
            entered: Address::new(),
            current: Address::new(),
            locked_count: 0,
            step_index: 0,
            ring_angle: 0.0,
            ring_target_angle: 0.0,
            ring_speed: BASE_SPEED,
            clock: Duration::ZERO,
            deadline: None,
            connected_since: None,
            hovered: None,
            status: Status::Ready,
            presets,
            intents: Vec::new(),
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn phase(&self) -> DialPhase {
        self.phase
    }

    pub fn entered(&self) -> &Address {
        &self.entered
    }

    pub fn current(&self) -> &Address {
        &self.current
    }

    pub fn locked_count(&self) -> usize {
        self.locked_count
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn ring_angle(&self) -> f64 {
        self.ring_angle
    }

    pub fn ring_target_angle(&self) -> f64 {
        self.ring_target_angle
    }

    pub fn ring_speed(&self) -> f64 {
        self.ring_speed
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn now(&self) -> Duration {
        self.clock
    }

    pub fn presets(&self) -> &PresetBook {
        &self.presets
    }

    pub fn set_presets(&mut self, presets: PresetBook) {
        self.presets = presets;
    }

    pub fn hovered(&self) -> Option<Symbol> {
        self.hovered
    }

    /// Returns whether the highlighted glyph changed.
    pub fn set_hovered(&mut self, symbol: Option<Symbol>) -> bool {
        let changed = self.hovered != symbol;
        self.hovered = symbol;
        changed
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            state: self.state,
            phase: self.phase,
            ring_angle: self.ring_angle,
            locked_count: self.locked_count,
            current: &self.current,
            entered: &self.entered,
            hovered: self.hovered,
            status: &self.status,
        }
    }

    /// Hands over every intent emitted since the last call.
    pub fn drain_intents(&mut self) -> Vec<Intent> {
        std::mem::take(&mut self.intents)
    }

    fn emit(&mut self, cue: Cue) {
        self.intents.push(Intent::Cue(cue));
    }

    fn set_status(&mut self, status: Status) {
        self.status = status.clone();
        self.intents.push(Intent::Status(status));
    }

    fn reject(&mut self, rejection: Rejection) -> Result<(), Rejection> {
        log::debug!("rejected in {}: {}", self.state, rejection);
        self.emit(Cue::Error);
        self.set_status(Status::Rejected(rejection.clone()));
        Err(rejection)
    }

    fn admit(&mut self, command: Command) -> Result<(), Rejection> {
        if command.permitted_in(self.state) {
            Ok(())
        } else {
            self.reject(Rejection::Busy(self.state))
        }
    }

    fn selection_changed(&mut self) {
        self.emit(Cue::Press);
        self.set_status(Status::Selected(self.entered.len()));
    }

    pub fn append(&mut self, index: usize) -> Result<(), Rejection> {
        self.admit(Command::Append)?;
        let pushed = Symbol::try_from(index).and_then(|symbol| self.entered.push(symbol));
        match pushed {
            Ok(()) => {
                self.selection_changed();
                Ok(())
            }
            Err(err) => self.reject(err.into()),
        }
    }

    pub fn remove_last(&mut self) -> Result<(), Rejection> {
        self.admit(Command::RemoveLast)?;
        if self.entered.pop().is_some() {
            self.selection_changed();
        }
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), Rejection> {
        self.admit(Command::Clear)?;
        self.entered.clear();
        self.selection_changed();
        Ok(())
    }

    pub fn load_preset(&mut self, name: &str) -> Result<(), Rejection> {
        self.admit(Command::LoadPreset)?;
        let Some(preset) = self.presets.get(name).cloned() else {
            return self.reject(Rejection::UnknownPreset(name.to_string()));
        };
        self.entered = preset.address;
        self.emit(Cue::Press);
        self.set_status(Status::PresetLoaded(preset.name));
        Ok(())
    }

    pub fn start(&mut self) -> Result<(), Rejection> {
        self.admit(Command::Start)?;
        let len = self.entered.len();
        if len < MIN_ADDRESS_LENGTH {
            return self.reject(Rejection::TooShort(len));
        }
        if len > MAX_ADDRESS_LENGTH {
            return self.reject(Rejection::TooLong(len));
        }

        log::info!("dialing {}", self.entered);
        self.current = self.entered.clone();
        self.locked_count = 0;
        self.step_index = 0;
        self.state = GateState::Dialing;
        self.emit(Cue::Engage);
        self.emit(Cue::RingLoopStart);
        self.begin_step(0);
        Ok(())
    }

    /// Aborts any episode and returns to `Idle`. Closing an idle gate only reports it.
    pub fn close(&mut self) -> Result<(), Rejection> {
        self.admit(Command::Close)?;
        if self.state == GateState::Idle {
            self.set_status(Status::AlreadyIdle);
            return Ok(());
        }

        log::info!("closing gate from {}", self.state);
        if self.state == GateState::Dialing {
            self.emit(Cue::RingLoopStop);
        }
        self.emit(Cue::Close);
        self.reset();
        self.set_status(Status::Closed);
        Ok(())
    }

    fn reset(&mut self) {
        self.state = GateState::Idle;
        self.phase = DialPhase::Idle;
        self.entered.clear();
        self.current.clear();
        self.locked_count = 0;
        self.step_index = 0;
        self.ring_angle = 0.0;
        self.ring_target_angle = 0.0;
        self.ring_speed = BASE_SPEED;
        self.deadline = None;
        self.connected_since = None;
    }

    fn begin_step(&mut self, step: usize) {
        let Some(symbol) = self.current.get(step).copied() else {
            return;
        };
        let desired = TOP_ANGLE - symbol.angle();
        let direction = SpinDirection::for_step(step);

        self.ring_target_angle = spin_target(self.ring_angle, desired, direction);
        self.ring_speed = step_speed(step);
        self.phase = DialPhase::Spinning;
        log::debug!(
            "step {} -> {} ({:?}, {:.1} to {:.1} at {:.0}/s)",
            step,
            symbol,
            direction,
            self.ring_angle,
            self.ring_target_angle,
            self.ring_speed
        );
        self.set_status(Status::DialingStep {
            step: step + 1,
            total: self.current.len(),
            symbol,
        });
    }

    /// Advances the simulation by one frame of `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.advance_to(self.clock + dt);
    }

    /// Advances to the absolute frame time `now`. Time never runs backwards.
    pub fn advance_to(&mut self, now: Duration) {
        let dt = now.saturating_sub(self.clock);
        self.clock = self.clock.max(now);

        match (self.state, self.phase) {
            (GateState::Dialing, DialPhase::Spinning) => self.spin(dt.as_secs_f64()),
            (GateState::Dialing, DialPhase::Actuating) => self.actuate(),
            (GateState::Opening, _) => self.open(),
            (GateState::Connected, _) => {
                let since = self.connected_since.unwrap_or(self.clock);
                self.status = Status::Active(self.clock.saturating_sub(since));
            }
            _ => {}
        }
    }

    fn deadline_reached(&self) -> bool {
        self.deadline.is_some_and(|at| self.clock >= at)
    }

    fn spin(&mut self, dt: f64) {
        let remaining = self.ring_target_angle - self.ring_angle;
        let step = self.ring_speed * dt;

        if remaining.abs() <= step {
            self.ring_angle = self.ring_target_angle;
            self.phase = DialPhase::Actuating;
            self.deadline = Some(self.clock + Duration::from_millis(CHEVRON_ACTUATE_MS));
            self.set_status(Status::Encoding(self.locked_count + 1));
        } else {
            self.ring_angle += step.copysign(remaining);
        }
    }

    fn actuate(&mut self) {
        if !self.deadline_reached() {
            return;
        }

        self.locked_count += 1;
        let total = self.current.len();
        self.emit(Cue::Lock);
        self.set_status(Status::ChevronLocked {
            locked: self.locked_count,
            total,
        });

        if self.locked_count == total {
            log::debug!("all {} chevrons locked", total);
            self.state = GateState::Opening;
            self.phase = DialPhase::Idle;
            self.deadline = Some(self.clock + Duration::from_millis(OPEN_DURATION_MS));
            self.emit(Cue::RingLoopStop);
            self.emit(Cue::Kawoosh);
            self.set_status(Status::Opening);
        } else {
            self.step_index += 1;
            self.begin_step(self.step_index);
        }
    }

    fn open(&mut self) {
        if !self.deadline_reached() {
            return;
        }
        log::info!("wormhole established to {}", self.current);
        self.state = GateState::Connected;
        self.deadline = None;
        self.connected_since = Some(self.clock);
        self.emit(Cue::Connected);
        self.set_status(Status::Established);
    }
}
