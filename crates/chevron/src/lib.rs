pub mod address;
pub mod engine;
pub mod geometry;
pub mod input;
pub mod macros;
pub mod remote;
pub mod wheel;

pub use address::{Address, AddressError, Preset, PresetBook, PresetName, Symbol};
pub use engine::{Cue, DialPhase, Engine, GateState, Intent, Rejection, Snapshot, Status};
pub use geometry::Point;
pub use input::{Action, Control, Dispatcher, Key};
pub use wheel::{Sector, WheelHit, WheelLayout};

pub const SYMBOL_COUNT: usize = 39;
pub const MIN_ADDRESS_LENGTH: usize = 7;
pub const MAX_ADDRESS_LENGTH: usize = 9;
