use crate::{MAX_ADDRESS_LENGTH, MIN_ADDRESS_LENGTH, SYMBOL_COUNT};
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Angular distance between two neighbouring glyphs on the ring.
pub const SYMBOL_ARC: f64 = 360.0 / SYMBOL_COUNT as f64;

const BUILTIN_PRESETS: &[(&str, [u8; 7])] = &[
    ("Abydos", [26, 6, 14, 31, 11, 29, 1]),
    ("Chulak", [8, 1, 22, 14, 36, 19, 4]),
    ("Dakara", [17, 28, 4, 35, 9, 21, 2]),
    ("Earth", [1, 11, 2, 19, 21, 24, 35]),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("address is full ({} symbols max)", MAX_ADDRESS_LENGTH)]
    Full,
    #[error(
        "address has {0} symbols, expected {min}-{max}",
        min = MIN_ADDRESS_LENGTH,
        max = MAX_ADDRESS_LENGTH
    )]
    Length(usize),
    #[error("no symbol with index {0}")]
    UnknownSymbol(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a glyph label (expected S01-S39)")]
pub struct ParseSymbolError(String);

/// One of the 39 glyphs, identified by its position on the ring.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Into,
)]
#[serde(try_from = "usize", into = "u8")]
pub struct Symbol(u8);

impl Symbol {
    pub fn new(index: usize) -> Option<Self> {
        (index < SYMBOL_COUNT).then(|| Self(index as u8))
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// Resting angle of this glyph on an unrotated ring.
    pub fn angle(&self) -> f64 {
        self.index() as f64 * SYMBOL_ARC
    }

    pub fn all() -> impl Iterator<Item = Symbol> {
        (0..SYMBOL_COUNT as u8).map(Symbol)
    }
}

impl TryFrom<usize> for Symbol {
    type Error = AddressError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::new(index).ok_or(AddressError::UnknownSymbol(index))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{:02}", self.0 + 1)
    }
}

impl FromStr for Symbol {
    type Err = ParseSymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        trimmed
            .strip_prefix(&['S', 's'][..])
            .and_then(|digits| digits.parse::<usize>().ok())
            .and_then(|label| label.checked_sub(1))
            .and_then(Symbol::new)
            .ok_or_else(|| ParseSymbolError(trimmed.to_string()))
    }
}

/// An ordered glyph sequence. Duplicates are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref)]
pub struct Address(Vec<Symbol>);

impl Address {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a complete address, checking the dialable length bounds.
    pub fn from_symbols(symbols: Vec<Symbol>) -> Result<Self, AddressError> {
        if !(MIN_ADDRESS_LENGTH..=MAX_ADDRESS_LENGTH).contains(&symbols.len()) {
            return Err(AddressError::Length(symbols.len()));
        }
        Ok(Self(symbols))
    }

    pub fn from_indices(indices: &[usize]) -> Result<Self, AddressError> {
        let symbols = indices
            .iter()
            .map(|&i| Symbol::try_from(i))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_symbols(symbols)
    }

    pub fn push(&mut self, symbol: Symbol) -> Result<(), AddressError> {
        if self.is_full() {
            return Err(AddressError::Full);
        }
        self.0.push(symbol);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<Symbol> {
        self.0.pop()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_full(&self) -> bool {
        self.0.len() >= MAX_ADDRESS_LENGTH
    }

    pub fn is_dialable(&self) -> bool {
        (MIN_ADDRESS_LENGTH..=MAX_ADDRESS_LENGTH).contains(&self.0.len())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<empty>");
        }
        let labels: Vec<String> = self.0.iter().map(Symbol::to_string).collect();
        f.write_str(&labels.join(" "))
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct PresetName(String);

crate::impl_string_newtype!(PresetName);

/// A named, always-dialable address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    pub name: PresetName,
    pub address: Address,
}

impl Preset {
    pub fn new(name: impl Into<String>, symbols: Vec<Symbol>) -> Result<Self, AddressError> {
        Ok(Self {
            name: PresetName::new(name),
            address: Address::from_symbols(symbols)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetBook {
    presets: Vec<Preset>,
}

impl Default for PresetBook {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PresetBook {
    pub fn builtin() -> Self {
        let presets = BUILTIN_PRESETS
            .iter()
            .map(|(name, glyphs)| Preset {
                name: PresetName::new(*name),
                address: Address(glyphs.iter().copied().map(Symbol).collect()),
            })
            .collect();
        Self { presets }
    }

    /// Built-ins followed by `extra`; an extra preset replaces a built-in of the same name.
    pub fn with_extra(extra: impl IntoIterator<Item = Preset>) -> Self {
        let mut book = Self::builtin();
        for preset in extra {
            book.insert(preset);
        }
        book
    }

    pub fn insert(&mut self, preset: Preset) {
        match self.presets.iter_mut().find(|p| p.name.matches(&preset.name)) {
            Some(existing) => *existing = preset,
            None => self.presets.push(preset),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.name.matches(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.presets.iter()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(i: usize) -> Symbol {
        Symbol::new(i).unwrap()
    }

    #[test]
    fn test_symbol_bounds() {
        assert!(Symbol::new(0).is_some());
        assert!(Symbol::new(38).is_some());
        assert!(Symbol::new(39).is_none());
        assert_eq!(Symbol::all().count(), SYMBOL_COUNT);
    }

    #[test]
    fn test_symbol_labels() {
        assert_eq!(sym(0).to_string(), "S01");
        assert_eq!(sym(26).to_string(), "S27");
        assert_eq!(sym(38).to_string(), "S39");

        let cases = vec![
            ("S01", Some(0)),
            ("s27", Some(26)),
            (" S39 ", Some(38)),
            ("S00", None),
            ("S40", None),
            ("27", None),
            ("Sx", None),
        ];
        for (label, expected) in cases {
            let parsed = label.parse::<Symbol>().ok().map(|s| s.index());
            assert_eq!(parsed, expected, "label {label:?}");
        }
    }

    #[test]
    fn test_symbol_angle() {
        assert_eq!(sym(0).angle(), 0.0);
        assert!((sym(13).angle() - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_symbol_deserialization() {
        let symbol: Symbol = serde_json::from_str("26").unwrap();
        assert_eq!(symbol, sym(26));
        assert!(serde_json::from_str::<Symbol>("39").is_err());
    }

    #[test]
    fn test_address_push_stops_at_max() {
        let mut address = Address::new();
        for i in 0..MAX_ADDRESS_LENGTH {
            address.push(sym(i)).unwrap();
        }
        assert_eq!(address.push(sym(20)), Err(AddressError::Full));
        assert_eq!(address.len(), MAX_ADDRESS_LENGTH);
    }

    #[test]
    fn test_address_allows_duplicates() {
        let address = Address::from_indices(&[3, 3, 3, 3, 3, 3, 3]).unwrap();
        assert_eq!(address.len(), 7);
        assert!(address.is_dialable());
    }

    #[test]
    fn test_address_length_validation() {
        assert_eq!(
            Address::from_indices(&[1, 2, 3, 4, 5, 6]),
            Err(AddressError::Length(6))
        );
        assert_eq!(
            Address::from_indices(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]),
            Err(AddressError::Length(10))
        );
        assert_eq!(
            Address::from_indices(&[1, 2, 3, 4, 5, 6, 39]),
            Err(AddressError::UnknownSymbol(39))
        );
    }

    #[test]
    fn test_address_display() {
        assert_eq!(Address::new().to_string(), "<empty>");
        let address = Address::from_indices(&[26, 6, 14, 31, 11, 29, 1]).unwrap();
        assert_eq!(address.to_string(), "S27 S07 S15 S32 S12 S30 S02");
    }

    #[test]
    fn test_builtin_presets_are_dialable() {
        let book = PresetBook::builtin();
        assert_eq!(book.len(), 4);
        assert!(book.iter().all(|p| p.address.is_dialable()));

        let abydos = book.get("abydos").unwrap();
        let indices: Vec<usize> = abydos.address.iter().map(Symbol::index).collect();
        assert_eq!(indices, vec![26, 6, 14, 31, 11, 29, 1]);
    }

    #[test]
    fn test_preset_book_extra_replaces_by_name() {
        let custom = Preset::new("EARTH", (0..9).map(sym).collect()).unwrap();
        let extra = Preset::new("P3X-888", (10..17).map(sym).collect()).unwrap();
        let book = PresetBook::with_extra([custom, extra]);

        assert_eq!(book.len(), 5);
        assert_eq!(book.get("Earth").unwrap().address.len(), 9);
        assert!(book.get("p3x-888").is_some());
        assert!(book.get("Tollana").is_none());
    }
}
