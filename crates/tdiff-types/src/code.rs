use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

bitflags! {
    /// Classification of how one compared position differs.
    ///
    /// Three orthogonal fields share a single byte:
    ///
    /// - bits 0-1: change type (`NO_CHANGE`, `ADDITION`, `DELETION`, `CHANGE`)
    /// - bits 2-3: direction, three-way only (`LEFT`, `RIGHT`, `CONFLICTING`)
    /// - bit 4: `PSEUDO_CONFLICT`, set when the two disputed sides are
    ///   byte-identical to each other
    ///
    /// The numeric layout is stable and is what gets serialized.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct ChangeCode: u8 {
        const NO_CHANGE = 0;
        const ADDITION = 1;
        const DELETION = 2;
        const CHANGE = 3;
        const CHANGE_TYPE_MASK = 3;

        const LEFT = 4;
        const RIGHT = 8;
        const CONFLICTING = 12;
        const DIRECTION_MASK = 12;

        const PSEUDO_CONFLICT = 16;
    }
}

impl ChangeCode {
    /// Build a code from its fields.
    pub fn from_parts(kind: ChangeKind, direction: Direction, pseudo_conflict: bool) -> Self {
        let mut code = Self::from_bits_retain(kind.bits() | direction.bits());
        if pseudo_conflict {
            code |= Self::PSEUDO_CONFLICT;
        }
        code
    }

    /// The change-type field.
    pub fn kind(self) -> ChangeKind {
        ChangeKind::from_bits(self.bits())
    }

    /// The direction field. Always [`Direction::None`] for two-way results.
    pub fn direction(self) -> Direction {
        Direction::from_bits(self.bits())
    }

    /// Returns `true` if the change type is `NO_CHANGE`.
    pub fn is_unchanged(self) -> bool {
        self.kind() == ChangeKind::NoChange
    }

    /// Returns `true` if both sides changed the position.
    pub fn is_conflict(self) -> bool {
        self.direction() == Direction::Conflicting
    }

    pub fn is_pseudo_conflict(self) -> bool {
        self.contains(Self::PSEUDO_CONFLICT)
    }

    /// The bits a container inherits from this code when it belongs to a
    /// changed child: `CHANGE` plus the child's direction. The
    /// pseudo-conflict bit never travels upward.
    pub fn propagated(self) -> Self {
        if self.is_unchanged() {
            return Self::NO_CHANGE;
        }
        Self::CHANGE | (self & Self::DIRECTION_MASK)
    }
}

impl Default for ChangeCode {
    fn default() -> Self {
        Self::NO_CHANGE
    }
}

impl fmt::Debug for ChangeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChangeCode({:#04x}: {})", self.bits(), self)
    }
}

impl fmt::Display for ChangeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unchanged() {
            return f.write_str("unchanged");
        }
        if let Some(direction) = self.direction().label() {
            write!(f, "{direction} ")?;
        }
        f.write_str(self.kind().label())?;
        if self.is_pseudo_conflict() {
            f.write_str(" (pseudo)")?;
        }
        Ok(())
    }
}

impl FromStr for ChangeCode {
    type Err = TypeError;

    /// Accepts the `Display` form (`"right change"`, `"conflicting addition
    /// (pseudo)"`, `"unchanged"`) or flag names joined by `|`
    /// (`"LEFT | DELETION"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.contains('|') || trimmed.chars().any(|c| c.is_ascii_uppercase()) {
            return bitflags::parser::from_str::<Self>(trimmed)
                .map_err(|e| TypeError::InvalidCode(format!("{trimmed}: {e}")));
        }
        if trimmed == "unchanged" {
            return Ok(Self::NO_CHANGE);
        }

        let (body, pseudo) = match trimmed.strip_suffix("(pseudo)") {
            Some(rest) => (rest.trim_end(), true),
            None => (trimmed, false),
        };
        let words: Vec<&str> = body.split_whitespace().collect();
        let parsed = match words.as_slice() {
            [kind] => ChangeKind::from_label(kind).map(|kind| (Direction::None, kind)),
            [direction, kind] => Direction::from_label(direction).zip(ChangeKind::from_label(kind)),
            _ => None,
        };
        let (direction, kind) = parsed.ok_or_else(|| TypeError::InvalidCode(trimmed.to_string()))?;

        Ok(Self::from_parts(kind, direction, pseudo))
    }
}

impl Serialize for ChangeCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> Deserialize<'de> for ChangeCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u8::deserialize(deserializer)?;
        Self::from_bits(bits).ok_or_else(|| {
            serde::de::Error::custom(TypeError::UnknownBits(bits))
        })
    }
}

// ---------------------------------------------------------------------------
// ChangeKind
// ---------------------------------------------------------------------------

/// The change-type field of a [`ChangeCode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    NoChange,
    Addition,
    Deletion,
    Change,
}

impl ChangeKind {
    fn from_bits(bits: u8) -> Self {
        match bits & ChangeCode::CHANGE_TYPE_MASK.bits() {
            0 => Self::NoChange,
            1 => Self::Addition,
            2 => Self::Deletion,
            _ => Self::Change,
        }
    }

    fn bits(self) -> u8 {
        match self {
            Self::NoChange => 0,
            Self::Addition => 1,
            Self::Deletion => 2,
            Self::Change => 3,
        }
    }

    /// Lowercase label used in the textual form of a code.
    pub fn label(self) -> &'static str {
        match self {
            Self::NoChange => "unchanged",
            Self::Addition => "addition",
            Self::Deletion => "deletion",
            Self::Change => "change",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        match label {
            "addition" => Some(Self::Addition),
            "deletion" => Some(Self::Deletion),
            "change" => Some(Self::Change),
            _ => None,
        }
    }
}

impl From<ChangeKind> for ChangeCode {
    fn from(kind: ChangeKind) -> Self {
        Self::from_bits_retain(kind.bits())
    }
}

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// The direction field of a [`ChangeCode`]: which side(s) of a three-way
/// comparison departed from the ancestor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    None,
    Left,
    Right,
    Conflicting,
}

impl Direction {
    fn from_bits(bits: u8) -> Self {
        match bits & ChangeCode::DIRECTION_MASK.bits() {
            0 => Self::None,
            4 => Self::Left,
            8 => Self::Right,
            _ => Self::Conflicting,
        }
    }

    fn bits(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Left => 4,
            Self::Right => 8,
            Self::Conflicting => 12,
        }
    }

    /// Lowercase label, or `None` for [`Direction::None`].
    pub fn label(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Left => Some("left"),
            Self::Right => Some("right"),
            Self::Conflicting => Some("conflicting"),
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        match label {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "conflicting" => Some(Self::Conflicting),
            _ => None,
        }
    }
}

impl From<Direction> for ChangeCode {
    fn from(direction: Direction) -> Self {
        Self::from_bits_retain(direction.bits())
    }
}
