use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the three inputs of a comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// The common base. Only meaningful in three-way comparisons.
    Ancestor,
    Left,
    Right,
}

impl Side {
    /// All sides in the order the engine consults them.
    pub const ALL: [Side; 3] = [Side::Ancestor, Side::Left, Side::Right];
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Side::Ancestor => "ancestor",
            Side::Left => "left",
            Side::Right => "right",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ancestor_comes_first() {
        assert_eq!(Side::ALL, [Side::Ancestor, Side::Left, Side::Right]);
    }

    #[test]
    fn display_is_lowercase() {
        assert_eq!(Side::Ancestor.to_string(), "ancestor");
        assert_eq!(format!("{}", Side::Right), "right");
    }
}
