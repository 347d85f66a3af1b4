//! A tile identifier: totally ordered, hashable, and round-trips through
//! both the text and binary serialization forms spec.md §3 requires.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Opaque tile identifier. Partitioners hand these out as dense,
/// zero-based indices (`0..size()`); nothing else assumes that shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct TileId(pub u64);

impl TileId {
    pub fn new(value: u64) -> Self {
        TileId(value)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TileId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(TileId)
    }
}

impl From<u64> for TileId {
    fn from(value: u64) -> Self {
        TileId(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_like_the_wrapped_integer() {
        assert!(TileId(1) < TileId(2));
        assert_eq!(TileId(5), TileId(5));
    }

    #[test]
    fn round_trips_through_text() {
        let id = TileId(42);
        let text = id.to_string();
        assert_eq!(text.parse::<TileId>().unwrap(), id);
    }
}
