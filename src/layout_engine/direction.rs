use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn orientation(self) -> Orientation {
        match self {
            Direction::Left | Direction::Right => Orientation::Horizontal,
            Direction::Up | Direction::Down => Orientation::Vertical,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// Whether this direction points toward the start of a stack laid out
    /// along `orientation`.
    pub fn is_backward(self, orientation: Orientation) -> Option<bool> {
        match (orientation, self) {
            (Orientation::Horizontal, Direction::Left) => Some(true),
            (Orientation::Horizontal, Direction::Right) => Some(false),
            (Orientation::Vertical, Direction::Up) => Some(true),
            (Orientation::Vertical, Direction::Down) => Some(false),
            _ => None,
        }
    }
}

bitflags::bitflags! {
    /// Edges of a window, for edge-resize operations. Multiple edges may be
    /// moved at once (e.g. a corner drag sets two flags).
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Edges: u8 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const UP = 1 << 2;
        const DOWN = 1 << 3;
    }
}

// Serialized in the bitflags text format ("LEFT | UP") so transforms stay
// readable when dumped.
impl Serialize for Edges {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        bitflags::serde::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for Edges {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        bitflags::serde::deserialize(deserializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backward_matches_orientation() {
        assert_eq!(Direction::Left.is_backward(Orientation::Horizontal), Some(true));
        assert_eq!(Direction::Right.is_backward(Orientation::Horizontal), Some(false));
        assert_eq!(Direction::Up.is_backward(Orientation::Vertical), Some(true));
        assert_eq!(Direction::Down.is_backward(Orientation::Horizontal), None);
    }

    #[test]
    fn edges_round_trip_through_serde() {
        for edges in [Edges::empty(), Edges::LEFT, Edges::LEFT | Edges::UP, Edges::all()] {
            let json = serde_json::to_string(&edges).unwrap();
            assert_eq!(serde_json::from_str::<Edges>(&json).unwrap(), edges);
        }
        assert_eq!(
            serde_json::to_string(&(Edges::RIGHT | Edges::DOWN)).unwrap(),
            "\"RIGHT | DOWN\""
        );
    }
}
