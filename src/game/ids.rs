//! Arena Handles
//!
//! Sectors, rooms and doors live in flat arenas owned by the `World`.
//! Cross references (neighbor links, owning room, adjoining rooms) are
//! stored as these indices instead of pointers.

use std::fmt;
use serde::{Serialize, Deserialize};

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            /// Position in the owning arena.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            /// Handle for the given arena position.
            #[inline]
            pub const fn from_index(index: usize) -> Self {
                Self(index as u32)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

arena_id!(
    /// Handle of a sector in `World::sectors`.
    SectorId, "sector"
);
arena_id!(
    /// Handle of a room in `World::rooms`.
    RoomId, "room"
);
arena_id!(
    /// Handle of a door in `World::doors`.
    DoorId, "door"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip_index() {
        assert_eq!(SectorId::from_index(7).index(), 7);
        assert_eq!(RoomId(3).index(), 3);
    }

    #[test]
    fn test_id_display() {
        assert_eq!(DoorId(2).to_string(), "door#2");
        assert_eq!(SectorId(0).to_string(), "sector#0");
    }
}
