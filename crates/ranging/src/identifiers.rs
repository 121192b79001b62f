//! Integer identifiers carried in beacon advertisements.
//!
//! A beacon advertises two 16-bit-ish integers: the session it belongs to and
//! the player that owns it. Both travel through the native bridge as plain
//! `i32`s, so the newtypes here exist to keep them from being swapped.

use std::fmt;

macro_rules! impl_identifier {
    ($name:ident) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(i32);

        impl $name {
            pub const fn new(value: i32) -> Self {
                Self(value)
            }

            pub const fn get(&self) -> i32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(value: i32) -> Self {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

impl_identifier!(PlayerId);
impl_identifier!(SessionId);

/// Stable identity of a ranging source across sightings.
///
/// Derived from the advertisement's major/minor pair: major carries the
/// session, minor carries the advertising player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BeaconKey {
    pub session: SessionId,
    pub player: PlayerId,
}

impl BeaconKey {
    pub fn new(major: i32, minor: i32) -> Self {
        Self {
            session: SessionId::new(major),
            player: PlayerId::new(minor),
        }
    }
}

impl fmt::Display for BeaconKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.session, self.player)
    }
}
