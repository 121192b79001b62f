use std::fmt;

use pursuit_ranging::identifiers::PlayerId;
use serde::{Deserialize, Serialize};

/// The two sides of the chase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerRole {
    Hunter,
    Evader,
}

impl PlayerRole {
    /// One identifier is reserved for the Hunter; everybody else evades.
    pub fn of(player: PlayerId, hunter: PlayerId) -> Self {
        if player == hunter {
            Self::Hunter
        } else {
            Self::Evader
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Self::Hunter => Self::Evader,
            Self::Evader => Self::Hunter,
        }
    }
}

impl fmt::Display for PlayerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hunter => write!(f, "Hunter"),
            Self::Evader => write!(f, "Evader"),
        }
    }
}

/// Who this device is, resolved once at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerIdentity {
    pub player: PlayerId,
    pub hunter: PlayerId,
}

impl PlayerIdentity {
    pub fn new(player: PlayerId, hunter: PlayerId) -> Self {
        Self { player, hunter }
    }

    /// Resolve the persisted "PlayerID" value.
    ///
    /// Missing or unparseable input falls back to `fallback`, which the
    /// configuration guarantees is not the Hunter identifier.
    pub fn resolve(raw: Option<&str>, hunter: PlayerId, fallback: PlayerId) -> Self {
        let player = match raw.map(str::trim) {
            Some(text) => match text.parse::<i32>() {
                Ok(value) => PlayerId::new(value),
                Err(error) => {
                    tracing::warn!(%text, %error, %fallback, "malformed PlayerID; defaulting to evader");
                    fallback
                }
            },
            None => {
                tracing::warn!(%fallback, "no PlayerID configured; defaulting to evader");
                fallback
            }
        };

        let identity = Self { player, hunter };
        tracing::info!(player = %identity.player, role = %identity.role(), "player identity resolved");
        identity
    }

    pub fn role(&self) -> PlayerRole {
        self.role_of(self.player)
    }

    pub fn role_of(&self, player: PlayerId) -> PlayerRole {
        PlayerRole::of(player, self.hunter)
    }

    pub fn is_self(&self, player: PlayerId) -> bool {
        self.player == player
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HUNTER: PlayerId = PlayerId::new(1000);
    const FALLBACK: PlayerId = PlayerId::new(1001);

    #[test]
    fn test_role_from_identifier() {
        assert_eq!(PlayerRole::of(PlayerId::new(1000), HUNTER), PlayerRole::Hunter);
        assert_eq!(PlayerRole::of(PlayerId::new(1001), HUNTER), PlayerRole::Evader);
        assert_eq!(PlayerRole::of(PlayerId::new(-7), HUNTER), PlayerRole::Evader);
    }

    #[test]
    fn test_opponent() {
        assert_eq!(PlayerRole::Hunter.opponent(), PlayerRole::Evader);
        assert_eq!(PlayerRole::Evader.opponent(), PlayerRole::Hunter);
    }

    #[test]
    fn test_resolve_valid() {
        let identity = PlayerIdentity::resolve(Some(" 1000 "), HUNTER, FALLBACK);
        assert_eq!(identity.player, HUNTER);
        assert_eq!(identity.role(), PlayerRole::Hunter);
    }

    #[test]
    fn test_resolve_malformed_defaults_to_evader() {
        for raw in [Some("killer"), Some(""), Some("1000.5"), None] {
            let identity = PlayerIdentity::resolve(raw, HUNTER, FALLBACK);
            assert_eq!(identity.player, FALLBACK);
            assert_eq!(identity.role(), PlayerRole::Evader);
        }
    }
}
