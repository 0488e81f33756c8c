use std::fmt;

use serde::{Deserialize, Serialize};
use telegraph_types::PartyRole;

use super::ActorId;

/// Maximum number of party slots (full alliance)
pub const MAX_ALLIES: usize = 24;

/// Bitmask over party slots
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerMask(pub u32);

impl PlayerMask {
    pub const NONE: PlayerMask = PlayerMask(0);

    pub fn single(slot: usize) -> Self {
        let mut mask = Self::NONE;
        mask.set(slot);
        mask
    }

    pub fn set(&mut self, slot: usize) {
        if slot < MAX_ALLIES {
            self.0 |= 1 << slot;
        }
    }

    pub fn clear(&mut self, slot: usize) {
        if slot < MAX_ALLIES {
            self.0 &= !(1 << slot);
        }
    }

    pub fn contains(&self, slot: usize) -> bool {
        slot < MAX_ALLIES && self.0 & (1 << slot) != 0
    }

    pub fn any(&self) -> bool {
        self.0 != 0
    }

    pub fn count(&self) -> u32 {
        self.0.count_ones()
    }

    pub fn slots(&self) -> impl Iterator<Item = usize> + '_ {
        (0..MAX_ALLIES).filter(|&s| self.contains(s))
    }
}

impl FromIterator<usize> for PlayerMask {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut mask = PlayerMask::NONE;
        for slot in iter {
            mask.set(slot);
        }
        mask
    }
}

impl fmt::Debug for PlayerMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlayerMask({:#08x})", self.0)
    }
}

/// Party layout: which actor sits in which slot, and with what combat role
#[derive(Debug, Clone, Default)]
pub struct PartyState {
    members: [Option<ActorId>; MAX_ALLIES],
    roles: [PartyRole; MAX_ALLIES],
}

impl PartyState {
    /// Place an actor in a slot. Out-of-range slots are ignored.
    pub fn assign(&mut self, slot: usize, actor: ActorId, role: PartyRole) {
        if slot < MAX_ALLIES {
            self.members[slot] = Some(actor);
            self.roles[slot] = role;
        }
    }

    pub fn remove(&mut self, slot: usize) {
        if slot < MAX_ALLIES {
            self.members[slot] = None;
            self.roles[slot] = PartyRole::default();
        }
    }

    pub fn get(&self, slot: usize) -> Option<ActorId> {
        self.members.get(slot).copied().flatten()
    }

    pub fn role(&self, slot: usize) -> PartyRole {
        self.roles.get(slot).copied().unwrap_or_default()
    }

    pub fn find_slot(&self, actor: ActorId) -> Option<usize> {
        self.members.iter().position(|m| *m == Some(actor))
    }

    /// Occupied slots with their actor id
    pub fn slots(&self) -> impl Iterator<Item = (usize, ActorId)> + '_ {
        self.members
            .iter()
            .enumerate()
            .filter_map(|(slot, id)| id.map(|id| (slot, id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_basics() {
        let mut mask: PlayerMask = [0, 3, 7].into_iter().collect();
        assert!(mask.contains(3));
        assert_eq!(mask.count(), 3);
        mask.clear(3);
        assert!(!mask.contains(3));
        assert_eq!(mask.slots().collect::<Vec<_>>(), vec![0, 7]);
        mask.set(MAX_ALLIES + 1);
        assert_eq!(mask.count(), 2, "out-of-range slots are ignored");
    }

    #[test]
    fn party_slots() {
        let mut party = PartyState::default();
        party.assign(2, ActorId(10), PartyRole::Tank);
        party.assign(5, ActorId(11), PartyRole::Healer);
        assert_eq!(party.find_slot(ActorId(11)), Some(5));
        assert_eq!(party.role(2), PartyRole::Tank);
        assert_eq!(party.slots().count(), 2);
        party.remove(2);
        assert_eq!(party.get(2), None);
    }
}
