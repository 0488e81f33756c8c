use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::geometry::WPos;
use crate::world::{ActionId, ActorId, CastInfo, StatusId};

/// A resolved action (the moment damage actually lands)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastEvent {
    pub action: ActionId,
    #[serde(default)]
    pub main_target: Option<ActorId>,
    #[serde(default)]
    pub target_pos: WPos,
    /// Every actor hit
    #[serde(default)]
    pub targets: Vec<ActorId>,
}

/// A status effect as it was gained or lost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusInfo {
    pub id: StatusId,
    #[serde(default)]
    pub source: Option<ActorId>,
    #[serde(default)]
    pub expires_at: Option<NaiveDateTime>,
    /// Status-specific payload (stack count, variant)
    #[serde(default)]
    pub extra: u16,
}

/// Events delivered by the host world-state feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorldEvent {
    CastStarted {
        caster: ActorId,
        cast: CastInfo,
        timestamp: NaiveDateTime,
    },
    /// Cast bar completed or was interrupted
    CastFinished {
        caster: ActorId,
        cast: CastInfo,
        timestamp: NaiveDateTime,
    },
    /// Action resolved (damage snapshot)
    CastResolved {
        caster: ActorId,
        event: CastEvent,
        timestamp: NaiveDateTime,
    },
    StatusGained {
        actor: ActorId,
        status: StatusInfo,
        timestamp: NaiveDateTime,
    },
    StatusLost {
        actor: ActorId,
        status: StatusInfo,
        timestamp: NaiveDateTime,
    },
    ActorCreated {
        actor: ActorId,
        timestamp: NaiveDateTime,
    },
    ActorRemoved {
        actor: ActorId,
        timestamp: NaiveDateTime,
    },
}

impl WorldEvent {
    /// Get the timestamp from any event variant
    pub fn timestamp(&self) -> NaiveDateTime {
        match self {
            Self::CastStarted { timestamp, .. }
            | Self::CastFinished { timestamp, .. }
            | Self::CastResolved { timestamp, .. }
            | Self::StatusGained { timestamp, .. }
            | Self::StatusLost { timestamp, .. }
            | Self::ActorCreated { timestamp, .. }
            | Self::ActorRemoved { timestamp, .. } => *timestamp,
        }
    }

    /// The actor the event is about (caster for casts)
    pub fn actor(&self) -> ActorId {
        match self {
            Self::CastStarted { caster, .. }
            | Self::CastFinished { caster, .. }
            | Self::CastResolved { caster, .. } => *caster,
            Self::StatusGained { actor, .. }
            | Self::StatusLost { actor, .. }
            | Self::ActorCreated { actor, .. }
            | Self::ActorRemoved { actor, .. } => *actor,
        }
    }

    /// Action id for cast-related events
    pub fn action(&self) -> Option<ActionId> {
        match self {
            Self::CastStarted { cast, .. } | Self::CastFinished { cast, .. } => Some(cast.action),
            Self::CastResolved { event, .. } => Some(event.action),
            _ => None,
        }
    }
}
