use chrono::NaiveDateTime;

use super::{Component, ModuleContext};
use crate::events::CastEvent;
use crate::hints::GlobalHints;
use crate::world::{ActionId, Actor, CastInfo, add_secs};

/// How long a hint waits for its next counted hit before giving up
pub const DEFAULT_HIT_TIMEOUT_SECS: f32 = 10.0;

/// Global hint shown from a start cast until a number of follow-up hits
/// have resolved.
///
/// Hits are counted whether or not the hint is showing; the count resets each
/// time it reaches `required_hits`.
#[derive(Debug, Clone)]
pub struct CastHint {
    start_action: ActionId,
    end_actions: Vec<ActionId>,
    required_hits: u32,
    hint: String,
    hit_timeout_secs: f32,
    hits: u32,
    /// Last point the hint made progress: the start cast's activation or the
    /// latest counted hit. `None` while hidden.
    shown_since: Option<NaiveDateTime>,
}

impl CastHint {
    pub fn new(start_action: ActionId, hint: impl Into<String>) -> Self {
        Self {
            start_action,
            end_actions: vec![start_action],
            required_hits: 1,
            hint: hint.into(),
            hit_timeout_secs: DEFAULT_HIT_TIMEOUT_SECS,
            hits: 0,
            shown_since: None,
        }
    }

    /// Stay active until `count` resolutions of any of `actions`
    pub fn until(mut self, actions: Vec<ActionId>, count: u32) -> Self {
        self.end_actions = actions;
        self.required_hits = count.max(1);
        self
    }

    pub fn with_hit_timeout(mut self, secs: f32) -> Self {
        self.hit_timeout_secs = secs.max(0.0);
        self
    }

    pub fn is_active(&self) -> bool {
        self.shown_since.is_some()
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }
}

impl Component for CastHint {
    fn on_cast_started(&mut self, _ctx: &ModuleContext<'_>, _caster: &Actor, cast: &CastInfo) {
        if cast.action == self.start_action {
            self.shown_since = Some(cast.activation(0.0));
        }
    }

    fn on_cast_resolved(&mut self, ctx: &ModuleContext<'_>, _caster: &Actor, event: &CastEvent) {
        if !self.end_actions.contains(&event.action) {
            return;
        }
        self.hits += 1;
        if self.hits >= self.required_hits {
            self.hits = 0;
            self.shown_since = None;
        } else if self.shown_since.is_some() {
            self.shown_since = Some(ctx.now());
        }
    }

    fn update(&mut self, ctx: &ModuleContext<'_>) {
        let Some(since) = self.shown_since else {
            return;
        };
        let deadline = add_secs(
            since,
            self.hit_timeout_secs + ctx.config.hazard_expiry_grace_secs,
        );
        if ctx.now() > deadline {
            tracing::debug!(
                action = self.start_action.0,
                hits = self.hits,
                "Cast hint expired without its final hit"
            );
            self.hits = 0;
            self.shown_since = None;
        }
    }

    fn add_global_hints(&self, _ctx: &ModuleContext<'_>, hints: &mut GlobalHints) {
        if self.shown_since.is_some() {
            hints.add(self.hint.clone());
        }
    }
}
