//! Turning definitions into live components

use hashbrown::HashSet;

use super::{ComponentKind, EncounterDefinition, EncounterError, PhaseDefinition, PhaseTrigger};
use crate::components::{
    ActorSpawnAoes, CastCounter, CastHint, CastInterruptHint, CastTowers, CleansableDebuff,
    Component, GenericWildCharge, InterceptTether, RaidwideCast, RaidwideCastDelay, SafeZone,
    SimpleAoes, SingleTargetCast, SpreadFromCastTargets, StackWithCastTargets,
};
use crate::registry::ComponentRegistry;
use crate::world::MAX_DELAY_SECS;

impl ComponentKind {
    /// Create a fresh component with no tracked state
    pub fn build(&self) -> Box<dyn Component> {
        match self {
            ComponentKind::SimpleAoes {
                action,
                shape,
                origin,
                max_casts,
                risky_window_secs,
                extra_delay_secs,
                safe_inside,
                repeat_after_secs,
            } => {
                let mut aoes = SimpleAoes::new(*action, shape.clone())
                    .with_origin(*origin)
                    .with_risky_window(*risky_window_secs)
                    .with_extra_delay(*extra_delay_secs);
                if let Some(max) = max_casts {
                    aoes = aoes.with_max_casts(*max);
                }
                if *safe_inside {
                    aoes = aoes.safe_inside();
                }
                if let Some(secs) = repeat_after_secs {
                    aoes = aoes.with_repeat_after(*secs);
                }
                Box::new(aoes)
            }
            ComponentKind::RaidwideCast { action, hint } => {
                let mut raidwide = RaidwideCast::new(*action);
                if let Some(hint) = hint {
                    raidwide = raidwide.with_hint(hint.clone());
                }
                Box::new(raidwide)
            }
            ComponentKind::RaidwideCastDelay {
                visual_action,
                damage_action,
                delay_secs,
                hint,
            } => {
                let mut raidwide = RaidwideCastDelay::new(*visual_action, *damage_action, *delay_secs);
                if let Some(hint) = hint {
                    raidwide = raidwide.with_hint(hint.clone());
                }
                Box::new(raidwide)
            }
            ComponentKind::Tankbuster {
                action,
                delayable,
                hint,
            } => {
                let mut buster = if *delayable {
                    SingleTargetCast::delayable(*action)
                } else {
                    SingleTargetCast::new(*action)
                };
                if let Some(hint) = hint {
                    buster = buster.with_hint(hint.clone());
                }
                Box::new(buster)
            }
            ComponentKind::Stack {
                action,
                radius,
                min_size,
                max_size,
            } => Box::new(StackWithCastTargets::new(*action, *radius, *min_size, *max_size)),
            ComponentKind::Spread { action, radius } => {
                Box::new(SpreadFromCastTargets::new(*action, *radius))
            }
            ComponentKind::Towers {
                action,
                radius,
                min_soakers,
                max_soakers,
                suppressed_by,
            } => {
                let mut towers = CastTowers::new(*action, *radius, *min_soakers, *max_soakers);
                if let Some(sibling) = suppressed_by {
                    towers = towers.suppressed_while_stacking(sibling.clone());
                }
                Box::new(towers)
            }
            ComponentKind::Interrupt { action, stun } => {
                let hint = CastInterruptHint::new(*action);
                Box::new(if *stun { hint.stun_only() } else { hint })
            }
            ComponentKind::Intercept {
                action,
                protected_oid,
                resolve_action,
                extra_delay_secs,
            } => {
                let mut tether =
                    InterceptTether::new(*action, *protected_oid).with_extra_delay(*extra_delay_secs);
                if let Some(resolve) = resolve_action {
                    tether = tether.with_resolve_action(*resolve);
                }
                Box::new(tether)
            }
            ComponentKind::WildCharge {
                action,
                half_width,
                fixed_length,
                roles,
            } => Box::new(
                GenericWildCharge::new(*half_width)
                    .with_fixed_length(*fixed_length)
                    .activated_by(*action, *roles),
            ),
            ComponentKind::SpawnAoes {
                oid,
                shape,
                delay_secs,
                clear_action,
            } => {
                let mut spawns = ActorSpawnAoes::new(*oid, shape.clone(), *delay_secs);
                if let Some(clear) = clear_action {
                    spawns = spawns.cleared_by(*clear);
                }
                Box::new(spawns)
            }
            ComponentKind::SafeZone {
                trigger_action,
                clear_action,
                shape,
                rotation_offset,
                hint,
            } => {
                let mut zone = SafeZone::new(*trigger_action, *clear_action, shape.clone())
                    .with_rotation_offset(*rotation_offset);
                if let Some(hint) = hint {
                    zone = zone.with_hint(hint.clone());
                }
                Box::new(zone)
            }
            ComponentKind::Cleansable { status, debuff } => {
                Box::new(CleansableDebuff::new(*status, debuff.clone()))
            }
            ComponentKind::CastHint {
                start_action,
                hint,
                end_actions,
                end_count,
                hit_timeout_secs,
            } => {
                let end_actions = if end_actions.is_empty() {
                    vec![*start_action]
                } else {
                    end_actions.clone()
                };
                Box::new(
                    CastHint::new(*start_action, hint.clone())
                        .until(end_actions, *end_count)
                        .with_hit_timeout(*hit_timeout_secs),
                )
            }
            ComponentKind::CastCounter { action } => Box::new(CastCounter::new(*action)),
        }
    }
}

/// Build and activate a fresh registry holding the components of `phase`
pub fn build_registry(
    definition: &EncounterDefinition,
    phase: &PhaseDefinition,
) -> Result<ComponentRegistry, EncounterError> {
    let mut registry = ComponentRegistry::new();
    for name in &phase.components {
        let component = definition
            .component(name)
            .ok_or_else(|| EncounterError::UnknownComponent {
                phase: phase.name.clone(),
                component: name.clone(),
            })?;
        registry.register(name.clone(), component.kind.build())?;
    }
    registry.activate()?;
    Ok(registry)
}

impl EncounterDefinition {
    fn invalid(&self, reason: impl Into<String>) -> EncounterError {
        EncounterError::InvalidDefinition {
            encounter: self.info.id.clone(),
            reason: reason.into(),
        }
    }

    /// Check names, phase triggers and sibling wiring without running anything
    pub fn validate(&self) -> Result<(), EncounterError> {
        if self.info.id.trim().is_empty() {
            return Err(self.invalid("encounter id is empty"));
        }

        let mut names = HashSet::new();
        for component in &self.components {
            if !names.insert(component.name.as_str()) {
                return Err(EncounterError::DuplicateComponent(component.name.clone()));
            }
        }

        let phases = self.effective_phases();
        let mut phase_names = HashSet::new();
        for (idx, phase) in phases.iter().enumerate() {
            if !phase_names.insert(phase.name.as_str()) {
                return Err(self.invalid(format!("phase '{}' is defined twice", phase.name)));
            }

            match (&phase.trigger, idx) {
                (PhaseTrigger::EncounterStart, 0) => {}
                (_, 0) => {
                    return Err(self.invalid(format!(
                        "first phase '{}' must start with the encounter",
                        phase.name
                    )));
                }
                (PhaseTrigger::EncounterStart, _) => {
                    return Err(self.invalid(format!("phase '{}' has no trigger", phase.name)));
                }
                (PhaseTrigger::CounterReached { counter, .. }, _) => {
                    let previous = &phases[idx - 1];
                    let is_counter = matches!(
                        self.component(counter).map(|c| &c.kind),
                        Some(ComponentKind::CastCounter { .. })
                    );
                    if !is_counter || !previous.components.contains(counter) {
                        return Err(self.invalid(format!(
                            "phase '{}' waits on '{counter}', which is not a cast_counter of phase '{}'",
                            phase.name, previous.name
                        )));
                    }
                }
                (PhaseTrigger::Elapsed { secs }, _) if !(0.0..=MAX_DELAY_SECS).contains(secs) => {
                    return Err(self.invalid(format!(
                        "phase '{}' elapsed time {} is outside 0..={}",
                        phase.name, secs, MAX_DELAY_SECS
                    )));
                }
                _ => {}
            }

            build_registry(self, phase)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{CastTowers, GenericWildCharge};

    fn parse(content: &str) -> EncounterDefinition {
        toml::from_str(content).unwrap()
    }

    const HEADER: &str = r#"
        [encounter]
        id = "test"
    "#;

    #[test]
    fn builds_every_component_kind() {
        let def = parse(&format!(
            r#"{HEADER}
            [[component]]
            name = "a"
            type = "simple_aoes"
            action = 1
            shape = {{ type = "circle", radius = 5.0 }}
            safe_inside = true
            max_casts = 1

            [[component]]
            name = "b"
            type = "raidwide_cast_delay"
            visual_action = 2
            damage_action = 3
            delay_secs = 2.5

            [[component]]
            name = "c"
            type = "intercept"
            action = 4
            protected_oid = 17533

            [[component]]
            name = "d"
            type = "safe_zone"
            trigger_action = 5
            clear_action = 6
            shape = {{ type = "cone", radius = 20.0, half_angle = 0.5 }}

            [[component]]
            name = "e"
            type = "cast_hint"
            start_action = 7
            hint = "3 hits"
            end_actions = [8, 9]
            end_count = 3

            [[component]]
            name = "f"
            type = "spawn_aoes"
            oid = 99
            shape = {{ type = "circle", radius = 4.0 }}
            delay_secs = 6.0
            clear_action = 10

            [[component]]
            name = "g"
            type = "cleansable"
            status = 18
            debuff = "Poison"
            "#
        ));
        def.validate().unwrap();
        let registry = build_registry(&def, &def.effective_phases()[0]).unwrap();
        assert_eq!(registry.len(), 7);
        let names: Vec<_> = registry.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "b", "c", "d", "e", "f", "g"]);
    }

    #[test]
    fn wild_charge_is_cast_driven() {
        let def = parse(&format!(
            r#"{HEADER}
            [[component]]
            name = "charge"
            type = "wild_charge"
            action = 50
            half_width = 3.0
            "#
        ));
        let registry = build_registry(&def, &def.effective_phases()[0]).unwrap();
        let charge = registry.find::<GenericWildCharge>().unwrap();
        assert!(charge.source().is_none());
    }

    #[test]
    fn tower_sibling_must_share_the_phase() {
        let def = parse(&format!(
            r#"{HEADER}
            [[component]]
            name = "exposure"
            type = "stack"
            action = 1
            radius = 6.0

            [[component]]
            name = "conviction"
            type = "towers"
            action = 2
            radius = 4.0
            suppressed_by = "exposure"

            [[phase]]
            name = "one"
            components = ["conviction", "exposure"]

            [[phase]]
            name = "two"
            components = ["conviction"]
            trigger = {{ type = "cast_started", action = 3 }}
            "#
        ));
        let err = def.validate().unwrap_err();
        assert!(matches!(err, EncounterError::MissingSibling { ref sibling, .. } if sibling == "exposure"));

        let first = build_registry(&def, &def.phases[0]).unwrap();
        assert!(first.find::<CastTowers>().is_some());
    }

    #[test]
    fn duplicate_component_names() {
        let def = parse(&format!(
            r#"{HEADER}
            [[component]]
            name = "dup"
            type = "cast_counter"
            action = 1

            [[component]]
            name = "dup"
            type = "cast_counter"
            action = 2
            "#
        ));
        assert!(matches!(def.validate(), Err(EncounterError::DuplicateComponent(name)) if name == "dup"));
    }

    #[test]
    fn phase_trigger_rules() {
        let first_with_trigger = parse(&format!(
            r#"{HEADER}
            [[phase]]
            name = "one"
            trigger = {{ type = "cast_started", action = 3 }}
            "#
        ));
        assert!(matches!(
            first_with_trigger.validate(),
            Err(EncounterError::InvalidDefinition { .. })
        ));

        let later_without_trigger = parse(&format!(
            r#"{HEADER}
            [[phase]]
            name = "one"

            [[phase]]
            name = "two"
            "#
        ));
        assert!(matches!(
            later_without_trigger.validate(),
            Err(EncounterError::InvalidDefinition { .. })
        ));

        let counter_elsewhere = parse(&format!(
            r#"{HEADER}
            [[component]]
            name = "rounds"
            type = "cast_counter"
            action = 1

            [[phase]]
            name = "one"

            [[phase]]
            name = "two"
            components = ["rounds"]
            trigger = {{ type = "counter_reached", counter = "rounds", count = 2 }}
            "#
        ));
        assert!(matches!(
            counter_elsewhere.validate(),
            Err(EncounterError::InvalidDefinition { .. })
        ));
    }

    #[test]
    fn empty_id_is_rejected() {
        let def = parse(
            r#"
            [encounter]
            id = " "
            "#,
        );
        assert!(matches!(def.validate(), Err(EncounterError::InvalidDefinition { .. })));
    }
}
