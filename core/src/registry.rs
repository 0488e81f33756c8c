//! Component registry
//!
//! The registry owns every component of the active encounter phase. Components
//! reference each other only through `ComponentHandle`s resolved by name when
//! the registry is activated, and read siblings through a `Siblings` view that
//! never includes the component currently being mutated.

use chrono::NaiveDateTime;
use telegraph_types::EngineConfig;

use crate::components::{Component, ModuleContext, downcast};
use crate::dsl::EncounterError;
use crate::events::WorldEvent;
use crate::world::WorldState;

/// Non-owning reference to a component in the same registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentHandle(usize);

impl ComponentHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

struct RegisteredComponent {
    name: String,
    component: Box<dyn Component>,
}

/// Read-only view over the registry, excluding at most one entry (the
/// component being mutated).
#[derive(Clone, Copy)]
pub struct Siblings<'a> {
    owner: &'a str,
    before: &'a [RegisteredComponent],
    after: &'a [RegisteredComponent],
}

impl<'a> Siblings<'a> {
    fn all(entries: &'a [RegisteredComponent]) -> Self {
        Self {
            owner: "",
            before: entries,
            after: &[],
        }
    }

    /// View with no components at all
    pub fn empty() -> Self {
        Self::all(&[])
    }

    /// Name of the component this view was handed to
    pub fn owner(&self) -> &'a str {
        self.owner
    }

    fn entry(&self, handle: ComponentHandle) -> Option<&'a RegisteredComponent> {
        let idx = handle.0;
        if idx < self.before.len() {
            return self.before.get(idx);
        }
        // Index `before.len()` is the excluded component
        idx.checked_sub(self.before.len() + 1)
            .and_then(|i| self.after.get(i))
    }

    fn enumerate(&self) -> impl Iterator<Item = (ComponentHandle, &'a RegisteredComponent)> {
        let offset = self.before.len() + 1;
        self.before
            .iter()
            .enumerate()
            .map(|(i, e)| (ComponentHandle(i), e))
            .chain(
                self.after
                    .iter()
                    .enumerate()
                    .map(move |(i, e)| (ComponentHandle(i + offset), e)),
            )
    }

    pub fn get(&self, handle: ComponentHandle) -> Option<&'a dyn Component> {
        self.entry(handle).map(|e| e.component.as_ref())
    }

    pub fn get_as<T: Component>(&self, handle: ComponentHandle) -> Option<&'a T> {
        self.get(handle).and_then(downcast::<T>)
    }

    pub fn find(&self, name: &str) -> Option<ComponentHandle> {
        self.enumerate()
            .find(|(_, e)| e.name == name)
            .map(|(handle, _)| handle)
    }

    /// Resolve a sibling by name and check its concrete type
    pub fn require<T: Component>(&self, name: &str) -> Result<ComponentHandle, EncounterError> {
        let handle = self.find(name).ok_or_else(|| EncounterError::MissingSibling {
            component: self.owner.to_string(),
            sibling: name.to_string(),
        })?;
        if self.get_as::<T>(handle).is_none() {
            return Err(EncounterError::SiblingTypeMismatch {
                component: self.owner.to_string(),
                sibling: name.to_string(),
                expected: std::any::type_name::<T>(),
            });
        }
        Ok(handle)
    }
}

/// Owns the components of one encounter phase, in activation order
#[derive(Default)]
pub struct ComponentRegistry {
    entries: Vec<RegisteredComponent>,
    last_event_time: Option<NaiveDateTime>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a component under a unique name
    pub fn register(
        &mut self,
        name: impl Into<String>,
        component: Box<dyn Component>,
    ) -> Result<ComponentHandle, EncounterError> {
        let name = name.into();
        if self.entries.iter().any(|e| e.name == name) {
            return Err(EncounterError::DuplicateComponent(name));
        }
        self.entries.push(RegisteredComponent { name, component });
        Ok(ComponentHandle(self.entries.len() - 1))
    }

    /// Let every component resolve its sibling references.
    ///
    /// Must be called once after all components are registered and before the
    /// first event is dispatched.
    pub fn activate(&mut self) -> Result<(), EncounterError> {
        for i in 0..self.entries.len() {
            let (before, rest) = self.entries.split_at_mut(i);
            let Some((current, after)) = rest.split_first_mut() else {
                continue;
            };
            let siblings = Siblings {
                owner: &current.name,
                before: &*before,
                after: &*after,
            };
            current.component.resolve_siblings(&siblings)?;
            tracing::debug!(component = %current.name, "Component activated");
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn handle(&self, name: &str) -> Option<ComponentHandle> {
        self.entries
            .iter()
            .position(|e| e.name == name)
            .map(ComponentHandle)
    }

    pub fn get(&self, handle: ComponentHandle) -> Option<&dyn Component> {
        self.entries.get(handle.0).map(|e| e.component.as_ref())
    }

    pub fn get_as<T: Component>(&self, handle: ComponentHandle) -> Option<&T> {
        self.get(handle).and_then(downcast::<T>)
    }

    /// First component of the given type
    pub fn find<T: Component>(&self) -> Option<&T> {
        self.entries
            .iter()
            .find_map(|e| downcast::<T>(e.component.as_ref()))
    }

    /// Components with their names, in activation order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn Component)> {
        self.entries
            .iter()
            .map(|e| (e.name.as_str(), e.component.as_ref()))
    }

    /// Shared view over every component, for output hooks
    pub fn siblings(&self) -> Siblings<'_> {
        Siblings::all(&self.entries)
    }

    /// Deliver one event to every component, in activation order
    pub fn dispatch_event(&mut self, event: &WorldEvent, world: &WorldState, config: &EngineConfig) {
        let timestamp = event.timestamp();
        if let Some(last) = self.last_event_time
            && timestamp < last
        {
            tracing::warn!(
                ?timestamp,
                ?last,
                "Event delivered out of timestamp order; processing as delivered"
            );
        }
        self.last_event_time = Some(self.last_event_time.map_or(timestamp, |l| l.max(timestamp)));

        self.for_each_mut(world, config, |component, ctx| {
            component.handle_event(ctx, event)
        });
    }

    /// Run per-tick housekeeping on every component
    pub fn update(&mut self, world: &WorldState, config: &EngineConfig) {
        self.for_each_mut(world, config, |component, ctx| component.update(ctx));
    }

    fn for_each_mut<F>(&mut self, world: &WorldState, config: &EngineConfig, mut f: F)
    where
        F: FnMut(&mut dyn Component, &ModuleContext<'_>),
    {
        for i in 0..self.entries.len() {
            let (before, rest) = self.entries.split_at_mut(i);
            let Some((current, after)) = rest.split_first_mut() else {
                continue;
            };
            let siblings = Siblings {
                owner: &current.name,
                before: &*before,
                after: &*after,
            };
            let ctx = ModuleContext::new(world, config, siblings);
            f(current.component.as_mut(), &ctx);
        }
    }
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("components", &self.entries.iter().map(|e| &e.name).collect::<Vec<_>>())
            .finish()
    }
}
