//! The action registry: [`ActionKind`] to handler function.
//!
//! Effects name a structural change with an [`EffectAction`]; the registry
//! maps its kind to a plain function that reads the state and returns a
//! [`StatePatch`]. Handlers are total: when a relation they need is missing
//! (no partner, no pet, wrong status) they return an empty patch.

use std::collections::BTreeMap;

use lineage_family::LifecycleConfig;
use lineage_types::{ActionKind, Catalog, CharacterId, EffectAction, GameState};
use rand::RngCore;
use tracing::warn;

use crate::handlers;
use crate::milestones;
use crate::patch::StatePatch;

/// Read-only inputs handed to every action handler.
#[derive(Debug, Clone, Copy)]
pub struct ActionContext<'a> {
    /// State before the action.
    pub state: &'a GameState,
    /// Content catalog.
    pub catalog: &'a Catalog,
    /// Lifecycle tunables.
    pub config: &'a LifecycleConfig,
    /// The acting character.
    pub character_id: CharacterId,
}

/// An action handler.
pub type ActionHandler = fn(&EffectAction, &ActionContext<'_>, &mut dyn RngCore) -> StatePatch;

/// Handlers keyed by action kind.
#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    handlers: BTreeMap<ActionKind, ActionHandler>,
}

impl ActionRegistry {
    /// A registry with no handlers.
    pub const fn new() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    /// A registry with a handler for every [`ActionKind`].
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(ActionKind::Marry, milestones::marry);
        registry.register(ActionKind::HaveChild, milestones::have_child);
        registry.register(ActionKind::DieOfOldAge, milestones::die_of_old_age);
        registry.register(ActionKind::StartDating, handlers::start_dating);
        registry.register(ActionKind::BreakUp, handlers::break_up);
        registry.register(ActionKind::Divorce, handlers::divorce);
        registry.register(ActionKind::LoseJob, handlers::lose_job);
        registry.register(ActionKind::Retire, handlers::retire);
        registry.register(ActionKind::AdoptPet, handlers::adopt_pet);
        registry.register(ActionKind::PetPassesAway, handlers::pet_passes_away);
        registry.register(ActionKind::RequestLoan, handlers::request_loan);
        registry.register(ActionKind::JoinClub, handlers::join_club);
        registry
    }

    /// Install or replace the handler for `kind`.
    pub fn register(&mut self, kind: ActionKind, handler: ActionHandler) {
        self.handlers.insert(kind, handler);
    }

    /// Whether a handler exists for `kind`.
    pub fn contains(&self, kind: ActionKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Run the handler for `action`. Unregistered kinds yield an empty patch.
    pub fn apply(
        &self,
        action: &EffectAction,
        context: &ActionContext<'_>,
        rng: &mut dyn RngCore,
    ) -> StatePatch {
        let kind = action.kind();
        let Some(handler) = self.handlers.get(&kind) else {
            warn!(?kind, "no handler registered for action");
            return StatePatch::empty();
        };
        handler(action, context, rng)
    }
}
