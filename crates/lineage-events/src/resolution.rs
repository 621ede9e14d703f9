//! Choice resolution and the trigger cascade.
//!
//! Per character an event moves through
//! `Eligible -> Offered -> Resolved -> (TriggerQueued)* -> Idle`:
//!
//! 1. [`offer_event`] puts an eligible event in front of the player; the
//!    character is blocked until it resolves.
//! 2. [`resolve_choice`] applies the chosen effect: a dynamic outcome is
//!    decided first, then stat deltas (unclamped) and the fund delta, then
//!    the action patch, then each trigger is rolled and queued FIFO.
//! 3. [`drain_trigger_queue`] surfaces the next queued follow-up as the new
//!    offered event.
//!
//! Every entry point takes `&GameState` and returns a new state; errors
//! leave the input untouched.

use lineage_family::LifecycleConfig;
use lineage_family::random::roll;
use lineage_types::{
    Catalog, Character, CharacterId, ChoiceId, DynamicEffect, EventEffect, EventId, GameEvent,
    GameState, LogEntry, OfferedEvent, QueuedTrigger,
};
use rand::RngCore;
use tracing::{debug, info, warn};

use crate::error::EventError;
use crate::evaluator::passes_filters;
use crate::registry::{ActionContext, ActionRegistry};

/// Catalog, handlers, and tunables shared by every resolution.
#[derive(Debug, Clone, Copy)]
pub struct EventContext<'a> {
    /// Content catalog.
    pub catalog: &'a Catalog,
    /// Action handlers.
    pub registry: &'a ActionRegistry,
    /// Lifecycle tunables.
    pub config: &'a LifecycleConfig,
}

/// Outcome of [`resolve_choice`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceResolution {
    /// State after the choice.
    pub next_state: GameState,
    /// The entry appended to the log, if the effect had a log key.
    pub log_entry: Option<LogEntry>,
    /// Follow-ups queued by this choice, in queue order.
    pub queued_triggers: Vec<QueuedTrigger>,
}

/// Dynamic nesting deeper than this is treated as a catalog error.
const MAX_DYNAMIC_DEPTH: usize = 8;

/// Success probability of a stat check: `stat / (stat + difficulty)`,
/// treating negatives as zero. Zero over zero is a coin flip.
pub fn stat_check_chance(stat: i32, difficulty: i32) -> f64 {
    let stat = f64::from(stat.max(0));
    let total = stat + f64::from(difficulty.max(0));
    if total <= 0.0 { 0.5 } else { stat / total }
}

/// Follow `dynamic` outcomes until a static effect is reached.
fn settle_effect<'e>(
    effect: &'e EventEffect,
    character: &Character,
    rng: &mut dyn RngCore,
) -> &'e EventEffect {
    let mut current = effect;
    for _ in 0..MAX_DYNAMIC_DEPTH {
        let Some(dynamic) = &current.dynamic else {
            return current;
        };
        current = match dynamic {
            DynamicEffect::Gamble {
                success_chance,
                success,
                failure,
            } => {
                if roll(rng, *success_chance) {
                    &**success
                } else {
                    &**failure
                }
            }
            DynamicEffect::StatCheck {
                stat,
                difficulty,
                success,
                failure,
            } => {
                let chance = stat_check_chance(character.stats.get(*stat), *difficulty);
                if roll(rng, chance) {
                    &**success
                } else {
                    &**failure
                }
            }
        };
    }
    warn!(character_id = %character.id, "dynamic effect nested too deep; using last branch");
    current
}

/// Put `event_id` in front of the player for `character_id`.
///
/// The event must be one the character could draw right now: not
/// trigger-only, and passing every eligibility filter. Random condition
/// leaves are rolled once here.
pub fn offer_event(
    state: &GameState,
    catalog: &Catalog,
    character_id: CharacterId,
    event_id: &EventId,
    rng: &mut dyn RngCore,
) -> Result<GameState, EventError> {
    let event = catalog
        .event(event_id)
        .ok_or_else(|| EventError::UnknownEvent(event_id.clone()))?;
    let character = state
        .character(character_id)
        .ok_or(EventError::CharacterNotFound(character_id))?;
    if event.is_trigger_only {
        return Err(EventError::TriggerOnly(event.id.clone()));
    }
    if character.is_alive && !passes_filters(event, state, character, rng) {
        return Err(EventError::NotEligible {
            character_id,
            event_id: event.id.clone(),
        });
    }
    offer_drawn_event(state, character_id, event)
}

/// Offer an event already taken from [`evaluate_eligible_events`].
///
/// Eligibility filters are not re-evaluated, so random conditions are not
/// rolled twice. Trigger-only events and blocked characters are still
/// rejected.
///
/// [`evaluate_eligible_events`]: crate::evaluator::evaluate_eligible_events
pub fn offer_drawn_event(
    state: &GameState,
    character_id: CharacterId,
    event: &GameEvent,
) -> Result<GameState, EventError> {
    if let Some(current) = &state.offered_event {
        return Err(EventError::OfferOutstanding(current.event_id.clone()));
    }
    let character = state
        .character(character_id)
        .ok_or(EventError::CharacterNotFound(character_id))?;
    if !character.is_alive {
        return Err(EventError::CharacterDeceased(character_id));
    }
    if event.is_trigger_only {
        return Err(EventError::TriggerOnly(event.id.clone()));
    }
    if state.pending.iter().any(|p| p.character_id == character_id) {
        return Err(EventError::CharacterBlocked(character_id));
    }
    let mut next = state.clone();
    next.offered_event = Some(OfferedEvent {
        character_id,
        event_id: event.id.clone(),
    });
    debug!(%character_id, event_id = %event.id, "event offered");
    Ok(next)
}

/// Apply `choice_id` of `event_id` for `character_id`.
///
/// A missing log key is an error in debug builds; release builds warn and
/// resolve without a log entry.
pub fn resolve_choice(
    state: &GameState,
    ctx: &EventContext<'_>,
    character_id: CharacterId,
    event_id: &EventId,
    choice_id: &ChoiceId,
    rng: &mut dyn RngCore,
) -> Result<ChoiceResolution, EventError> {
    let event = ctx
        .catalog
        .event(event_id)
        .ok_or_else(|| EventError::UnknownEvent(event_id.clone()))?;
    let choice = event
        .choice(choice_id)
        .ok_or_else(|| EventError::UnknownChoice {
            event_id: event_id.clone(),
            choice_id: choice_id.clone(),
        })?;
    let character = state
        .character(character_id)
        .ok_or(EventError::CharacterNotFound(character_id))?;
    if !character.is_alive {
        return Err(EventError::CharacterDeceased(character_id));
    }

    let effect = settle_effect(&choice.effect, character, rng);
    if effect.log_key.is_empty() {
        if cfg!(debug_assertions) {
            return Err(EventError::MissingLogKey {
                event_id: event_id.clone(),
                choice_id: choice_id.clone(),
            });
        }
        warn!(%event_id, %choice_id, "effect has no log key; resolving without log entry");
    }

    let mut next = state.clone();
    next.family_fund = next.family_fund.saturating_add(effect.fund_change);
    if let Some(actor) = next.characters.get_mut(&character_id) {
        actor.stats.apply(&effect.stats);
        if let Some(years) = event.cooldown_years {
            let until = next
                .date
                .year
                .saturating_add(i32::try_from(years).unwrap_or(i32::MAX));
            actor.status.cooldowns.insert(event.id.clone(), until);
        }
    }

    if let Some(action) = &effect.action {
        let action_ctx = ActionContext {
            state: &next,
            catalog: ctx.catalog,
            config: ctx.config,
            character_id,
        };
        let patch = ctx.registry.apply(action, &action_ctx, rng);
        next = patch.merge_into(&next)?;
    }

    let still_alive = next.character(character_id).is_some_and(|c| c.is_alive);
    let mut queued_triggers = Vec::new();
    for trigger in &effect.triggers {
        if ctx.catalog.event(&trigger.event_id).is_none() {
            warn!(%event_id, target = %trigger.event_id, "unknown trigger target; skipping");
            continue;
        }
        if still_alive && roll(rng, trigger.chance) {
            queued_triggers.push(QueuedTrigger {
                character_id,
                event_id: trigger.event_id.clone(),
                source_event: event.id.clone(),
            });
        }
    }
    next.trigger_queue.extend(queued_triggers.iter().cloned());

    let log_entry = (!effect.log_key.is_empty()).then(|| {
        LogEntry::new(next.date, Some(character_id), effect.log_key.clone())
            .with_param("event", &event.id)
            .with_param("choice", &choice.id)
    });
    if let Some(entry) = &log_entry {
        next.record(entry.clone());
    }

    if next
        .offered_event
        .as_ref()
        .is_some_and(|o| o.character_id == character_id && &o.event_id == event_id)
    {
        next.offered_event = None;
    }

    info!(
        %character_id,
        %event_id,
        %choice_id,
        fund = next.family_fund,
        queued = queued_triggers.len(),
        "choice resolved"
    );
    Ok(ChoiceResolution {
        next_state: next,
        log_entry,
        queued_triggers,
    })
}

/// Pop queued follow-ups until one can be offered.
///
/// Entries whose character has died or whose event no longer exists are
/// dropped. Nothing is popped while another event is offered.
pub fn drain_trigger_queue(
    state: &GameState,
    catalog: &Catalog,
) -> (GameState, Option<OfferedEvent>) {
    let mut next = state.clone();
    if next.offered_event.is_some() {
        return (next, None);
    }
    while let Some(trigger) = next.trigger_queue.pop_front() {
        let alive = next
            .character(trigger.character_id)
            .is_some_and(|c| c.is_alive);
        if !alive {
            debug!(character_id = %trigger.character_id, "dropping trigger for deceased character");
            continue;
        }
        if catalog.event(&trigger.event_id).is_none() {
            warn!(event_id = %trigger.event_id, "dropping trigger for unknown event");
            continue;
        }
        let offered = OfferedEvent {
            character_id: trigger.character_id,
            event_id: trigger.event_id,
        };
        next.offered_event = Some(offered.clone());
        debug!(
            character_id = %offered.character_id,
            event_id = %offered.event_id,
            source = %trigger.source_event,
            "triggered event offered"
        );
        return (next, Some(offered));
    }
    (next, None)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lineage_types::{
        EffectAction, EventChoice, LifePhase, PendingChoice, PendingRequest, RelationshipStatus,
        StatChanges, StatKind, TriggeredEvent,
    };
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::testing::{simple_event, state_with_character_aged, test_catalog};

    struct Fixture {
        catalog: Catalog,
        registry: ActionRegistry,
        config: LifecycleConfig,
    }

    impl Fixture {
        fn new(catalog: Catalog) -> Self {
            Self {
                catalog,
                registry: ActionRegistry::standard(),
                config: LifecycleConfig::default(),
            }
        }

        fn ctx(&self) -> EventContext<'_> {
            EventContext {
                catalog: &self.catalog,
                registry: &self.registry,
                config: &self.config,
            }
        }
    }

    fn with_trigger(chance: f64) -> Catalog {
        let mut source = simple_event("rumour", LifePhase::HighSchool, "log.rumour");
        source.choices[0].effect.triggers = vec![TriggeredEvent {
            event_id: EventId::new("fallout"),
            chance,
        }];
        let mut fallout = simple_event("fallout", LifePhase::HighSchool, "log.fallout");
        fallout.is_trigger_only = true;
        let mut catalog = test_catalog();
        catalog.events = vec![source, fallout];
        catalog
    }

    fn only_choice(catalog: &Catalog, event: &str) -> (EventId, ChoiceId) {
        let event = catalog.event(&EventId::new(event)).unwrap();
        (event.id.clone(), event.choices[0].id.clone())
    }

    #[test]
    fn teen_spending_scenario() {
        let fixture = Fixture::new(test_catalog());
        let (state, id) = state_with_character_aged(17, 1_000);
        let teen = &state.characters[&id];
        assert_eq!(teen.phase, LifePhase::HighSchool);
        assert_eq!(teen.relationship_status, RelationshipStatus::Single);

        let mut rng = SmallRng::seed_from_u64(101);
        let event_id = EventId::new("school_trip");
        let choice_id = ChoiceId::new("go");
        let offered = offer_event(&state, &fixture.catalog, id, &event_id, &mut rng).unwrap();
        assert!(offered.is_blocked(id));

        let resolution =
            resolve_choice(&offered, &fixture.ctx(), id, &event_id, &choice_id, &mut rng).unwrap();
        assert_eq!(resolution.next_state.family_fund, 850);
        let entry = resolution.log_entry.unwrap();
        assert_eq!(entry.key, "log.school_trip.go");
        assert_eq!(resolution.next_state.log.last(), Some(&entry));
        assert!(resolution.next_state.offered_event.is_none());
        assert!(!resolution.next_state.is_blocked(id));
        assert_eq!(state.family_fund, 1_000);
    }

    #[test]
    fn certain_trigger_always_queues() {
        let fixture = Fixture::new(with_trigger(1.0));
        let (event_id, choice_id) = only_choice(&fixture.catalog, "rumour");
        let (state, id) = state_with_character_aged(16, 0);
        let mut rng = SmallRng::seed_from_u64(102);
        for _ in 0..500 {
            let resolution =
                resolve_choice(&state, &fixture.ctx(), id, &event_id, &choice_id, &mut rng)
                    .unwrap();
            assert_eq!(resolution.queued_triggers.len(), 1);
            assert_eq!(resolution.next_state.trigger_queue.len(), 1);
        }
    }

    #[test]
    fn impossible_trigger_never_queues() {
        let fixture = Fixture::new(with_trigger(0.0));
        let (event_id, choice_id) = only_choice(&fixture.catalog, "rumour");
        let (state, id) = state_with_character_aged(16, 0);
        let mut rng = SmallRng::seed_from_u64(103);
        for _ in 0..500 {
            let resolution =
                resolve_choice(&state, &fixture.ctx(), id, &event_id, &choice_id, &mut rng)
                    .unwrap();
            assert!(resolution.queued_triggers.is_empty());
            assert!(resolution.next_state.trigger_queue.is_empty());
        }
    }

    #[test]
    fn queued_triggers_drain_in_order() {
        let fixture = Fixture::new(with_trigger(1.0));
        let (event_id, choice_id) = only_choice(&fixture.catalog, "rumour");
        let (mut state, id) = state_with_character_aged(16, 0);
        let mut rng = SmallRng::seed_from_u64(104);
        for _ in 0..2 {
            state = resolve_choice(&state, &fixture.ctx(), id, &event_id, &choice_id, &mut rng)
                .unwrap()
                .next_state;
        }
        assert_eq!(state.trigger_queue.len(), 2);

        let (state, offered) = drain_trigger_queue(&state, &fixture.catalog);
        let offered = offered.unwrap();
        assert_eq!(offered.event_id, EventId::new("fallout"));
        assert_eq!(state.trigger_queue.len(), 1);

        let (state, blocked) = drain_trigger_queue(&state, &fixture.catalog);
        assert!(blocked.is_none());
        assert_eq!(state.trigger_queue.len(), 1);

        let (fallout, fallout_choice) = only_choice(&fixture.catalog, "fallout");
        let state = resolve_choice(&state, &fixture.ctx(), id, &fallout, &fallout_choice, &mut rng)
            .unwrap()
            .next_state;
        let (state, second) = drain_trigger_queue(&state, &fixture.catalog);
        assert!(second.is_some());
        assert!(state.trigger_queue.is_empty());
        let (_, none) = drain_trigger_queue(&state, &fixture.catalog);
        assert!(none.is_none());
    }

    #[test]
    fn unknown_trigger_targets_are_skipped() {
        let mut catalog = with_trigger(1.0);
        catalog.events[0].choices[0].effect.triggers[0].event_id = EventId::new("nowhere");
        let fixture = Fixture::new(catalog);
        let (event_id, choice_id) = only_choice(&fixture.catalog, "rumour");
        let (state, id) = state_with_character_aged(16, 0);
        let mut rng = SmallRng::seed_from_u64(105);
        let resolution =
            resolve_choice(&state, &fixture.ctx(), id, &event_id, &choice_id, &mut rng).unwrap();
        assert!(resolution.queued_triggers.is_empty());
    }

    #[test]
    fn stat_deltas_drift_past_ceilings() {
        let mut event = simple_event("euphoria", LifePhase::Working, "log.euphoria");
        event.choices[0].effect.stats = StatChanges::one(StatKind::Happiness, 80);
        let mut catalog = test_catalog();
        catalog.events = vec![event];
        let fixture = Fixture::new(catalog);
        let (event_id, choice_id) = only_choice(&fixture.catalog, "euphoria");
        let (state, id) = state_with_character_aged(30, 0);
        let before = state.characters[&id].stats.happiness;
        let mut rng = SmallRng::seed_from_u64(106);
        let next = resolve_choice(&state, &fixture.ctx(), id, &event_id, &choice_id, &mut rng)
            .unwrap()
            .next_state;
        assert_eq!(next.characters[&id].stats.happiness, before + 80);
        assert!(next.characters[&id].stats.happiness > 100);
    }

    #[test]
    fn missing_log_key_fails_fast_in_debug() {
        let mut event = simple_event("silent", LifePhase::Working, "log.silent");
        event.choices[0].effect.log_key = String::new();
        let mut catalog = test_catalog();
        catalog.events = vec![event];
        let fixture = Fixture::new(catalog);
        let (event_id, choice_id) = only_choice(&fixture.catalog, "silent");
        let (state, id) = state_with_character_aged(30, 0);
        let mut rng = SmallRng::seed_from_u64(107);
        let result = resolve_choice(&state, &fixture.ctx(), id, &event_id, &choice_id, &mut rng);
        if cfg!(debug_assertions) {
            assert!(matches!(result, Err(EventError::MissingLogKey { .. })));
        } else {
            assert!(result.unwrap().log_entry.is_none());
        }
    }

    #[test]
    fn dynamic_outcome_replaces_static_effect() {
        let win = EventEffect {
            fund_change: 500,
            log_key: "log.bet.won".to_owned(),
            ..EventEffect::default()
        };
        let lose = EventEffect {
            fund_change: -500,
            log_key: "log.bet.lost".to_owned(),
            ..EventEffect::default()
        };
        let mut event = simple_event("bet", LifePhase::Working, "log.bet");
        event.choices = vec![EventChoice {
            id: ChoiceId::new("sure_thing"),
            label_key: "choice.bet".to_owned(),
            effect: EventEffect {
                fund_change: 1_000_000,
                log_key: "log.bet".to_owned(),
                dynamic: Some(DynamicEffect::Gamble {
                    success_chance: 1.0,
                    success: Box::new(win),
                    failure: Box::new(lose),
                }),
                ..EventEffect::default()
            },
        }];
        let mut catalog = test_catalog();
        catalog.events = vec![event];
        let fixture = Fixture::new(catalog);
        let (state, id) = state_with_character_aged(30, 0);
        let mut rng = SmallRng::seed_from_u64(108);
        let resolution = resolve_choice(
            &state,
            &fixture.ctx(),
            id,
            &EventId::new("bet"),
            &ChoiceId::new("sure_thing"),
            &mut rng,
        )
        .unwrap();
        assert_eq!(resolution.next_state.family_fund, 500);
        assert_eq!(resolution.log_entry.unwrap().key, "log.bet.won");
    }

    #[test]
    fn stat_check_odds() {
        assert!((stat_check_chance(50, 50) - 0.5).abs() < 1e-9);
        assert!((stat_check_chance(150, 50) - 0.75).abs() < 1e-9);
        assert!(stat_check_chance(0, 10).abs() < 1e-9);
        assert!((stat_check_chance(0, 0) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn cooldown_is_stamped() {
        let mut event = simple_event("reunion", LifePhase::Working, "log.reunion");
        event.cooldown_years = Some(5);
        let mut catalog = test_catalog();
        catalog.events = vec![event];
        let fixture = Fixture::new(catalog);
        let (event_id, choice_id) = only_choice(&fixture.catalog, "reunion");
        let (state, id) = state_with_character_aged(30, 0);
        let mut rng = SmallRng::seed_from_u64(109);
        let next = resolve_choice(&state, &fixture.ctx(), id, &event_id, &choice_id, &mut rng)
            .unwrap()
            .next_state;
        let status = &next.characters[&id].status;
        assert!(status.on_cooldown(&event_id, state.date.year + 4));
        assert!(!status.on_cooldown(&event_id, state.date.year + 5));
    }

    #[test]
    fn marriage_choice_goes_through_the_registry() {
        let mut event = simple_event("proposal", LifePhase::Working, "log.proposal");
        event.choices[0].effect.action = Some(EffectAction::Marry);
        let mut catalog = test_catalog();
        catalog.events = vec![event];
        let fixture = Fixture::new(catalog);
        let (event_id, choice_id) = only_choice(&fixture.catalog, "proposal");
        let (state, id) = state_with_character_aged(28, 0);
        let mut rng = SmallRng::seed_from_u64(110);
        let next = resolve_choice(&state, &fixture.ctx(), id, &event_id, &choice_id, &mut rng)
            .unwrap()
            .next_state;
        let partner = next.characters[&id].partner_id.unwrap();
        assert_eq!(next.characters[&partner].partner_id, Some(id));
    }

    #[test]
    fn dead_and_unknown_are_rejected() {
        let fixture = Fixture::new(test_catalog());
        let (mut state, id) = state_with_character_aged(30, 0);
        let mut rng = SmallRng::seed_from_u64(111);
        assert!(matches!(
            resolve_choice(
                &state,
                &fixture.ctx(),
                id,
                &EventId::new("missing"),
                &ChoiceId::new("x"),
                &mut rng
            ),
            Err(EventError::UnknownEvent(_))
        ));
        state.characters.get_mut(&id).unwrap().is_alive = false;
        assert!(matches!(
            resolve_choice(
                &state,
                &fixture.ctx(),
                id,
                &EventId::new("school_trip"),
                &ChoiceId::new("go"),
                &mut rng
            ),
            Err(EventError::CharacterDeceased(_))
        ));
        assert!(
            offer_event(&state, &fixture.catalog, id, &EventId::new("school_trip"), &mut rng)
                .is_err()
        );
    }

    #[test]
    fn trigger_only_events_cannot_be_offered_directly() {
        let fixture = Fixture::new(with_trigger(1.0));
        let (state, id) = state_with_character_aged(16, 0);
        let mut rng = SmallRng::seed_from_u64(112);
        let fallout = EventId::new("fallout");
        assert!(matches!(
            offer_event(&state, &fixture.catalog, id, &fallout, &mut rng),
            Err(EventError::TriggerOnly(_))
        ));
        let event = fixture.catalog.event(&fallout).unwrap();
        assert!(matches!(
            offer_drawn_event(&state, id, event),
            Err(EventError::TriggerOnly(_))
        ));
        assert!(state.offered_event.is_none());
    }

    #[test]
    fn ineligible_events_cannot_be_offered() {
        let fixture = Fixture::new(test_catalog());
        let (state, id) = state_with_character_aged(30, 1_000);
        let mut rng = SmallRng::seed_from_u64(113);
        assert!(matches!(
            offer_event(&state, &fixture.catalog, id, &EventId::new("school_trip"), &mut rng),
            Err(EventError::NotEligible { .. })
        ));
    }

    #[test]
    fn pending_choice_blocks_offers() {
        let fixture = Fixture::new(test_catalog());
        let (mut state, id) = state_with_character_aged(17, 1_000);
        state.pending.push(PendingChoice {
            character_id: id,
            request: PendingRequest::Loan { amount: 5_000 },
            opened: state.date,
        });
        let mut rng = SmallRng::seed_from_u64(114);
        assert!(matches!(
            offer_event(&state, &fixture.catalog, id, &EventId::new("school_trip"), &mut rng),
            Err(EventError::CharacterBlocked(_))
        ));
    }
}
