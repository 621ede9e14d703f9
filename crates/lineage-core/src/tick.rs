//! Tick cycle: the loop that drives a family through time.
//!
//! Each tick runs through these phases:
//!
//! 1. **Settle** -- present open pending choices and the offered event to the
//!    [`ChoiceSource`] and apply whatever it answers.
//! 2. **Clock** -- step the calendar by the configured number of days.
//! 3. **Ageing** -- advance every living character to the new date
//!    (birthdays, phase hooks, tuition, frailty).
//! 4. **Cashflow** -- apply one month of income and loan repayments per
//!    month boundary crossed.
//! 5. **Events** -- for each unblocked living character, draw a milestone if
//!    one is eligible, otherwise roll the event chance and draw a regular
//!    event. Each offered event is answered and its follow-ups drained, up
//!    to the cascade cap.
//! 6. **Game over** -- flag bankruptcy or an extinct family.
//!
//! A source that answers `None` leaves the question open; no further events
//! are drawn that tick. Given the same seed and source, a tick is
//! deterministic.

use lineage_events::{
    EventError, drain_trigger_queue, draw_event, evaluate_eligible_events, offer_drawn_event,
    resolve_choice,
};
use lineage_family::EconomyConfig;
use lineage_family::random::roll;
use lineage_types::{CharacterId, GameEvent, GameOverReason, GameState, LogEntry, SimDate};
use rand::RngCore;
use tracing::{debug, info, warn};

use crate::advance::advance_character;
use crate::cashflow::apply_monthly_cashflow;
use crate::clock::{ClockError, SimClock};
use crate::config::EventsConfig;
use crate::context::CoreContext;
use crate::decision::ChoiceSource;
use crate::error::CoreError;
use crate::pending::{options_for, resolve_pending};

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// A state transition was rejected.
    #[error("core error: {source}")]
    Core {
        /// The underlying error.
        #[from]
        source: CoreError,
    },

    /// The game has already ended.
    #[error("game is over: {0:?}")]
    GameOver(GameOverReason),
}

impl From<EventError> for TickError {
    fn from(source: EventError) -> Self {
        Self::Core {
            source: source.into(),
        }
    }
}

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickSummary {
    /// Tick number after the step.
    pub tick: u64,
    /// Date after the step.
    pub date: SimDate,
    /// Event choices applied.
    pub events_resolved: u32,
    /// Children born.
    pub births: u32,
    /// Characters who died.
    pub deaths: u32,
    /// Marriages.
    pub marriages: u32,
    /// Set when the game ended this tick.
    pub game_over: Option<GameOverReason>,
}

// ---------------------------------------------------------------------------
// Answering questions
// ---------------------------------------------------------------------------

enum Answer {
    /// The choice applied.
    Resolved(GameState),
    /// The offer could not be applied and was withdrawn.
    Dropped(GameState),
    /// The source declined to answer.
    Deferred,
}

fn withdraw_offer(state: &GameState) -> GameState {
    let mut next = state.clone();
    next.offered_event = None;
    next
}

fn answer_offered(
    state: &GameState,
    ctx: &CoreContext<'_>,
    source: &mut dyn ChoiceSource,
    rng: &mut dyn RngCore,
) -> Answer {
    let Some(offered) = &state.offered_event else {
        return Answer::Deferred;
    };
    let event = ctx.catalog.event(&offered.event_id);
    let character = state.character(offered.character_id).filter(|c| c.is_alive);
    let (Some(event), Some(character)) = (event, character) else {
        warn!(
            character_id = %offered.character_id,
            event_id = %offered.event_id,
            "offered event no longer applies; withdrawing"
        );
        return Answer::Dropped(withdraw_offer(state));
    };
    let Some(choice_id) = source.choose_event(state, character, event, rng) else {
        return Answer::Deferred;
    };
    match resolve_choice(state, &ctx.events(), character.id, &event.id, &choice_id, rng) {
        Ok(resolution) => Answer::Resolved(resolution.next_state),
        Err(err) => {
            warn!(
                character_id = %character.id,
                event_id = %event.id,
                %choice_id,
                error = %err,
                "choice rejected; withdrawing offer"
            );
            Answer::Dropped(withdraw_offer(state))
        }
    }
}

/// Answer the offered event, then drain follow-ups up to `max_cascade`.
///
/// Returns the new state and whether the source left an event open.
fn settle_offer_chain(
    state: GameState,
    ctx: &CoreContext<'_>,
    max_cascade: u32,
    source: &mut dyn ChoiceSource,
    rng: &mut dyn RngCore,
    resolved: &mut u32,
) -> (GameState, bool) {
    let mut next = state;
    let mut drained = 0_u32;
    loop {
        if next.offered_event.is_some() {
            match answer_offered(&next, ctx, source, rng) {
                Answer::Resolved(after) => {
                    next = after;
                    *resolved = resolved.saturating_add(1);
                }
                Answer::Dropped(after) => next = after,
                Answer::Deferred => return (next, true),
            }
        }
        if drained >= max_cascade || next.trigger_queue.is_empty() {
            return (next, false);
        }
        let (after, offered) = drain_trigger_queue(&next, ctx.catalog);
        next = after;
        drained = drained.saturating_add(1);
        if offered.is_none() {
            return (next, false);
        }
    }
}

fn settle_pending(
    state: &GameState,
    ctx: &CoreContext<'_>,
    source: &mut dyn ChoiceSource,
    rng: &mut dyn RngCore,
) -> GameState {
    let mut next = state.clone();
    for pending in &state.pending {
        if next.pending_for(pending.character_id, pending.request.kind()) != Some(pending) {
            continue;
        }
        let options = options_for(&next, ctx.catalog, pending);
        let Some(answer) = source.choose_pending(&next, pending, &options, rng) else {
            continue;
        };
        match resolve_pending(&next, ctx.catalog, ctx.economy, pending.character_id, &answer) {
            Ok(after) => next = after,
            Err(err) => warn!(
                character_id = %pending.character_id,
                kind = ?pending.request.kind(),
                error = %err,
                "pending answer rejected"
            ),
        }
    }
    next
}

// ---------------------------------------------------------------------------
// Event draws
// ---------------------------------------------------------------------------

/// The event to offer `character_id` this tick, if any.
///
/// Eligible milestones are always drawn; regular events only when the
/// per-tick event chance hits.
fn draw_for<'c>(
    state: &GameState,
    ctx: &CoreContext<'c>,
    character_id: CharacterId,
    event_chance: f64,
    rng: &mut dyn RngCore,
) -> Option<&'c GameEvent> {
    let character = state.character(character_id)?;
    let eligible = evaluate_eligible_events(ctx.catalog, state, character, rng);
    let (milestones, regular): (Vec<&GameEvent>, Vec<&GameEvent>) =
        eligible.into_iter().partition(|e| e.is_milestone);
    if !milestones.is_empty() {
        return draw_event(&milestones, rng);
    }
    if roll(rng, event_chance) {
        draw_event(&regular, rng)
    } else {
        None
    }
}

/// Why the game should end, if it should.
pub fn check_game_over(state: &GameState, economy: &EconomyConfig) -> Option<GameOverReason> {
    if state.living().next().is_none() {
        Some(GameOverReason::FamilyExtinct)
    } else if state.family_fund < economy.bankruptcy_threshold {
        Some(GameOverReason::Bankruptcy)
    } else {
        None
    }
}

fn count_keys(log: &[LogEntry], key: &str) -> u32 {
    u32::try_from(log.iter().filter(|e| e.key == key).count()).unwrap_or(u32::MAX)
}

// ---------------------------------------------------------------------------
// The tick
// ---------------------------------------------------------------------------

/// Run one tick from `state`.
///
/// # Errors
///
/// Returns [`TickError::GameOver`] if the game has already ended, and
/// propagates clock overflow and rejected ageing transitions.
pub fn run_tick(
    state: &GameState,
    clock: &mut SimClock,
    ctx: &CoreContext<'_>,
    events: &EventsConfig,
    source: &mut dyn ChoiceSource,
    rng: &mut dyn RngCore,
) -> Result<(GameState, TickSummary), TickError> {
    if let Some(reason) = state.game_over_reason {
        return Err(TickError::GameOver(reason));
    }
    let log_start = state.log.len();
    let mut resolved = 0_u32;

    // Phase 1: settle
    let next = settle_pending(state, ctx, source, rng);
    let (mut next, mut stalled) = settle_offer_chain(
        next,
        ctx,
        events.max_cascade_per_tick,
        source,
        rng,
        &mut resolved,
    );

    // Phase 2: clock
    let step = clock.advance(next.date)?;
    next.date = step.to;

    // Phase 3: ageing
    for id in next.living_ids() {
        next = advance_character(&next, ctx, id, step.days, rng)?;
    }

    // Phase 4: cashflow
    if step.months_elapsed > 0 {
        let (after, flow) =
            apply_monthly_cashflow(&next, ctx.catalog, ctx.economy, step.months_elapsed)?;
        debug!(net = flow.net(), months = step.months_elapsed, "cashflow applied");
        next = after;
    }

    // Phase 5: events
    for id in next.living_ids() {
        if stalled {
            break;
        }
        let alive = next.character(id).is_some_and(|c| c.is_alive);
        if !alive || next.is_blocked(id) {
            continue;
        }
        let Some(event) = draw_for(&next, ctx, id, events.event_chance, rng) else {
            continue;
        };
        next = offer_drawn_event(&next, id, event)?;
        let (after, open) = settle_offer_chain(
            next,
            ctx,
            events.max_cascade_per_tick,
            source,
            rng,
            &mut resolved,
        );
        next = after;
        stalled = open;
    }

    // Phase 6: game over
    let game_over = check_game_over(&next, ctx.economy);
    if let Some(reason) = game_over {
        next.game_over_reason = Some(reason);
        next.record(
            LogEntry::new(next.date, None, "log.game_over").with_param("reason", format!("{reason:?}")),
        );
        info!(tick = clock.tick(), ?reason, fund = next.family_fund, "game over");
    }

    let appended = next.log.get(log_start..).unwrap_or_default();
    let summary = TickSummary {
        tick: clock.tick(),
        date: next.date,
        events_resolved: resolved,
        births: count_keys(appended, "log.milestone.child_born"),
        deaths: count_keys(appended, "log.milestone.died"),
        marriages: count_keys(appended, "log.milestone.married"),
        game_over,
    };
    debug!(
        tick = summary.tick,
        year = summary.date.year,
        events = summary.events_resolved,
        births = summary.births,
        deaths = summary.deaths,
        fund = next.family_fund,
        "tick complete"
    );
    Ok((next, summary))
}
