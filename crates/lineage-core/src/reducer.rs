//! The single entry point for outside callers.
//!
//! A presentation layer drives the simulation by sending [`GameAction`]s
//! to [`reduce`]. Each action maps `&GameState` to a fresh state; a
//! rejected action returns an error and the caller keeps its old state.

use lineage_events::{EventError, drain_trigger_queue, offer_event, resolve_choice};
use lineage_types::{
    AssetId, BusinessId, BusinessKindId, CharacterId, ChoiceId, EventId, GameState, SlotWorker,
};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::advance::advance_character;
use crate::commerce::{assign_business_slot, buy_business, purchase_asset, upgrade_business};
use crate::context::CoreContext;
use crate::error::CoreError;
use crate::pending::{PendingResolution, resolve_pending};

/// Everything a caller can ask of the simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameAction {
    /// Put an event in front of the player.
    OfferEvent {
        /// Who the event is about.
        character_id: CharacterId,
        /// The event.
        event_id: EventId,
    },
    /// Answer the event currently offered to `character_id`.
    ResolveChoice {
        /// Who the event is about.
        character_id: CharacterId,
        /// The event.
        event_id: EventId,
        /// The chosen option.
        choice_id: ChoiceId,
    },
    /// Answer a pending choice.
    ResolvePending {
        /// The blocked character.
        character_id: CharacterId,
        /// The answer.
        resolution: PendingResolution,
    },
    /// Buy an asset.
    PurchaseAsset {
        /// The asset.
        asset_id: AssetId,
    },
    /// Buy a business.
    BuyBusiness {
        /// The business kind.
        kind: BusinessKindId,
    },
    /// Fill or empty a business slot.
    AssignBusinessSlot {
        /// The business.
        business_id: BusinessId,
        /// Zero-based slot index.
        slot_index: usize,
        /// The new occupant.
        worker: SlotWorker,
    },
    /// Raise a business one level.
    UpgradeBusiness {
        /// The business.
        business_id: BusinessId,
    },
    /// Bring a character up to the current date.
    AdvanceCharacter {
        /// The character.
        character_id: CharacterId,
        /// Days the frailty hazard covers.
        elapsed_days: u32,
    },
    /// Offer the next queued follow-up event.
    DrainTriggerQueue,
}

/// Apply `action` to `state`.
pub fn reduce(
    state: &GameState,
    ctx: &CoreContext<'_>,
    action: &GameAction,
    rng: &mut dyn RngCore,
) -> Result<GameState, CoreError> {
    debug!(?action, "reduce");
    match action {
        GameAction::OfferEvent {
            character_id,
            event_id,
        } => Ok(offer_event(state, ctx.catalog, *character_id, event_id, rng)?),
        GameAction::ResolveChoice {
            character_id,
            event_id,
            choice_id,
        } => {
            let offered = state
                .offered_event
                .as_ref()
                .is_some_and(|o| o.character_id == *character_id && &o.event_id == event_id);
            if !offered {
                return Err(EventError::NotOffered {
                    character_id: *character_id,
                    event_id: event_id.clone(),
                }
                .into());
            }
            Ok(resolve_choice(state, &ctx.events(), *character_id, event_id, choice_id, rng)?
                .next_state)
        }
        GameAction::ResolvePending {
            character_id,
            resolution,
        } => resolve_pending(state, ctx.catalog, ctx.economy, *character_id, resolution),
        GameAction::PurchaseAsset { asset_id } => purchase_asset(state, ctx.catalog, asset_id),
        GameAction::BuyBusiness { kind } => {
            buy_business(state, ctx.catalog, kind, rng).map(|(next, _)| next)
        }
        GameAction::AssignBusinessSlot {
            business_id,
            slot_index,
            worker,
        } => assign_business_slot(state, *business_id, *slot_index, *worker),
        GameAction::UpgradeBusiness { business_id } => {
            upgrade_business(state, ctx.catalog, *business_id)
        }
        GameAction::AdvanceCharacter {
            character_id,
            elapsed_days,
        } => advance_character(state, ctx, *character_id, *elapsed_days, rng),
        GameAction::DrainTriggerQueue => Ok(drain_trigger_queue(state, ctx.catalog).0),
    }
}
