//! Error types for the lineage-events crate.

use lineage_family::FamilyError;
use lineage_types::{CharacterId, ChoiceId, EventId, PendingChoiceKind};

/// Errors raised while resolving events or merging state patches.
///
/// A returned error always means the input state was left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventError {
    /// The event id is not in the catalog.
    #[error("unknown event: {0}")]
    UnknownEvent(EventId),

    /// The event has no choice with this id.
    #[error("event {event_id} has no choice {choice_id}")]
    UnknownChoice {
        /// The event.
        event_id: EventId,
        /// The missing choice.
        choice_id: ChoiceId,
    },

    /// No character with this id exists.
    #[error("character not found: {0}")]
    CharacterNotFound(CharacterId),

    /// The character is dead and cannot act.
    #[error("character {0} is deceased")]
    CharacterDeceased(CharacterId),

    /// A patch tried to rewrite a character who was already dead.
    #[error("patch mutates deceased character {0}")]
    DeadCharacterMutation(CharacterId),

    /// The chosen effect carries no log key.
    #[error("event {event_id} choice {choice_id} has no log key")]
    MissingLogKey {
        /// The event.
        event_id: EventId,
        /// The choice.
        choice_id: ChoiceId,
    },

    /// The character already waits on a pending choice of this kind.
    #[error("character {character_id} already has a pending {kind:?} choice")]
    PendingSlotOccupied {
        /// The character.
        character_id: CharacterId,
        /// The occupied slot.
        kind: PendingChoiceKind,
    },

    /// Another event is already waiting for the player.
    #[error("event {0} is already offered")]
    OfferOutstanding(EventId),

    /// Trigger-only events are reached through the trigger queue alone.
    #[error("event {0} is trigger-only")]
    TriggerOnly(EventId),

    /// The character waits on a pending choice and cannot take events.
    #[error("character {0} has an open pending choice")]
    CharacterBlocked(CharacterId),

    /// The event's phase, relationship, cooldown, or condition filters
    /// exclude the character.
    #[error("event {event_id} is not eligible for character {character_id}")]
    NotEligible {
        /// The character.
        character_id: CharacterId,
        /// The event.
        event_id: EventId,
    },

    /// The event is not the one currently offered to this character.
    #[error("event {event_id} is not offered to character {character_id}")]
    NotOffered {
        /// The character.
        character_id: CharacterId,
        /// The event.
        event_id: EventId,
    },

    /// A family invariant rejected the change.
    #[error("family invariant violated: {0}")]
    Family(#[from] FamilyError),
}
