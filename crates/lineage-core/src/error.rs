//! Error types for the lineage-core crate.
//!
//! Every variant describes a rejected mutation; the state handed to the
//! failing operation is left untouched.

use lineage_events::EventError;
use lineage_family::FamilyError;
use lineage_types::{
    AssetId, BusinessId, BusinessKindId, CharacterId, MajorId, PendingChoiceKind,
};

/// Errors from the reducer and its entry points.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// Event offering or resolution failed.
    #[error("event error: {source}")]
    Event {
        /// The underlying event error.
        #[from]
        source: EventError,
    },

    /// A family-level invariant was violated.
    #[error("family error: {source}")]
    Family {
        /// The underlying family error.
        #[from]
        source: FamilyError,
    },

    /// The character does not exist.
    #[error("character not found: {0}")]
    CharacterNotFound(CharacterId),

    /// The character is dead.
    #[error("character {0} is deceased")]
    CharacterDeceased(CharacterId),

    /// The asset is not in the catalog.
    #[error("unknown asset: {0}")]
    UnknownAsset(AssetId),

    /// The business kind is not in the catalog.
    #[error("unknown business kind: {0}")]
    UnknownBusinessKind(BusinessKindId),

    /// The family owns no such business.
    #[error("business not found: {0}")]
    BusinessNotFound(BusinessId),

    /// The family fund cannot cover a purchase.
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds {
        /// Price of the purchase.
        needed: i64,
        /// Current family fund.
        available: i64,
    },

    /// The slot index is past the end of the business's slots.
    #[error("business {business_id} has {slots} slots, no slot {index}")]
    SlotOutOfRange {
        /// The business.
        business_id: BusinessId,
        /// Requested index.
        index: usize,
        /// Number of slots.
        slots: usize,
    },

    /// The character already fills another slot.
    #[error("character {character_id} already works at business {business_id}")]
    AlreadyAssigned {
        /// The character.
        character_id: CharacterId,
        /// Where they already work.
        business_id: BusinessId,
    },

    /// The slot requires a major the character does not hold.
    #[error("character {character_id} lacks major {required} for this slot")]
    MajorMismatch {
        /// The character.
        character_id: CharacterId,
        /// The slot's required major.
        required: MajorId,
    },

    /// The business is already at its top level.
    #[error("business {business_id} is at max level {level}")]
    MaxLevelReached {
        /// The business.
        business_id: BusinessId,
        /// Its level.
        level: u32,
    },

    /// No pending choice of this kind is open for the character.
    #[error("character {character_id} has no pending {kind:?} choice")]
    NoPendingChoice {
        /// The character.
        character_id: CharacterId,
        /// Requested kind.
        kind: PendingChoiceKind,
    },

    /// A pending choice of this kind is already open for the character.
    #[error("character {character_id} already has a pending {kind:?} choice")]
    PendingSlotOccupied {
        /// The character.
        character_id: CharacterId,
        /// The occupied kind.
        kind: PendingChoiceKind,
    },

    /// The answer is not one of the pending choice's options.
    #[error("invalid answer for character {character_id}: {reason}")]
    InvalidResolution {
        /// The character.
        character_id: CharacterId,
        /// What is wrong with the answer.
        reason: String,
    },
}
