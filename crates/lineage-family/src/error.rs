//! Error types for the lineage-family crate.
//!
//! Every rejection here guards a family invariant: partner symmetry, the
//! frozen state of the dead, and the children ceiling. Callers treat these
//! as "reject this one mutation", never as fatal.

use lineage_types::CharacterId;

/// Errors raised by lifecycle, family, and economy operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FamilyError {
    /// No character with this id exists.
    #[error("character not found: {0}")]
    CharacterNotFound(CharacterId),

    /// The character is dead; their state is frozen.
    #[error("character {0} is deceased")]
    CharacterDeceased(CharacterId),

    /// The character already has a partner.
    #[error("character {character_id} already has partner {partner_id}")]
    AlreadyPartnered {
        /// The character.
        character_id: CharacterId,
        /// Their existing partner.
        partner_id: CharacterId,
    },

    /// The character has no partner.
    #[error("character {0} has no partner")]
    NotPartnered(CharacterId),

    /// A partner link points one way only.
    #[error("partner link {character_id} -> {partner_id} is not reciprocated")]
    PartnerAsymmetry {
        /// The character holding the link.
        character_id: CharacterId,
        /// The partner that does not point back.
        partner_id: CharacterId,
    },

    /// The character already has the maximum number of children.
    #[error("character {character_id} already has {limit} children")]
    ChildLimitReached {
        /// The parent.
        character_id: CharacterId,
        /// The ceiling.
        limit: u32,
    },

    /// A checked arithmetic operation overflowed.
    #[error("arithmetic overflow: {context}")]
    ArithmeticOverflow {
        /// What was being computed.
        context: String,
    },
}
